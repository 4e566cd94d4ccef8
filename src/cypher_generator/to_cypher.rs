use crate::query_builder::ast::{
    Assignment, Direction, NodePattern, OrderItem, PatternChain, Projection, ProjectionItem,
    RelationshipPattern, Removal, SortOrder, Variable,
};
use crate::query_builder::expression::Expression;

/// Convert a resolved clause payload to Cypher text
pub trait ToCypher {
    fn to_cypher(&self) -> String;
}

/// `name:Label*len {k: v}` with every empty part left out
fn entity_body(variable: &Variable, var_length: bool) -> String {
    let mut body = String::new();
    if let Some(reference) = variable.reference() {
        body.push_str(reference);
    }
    if let Some(label) = variable.label_pattern.as_deref().filter(|l| !l.is_empty()) {
        if !label.starts_with(':') {
            body.push(':');
        }
        body.push_str(label);
    }
    if var_length {
        if let Some(length) = variable.var_length.as_deref() {
            if !length.starts_with('*') {
                body.push('*');
            }
            body.push_str(length);
        }
    }

    let props = match variable.props_expr.as_deref() {
        Some(props_expr) => Some(props_expr.to_string()),
        None if !variable.properties.is_empty() => {
            let entries: Vec<String> = variable
                .properties
                .iter()
                .map(|(key, value)| format!("{}: {}", key, value))
                .collect();
            Some(format!("{{{}}}", entries.join(", ")))
        }
        None => None,
    };
    if let Some(props) = props {
        if !body.is_empty() {
            body.push(' ');
        }
        body.push_str(&props);
    }
    body
}

impl ToCypher for NodePattern {
    fn to_cypher(&self) -> String {
        format!("({})", entity_body(&self.variable, false))
    }
}

impl ToCypher for RelationshipPattern {
    fn to_cypher(&self) -> String {
        let body = entity_body(&self.variable, true);
        match (self.direction, body.is_empty()) {
            (Direction::Outgoing, true) => "-->".to_string(),
            (Direction::Incoming, true) => "<--".to_string(),
            (Direction::Undirected, true) => "--".to_string(),
            (Direction::Outgoing, false) => format!("-[{}]->", body),
            (Direction::Incoming, false) => format!("<-[{}]-", body),
            (Direction::Undirected, false) => format!("-[{}]-", body),
        }
    }
}

impl ToCypher for PatternChain {
    fn to_cypher(&self) -> String {
        let mut text = String::new();
        if let Some(path) = &self.path {
            text.push_str(path);
            text.push_str(" = ");
        }
        text.push_str(&self.start.to_cypher());
        for (relationship, node) in &self.segments {
            text.push_str(&relationship.to_cypher());
            text.push_str(&node.to_cypher());
        }
        text
    }
}

impl ToCypher for Assignment {
    fn to_cypher(&self) -> String {
        match self {
            Assignment::Property { target, value } | Assignment::Replace { target, value } => {
                format!("{} = {}", target, value)
            }
            Assignment::Labels { target, labels } => format!("{}:{}", target, labels.join(":")),
            Assignment::Merge { target, value } => format!("{} += {}", target, value),
        }
    }
}

impl ToCypher for Removal {
    fn to_cypher(&self) -> String {
        match self {
            Removal::Property(target) => target.clone(),
            Removal::Labels { target, labels } => format!("{}:{}", target, labels.join(":")),
        }
    }
}

impl ToCypher for ProjectionItem {
    fn to_cypher(&self) -> String {
        self.text.clone()
    }
}

impl ToCypher for Projection {
    fn to_cypher(&self) -> String {
        let items = join(&self.items);
        if self.distinct {
            format!("DISTINCT {}", items)
        } else {
            items
        }
    }
}

impl ToCypher for OrderItem {
    fn to_cypher(&self) -> String {
        match self.order {
            SortOrder::Ascending => self.expression.clone(),
            SortOrder::Descending => format!("{} DESC", self.expression),
        }
    }
}

impl ToCypher for Expression {
    fn to_cypher(&self) -> String {
        self.to_string()
    }
}

/// Comma-separated list of items
pub fn join<T: ToCypher>(items: &[T]) -> String {
    items
        .iter()
        .map(ToCypher::to_cypher)
        .collect::<Vec<_>>()
        .join(", ")
}
