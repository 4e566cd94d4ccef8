//! SET and REMOVE items.

use super::ast::{Identifier, RemoveItem, SetItem};

/// `target = value`, where `target` is a property such as `n.name` or an
/// entity field
pub fn set_prop_value(target: impl Into<Identifier>, value: impl Into<Identifier>) -> SetItem {
    SetItem::Property {
        target: target.into(),
        value: value.into(),
    }
}

/// `target:L1:L2`
pub fn set_labels<L: Into<String>>(
    target: impl Into<Identifier>,
    labels: impl IntoIterator<Item = L>,
) -> SetItem {
    SetItem::Labels {
        target: target.into(),
        labels: labels.into_iter().map(Into::into).collect(),
    }
}

/// `target += value`
pub fn set_merge(target: impl Into<Identifier>, value: impl Into<Identifier>) -> SetItem {
    SetItem::Merge {
        target: target.into(),
        value: value.into(),
    }
}

/// `target = value`, replacing every property of an entity
pub fn set_props(target: impl Into<Identifier>, value: impl Into<Identifier>) -> SetItem {
    SetItem::Replace {
        target: target.into(),
        value: value.into(),
    }
}

pub fn remove_prop(target: impl Into<Identifier>) -> RemoveItem {
    RemoveItem::Property(target.into())
}

/// `target:L1:L2`
pub fn remove_labels<L: Into<String>>(
    target: impl Into<Identifier>,
    labels: impl IntoIterator<Item = L>,
) -> RemoveItem {
    RemoveItem::Labels {
        target: target.into(),
        labels: labels.into_iter().map(Into::into).collect(),
    }
}
