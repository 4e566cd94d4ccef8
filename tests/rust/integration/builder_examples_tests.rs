// One test per documented builder usage, compared against the exact text
use cyphercraft::query_builder::{
    and, cond, label, name, named_param, node, not, or, path, props, qual, qual_with,
    remove_labels, set_prop_value, var, var_length, var_with, xor, Identifier, SortItem,
};
use serde_json::json;

use super::fixtures::*;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn test_anonymous_identifiers() -> TestResult {
    let compiled = client().match_(node(()).to("e", ())).compile()?;
    assert_eq!(compiled.cypher, "MATCH ()-[e]->()");
    Ok(())
}

#[test]
fn test_name_identifier() -> TestResult {
    let compiled = client().match_(node("n")).with(["n"]).compile()?;
    assert_eq!(compiled.cypher, "MATCH (n)\nWITH n");
    Ok(())
}

#[test]
fn test_expression_identifier() -> TestResult {
    let compiled = client().with([qual("timestamp()", "t")?]).compile()?;
    assert_eq!(compiled.cypher, "WITH timestamp() AS t");
    Ok(())
}

#[test]
fn test_token_identifier_requalified() -> TestResult {
    let mut client = client();
    let p = client.token();
    let compiled = client
        .with([qual(p, "pName")?])
        .return_([qual(p, "pDiffName")?])
        .compile()?;
    assert_eq!(compiled.cypher, "WITH pName\nRETURN pName AS pDiffName");
    assert_eq!(compiled.bindings, vec![("pDiffName".to_string(), p)]);
    Ok(())
}

#[test]
fn test_named_parameter_identifier() -> TestResult {
    let mut client = client();
    let n = client.token();
    let compiled = client
        .unwind(named_param("var", json!(["a", "b", "c"])), "n")
        .with([qual(n, "n")?])
        .return_([n])
        .compile()?;
    assert_eq!(compiled.cypher, "UNWIND $var AS n\nWITH n\nRETURN n");
    assert_eq!(compiled.parameters.get("var"), Some(&json!(["a", "b", "c"])));
    assert_eq!(compiled.destination("n"), Some(n));
    Ok(())
}

#[test]
fn test_field_identifiers() -> TestResult {
    let mut client = client();
    let older = client.entity::<Person>()?;
    let younger = client.entity::<Person>()?;
    let knows = client.type_value::<Knows>()?;
    let compiled = client
        .match_(node(qual(&older, "older")?).to(knows, qual(&younger, "younger")?))
        .where_(cond(older.field("age")?, ">", younger.field("age")?))
        .return_([older.field("name")?, younger.field("name")?])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (older:Person)-[:KNOWS]->(younger:Person)\n\
         WHERE older.age > younger.age\n\
         RETURN older.name, younger.name"
    );
    Ok(())
}

#[test]
fn test_match_type_value_with_props() -> TestResult {
    let mut client = client();
    let person = client.type_value::<Person>()?;
    let movie = client.entity::<Movie>()?;
    let compiled = client
        .match_(node(var_with(person, [props([("name", "'Oliver Stone'")])])).to((), "movie"))
        .return_([qual(movie.field("title")?, "movie.title")?])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (:Person {name: 'Oliver Stone'})-->(movie)\nRETURN movie.title"
    );
    Ok(())
}

#[test]
fn test_optional_match() -> TestResult {
    let mut client = client();
    let a = client.entity::<Person>()?;
    let r = client.entity::<Directed>()?;
    let compiled = client
        .match_(node(qual_with(&a, "a", [props([("name", "'Martin Sheen'")])])?))
        .optional_match(node(&a).to(qual(&r, "r")?, ()))
        .return_([a.field("name")?, Identifier::from(&r)])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (a:Person {name: 'Martin Sheen'})\n\
         OPTIONAL MATCH (a)-[r:DIRECTED]->()\n\
         RETURN a.name, r"
    );
    assert_eq!(compiled.bindings, vec![("r".to_string(), r.token())]);
    Ok(())
}

#[test]
fn test_return_field_alias() -> TestResult {
    let mut client = client();
    let p = client.entity::<Person>()?;
    let compiled = client
        .match_(node(qual_with(&p, "p", [props([("name", "'Keanu Reeves'")])])?))
        .return_([qual(p.field("nationality")?, "citizenship")?])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (p:Person {name: 'Keanu Reeves'})\nRETURN p.nationality AS citizenship"
    );
    Ok(())
}

#[test]
fn test_with_order_by_limit() -> TestResult {
    let mut client = client();
    let names = client.token();
    let compiled = client
        .match_(node(var_with("n", [props([("name", "'Anders'")])])).related((), "m"))
        .with(["m"])
        .order_by([SortItem::desc("m.name")])
        .limit(1)
        .match_(node("m").related((), "o"))
        .return_([qual(names, "o.name")?])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (n {name: 'Anders'})--(m)\n\
         WITH m\n\
         ORDER BY m.name DESC\n\
         LIMIT 1\n\
         MATCH (m)--(o)\n\
         RETURN o.name"
    );
    Ok(())
}

#[test]
fn test_subquery_shares_variables() -> TestResult {
    let mut client = client();
    let p = client.entity::<Person>()?;
    let num_conn = client.token();
    let counted = qual_with(num_conn, "count(c)", [name("numberOfConnections")])?;
    let compiled = client
        .match_(node(qual(&p, "p")?))
        .subquery(|c| {
            c.with([&p])
                .match_(node(&p).related((), var("c")))
                .return_([counted])
        })
        .return_([p.field("name")?, Identifier::from(num_conn)])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (p:Person)\n\
         CALL {\n  \
           WITH p\n  \
           MATCH (p)--(c)\n  \
           RETURN count(c) AS numberOfConnections\n\
         }\n\
         RETURN p.name, numberOfConnections"
    );
    assert_eq!(
        compiled.bindings,
        vec![("numberOfConnections".to_string(), num_conn)]
    );
    Ok(())
}

#[test]
fn test_call_yield() -> TestResult {
    let mut client = client();
    let labels = client.token();
    let compiled = client
        .call("db.labels()")
        .yield_([qual(labels, "label")?])
        .return_([labels])
        .compile()?;
    assert_eq!(compiled.cypher, "CALL db.labels()\nYIELD label\nRETURN label");
    Ok(())
}

#[test]
fn test_show_yield_where() -> TestResult {
    let mut client = client();
    let proc_name = client.token();
    let signature = client.token();
    let compiled = client
        .show("PROCEDURES")
        .yield_([qual(proc_name, "name")?, qual(signature, "signature")?])
        .where_(cond(proc_name, "=", "'dbms.listConfig'"))
        .return_([signature])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "SHOW PROCEDURES\n\
         YIELD name, signature\n\
         WHERE name = 'dbms.listConfig'\n\
         RETURN signature"
    );
    Ok(())
}

#[test]
fn test_unwind_merge() -> TestResult {
    let mut client = client();
    let y = client.entity::<Year>()?;
    let e = client.entity::<Event>()?;
    let relation = client.type_value::<In>()?;
    let events = json!([{"id": 1, "year": 2014}, {"id": 2, "year": 2015}]);
    let compiled = client
        .unwind(named_param("events", events.clone()), "event")
        .merge(node(qual_with(&y, "y", [props([("year", "event.year")])])?))
        .merge(node(&y).from(relation, qual_with(&e, "e", [props([("id", "event.id")])])?))
        .return_([qual(e.field("id")?, "x")?])
        .order_by(["x"])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "UNWIND $events AS event\n\
         MERGE (y:Year {year: event.year})\n\
         MERGE (y)<-[:IN]-(e:Event {id: event.id})\n\
         RETURN e.id AS x\n\
         ORDER BY x"
    );
    assert_eq!(compiled.parameters.get("events"), Some(&events));
    Ok(())
}

#[test]
fn test_raw_cypher() -> TestResult {
    let mut client = client();
    let n = client.token();
    let compiled = client
        .match_(node(qual(n, "n")?))
        .cypher("WHERE n.name = 'Bob'")
        .return_([n])
        .compile()?;
    assert_eq!(compiled.cypher, "MATCH (n)\nWHERE n.name = 'Bob'\nRETURN n");
    Ok(())
}

#[test]
fn test_use_database() -> TestResult {
    let mut client = client();
    let n = client.token();
    let compiled = client
        .use_("myDatabase")
        .match_(node(qual(n, "n")?))
        .return_(["n"])
        .compile()?;
    assert_eq!(compiled.cypher, "USE myDatabase\nMATCH (n)\nRETURN n");
    Ok(())
}

#[test]
fn test_create_path() -> TestResult {
    let mut client = client();
    let person = client.type_value::<Person>()?;
    let company = client.type_value::<Company>()?;
    let works_at = client.type_value::<WorksAt>()?;
    let p = client.token();
    let compiled = client
        .create(path(
            node(var_with(person.clone(), [props([("name", "'Andy'")])]))
                .to(works_at.clone(), var_with(company, [props([("name", "'Neo4j'")])]))
                .from(works_at, var_with(person, [props([("name", "'Michael'")])])),
            "p",
        ))
        .return_([qual(p, "p")?])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "CREATE p = (:Person {name: 'Andy'})-[:WORKS_AT]->(:Company {name: 'Neo4j'})\
         <-[:WORKS_AT]-(:Person {name: 'Michael'})\n\
         RETURN p"
    );
    Ok(())
}

#[test]
fn test_merge_on_match() -> TestResult {
    let mut client = client();
    let person = client.entity::<Person>()?;
    let compiled = client
        .merge(node(qual(&person, "person")?))
        .on_match([
            set_prop_value(person.field("found")?, true),
            set_prop_value(person.field("last_seen")?, "timestamp()"),
        ])
        .return_([
            person.field("name")?,
            person.field("found")?,
            person.field("last_seen")?,
        ])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MERGE (person:Person)\n\
         ON MATCH\n  \
           SET\n    \
             person.found = true,\n    \
             person.lastSeen = timestamp()\n\
         RETURN person.name, person.found, person.lastSeen"
    );
    Ok(())
}

#[test]
fn test_delete_relationship() -> TestResult {
    let mut client = client();
    let n = client.entity::<Person>()?;
    let r = client.entity::<ActedIn>()?;
    let compiled = client
        .match_(
            node(qual_with(&n, "n", [props([("name", "'Laurence Fishburne'")])])?)
                .to(qual(&r, "r")?, ()),
        )
        .delete([&r])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (n:Person {name: 'Laurence Fishburne'})-[r:ACTED_IN]->()\nDELETE r"
    );
    Ok(())
}

#[test]
fn test_detach_delete() -> TestResult {
    let mut client = client();
    let n = client.entity::<Person>()?;
    let compiled = client
        .match_(node(qual_with(&n, "n", [props([("name", "'Carrie-Anne Moss'")])])?))
        .detach_delete([&n])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (n:Person {name: 'Carrie-Anne Moss'})\nDETACH DELETE n"
    );
    Ok(())
}

#[test]
fn test_set_block() -> TestResult {
    let mut client = client();
    let n = client.entity::<Person>()?;
    let compiled = client
        .match_(node(qual_with(&n, "n", [props([("name", "'Andy'")])])?))
        .set([
            set_prop_value(n.field("position")?, "'Developer'"),
            set_prop_value(n.field("surname")?, "'Taylor'"),
        ])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (n:Person {name: 'Andy'})\n\
         SET\n  \
           n.position = 'Developer',\n  \
           n.surname = 'Taylor'"
    );
    Ok(())
}

#[test]
fn test_remove_labels() -> TestResult {
    let mut client = client();
    let n = client.entity::<Person>()?;
    let labels = client.token();
    let compiled = client
        .match_(node(qual_with(&n, "n", [props([("name", "'Peter'")])])?))
        .remove([remove_labels(&n, ["German", "Swedish"])])
        .return_([var(n.field("name")?), qual(labels, "labels(n)")?])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (n:Person {name: 'Peter'})\n\
         REMOVE n:German:Swedish\n\
         RETURN n.name, labels(n)"
    );
    Ok(())
}

#[test]
fn test_for_each() -> TestResult {
    let compiled = client()
        .match_(path(
            node("start").to(var_with((), [var_length("*")]), "finish"),
            "p",
        ))
        .where_(and([
            cond("start.name", "=", "'A'"),
            cond("finish.name", "=", "'D'"),
        ])?)
        .for_each("n", "nodes(p)", |u| u.set([set_prop_value("n.marked", true)]))
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH p = (start)-[*]->(finish)\n\
         WHERE start.name = 'A' AND finish.name = 'D'\n\
         FOREACH (n IN nodes(p) | SET n.marked = true)"
    );
    Ok(())
}

#[test]
fn test_where_mixed_boolean_operators() -> TestResult {
    let mut client = client();
    let n = client.entity::<Person>()?;
    let condition = or([
        xor([
            cond(n.field("name")?, "=", "'Peter'"),
            and([
                cond(n.field("age")?, "<", 30),
                cond(n.field("name")?, "=", "'Timothy'"),
            ])?,
        ])?,
        not(or([
            cond(n.field("name")?, "=", "'Timothy'"),
            cond(n.field("name")?, "=", "'Peter'"),
        ])?),
    ])?;
    let compiled = client
        .match_(node(qual(&n, "n")?))
        .where_(condition)
        .return_([qual(n.field("name")?, "name")?, qual(n.field("age")?, "age")?])
        .order_by(["name"])
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (n:Person)\n\
         WHERE (n.name = 'Peter' XOR (n.age < 30 AND n.name = 'Timothy')) OR NOT (n.name = 'Timothy' OR n.name = 'Peter')\n\
         RETURN n.name AS name, n.age AS age\n\
         ORDER BY name"
    );
    Ok(())
}

#[test]
fn test_union_of_labels() -> TestResult {
    let mut client = client();
    let title = client.token();
    let person_name = qual_with(title, "n.name", [name("name")])?;
    let movie_title = qual_with(title, "n.title", [name("name")])?;
    let compiled = client
        .union(
            move |c| {
                c.match_(node(var_with("n", [label("Person")])))
                    .return_([person_name])
            },
            move |c| {
                c.match_(node(var_with("n", [label("Movie")])))
                    .return_([movie_title])
            },
        )
        .compile()?;
    assert_eq!(
        compiled.cypher,
        "MATCH (n:Person)\n\
         RETURN n.name AS name\n\
         UNION\n\
         MATCH (n:Movie)\n\
         RETURN n.title AS name"
    );
    assert_eq!(compiled.bindings, vec![("name".to_string(), title)]);
    Ok(())
}
