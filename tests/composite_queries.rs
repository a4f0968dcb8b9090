use std::collections::BTreeMap;

use aqlclad::assign::assign;
use aqlclad::datatype::Tagged;
use aqlclad::filter::{clause, filter};
use aqlclad::query::{
    collect_all, insert, let_, options, ret, select, sort, update, upsert, Aql, Part, Query, Return,
};
use serde_json::json;

#[test]
fn clauses_join_with_newline_and_tab() {
    let q = select("s").in_("students")
        / filter(clause("s.name").eq(Tagged::expr("s.fathers_name")))
        / sort().asc("s._key")
        / ret("s");
    assert_eq!(
        q.to_string(),
        "FOR s IN students\n\tFILTER s.name == s.fathers_name\n\tSORT s._key ASC\n\tRETURN s"
    );
    assert_eq!(q.len(), 4);
    assert!(matches!(q.parts()[1], Part::Filter(_)));
}

#[test]
fn sequencing_queries_appends_their_parts() {
    let head = select("u").in_(json!([{"name": "tash"}])) / ret("u");
    let tail = insert("u").in_("students") / ret("NEW");
    let q = head.clone() / tail;
    assert_eq!(q.len(), 4);
    assert_eq!(head.len(), 2);
    assert_eq!(Query::new().then(ret("x")).to_string(), "RETURN x");
}

#[test]
fn let_bindings() {
    assert_eq!(let_("date").bare("DATE_NOW()").to_string(), "LET date = DATE_NOW()");
    assert_eq!(let_("name").text("tash").to_string(), "LET name = \"tash\"");
    let sub = select("l").in_("logins") / ret("l");
    assert_eq!(
        let_("logins").be(sub).to_string(),
        "LET logins = (FOR l IN logins\n\tRETURN l)"
    );
    assert_eq!(let_("xs").be(select("x").in_range(1, 3)).to_string(), "LET xs = (FOR x IN 1..3)");
}

#[test]
fn let_text_is_escaped() {
    assert_eq!(let_("n").text("a\"b").to_string(), r#"LET n = "a\"b""#);
    assert_eq!(let_("p").text("C:\\").to_string(), r#"LET p = "C:\\""#);
}

#[test]
fn nested_composite_inside_let() {
    let logins = select("login").in_("logins")
        / filter(clause("login.user").eq(Tagged::expr("user._key")))
        / collect_all().with("COUNT").in_("numLogins")
        / ret("numLogins");
    let q = let_("date").bare("DATE_NOW()")
        / select("user").in_("users")
        / filter(clause("user.isImportantUser").eq(()))
        / let_("numberOfLogins").be(logins)
        / filter(clause("numberOfLogins").gt(50))
        / update("user")
            .with(assign("isImportantUser", 1).assign("dateBecameImportant", Tagged::expr("date")))
            .in_("users");
    let expected = [
        "LET date = DATE_NOW()",
        "FOR user IN users",
        "FILTER user.isImportantUser == null",
        "LET numberOfLogins = (FOR login IN logins\n\tFILTER login.user == user._key\n\tCOLLECT WITH COUNT INTO numLogins\n\tRETURN numLogins)",
        "FILTER numberOfLogins > 50",
        "UPDATE user WITH {isImportantUser: 1, dateBecameImportant: date} IN users",
    ]
    .join("\n\t");
    assert_eq!(q.to_string(), expected);
    assert!(q.validate().is_ok());
}

#[test]
fn validation_reaches_into_let_bindings() {
    let bad = select("l").in_("logins") / filter(clause("l.user").eq(""));
    let q = select("u").in_("users") / let_("x").be(bad) / ret("u");
    assert!(q.to_aql().is_err());
}

#[test]
fn returns() {
    assert_eq!(ret("s").to_string(), "RETURN s");
    assert_eq!(ret(assign("n", Tagged::expr("u.name"))).to_string(), "RETURN {n: u.name}");
    let mut map = BTreeMap::new();
    map.insert("b".to_string(), "u.b");
    map.insert("a".to_string(), "u.a");
    assert_eq!(ret(map).to_string(), "RETURN {a: u.a, b: u.b}");
    assert_eq!(Return::object([("z", "1"), ("y", "2")]).to_string(), "RETURN {z: 1, y: 2}");
}

#[test]
fn upsert_renders_all_three_documents() {
    let u = upsert(json!({"name": "tokai"}))
        .insert(json!({"name": "tokai", "fathers_name": "tokai"}))
        .update(assign("fathers_name", "tokai"))
        .in_("students");
    assert_eq!(
        u.to_string(),
        "UPSERT {\"name\":\"tokai\"} INSERT {\"fathers_name\":\"tokai\",\"name\":\"tokai\"} UPDATE {fathers_name: \"tokai\"} IN students"
    );
}

#[test]
fn standalone_options_and_sort() {
    assert_eq!(options(json!({"waitForSync": true})).to_string(), "OPTIONS {\"waitForSync\":true}");
    assert_eq!(options(assign("exclusive", true)).to_string(), "OPTIONS {exclusive: true}");
    assert_eq!(sort().asc("a").desc("b").to_string(), "SORT a ASC, b DESC");
    let q = insert("u").in_("users") / options(json!({"ignoreErrors": true}));
    assert_eq!(q.to_string(), "INSERT u INTO users\n\tOPTIONS {\"ignoreErrors\":true}");
}

#[test]
fn traversal_inside_a_composite() {
    let q = select("v").in_("people/42").outbound("friends").depth_range(1, 3)
        / filter(clause("v.age").gt(30))
        / ret("v");
    assert_eq!(
        q.to_string(),
        "FOR v IN 1..3 ANY \"people/42\" OUTBOUND friends\n\tFILTER v.age > 30\n\tRETURN v"
    );
}
