use aqlclad::assign::{assign, Assignment};
use aqlclad::datatype::Tagged;
use serde_json::json;

#[test]
fn order_and_quoting_are_preserved() {
    let patch = assign("x", 1).assign("y", "s");
    assert_eq!(patch.to_string(), "{x: 1, y: \"s\"}");
}

#[test]
fn null_bool_and_expressions_are_bare() {
    let patch = assign("gone", ())
        .assign("flag", true)
        .assign("when", Tagged::expr("DATE_NOW()"))
        .assign("ratio", 0.5)
        .assign("missing", None::<i64>);
    assert_eq!(
        patch.to_string(),
        "{gone: null, flag: true, when: DATE_NOW(), ratio: 0.5, missing: null}"
    );
}

#[test]
fn duplicate_keys_are_emitted_twice() {
    let patch = assign("k", 1).assign("k", 2);
    assert_eq!(patch.len(), 2);
    assert_eq!(patch.to_string(), "{k: 1, k: 2}");
}

#[test]
fn extending_a_chain_keeps_the_prefix() {
    let base = assign("a", 1);
    let longer = base.clone().assign("b", 2);
    assert_eq!(base.to_string(), "{a: 1}");
    assert_eq!(longer.to_string(), "{a: 1, b: 2}");
    let keys: Vec<&str> = longer.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, vec!["a", "b"]);
}

#[test]
fn json_values_keep_their_kind() {
    let patch = assign("name", json!("tash"))
        .assign("age", json!(7))
        .assign("tags", json!(["a", "b"]));
    assert_eq!(patch.to_string(), "{name: \"tash\", age: 7, tags: [\"a\",\"b\"]}");
}

#[test]
fn empty_chain_renders_braces() {
    let empty = Assignment::default();
    assert!(empty.is_empty());
    assert_eq!(empty.to_string(), "{}");
}
