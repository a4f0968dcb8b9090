use aqlclad::datatype::Tagged;
use aqlclad::filter::{clause, filter, Combinator, Condition, Junction, Operator};
use aqlclad::query::Aql;
use aqlclad::AqlcladError;
use serde_json::json;

#[test]
fn clause_quotes_only_text() {
    assert_eq!(clause("a").eq(1).to_string(), "a == 1");
    assert_eq!(clause("a").eq("x").to_string(), "a == \"x\"");
    assert_eq!(clause("a").ne(2.5).to_string(), "a != 2.5");
    assert_eq!(clause("a").eq(false).to_string(), "a == false");
    assert_eq!(clause("a").eq(()).to_string(), "a == null");
    assert_eq!(clause("s.name").eq(Tagged::expr("s.fathers_name")).to_string(), "s.name == s.fathers_name");
}

#[test]
fn tags_report_their_kind() {
    let kinds: Vec<(&str, bool)> = [
        Tagged::from("x"),
        Tagged::from(1),
        Tagged::from(true),
        Tagged::from(()),
        Tagged::expr("doc._key"),
        Tagged::from(json!([1])),
        Tagged::from(f64::NAN),
    ]
    .iter()
    .map(|t| (t.data_type(), t.is_quoted()))
    .collect();
    assert_eq!(
        kinds,
        vec![
            ("Text", true),
            ("Number", false),
            ("Bool", false),
            ("Null", false),
            ("Expr", false),
            ("Json", false),
            ("NonFinite", false),
        ]
    );
}

#[test]
fn text_cannot_close_its_literal() {
    let sneaky = filter(clause("u.name").eq("x\" || true || \""));
    assert_eq!(sneaky.to_string(), r#"FILTER u.name == "x\" || true || \"""#);
    assert_eq!(clause("p").eq("C:\\").to_string(), r#"p == "C:\\""#);
    assert_eq!(clause("s").eq("a\nb").to_string(), r#"s == "a\nb""#);
}

#[test]
fn non_finite_numbers_fail_validation() {
    for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
        let c = clause("a").eq(value);
        assert!(!c.is_valid());
        assert!(matches!(c.validate(), Err(AqlcladError::MalformedPredicate { .. })));
    }
    assert!(filter(clause("a").eq(f32::NAN)).to_aql().is_err());
    assert!(clause("a").eq(1.5).is_valid());
}

#[test]
fn every_operator_has_its_symbol() {
    let f = clause("k");
    let rendered: Vec<String> = vec![
        f.like("%x%"),
        f.in_(json!([1, 2])),
        f.not_in(json!(["a"])),
        f.eq(1),
        f.ne(1),
        f.lt(1),
        f.gt(1),
        f.le(1),
        f.ge(1),
    ]
    .into_iter()
    .map(|c| c.to_string())
    .collect();
    assert_eq!(
        rendered,
        vec![
            "k LIKE \"%x%\"",
            "k IN [1,2]",
            "k NOT IN [\"a\"]",
            "k == 1",
            "k != 1",
            "k < 1",
            "k > 1",
            "k <= 1",
            "k >= 1",
        ]
    );
    assert_eq!(clause("k").ge(1).operator(), Operator::Ge);
}

#[test]
fn shapes_follow_operand_kinds() {
    let a = clause("a").eq(1);
    let b = clause("b").eq(2);
    let leaf = &a & &b;
    assert!(matches!(leaf, Junction::Leaf { op: Combinator::And, .. }));
    assert_eq!(leaf.op(), Combinator::And);
    let mixed = &a | &leaf;
    match &mixed {
        Junction::Mixed { op, left, right } => {
            assert_eq!(*op, Combinator::Or);
            assert_eq!(**left, leaf, "the junction operand is normalized to the left");
            assert_eq!(*right, a);
        }
        other => panic!("expected a mixed junction, got {:?}", other),
    }
    let compound = &leaf & &mixed;
    assert!(matches!(compound, Junction::Compound { op: Combinator::And, .. }));
    assert_eq!(mixed.op(), Combinator::Or);
    assert_eq!(compound.op(), Combinator::And);
}

#[test]
fn leaf_prints_without_parentheses() {
    let leaf = clause("a").eq(1) & clause("b").eq("x");
    assert_eq!(leaf.to_string(), "a == 1 AND b == \"x\"");
}

#[test]
fn composition_is_fully_parenthesized() {
    let a = clause("A").eq(1);
    let b = clause("B").eq(2);
    let c = clause("C").eq(3);
    let d = clause("D").eq(4);
    assert_eq!(((&a & &b) | &c).to_string(), "((A == 1 AND B == 2) OR C == 3)");
    assert_eq!(
        ((&a & &b) | (&c & &d)).to_string(),
        "((A == 1 AND B == 2) OR (C == 3 AND D == 4))"
    );
    assert_eq!(
        (((&a & &b) | &c) & &d).to_string(),
        "(((A == 1 AND B == 2) OR C == 3) AND D == 4)"
    );
}

#[test]
fn operand_order_is_preserved() {
    let a = clause("a").eq(1);
    let b = clause("b").eq(2);
    assert_eq!((&a | &b).to_string(), "a == 1 OR b == 2");
    assert_eq!((&b | &a).to_string(), "b == 2 OR a == 1");
}

#[test]
fn recombining_leaves_operands_untouched() {
    let a = clause("a").eq(1);
    let b = clause("b").eq(2);
    let c = clause("c").eq(3);
    let x = &a & &b;
    let before = x.to_string();
    let y = &x | &c;
    let z = x.or(&c).and(&y);
    assert_eq!(x.to_string(), before);
    assert_eq!(y.to_string(), "((a == 1 AND b == 2) OR c == 3)");
    assert_eq!(
        z.to_string(),
        "(((a == 1 AND b == 2) OR c == 3) AND ((a == 1 AND b == 2) OR c == 3))"
    );
    assert_eq!(a.to_string(), "a == 1");
}

#[test]
fn methods_match_operators() {
    let a = clause("a").eq(1);
    let b = clause("b").eq(2);
    assert_eq!(a.and(&b), &a & &b);
    assert_eq!(a.or(&b), &a | &b);
}

#[test]
fn filter_wraps_clauses_and_junctions() {
    let a = clause("u.age").ge(18);
    assert_eq!(filter(&a).to_string(), "FILTER u.age >= 18");
    let j = &a & clause("u.name").like("N%");
    assert_eq!(filter(j).to_string(), "FILTER u.age >= 18 AND u.name LIKE \"N%\"");
    assert!(matches!(filter(&a).condition(), Condition::Clause(_)));
}

#[test]
fn empty_key_or_value_is_rejected() {
    assert!(!clause("").eq(1).is_valid());
    assert!(!clause("a").eq("").is_valid());
    assert!(!clause("a").eq(Tagged::expr("")).is_valid());
    assert!(clause("a").eq(0).is_valid());

    let broken = clause("a").eq(1) | clause("b").eq("");
    let err = broken.validate().unwrap_err();
    assert!(matches!(err, AqlcladError::MalformedPredicate { .. }));
    assert!(format!("{}", err).contains("Malformed predicate"));

    let nested = filter((clause("a").eq(1) & clause("b").eq(2)) | clause("").eq(3));
    assert!(nested.to_aql().is_err());
    assert_eq!(filter(clause("a").eq(1)).to_aql().unwrap(), "FILTER a == 1");
}
