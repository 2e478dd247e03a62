use super::{and, bean, eq, gt, like, like_ci, lt, or};
use crate::{
    operator::{FieldMapContext, Operator},
    value::Value,
};

fn canonical(op: &Operator) -> String {
    op.canonical().to_string()
}

#[test]
fn and_with_false_is_false_regardless_of_order() {
    let x = eq("x", 1);
    let orders = [
        and([Operator::TRUE, x.clone(), Operator::FALSE]),
        and([Operator::FALSE, Operator::TRUE, x.clone()]),
        and([x.clone(), Operator::FALSE, Operator::TRUE]),
    ];

    for op in &orders {
        assert_eq!(op.canonical(), Operator::FALSE);
    }
}

#[test]
fn or_with_true_is_true() {
    let op = or([eq("x", 1), Operator::TRUE, like("name", "a?")]);
    assert_eq!(op.canonical(), Operator::TRUE);
}

#[test]
fn identity_elements_are_dropped() {
    let x = gt("x", 3);
    assert_eq!(canonical(&and([Operator::TRUE, x.clone()])), canonical(&x));
    assert_eq!(canonical(&or([Operator::FALSE, x.clone()])), canonical(&x));
    assert_eq!(and([Operator::TRUE, Operator::TRUE]).canonical(), Operator::TRUE);
    assert_eq!(or([Operator::FALSE]).canonical(), Operator::FALSE);
}

#[test]
fn operand_order_and_nesting_do_not_matter() {
    let (a, b, c) = (eq("a", 1), eq("b", 2), eq("c", 3));

    assert_eq!(
        canonical(&and([a.clone(), b.clone()])),
        canonical(&and([b.clone(), a.clone()]))
    );
    assert_eq!(
        canonical(&and([a.clone(), and([b.clone(), c.clone()])])),
        canonical(&and([a.clone(), b.clone(), c.clone()]))
    );
    assert_eq!(
        canonical(&or([or([c.clone(), a.clone()]), b.clone()])),
        "equals(a, 1) || equals(b, 2) || equals(c, 3)"
    );
}

#[test]
fn duplicate_operands_collapse() {
    let a = eq("a", 1);
    assert_eq!(and([a.clone(), a.clone()]).canonical(), a);
    assert_eq!(
        canonical(&or([a.clone(), eq("b", 2), a.clone()])),
        "equals(a, 1) || equals(b, 2)"
    );
}

#[test]
fn and_distributes_over_or() {
    let op = and([
        eq("age", 30),
        or([eq("city", "NYC"), eq("city", "LA")]),
    ]);

    assert_eq!(
        canonical(&op),
        "(equals(age, 30) && equals(city, \"LA\")) || (equals(age, 30) && equals(city, \"NYC\"))"
    );

    let expected = or([
        and([eq("age", 30), eq("city", "LA")]),
        and([eq("age", 30), eq("city", "NYC")]),
    ]);
    assert_eq!(op.canonical(), expected);
}

#[test]
fn distribution_crosses_every_or_group() {
    let op = and([or([eq("a", 1), eq("a", 2)]), or([eq("b", 1), eq("b", 2)])]);
    let Operator::Or(terms) = op.canonical() else {
        panic!("expected a disjunction");
    };

    let rendered: Vec<String> = terms.operands().iter().map(ToString::to_string).collect();
    assert_eq!(
        rendered,
        vec![
            "equals(a, 1) && equals(b, 1)",
            "equals(a, 1) && equals(b, 2)",
            "equals(a, 2) && equals(b, 1)",
            "equals(a, 2) && equals(b, 2)",
        ]
    );
}

#[test]
fn distributed_duplicates_collapse() {
    let a = eq("a", 1);
    let op = and([or([a.clone(), a.clone()]), a.clone()]);
    assert_eq!(op.canonical(), a);
}

#[test]
fn double_negation_is_eliminated() {
    let x = lt("x", 5);
    assert_eq!(Operator::not(Operator::not(x.clone())).canonical(), x);
    assert_eq!(Operator::not(Operator::TRUE).canonical(), Operator::FALSE);
    assert_eq!(Operator::not(Operator::FALSE).canonical(), Operator::TRUE);
}

#[test]
fn negation_is_pushed_to_leaves() {
    let op = Operator::not(or([eq("a", 1), and([eq("b", 2), eq("c", 3)])]));
    assert_eq!(
        canonical(&op),
        "(!equals(a, 1) && !equals(b, 2)) || (!equals(a, 1) && !equals(c, 3))"
    );

    let op = Operator::not(and([eq("a", 1), eq("b", 2)]));
    assert_eq!(canonical(&op), "!equals(a, 1) || !equals(b, 2)");
}

#[test]
fn fixed_case_sensitive_like_becomes_equality() {
    assert_eq!(like("name", "foo").canonical(), eq("name", "foo"));
    assert_eq!(like("name", r"f\*o").canonical(), eq("name", "f*o"));
}

#[test]
fn literals_spelling_non_text_values_stay_patterns() {
    for text in ["5", "-12", "true", "false", "2.5", "1e300", "NaN", "inf"] {
        let op = like("v", text);
        assert_eq!(op.canonical(), op, "pattern {text:?}");
    }
    assert_eq!(like("v", "05").canonical(), eq("v", "05"));
    assert_eq!(like("v", "True").canonical(), eq("v", "True"));
}

#[test]
fn case_insensitive_like_is_not_folded_to_equality() {
    let op = like_ci("name", "foo");
    assert_eq!(op.canonical(), op);
}

#[test]
fn star_like_becomes_not_null() {
    let expected = Operator::not(eq("name", Value::Null));
    assert_eq!(like("name", "*").canonical(), expected);
    assert_eq!(like("name", "**").canonical(), expected);
    assert_eq!(like_ci("name", "*").canonical(), expected);
    assert_eq!(canonical(&like("name", "*")), "!equals(name, null)");
}

#[test]
fn other_like_patterns_stay_as_patterns() {
    for text in ["fo*", "?", "", "[ab]"] {
        let op = like("name", text);
        assert_eq!(op.canonical(), op, "pattern {text:?}");
    }
}

#[test]
fn negated_star_like_becomes_null_test() {
    let op = Operator::not(like("name", "*"));
    assert_eq!(op.canonical(), eq("name", Value::Null));
}

#[test]
fn in_lists_are_sorted_and_deduplicated() {
    let op = Operator::in_("id", [3, 1, 3, 2]).expect("valid");
    assert_eq!(canonical(&op), "isIn(id, {1, 2, 3})");

    let single = Operator::in_("id", [7, 7]).expect("valid");
    assert_eq!(single.canonical(), eq("id", 7));
}

#[test]
fn canonical_text_matches_rendered_canonical() {
    let op = and([eq("b", 2), eq("a", 1)]);
    assert_eq!(op.canonical_text(), "equals(a, 1) && equals(b, 2)");
}

#[test]
fn canonicalization_is_idempotent_on_mixed_tree() {
    let op = and([
        Operator::not(or([like("s", "x*"), eq("a", 1)])),
        or([gt("a", 0), like("s", "*"), Operator::in_("a", [2, 1]).expect("valid")]),
        Operator::TRUE,
    ]);

    let once = op.canonical();
    let twice = once.canonical();
    assert_eq!(once.to_string(), twice.to_string());
    assert_eq!(once, twice);
}

#[test]
fn attributes_spelling_separators_stay_distinct_operands() {
    let tricky = eq("a, 1) && equals(b", 1);
    let plain = and([eq("a", 1), eq("b", 1)]);
    assert_ne!(tricky.to_string(), plain.to_string());

    let op = or([tricky, plain]);
    let canonical = op.canonical();
    assert_eq!(canonical.operand_count(), 2);

    let row = bean(&[
        ("a", Value::Int(1)),
        ("b", Value::Int(1)),
        ("a, 1) && equals(b", Value::Int(0)),
    ]);
    assert_eq!(op.evaluate(&FieldMapContext, &row), Ok(true));
    assert_eq!(canonical.evaluate(&FieldMapContext, &row), Ok(true));
}
