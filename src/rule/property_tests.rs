//! Property tests for the rule module
//!
//! Covers tree shape, precedence, evaluation and rewriting over generated
//! rules built from the default attribute allow-list.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::config::RuleConfig;
use crate::rule::ast::Node;
use crate::rule::cache::RuleCache;
use crate::rule::evaluator::{evaluate, AttributeValue};
use crate::rule::mutator::modify;
use crate::rule::parser::parse;

// ═══════════════════════════════════════════════════════════════════════════
// Strategy generators for property tests
// ═══════════════════════════════════════════════════════════════════════════

/// Generate comparison operators
fn comparison_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        Just(">"),
        Just("<"),
        Just(">="),
        Just("<="),
        Just("=="),
        Just("!="),
    ]
}

/// Generate conjunctions
fn conjunction_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("AND"), Just("OR")]
}

/// Generate departments, some of them with spaces
fn department_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Sales".to_string()),
        Just("HR".to_string()),
        Just("Marketing".to_string()),
        Just("Human Resources".to_string()),
        "[A-Z][a-z]{1,8}",
    ]
}

/// Generate an `age` condition
fn age_condition_strategy() -> impl Strategy<Value = String> {
    (comparison_strategy(), 0..=120u32).prop_map(|(op, val)| format!("age {} {}", op, val))
}

/// Generate a `department` condition
fn department_condition_strategy() -> impl Strategy<Value = String> {
    (comparison_strategy(), department_strategy())
        .prop_map(|(op, dept)| format!("department {} '{}'", op, dept))
}

fn condition_strategy() -> impl Strategy<Value = String> {
    prop_oneof![age_condition_strategy(), department_condition_strategy()]
}

/// Generate attribute data, sometimes missing fields
fn attributes_strategy() -> impl Strategy<Value = HashMap<String, AttributeValue>> {
    (
        prop::option::of(0..=120i64),
        prop::option::of(department_strategy()),
    )
        .prop_map(|(age, dept)| {
            let mut map = HashMap::new();
            if let Some(age) = age {
                map.insert("age".to_string(), AttributeValue::Integer(age));
            }
            if let Some(dept) = dept {
                map.insert("department".to_string(), AttributeValue::String(dept));
            }
            map
        })
}

fn parse_default(rule: &str) -> Node {
    parse(rule, &RuleConfig::default()).unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// Property Tests
// ═══════════════════════════════════════════════════════════════════════════

proptest! {
    /// Two-clause rules keep both operands verbatim under the conjunction
    #[test]
    fn prop_two_clause_shape(
        left in condition_strategy(),
        conj in conjunction_strategy(),
        right in condition_strategy()
    ) {
        let rule = format!("{} {} {}", left, conj, right);
        let ast = parse_default(&rule);

        prop_assert_eq!(ast.value(), conj);
        prop_assert_eq!(ast.left().unwrap().value(), left);
        prop_assert_eq!(ast.right().unwrap().value(), right);
    }

    /// `C1 AND C2 OR C3` always splits on the OR
    #[test]
    fn prop_or_is_outermost(
        c1 in condition_strategy(),
        c2 in condition_strategy(),
        c3 in condition_strategy()
    ) {
        let ast = parse_default(&format!("{} AND {} OR {}", c1, c2, c3));

        prop_assert_eq!(ast.value(), "OR");
        let left = ast.left().unwrap();
        prop_assert_eq!(left.value(), "AND");
        prop_assert_eq!(left.left().unwrap().value(), c1);
        prop_assert_eq!(left.right().unwrap().value(), c2);
        prop_assert_eq!(ast.right().unwrap().value(), c3);
    }

    /// Bare words where a quoted string belongs are always rejected
    #[test]
    fn prop_unquoted_string_rejected(
        op in comparison_strategy(),
        word in "[A-Z][a-z]{1,8}"
    ) {
        let rule = format!("age > 30 AND department {} {}", op, word);
        prop_assert!(parse(&rule, &RuleConfig::default()).is_err());
    }

    /// Unknown attributes are rejected whatever the rule looks like
    #[test]
    fn prop_unknown_attribute_rejected(
        attr in "[a-z]{3,10}",
        op in comparison_strategy(),
        val in 0..=1000u32
    ) {
        prop_assume!(attr != "age" && attr != "department");
        let rule = format!("{} {} {}", attr, op, val);
        prop_assert!(parse(&rule, &RuleConfig::default()).is_err());
    }

    /// Evaluating twice gives the same answer and leaves the tree untouched
    #[test]
    fn prop_evaluation_idempotent(
        c1 in condition_strategy(),
        conj in conjunction_strategy(),
        c2 in condition_strategy(),
        data in attributes_strategy()
    ) {
        let ast = parse_default(&format!("{} {} {}", c1, conj, c2));
        let before = ast.clone();

        let first = evaluate(&ast, &data);
        let second = evaluate(&ast, &data);

        prop_assert_eq!(first, second);
        prop_assert_eq!(ast, before);
    }

    /// Age comparisons match native integer comparison
    #[test]
    fn prop_age_comparisons(age in 0..=120i64, threshold in 0..=120u32) {
        let mut data = HashMap::new();
        data.insert("age".to_string(), AttributeValue::Integer(age));
        let t = threshold as i64;

        prop_assert_eq!(evaluate(&parse_default(&format!("age > {}", threshold)), &data), age > t);
        prop_assert_eq!(evaluate(&parse_default(&format!("age < {}", threshold)), &data), age < t);
        prop_assert_eq!(evaluate(&parse_default(&format!("age >= {}", threshold)), &data), age >= t);
        prop_assert_eq!(evaluate(&parse_default(&format!("age <= {}", threshold)), &data), age <= t);
        prop_assert_eq!(evaluate(&parse_default(&format!("age == {}", threshold)), &data), age == t);
        prop_assert_eq!(evaluate(&parse_default(&format!("age != {}", threshold)), &data), age != t);
    }

    /// AND/OR combine their children like boolean && and ||
    #[test]
    fn prop_conjunction_semantics(
        c1 in condition_strategy(),
        c2 in condition_strategy(),
        data in attributes_strategy()
    ) {
        let left = evaluate(&parse_default(&c1), &data);
        let right = evaluate(&parse_default(&c2), &data);

        let and = parse_default(&format!("{} AND {}", c1, c2));
        let or = parse_default(&format!("{} OR {}", c1, c2));

        prop_assert_eq!(evaluate(&and, &data), left && right);
        prop_assert_eq!(evaluate(&or, &data), left || right);
    }

    /// Rewriting the conjunction leaves every condition as it was
    #[test]
    fn prop_conjunction_rewrite_keeps_conditions(
        c1 in condition_strategy(),
        conj in conjunction_strategy(),
        c2 in condition_strategy(),
        new_conj in conjunction_strategy()
    ) {
        let mut ast = parse_default(&format!("{} {} {}", c1, conj, c2));
        modify(&mut ast, Some(new_conj), None).unwrap();

        prop_assert_eq!(ast.value(), new_conj);
        prop_assert_eq!(ast.left().unwrap().value(), c1);
        prop_assert_eq!(ast.right().unwrap().value(), c2);
    }

    /// The persisted form converts back to the same tree
    #[test]
    fn prop_serialized_form_restores_tree(
        c1 in condition_strategy(),
        conj in conjunction_strategy(),
        c2 in condition_strategy()
    ) {
        let ast = parse_default(&format!("{} {} {}", c1, conj, c2));
        let json = ast.to_json().unwrap();
        prop_assert_eq!(Node::from_json(&json).unwrap(), ast);
    }

    /// Cached evaluation agrees with direct parsing
    #[test]
    fn prop_cache_consistency(
        c1 in condition_strategy(),
        conj in conjunction_strategy(),
        c2 in condition_strategy(),
        data in attributes_strategy()
    ) {
        let cache = RuleCache::default();
        let rule = format!("{} {} {}", c1, conj, c2);

        let direct = evaluate(&parse_default(&rule), &data);
        let cached1 = cache.check(&rule, &data).unwrap();
        let cached2 = cache.check(&rule, &data).unwrap();

        prop_assert_eq!(direct, cached1);
        prop_assert_eq!(cached1, cached2);
    }
}
