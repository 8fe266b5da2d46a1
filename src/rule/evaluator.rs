//! Rule evaluator

use crate::rule::ast::{Comparison, Condition, ConditionValue, Conjunction, Node};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Runtime attribute value for evaluation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Integer(i64),
    Float(f64),
    String(String),
}

/// Evaluate a tree against an attribute mapping
pub fn evaluate<S: BuildHasher>(
    node: &Node,
    attributes: &HashMap<String, AttributeValue, S>,
) -> bool {
    match node {
        Node::Condition(cond) => check_condition(cond, attributes),
        Node::Operator {
            conjunction: Conjunction::And,
            left,
            right,
        } => {
            let left = evaluate(left, attributes);
            let right = evaluate(right, attributes);
            left && right
        }
        Node::Operator {
            conjunction: Conjunction::Or,
            left,
            right,
        } => {
            let left = evaluate(left, attributes);
            let right = evaluate(right, attributes);
            left || right
        }
    }
}

/// Evaluate a possibly absent tree; an absent tree never matches
pub fn evaluate_rule<S: BuildHasher>(
    node: Option<&Node>,
    attributes: &HashMap<String, AttributeValue, S>,
) -> bool {
    node.is_some_and(|node| evaluate(node, attributes))
}

fn check_condition<S: BuildHasher>(
    cond: &Condition,
    attributes: &HashMap<String, AttributeValue, S>,
) -> bool {
    // Missing data is a failed match, not an error
    match attributes.get(&cond.attribute) {
        Some(value) => compare(value, cond.comparison, cond.literal.value()),
        None => false,
    }
}

fn compare(actual: &AttributeValue, comparison: Comparison, expected: &ConditionValue) -> bool {
    let ordering = match (actual, expected) {
        (AttributeValue::Integer(a), ConditionValue::Integer(b)) => Some(a.cmp(b)),
        (AttributeValue::Integer(a), ConditionValue::Float(b)) => (*a as f64).partial_cmp(b),
        (AttributeValue::Float(a), ConditionValue::Integer(b)) => a.partial_cmp(&(*b as f64)),
        (AttributeValue::Float(a), ConditionValue::Float(b)) => a.partial_cmp(b),
        (AttributeValue::String(a), ConditionValue::String(b)) => Some(a.as_str().cmp(b.as_str())),
        // Strings never order against numbers
        _ => None,
    };

    match comparison {
        Comparison::Equal => ordering == Some(Ordering::Equal),
        Comparison::NotEqual => ordering != Some(Ordering::Equal),
        Comparison::Greater => ordering == Some(Ordering::Greater),
        Comparison::Less => ordering == Some(Ordering::Less),
        Comparison::GreaterEqual => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
        Comparison::LessEqual => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<i32> for AttributeValue {
    fn from(value: i32) -> Self {
        AttributeValue::Integer(value.into())
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        AttributeValue::Float(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}
