//! Hand-built sample rule tree

use crate::rule::ast::{Comparison, Condition, Conjunction, Literal, Node};

fn leaf(attribute: &str, comparison: Comparison, literal: Literal) -> Node {
    Node::condition(Condition::new(attribute, comparison, literal))
}

/// `((age > 30 AND department == 'Sales') OR (age < 25 AND department == 'Marketing'))
/// AND (salary > 50000 OR experience > 5)`
///
/// Built directly rather than parsed: it needs grouping the rule language
/// cannot express and attributes outside the default allow-list.
pub fn sample_rule() -> Node {
    let sales = Node::operator(
        Conjunction::And,
        leaf("age", Comparison::Greater, Literal::integer(30)),
        leaf("department", Comparison::Equal, Literal::string("Sales")),
    );
    let marketing = Node::operator(
        Conjunction::And,
        leaf("age", Comparison::Less, Literal::integer(25)),
        leaf("department", Comparison::Equal, Literal::string("Marketing")),
    );
    let seniority = Node::operator(
        Conjunction::Or,
        leaf("salary", Comparison::Greater, Literal::integer(50000)),
        leaf("experience", Comparison::Greater, Literal::integer(5)),
    );

    Node::operator(
        Conjunction::And,
        Node::operator(Conjunction::Or, sales, marketing),
        seniority,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::evaluator::{evaluate, AttributeValue};
    use std::collections::HashMap;

    fn data(pairs: &[(&str, AttributeValue)]) -> HashMap<String, AttributeValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_sample_shape() {
        let root = sample_rule();
        assert_eq!(root.value(), "AND");
        assert_eq!(root.left().unwrap().value(), "OR");
        assert_eq!(
            root.left().unwrap().right().unwrap().right().unwrap().value(),
            "department == 'Marketing'"
        );
        assert_eq!(root.right().unwrap().left().unwrap().value(), "salary > 50000");
    }

    #[test]
    fn test_sample_evaluation() {
        let root = sample_rule();

        let senior_sales = data(&[
            ("age", 35.into()),
            ("department", "Sales".into()),
            ("salary", 60000.into()),
            ("experience", 3.into()),
        ]);
        assert!(evaluate(&root, &senior_sales));

        let junior_marketing = data(&[
            ("age", 22.into()),
            ("department", "Marketing".into()),
            ("salary", 30000.into()),
            ("experience", 6.into()),
        ]);
        assert!(evaluate(&root, &junior_marketing));

        let junior_sales = data(&[
            ("age", 22.into()),
            ("department", "Sales".into()),
            ("salary", 90000.into()),
        ]);
        assert!(!evaluate(&root, &junior_sales));
    }
}
