//! In-place rule tree rewriting

use crate::error::{Result, RuleError};
use crate::rule::ast::{Comparison, Conjunction, Literal, Node};

/// Resolved mutation arguments
///
/// A conjunction rewrites operator nodes; a comparison and/or literal
/// rewrites condition nodes. The attribute of a condition is never touched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mutation {
    pub conjunction: Option<Conjunction>,
    pub comparison: Option<Comparison>,
    pub literal: Option<Literal>,
}

impl Mutation {
    /// Resolve raw `new_operator` / `new_value` arguments
    ///
    /// `new_operator` is a conjunction keyword or a comparison symbol.
    /// `new_value` must be a literal as it would be written in a rule and
    /// needs a comparison operator alongside it.
    pub fn new(new_operator: Option<&str>, new_value: Option<&str>) -> Result<Self> {
        let mut mutation = Mutation::default();

        if let Some(op) = new_operator.map(str::trim) {
            if let Some(conjunction) = Conjunction::from_keyword(op) {
                mutation.conjunction = Some(conjunction);
            } else if let Some(comparison) = Comparison::from_symbol(op) {
                mutation.comparison = Some(comparison);
            } else {
                return Err(RuleError::MalformedMutationArguments(format!(
                    "Unknown operator: {}",
                    op
                )));
            }
        }

        if let Some(value) = new_value {
            if mutation.comparison.is_none() {
                return Err(RuleError::MalformedMutationArguments(format!(
                    "New value {} requires a comparison operator",
                    value
                )));
            }
            let literal = Literal::parse(value).ok_or_else(|| {
                RuleError::MalformedMutationArguments(format!("Invalid literal: {}", value))
            })?;
            mutation.literal = Some(literal);
        }

        Ok(mutation)
    }

    pub fn is_noop(&self) -> bool {
        self.conjunction.is_none() && self.comparison.is_none() && self.literal.is_none()
    }
}

/// Rewrite `root` in place and hand it back
pub fn modify<'a>(
    root: &'a mut Node,
    new_operator: Option<&str>,
    new_value: Option<&str>,
) -> Result<&'a mut Node> {
    let mutation = Mutation::new(new_operator, new_value)?;
    log::debug!("Applying {:?} to rule {}", mutation, root.value());
    apply(root, &mutation);
    Ok(root)
}

/// Rewrite a possibly absent tree; an absent tree is left as is
pub fn modify_rule<'a>(
    root: Option<&'a mut Node>,
    new_operator: Option<&str>,
    new_value: Option<&str>,
) -> Result<Option<&'a mut Node>> {
    match root {
        Some(root) => modify(root, new_operator, new_value).map(Some),
        None => {
            log::warn!("Rule tree is absent, nothing to modify");
            Ok(None)
        }
    }
}

/// Apply an already resolved mutation to every node of the tree
pub fn apply(node: &mut Node, mutation: &Mutation) {
    match node {
        Node::Condition(cond) => {
            if let Some(comparison) = mutation.comparison {
                cond.comparison = comparison;
            }
            if let Some(literal) = &mutation.literal {
                cond.literal = literal.clone();
            }
        }
        Node::Operator {
            conjunction,
            left,
            right,
        } => {
            if let Some(new) = mutation.conjunction {
                *conjunction = new;
            }
            apply(left, mutation);
            apply(right, mutation);
        }
    }
}
