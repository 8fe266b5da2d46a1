//! Rule persistence boundary
//!
//! Storage engines receive the rule text together with its serialized tree
//! and hand back an opaque identifier. The core only depends on the
//! [`RuleStore`] trait; [`MemoryRuleStore`] is an in-process implementation.

mod memory;

pub use memory::*;

use crate::error::Result;
use crate::rule::{Node, SerializedNode};
use serde::{Deserialize, Serialize};

/// Opaque identifier assigned by a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleId(pub u64);

/// A persisted rule as handed to and returned from a store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRule {
    pub rule_string: String,
    pub ast: SerializedNode,
}

/// Persistence collaborator for parsed rules
pub trait RuleStore {
    /// Store a rule and its serialized tree, returning the new identifier
    fn insert_rule(&self, rule_string: &str, ast: &SerializedNode) -> Result<RuleId>;

    /// Fetch a stored rule by identifier
    fn get_rule(&self, id: RuleId) -> Result<Option<StoredRule>>;
}

/// Serialize `node` and store it next to `rule_string`
pub fn save_rule<S: RuleStore + ?Sized>(
    store: &S,
    rule_string: &str,
    node: &Node,
) -> Result<RuleId> {
    let id = store.insert_rule(rule_string, &node.to_serialized())?;
    log::debug!("Rule inserted with ID: {:?}", id);
    Ok(id)
}

/// Load a stored rule and rebuild its tree
pub fn load_rule<S: RuleStore + ?Sized>(store: &S, id: RuleId) -> Result<Option<Node>> {
    match store.get_rule(id)? {
        Some(stored) => Node::try_from(stored.ast).map(Some),
        None => Ok(None),
    }
}
