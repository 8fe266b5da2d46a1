//! In-memory rule store

use super::{RuleId, RuleStore, StoredRule};
use crate::error::{Result, RuleError};
use crate::rule::SerializedNode;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

/// Rule store backed by a hash map; identifiers start at 1
#[derive(Debug)]
pub struct MemoryRuleStore {
    next_id: AtomicU64,
    rules: RwLock<AHashMap<RuleId, StoredRule>>,
    capacity: Option<usize>,
}

impl MemoryRuleStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            rules: RwLock::new(AHashMap::new()),
            capacity: None,
        }
    }

    /// A store that refuses inserts once `capacity` rules are held
    pub fn with_capacity_limit(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::new()
        }
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for MemoryRuleStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleStore for MemoryRuleStore {
    fn insert_rule(&self, rule_string: &str, ast: &SerializedNode) -> Result<RuleId> {
        let mut rules = self.rules.write();

        if let Some(capacity) = self.capacity {
            if rules.len() >= capacity {
                return Err(RuleError::Persistence(format!(
                    "Store is full ({} rules)",
                    capacity
                )));
            }
        }

        let id = RuleId(self.next_id.fetch_add(1, Ordering::Relaxed));
        rules.insert(
            id,
            StoredRule {
                rule_string: rule_string.to_string(),
                ast: ast.clone(),
            },
        );
        Ok(id)
    }

    fn get_rule(&self, id: RuleId) -> Result<Option<StoredRule>> {
        Ok(self.rules.read().get(&id).cloned())
    }
}
