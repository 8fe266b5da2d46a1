//! Rule parsing cache

use crate::config::RuleConfig;
use crate::error::Result;
use crate::rule::ast::Node;
use crate::rule::evaluator::{evaluate, AttributeValue};
use crate::rule::parser;
use ahash::AHashMap;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Parses each distinct rule string once under a fixed config
///
/// Trees handed out are clones, so mutating one never alters the cache.
#[derive(Debug)]
pub struct RuleCache {
    config: RuleConfig,
    rules: RwLock<AHashMap<String, Node>>,
}

impl RuleCache {
    pub fn new(config: RuleConfig) -> Self {
        Self {
            config,
            rules: RwLock::new(AHashMap::with_capacity(64)),
        }
    }

    /// Get or parse a rule string
    #[inline]
    pub fn get_or_parse(&self, rule: &str) -> Result<Node> {
        // Fast path: check read lock first
        {
            let rules = self.rules.read();
            if let Some(ast) = rules.get(rule) {
                return Ok(ast.clone());
            }
        }

        let ast = parser::parse(rule, &self.config)?;

        {
            let mut rules = self.rules.write();
            rules.insert(rule.to_string(), ast.clone());
        }

        Ok(ast)
    }

    /// Evaluate a rule string against attributes, using the cached tree
    pub fn check<S: BuildHasher>(
        &self,
        rule: &str,
        attributes: &HashMap<String, AttributeValue, S>,
    ) -> Result<bool> {
        let rules = self.rules.read();
        if let Some(ast) = rules.get(rule) {
            return Ok(evaluate(ast, attributes));
        }
        drop(rules);

        let ast = self.get_or_parse(rule)?;
        Ok(evaluate(&ast, attributes))
    }

    pub fn clear(&self) {
        self.rules.write().clear();
    }

    pub fn len(&self) -> usize {
        self.rules.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.read().is_empty()
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new(RuleConfig::default())
    }
}
