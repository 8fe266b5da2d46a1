//! Rule engine configuration
//!
//! Holds the attribute allow-list consulted by the validator. The operator
//! and conjunction vocabulary is fixed and lives here as constants.

use crate::error::{Result, RuleError};
use ahash::AHashSet;
use serde::Deserialize;

/// Attributes accepted when no explicit allow-list is configured
pub const DEFAULT_ATTRIBUTES: [&str; 2] = ["age", "department"];

/// Comparison operators and conjunctions a rule may contain
pub const VALID_OPERATORS: [&str; 8] = ["AND", "OR", ">", "<", ">=", "<=", "==", "!="];

/// Validator configuration
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleConfig {
    #[serde(default = "default_attributes")]
    attributes: AHashSet<String>,
}

fn default_attributes() -> AHashSet<String> {
    DEFAULT_ATTRIBUTES.iter().map(|a| a.to_string()).collect()
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            attributes: default_attributes(),
        }
    }
}

impl RuleConfig {
    /// Build a config with the given attribute allow-list
    pub fn with_attributes<I, S>(attributes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            attributes: attributes.into_iter().map(Into::into).collect(),
        }
    }

    /// Load a config from JSON, e.g. `{"attributes": ["age", "salary"]}`
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RuleError::DeserializationError(e.to_string()))
    }

    /// Whether `name` is an allow-listed attribute
    #[inline]
    pub fn is_attribute(&self, name: &str) -> bool {
        self.attributes.contains(name)
    }
}

/// Whether `token` is a known comparison operator or conjunction
#[inline]
pub fn is_operator(token: &str) -> bool {
    VALID_OPERATORS.contains(&token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_attributes() {
        let config = RuleConfig::default();
        assert!(config.is_attribute("age"));
        assert!(config.is_attribute("department"));
        assert!(!config.is_attribute("salary"));
    }

    #[test]
    fn test_from_json() {
        let config = RuleConfig::from_json(r#"{"attributes": ["salary", "experience"]}"#).unwrap();
        assert!(config.is_attribute("salary"));
        assert!(config.is_attribute("experience"));
        assert!(!config.is_attribute("age"));
    }

    #[test]
    fn test_from_json_missing_field_uses_defaults() {
        let config = RuleConfig::from_json("{}").unwrap();
        assert_eq!(config, RuleConfig::default());
    }

    #[test]
    fn test_from_json_invalid() {
        let err = RuleConfig::from_json("[1, 2").unwrap_err();
        assert!(matches!(err, RuleError::DeserializationError(_)));
    }

    #[test]
    fn test_operator_vocabulary() {
        for op in ["AND", "OR", ">", "<", ">=", "<=", "==", "!="] {
            assert!(is_operator(op), "{} should be accepted", op);
        }
        assert!(!is_operator("="));
        assert!(!is_operator("and"));
        assert!(!is_operator("><"));
    }
}
