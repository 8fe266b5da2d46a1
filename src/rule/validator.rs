//! Rule string tokenizer and validator

use crate::config::{is_operator, RuleConfig};
use once_cell::sync::Lazy;
use regex::Regex;

/// Words, operator runs, quoted strings and conjunction keywords
static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+|[><!=]+|'[^']+'|\bAND\b|\bOR\b)").expect("valid token regex")
});

/// Extract the tokens the validator inspects, in order
pub fn tokenize(rule: &str) -> Vec<&str> {
    TOKEN_RE.find_iter(rule).map(|m| m.as_str()).collect()
}

/// Check that every token of `rule` is a number, a known attribute, a known
/// operator or conjunction, or a quoted string
pub fn validate(rule: &str, config: &RuleConfig) -> bool {
    if rule.trim().is_empty() {
        return false;
    }

    for token in tokenize(rule) {
        if !is_valid_token(token, config) {
            log::warn!("Invalid attribute or operator: {}", token);
            return false;
        }
    }
    true
}

fn is_valid_token(token: &str, config: &RuleConfig) -> bool {
    token.bytes().all(|b| b.is_ascii_digit())
        || config.is_attribute(token)
        || is_operator(token)
        || token.starts_with('\'')
}
