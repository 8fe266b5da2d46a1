//! Rule string parser

use crate::config::RuleConfig;
use crate::error::{Result, RuleError};
use crate::rule::ast::{Condition, Conjunction, Node};
use crate::rule::validator::validate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Runs of comparison characters and parentheses, with surrounding spaces
static OPERATOR_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*([()<>!=]+)\s*").expect("valid operator regex"));

/// Conjunctions delimited by whitespace; quoted literals are matched first so
/// a keyword inside quotes never splits the rule
static CONJUNCTION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'[^']*'|\s+(AND|OR)\s+").expect("valid conjunction regex"));

/// Parse a rule string into a tree
pub fn parse(rule: &str, config: &RuleConfig) -> Result<Node> {
    let rule = rule.trim();

    if !validate(rule, config) {
        log::warn!("Invalid rule string: {}", rule);
        return Err(RuleError::InvalidRule(rule.to_string()));
    }

    let normalized = normalize(rule);
    let tokens = split_conjunctions(&normalized);
    let node = parse_tokens(&tokens)?;

    log::debug!("Parsed rule `{}` into {}", rule, node.value());
    Ok(node)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Operand(&'a str),
    Conjunction(Conjunction),
}

/// Put exactly one space around every operator run
fn normalize(rule: &str) -> String {
    OPERATOR_RUN_RE.replace_all(rule, " ${1} ").into_owned()
}

/// Split on top-level conjunctions, keeping them as tokens
fn split_conjunctions(rule: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = 0;

    for caps in CONJUNCTION_RE.captures_iter(rule) {
        let (Some(whole), Some(keyword)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let Some(conjunction) = Conjunction::from_keyword(keyword.as_str()) else {
            continue;
        };
        tokens.push(Token::Operand(rule[start..whole.start()].trim()));
        tokens.push(Token::Conjunction(conjunction));
        start = whole.end();
    }
    tokens.push(Token::Operand(rule[start..].trim()));

    tokens
}

fn parse_tokens(tokens: &[Token<'_>]) -> Result<Node> {
    if tokens.is_empty() {
        return Err(RuleError::InvalidRule("Missing operand".to_string()));
    }

    // Lowest precedence wins the split; min_by_key keeps the first on ties
    let split = tokens
        .iter()
        .enumerate()
        .filter_map(|(i, token)| match token {
            Token::Conjunction(c) => Some((i, *c)),
            Token::Operand(_) => None,
        })
        .min_by_key(|(_, c)| c.precedence());

    match split {
        Some((pos, conjunction)) => {
            let left = parse_tokens(&tokens[..pos])?;
            let right = parse_tokens(&tokens[pos + 1..])?;
            Ok(Node::operator(conjunction, left, right))
        }
        None => match tokens {
            [Token::Operand(text)] => parse_condition(text),
            _ => Err(RuleError::InvalidRule(format!(
                "Cannot parse tokens: {:?}",
                tokens
            ))),
        },
    }
}

fn parse_condition(text: &str) -> Result<Node> {
    Condition::parse(text)
        .map(Node::Condition)
        .ok_or_else(|| RuleError::InvalidRule(format!("Malformed condition: {}", text)))
}
