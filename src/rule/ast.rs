//! Rule tree data model

use crate::error::{Result, RuleError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// `attribute operator literal`, with optional spacing around the operator
static CONDITION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+)\s*([!=<>]+)\s*(.+)$").expect("valid condition regex"));

/// Rule tree node
///
/// Operator nodes exclusively own both children, so a tree never shares
/// subtrees and has no back-references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "SerializedNode", try_from = "SerializedNode")]
pub enum Node {
    /// Leaf comparison like `age > 30`
    Condition(Condition),
    /// AND/OR over two subtrees
    Operator {
        conjunction: Conjunction,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// Node kind as it appears in the persisted form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Condition,
    Operator,
}

/// Single attribute comparison
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub attribute: String,
    pub comparison: Comparison,
    pub literal: Literal,
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Greater than or equal (>=)
    GreaterEqual,
    /// Less than or equal (<=)
    LessEqual,
    /// Equal (==)
    Equal,
    /// Not equal (!=)
    NotEqual,
}

/// Conjunctions joining two subtrees
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Conjunction {
    And,
    Or,
}

/// Literal operand of a condition, kept as written alongside its coerced value
#[derive(Debug, Clone, PartialEq)]
pub struct Literal {
    raw: String,
    value: ConditionValue,
}

/// Coerced literal value
#[derive(Debug, Clone, PartialEq)]
pub enum ConditionValue {
    Integer(i64),
    Float(f64),
    String(String),
}

impl Node {
    /// Build a condition leaf
    pub fn condition(condition: Condition) -> Self {
        Node::Condition(condition)
    }

    /// Build an operator node owning both children
    pub fn operator(conjunction: Conjunction, left: Node, right: Node) -> Self {
        Node::Operator {
            conjunction,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Condition(_) => NodeKind::Condition,
            Node::Operator { .. } => NodeKind::Operator,
        }
    }

    /// Textual value: the condition text or the conjunction keyword
    pub fn value(&self) -> String {
        match self {
            Node::Condition(cond) => cond.to_string(),
            Node::Operator { conjunction, .. } => conjunction.as_str().to_string(),
        }
    }

    pub fn left(&self) -> Option<&Node> {
        match self {
            Node::Operator { left, .. } => Some(left),
            Node::Condition(_) => None,
        }
    }

    pub fn right(&self) -> Option<&Node> {
        match self {
            Node::Operator { right, .. } => Some(right),
            Node::Condition(_) => None,
        }
    }

    /// Pre-order conversion into the persisted `{type, value, left?, right?}` form
    pub fn to_serialized(&self) -> SerializedNode {
        match self {
            Node::Condition(cond) => SerializedNode {
                kind: NodeKind::Condition,
                value: cond.to_string(),
                left: None,
                right: None,
            },
            Node::Operator {
                conjunction,
                left,
                right,
            } => SerializedNode {
                kind: NodeKind::Operator,
                value: conjunction.as_str().to_string(),
                left: Some(Box::new(left.to_serialized())),
                right: Some(Box::new(right.to_serialized())),
            },
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| RuleError::DeserializationError(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| RuleError::DeserializationError(e.to_string()))
    }
}

impl Condition {
    pub fn new(attribute: impl Into<String>, comparison: Comparison, literal: Literal) -> Self {
        Self {
            attribute: attribute.into(),
            comparison,
            literal,
        }
    }

    /// Parse `attribute operator literal` text into a structured condition
    pub fn parse(text: &str) -> Option<Self> {
        let caps = CONDITION_RE.captures(text.trim())?;
        let comparison = Comparison::from_symbol(&caps[2])?;
        let literal = Literal::parse(&caps[3])?;
        Some(Self::new(&caps[1], comparison, literal))
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.attribute, self.comparison, self.literal)
    }
}

impl Comparison {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            ">" => Some(Comparison::Greater),
            "<" => Some(Comparison::Less),
            ">=" => Some(Comparison::GreaterEqual),
            "<=" => Some(Comparison::LessEqual),
            "==" => Some(Comparison::Equal),
            "!=" => Some(Comparison::NotEqual),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Comparison::Greater => ">",
            Comparison::Less => "<",
            Comparison::GreaterEqual => ">=",
            Comparison::LessEqual => "<=",
            Comparison::Equal => "==",
            Comparison::NotEqual => "!=",
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Conjunction {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "AND" => Some(Conjunction::And),
            "OR" => Some(Conjunction::Or),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Conjunction::And => "AND",
            Conjunction::Or => "OR",
        }
    }

    /// Split priority: the lowest value becomes the outermost node
    #[inline]
    pub fn precedence(self) -> u8 {
        match self {
            Conjunction::Or => 0,
            Conjunction::And => 1,
        }
    }
}

impl fmt::Display for Conjunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Literal {
    /// Parse a literal as written: digits, digits with one decimal point, or a
    /// non-empty single-quoted string
    ///
    /// Quotes are stripped before coercion, so `'30'` is the integer 30.
    /// Digit runs that overflow `i64` are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let value = match unquote(raw) {
            Some(inner) => match coerce(inner) {
                Some(value) => value,
                None if is_all_digits(inner) => return None,
                None => ConditionValue::String(inner.to_string()),
            },
            None => coerce(raw)?,
        };

        Some(Self {
            raw: raw.to_string(),
            value,
        })
    }

    pub fn integer(value: i64) -> Self {
        Self {
            raw: value.to_string(),
            value: ConditionValue::Integer(value),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        let value = value.into();
        let raw = format!("'{}'", value);
        let value = coerce(&value).unwrap_or(ConditionValue::String(value));
        Self { raw, value }
    }

    /// The literal exactly as it appears in condition text
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn value(&self) -> &ConditionValue {
        &self.value
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Inner text of a non-empty single-quoted literal
fn unquote(raw: &str) -> Option<&str> {
    let inner = raw.strip_prefix('\'')?.strip_suffix('\'')?;
    if inner.is_empty() || inner.contains('\'') {
        return None;
    }
    Some(inner)
}

/// Numeric coercion: all digits -> integer, one decimal point -> float
fn coerce(text: &str) -> Option<ConditionValue> {
    if is_all_digits(text) {
        text.parse().ok().map(ConditionValue::Integer)
    } else if is_decimal(text) {
        text.parse().ok().map(ConditionValue::Float)
    } else {
        None
    }
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(s: &str) -> bool {
    let mut dots = 0;
    let mut digits = 0;
    for b in s.bytes() {
        match b {
            b'.' => dots += 1,
            b'0'..=b'9' => digits += 1,
            _ => return false,
        }
    }
    dots == 1 && digits > 0
}

// ============================================================================
// Persisted Form
// ============================================================================

/// Nested mapping handed to persistence: `{type, value, left?, right?}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedNode {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<SerializedNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<SerializedNode>>,
}

impl From<Node> for SerializedNode {
    fn from(node: Node) -> Self {
        node.to_serialized()
    }
}

impl TryFrom<SerializedNode> for Node {
    type Error = RuleError;

    fn try_from(node: SerializedNode) -> Result<Self> {
        match node.kind {
            NodeKind::Condition => {
                if node.left.is_some() || node.right.is_some() {
                    return Err(RuleError::DeserializationError(format!(
                        "Condition node has children: {}",
                        node.value
                    )));
                }
                Condition::parse(&node.value).map(Node::Condition).ok_or_else(|| {
                    RuleError::DeserializationError(format!("Malformed condition: {}", node.value))
                })
            }
            NodeKind::Operator => {
                let conjunction = Conjunction::from_keyword(node.value.trim()).ok_or_else(|| {
                    RuleError::DeserializationError(format!("Unknown conjunction: {}", node.value))
                })?;
                match (node.left, node.right) {
                    (Some(left), Some(right)) => Ok(Node::operator(
                        conjunction,
                        Node::try_from(*left)?,
                        Node::try_from(*right)?,
                    )),
                    _ => Err(RuleError::DeserializationError(format!(
                        "Operator node {} is missing a child",
                        node.value
                    ))),
                }
            }
        }
    }
}
