//! Rule Engine Core - attribute rule parsing and evaluation
//!
//! Rules are small boolean expressions such as
//! `age > 30 AND department == 'Sales'`. This crate validates and parses
//! them into owned trees, evaluates trees against attribute values,
//! rewrites them in place and hands their serialized form to a
//! persistence collaborator. Python bindings are available behind the
//! `python` feature.

pub mod config;
pub mod error;
pub mod rule;
pub mod store;

#[cfg(feature = "python")]
mod python;

pub use crate::config::RuleConfig;
pub use crate::error::{Result, RuleError};
pub use crate::rule::{evaluate, modify, parse, validate, AttributeValue, Node};
pub use crate::store::{MemoryRuleStore, RuleId, RuleStore};
