//! Rule parsing, evaluation and rewriting
//!
//! This module handles rule strings like "age > 30 AND department == 'Sales'":
//! validating their tokens, parsing them into a tree, evaluating the tree
//! against attribute values and rewriting it in place.

mod ast;
pub mod cache;
mod evaluator;
pub mod mutator;
pub mod parser;
pub mod sample;
pub mod validator;

#[cfg(test)]
mod property_tests;

pub use ast::*;
pub use cache::*;
pub use evaluator::*;
pub use mutator::*;
pub use parser::*;
pub use sample::*;
pub use validator::*;
