//! Error types for the rule engine core

use thiserror::Error;

/// Main error type for the rule engine core
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RuleError {
    #[error("Invalid rule: {0}")]
    InvalidRule(String),

    #[error("Malformed mutation arguments: {0}")]
    MalformedMutationArguments(String),

    #[error("Deserialization error: {0}")]
    DeserializationError(String),

    #[error("Persistence error: {0}")]
    Persistence(String),
}

#[cfg(feature = "python")]
impl From<RuleError> for pyo3::PyErr {
    fn from(err: RuleError) -> pyo3::PyErr {
        use pyo3::exceptions::{PyRuntimeError, PyValueError};

        match err {
            RuleError::InvalidRule(msg) => PyValueError::new_err(format!("Invalid rule: {}", msg)),
            RuleError::MalformedMutationArguments(msg) => {
                PyValueError::new_err(format!("Malformed mutation arguments: {}", msg))
            }
            RuleError::DeserializationError(msg) => {
                PyValueError::new_err(format!("Deserialization error: {}", msg))
            }
            RuleError::Persistence(msg) => {
                PyRuntimeError::new_err(format!("Persistence error: {}", msg))
            }
        }
    }
}

/// Result type alias for the rule engine core
pub type Result<T> = std::result::Result<T, RuleError>;
