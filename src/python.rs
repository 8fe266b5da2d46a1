//! Python bindings
//!
//! Exposes rule creation, evaluation and rewriting to Python. The validator
//! configuration and its parse cache are held process-wide so rule strings
//! seen before are not parsed again.

use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::RuleConfig;
use crate::error::RuleError;
use crate::rule::{
    evaluate, evaluate_rule as evaluate_tree, modify, modify_rule as modify_tree,
    sample_rule as build_sample_rule, AttributeValue, Node, NodeKind, RuleCache, SerializedNode,
};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;

// ============================================================================
// Cached Configuration
// ============================================================================

/// Cached configuration: the allow-list and the rules parsed under it
struct CachedConfig {
    cache: RuleCache,
}

/// Global cached configuration
static CACHED_CONFIG: OnceCell<Arc<RwLock<CachedConfig>>> = OnceCell::new();

fn cached_config() -> Arc<RwLock<CachedConfig>> {
    CACHED_CONFIG
        .get_or_init(|| {
            Arc::new(RwLock::new(CachedConfig {
                cache: RuleCache::default(),
            }))
        })
        .clone()
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert a Python dict into attribute values; `None` and unsupported
/// values are left out so conditions on them simply fail to match
fn extract_attributes(data: &Bound<'_, PyDict>) -> PyResult<HashMap<String, AttributeValue>> {
    let mut attributes = HashMap::with_capacity(data.len());
    for (key, value) in data.iter() {
        let name: String = key.extract()?;
        let value = if let Ok(i) = value.extract::<i64>() {
            AttributeValue::Integer(i)
        } else if let Ok(f) = value.extract::<f64>() {
            AttributeValue::Float(f)
        } else if let Ok(s) = value.extract::<String>() {
            AttributeValue::String(s)
        } else {
            log::debug!("Skipping attribute {} with unsupported value", name);
            continue;
        };
        attributes.insert(name, value);
    }
    Ok(attributes)
}

fn serialized_to_dict<'py>(
    py: Python<'py>,
    node: &SerializedNode,
) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("type", kind_name(node.kind))?;
    dict.set_item("value", &node.value)?;
    if let Some(left) = &node.left {
        dict.set_item("left", serialized_to_dict(py, left)?)?;
    }
    if let Some(right) = &node.right {
        dict.set_item("right", serialized_to_dict(py, right)?)?;
    }
    Ok(dict)
}

fn kind_name(kind: NodeKind) -> &'static str {
    match kind {
        NodeKind::Condition => "condition",
        NodeKind::Operator => "operator",
    }
}

// ============================================================================
// Rule Class
// ============================================================================

/// Parsed rule tree held in Rust memory
#[pyclass(name = "Rule")]
#[derive(Debug, Clone)]
pub struct PyRule {
    node: Node,
}

impl From<Node> for PyRule {
    fn from(node: Node) -> Self {
        Self { node }
    }
}

#[pymethods]
impl PyRule {
    /// "condition" or "operator"
    #[getter]
    fn kind(&self) -> &'static str {
        kind_name(self.node.kind())
    }

    /// Condition text or conjunction keyword
    #[getter]
    fn value(&self) -> String {
        self.node.value()
    }

    /// Copy of the left subtree, if any
    #[getter]
    fn left(&self) -> Option<PyRule> {
        self.node.left().cloned().map(PyRule::from)
    }

    /// Copy of the right subtree, if any
    #[getter]
    fn right(&self) -> Option<PyRule> {
        self.node.right().cloned().map(PyRule::from)
    }

    fn evaluate(&self, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let attributes = extract_attributes(data)?;
        Ok(evaluate(&self.node, &attributes))
    }

    #[pyo3(signature = (new_operator=None, new_value=None))]
    fn modify(&mut self, new_operator: Option<&str>, new_value: Option<&str>) -> PyResult<()> {
        modify(&mut self.node, new_operator, new_value)?;
        Ok(())
    }

    /// Nested `{type, value, left?, right?}` dict
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        serialized_to_dict(py, &self.node.to_serialized())
    }

    fn to_json(&self) -> PyResult<String> {
        Ok(self.node.to_json()?)
    }

    #[staticmethod]
    fn from_json(json: &str) -> PyResult<PyRule> {
        Ok(Node::from_json(json)?.into())
    }

    fn __repr__(&self) -> String {
        format!("Rule({})", self.node.value())
    }
}

// ============================================================================
// Python Functions
// ============================================================================

/// Set the attribute allow-list used by `create_rule`
///
/// Replaces any previous configuration and drops rules parsed under it.
/// Without `attributes` the default allow-list is restored.
#[pyfunction]
#[pyo3(signature = (attributes=None))]
fn init_config(attributes: Option<Vec<String>>) -> PyResult<()> {
    let config = match attributes {
        Some(attributes) => RuleConfig::with_attributes(attributes),
        None => RuleConfig::default(),
    };

    let cached = CachedConfig {
        cache: RuleCache::new(config),
    };

    // If already initialized, update the config
    if let Some(existing) = CACHED_CONFIG.get() {
        let mut guard = existing.write();
        *guard = cached;
    } else {
        let _ = CACHED_CONFIG.set(Arc::new(RwLock::new(cached)));
    }

    Ok(())
}

/// Check if a config has been set up, explicitly or by first use
#[pyfunction]
fn is_config_initialized() -> bool {
    CACHED_CONFIG.get().is_some()
}

/// Parse a rule string; returns None when the rule is rejected
#[pyfunction]
fn create_rule(rule_string: &str) -> PyResult<Option<PyRule>> {
    let config = cached_config();
    let guard = config.read();

    match guard.cache.get_or_parse(rule_string) {
        Ok(node) => Ok(Some(node.into())),
        Err(RuleError::InvalidRule(_)) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Evaluate a rule against a dict of attribute values; None never matches
#[pyfunction]
fn evaluate_rule(rule: Option<PyRef<'_, PyRule>>, data: &Bound<'_, PyDict>) -> PyResult<bool> {
    let attributes = extract_attributes(data)?;
    Ok(evaluate_tree(rule.as_deref().map(|r| &r.node), &attributes))
}

/// Rewrite a rule in place and return the same object
#[pyfunction]
#[pyo3(signature = (rule, new_operator=None, new_value=None))]
fn modify_rule<'py>(
    rule: Option<Bound<'py, PyRule>>,
    new_operator: Option<&str>,
    new_value: Option<&str>,
) -> PyResult<Option<Bound<'py, PyRule>>> {
    match rule {
        Some(rule) => {
            {
                let mut inner = rule.borrow_mut();
                modify(&mut inner.node, new_operator, new_value)?;
            }
            Ok(Some(rule))
        }
        None => {
            modify_tree(None, new_operator, new_value)?;
            Ok(None)
        }
    }
}

/// Hand-built sample rule tree
#[pyfunction]
fn sample_rule() -> PyRule {
    build_sample_rule().into()
}

// ============================================================================
// Python Module Definition
// ============================================================================

/// Python module definition
#[pymodule]
fn rule_engine_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(init_config, m)?)?;
    m.add_function(wrap_pyfunction!(is_config_initialized, m)?)?;
    m.add_function(wrap_pyfunction!(create_rule, m)?)?;
    m.add_function(wrap_pyfunction!(evaluate_rule, m)?)?;
    m.add_function(wrap_pyfunction!(modify_rule, m)?)?;
    m.add_function(wrap_pyfunction!(sample_rule, m)?)?;
    m.add_class::<PyRule>()?;
    Ok(())
}
