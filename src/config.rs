// Access helpers for tree-structured configuration.
//
// Configuration nodes are JSON objects. A node may carry scalar attributes
// (`"type": "uniform"`), numeric arrays (`"reference_uvw": [0, 0, 1]`) or
// child nodes (`"mu": { ... }`).

use crate::error::ConfigError;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Load a configuration tree from a JSON file.
pub fn read_json_file<P: AsRef<Path>>(path: P) -> Result<Value, ConfigError> {
    let file = File::open(path.as_ref())?;
    let reader = BufReader::new(file);
    Ok(serde_json::from_reader(reader)?)
}

/// True when `node` has a non-null child or attribute called `name`.
pub fn check_for_node(node: &Value, name: &str) -> bool {
    node.get(name).map_or(false, |v| !v.is_null())
}

/// Fetch a child node, failing if absent.
pub fn get_child<'a>(node: &'a Value, name: &str) -> Result<&'a Value, ConfigError> {
    match node.get(name) {
        Some(v) if !v.is_null() => Ok(v),
        _ => Err(ConfigError::MissingNode(name.to_string())),
    }
}

/// Read a numeric array attribute.
///
/// Accepts either a JSON array of numbers or a whitespace separated string
/// of numbers (`"0 0 1"`). A single number is treated as a one-element array.
pub fn get_node_array(node: &Value, name: &str) -> Result<Vec<f64>, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidValue {
        name: name.to_string(),
        reason,
    };

    match get_child(node, name)? {
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_f64()
                    .ok_or_else(|| invalid(format!("expected a number, found {}", item)))
            })
            .collect(),
        Value::String(s) => s
            .split_whitespace()
            .map(|tok| {
                tok.parse::<f64>()
                    .map_err(|_| invalid(format!("'{}' is not a number", tok)))
            })
            .collect(),
        Value::Number(n) => n
            .as_f64()
            .map(|x| vec![x])
            .ok_or_else(|| invalid(format!("'{}' is not representable as f64", n))),
        other => Err(invalid(format!("expected an array of numbers, found {}", other))),
    }
}

/// Read a string attribute, trimmed and lower-cased.
pub fn get_node_value(node: &Value, name: &str) -> Result<String, ConfigError> {
    match get_child(node, name)? {
        Value::String(s) => Ok(s.trim().to_lowercase()),
        other => Err(ConfigError::InvalidValue {
            name: name.to_string(),
            reason: format!("expected a string, found {}", other),
        }),
    }
}
