//! Typed access to the platform's flat input map.
//!
//! The platform delivers form values loosely typed: booleans may arrive as
//! `true`, `"true"` or `"yes"`, integers as numbers or numeric strings, lists
//! as arrays or a single scalar. Empty strings count as absent.

use crate::error::{ConnectorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputData(Map<String, Value>);

impl InputData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and internal composition.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn raw(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.raw(key).is_some()
    }

    /// Scalar value rendered as a string.
    pub fn str(&self, key: &str) -> Option<String> {
        match self.raw(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    pub fn required_str(&self, key: &str) -> Result<String> {
        self.str(key)
            .ok_or_else(|| ConnectorError::invalid_input(format!("'{}' is required", key)))
    }

    pub fn bool(&self, key: &str) -> Option<bool> {
        match self.raw(key)? {
            Value::Bool(b) => Some(*b),
            Value::Number(n) => n.as_i64().map(|n| n != 0),
            Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" | "on" => Some(true),
                "false" | "no" | "0" | "off" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn integer(&self, key: &str) -> Result<Option<i64>> {
        let Some(value) = self.raw(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ConnectorError::invalid_input(format!("'{}' must be an integer", key)))
    }

    pub fn number(&self, key: &str) -> Result<Option<f64>> {
        let Some(value) = self.raw(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed
            .map(Some)
            .ok_or_else(|| ConnectorError::invalid_input(format!("'{}' must be a number", key)))
    }

    /// List value; a lone scalar becomes a one-element list.
    pub fn list(&self, key: &str) -> Option<Vec<String>> {
        match self.raw(key)? {
            Value::Array(values) => Some(
                values
                    .iter()
                    .filter_map(|v| match v {
                        Value::String(s) => Some(s.clone()),
                        Value::Number(n) => Some(n.to_string()),
                        _ => None,
                    })
                    .collect(),
            ),
            Value::String(s) => Some(vec![s.clone()]),
            Value::Number(n) => Some(vec![n.to_string()]),
            _ => None,
        }
    }
}

impl From<Map<String, Value>> for InputData {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for InputData {
    type Error = ConnectorError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(ConnectorError::invalid_input(format!(
                "input data must be an object, got {}",
                other
            ))),
        }
    }
}
