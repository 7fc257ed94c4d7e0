//! Bound argument containers

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::error::{BindingError, BindingResult};

/// Name → argument map handed to the execution engine.
///
/// Keeps insertion order. Looking up a name that was never bound is an
/// error rather than a silent `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamMap {
    entries: Vec<(String, Value)>,
}

impl ParamMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing the value of an existing entry in place
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> BindingResult<&Value> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
            .ok_or_else(|| BindingError::ParameterNotFound {
                name: name.to_string(),
                available: self.keys().map(str::to_string).collect(),
            })
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.entries.iter().any(|(existing, _)| existing == name)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Convert to a JSON object with the same key order
    pub fn into_value(self) -> Value {
        Value::Object(self.entries.into_iter().collect::<Map<String, Value>>())
    }
}

impl Serialize for ParamMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// Result of binding one call's arguments
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum ParamBinding {
    /// No nameable parameters
    Absent,
    /// The sole argument, unwrapped
    Single(Value),
    /// Named arguments plus their generic aliases
    Named(ParamMap),
}

impl ParamBinding {
    pub fn is_absent(&self) -> bool {
        matches!(self, ParamBinding::Absent)
    }

    pub fn as_single(&self) -> Option<&Value> {
        match self {
            ParamBinding::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_named(&self) -> Option<&ParamMap> {
        match self {
            ParamBinding::Named(map) => Some(map),
            _ => None,
        }
    }

    /// Parameter object as the execution engine consumes it
    pub fn into_value(self) -> Value {
        match self {
            ParamBinding::Absent => Value::Null,
            ParamBinding::Single(value) => value,
            ParamBinding::Named(map) => map.into_value(),
        }
    }
}
