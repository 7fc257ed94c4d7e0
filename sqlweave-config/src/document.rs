//! Read-only view over a hierarchical configuration document
//!
//! The assembler only asks a document for named children, attribute values
//! and the children flattened into key/value pairs.
//! [`ConfigNode`] is the owned tree the session entrypoint builds from YAML;
//! any other grammar can be plugged in by implementing [`DocumentView`].

use std::io::Read;

use crate::error::{ConfigError, ConfigResult};
use crate::properties::{scalar_to_string, Properties};

/// Name of the document root element
pub const ROOT_ELEMENT: &str = "configuration";

/// Query interface over a document element
pub trait DocumentView {
    /// Element name
    fn name(&self) -> &str;

    /// First child element with the given name
    fn child(&self, name: &str) -> Option<&Self>;

    /// All child elements in document order
    fn children(&self) -> Vec<&Self>;

    /// Raw attribute value
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Every attribute as a name/value pair, in document order
    fn attributes(&self) -> Vec<(&str, &str)>;

    /// Children carrying `name` and `value` attributes, as key/value pairs
    fn children_as_properties(&self) -> Properties {
        let mut props = Properties::new();
        for child in self.children() {
            if let (Some(name), Some(value)) = (child.attribute("name"), child.attribute("value")) {
                props.insert(name.to_string(), value.to_string());
            }
        }
        props
    }
}

/// Owned document element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigNode {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    /// Create an element with no attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing an existing value
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Append a child element
    pub fn with_child(mut self, child: ConfigNode) -> Self {
        self.children.push(child);
        self
    }

    /// Append a `property` child with `name`/`value` attributes
    pub fn with_property(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_child(
            ConfigNode::new("property")
                .with_attribute("name", name)
                .with_attribute("value", value),
        )
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Build a tree from YAML text.
    ///
    /// Scalars become attributes, mappings become children and sequences
    /// become repeated children; a scalar sequence item becomes a child with
    /// a `name` attribute. A top-level `configuration` key is unwrapped.
    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_str(text)?;
        Self::from_yaml_value(value)
    }

    /// Build a tree from a YAML byte stream
    pub fn from_yaml_reader<R: Read>(reader: R) -> ConfigResult<Self> {
        let value: serde_yaml::Value = serde_yaml::from_reader(reader)?;
        Self::from_yaml_value(value)
    }

    fn from_yaml_value(value: serde_yaml::Value) -> ConfigResult<Self> {
        let body = match value {
            serde_yaml::Value::Mapping(mut map) => {
                match map.remove(serde_yaml::Value::String(ROOT_ELEMENT.to_string())) {
                    Some(inner) if map.is_empty() => inner,
                    Some(inner) => {
                        // Root key alongside other keys, keep everything at top level
                        map.insert(serde_yaml::Value::String(ROOT_ELEMENT.to_string()), inner);
                        serde_yaml::Value::Mapping(map)
                    }
                    None => serde_yaml::Value::Mapping(map),
                }
            }
            serde_yaml::Value::Null => serde_yaml::Value::Mapping(Default::default()),
            _ => {
                return Err(ConfigError::invalid_value(
                    ROOT_ELEMENT,
                    "<document>",
                    "the document root must be a mapping",
                ))
            }
        };
        Ok(yaml_element(ROOT_ELEMENT, &body))
    }
}

fn yaml_element(name: &str, value: &serde_yaml::Value) -> ConfigNode {
    let mut node = ConfigNode::new(name);
    let serde_yaml::Value::Mapping(map) = value else {
        if let Some(text) = scalar_to_string(value) {
            if !text.is_empty() {
                node.set_attribute("name", text);
            }
        }
        return node;
    };

    for (key, child) in map {
        let Some(key) = scalar_to_string(key) else {
            continue;
        };
        match child {
            serde_yaml::Value::Mapping(_) => node.children.push(yaml_element(&key, child)),
            serde_yaml::Value::Sequence(items) => {
                for item in items {
                    node.children.push(yaml_element(&key, item));
                }
            }
            scalar => {
                if let Some(text) = scalar_to_string(scalar) {
                    node.set_attribute(key, text);
                }
            }
        }
    }
    node
}

impl DocumentView for ConfigNode {
    fn name(&self) -> &str {
        &self.name
    }

    fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|c| c.name == name)
    }

    fn children(&self) -> Vec<&Self> {
        self.children.iter().collect()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn attributes(&self) -> Vec<(&str, &str)> {
        self.attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }
}
