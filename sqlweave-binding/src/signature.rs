//! Callable signatures as seen by the binder
//!
//! Parameter names and overrides are attached explicitly per position; there
//! is no runtime introspection of the callable.

use serde::{Deserialize, Serialize};

/// What a parameter is, as far as binding is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    /// Ordinary argument
    Value,
    /// Pagination/limit descriptor
    RowBounds,
    /// Result-streaming callback
    ResultHandler,
}

impl ParamKind {
    /// Special kinds never get a name and never take part in binding
    pub fn is_special(&self) -> bool {
        matches!(self, ParamKind::RowBounds | ParamKind::ResultHandler)
    }
}

/// One declared parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParamDescriptor {
    pub type_name: String,
    pub kind: ParamKind,
    /// Identifier the parameter was declared with, when known
    #[serde(default)]
    pub declared_name: Option<String>,
    /// Explicit name attached to the parameter
    #[serde(default)]
    pub name_override: Option<String>,
}

impl ParamDescriptor {
    /// Ordinary parameter of the given type
    pub fn value(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            kind: ParamKind::Value,
            declared_name: None,
            name_override: None,
        }
    }

    pub fn row_bounds() -> Self {
        Self {
            kind: ParamKind::RowBounds,
            ..Self::value("RowBounds")
        }
    }

    pub fn result_handler() -> Self {
        Self {
            kind: ParamKind::ResultHandler,
            ..Self::value("ResultHandler")
        }
    }

    /// Set the declared identifier
    pub fn declared(mut self, name: impl Into<String>) -> Self {
        self.declared_name = Some(name.into());
        self
    }

    /// Set an explicit name override
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name_override = Some(name.into());
        self
    }
}

/// A callable's identity plus its parameters in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    pub id: String,
    #[serde(default)]
    pub params: Vec<ParamDescriptor>,
}

impl MethodSignature {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter
    pub fn param(mut self, param: ParamDescriptor) -> Self {
        self.params.push(param);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_kinds() {
        assert!(!ParamKind::Value.is_special());
        assert!(ParamKind::RowBounds.is_special());
        assert!(ParamKind::ResultHandler.is_special());
    }

    #[test]
    fn test_signature_from_json() {
        let json = r#"{
            "id": "BlogMapper.selectBlog",
            "params": [
                { "type_name": "i64", "kind": "value", "name_override": "id" },
                { "type_name": "RowBounds", "kind": "row_bounds" }
            ]
        }"#;
        let signature: MethodSignature = serde_json::from_str(json).unwrap();
        assert_eq!(
            signature,
            MethodSignature::new("BlogMapper.selectBlog")
                .param(ParamDescriptor::value("i64").named("id"))
                .param(ParamDescriptor::row_bounds())
        );
    }
}
