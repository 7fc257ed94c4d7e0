//! Wire types and the type handler registry

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::{Constructor, TypeCatalog};

/// Column/parameter types on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JdbcType {
    Array,
    Bit,
    Tinyint,
    Smallint,
    Integer,
    Bigint,
    Float,
    Real,
    Double,
    Numeric,
    Decimal,
    Char,
    Varchar,
    Longvarchar,
    Date,
    Time,
    Timestamp,
    Binary,
    Varbinary,
    Longvarbinary,
    Null,
    Other,
    Blob,
    Clob,
    Boolean,
    Cursor,
    Undefined,
    Nvarchar,
    Nchar,
    Nclob,
    Struct,
    JavaObject,
    Distinct,
    Ref,
    Datalink,
    Rowid,
    Longnvarchar,
    Sqlxml,
    Datetimeoffset,
}

const JDBC_TYPE_NAMES: &[(&str, JdbcType)] = &[
    ("ARRAY", JdbcType::Array),
    ("BIT", JdbcType::Bit),
    ("TINYINT", JdbcType::Tinyint),
    ("SMALLINT", JdbcType::Smallint),
    ("INTEGER", JdbcType::Integer),
    ("BIGINT", JdbcType::Bigint),
    ("FLOAT", JdbcType::Float),
    ("REAL", JdbcType::Real),
    ("DOUBLE", JdbcType::Double),
    ("NUMERIC", JdbcType::Numeric),
    ("DECIMAL", JdbcType::Decimal),
    ("CHAR", JdbcType::Char),
    ("VARCHAR", JdbcType::Varchar),
    ("LONGVARCHAR", JdbcType::Longvarchar),
    ("DATE", JdbcType::Date),
    ("TIME", JdbcType::Time),
    ("TIMESTAMP", JdbcType::Timestamp),
    ("BINARY", JdbcType::Binary),
    ("VARBINARY", JdbcType::Varbinary),
    ("LONGVARBINARY", JdbcType::Longvarbinary),
    ("NULL", JdbcType::Null),
    ("OTHER", JdbcType::Other),
    ("BLOB", JdbcType::Blob),
    ("CLOB", JdbcType::Clob),
    ("BOOLEAN", JdbcType::Boolean),
    ("CURSOR", JdbcType::Cursor),
    ("UNDEFINED", JdbcType::Undefined),
    ("NVARCHAR", JdbcType::Nvarchar),
    ("NCHAR", JdbcType::Nchar),
    ("NCLOB", JdbcType::Nclob),
    ("STRUCT", JdbcType::Struct),
    ("JAVA_OBJECT", JdbcType::JavaObject),
    ("DISTINCT", JdbcType::Distinct),
    ("REF", JdbcType::Ref),
    ("DATALINK", JdbcType::Datalink),
    ("ROWID", JdbcType::Rowid),
    ("LONGNVARCHAR", JdbcType::Longnvarchar),
    ("SQLXML", JdbcType::Sqlxml),
    ("DATETIMEOFFSET", JdbcType::Datetimeoffset),
];

impl JdbcType {
    pub fn as_str(&self) -> &'static str {
        JDBC_TYPE_NAMES
            .iter()
            .find(|(_, t)| t == self)
            .map(|(name, _)| *name)
            .unwrap_or("OTHER")
    }
}

impl fmt::Display for JdbcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JdbcType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        JDBC_TYPE_NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, t)| *t)
            .ok_or_else(|| format!("Invalid jdbc type: {}", s))
    }
}

/// Converts between a semantic type and its wire representation
pub trait TypeHandler: Send + Sync + fmt::Debug {
    /// Identifying name, used in diagnostics
    fn handler_name(&self) -> &str;

    /// Semantic types this handler describes itself as handling
    fn handled_types(&self) -> Vec<String> {
        Vec::new()
    }

    /// Wire types this handler describes itself as handling
    fn handled_wire_types(&self) -> Vec<JdbcType> {
        Vec::new()
    }

    /// Also register for "no wire type" when wire types are declared
    fn includes_null_wire_type(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any;
}

/// Built-in handler for a basic value type
#[derive(Debug, Clone)]
pub struct ValueTypeHandler {
    name: &'static str,
    handled_type: &'static str,
    wire_types: &'static [JdbcType],
}

impl ValueTypeHandler {
    pub const fn new(
        name: &'static str,
        handled_type: &'static str,
        wire_types: &'static [JdbcType],
    ) -> Self {
        Self {
            name,
            handled_type,
            wire_types,
        }
    }
}

impl TypeHandler for ValueTypeHandler {
    fn handler_name(&self) -> &str {
        self.name
    }

    fn handled_types(&self) -> Vec<String> {
        vec![self.handled_type.to_string()]
    }

    fn handled_wire_types(&self) -> Vec<JdbcType> {
        self.wire_types.to_vec()
    }

    fn includes_null_wire_type(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Stores enum variants by name; bound to the enum type it is registered for
#[derive(Debug, Clone)]
pub struct EnumTypeHandler {
    enum_type: Option<String>,
}

impl EnumTypeHandler {
    pub fn new(enum_type: Option<&str>) -> Self {
        Self {
            enum_type: enum_type.map(str::to_string),
        }
    }

    pub fn enum_type(&self) -> Option<&str> {
        self.enum_type.as_deref()
    }
}

impl TypeHandler for EnumTypeHandler {
    fn handler_name(&self) -> &str {
        "EnumTypeHandler"
    }

    fn handled_types(&self) -> Vec<String> {
        self.enum_type.iter().cloned().collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

type WireMap = HashMap<Option<JdbcType>, Arc<dyn TypeHandler>>;

/// (semantic type, wire type) → handler.
///
/// Either side may be absent, meaning "match on the other dimension only".
#[derive(Debug, Clone, Default)]
pub struct TypeHandlerRegistry {
    handlers: HashMap<Option<String>, WireMap>,
    registration_count: usize,
}

impl TypeHandlerRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in value handlers
    pub fn with_builtin_handlers() -> Self {
        let mut registry = Self::new();
        for handler in crate::builtin::builtin_value_handlers() {
            registry.register(handler);
        }
        registry
    }

    /// Register a self-describing handler
    pub fn register(&mut self, handler: Arc<dyn TypeHandler>) {
        let handled = handler.handled_types();
        if handled.is_empty() {
            self.register_with_wire_types(None, handler);
        } else {
            for semantic in handled {
                self.register_with_wire_types(Some(semantic), handler.clone());
            }
        }
    }

    /// Register for a semantic type, using the handler's declared wire types
    pub fn register_for_type(&mut self, semantic: &str, handler: Arc<dyn TypeHandler>) {
        self.register_with_wire_types(Some(semantic.to_string()), handler);
    }

    /// Register an explicit pair; either side may be absent
    pub fn register_mapping(
        &mut self,
        semantic: Option<&str>,
        wire: Option<JdbcType>,
        handler: Arc<dyn TypeHandler>,
    ) {
        debug!(
            semantic = semantic.unwrap_or("*"),
            wire = wire.map(|w| w.as_str()).unwrap_or("*"),
            handler = handler.handler_name(),
            "Registering type handler"
        );
        self.handlers
            .entry(semantic.map(str::to_string))
            .or_default()
            .insert(wire, handler);
        self.registration_count += 1;
    }

    /// Register every concrete handler type in `namespace`
    pub fn register_namespace(&mut self, namespace: &str, catalog: &TypeCatalog) -> usize {
        let mut registered = 0;
        for descriptor in catalog.in_namespace(namespace) {
            let Constructor::TypeHandler(construct) = descriptor.constructor else {
                continue;
            };
            if !descriptor.concrete {
                continue;
            }
            self.register(construct(None));
            registered += 1;
        }
        debug!(namespace, registered, "Registered type handlers from namespace");
        registered
    }

    fn register_with_wire_types(&mut self, semantic: Option<String>, handler: Arc<dyn TypeHandler>) {
        let wire_types = handler.handled_wire_types();
        if wire_types.is_empty() {
            self.register_mapping(semantic.as_deref(), None, handler);
            return;
        }
        for wire in wire_types {
            self.register_mapping(semantic.as_deref(), Some(wire), handler.clone());
        }
        if handler.includes_null_wire_type() {
            self.register_mapping(semantic.as_deref(), None, handler);
        }
    }

    /// Find the handler for a pair.
    ///
    /// Tries the exact pair, then the semantic type with no wire type, then
    /// the only handler registered for the semantic type.
    pub fn handler(&self, semantic: Option<&str>, wire: Option<JdbcType>) -> Option<Arc<dyn TypeHandler>> {
        let wire_map = self.handlers.get(&semantic.map(str::to_string))?;
        if let Some(handler) = wire_map.get(&wire) {
            return Some(handler.clone());
        }
        if let Some(handler) = wire_map.get(&None) {
            return Some(handler.clone());
        }
        pick_sole_handler(wire_map)
    }

    pub fn has_handler(&self, semantic: Option<&str>, wire: Option<JdbcType>) -> bool {
        self.handler(semantic, wire).is_some()
    }

    /// Number of (pair → handler) registrations performed
    pub fn registration_count(&self) -> usize {
        self.registration_count
    }
}

fn pick_sole_handler(wire_map: &WireMap) -> Option<Arc<dyn TypeHandler>> {
    let mut handlers = wire_map.values();
    let first = handlers.next()?;
    let all_same = handlers.all(|h| h.handler_name() == first.handler_name());
    all_same.then(|| first.clone())
}
