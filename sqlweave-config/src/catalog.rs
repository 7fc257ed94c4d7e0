//! Catalog of named types and their constructors
//!
//! Documents refer to pluggable implementations by type id
//! (`app::plugins::AuditInterceptor`). Every id the assembler can resolve is
//! registered here up front, either through [`register_type!`] at process
//! start or explicitly on a [`TypeCatalog`]. Namespace scans enumerate the
//! catalog instead of touching the filesystem.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::database_id::DatabaseIdProvider;
use crate::datasource::DataSourceFactory;
use crate::error::{ConfigError, ConfigResult};
use crate::factory::{ObjectFactory, ObjectWrapperFactory, ReflectorFactory, Vfs};
use crate::plugin::Interceptor;
use crate::transaction::TransactionFactory;
use crate::type_handler::TypeHandler;

pub use inventory;

/// Separator between namespace segments in a type id
pub const NAMESPACE_SEPARATOR: &str = "::";

/// How instances of a catalog type are produced
#[derive(Clone, Copy)]
pub enum Constructor {
    /// Plain value type, only usable as an alias or semantic type
    Value,
    /// Mapper interface registered with the mapper registry
    Mapper,
    Interceptor(fn() -> Box<dyn Interceptor>),
    ObjectFactory(fn() -> Box<dyn ObjectFactory>),
    ObjectWrapperFactory(fn() -> Box<dyn ObjectWrapperFactory>),
    ReflectorFactory(fn() -> Box<dyn ReflectorFactory>),
    Vfs(fn() -> Arc<dyn Vfs>),
    TransactionFactory(fn() -> Box<dyn TransactionFactory>),
    DataSourceFactory(fn() -> Box<dyn DataSourceFactory>),
    DatabaseIdProvider(fn() -> Box<dyn DatabaseIdProvider>),
    /// Receives the semantic type it is being registered for, when known
    TypeHandler(fn(Option<&str>) -> Arc<dyn TypeHandler>),
}

impl Constructor {
    /// Kind name used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            Constructor::Value => "value type",
            Constructor::Mapper => "mapper",
            Constructor::Interceptor(_) => "Interceptor",
            Constructor::ObjectFactory(_) => "ObjectFactory",
            Constructor::ObjectWrapperFactory(_) => "ObjectWrapperFactory",
            Constructor::ReflectorFactory(_) => "ReflectorFactory",
            Constructor::Vfs(_) => "Vfs",
            Constructor::TransactionFactory(_) => "TransactionFactory",
            Constructor::DataSourceFactory(_) => "DataSourceFactory",
            Constructor::DatabaseIdProvider(_) => "DatabaseIdProvider",
            Constructor::TypeHandler(_) => "TypeHandler",
        }
    }
}

impl fmt::Debug for Constructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind())
    }
}

/// A type the assembler can resolve by id
#[derive(Debug, Clone, Copy)]
pub struct TypeDescriptor {
    /// Fully qualified id, namespace segments separated by `::`
    pub id: &'static str,
    /// Declared alias, overriding the simple name in namespace scans
    pub alias: Option<&'static str>,
    /// Abstract or interface-like types are skipped by namespace scans
    pub concrete: bool,
    pub constructor: Constructor,
}

impl TypeDescriptor {
    pub const fn new(id: &'static str, constructor: Constructor) -> Self {
        Self {
            id,
            alias: None,
            concrete: true,
            constructor,
        }
    }

    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    pub const fn non_concrete(mut self) -> Self {
        self.concrete = false;
        self
    }

    /// Last id segment
    pub fn simple_name(&self) -> &'static str {
        self.id
            .rsplit(NAMESPACE_SEPARATOR)
            .next()
            .unwrap_or(self.id)
    }

    /// Id without its last segment
    pub fn namespace(&self) -> &'static str {
        match self.id.rfind(NAMESPACE_SEPARATOR) {
            Some(idx) => &self.id[..idx],
            None => "",
        }
    }

    /// Whether the type lives in `namespace` or one of its children
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        let namespace = namespace.trim_end_matches(NAMESPACE_SEPARATOR);
        self.id
            .strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with(NAMESPACE_SEPARATOR))
    }
}

inventory::collect!(TypeDescriptor);

/// Register a [`TypeDescriptor`] with the process-wide catalog
///
/// # Example
/// ```rust,ignore
/// sqlweave_config::register_type!(TypeDescriptor::new(
///     "app::plugins::AuditInterceptor",
///     Constructor::Interceptor(|| Box::new(AuditInterceptor::default())),
/// ));
/// ```
#[macro_export]
macro_rules! register_type {
    ($descriptor:expr) => {
        $crate::catalog::inventory::submit! { $descriptor }
    };
}

/// Lookup table of resolvable types
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: BTreeMap<&'static str, TypeDescriptor>,
}

impl TypeCatalog {
    /// Empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog holding only the built-in types
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for descriptor in crate::builtin::BUILTIN_TYPES {
            catalog.register(*descriptor);
        }
        catalog
    }

    /// Built-in types plus everything submitted through [`register_type!`]
    pub fn discover() -> Self {
        let mut catalog = Self::builtin();
        for descriptor in inventory::iter::<TypeDescriptor> {
            catalog.register(*descriptor);
        }
        tracing::debug!(types = catalog.len(), "Type catalog discovered");
        catalog
    }

    /// Add or replace a type
    pub fn register(&mut self, descriptor: TypeDescriptor) {
        self.types.insert(descriptor.id, descriptor);
    }

    /// Builder-style [`register`](Self::register)
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn get(&self, id: &str) -> Option<&TypeDescriptor> {
        self.types.get(id)
    }

    /// Look a type up, failing with `TypeResolution`
    pub fn require(&self, id: &str) -> ConfigResult<&TypeDescriptor> {
        self.get(id).ok_or_else(|| ConfigError::TypeResolution {
            name: id.to_string(),
        })
    }

    /// All types in a namespace (including nested namespaces), in id order
    pub fn in_namespace<'a>(&'a self, namespace: &'a str) -> impl Iterator<Item = &'a TypeDescriptor> + 'a {
        self.types
            .values()
            .filter(move |descriptor| descriptor.is_in_namespace(namespace))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_names() {
        let descriptor = TypeDescriptor::new("app::domain::blog::Author", Constructor::Value);
        assert_eq!(descriptor.simple_name(), "Author");
        assert_eq!(descriptor.namespace(), "app::domain::blog");
        assert!(descriptor.is_in_namespace("app::domain"));
        assert!(descriptor.is_in_namespace("app::domain::blog::"));
        assert!(!descriptor.is_in_namespace("app::dom"));
        assert!(!descriptor.is_in_namespace("app::domain::blog::Author"));
    }

    #[test]
    fn test_namespace_scan_and_require() {
        let catalog = TypeCatalog::new()
            .with(TypeDescriptor::new("app::domain::Author", Constructor::Value))
            .with(TypeDescriptor::new("app::domain::Blog", Constructor::Value).with_alias("blog"))
            .with(TypeDescriptor::new("app::other::Tag", Constructor::Value));

        let ids: Vec<_> = catalog.in_namespace("app::domain").map(|d| d.id).collect();
        assert_eq!(ids, vec!["app::domain::Author", "app::domain::Blog"]);

        assert!(catalog.require("app::other::Tag").is_ok());
        assert!(matches!(
            catalog.require("app::missing::Type"),
            Err(ConfigError::TypeResolution { name }) if name == "app::missing::Type"
        ));
    }

    #[test]
    fn test_builtin_catalog_has_pluggables() {
        let catalog = TypeCatalog::builtin();
        let jdbc = catalog
            .require(crate::builtin::JDBC_TRANSACTION_FACTORY)
            .unwrap();
        assert_eq!(jdbc.constructor.kind(), "TransactionFactory");
        assert!(!catalog.is_empty());
    }
}
