//! Short-name aliases for catalog types

use std::collections::BTreeMap;

use tracing::debug;

use crate::catalog::{TypeCatalog, TypeDescriptor};
use crate::error::{ConfigError, ConfigResult};

/// Case-insensitive alias → type id.
///
/// Re-registering an alias silently replaces the previous mapping.
#[derive(Debug, Clone, Default)]
pub struct TypeAliasRegistry {
    aliases: BTreeMap<String, String>,
}

impl TypeAliasRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry pre-populated with the built-in aliases
    pub fn with_builtin_aliases() -> Self {
        let mut registry = Self::new();
        for (alias, type_id) in crate::builtin::BUILTIN_ALIASES {
            registry.register_alias(alias, type_id);
        }
        registry
    }

    pub fn register_alias(&mut self, alias: &str, type_id: &str) {
        let key = alias.to_lowercase();
        if let Some(previous) = self.aliases.insert(key, type_id.to_string()) {
            if previous != type_id {
                debug!(alias, previous = %previous, replacement = type_id, "Type alias replaced");
            }
        }
    }

    /// Register under the declared alias, or the simple name when none
    pub fn register_type(&mut self, descriptor: &TypeDescriptor) {
        let alias = descriptor.alias.unwrap_or_else(|| descriptor.simple_name());
        self.register_alias(alias, descriptor.id);
    }

    /// Register every concrete type in `namespace`
    pub fn register_namespace(&mut self, namespace: &str, catalog: &TypeCatalog) -> usize {
        let mut registered = 0;
        for descriptor in catalog.in_namespace(namespace) {
            if !descriptor.concrete {
                continue;
            }
            self.register_type(descriptor);
            registered += 1;
        }
        debug!(namespace, registered, "Registered type aliases from namespace");
        registered
    }

    /// Type id registered under `alias`
    pub fn lookup(&self, alias: &str) -> Option<&str> {
        self.aliases.get(&alias.to_lowercase()).map(String::as_str)
    }

    /// Resolve an alias or a full type id to a catalog entry
    pub fn resolve<'c>(&self, name: &str, catalog: &'c TypeCatalog) -> ConfigResult<&'c TypeDescriptor> {
        let type_id = self.lookup(name).unwrap_or(name);
        catalog.get(type_id).ok_or_else(|| ConfigError::TypeResolution {
            name: name.to_string(),
        })
    }

    /// All aliases (lower-cased) with their type ids
    pub fn aliases(&self) -> &BTreeMap<String, String> {
        &self.aliases
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Constructor;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeDescriptor::new("app::domain::Author", Constructor::Value))
            .with(TypeDescriptor::new("app::domain::Blog", Constructor::Value).with_alias("Weblog"))
            .with(TypeDescriptor::new("app::domain::Entity", Constructor::Value).non_concrete())
    }

    #[test]
    fn test_aliases_are_case_insensitive() {
        let catalog = catalog();
        let mut registry = TypeAliasRegistry::new();
        registry.register_alias("Author", "app::domain::Author");

        assert_eq!(registry.lookup("AUTHOR"), Some("app::domain::Author"));
        assert_eq!(registry.resolve("author", &catalog).unwrap().id, "app::domain::Author");
        assert_eq!(
            registry.resolve("app::domain::Blog", &catalog).unwrap().id,
            "app::domain::Blog"
        );
    }

    #[test]
    fn test_unknown_name_fails_resolution() {
        let registry = TypeAliasRegistry::new();
        let err = registry.resolve("Missing", &catalog()).unwrap_err();
        assert!(matches!(err, ConfigError::TypeResolution { name } if name == "Missing"));
    }

    #[test]
    fn test_overwrite_is_silent() {
        let mut registry = TypeAliasRegistry::new();
        registry.register_alias("thing", "app::domain::Author");
        registry.register_alias("Thing", "app::domain::Blog");
        assert_eq!(registry.lookup("thing"), Some("app::domain::Blog"));
        assert_eq!(registry.aliases().len(), 1);
    }

    #[test]
    fn test_namespace_scan_uses_declared_alias_and_skips_abstract() {
        let mut registry = TypeAliasRegistry::new();
        assert_eq!(registry.register_namespace("app::domain", &catalog()), 2);
        assert_eq!(registry.lookup("author"), Some("app::domain::Author"));
        assert_eq!(registry.lookup("weblog"), Some("app::domain::Blog"));
        assert_eq!(registry.lookup("blog"), None);
        assert_eq!(registry.lookup("entity"), None);
    }

    #[test]
    fn test_builtin_aliases() {
        let registry = TypeAliasRegistry::with_builtin_aliases();
        let catalog = TypeCatalog::builtin();
        assert!(registry.resolve("JDBC", &catalog).is_ok());
        assert!(registry.resolve("pooled", &catalog).is_ok());
        assert!(registry.resolve("string", &catalog).is_ok());
    }
}
