//! Mapper registration and the hand-off to the mapper-document assembler

use std::collections::BTreeSet;
use std::fmt;

use tracing::debug;

use crate::catalog::{Constructor, TypeCatalog};
use crate::configuration::Configuration;
use crate::error::{ConfigError, ConfigResult};

/// Where a mapper document came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapperSource {
    Resource(String),
    Location(String),
}

impl MapperSource {
    pub fn as_str(&self) -> &str {
        match self {
            MapperSource::Resource(path) => path,
            MapperSource::Location(location) => location,
        }
    }
}

impl fmt::Display for MapperSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapperSource::Resource(path) => write!(f, "resource {}", path),
            MapperSource::Location(location) => write!(f, "location {}", location),
        }
    }
}

/// A mapper document waiting for the statement layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapperDocument {
    pub source: MapperSource,
    pub content: String,
}

/// Parses mapper document bodies into statements.
///
/// Runs after type aliases and handlers are registered, so implementations
/// can resolve both through the configuration.
pub trait MapperDocumentAssembler: Send + Sync {
    fn assemble(&self, configuration: &mut Configuration, document: MapperDocument) -> ConfigResult<()>;
}

/// Queues documents on the configuration for the execution engine
#[derive(Debug, Default, Clone, Copy)]
pub struct DeferredMapperAssembler;

impl MapperDocumentAssembler for DeferredMapperAssembler {
    fn assemble(&self, configuration: &mut Configuration, document: MapperDocument) -> ConfigResult<()> {
        if configuration.is_resource_loaded(document.source.as_str()) {
            debug!(source = %document.source, "Mapper document already loaded");
            return Ok(());
        }
        configuration.add_loaded_resource(document.source.as_str());
        configuration.add_pending_mapper_document(document);
        Ok(())
    }
}

/// Known mapper types
#[derive(Debug, Clone, Default)]
pub struct MapperRegistry {
    mappers: BTreeSet<String>,
}

impl MapperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mapper type; fails on unknown ids, non-mapper types and duplicates
    pub fn add_mapper(&mut self, type_id: &str, catalog: &TypeCatalog) -> ConfigResult<()> {
        let descriptor = catalog.require(type_id)?;
        if !matches!(descriptor.constructor, Constructor::Mapper) {
            return Err(ConfigError::Instantiation {
                name: type_id.to_string(),
                expected: "mapper".to_string(),
            });
        }
        if !self.mappers.insert(descriptor.id.to_string()) {
            return Err(ConfigError::DuplicateMapper {
                type_id: type_id.to_string(),
            });
        }
        debug!(mapper = type_id, "Mapper registered");
        Ok(())
    }

    /// Register every concrete mapper type in `namespace`
    pub fn add_mappers(&mut self, namespace: &str, catalog: &TypeCatalog) -> ConfigResult<usize> {
        let mut registered = 0;
        for descriptor in catalog.in_namespace(namespace) {
            if !descriptor.concrete || !matches!(descriptor.constructor, Constructor::Mapper) {
                continue;
            }
            self.add_mapper(descriptor.id, catalog)?;
            registered += 1;
        }
        Ok(registered)
    }

    pub fn has_mapper(&self, type_id: &str) -> bool {
        self.mappers.contains(type_id)
    }

    pub fn mappers(&self) -> impl Iterator<Item = &str> {
        self.mappers.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::TypeDescriptor;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new()
            .with(TypeDescriptor::new("app::mappers::AuthorMapper", Constructor::Mapper))
            .with(TypeDescriptor::new("app::mappers::BlogMapper", Constructor::Mapper))
            .with(TypeDescriptor::new("app::mappers::BaseMapper", Constructor::Mapper).non_concrete())
            .with(TypeDescriptor::new("app::mappers::Row", Constructor::Value))
    }

    #[test]
    fn test_add_mapper_rules() {
        let catalog = catalog();
        let mut registry = MapperRegistry::new();
        registry.add_mapper("app::mappers::AuthorMapper", &catalog).unwrap();
        assert!(registry.has_mapper("app::mappers::AuthorMapper"));

        assert!(matches!(
            registry.add_mapper("app::mappers::AuthorMapper", &catalog),
            Err(ConfigError::DuplicateMapper { .. })
        ));
        assert!(matches!(
            registry.add_mapper("app::mappers::Row", &catalog),
            Err(ConfigError::Instantiation { .. })
        ));
        assert!(matches!(
            registry.add_mapper("app::mappers::Nope", &catalog),
            Err(ConfigError::TypeResolution { .. })
        ));
    }

    #[test]
    fn test_add_mappers_scans_namespace() {
        let mut registry = MapperRegistry::new();
        assert_eq!(registry.add_mappers("app::mappers", &catalog()).unwrap(), 2);
        let all: Vec<_> = registry.mappers().collect();
        assert_eq!(all, vec!["app::mappers::AuthorMapper", "app::mappers::BlogMapper"]);
    }

    #[test]
    fn test_deferred_assembler_queues_once() {
        let mut configuration = Configuration::new();
        let assembler = DeferredMapperAssembler;
        let document = MapperDocument {
            source: MapperSource::Resource("mappers/AuthorMapper.yaml".to_string()),
            content: "namespace: AuthorMapper".to_string(),
        };

        assembler.assemble(&mut configuration, document.clone()).unwrap();
        assembler.assemble(&mut configuration, document).unwrap();

        assert!(configuration.is_resource_loaded("mappers/AuthorMapper.yaml"));
        assert_eq!(configuration.pending_mapper_documents().len(), 1);
    }
}
