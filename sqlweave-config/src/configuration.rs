//! The assembled configuration registry
//!
//! Mutable while the assembler owns it; shared read-mostly behind an `Arc`
//! once assembly completes. Post-build mutation must be serialized by the
//! caller.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::catalog::TypeCatalog;
use crate::environment::Environment;
use crate::factory::{
    DefaultObjectFactory, DefaultObjectWrapperFactory, DefaultReflectorFactory, ObjectFactory,
    ObjectWrapperFactory, ReflectorFactory, Vfs,
};
use crate::mapper::{MapperDocument, MapperRegistry};
use crate::plugin::{Interceptor, InterceptorChain};
use crate::properties::Properties;
use crate::settings::Settings;
use crate::type_alias::TypeAliasRegistry;
use crate::type_handler::TypeHandlerRegistry;

/// A pluggable instance together with the type id it was built from
#[derive(Debug)]
pub struct Installed<T: ?Sized> {
    pub type_id: String,
    pub instance: Arc<T>,
}

impl<T: ?Sized> Clone for Installed<T> {
    fn clone(&self) -> Self {
        Self {
            type_id: self.type_id.clone(),
            instance: Arc::clone(&self.instance),
        }
    }
}

impl<T: ?Sized> Installed<T> {
    pub fn new(type_id: impl Into<String>, instance: Arc<T>) -> Self {
        Self {
            type_id: type_id.into(),
            instance,
        }
    }
}

/// Central registry every stage of assembly writes into
#[derive(Debug, Clone)]
pub struct Configuration {
    variables: Properties,
    settings: Settings,
    environment: Option<Environment>,
    database_id: Option<String>,
    object_factory: Installed<dyn ObjectFactory>,
    object_wrapper_factory: Installed<dyn ObjectWrapperFactory>,
    reflector_factory: Installed<dyn ReflectorFactory>,
    vfs_impl: Option<Installed<dyn Vfs>>,
    type_catalog: Arc<TypeCatalog>,
    type_alias_registry: TypeAliasRegistry,
    type_handler_registry: TypeHandlerRegistry,
    interceptor_chain: InterceptorChain,
    mapper_registry: MapperRegistry,
    loaded_resources: BTreeSet<String>,
    pending_mapper_documents: Vec<MapperDocument>,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    /// Configuration over the built-in type catalog
    pub fn new() -> Self {
        Self::with_catalog(Arc::new(TypeCatalog::builtin()))
    }

    /// Configuration resolving type ids through `catalog`
    pub fn with_catalog(catalog: Arc<TypeCatalog>) -> Self {
        Self {
            variables: Properties::new(),
            settings: Settings::default(),
            environment: None,
            database_id: None,
            object_factory: Installed::new(
                crate::builtin::DEFAULT_OBJECT_FACTORY,
                Arc::new(DefaultObjectFactory::default()) as Arc<dyn ObjectFactory>,
            ),
            object_wrapper_factory: Installed::new(
                crate::builtin::DEFAULT_OBJECT_WRAPPER_FACTORY,
                Arc::new(DefaultObjectWrapperFactory) as Arc<dyn ObjectWrapperFactory>,
            ),
            reflector_factory: Installed::new(
                crate::builtin::DEFAULT_REFLECTOR_FACTORY,
                Arc::new(DefaultReflectorFactory::default()) as Arc<dyn ReflectorFactory>,
            ),
            vfs_impl: None,
            type_catalog: catalog,
            type_alias_registry: TypeAliasRegistry::with_builtin_aliases(),
            type_handler_registry: TypeHandlerRegistry::with_builtin_handlers(),
            interceptor_chain: InterceptorChain::new(),
            mapper_registry: MapperRegistry::new(),
            loaded_resources: BTreeSet::new(),
            pending_mapper_documents: Vec::new(),
        }
    }

    pub fn variables(&self) -> &Properties {
        &self.variables
    }

    pub fn set_variables(&mut self, variables: Properties) {
        self.variables = variables;
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    pub fn set_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    pub fn set_environment(&mut self, environment: Environment) {
        self.environment = Some(environment);
    }

    pub fn database_id(&self) -> Option<&str> {
        self.database_id.as_deref()
    }

    pub fn set_database_id(&mut self, database_id: Option<String>) {
        self.database_id = database_id;
    }

    pub fn object_factory(&self) -> &Installed<dyn ObjectFactory> {
        &self.object_factory
    }

    pub fn set_object_factory(&mut self, factory: Installed<dyn ObjectFactory>) {
        self.object_factory = factory;
    }

    pub fn object_wrapper_factory(&self) -> &Installed<dyn ObjectWrapperFactory> {
        &self.object_wrapper_factory
    }

    pub fn set_object_wrapper_factory(&mut self, factory: Installed<dyn ObjectWrapperFactory>) {
        self.object_wrapper_factory = factory;
    }

    pub fn reflector_factory(&self) -> &Installed<dyn ReflectorFactory> {
        &self.reflector_factory
    }

    pub fn set_reflector_factory(&mut self, factory: Installed<dyn ReflectorFactory>) {
        self.reflector_factory = factory;
    }

    pub fn vfs_impl(&self) -> Option<&Installed<dyn Vfs>> {
        self.vfs_impl.as_ref()
    }

    /// Only one implementation is active; the last one set wins
    pub fn set_vfs_impl(&mut self, vfs: Installed<dyn Vfs>) {
        self.vfs_impl = Some(vfs);
    }

    pub fn type_catalog(&self) -> &Arc<TypeCatalog> {
        &self.type_catalog
    }

    pub fn type_alias_registry(&self) -> &TypeAliasRegistry {
        &self.type_alias_registry
    }

    pub fn type_alias_registry_mut(&mut self) -> &mut TypeAliasRegistry {
        &mut self.type_alias_registry
    }

    pub fn type_handler_registry(&self) -> &TypeHandlerRegistry {
        &self.type_handler_registry
    }

    pub fn type_handler_registry_mut(&mut self) -> &mut TypeHandlerRegistry {
        &mut self.type_handler_registry
    }

    pub fn interceptor_chain(&self) -> &InterceptorChain {
        &self.interceptor_chain
    }

    pub fn add_interceptor(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptor_chain.add(interceptor);
    }

    pub fn mapper_registry(&self) -> &MapperRegistry {
        &self.mapper_registry
    }

    pub fn mapper_registry_mut(&mut self) -> &mut MapperRegistry {
        &mut self.mapper_registry
    }

    pub fn is_resource_loaded(&self, resource: &str) -> bool {
        self.loaded_resources.contains(resource)
    }

    pub fn add_loaded_resource(&mut self, resource: &str) {
        self.loaded_resources.insert(resource.to_string());
    }

    pub fn add_pending_mapper_document(&mut self, document: MapperDocument) {
        self.pending_mapper_documents.push(document);
    }

    /// Mapper documents waiting for the statement layer, in registration order
    pub fn pending_mapper_documents(&self) -> &[MapperDocument] {
        &self.pending_mapper_documents
    }

    /// Hand the queued mapper documents to the caller
    pub fn take_pending_mapper_documents(&mut self) -> Vec<MapperDocument> {
        std::mem::take(&mut self.pending_mapper_documents)
    }

    /// Register a mapper type through the configuration's catalog
    pub fn add_mapper(&mut self, type_id: &str) -> crate::error::ConfigResult<()> {
        let catalog = Arc::clone(&self.type_catalog);
        self.mapper_registry.add_mapper(type_id, &catalog)
    }

    /// Register every mapper type in a namespace
    pub fn add_mappers(&mut self, namespace: &str) -> crate::error::ConfigResult<usize> {
        let catalog = Arc::clone(&self.type_catalog);
        self.mapper_registry.add_mappers(namespace, &catalog)
    }
}
