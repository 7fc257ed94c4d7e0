//! Entrypoint turning a configuration document into a [`SessionFactory`]

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use sqlweave_config::{
    ConfigNode, Configuration, ConfigurationAssembler, FileResourceLoader, MapperDocumentAssembler, Properties,
    ResourceLoader, TypeCatalog,
};
use tracing::debug;

use crate::error::SessionResult;
use crate::factory::SessionFactory;

/// Default prefix of process environment variables collected as overrides
pub const DEFAULT_ENV_PREFIX: &str = "SQLWEAVE";

/// Collects the inputs of one assembly run
pub struct SessionFactoryBuilder {
    environment: Option<String>,
    variables: Properties,
    env_prefix: Option<String>,
    resource_roots: Vec<PathBuf>,
    catalog: Option<Arc<TypeCatalog>>,
    resource_loader: Option<Arc<dyn ResourceLoader>>,
    mapper_assembler: Option<Arc<dyn MapperDocumentAssembler>>,
}

impl Default for SessionFactoryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionFactoryBuilder {
    pub fn new() -> Self {
        Self {
            environment: None,
            variables: Properties::new(),
            env_prefix: Some(DEFAULT_ENV_PREFIX.to_string()),
            resource_roots: Vec::new(),
            catalog: None,
            resource_loader: None,
            mapper_assembler: None,
        }
    }

    /// Select an environment instead of the document's default
    pub fn environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Override variables; merged over any environment-derived ones
    pub fn variables(mut self, variables: Properties) -> Self {
        self.variables.extend(variables);
        self
    }

    /// Add a single override variable
    pub fn variable(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(name.into(), value.into());
        self
    }

    /// Prefix for environment variables collected as overrides; `None` disables collection
    pub fn env_prefix(mut self, prefix: Option<&str>) -> Self {
        self.env_prefix = prefix.map(str::to_string);
        self
    }

    /// Add a directory searched for `resource` references, in order
    pub fn resource_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.resource_roots.push(root.into());
        self
    }

    /// Resolve type ids through `catalog`; defaults to [`TypeCatalog::discover`]
    pub fn catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Replace the file-based resource loader entirely
    pub fn resource_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.resource_loader = Some(loader);
        self
    }

    pub fn mapper_assembler(mut self, assembler: Arc<dyn MapperDocumentAssembler>) -> Self {
        self.mapper_assembler = Some(assembler);
        self
    }

    /// Build from a YAML byte stream.
    ///
    /// The reader is dropped once this returns, whatever the outcome.
    pub fn build_from_reader<R: Read>(self, reader: R) -> SessionResult<SessionFactory> {
        let root = ConfigNode::from_yaml_reader(reader)?;
        self.build_from_node(root)
    }

    pub fn build_from_str(self, document: &str) -> SessionResult<SessionFactory> {
        let root = ConfigNode::from_yaml_str(document)?;
        self.build_from_node(root)
    }

    pub fn build_from_bytes(self, document: &[u8]) -> SessionResult<SessionFactory> {
        self.build_from_reader(document)
    }

    /// Assemble an already-parsed document
    pub fn build_from_node(self, root: ConfigNode) -> SessionResult<SessionFactory> {
        let variables = self.collect_variables();
        let loader = self.resource_loader.clone().unwrap_or_else(|| {
            let loader = if self.resource_roots.is_empty() {
                FileResourceLoader::new()
            } else {
                FileResourceLoader::with_roots(self.resource_roots.clone())
            };
            Arc::new(loader) as Arc<dyn ResourceLoader>
        });
        let catalog = self
            .catalog
            .clone()
            .unwrap_or_else(|| Arc::new(TypeCatalog::discover()));

        let mut assembler = ConfigurationAssembler::new(root)
            .with_variables(variables)
            .with_catalog(catalog)
            .with_resource_loader(loader);
        if let Some(environment) = &self.environment {
            assembler = assembler.with_environment(environment.clone());
        }
        if let Some(mapper_assembler) = &self.mapper_assembler {
            assembler = assembler.with_mapper_assembler(Arc::clone(mapper_assembler));
        }

        let configuration = assembler.parse()?;
        Ok(self.build(configuration))
    }

    /// Wrap an assembled configuration
    pub fn build(self, configuration: Configuration) -> SessionFactory {
        SessionFactory::new(configuration)
    }

    /// Environment-derived variables overlaid with the programmatic ones
    fn collect_variables(&self) -> Properties {
        let mut variables = match &self.env_prefix {
            Some(prefix) => env_variables(prefix),
            None => Properties::new(),
        };
        variables.extend(self.variables.clone());
        variables
    }
}

/// `PREFIX_name=value` process variables as `name=value`
fn env_variables(prefix: &str) -> Properties {
    let prefix = format!("{}_", prefix);
    let variables: Properties = std::env::vars_os()
        .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)))
        .filter_map(|(key, value)| {
            let name = key.strip_prefix(&prefix)?;
            (!name.is_empty()).then(|| (name.to_string(), value))
        })
        .collect();
    if !variables.is_empty() {
        debug!(prefix = %prefix, count = variables.len(), "Collected variables from environment");
    }
    variables
}
