//! Document-driven assembly of a [`Configuration`]
//!
//! The assembler walks the document sections in a fixed order, each stage
//! depending on state left behind by earlier ones: variables before anything
//! that substitutes them, type aliases before anything that resolves a type
//! by short name, the environment before the database id, and type aliases
//! plus handlers before mapper documents are handed over.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::catalog::{Constructor, TypeCatalog, TypeDescriptor};
use crate::configuration::{Configuration, Installed};
use crate::database_id::normalize_provider_kind;
use crate::document::DocumentView;
use crate::environment::Environment;
use crate::error::{ConfigError, ConfigResult};
use crate::mapper::{DeferredMapperAssembler, MapperDocument, MapperDocumentAssembler, MapperSource};
use crate::properties::{substitute, Properties};
use crate::resources::{properties_from_document, FileResourceLoader, ResourceLoader};
use crate::settings::{validate_setting_keys, Settings, VFS_IMPL};
use crate::type_handler::JdbcType;

enum AssemblerState {
    Unbuilt(Box<Configuration>),
    Built,
}

/// Single-use builder turning a document into a [`Configuration`]
pub struct ConfigurationAssembler<D: DocumentView> {
    root: D,
    environment: Option<String>,
    variables: Properties,
    resource_loader: Arc<dyn ResourceLoader>,
    mapper_assembler: Arc<dyn MapperDocumentAssembler>,
    state: AssemblerState,
}

impl<D: DocumentView> ConfigurationAssembler<D> {
    pub fn new(root: D) -> Self {
        Self {
            root,
            environment: None,
            variables: Properties::new(),
            resource_loader: Arc::new(FileResourceLoader::new()),
            mapper_assembler: Arc::new(DeferredMapperAssembler),
            state: AssemblerState::Unbuilt(Box::new(Configuration::new())),
        }
    }

    /// Select an environment instead of the document's default
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = Some(environment.into());
        self
    }

    /// Override variables; these win over every other variable source
    pub fn with_variables(mut self, variables: Properties) -> Self {
        self.variables = variables;
        self
    }

    /// Resolve type ids through `catalog` instead of the built-in one
    pub fn with_catalog(mut self, catalog: Arc<TypeCatalog>) -> Self {
        if let AssemblerState::Unbuilt(_) = self.state {
            self.state = AssemblerState::Unbuilt(Box::new(Configuration::with_catalog(catalog)));
        }
        self
    }

    pub fn with_resource_loader(mut self, loader: Arc<dyn ResourceLoader>) -> Self {
        self.resource_loader = loader;
        self
    }

    pub fn with_mapper_assembler(mut self, assembler: Arc<dyn MapperDocumentAssembler>) -> Self {
        self.mapper_assembler = assembler;
        self
    }

    /// Run every stage and hand back the wired configuration.
    ///
    /// Only the first call does any work; later calls fail with
    /// [`ConfigError::ReuseViolation`].
    pub fn parse(&mut self) -> ConfigResult<Configuration> {
        let mut configuration = match std::mem::replace(&mut self.state, AssemblerState::Built) {
            AssemblerState::Unbuilt(configuration) => *configuration,
            AssemblerState::Built => return Err(ConfigError::ReuseViolation),
        };
        self.parse_configuration(&mut configuration)?;
        info!(
            environment = configuration.environment().map(Environment::id).unwrap_or("<none>"),
            database_id = configuration.database_id().unwrap_or("<none>"),
            interceptors = configuration.interceptor_chain().len(),
            mappers = configuration.mapper_registry().mappers().count(),
            "Configuration assembled"
        );
        Ok(configuration)
    }

    pub fn is_parsed(&self) -> bool {
        matches!(self.state, AssemblerState::Built)
    }

    fn parse_configuration(&self, configuration: &mut Configuration) -> ConfigResult<()> {
        let root = &self.root;

        in_section("properties", self.properties_element(root.child("properties"), configuration))?;
        let settings = in_section("settings", settings_as_properties(root.child("settings"), configuration))?;
        in_section("settings", load_custom_vfs(&settings, configuration))?;
        in_section("typeAliases", type_aliases_element(root.child("typeAliases"), configuration))?;
        in_section("plugins", plugin_element(root.child("plugins"), configuration))?;
        in_section("objectFactory", object_factory_element(root.child("objectFactory"), configuration))?;
        in_section(
            "objectWrapperFactory",
            object_wrapper_factory_element(root.child("objectWrapperFactory"), configuration),
        )?;
        in_section(
            "reflectorFactory",
            reflector_factory_element(root.child("reflectorFactory"), configuration),
        )?;
        in_section("settings", settings_element(&settings, configuration))?;
        in_section("environments", self.environments_element(root.child("environments"), configuration))?;
        in_section(
            "databaseIdProvider",
            database_id_provider_element(root.child("databaseIdProvider"), configuration),
        )?;
        in_section("typeHandlers", type_handlers_element(root.child("typeHandlers"), configuration))?;
        in_section("mappers", self.mappers_element(root.child("mappers"), configuration))?;
        Ok(())
    }

    fn properties_element(&self, context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
        // Substitution inside the block only sees the override variables
        configuration.set_variables(self.variables.clone());
        let Some(context) = context else {
            return Ok(());
        };

        let resource = attribute(context, "resource", configuration);
        let location = location_attribute(context, configuration);
        if resource.is_some() && location.is_some() {
            return Err(ConfigError::ConflictingSource {
                element: "properties".to_string(),
                message: "cannot specify both a resource and a location based property file reference".to_string(),
            });
        }

        let mut variables = inline_properties(context, &["resource", "location", "url"], configuration);
        variables.extend(child_properties(context, configuration));
        if let Some(resource) = resource {
            let content = self.resource_loader.load_resource(&resource)?;
            let loaded = properties_from_document(&resource, &content)?;
            debug!(resource = %resource, count = loaded.len(), "Loaded variables from resource");
            variables.extend(loaded);
        } else if let Some(location) = location {
            let content = self.resource_loader.load_location(&location)?;
            let loaded = properties_from_document(&location, &content)?;
            debug!(location = %location, count = loaded.len(), "Loaded variables from location");
            variables.extend(loaded);
        }

        variables.extend(self.variables.clone());
        debug!(count = variables.len(), "Variables resolved");
        configuration.set_variables(variables);
        Ok(())
    }

    fn environments_element(&self, context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
        let Some(context) = context else {
            return Ok(());
        };
        let entries: Vec<&D> = context
            .children()
            .into_iter()
            .filter(|child| child.name() == "environment")
            .collect();
        if entries.is_empty() {
            debug!("No environments declared");
            return Ok(());
        }
        let target = self
            .environment
            .clone()
            .or_else(|| attribute(context, "default", configuration))
            .ok_or(ConfigError::MissingEnvironmentSelector)?;

        let mut declared = Vec::new();
        let mut selected = None;
        for child in entries {
            let id = attribute(child, "id", configuration).ok_or(ConfigError::MissingEnvironmentId)?;
            if id == target {
                if selected.is_some() {
                    warn!(environment = %id, "Environment declared more than once, keeping the first");
                } else {
                    selected = Some(build_environment(&id, child, configuration)?);
                }
            }
            declared.push(id);
        }

        let environment = selected.ok_or(ConfigError::UnknownEnvironment { id: target, declared })?;
        debug!(environment = environment.id(), "Environment selected");
        configuration.set_environment(environment);
        Ok(())
    }

    fn mappers_element(&self, context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
        let Some(context) = context else {
            return Ok(());
        };
        for child in context.children() {
            match child.name() {
                "package" => {
                    let namespace = required_attribute(child, "name", configuration)?;
                    let registered = configuration.add_mappers(&namespace)?;
                    debug!(namespace = %namespace, registered, "Registered mappers from namespace");
                }
                "mapper" => self.mapper_entry(child, configuration)?,
                other => debug!(element = other, "Ignoring unknown mappers entry"),
            }
        }
        Ok(())
    }

    fn mapper_entry(&self, child: &D, configuration: &mut Configuration) -> ConfigResult<()> {
        let resource = attribute(child, "resource", configuration);
        let location = location_attribute(child, configuration);
        let class = attribute(child, "class", configuration);

        let given = [&resource, &location, &class].iter().filter(|a| a.is_some()).count();
        if given > 1 {
            return Err(ConfigError::ConflictingSource {
                element: "mapper".to_string(),
                message: "may only specify a location, resource or class, but not more than one".to_string(),
            });
        }

        match (resource, location, class) {
            (Some(resource), _, _) => {
                let content = self.resource_loader.load_resource(&resource)?;
                self.mapper_assembler.assemble(
                    configuration,
                    MapperDocument {
                        source: MapperSource::Resource(resource),
                        content,
                    },
                )
            }
            (_, Some(location), _) => {
                let content = self.resource_loader.load_location(&location)?;
                self.mapper_assembler.assemble(
                    configuration,
                    MapperDocument {
                        source: MapperSource::Location(location),
                        content,
                    },
                )
            }
            (_, _, Some(class)) => {
                let descriptor = resolve_type(configuration, &class)?;
                configuration.add_mapper(descriptor.id)
            }
            (None, None, None) => Err(ConfigError::MissingSource {
                element: "mapper".to_string(),
                message: "must specify a location, resource or class".to_string(),
            }),
        }
    }
}

fn in_section<T>(section: &'static str, result: ConfigResult<T>) -> ConfigResult<T> {
    result.map_err(|e| {
        debug!(section, error = %e, "Configuration stage failed");
        e.in_section(section)
    })
}

fn attribute<D: DocumentView>(node: &D, name: &str, configuration: &Configuration) -> Option<String> {
    node.attribute(name)
        .map(|value| substitute(value, configuration.variables()))
}

fn required_attribute<D: DocumentView>(node: &D, name: &str, configuration: &Configuration) -> ConfigResult<String> {
    attribute(node, name, configuration).ok_or_else(|| ConfigError::missing_attribute(node.name(), name))
}

/// `location`, or the older `url` spelling
fn location_attribute<D: DocumentView>(node: &D, configuration: &Configuration) -> Option<String> {
    attribute(node, "location", configuration).or_else(|| attribute(node, "url", configuration))
}

fn child_properties<D: DocumentView>(node: &D, configuration: &Configuration) -> Properties {
    node.children_as_properties()
        .into_iter()
        .map(|(name, value)| {
            let value = substitute(&value, configuration.variables());
            (name, value)
        })
        .collect()
}

/// Scalar `key: value` entries written directly on the element, minus `reserved`
fn inline_properties<D: DocumentView>(node: &D, reserved: &[&str], configuration: &Configuration) -> Properties {
    node.attributes()
        .into_iter()
        .filter(|(name, _)| !reserved.contains(name))
        .map(|(name, value)| (name.to_string(), substitute(value, configuration.variables())))
        .collect()
}

fn resolve_type(configuration: &Configuration, name: &str) -> ConfigResult<TypeDescriptor> {
    configuration
        .type_alias_registry()
        .resolve(name, configuration.type_catalog())
        .copied()
}

fn wrong_kind(descriptor: &TypeDescriptor, expected: &str) -> ConfigError {
    ConfigError::Instantiation {
        name: descriptor.id.to_string(),
        expected: format!("{} (registered as {})", expected, descriptor.constructor.kind()),
    }
}

fn settings_as_properties<D: DocumentView>(
    context: Option<&D>,
    configuration: &Configuration,
) -> ConfigResult<Properties> {
    let Some(context) = context else {
        return Ok(Properties::new());
    };
    let mut props = inline_properties(context, &[], configuration);
    props.extend(child_properties(context, configuration));
    validate_setting_keys(&props)?;
    debug!(count = props.len(), "Settings read");
    Ok(props)
}

fn load_custom_vfs(settings: &Properties, configuration: &mut Configuration) -> ConfigResult<()> {
    let Some(value) = settings.get(VFS_IMPL) else {
        return Ok(());
    };
    for name in value.split(',').map(str::trim).filter(|name| !name.is_empty()) {
        let descriptor = resolve_type(configuration, name)?;
        let Constructor::Vfs(construct) = descriptor.constructor else {
            return Err(wrong_kind(&descriptor, "Vfs"));
        };
        debug!(vfs = descriptor.id, "Installing VFS implementation");
        configuration.set_vfs_impl(Installed::new(descriptor.id, construct()));
    }
    Ok(())
}

fn type_aliases_element<D: DocumentView>(context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
    let Some(context) = context else {
        return Ok(());
    };
    let catalog = Arc::clone(configuration.type_catalog());
    for child in context.children() {
        if child.name() == "package" {
            let namespace = required_attribute(child, "name", configuration)?;
            configuration
                .type_alias_registry_mut()
                .register_namespace(&namespace, &catalog);
            continue;
        }
        let alias = attribute(child, "alias", configuration);
        let type_id = required_attribute(child, "type", configuration)?;
        let descriptor = catalog.require(&type_id)?;
        match alias {
            Some(alias) => configuration
                .type_alias_registry_mut()
                .register_alias(&alias, descriptor.id),
            None => configuration.type_alias_registry_mut().register_type(descriptor),
        }
    }
    Ok(())
}

fn plugin_element<D: DocumentView>(context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
    let Some(context) = context else {
        return Ok(());
    };
    for child in context.children() {
        let name = required_attribute(child, "interceptor", configuration)?;
        let properties = child_properties(child, configuration);
        let descriptor = resolve_type(configuration, &name)?;
        let Constructor::Interceptor(construct) = descriptor.constructor else {
            return Err(wrong_kind(&descriptor, "Interceptor"));
        };
        let mut interceptor = construct();
        interceptor.set_properties(&properties)?;
        debug!(interceptor = descriptor.id, "Interceptor added");
        configuration.add_interceptor(Arc::from(interceptor));
    }
    Ok(())
}

fn object_factory_element<D: DocumentView>(context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
    let Some(context) = context else {
        return Ok(());
    };
    let name = required_attribute(context, "type", configuration)?;
    let properties = child_properties(context, configuration);
    let descriptor = resolve_type(configuration, &name)?;
    let Constructor::ObjectFactory(construct) = descriptor.constructor else {
        return Err(wrong_kind(&descriptor, "ObjectFactory"));
    };
    let mut factory = construct();
    factory.set_properties(&properties)?;
    configuration.set_object_factory(Installed::new(descriptor.id, Arc::from(factory)));
    Ok(())
}

fn object_wrapper_factory_element<D: DocumentView>(
    context: Option<&D>,
    configuration: &mut Configuration,
) -> ConfigResult<()> {
    let Some(context) = context else {
        return Ok(());
    };
    let name = required_attribute(context, "type", configuration)?;
    let descriptor = resolve_type(configuration, &name)?;
    let Constructor::ObjectWrapperFactory(construct) = descriptor.constructor else {
        return Err(wrong_kind(&descriptor, "ObjectWrapperFactory"));
    };
    configuration.set_object_wrapper_factory(Installed::new(descriptor.id, Arc::from(construct())));
    Ok(())
}

fn reflector_factory_element<D: DocumentView>(context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
    let Some(context) = context else {
        return Ok(());
    };
    let name = required_attribute(context, "type", configuration)?;
    let descriptor = resolve_type(configuration, &name)?;
    let Constructor::ReflectorFactory(construct) = descriptor.constructor else {
        return Err(wrong_kind(&descriptor, "ReflectorFactory"));
    };
    configuration.set_reflector_factory(Installed::new(descriptor.id, Arc::from(construct())));
    Ok(())
}

fn settings_element(props: &Properties, configuration: &mut Configuration) -> ConfigResult<()> {
    let mut settings = Settings::from_properties(props)?;
    if let Some(name) = settings.default_enum_type_handler.take() {
        let descriptor = resolve_type(configuration, &name)?;
        if !matches!(descriptor.constructor, Constructor::TypeHandler(_)) {
            return Err(wrong_kind(&descriptor, "TypeHandler"));
        }
        settings.default_enum_type_handler = Some(descriptor.id.to_string());
    }
    configuration.set_settings(settings);
    Ok(())
}

fn build_environment<D: DocumentView>(id: &str, context: &D, configuration: &Configuration) -> ConfigResult<Environment> {
    let incomplete = |missing: &str| ConfigError::IncompleteEnvironment {
        id: id.to_string(),
        missing: missing.to_string(),
    };

    let transaction_node = context
        .child("transactionManager")
        .ok_or_else(|| incomplete("transactionManager"))?;
    let name = required_attribute(transaction_node, "type", configuration)?;
    let descriptor = resolve_type(configuration, &name)?;
    let Constructor::TransactionFactory(construct) = descriptor.constructor else {
        return Err(wrong_kind(&descriptor, "TransactionFactory"));
    };
    let mut transaction_factory = construct();
    transaction_factory.set_properties(&child_properties(transaction_node, configuration))?;

    let data_source_node = context.child("dataSource").ok_or_else(|| incomplete("dataSource"))?;
    let name = required_attribute(data_source_node, "type", configuration)?;
    let descriptor = resolve_type(configuration, &name)?;
    let Constructor::DataSourceFactory(construct) = descriptor.constructor else {
        return Err(wrong_kind(&descriptor, "DataSourceFactory"));
    };
    let mut data_source_factory = construct();
    data_source_factory.set_properties(&child_properties(data_source_node, configuration))?;
    let data_source = data_source_factory.data_source()?;

    Environment::builder(id)
        .transaction_factory(Arc::from(transaction_factory))
        .data_source(data_source)
        .build()
}

fn database_id_provider_element<D: DocumentView>(
    context: Option<&D>,
    configuration: &mut Configuration,
) -> ConfigResult<()> {
    let Some(context) = context else {
        return Ok(());
    };
    let kind = required_attribute(context, "type", configuration)?;
    let kind = normalize_provider_kind(&kind);
    let properties = child_properties(context, configuration);
    let descriptor = resolve_type(configuration, kind)?;
    let Constructor::DatabaseIdProvider(construct) = descriptor.constructor else {
        return Err(wrong_kind(&descriptor, "DatabaseIdProvider"));
    };
    let mut provider = construct();
    provider.set_properties(&properties)?;

    let Some(environment) = configuration.environment() else {
        debug!("No environment installed, skipping database id");
        return Ok(());
    };
    let database_id = provider.database_id(&**environment.data_source())?;
    debug!(database_id = database_id.as_deref().unwrap_or("<none>"), "Database id resolved");
    configuration.set_database_id(database_id);
    Ok(())
}

fn type_handlers_element<D: DocumentView>(context: Option<&D>, configuration: &mut Configuration) -> ConfigResult<()> {
    let Some(context) = context else {
        return Ok(());
    };
    let catalog = Arc::clone(configuration.type_catalog());
    for child in context.children() {
        if child.name() == "package" {
            let namespace = required_attribute(child, "name", configuration)?;
            configuration
                .type_handler_registry_mut()
                .register_namespace(&namespace, &catalog);
            continue;
        }

        let semantic = attribute(child, "javaType", configuration)
            .map(|name| resolve_type(configuration, &name))
            .transpose()?
            .map(|descriptor| descriptor.id);
        let wire = attribute(child, "jdbcType", configuration)
            .map(|name| {
                name.parse::<JdbcType>()
                    .map_err(|reason| ConfigError::invalid_value("jdbcType", &name, reason))
            })
            .transpose()?;
        let name = required_attribute(child, "handler", configuration)?;
        let descriptor = resolve_type(configuration, &name)?;
        let Constructor::TypeHandler(construct) = descriptor.constructor else {
            return Err(wrong_kind(&descriptor, "TypeHandler"));
        };

        let registry = configuration.type_handler_registry_mut();
        match (semantic, wire) {
            (Some(semantic), Some(wire)) => {
                registry.register_mapping(Some(semantic), Some(wire), construct(Some(semantic)))
            }
            (Some(semantic), None) => registry.register_for_type(semantic, construct(Some(semantic))),
            (None, Some(wire)) => registry.register_mapping(None, Some(wire), construct(None)),
            (None, None) => registry.register(construct(None)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ConfigNode;

    fn assemble(yaml: &str) -> ConfigResult<Configuration> {
        ConfigurationAssembler::new(ConfigNode::from_yaml_str(yaml)?).parse()
    }

    #[test]
    fn test_empty_document_yields_defaults() {
        let configuration = assemble("").unwrap();
        assert_eq!(configuration.settings(), &Settings::default());
        assert!(configuration.environment().is_none());
        assert!(configuration.variables().is_empty());
    }

    #[test]
    fn test_second_parse_is_rejected() {
        let mut assembler = ConfigurationAssembler::new(ConfigNode::new("configuration"));
        assert!(!assembler.is_parsed());
        assembler.parse().unwrap();
        assert!(assembler.is_parsed());
        assert!(matches!(assembler.parse(), Err(ConfigError::ReuseViolation)));
    }

    #[test]
    fn test_failed_parse_still_consumes_assembler() {
        let root = ConfigNode::new("configuration")
            .with_child(ConfigNode::new("settings").with_property("noSuchSetting", "1"));
        let mut assembler = ConfigurationAssembler::new(root);
        let err = assembler.parse().unwrap_err();
        assert_eq!(err.section(), Some("settings"));
        assert!(matches!(err.root_cause(), ConfigError::UnknownSetting { key } if key == "noSuchSetting"));
        assert!(matches!(assembler.parse(), Err(ConfigError::ReuseViolation)));
    }

    #[test]
    fn test_variables_substitute_into_later_sections() {
        let yaml = r#"
properties:
  property:
    - { name: cache, value: "false" }
settings:
  setting:
    - { name: cacheEnabled, value: "${cache}" }
"#;
        let configuration = assemble(yaml).unwrap();
        assert!(!configuration.settings().cache_enabled);
        assert_eq!(configuration.variables()["cache"], "false");
    }

    #[test]
    fn test_override_variables_win() {
        let root = ConfigNode::new("configuration")
            .with_child(ConfigNode::new("properties").with_property("user", "doc"));
        let overrides: Properties = [("user".to_string(), "caller".to_string())].into_iter().collect();
        let configuration = ConfigurationAssembler::new(root)
            .with_variables(overrides)
            .parse()
            .unwrap();
        assert_eq!(configuration.variables()["user"], "caller");
    }

    #[test]
    fn test_url_is_accepted_as_location() {
        let root = ConfigNode::new("configuration").with_child(
            ConfigNode::new("properties")
                .with_attribute("resource", "vars.properties")
                .with_attribute("url", "file:///tmp/vars.properties"),
        );
        let err = ConfigurationAssembler::new(root).parse().unwrap_err();
        assert!(matches!(err.root_cause(), ConfigError::ConflictingSource { .. }));
    }

    #[test]
    fn test_wrong_constructor_kind_is_instantiation_failure() {
        let yaml = r#"
objectFactory:
  type: JDBC
"#;
        let err = assemble(yaml).unwrap_err();
        assert_eq!(err.section(), Some("objectFactory"));
        assert!(matches!(err.root_cause(), ConfigError::Instantiation { .. }));
    }

    #[test]
    fn test_missing_environment_selector() {
        let yaml = r#"
environments:
  environment:
    - id: dev
"#;
        let err = assemble(yaml).unwrap_err();
        assert!(matches!(err.root_cause(), ConfigError::MissingEnvironmentSelector));
    }

    #[test]
    fn test_environments_without_entries_install_nothing() {
        let configuration = assemble("environments: {}\n").unwrap();
        assert!(configuration.environment().is_none());

        let configuration = assemble("environments:\n  default: dev\n").unwrap();
        assert!(configuration.environment().is_none());
    }

    #[test]
    fn test_scalar_settings_and_properties() {
        let yaml = r#"
properties:
  cache: "false"
  property:
    - { name: size, value: "64" }
settings:
  cacheEnabled: "${cache}"
  defaultFetchSize: "${size}"
"#;
        let configuration = assemble(yaml).unwrap();
        assert_eq!(configuration.variables()["cache"], "false");
        assert_eq!(configuration.variables()["size"], "64");
        assert!(!configuration.settings().cache_enabled);
        assert_eq!(configuration.settings().default_fetch_size, Some(64));
    }

    #[test]
    fn test_scalar_setting_typo_is_rejected() {
        let err = assemble("settings:\n  cacheEnabledTypo: false\n  cacheEnabled: false\n").unwrap_err();
        assert_eq!(err.section(), Some("settings"));
        assert!(matches!(err.root_cause(), ConfigError::UnknownSetting { key } if key == "cacheEnabledTypo"));
    }

    #[test]
    fn test_environment_without_data_source() {
        let yaml = r#"
environments:
  default: dev
  environment:
    - id: dev
      transactionManager:
        type: JDBC
"#;
        let err = assemble(yaml).unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ConfigError::IncompleteEnvironment { missing, .. } if missing == "dataSource"
        ));
    }

    #[test]
    fn test_default_enum_type_handler_is_resolved() {
        let root = ConfigNode::new("configuration").with_child(
            ConfigNode::new("settings").with_property("defaultEnumTypeHandler", crate::builtin::ENUM_TYPE_HANDLER),
        );
        let configuration = ConfigurationAssembler::new(root).parse().unwrap();
        assert_eq!(
            configuration.settings().default_enum_type_handler.as_deref(),
            Some(crate::builtin::ENUM_TYPE_HANDLER)
        );
    }
}
