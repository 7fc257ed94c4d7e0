//! Configuration error types

use thiserror::Error;

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The assembler was asked to parse a second time
    #[error("Each ConfigurationAssembler can only be used once")]
    ReuseViolation,

    /// Settings key not known to the configuration
    #[error("The setting '{key}' is not known. Make sure you spelled it correctly (case sensitive)")]
    UnknownSetting { key: String },

    /// More than one source given where only one is allowed
    #[error("The {element} element {message}")]
    ConflictingSource { element: String, message: String },

    /// No source given where exactly one is required
    #[error("The {element} element {message}")]
    MissingSource { element: String, message: String },

    /// Neither the caller nor the document named an environment
    #[error("No environment specified")]
    MissingEnvironmentSelector,

    /// Declared environment without an id
    #[error("Environment requires an id attribute")]
    MissingEnvironmentId,

    /// No declared environment matches the target id
    #[error("Environment '{id}' is not declared (declared: [{}])", .declared.join(", "))]
    UnknownEnvironment { id: String, declared: Vec<String> },

    /// Environment declaration lacks a transaction manager or data source
    #[error("Environment '{id}' declaration requires a {missing}")]
    IncompleteEnvironment { id: String, missing: String },

    /// A referenced type identifier cannot be located
    #[error("Could not resolve type '{name}'")]
    TypeResolution { name: String },

    /// A referenced pluggable type cannot be constructed
    #[error("Type '{name}' cannot be instantiated as {expected}")]
    Instantiation { name: String, expected: String },

    /// Required attribute missing from an element
    #[error("The {element} element requires a '{attribute}' attribute")]
    MissingAttribute { element: String, attribute: String },

    /// A value could not be interpreted
    #[error("Invalid value '{value}' for '{key}': {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    /// Mapper type registered twice
    #[error("Type '{type_id}' is already known to the MapperRegistry")]
    DuplicateMapper { type_id: String },

    /// Referenced resource or location could not be loaded
    #[error("Could not load '{location}': {message}")]
    Resource { location: String, message: String },

    /// IO error reading a resource
    #[error("Failed to read resource: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse document: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Failure while processing a top-level document section
    #[error("Error parsing configuration section '{section}': {source}")]
    Section {
        section: &'static str,
        #[source]
        source: Box<ConfigError>,
    },
}

impl ConfigError {
    /// Wrap this error with the name of the section being processed
    pub fn in_section(self, section: &'static str) -> Self {
        ConfigError::Section {
            section,
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping section wrappers
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            ConfigError::Section { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// The section this error was raised in, if wrapped
    pub fn section(&self) -> Option<&'static str> {
        match self {
            ConfigError::Section { section, .. } => Some(*section),
            _ => None,
        }
    }

    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        ConfigError::MissingAttribute {
            element: element.to_string(),
            attribute: attribute.to_string(),
        }
    }

    pub(crate) fn invalid_value(
        key: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        ConfigError::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
