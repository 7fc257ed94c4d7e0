//! Configuration registry and document-driven assembly for sqlweave
//!
//! This crate turns a hierarchical configuration document into a wired
//! [`Configuration`]: variables, settings, type aliases and handlers,
//! interceptors, the active environment and mapper registrations.

pub mod assembler;
pub mod builtin;
pub mod catalog;
pub mod configuration;
pub mod database_id;
pub mod datasource;
pub mod document;
pub mod environment;
pub mod error;
pub mod factory;
pub mod mapper;
pub mod plugin;
pub mod properties;
pub mod resources;
pub mod settings;
pub mod transaction;
pub mod type_alias;
pub mod type_handler;

// Re-export main types
pub use assembler::ConfigurationAssembler;
pub use catalog::{Constructor, TypeCatalog, TypeDescriptor};
pub use configuration::{Configuration, Installed};
pub use document::{ConfigNode, DocumentView};
pub use environment::Environment;
pub use error::{ConfigError, ConfigResult};
pub use mapper::{DeferredMapperAssembler, MapperDocument, MapperDocumentAssembler, MapperSource};
pub use properties::Properties;
pub use resources::{FileResourceLoader, ResourceLoader};
pub use settings::Settings;
