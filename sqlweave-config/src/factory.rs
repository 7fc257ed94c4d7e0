//! Object, wrapper and reflector factories plus the virtual filesystem hook
//!
//! These are opaque to assembly: the configuration only installs them for
//! the result-mapping layer to use.

use std::any::Any;
use std::fmt;

use crate::error::ConfigResult;
use crate::properties::Properties;

/// Creates result objects for the mapping layer
pub trait ObjectFactory: Send + Sync + fmt::Debug {
    fn set_properties(&mut self, _properties: &Properties) -> ConfigResult<()> {
        Ok(())
    }

    /// Whether instances of `type_id` are collections
    fn is_collection(&self, type_id: &str) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Supplies custom wrappers around mapped objects
pub trait ObjectWrapperFactory: Send + Sync + fmt::Debug {
    fn has_wrapper_for(&self, type_id: &str) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Caches per-type property metadata
pub trait ReflectorFactory: Send + Sync + fmt::Debug {
    fn is_class_cache_enabled(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Virtual filesystem used by the execution engine to list mapper resources
pub trait Vfs: Send + Sync + fmt::Debug {
    /// Whether this implementation works in the current process
    fn is_valid(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

const COLLECTION_TYPES: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet", "list", "collection"];

#[derive(Debug, Default)]
pub struct DefaultObjectFactory {
    properties: Properties,
}

impl DefaultObjectFactory {
    pub fn properties(&self) -> &Properties {
        &self.properties
    }
}

impl ObjectFactory for DefaultObjectFactory {
    fn set_properties(&mut self, properties: &Properties) -> ConfigResult<()> {
        self.properties = properties.clone();
        Ok(())
    }

    fn is_collection(&self, type_id: &str) -> bool {
        let simple = type_id.rsplit("::").next().unwrap_or(type_id);
        let base = simple.split('<').next().unwrap_or(simple);
        COLLECTION_TYPES.contains(&base)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Default)]
pub struct DefaultObjectWrapperFactory;

impl ObjectWrapperFactory for DefaultObjectWrapperFactory {
    fn has_wrapper_for(&self, _type_id: &str) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug)]
pub struct DefaultReflectorFactory {
    class_cache_enabled: bool,
}

impl Default for DefaultReflectorFactory {
    fn default() -> Self {
        Self {
            class_cache_enabled: true,
        }
    }
}

impl ReflectorFactory for DefaultReflectorFactory {
    fn is_class_cache_enabled(&self) -> bool {
        self.class_cache_enabled
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Default)]
pub struct DefaultVfs;

impl Vfs for DefaultVfs {
    fn is_valid(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_object_factory_collections() {
        let factory = DefaultObjectFactory::default();
        assert!(factory.is_collection("std::vec::Vec<i32>"));
        assert!(factory.is_collection("list"));
        assert!(!factory.is_collection("app::domain::Author"));
    }

    #[test]
    fn test_default_object_factory_keeps_properties() {
        let mut factory = DefaultObjectFactory::default();
        let props = Properties::from([("objectFactoryProperty".to_string(), "100".to_string())]);
        factory.set_properties(&props).unwrap();
        assert_eq!(factory.properties()["objectFactoryProperty"], "100");
    }
}
