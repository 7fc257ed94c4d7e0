//! Transaction management strategies

use std::any::Any;
use std::fmt;

use crate::error::{ConfigError, ConfigResult};
use crate::properties::Properties;

/// Produces transactions for the execution engine
pub trait TransactionFactory: Send + Sync + fmt::Debug {
    fn set_properties(&mut self, _properties: &Properties) -> ConfigResult<()> {
        Ok(())
    }

    /// Whether commit/rollback are issued on the connection itself
    fn manages_commit(&self) -> bool;

    fn as_any(&self) -> &dyn Any;
}

/// Commits and rolls back directly on the connection
#[derive(Debug, Default)]
pub struct JdbcTransactionFactory;

impl TransactionFactory for JdbcTransactionFactory {
    fn manages_commit(&self) -> bool {
        true
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Leaves the transaction lifecycle to a container
#[derive(Debug)]
pub struct ManagedTransactionFactory {
    close_connection: bool,
}

impl Default for ManagedTransactionFactory {
    fn default() -> Self {
        Self {
            close_connection: true,
        }
    }
}

impl ManagedTransactionFactory {
    pub fn close_connection(&self) -> bool {
        self.close_connection
    }
}

impl TransactionFactory for ManagedTransactionFactory {
    fn set_properties(&mut self, properties: &Properties) -> ConfigResult<()> {
        if let Some(value) = properties.get("closeConnection") {
            self.close_connection = value.parse().map_err(|_| {
                ConfigError::invalid_value("closeConnection", value, "expected true or false")
            })?;
        }
        Ok(())
    }

    fn manages_commit(&self) -> bool {
        false
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_managed_close_connection() {
        let mut factory = ManagedTransactionFactory::default();
        assert!(factory.close_connection());

        let props = Properties::from([("closeConnection".to_string(), "false".to_string())]);
        factory.set_properties(&props).unwrap();
        assert!(!factory.close_connection());
        assert!(!factory.manages_commit());

        let bad = Properties::from([("closeConnection".to_string(), "maybe".to_string())]);
        assert!(factory.set_properties(&bad).is_err());
    }
}
