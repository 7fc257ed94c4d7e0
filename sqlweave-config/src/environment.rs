//! The active deployment environment

use std::fmt;
use std::sync::Arc;

use crate::datasource::DataSource;
use crate::error::{ConfigError, ConfigResult};
use crate::transaction::TransactionFactory;

/// A named pairing of transaction strategy and connection source
#[derive(Clone)]
pub struct Environment {
    id: String,
    transaction_factory: Arc<dyn TransactionFactory>,
    data_source: Arc<dyn DataSource>,
}

impl Environment {
    pub fn builder(id: impl Into<String>) -> EnvironmentBuilder {
        EnvironmentBuilder {
            id: id.into(),
            transaction_factory: None,
            data_source: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn transaction_factory(&self) -> &Arc<dyn TransactionFactory> {
        &self.transaction_factory
    }

    pub fn data_source(&self) -> &Arc<dyn DataSource> {
        &self.data_source
    }
}

impl fmt::Debug for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Environment")
            .field("id", &self.id)
            .field("transaction_factory", &self.transaction_factory)
            .field("data_source", &self.data_source)
            .finish()
    }
}

pub struct EnvironmentBuilder {
    id: String,
    transaction_factory: Option<Arc<dyn TransactionFactory>>,
    data_source: Option<Arc<dyn DataSource>>,
}

impl EnvironmentBuilder {
    pub fn transaction_factory(mut self, factory: Arc<dyn TransactionFactory>) -> Self {
        self.transaction_factory = Some(factory);
        self
    }

    pub fn data_source(mut self, data_source: Arc<dyn DataSource>) -> Self {
        self.data_source = Some(data_source);
        self
    }

    pub fn build(self) -> ConfigResult<Environment> {
        let transaction_factory = self.transaction_factory.ok_or_else(|| ConfigError::IncompleteEnvironment {
            id: self.id.clone(),
            missing: "TransactionFactory".to_string(),
        })?;
        let data_source = self.data_source.ok_or_else(|| ConfigError::IncompleteEnvironment {
            id: self.id.clone(),
            missing: "DataSource".to_string(),
        })?;
        Ok(Environment {
            id: self.id,
            transaction_factory,
            data_source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::UnpooledDataSource;
    use crate::transaction::JdbcTransactionFactory;

    #[test]
    fn test_build_complete_environment() {
        let env = Environment::builder("dev")
            .transaction_factory(Arc::new(JdbcTransactionFactory))
            .data_source(Arc::new(UnpooledDataSource::default()))
            .build()
            .unwrap();
        assert_eq!(env.id(), "dev");
        assert!(env.transaction_factory().manages_commit());
    }

    #[test]
    fn test_missing_parts_are_reported() {
        let err = Environment::builder("dev")
            .data_source(Arc::new(UnpooledDataSource::default()))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::IncompleteEnvironment { missing, .. } if missing == "TransactionFactory"));

        let err = Environment::builder("dev")
            .transaction_factory(Arc::new(JdbcTransactionFactory))
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::IncompleteEnvironment { missing, .. } if missing == "DataSource"));
    }
}
