//! Connection sources and the factories that build them
//!
//! Connectivity itself belongs to the execution engine. The built-in data
//! sources only carry connection settings and identify the database product
//! from the connection URL.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{ConfigError, ConfigResult};
use crate::properties::Properties;

/// A live connection source
pub trait DataSource: Send + Sync + fmt::Debug {
    /// Product name reported by the database behind this source
    fn product_name(&self) -> ConfigResult<String>;

    fn as_any(&self) -> &dyn Any;
}

/// Builds a [`DataSource`] from declared properties
pub trait DataSourceFactory: Send + Sync + fmt::Debug {
    fn set_properties(&mut self, properties: &Properties) -> ConfigResult<()>;

    fn data_source(&self) -> ConfigResult<Arc<dyn DataSource>>;
}

const DRIVER_PROPERTY_PREFIX: &str = "driver.";

/// URL scheme → product name
const KNOWN_PRODUCTS: &[(&str, &str)] = &[
    ("sqlite", "SQLite"),
    ("postgres", "PostgreSQL"),
    ("postgresql", "PostgreSQL"),
    ("mysql", "MySQL"),
    ("mariadb", "MariaDB"),
    ("h2", "H2"),
    ("hsqldb", "HSQL Database Engine"),
    ("derby", "Apache Derby"),
    ("oracle", "Oracle"),
    ("sqlserver", "Microsoft SQL Server"),
    ("db2", "DB2"),
];

/// Derive a product name from a connection URL such as
/// `postgres://host/db` or `jdbc:mysql://host/db`
pub fn product_name_from_url(url: &str) -> Option<String> {
    let without_prefix = url.strip_prefix("jdbc:").unwrap_or(url);
    let scheme = without_prefix.split(':').next()?.trim();
    if scheme.is_empty() || scheme == without_prefix {
        return None;
    }
    let lowered = scheme.to_ascii_lowercase();
    let product = KNOWN_PRODUCTS
        .iter()
        .find(|(known, _)| *known == lowered)
        .map(|(_, product)| product.to_string())
        .unwrap_or_else(|| scheme.to_string());
    Some(product)
}

/// Connection settings without pooling
#[derive(Debug, Clone, Default)]
pub struct UnpooledDataSource {
    pub driver: Option<String>,
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub auto_commit: Option<bool>,
    pub default_transaction_isolation_level: Option<i32>,
    pub driver_properties: Properties,
}

impl UnpooledDataSource {
    /// Apply one property; `Ok(false)` when the name is not recognized
    fn apply(&mut self, name: &str, value: &str) -> ConfigResult<bool> {
        if let Some(driver_key) = name.strip_prefix(DRIVER_PROPERTY_PREFIX) {
            self.driver_properties
                .insert(driver_key.to_string(), value.to_string());
            return Ok(true);
        }
        match name {
            "driver" => self.driver = Some(value.to_string()),
            "url" => self.url = Some(value.to_string()),
            "username" => self.username = Some(value.to_string()),
            "password" => self.password = Some(value.to_string()),
            "autoCommit" => self.auto_commit = Some(parse_bool(name, value)?),
            "defaultTransactionIsolationLevel" => {
                self.default_transaction_isolation_level = Some(parse_number(name, value)?)
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

impl DataSource for UnpooledDataSource {
    fn product_name(&self) -> ConfigResult<String> {
        let url = self.url.as_deref().ok_or_else(|| {
            ConfigError::invalid_value("url", "", "data source has no connection URL")
        })?;
        product_name_from_url(url)
            .ok_or_else(|| ConfigError::invalid_value("url", url, "cannot identify database product"))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Pool tuning on top of [`UnpooledDataSource`]
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub maximum_active_connections: u32,
    pub maximum_idle_connections: u32,
    pub maximum_checkout_time_ms: u64,
    pub time_to_wait_ms: u64,
    pub ping_query: String,
    pub ping_enabled: bool,
    pub ping_connections_not_used_for_ms: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            maximum_active_connections: 10,
            maximum_idle_connections: 5,
            maximum_checkout_time_ms: 20_000,
            time_to_wait_ms: 20_000,
            ping_query: "NO PING QUERY SET".to_string(),
            ping_enabled: false,
            ping_connections_not_used_for_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct PooledDataSource {
    pub connection: UnpooledDataSource,
    pub pool: PoolSettings,
}

impl PooledDataSource {
    fn apply(&mut self, name: &str, value: &str) -> ConfigResult<bool> {
        match name {
            "poolMaximumActiveConnections" => {
                self.pool.maximum_active_connections = parse_number(name, value)?
            }
            "poolMaximumIdleConnections" => {
                self.pool.maximum_idle_connections = parse_number(name, value)?
            }
            "poolMaximumCheckoutTime" => {
                self.pool.maximum_checkout_time_ms = parse_number(name, value)?
            }
            "poolTimeToWait" => self.pool.time_to_wait_ms = parse_number(name, value)?,
            "poolPingQuery" => self.pool.ping_query = value.to_string(),
            "poolPingEnabled" => self.pool.ping_enabled = parse_bool(name, value)?,
            "poolPingConnectionsNotUsedFor" => {
                self.pool.ping_connections_not_used_for_ms = parse_number(name, value)?
            }
            _ => return self.connection.apply(name, value),
        }
        Ok(true)
    }
}

impl DataSource for PooledDataSource {
    fn product_name(&self) -> ConfigResult<String> {
        self.connection.product_name()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Default)]
pub struct UnpooledDataSourceFactory {
    data_source: UnpooledDataSource,
}

impl DataSourceFactory for UnpooledDataSourceFactory {
    fn set_properties(&mut self, properties: &Properties) -> ConfigResult<()> {
        for (name, value) in properties {
            if !self.data_source.apply(name, value)? {
                return Err(unknown_property(name));
            }
        }
        Ok(())
    }

    fn data_source(&self) -> ConfigResult<Arc<dyn DataSource>> {
        Ok(Arc::new(self.data_source.clone()))
    }
}

#[derive(Debug, Default)]
pub struct PooledDataSourceFactory {
    data_source: PooledDataSource,
}

impl DataSourceFactory for PooledDataSourceFactory {
    fn set_properties(&mut self, properties: &Properties) -> ConfigResult<()> {
        for (name, value) in properties {
            if !self.data_source.apply(name, value)? {
                return Err(unknown_property(name));
            }
        }
        Ok(())
    }

    fn data_source(&self) -> ConfigResult<Arc<dyn DataSource>> {
        Ok(Arc::new(self.data_source.clone()))
    }
}

fn unknown_property(name: &str) -> ConfigError {
    ConfigError::invalid_value(name, "", "unknown DataSource property")
}

fn parse_bool(name: &str, value: &str) -> ConfigResult<bool> {
    value
        .to_ascii_lowercase()
        .parse()
        .map_err(|_| ConfigError::invalid_value(name, value, "expected true or false"))
}

fn parse_number<T: std::str::FromStr>(name: &str, value: &str) -> ConfigResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid_value(name, value, "expected a number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(pairs: &[(&str, &str)]) -> Properties {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_product_name_from_url() {
        assert_eq!(product_name_from_url("sqlite://blog.db").as_deref(), Some("SQLite"));
        assert_eq!(
            product_name_from_url("jdbc:postgresql://localhost/blog").as_deref(),
            Some("PostgreSQL")
        );
        assert_eq!(product_name_from_url("jdbc:hsqldb:mem:blog").as_deref(), Some("HSQL Database Engine"));
        assert_eq!(product_name_from_url("cockroach://db").as_deref(), Some("cockroach"));
        assert_eq!(product_name_from_url("no-scheme"), None);
    }

    #[test]
    fn test_unpooled_factory_properties() {
        let mut factory = UnpooledDataSourceFactory::default();
        factory
            .set_properties(&props(&[
                ("driver", "org.h2.Driver"),
                ("url", "jdbc:h2:mem:blog"),
                ("username", "sa"),
                ("autoCommit", "TRUE"),
                ("driver.encoding", "UTF8"),
            ]))
            .unwrap();

        let ds = factory.data_source().unwrap();
        assert_eq!(ds.product_name().unwrap(), "H2");
        let unpooled = ds.as_any().downcast_ref::<UnpooledDataSource>().unwrap();
        assert_eq!(unpooled.auto_commit, Some(true));
        assert_eq!(unpooled.driver_properties["encoding"], "UTF8");
    }

    #[test]
    fn test_unknown_property_rejected() {
        let mut factory = UnpooledDataSourceFactory::default();
        let err = factory
            .set_properties(&props(&[("poolMaximumActiveConnections", "3")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { key, .. } if key == "poolMaximumActiveConnections"));
    }

    #[test]
    fn test_pooled_factory_settings() {
        let mut factory = PooledDataSourceFactory::default();
        factory
            .set_properties(&props(&[
                ("url", "mysql://localhost/blog"),
                ("poolMaximumActiveConnections", "20"),
                ("poolPingEnabled", "true"),
            ]))
            .unwrap();

        let ds = factory.data_source().unwrap();
        let pooled = ds.as_any().downcast_ref::<PooledDataSource>().unwrap();
        assert_eq!(pooled.pool.maximum_active_connections, 20);
        assert_eq!(pooled.pool.maximum_idle_connections, 5);
        assert!(pooled.pool.ping_enabled);
        assert_eq!(ds.product_name().unwrap(), "MySQL");
    }

    #[test]
    fn test_missing_url_has_no_product() {
        let ds = UnpooledDataSource::default();
        assert!(ds.product_name().is_err());
    }
}
