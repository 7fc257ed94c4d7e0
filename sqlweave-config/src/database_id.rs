//! Dialect identity derived from the active connection source

use std::any::Any;
use std::fmt;

use tracing::warn;

use crate::datasource::DataSource;
use crate::error::ConfigResult;
use crate::properties::Properties;

/// Provider kind names accepted for backward compatibility
const LEGACY_PROVIDER_KINDS: &[(&str, &str)] = &[("VENDOR", "DB_VENDOR")];

/// Map a legacy provider kind onto its canonical name
pub fn normalize_provider_kind(kind: &str) -> &str {
    LEGACY_PROVIDER_KINDS
        .iter()
        .find(|(legacy, _)| *legacy == kind)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(kind)
}

/// Derives a vendor/dialect tag from a connection source
pub trait DatabaseIdProvider: Send + Sync + fmt::Debug {
    fn set_properties(&mut self, _properties: &Properties) -> ConfigResult<()> {
        Ok(())
    }

    /// Dialect tag for `data_source`, `None` when no tag applies
    fn database_id(&self, data_source: &dyn DataSource) -> ConfigResult<Option<String>>;

    fn as_any(&self) -> &dyn Any;
}

/// Maps the reported product name to a short id.
///
/// Each property maps a product-name fragment to an id; the first fragment
/// contained in the product name wins. Without properties the product name
/// itself is the id.
#[derive(Debug, Default)]
pub struct VendorDatabaseIdProvider {
    properties: Properties,
}

impl DatabaseIdProvider for VendorDatabaseIdProvider {
    fn set_properties(&mut self, properties: &Properties) -> ConfigResult<()> {
        self.properties = properties.clone();
        Ok(())
    }

    fn database_id(&self, data_source: &dyn DataSource) -> ConfigResult<Option<String>> {
        let product_name = match data_source.product_name() {
            Ok(name) => name,
            Err(e) => {
                warn!(error = %e, "Could not get a databaseId from dataSource");
                return Ok(None);
            }
        };

        if self.properties.is_empty() {
            return Ok(Some(product_name));
        }
        Ok(self
            .properties
            .iter()
            .find(|(fragment, _)| product_name.contains(fragment.as_str()))
            .map(|(_, id)| id.clone()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datasource::UnpooledDataSource;

    fn source(url: Option<&str>) -> UnpooledDataSource {
        UnpooledDataSource {
            url: url.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_normalize_provider_kind() {
        assert_eq!(normalize_provider_kind("VENDOR"), "DB_VENDOR");
        assert_eq!(normalize_provider_kind("DB_VENDOR"), "DB_VENDOR");
        assert_eq!(normalize_provider_kind("vendor"), "vendor");
    }

    #[test]
    fn test_vendor_provider_without_properties_uses_product() {
        let provider = VendorDatabaseIdProvider::default();
        let id = provider.database_id(&source(Some("postgres://db/blog"))).unwrap();
        assert_eq!(id.as_deref(), Some("PostgreSQL"));
    }

    #[test]
    fn test_vendor_provider_maps_fragments() {
        let mut provider = VendorDatabaseIdProvider::default();
        let props = Properties::from([
            ("SQL Server".to_string(), "sqlserver".to_string()),
            ("Postgre".to_string(), "pg".to_string()),
        ]);
        provider.set_properties(&props).unwrap();

        let pg = provider.database_id(&source(Some("postgresql://db"))).unwrap();
        assert_eq!(pg.as_deref(), Some("pg"));
        let other = provider.database_id(&source(Some("sqlite://x.db"))).unwrap();
        assert_eq!(other, None);
    }

    #[test]
    fn test_vendor_provider_swallows_lookup_failure() {
        let provider = VendorDatabaseIdProvider::default();
        assert_eq!(provider.database_id(&source(None)).unwrap(), None);
    }
}
