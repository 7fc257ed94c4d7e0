//! The assembled, shareable session factory

use std::sync::Arc;

use serde_json::Value;
use sqlweave_binding::{MethodSignature, ParamBinding, ParamNameResolver, ResolverCache};
use sqlweave_config::Configuration;
use tracing::info;

/// Read-mostly handle over an assembled configuration.
///
/// Cheap to share across threads; resolvers are built once per signature.
#[derive(Debug)]
pub struct SessionFactory {
    configuration: Arc<Configuration>,
    resolvers: ResolverCache,
}

impl SessionFactory {
    pub fn new(configuration: Configuration) -> Self {
        let use_actual_param_name = configuration.settings().use_actual_param_name;
        info!(
            environment = configuration.environment().map(|e| e.id()).unwrap_or("<none>"),
            use_actual_param_name,
            "Session factory ready"
        );
        Self {
            configuration: Arc::new(configuration),
            resolvers: ResolverCache::new(use_actual_param_name),
        }
    }

    pub fn configuration(&self) -> Arc<Configuration> {
        Arc::clone(&self.configuration)
    }

    /// Shared resolver for `signature`
    pub fn param_resolver(&self, signature: &MethodSignature) -> Arc<ParamNameResolver> {
        self.resolvers.resolver(signature)
    }

    /// Bind one call's arguments for `signature`
    pub fn bind(&self, signature: &MethodSignature, args: &[Value]) -> ParamBinding {
        self.param_resolver(signature).bind(args)
    }
}
