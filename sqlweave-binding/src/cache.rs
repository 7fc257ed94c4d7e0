//! Shared resolvers, one per signature

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::resolver::ParamNameResolver;
use crate::signature::MethodSignature;

/// Resolves each signature once and hands out the shared result.
///
/// Keyed by the whole signature, so overloads sharing an id stay apart.
#[derive(Debug)]
pub struct ResolverCache {
    use_actual_param_name: bool,
    resolvers: RwLock<HashMap<MethodSignature, Arc<ParamNameResolver>>>,
}

impl ResolverCache {
    pub fn new(use_actual_param_name: bool) -> Self {
        Self {
            use_actual_param_name,
            resolvers: RwLock::new(HashMap::new()),
        }
    }

    pub fn use_actual_param_name(&self) -> bool {
        self.use_actual_param_name
    }

    /// Resolver for `signature`, built on first use
    pub fn resolver(&self, signature: &MethodSignature) -> Arc<ParamNameResolver> {
        if let Some(resolver) = self.resolvers.read().get(signature) {
            return Arc::clone(resolver);
        }

        let mut resolvers = self.resolvers.write();
        let resolver = resolvers.entry(signature.clone()).or_insert_with(|| {
            debug!(signature = %signature.id, "Caching parameter name resolver");
            Arc::new(ParamNameResolver::new(signature, self.use_actual_param_name))
        });
        Arc::clone(resolver)
    }

    pub fn len(&self) -> usize {
        self.resolvers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.read().is_empty()
    }

    pub fn clear(&self) {
        self.resolvers.write().clear();
    }
}
