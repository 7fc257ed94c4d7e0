//! Interceptor plugins and the ordered interceptor chain

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::ConfigResult;
use crate::properties::Properties;

/// Execution-engine component an interceptor can wrap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InterceptTarget {
    Executor,
    StatementHandler,
    ParameterHandler,
    ResultSetHandler,
}

impl fmt::Display for InterceptTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Executor => write!(f, "Executor"),
            Self::StatementHandler => write!(f, "StatementHandler"),
            Self::ParameterHandler => write!(f, "ParameterHandler"),
            Self::ResultSetHandler => write!(f, "ResultSetHandler"),
        }
    }
}

/// A method on an intercept target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterceptSignature {
    pub target: InterceptTarget,
    pub method: String,
}

impl InterceptSignature {
    pub fn new(target: InterceptTarget, method: impl Into<String>) -> Self {
        Self {
            target,
            method: method.into(),
        }
    }
}

/// Cross-cutting hook applied by the execution engine
pub trait Interceptor: Send + Sync + fmt::Debug {
    /// Apply the properties declared on the plugin element
    fn set_properties(&mut self, _properties: &Properties) -> ConfigResult<()> {
        Ok(())
    }

    /// Methods this interceptor wants to wrap
    fn signatures(&self) -> Vec<InterceptSignature>;

    fn as_any(&self) -> &dyn Any;
}

/// Append-only list of interceptors; insertion order is invocation order
#[derive(Debug, Clone, Default)]
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl InterceptorChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, interceptor: Arc<dyn Interceptor>) {
        self.interceptors.push(interceptor);
    }

    pub fn interceptors(&self) -> &[Arc<dyn Interceptor>] {
        &self.interceptors
    }

    /// Interceptors declaring at least one signature on `target`, in chain order
    pub fn interceptors_for(&self, target: InterceptTarget) -> Vec<Arc<dyn Interceptor>> {
        self.interceptors
            .iter()
            .filter(|i| i.signatures().iter().any(|s| s.target == target))
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Tagged {
        tag: &'static str,
        target: InterceptTarget,
    }

    impl Interceptor for Tagged {
        fn signatures(&self) -> Vec<InterceptSignature> {
            vec![InterceptSignature::new(self.target, "query")]
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn tag_of(interceptor: &Arc<dyn Interceptor>) -> &'static str {
        interceptor.as_any().downcast_ref::<Tagged>().unwrap().tag
    }

    #[test]
    fn test_chain_preserves_insertion_order() {
        let mut chain = InterceptorChain::new();
        for (tag, target) in [
            ("first", InterceptTarget::Executor),
            ("second", InterceptTarget::StatementHandler),
            ("third", InterceptTarget::Executor),
        ] {
            chain.add(Arc::new(Tagged { tag, target }));
        }

        assert_eq!(chain.len(), 3);
        let all: Vec<_> = chain.interceptors().iter().map(tag_of).collect();
        assert_eq!(all, vec!["first", "second", "third"]);

        let executors: Vec<_> = chain
            .interceptors_for(InterceptTarget::Executor)
            .iter()
            .map(tag_of)
            .collect();
        assert_eq!(executors, vec!["first", "third"]);
        assert!(chain.interceptors_for(InterceptTarget::ResultSetHandler).is_empty());
    }
}
