//! Parameter name resolution and argument binding for sqlweave
//!
//! A [`ParamNameResolver`] is built once per callable signature and turns
//! each call's positional arguments into the parameter object statements
//! are evaluated against.

pub mod cache;
pub mod error;
pub mod param_map;
pub mod resolver;
pub mod signature;

// Re-export main types
pub use cache::ResolverCache;
pub use error::{BindingError, BindingResult};
pub use param_map::{ParamBinding, ParamMap};
pub use resolver::{ParamNameResolver, GENERIC_NAME_PREFIX};
pub use signature::{MethodSignature, ParamDescriptor, ParamKind};
