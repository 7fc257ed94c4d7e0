//! Session factory entrypoint for sqlweave
//!
//! [`SessionFactoryBuilder`] reads a configuration document, runs the
//! assembler and wraps the result in a [`SessionFactory`] that binds call
//! arguments for the execution engine.

pub mod builder;
pub mod error;
pub mod factory;

// Re-export main types
pub use builder::{SessionFactoryBuilder, DEFAULT_ENV_PREFIX};
pub use error::{SessionError, SessionResult};
pub use factory::SessionFactory;
