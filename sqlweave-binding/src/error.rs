//! Binding error types

use thiserror::Error;

/// Binding result type
pub type BindingResult<T> = Result<T, BindingError>;

/// Binding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// A statement asked for a parameter name the binding does not carry
    #[error("Parameter '{name}' not found. Available parameters are [{}]", .available.join(", "))]
    ParameterNotFound { name: String, available: Vec<String> },
}
