//! Session error types

use sqlweave_config::ConfigError;
use thiserror::Error;

/// Session result type
pub type SessionResult<T> = Result<T, SessionError>;

/// Session errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Reading or assembling the configuration failed
    #[error("Error building session factory: {source}")]
    Build {
        #[from]
        source: ConfigError,
    },
}

impl SessionError {
    /// The innermost configuration error
    pub fn root_cause(&self) -> &ConfigError {
        match self {
            SessionError::Build { source } => source.root_cause(),
        }
    }
}
