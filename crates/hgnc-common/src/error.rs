//! Error types shared across the HGNC workspace

use thiserror::Error;

/// Result type alias for HGNC operations
pub type Result<T> = std::result::Result<T, HgncError>;

/// Main error type for workspace-level failures
#[derive(Error, Debug)]
pub enum HgncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl HgncError {
    /// Build a configuration error from any displayable message
    pub fn config(msg: impl Into<String>) -> Self {
        HgncError::Config(msg.into())
    }
}
