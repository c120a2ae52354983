//! Error types and handling for the MCP server.
//!
//! This module defines a unified error type covering the tree catalog domain
//! and infrastructure failures, for consistent handling across the server.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the MCP server.
#[derive(Debug, Error)]
pub enum Error {
    /// Error originating from the tree catalog domain.
    #[error("Tree catalog error: {0}")]
    Trees(#[from] crate::domains::trees::TreeApiError),

    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors from transport communication.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Internal server errors that should not occur under normal operation.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new internal error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::trees::TreeApiError;

    #[test]
    fn test_domain_error_converts() {
        let err: Error = TreeApiError::invalid_parameter("bad limit").into();
        assert!(err.to_string().contains("bad limit"));
    }

    #[test]
    fn test_config_error_constructor() {
        let err = Error::config("missing base url");
        assert!(matches!(err, Error::Config(_)));
    }
}
