//! Error types for the tree catalog domain.

use thiserror::Error;

/// Errors that can occur while querying the open-data provider.
///
/// Every tool converts these into a structured MCP error result; no raw
/// error crosses the tool boundary.
#[derive(Debug, Error)]
pub enum TreeApiError {
    /// Caller input failed validation. Reported before any network call.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Timeout or connection failure. The caller may retry; the client
    /// itself performs a single attempt only.
    #[error("network failure: {0}")]
    TransientNetwork(String),

    /// The provider returned a non-2xx status (including 429).
    #[error("provider returned HTTP {status}: {message}")]
    RemoteService { status: u16, message: String },

    /// The provider body was not the expected JSON shape.
    #[error("unexpected provider response: {0}")]
    ResponseParse(String),
}

impl TreeApiError {
    /// Create a new "invalid parameter" error.
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    /// Stable kind tag attached to every tool error result.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::TransientNetwork(_) => "transient_network_error",
            Self::RemoteService { .. } => "remote_service_error",
            Self::ResponseParse(_) => "response_parse_error",
        }
    }

    /// Whether the caller can reasonably retry the same call.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientNetwork(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_tags() {
        assert_eq!(
            TreeApiError::invalid_parameter("x").kind(),
            "invalid_parameter"
        );
        assert_eq!(
            TreeApiError::RemoteService {
                status: 429,
                message: "slow down".into()
            }
            .kind(),
            "remote_service_error"
        );
        assert_eq!(
            TreeApiError::ResponseParse("bad json".into()).kind(),
            "response_parse_error"
        );
    }

    #[test]
    fn test_only_network_errors_are_retryable() {
        assert!(TreeApiError::TransientNetwork("timeout".into()).is_retryable());
        assert!(!TreeApiError::invalid_parameter("x").is_retryable());
        assert!(
            !TreeApiError::RemoteService {
                status: 500,
                message: String::new()
            }
            .is_retryable()
        );
    }

    #[test]
    fn test_remote_service_display_includes_status() {
        let err = TreeApiError::RemoteService {
            status: 404,
            message: "dataset not found".into(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("dataset not found"));
    }
}
