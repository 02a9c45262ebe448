//! Error types for registry operations.

use thiserror::Error;

/// Result type alias for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors that can occur while talking to a registry backend.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Failed to reach the registry at all.
    #[error("failed to connect to registry at {url}: {source}")]
    ConnectionFailed {
        /// Registry URL.
        url: String,
        /// Underlying error.
        #[source]
        source: reqwest::Error,
    },

    /// Registry login failed; that registry's cleanup is skipped for the run.
    #[error("login to {registry} failed: {message}")]
    LoginFailed {
        /// Registry name.
        registry: String,
        /// Error message.
        message: String,
    },

    /// The registry answered with a non-success status.
    #[error("registry returned HTTP {status}: {message}")]
    HttpStatus {
        /// HTTP status code.
        status: u16,
        /// Response body or error message.
        message: String,
    },

    /// A pagination call failed mid-listing.
    #[error("fetch from {registry} failed: {message}")]
    FetchFailed {
        /// Registry name.
        registry: String,
        /// Error message.
        message: String,
    },

    /// A single delete call exhausted retries or hit a non-retryable status.
    #[error("failed to delete {target}: {message}")]
    DeleteFailed {
        /// Human-readable target description.
        target: String,
        /// Error message.
        message: String,
    },

    /// JSON decoding of a registry response failed.
    #[error("JSON error: {source}")]
    JsonError {
        /// Underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Invalid client configuration.
    #[error("invalid configuration: {reason}")]
    InvalidConfig {
        /// Reason for invalidity.
        reason: String,
    },
}

impl RegistryError {
    /// Returns true if the operation should be retried: HTTP 429 or 5xx.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::HttpStatus { status, .. } if *status == 429 || (*status >= 500 && *status <= 599)
        )
    }
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() {
            Self::ConnectionFailed {
                url: err
                    .url()
                    .map_or_else(|| "unknown".to_string(), ToString::to_string),
                source: err,
            }
        } else {
            let status = err.status().map_or(0, |s| s.as_u16());
            Self::HttpStatus {
                status,
                message: err.to_string(),
            }
        }
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError { source: err }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_statuses() {
        let rate_limited = RegistryError::HttpStatus {
            status: 429,
            message: "too many requests".to_string(),
        };
        assert!(rate_limited.is_retryable());

        let server_error = RegistryError::HttpStatus {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert!(server_error.is_retryable());
    }

    #[test]
    fn test_non_retryable() {
        let not_found = RegistryError::HttpStatus {
            status: 404,
            message: "not found".to_string(),
        };
        assert!(!not_found.is_retryable());

        let forbidden = RegistryError::HttpStatus {
            status: 403,
            message: "forbidden".to_string(),
        };
        assert!(!forbidden.is_retryable());

        let login = RegistryError::LoginFailed {
            registry: "docker hub".to_string(),
            message: "bad credentials".to_string(),
        };
        assert!(!login.is_retryable());
    }

    #[test]
    fn test_error_display() {
        let err = RegistryError::DeleteFailed {
            target: "tag 'v1.0.0'".to_string(),
            message: "HTTP 403".to_string(),
        };
        assert_eq!(err.to_string(), "failed to delete tag 'v1.0.0': HTTP 403");
    }
}
