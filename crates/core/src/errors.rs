use crate::constants::INVALID_REQUEST_TOKEN_CODES;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Result type alias for supermsg operations
pub type Result<T> = std::result::Result<T, Error>;

/// Business error reported by the platform through its numeric code namespace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl ApiError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Whether the platform rejected the request token as invalid or expired
    pub fn is_invalid_request_token(&self) -> bool {
        INVALID_REQUEST_TOKEN_CODES.contains(&self.code)
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "API Error[{}]: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Broad error classes callers branch on
///
/// - `Validation`: malformed or missing local input, reject the request.
/// - `Business`: the platform answered with an error code.
/// - `Infrastructure`: transport, storage or protocol failure, render a
///   "temporarily unavailable" message and let the caller decide on retries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Validation,
    Business,
    Infrastructure,
}

/// Core error type for supermsg operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Missing or malformed local input
    #[error("invalid '{field}': {message}")]
    Validation { field: String, message: String },

    /// A patch operation was built from an unusable operand
    #[error("invalid operand for key path '{key_path}': {message}")]
    InvalidOperand { key_path: String, message: String },

    /// Local data could not be encoded
    #[error("serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: serde_json::Error,
    },

    /// The platform rejected the request
    #[error(transparent)]
    Business(#[from] ApiError),

    /// The request never produced a response
    #[error("transport error for '{endpoint}': {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The platform answered with something other than 200
    #[error("the server api at '{endpoint}' responded with unexpected status code {status}, expected 200")]
    UnexpectedStatus { endpoint: String, status: u16 },

    /// The response body did not match the platform envelope
    #[error("malformed response from '{endpoint}': {message}")]
    MalformedResponse { endpoint: String, message: String },

    /// A token cache backend is unavailable
    #[error("token cache '{backend}' unavailable: {message}")]
    Storage { backend: String, message: String },

    /// Operation timeout errors
    #[error("operation '{operation}' timed out after {duration:?}")]
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl From<serde_json::Error> for Error {
    fn from(error: serde_json::Error) -> Self {
        Error::Serialization {
            message: error.to_string(),
            source: error,
        }
    }
}

// Helper methods for creating errors with context
impl Error {
    /// Create a validation error for a named input field
    #[must_use]
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an invalid operand error
    #[must_use]
    pub fn invalid_operand(key_path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::InvalidOperand {
            key_path: key_path.into(),
            message: message.into(),
        }
    }

    /// Create a transport error with its source
    #[must_use]
    pub fn transport(
        endpoint: impl Into<String>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        Error::Transport {
            endpoint: endpoint.into(),
            source: source.into(),
        }
    }

    /// Create a malformed response error
    #[must_use]
    pub fn malformed_response(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Error::MalformedResponse {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// Create a storage error
    #[must_use]
    pub fn storage(backend: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Storage {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error
    #[must_use]
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Error::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Validation { .. } | Error::InvalidOperand { .. } | Error::Serialization { .. } => {
                ErrorKind::Validation
            }
            Error::Business(_) => ErrorKind::Business,
            Error::Transport { .. }
            | Error::UnexpectedStatus { .. }
            | Error::MalformedResponse { .. }
            | Error::Storage { .. }
            | Error::Timeout { .. }
            | Error::Configuration { .. } => ErrorKind::Infrastructure,
        }
    }

    /// The platform error, if this is a business error
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Business(api) => Some(api),
            _ => None,
        }
    }

    /// True for the business codes that mean "please re-authenticate"
    pub fn is_invalid_request_token(&self) -> bool {
        self.api_error()
            .is_some_and(ApiError::is_invalid_request_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(10001, "request token expired");
        assert_eq!(err.to_string(), "API Error[10001]: request token expired");
    }

    #[test]
    fn test_invalid_request_token_codes() {
        assert!(ApiError::new(10000, "").is_invalid_request_token());
        assert!(ApiError::new(10001, "").is_invalid_request_token());
        assert!(!ApiError::new(20001, "").is_invalid_request_token());

        let err: Error = ApiError::new(10001, "expired").into();
        assert!(err.is_invalid_request_token());
        assert_eq!(err.kind(), ErrorKind::Business);
        assert_eq!(err.to_string(), "API Error[10001]: expired");
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::validation("rt", "request token is required").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::invalid_operand("list", "not an array").kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            Error::storage("redis", "connection refused").kind(),
            ErrorKind::Infrastructure
        );
        assert_eq!(
            Error::timeout("verify", Duration::from_secs(1)).kind(),
            ErrorKind::Infrastructure
        );
        assert_eq!(
            Error::UnexpectedStatus {
                endpoint: "/v1/user/verify".to_string(),
                status: 502,
            }
            .kind(),
            ErrorKind::Infrastructure
        );

        let not_business = Error::storage("memory", "poisoned");
        assert!(not_business.api_error().is_none());
        assert!(!not_business.is_invalid_request_token());
    }

    #[test]
    fn test_validation_message_names_field() {
        let err = Error::validation("cid", "channel id not presented");
        assert_eq!(err.to_string(), "invalid 'cid': channel id not presented");
    }

    #[test]
    fn test_api_error_deserialize_without_message() {
        let err: ApiError = serde_json::from_str(r#"{"code": 3}"#).unwrap();
        assert_eq!(err, ApiError::new(3, ""));
    }
}
