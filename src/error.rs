//! Error types for the Expo connector
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// Substring the Expo API uses in rate-limit error messages
const RATE_LIMIT_MARKER: &str = "rate limit";

/// The main error type for the Expo connector
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Parameter Errors
    // ============================================================================
    #[error("Missing required parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Max retries ({max_retries}) exceeded for rate-limited request")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // API Errors
    // ============================================================================
    #[error("{message} (GraphQL Error: {code})")]
    Graphql {
        message: String,
        code: String,
        status: u16,
    },

    #[error("No data returned from Expo API")]
    NoData,

    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    #[error("{message}")]
    OperationFailed { message: String },

    // ============================================================================
    // Dispatch Errors
    // ============================================================================
    #[error("Unknown resource: {resource}")]
    UnknownResource { resource: String },

    #[error("The operation '{operation}' is not supported for resource '{resource}'")]
    UnknownOperation { resource: String, operation: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create a missing parameter error
    pub fn missing_param(name: impl Into<String>) -> Self {
        Self::MissingParameter { name: name.into() }
    }

    /// Create an invalid parameter error
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a GraphQL API error
    pub fn graphql(message: impl Into<String>, code: impl Into<String>, status: u16) -> Self {
        Self::Graphql {
            message: message.into(),
            code: code.into(),
            status,
        }
    }

    /// Create a not-found error for a resource kind
    pub fn not_found(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.into(),
        }
    }

    /// Create an operation failure
    pub fn failed(message: impl Into<String>) -> Self {
        Self::OperationFailed {
            message: message.into(),
        }
    }

    /// HTTP status attached to an API error, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::HttpStatus { status, .. } | Error::Graphql { status, .. } => Some(*status),
            Error::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Check if this error signals rate limiting
    ///
    /// Matches status 429, or an API error whose message mentions a rate limit.
    pub fn is_rate_limited(&self) -> bool {
        if self.status_code() == Some(429) {
            return true;
        }
        match self {
            Error::Graphql { message, .. } => message.contains(RATE_LIMIT_MARKER),
            Error::HttpStatus { body, .. } => body.contains(RATE_LIMIT_MARKER),
            _ => false,
        }
    }
}

/// Result type alias for the Expo connector
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Prefix an error with lazily built context
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::not_found("Build", "abc-123");
        assert_eq!(err.to_string(), "Build not found: abc-123");

        let err = Error::graphql("Entity not authorized", "UNAUTHORIZED_ERROR", 403);
        assert_eq!(
            err.to_string(),
            "Entity not authorized (GraphQL Error: UNAUTHORIZED_ERROR)"
        );

        let err = Error::UnknownOperation {
            resource: "build".to_string(),
            operation: "publish".to_string(),
        };
        assert!(err.to_string().contains("'publish'"));
    }

    #[test]
    fn test_status_code() {
        assert_eq!(Error::http_status(404, "").status_code(), Some(404));
        assert_eq!(Error::graphql("x", "BAD", 400).status_code(), Some(400));
        assert_eq!(Error::NoData.status_code(), None);
    }

    #[test]
    fn test_is_rate_limited() {
        assert!(Error::http_status(429, "").is_rate_limited());
        assert!(Error::graphql("Too many", "RATE_LIMITED", 429).is_rate_limited());
        assert!(Error::graphql("You hit the rate limit", "UNKNOWN_ERROR", 400).is_rate_limited());

        assert!(!Error::http_status(500, "").is_rate_limited());
        assert!(!Error::graphql("Not found", "NOT_FOUND", 404).is_rate_limited());
        assert!(!Error::failed("rate limit").is_rate_limited());
        assert!(!Error::NoData.is_rate_limited());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.with_context(|| "outer".to_string());
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
