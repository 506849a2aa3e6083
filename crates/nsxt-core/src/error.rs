//! Error types for NSX-T operations.
//!
//! This module provides the error type shared by every NSX-T crate, the
//! decoding of NSX-T error bodies, and conversions from the HTTP stack.

use serde::Deserialize;
use thiserror::Error;

/// Main error type for NSX-T operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// NSX-T manager is unavailable
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Failed to parse an NSX-T response
    #[error("Failed to parse NSX-T response: {0}")]
    ParseError(String),

    /// Invalid object identifier
    #[error("Invalid identifier: {0}")]
    InvalidId(String),

    /// The local record carries no object identifier
    #[error("Error obtaining logical object id: {0}")]
    MissingId(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Operation timed out
    #[error("Timeout waiting for NSX-T: {0}")]
    Timeout(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request (including authentication failures)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Bad request with details
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Conflict or stale revision
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A successful but unexpected HTTP status
    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus {
        /// HTTP status code returned
        status: u16,
        /// Context describing the request
        message: String,
    },

    /// A resource operation failed
    #[error("Error during {resource} {action}: {source}")]
    ResourceOperation {
        /// Resource kind, e.g. `FirewallSection`
        resource: String,
        /// Operation, e.g. `create`
        action: String,
        /// Underlying error
        source: Box<Error>,
    },

    /// Invalid endpoint
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for NSX-T operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error body returned by the NSX-T REST API.
#[derive(Debug, Clone, Deserialize, PartialEq, Default)]
pub struct ApiErrorBody {
    /// HTTP status as reported by the manager
    #[serde(default, rename = "httpStatus")]
    pub http_status: Option<String>,
    /// Numeric NSX-T error code
    #[serde(default)]
    pub error_code: Option<i64>,
    /// Module that raised the error
    #[serde(default)]
    pub module_name: Option<String>,
    /// Human-readable error message
    #[serde(default)]
    pub error_message: Option<String>,
    /// Nested errors
    #[serde(default)]
    pub related_errors: Vec<ApiErrorBody>,
}

impl ApiErrorBody {
    /// Parses an error body, returning `None` when it is not NSX-T JSON.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        serde_json::from_str::<Self>(text)
            .ok()
            .filter(|body| body.error_message.is_some())
    }

    /// Produces a readable message from a raw response body.
    #[must_use]
    pub fn describe(text: &str) -> String {
        let Some(body) = Self::parse(text) else {
            return text.to_string();
        };

        let mut message = body.error_message.unwrap_or_default();
        if let Some(code) = body.error_code {
            message = format!("{message} (error code {code})");
        }
        for related in body.related_errors {
            if let Some(detail) = related.error_message {
                message = format!("{message}; {detail}");
            }
        }
        message
    }
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::ParseError(_) => "PARSE_ERROR",
            Self::InvalidId(_) => "INVALID_ID",
            Self::MissingId(_) => "MISSING_ID",
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::InvalidRequest(_) => "INVALID_REQUEST",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::Conflict(_) => "CONFLICT",
            Self::UnexpectedStatus { .. } => "UNEXPECTED_STATUS",
            Self::ResourceOperation { .. } => "RESOURCE_OPERATION",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Wraps the error with the resource kind and operation that produced it.
    #[must_use]
    pub fn during(self, resource: impl Into<String>, action: impl Into<String>) -> Self {
        Self::ResourceOperation {
            resource: resource.into(),
            action: action.into(),
            source: Box::new(self),
        }
    }

    /// Returns true if this error (or the error it wraps) is a 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::NotFound(_) => true,
            Self::ResourceOperation { source, .. } => source.is_not_found(),
            _ => false,
        }
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else if err.is_decode() {
            Self::ParseError(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ValidationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            Error::ServiceUnavailable("test".to_string()).error_code(),
            "SERVICE_UNAVAILABLE"
        );
        assert_eq!(
            Error::ParseError("test".to_string()).error_code(),
            "PARSE_ERROR"
        );
        assert_eq!(Error::InvalidId("test".to_string()).error_code(), "INVALID_ID");
        assert_eq!(Error::MissingId("test".to_string()).error_code(), "MISSING_ID");
        assert_eq!(Error::NotFound("test".to_string()).error_code(), "NOT_FOUND");
        assert_eq!(Error::Conflict("test".to_string()).error_code(), "CONFLICT");
        assert_eq!(
            Error::UnexpectedStatus {
                status: 200,
                message: "create".to_string()
            }
            .error_code(),
            "UNEXPECTED_STATUS"
        );
        assert_eq!(
            Error::NotFound("x".to_string())
                .during("NatRule", "read")
                .error_code(),
            "RESOURCE_OPERATION"
        );
    }

    #[test]
    fn test_error_display() {
        let err = Error::ServiceUnavailable("nsx-manager".to_string());
        assert_eq!(err.to_string(), "Service unavailable: nsx-manager");

        let err = Error::HttpError("connection reset".to_string()).during("NatRule", "create");
        assert_eq!(
            err.to_string(),
            "Error during NatRule create: HTTP request failed: connection reset"
        );

        let err = Error::MissingId("FirewallSection".to_string());
        assert_eq!(
            err.to_string(),
            "Error obtaining logical object id: FirewallSection"
        );
    }

    #[test]
    fn test_is_not_found_looks_through_context() {
        assert!(Error::NotFound("gone".to_string()).is_not_found());
        assert!(Error::NotFound("gone".to_string())
            .during("NsService", "update")
            .is_not_found());
        assert!(!Error::Conflict("stale".to_string()).is_not_found());
    }

    #[test]
    fn test_api_error_body_describe() {
        let text = r#"{
            "httpStatus": "PRECONDITION_FAILED",
            "error_code": 244,
            "module_name": "common-services",
            "error_message": "The object was modified by somebody else",
            "related_errors": [{"error_message": "revision 3 expected"}]
        }"#;
        assert_eq!(
            ApiErrorBody::describe(text),
            "The object was modified by somebody else (error code 244); revision 3 expected"
        );
    }

    #[test]
    fn test_api_error_body_passthrough_for_plain_text() {
        assert_eq!(ApiErrorBody::describe("missing"), "missing");
        assert_eq!(ApiErrorBody::describe("{\"foo\": 1}"), "{\"foo\": 1}");
        assert!(ApiErrorBody::parse("{}").is_none());
    }

    // Note: Testing reqwest::Error conversion is difficult without making actual HTTP requests
    // The conversion logic is covered by the client tests

    #[test]
    fn test_from_url_parse_error() {
        let err = url::Url::parse("not a url").unwrap_err();
        let nsxt_err: Error = err.into();
        assert!(matches!(nsxt_err, Error::InvalidEndpoint(_)));
    }

    #[test]
    fn test_from_serde_json_error() {
        let err = serde_json::from_str::<serde_json::Value>("{invalid json}").unwrap_err();
        let nsxt_err: Error = err.into();
        assert!(matches!(nsxt_err, Error::ParseError(_)));
    }

    #[test]
    fn test_error_partial_eq() {
        let err1 = Error::NotFound("test".to_string());
        let err2 = Error::NotFound("test".to_string());
        let err3 = Error::NotFound("other".to_string());

        assert_eq!(err1, err2.clone());
        assert_ne!(err1, err3);
    }
}
