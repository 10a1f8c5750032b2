//! Error types for mock registration and intercepted transports.

use thiserror::Error;

/// Errors returned by [`MockSession`](crate::mocks::session::MockSession) operations.
#[derive(Debug, Error)]
pub enum MockError {
    /// Operation requires an active session
    #[error("mock session is not active")]
    Inactive,
    /// `activate` called on an active session
    #[error("mock session is already active")]
    AlreadyActive,
    /// Removal target does not exist
    #[error("no mock registered for {method} {url}")]
    NotFound { method: String, url: String },
    /// Response payload could not be converted to JSON at registration time
    #[error("response for mock '{url}' is not serializable: {source}")]
    Serialization {
        url: String,
        #[source]
        source: serde_json::Error,
    },
    /// JMESPath filter expression failed to compile
    #[error("invalid filter expression '{expression}': {reason}")]
    InvalidExpression { expression: String, reason: String },
    /// Request-object mock registered without a method
    #[error("HTTP mock for '{url}' requires a method")]
    MissingMethod { url: String },
    /// Method string is not one of the supported HTTP methods
    #[error("unknown HTTP method: {0}")]
    UnknownMethod(String),
}

/// Errors surfaced by request-object and fetch transports.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// `send` called before `open`
    #[error("request was sent before being opened")]
    NotOpened,
    /// Underlying network failure reported by a real transport
    #[error("network error: {0}")]
    Network(String),
    /// Response body is not valid JSON
    #[error("response body is not valid JSON: {0}")]
    Decode(String),
}
