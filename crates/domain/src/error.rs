//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A request path cannot be joined onto the base URL.
    #[error("invalid path: {0}")]
    InvalidPath(String),

    /// A header name is invalid.
    #[error("invalid header name: {0}")]
    InvalidHeaderName(String),

    /// A header value is invalid.
    #[error("invalid header value: {0}")]
    InvalidHeaderValue(String),

    /// A form field is malformed.
    #[error("invalid form field: {0}")]
    InvalidFormField(String),

    /// A fixture test name contains characters that cannot appear in a file name.
    #[error("invalid fixture name: {0}")]
    InvalidFixtureName(String),

    /// A record mode string is not recognized.
    #[error("unknown record mode: {0}")]
    UnknownRecordMode(String),

    /// An overwrite/merge code is outside the accepted range.
    #[error("invalid overwrite_merge code: {0}")]
    InvalidOverwriteMerge(String),

    /// A configuration value failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
