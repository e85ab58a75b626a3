//! Application error types

use probe_domain::{ComparisonReport, DomainError, HttpMethod};
use thiserror::Error;

use crate::ports::{FixtureStoreError, HttpClientError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// No HTTP response was received.
    #[error("transport error: {0}")]
    Transport(#[from] HttpClientError),

    /// The service answered with a non-2xx status.
    #[error("HTTP {status} for {method} {path}")]
    HttpStatus {
        /// Request method.
        method: HttpMethod,
        /// Normalized request path.
        path: String,
        /// Status code received.
        status: u16,
        /// Response body text, kept for diagnostics.
        body: String,
    },

    /// No fixture exists and recording is disabled.
    #[error("no fixture for {key} (expected at {location})")]
    FixtureMissing {
        /// Display form of the fixture key.
        key: String,
        /// Where the fixture was looked up.
        location: String,
    },

    /// The fixture store failed.
    #[error("fixture store error: {0}")]
    Fixture(#[from] FixtureStoreError),

    /// The live response differs from the fixture.
    #[error("response does not match fixture\n{0}")]
    Mismatch(Box<ComparisonReport>),

    /// One or more collections could not be removed during teardown.
    #[error("teardown failed for {failed} collection(s); first error: {first}")]
    Teardown {
        /// Number of removals that failed.
        failed: usize,
        /// First failure encountered.
        first: Box<ApplicationError>,
    },
}

impl ApplicationError {
    /// Returns the status code if this is an HTTP-level failure.
    #[must_use]
    pub const fn http_status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the service answered with a non-2xx status.
    #[must_use]
    pub const fn is_http_status(&self) -> bool {
        self.http_status().is_some()
    }

    /// Returns the comparison report if this is a fixture mismatch.
    #[must_use]
    pub fn mismatch(&self) -> Option<&ComparisonReport> {
        match self {
            Self::Mismatch(report) => Some(report),
            _ => None,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
