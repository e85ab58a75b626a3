//! HTTP Client port

use std::future::Future;
use std::pin::Pin;

use probe_domain::{request::RequestSpec, response::ResponseSpec};
use thiserror::Error;

/// Transport-level failures: the request never produced an HTTP response.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The request body could not be built.
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// The request timed out.
    #[error("request timed out after {timeout_ms} ms")]
    Timeout {
        /// Timeout that elapsed.
        timeout_ms: u64,
    },

    /// The host name could not be resolved.
    #[error("could not resolve host '{host}': {message}")]
    DnsError {
        /// Host that failed to resolve.
        host: String,
        /// Underlying error message.
        message: String,
    },

    /// Nothing is listening on the target port.
    #[error("connection refused by {host}:{port}")]
    ConnectionRefused {
        /// Target host.
        host: String,
        /// Target port.
        port: u16,
    },

    /// The connection failed for another reason.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The redirect limit was exceeded.
    #[error("too many redirects (max {max})")]
    TooManyRedirects {
        /// Redirect limit.
        max: usize,
    },

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Boxed future returned by [`HttpClient::execute`].
pub type HttpClientFuture<'a> =
    Pin<Box<dyn Future<Output = Result<ResponseSpec, HttpClientError>> + Send + 'a>>;

/// Port for issuing HTTP requests against the service under test.
///
/// Implementations resolve the request path against their configured base
/// URL, send the request once and return whatever response arrives,
/// including non-2xx ones. Status interpretation is left to the caller.
pub trait HttpClient: Send + Sync {
    /// Sends the request and returns the raw response.
    ///
    /// # Errors
    ///
    /// Returns an error if no HTTP response was received.
    fn execute(&self, request: &RequestSpec) -> HttpClientFuture<'_>;
}
