//! HTTP Client implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port using the reqwest library.
//! It resolves request paths against the configured base URL, attaches the
//! authorization header and encodes multipart forms.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use probe_application::ports::{HttpClient, HttpClientError, HttpClientFuture};
use probe_domain::{HarnessConfig, HttpMethod, RequestSpec, ResponseSpec};
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use crate::http::build_multipart_form;

/// Header carrying the session token expected by the service.
pub const AUTH_HEADER: &str = "X-authorization";

const MAX_REDIRECTS: usize = 10;

/// HTTP client implementation using reqwest.
///
/// Wraps `reqwest::Client` with the settings from a [`HarnessConfig`].
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
    auth_token: Option<String>,
    data_dir: Option<PathBuf>,
    timeout_ms: u64,
}

impl ReqwestHttpClient {
    /// Creates a client from the harness configuration.
    ///
    /// Default behaviour:
    /// - Per-request timeout: `timeout_ms` from the configuration
    /// - Follow redirects: up to 10
    /// - TLS verification: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot be created.
    pub fn new(config: &HarnessConfig) -> Result<Self, HttpClientError> {
        let client = Client::builder()
            .user_agent(concat!("probe/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Self::with_client(client, config)
    }

    /// Creates a client around a custom reqwest client.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn with_client(client: Client, config: &HarnessConfig) -> Result<Self, HttpClientError> {
        let base_url = config
            .parsed_base_url()
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            auth_token: config.auth_token.clone(),
            data_dir: config.data_dir.clone(),
            timeout_ms: config.timeout_ms,
        })
    }

    /// Base URL requests are resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        }
    }

    /// Maps reqwest errors to the port's `HttpClientError`.
    fn map_error(error: &reqwest::Error, timeout_ms: u64) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout { timeout_ms };
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = format_error_chain(error);
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused {
                    host: host(),
                    port: error
                        .url()
                        .and_then(Url::port_or_known_default)
                        .unwrap_or(80),
                };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        if error.is_redirect() {
            return HttpClientError::TooManyRedirects { max: MAX_REDIRECTS };
        }

        HttpClientError::Other(format_error_chain(error))
    }
}

/// Joins an error with its sources; reqwest keeps the useful part
/// (refused, dns) in the source chain.
fn format_error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

impl HttpClient for ReqwestHttpClient {
    fn execute(&self, request: &RequestSpec) -> HttpClientFuture<'_> {
        let method = request.method;
        let url = request
            .resolve_url(&self.base_url)
            .map_err(|e| HttpClientError::InvalidUrl(e.to_string()));
        let headers = request.headers.clone();
        let form = request.form.clone().filter(|_| method.has_body());
        let timeout_ms = self.timeout_ms;

        Box::pin(async move {
            let url = url?;

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(method), url.clone())
                .timeout(Duration::from_millis(timeout_ms));

            for header in headers.iter() {
                builder = builder.header(&header.name, &header.value);
            }

            if let Some(token) = &self.auth_token
                && !headers.contains(AUTH_HEADER)
            {
                builder = builder.header(AUTH_HEADER, token);
            }

            if let Some(form) = &form {
                let multipart = build_multipart_form(form, self.data_dir.as_deref())
                    .await
                    .map_err(|e| HttpClientError::InvalidBody(e.to_string()))?;
                builder = builder.multipart(multipart);
            }

            debug!(%method, %url, "sending request");
            let start = Instant::now();

            let response = builder
                .send()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?;

            let status = response.status().as_u16();

            let response_headers: Vec<(String, String)> = response
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
                .collect();

            let body_bytes = response
                .bytes()
                .await
                .map_err(|e| Self::map_error(&e, timeout_ms))?
                .to_vec();

            let duration = start.elapsed();
            debug!(%method, %url, status, elapsed_ms = duration.as_millis(), "response received");

            Ok(ResponseSpec::new(
                status,
                response_headers,
                body_bytes,
                duration,
            ))
        })
    }
}
