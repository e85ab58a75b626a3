//! Wires the concrete adapters into the comparison use case.

use std::sync::Arc;

use probe_application::{CompareRequest, HttpClientError};
use probe_domain::{DomainError, HarnessConfig};
use thiserror::Error;

use crate::adapters::ReqwestHttpClient;
use crate::persistence::{FileFixtureStore, TokioFileSystem};
use crate::testing::FixtureComparator;

/// The comparison use case backed by HTTP, fixture files and regex masking.
pub type Harness =
    CompareRequest<ReqwestHttpClient, FileFixtureStore<TokioFileSystem>, FixtureComparator>;

/// Errors raised while assembling a harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// The configuration is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] DomainError),

    /// The HTTP client could not be created.
    #[error("cannot create HTTP client: {0}")]
    Client(#[from] HttpClientError),

    /// An ignore pattern is not a valid regex.
    #[error("invalid ignore pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Builds a harness from a validated configuration.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an ignore pattern does
/// not compile or the HTTP client cannot be created.
pub fn build_harness(config: &HarnessConfig) -> Result<Harness, HarnessError> {
    config.validate()?;

    let client = ReqwestHttpClient::new(config)?;
    let store = FileFixtureStore::new(TokioFileSystem::new(), config.fixture_dir.clone());
    let comparator = FixtureComparator::from_config(config)?;

    Ok(
        CompareRequest::new(Arc::new(client), Arc::new(store), Arc::new(comparator))
            .with_record_mode(config.record_mode),
    )
}
