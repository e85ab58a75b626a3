//! Fixture store port

use std::future::Future;

use probe_domain::{Fixture, FixtureKey};
use thiserror::Error;

use super::FileSystemError;

/// Errors raised while loading or saving fixtures.
#[derive(Debug, Error)]
pub enum FixtureStoreError {
    /// The fixture could not be read or written.
    #[error("fixture I/O failed for {location}: {source}")]
    Io {
        /// Where the fixture lives.
        location: String,
        /// Underlying error.
        #[source]
        source: FileSystemError,
    },

    /// The stored fixture is not valid.
    #[error("fixture {location} is corrupt: {message}")]
    Corrupt {
        /// Where the fixture lives.
        location: String,
        /// What is wrong with it.
        message: String,
    },

    /// The fixture was written by an incompatible harness version.
    #[error("fixture {location} has unsupported schema version {found}")]
    UnsupportedSchema {
        /// Where the fixture lives.
        location: String,
        /// Version found in the file.
        found: u32,
    },
}

/// Port for reading and writing fixtures.
pub trait FixtureStore: Send + Sync {
    /// Human-readable location of a fixture (e.g. its file path).
    fn location(&self, key: &FixtureKey) -> String;

    /// Loads a fixture, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture exists but cannot be read or parsed.
    fn load(
        &self,
        key: &FixtureKey,
    ) -> impl Future<Output = Result<Option<Fixture>, FixtureStoreError>> + Send;

    /// Saves a fixture, replacing any existing one with the same key.
    ///
    /// # Errors
    ///
    /// Returns an error if the fixture cannot be written.
    fn save(&self, fixture: &Fixture) -> impl Future<Output = Result<(), FixtureStoreError>> + Send;
}
