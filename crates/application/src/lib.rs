//! Probe Application - Use cases and ports
//!
//! This crate defines the application layer with:
//! - Port traits (HTTP client, fixture store, response comparator)
//! - Use case orchestration (compare a request, collection sessions)
//! - Application-level error handling

pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};
pub use ports::{
    FileSystem, FileSystemError, FixtureStore, FixtureStoreError, HttpClient, HttpClientError,
    ResponseComparator,
};
pub use use_cases::{CollectionSession, CompareOutcome, CompareRequest};
