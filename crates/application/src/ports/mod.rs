//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the harness core and the outside
//! world: the service under test, fixture storage and the comparison engine.
//! Each port is a trait implemented by adapters in the infrastructure layer.

mod comparator;
mod file_system;
mod fixture_store;
mod http_client;

pub use comparator::ResponseComparator;
pub use file_system::{FileSystem, FileSystemError};
pub use fixture_store::{FixtureStore, FixtureStoreError};
pub use http_client::{HttpClient, HttpClientError, HttpClientFuture};
