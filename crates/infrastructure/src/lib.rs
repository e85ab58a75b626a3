//! Probe Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports
//! defined in the application layer, plus configuration loading
//! and tracing setup.

pub mod adapters;
pub mod harness;
pub mod http;
pub mod persistence;
pub mod serialization;
pub mod settings;
pub mod telemetry;
pub mod testing;

pub use adapters::{AUTH_HEADER, ReqwestHttpClient};
pub use harness::{Harness, HarnessError, build_harness};
pub use http::{BodyBuildError, build_multipart_form};
pub use persistence::{FileFixtureStore, TokioFileSystem};
pub use serialization::{SerializationError, decode_fixture, encode_fixture, to_json_stable};
pub use settings::{ConfigError, ConfigLoader};
pub use telemetry::{DEFAULT_FILTER, init_test_tracing, init_tracing};
pub use testing::{FixtureComparator, IGNORED_MARKER};
