//! Probe Domain - Core harness types
//!
//! This crate defines the domain model of the Probe fixture harness:
//! requests, captured responses, fixtures, checks and configuration.
//! All types here are pure Rust with no I/O dependencies.

pub mod collection;
pub mod config;
pub mod error;
pub mod fixture;
pub mod request;
pub mod response;
pub mod testing;

pub use collection::{CollectionRef, CollectionSubmission, OverwriteMerge};
pub use config::{HarnessConfig, RecordMode};
pub use error::{DomainError, DomainResult};
pub use fixture::{FIXTURE_SCHEMA_VERSION, Fixture, FixtureKey};
pub use request::{FormData, FormField, FormValue, Header, Headers, HttpMethod, RequestSpec};
pub use response::{ResponseSpec, StatusCode};
pub use testing::{Assertion, AssertionResult, ComparisonReport, StatusExpectation};
