//! Response comparison infrastructure.
//!
//! This module provides the comparator that checks live responses against fixtures.

mod runner;

pub use runner::{FixtureComparator, IGNORED_MARKER};
