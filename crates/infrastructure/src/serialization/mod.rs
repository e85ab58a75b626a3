//! Deterministic JSON serialization for fixture files.
//!
//! Fixtures are committed next to the tests, so output is kept diff-friendly:
//! - Fields in declaration order, header maps sorted (via `BTreeMap`)
//! - 2-space indentation
//! - Trailing newline
//! - UTF-8 encoding without BOM

mod json;

pub use json::*;
