//! Response comparator port

use probe_domain::{ComparisonReport, Fixture, ResponseSpec};

/// Compares live responses with fixtures.
pub trait ResponseComparator: Send + Sync {
    /// Returns the body text with volatile content masked.
    ///
    /// The same normalization is applied before recording and before comparing.
    fn normalize_body(&self, response: &ResponseSpec) -> String;

    /// Returns true if the header is recorded in fixtures and compared.
    fn tracks_header(&self, name: &str) -> bool;

    /// Runs every check derived from the fixture against the response.
    fn compare(&self, fixture: &Fixture, response: &ResponseSpec) -> ComparisonReport;
}
