//! Fixture comparator implementation.
//!
//! Runs the checks derived from a fixture against a live response. Volatile
//! parts of bodies (timestamps, generated ids) are masked by configurable
//! regular expressions before recording and before comparing.

use std::borrow::Cow;

use probe_application::ports::ResponseComparator;
use probe_domain::{
    Assertion, AssertionResult, ComparisonReport, Fixture, HarnessConfig, ResponseSpec,
    StatusExpectation,
};
use regex::Regex;
use similar::TextDiff;

/// Replacement text for masked body content.
pub const IGNORED_MARKER: &str = "<ignored>";

/// Compares responses with fixtures.
#[derive(Debug, Clone)]
pub struct FixtureComparator {
    tracked_headers: Vec<String>,
    ignore_patterns: Vec<Regex>,
}

impl FixtureComparator {
    /// Create a comparator.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore pattern is not a valid regex.
    pub fn new<H, P>(tracked_headers: H, ignore_patterns: P) -> Result<Self, regex::Error>
    where
        H: IntoIterator,
        H::Item: AsRef<str>,
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        let ignore_patterns = ignore_patterns
            .into_iter()
            .map(|p| Regex::new(p.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            tracked_headers: tracked_headers
                .into_iter()
                .map(|h| h.as_ref().to_ascii_lowercase())
                .collect(),
            ignore_patterns,
        })
    }

    /// Create a comparator from the harness configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an ignore pattern is not a valid regex.
    pub fn from_config(config: &HarnessConfig) -> Result<Self, regex::Error> {
        Self::new(&config.tracked_headers, &config.ignore_patterns)
    }

    /// Headers recorded into fixtures, lowercased.
    #[must_use]
    pub fn tracked_headers(&self) -> &[String] {
        &self.tracked_headers
    }

    /// Masks every ignore-pattern match in `text`.
    #[must_use]
    pub fn mask<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let mut masked = Cow::Borrowed(text);
        for pattern in &self.ignore_patterns {
            if pattern.is_match(&masked) {
                masked = Cow::Owned(pattern.replace_all(&masked, IGNORED_MARKER).into_owned());
            }
        }
        masked
    }

    /// Run a single assertion against a response.
    #[must_use]
    pub fn run_assertion(&self, assertion: &Assertion, response: &ResponseSpec) -> AssertionResult {
        match assertion {
            Assertion::StatusCode { expected } => {
                Self::check_status_code(assertion, response, expected)
            }
            Assertion::HeaderEquals { name, expected } => {
                Self::check_header_equals(assertion, response, name, expected)
            }
            Assertion::BodyEquals { expected } => {
                self.check_body_equals(assertion, response, expected)
            }
        }
    }

    fn check_status_code(
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: &StatusExpectation,
    ) -> AssertionResult {
        let actual = response.status;
        if expected.matches(actual) {
            AssertionResult::pass_with_value(assertion.clone(), actual.to_string())
        } else {
            AssertionResult::fail_with_value(
                assertion.clone(),
                actual.to_string(),
                format!("Expected status {}, got {actual}", expected.description()),
            )
        }
    }

    fn check_header_equals(
        assertion: &Assertion,
        response: &ResponseSpec,
        name: &str,
        expected: &str,
    ) -> AssertionResult {
        match response.get_header(name) {
            Some(actual) if actual == expected => {
                AssertionResult::pass_with_value(assertion.clone(), actual)
            }
            Some(actual) => AssertionResult::fail_with_value(
                assertion.clone(),
                actual,
                format!("Header '{name}' value mismatch: expected '{expected}', got '{actual}'"),
            ),
            None => AssertionResult::fail(assertion.clone(), format!("Header '{name}' not found")),
        }
    }

    fn check_body_equals(
        &self,
        assertion: &Assertion,
        response: &ResponseSpec,
        expected: &str,
    ) -> AssertionResult {
        let actual = self.normalize_body(response);
        if actual == expected {
            return AssertionResult::pass(assertion.clone());
        }

        let preview = if actual.chars().count() > 100 {
            format!("{}...", actual.chars().take(100).collect::<String>())
        } else {
            actual.clone()
        };
        AssertionResult::fail_with_value(
            assertion.clone(),
            preview,
            "Body does not match fixture",
        )
        .with_diff(unified_diff(expected, &actual))
    }
}

fn unified_diff(expected: &str, actual: &str) -> String {
    let diff = TextDiff::from_lines(expected, actual);
    diff.unified_diff()
        .context_radius(3)
        .header("fixture", "response")
        .to_string()
}

impl ResponseComparator for FixtureComparator {
    fn normalize_body(&self, response: &ResponseSpec) -> String {
        self.mask(&response.body_text()).into_owned()
    }

    fn tracks_header(&self, name: &str) -> bool {
        self.tracked_headers
            .iter()
            .any(|h| h.eq_ignore_ascii_case(name))
    }

    fn compare(&self, fixture: &Fixture, response: &ResponseSpec) -> ComparisonReport {
        let label = fixture
            .key()
            .map_or_else(|_| fixture.path.clone(), |key| key.to_string());

        let results = fixture
            .assertions()
            .iter()
            .map(|assertion| self.run_assertion(assertion, response))
            .collect();

        ComparisonReport::new(label, results)
    }
}
