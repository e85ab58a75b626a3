//! Response checks and comparison reports.
//!
//! A fixture expands into a list of [`Assertion`]s; running them against a
//! live response yields a [`ComparisonReport`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// A single check run against a response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Assertion {
    /// Check response status code.
    StatusCode {
        /// Expected status code or range.
        expected: StatusExpectation,
    },
    /// Check a header is present with exactly this value.
    HeaderEquals {
        /// Header name (case-insensitive).
        name: String,
        /// Expected value.
        expected: String,
    },
    /// Check the normalized body equals the expected text.
    BodyEquals {
        /// Expected body content.
        expected: String,
    },
}

impl Assertion {
    /// Get a human-readable description of this assertion.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::StatusCode { expected } => format!("Status code {}", expected.description()),
            Self::HeaderEquals { name, expected } => {
                format!("Header '{name}' equals '{expected}'")
            }
            Self::BodyEquals { .. } => "Body equals fixture".to_string(),
        }
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub const fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => format!("= {code}"),
            Self::Range { min, max } => format!("in {min}-{max}"),
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::success()
    }
}

/// Result of running a single assertion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssertionResult {
    /// The assertion that was run.
    pub assertion: Assertion,
    /// Whether the assertion passed.
    pub passed: bool,
    /// Actual value found (for display).
    pub actual: Option<String>,
    /// Error message if failed.
    pub error: Option<String>,
    /// Unified diff between expected and actual, for body mismatches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<String>,
}

impl AssertionResult {
    /// Create a passed result.
    #[must_use]
    pub const fn pass(assertion: Assertion) -> Self {
        Self {
            assertion,
            passed: true,
            actual: None,
            error: None,
            diff: None,
        }
    }

    /// Create a passed result with actual value.
    #[must_use]
    pub fn pass_with_value(assertion: Assertion, actual: impl Into<String>) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::pass(assertion)
        }
    }

    /// Create a failed result.
    #[must_use]
    pub fn fail(assertion: Assertion, error: impl Into<String>) -> Self {
        Self {
            assertion,
            passed: false,
            actual: None,
            error: Some(error.into()),
            diff: None,
        }
    }

    /// Create a failed result with actual value.
    #[must_use]
    pub fn fail_with_value(
        assertion: Assertion,
        actual: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            actual: Some(actual.into()),
            ..Self::fail(assertion, error)
        }
    }

    /// Attach a diff (builder pattern).
    #[must_use]
    pub fn with_diff(mut self, diff: impl Into<String>) -> Self {
        self.diff = Some(diff.into());
        self
    }
}

/// Outcome of comparing one live response with one fixture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonReport {
    /// Display form of the fixture key.
    pub fixture: String,
    /// Individual assertion results.
    pub results: Vec<AssertionResult>,
    /// Total number of assertions.
    pub total: usize,
    /// Number of passed assertions.
    pub passed: usize,
    /// Number of failed assertions.
    pub failed: usize,
}

impl ComparisonReport {
    /// Create a report from individual results.
    #[must_use]
    pub fn new(fixture: impl Into<String>, results: Vec<AssertionResult>) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();

        Self {
            fixture: fixture.into(),
            results,
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Check if all assertions passed.
    #[must_use]
    pub const fn all_passed(&self) -> bool {
        self.failed == 0
    }

    /// Iterate over failed results.
    pub fn failures(&self) -> impl Iterator<Item = &AssertionResult> {
        self.results.iter().filter(|r| !r.passed)
    }
}

impl fmt::Display for ComparisonReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {}/{} checks passed",
            self.fixture, self.passed, self.total
        )?;
        for failure in self.failures() {
            write!(f, "  FAIL {}", failure.assertion.description())?;
            if let Some(error) = &failure.error {
                write!(f, ": {error}")?;
            }
            writeln!(f)?;
            if let Some(diff) = &failure.diff {
                for line in diff.lines() {
                    writeln!(f, "    {line}")?;
                }
            }
        }
        Ok(())
    }
}
