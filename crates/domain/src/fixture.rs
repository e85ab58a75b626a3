//! Fixtures: stored expected responses.
//!
//! A fixture is addressed by method, path and test name, because one test
//! name is commonly shared by several endpoints checked at the same point
//! of a scenario.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::{HttpMethod, RequestSpec};
use crate::response::ResponseSpec;
use crate::testing::{Assertion, StatusExpectation};

/// Current schema version for fixture files.
pub const FIXTURE_SCHEMA_VERSION: u32 = 1;

/// Identifies a fixture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureKey {
    /// Method of the request the fixture answers.
    pub method: HttpMethod,
    /// Normalized request path (leading `/`).
    pub path: String,
    /// Test name; empty for the default fixture of an endpoint.
    pub test_name: String,
}

impl FixtureKey {
    /// Creates a key, validating the test name.
    ///
    /// # Errors
    ///
    /// Returns an error if the test name has characters other than
    /// ASCII alphanumerics, `_` and `-`.
    pub fn new(
        method: HttpMethod,
        path: impl Into<String>,
        test_name: impl Into<String>,
    ) -> DomainResult<Self> {
        let test_name = test_name.into();
        if !test_name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(DomainError::InvalidFixtureName(test_name));
        }
        let path = path.into();
        Ok(Self {
            method,
            path: format!("/{}", path.trim_start_matches('/')),
            test_name,
        })
    }

    /// Creates the key for a request.
    ///
    /// # Errors
    ///
    /// Returns an error if the test name is invalid.
    pub fn for_request(request: &RequestSpec, test_name: &str) -> DomainResult<Self> {
        Self::new(request.method, request.normalized_path(), test_name)
    }

    /// File name under the fixture directory.
    ///
    /// `GET /manage` with test name `two_submissions` maps to
    /// `get_manage_two_submissions.json`; the root path maps to `root`.
    #[must_use]
    pub fn file_name(&self) -> String {
        let slug = path_slug(&self.path);
        if self.test_name.is_empty() {
            format!("{}_{slug}.json", self.method.fixture_prefix())
        } else {
            format!(
                "{}_{slug}_{}.json",
                self.method.fixture_prefix(),
                self.test_name
            )
        }
    }
}

impl fmt::Display for FixtureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.test_name.is_empty() {
            write!(f, "{} {}", self.method, self.path)
        } else {
            write!(f, "{} {} [{}]", self.method, self.path, self.test_name)
        }
    }
}

fn path_slug(path: &str) -> String {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let mut slug = String::with_capacity(path.len());
    let mut pending_sep = false;
    for c in path.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }
    if slug.is_empty() {
        "root".to_string()
    } else {
        slug
    }
}

/// A stored expected response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixture {
    /// Fixture file schema version.
    pub schema_version: u32,
    /// Method of the recorded request.
    pub method: HttpMethod,
    /// Path of the recorded request.
    pub path: String,
    /// Test name the fixture was recorded under.
    #[serde(default)]
    pub test_name: String,
    /// Expected status code.
    pub status: u16,
    /// Expected values of tracked headers, keyed by lowercase name.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Expected (normalized) body text.
    pub body: String,
}

impl Fixture {
    /// Captures a fixture from a live response.
    ///
    /// Only the `tracked_headers` present on the response are kept. `body`
    /// is the normalized body text.
    #[must_use]
    pub fn capture(
        key: &FixtureKey,
        response: &ResponseSpec,
        tracked_headers: &[String],
        body: String,
    ) -> Self {
        let headers = tracked_headers
            .iter()
            .filter_map(|name| {
                response
                    .get_header(name)
                    .map(|value| (name.to_ascii_lowercase(), value.to_string()))
            })
            .collect();

        Self {
            schema_version: FIXTURE_SCHEMA_VERSION,
            method: key.method,
            path: key.path.clone(),
            test_name: key.test_name.clone(),
            status: response.status,
            headers,
            body,
        }
    }

    /// Returns the key this fixture was recorded under.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored test name is invalid.
    pub fn key(&self) -> DomainResult<FixtureKey> {
        FixtureKey::new(self.method, self.path.clone(), self.test_name.clone())
    }

    /// Checks that a live response must satisfy to match this fixture.
    ///
    /// Status first, then every recorded header, then the body.
    #[must_use]
    pub fn assertions(&self) -> Vec<Assertion> {
        let mut assertions = Vec::with_capacity(self.headers.len() + 2);
        assertions.push(Assertion::StatusCode {
            expected: StatusExpectation::exact(self.status),
        });
        assertions.extend(self.headers.iter().map(|(name, value)| {
            Assertion::HeaderEquals {
                name: name.clone(),
                expected: value.clone(),
            }
        }));
        assertions.push(Assertion::BodyEquals {
            expected: self.body.clone(),
        });
        assertions
    }
}
