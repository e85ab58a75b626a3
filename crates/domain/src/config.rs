//! Harness configuration.
//!
//! Replaces hard-coded base URLs and fixture paths. Loading from files and
//! the environment lives in the infrastructure crate; this module only
//! defines the shape, defaults and validation.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{DomainError, DomainResult};

/// Default base URL of the service under test.
pub const DEFAULT_BASE_URL: &str = "http://localhost:7777/";

/// Default fixture directory, relative to the working directory.
pub const DEFAULT_FIXTURE_DIR: &str = "tests/fixtures";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Whether live responses are written back as fixtures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RecordMode {
    /// Fixtures are read-only; a missing fixture is an error.
    #[default]
    Never,
    /// Missing fixtures are recorded, existing ones are compared.
    Missing,
    /// Every fixture is re-recorded from the live response.
    Always,
}

impl RecordMode {
    /// Returns the mode as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Missing => "missing",
            Self::Always => "always",
        }
    }
}

impl fmt::Display for RecordMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordMode {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "never" => Ok(Self::Never),
            "missing" => Ok(Self::Missing),
            "always" => Ok(Self::Always),
            other => Err(DomainError::UnknownRecordMode(other.to_string())),
        }
    }
}

/// Configuration for one harness run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    /// Base URL every request path is resolved against.
    pub base_url: String,
    /// Directory holding fixture files.
    pub fixture_dir: PathBuf,
    /// Directory relative upload paths resolve against.
    pub data_dir: Option<PathBuf>,
    /// Token sent as `X-authorization` unless a request sets it explicitly.
    pub auth_token: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Response headers compared against fixtures (case-insensitive).
    pub tracked_headers: Vec<String>,
    /// Regexes masked out of bodies before comparing or recording.
    pub ignore_patterns: Vec<String>,
    /// Fixture recording behaviour.
    pub record_mode: RecordMode,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            fixture_dir: PathBuf::from(DEFAULT_FIXTURE_DIR),
            data_dir: None,
            auth_token: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            tracked_headers: vec!["content-type".to_string()],
            ignore_patterns: Vec::new(),
            record_mode: RecordMode::Never,
        }
    }
}

impl HarnessConfig {
    /// Creates a default configuration pointing at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the fixture directory (builder pattern).
    #[must_use]
    pub fn with_fixture_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fixture_dir = dir.into();
        self
    }

    /// Sets the auth token (builder pattern).
    #[must_use]
    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    /// Sets the record mode (builder pattern).
    #[must_use]
    pub const fn with_record_mode(mut self, mode: RecordMode) -> Self {
        self.record_mode = mode;
        self
    }

    /// Parses the base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is not an http(s) URL.
    pub fn parsed_base_url(&self) -> DomainResult<Url> {
        let url = Url::parse(&self.base_url)
            .map_err(|e| DomainError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        if matches!(url.scheme(), "http" | "https") {
            Ok(url)
        } else {
            Err(DomainError::InvalidUrl(self.base_url.clone()))
        }
    }

    /// Validates everything that can be checked without I/O.
    ///
    /// Ignore patterns are compiled by the comparator, which reports bad ones.
    ///
    /// # Errors
    ///
    /// Returns the first invalid setting.
    pub fn validate(&self) -> DomainResult<()> {
        self.parsed_base_url()?;
        if self.timeout_ms == 0 {
            return Err(DomainError::InvalidConfig(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        if self.fixture_dir.as_os_str().is_empty() {
            return Err(DomainError::InvalidConfig(
                "fixture_dir must not be empty".to_string(),
            ));
        }
        if let Some(token) = &self.auth_token
            && token.trim().is_empty()
        {
            return Err(DomainError::InvalidConfig(
                "auth_token must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}
