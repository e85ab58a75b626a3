//! Response specification type
//!
//! Holds what the harness captures from a live call: status code,
//! headers, body bytes and timing.

use std::collections::BTreeMap;
use std::time::Duration;

/// Numeric HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// HTTP response captured from the service under test.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResponseSpec {
    /// HTTP status code.
    pub status: u16,
    /// Response headers keyed by lowercase name.
    pub headers: BTreeMap<String, String>,
    /// Raw body bytes.
    pub body: Vec<u8>,
    /// Time from send to last body byte.
    pub duration: Duration,
}

impl ResponseSpec {
    /// Creates a new `ResponseSpec`, lowercasing header names.
    ///
    /// Repeated headers are joined with `", "` in arrival order.
    #[must_use]
    pub fn new(
        status: impl Into<StatusCode>,
        headers: impl IntoIterator<Item = (String, String)>,
        body: Vec<u8>,
        duration: Duration,
    ) -> Self {
        let mut merged: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            merged
                .entry(name.to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        Self {
            status: status.into().as_u16(),
            headers: merged,
            body,
            duration,
        }
    }

    /// Returns the body as a lossy UTF-8 string.
    #[must_use]
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Gets a header value by name (case-insensitive).
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Returns the Content-Type header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
    }

    /// Returns a human-readable duration string (e.g., "124 ms").
    #[must_use]
    pub fn duration_display(&self) -> String {
        let millis = self.duration.as_millis();
        if millis < 1000 {
            format!("{millis} ms")
        } else {
            format!("{:.2} s", self.duration.as_secs_f64())
        }
    }
}
