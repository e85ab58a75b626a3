//! HTTP Method enumeration

use serde::{Deserialize, Serialize};
use std::fmt;

/// HTTP methods the harness can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// HTTP GET method
    #[default]
    Get,
    /// HTTP POST method
    Post,
}

impl HttpMethod {
    /// Returns whether this method carries a form body.
    #[must_use]
    pub const fn has_body(self) -> bool {
        matches!(self, Self::Post)
    }

    /// Returns the method as a static string.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }

    /// Lowercase form used as the fixture file prefix.
    #[must_use]
    pub const fn fixture_prefix(self) -> &'static str {
        match self {
            Self::Get => "get",
            Self::Post => "post",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
