//! HTTP Header types

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{DomainError, DomainResult};

/// A single HTTP header with name and value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    /// The header name (e.g., "Accept")
    pub name: String,
    /// The header value (e.g., "text/plain")
    pub value: String,
}

impl Header {
    /// Creates a new header.
    #[must_use]
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Checks the name is an RFC 7230 token and the value has no control characters.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending part.
    pub fn validate(&self) -> DomainResult<()> {
        let token_char = |c: char| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c);
        if self.name.is_empty() || !self.name.chars().all(token_char) {
            return Err(DomainError::InvalidHeaderName(self.name.clone()));
        }
        if self.value.chars().any(|c| c.is_control() && c != '\t') {
            return Err(DomainError::InvalidHeaderValue(self.value.clone()));
        }
        Ok(())
    }
}

impl FromStr for Header {
    type Err = DomainError;

    /// Parses the curl-style `Name: value` form.
    fn from_str(s: &str) -> DomainResult<Self> {
        let (name, value) = s
            .split_once(':')
            .ok_or_else(|| DomainError::InvalidHeaderName(s.to_string()))?;
        let header = Self::new(name.trim(), value.trim());
        header.validate()?;
        Ok(header)
    }
}

/// An ordered collection of HTTP headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Headers {
    items: Vec<Header>,
}

impl Headers {
    /// Creates an empty header collection.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Adds a header to the collection.
    pub fn add(&mut self, header: Header) {
        self.items.push(header);
    }

    /// Gets the first header value by name (case-insensitive).
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Returns true if a header with the name is present (case-insensitive).
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns an iterator over all headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Header> {
        self.items.iter()
    }
}

impl FromIterator<Header> for Headers {
    fn from_iter<T: IntoIterator<Item = Header>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter().map(|(k, v)| Header::new(k, v)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_header() {
        let header: Header = "X-authorization: e35054aa".parse().unwrap();
        assert_eq!(header.name, "X-authorization");
        assert_eq!(header.value, "e35054aa");
    }

    #[test]
    fn test_parse_header_without_colon() {
        assert!("Accept text/plain".parse::<Header>().is_err());
    }

    #[test]
    fn test_invalid_header_name() {
        let header = Header::new("Bad Header", "x");
        assert_eq!(
            header.validate(),
            Err(DomainError::InvalidHeaderName("Bad Header".to_string()))
        );
    }

    #[test]
    fn test_get_is_case_insensitive() {
        let headers: Headers = [("Accept", "text/plain")].into_iter().collect();
        assert_eq!(headers.get("accept"), Some("text/plain"));
        assert!(headers.contains("ACCEPT"));
        assert!(!headers.contains("X-authorization"));
    }
}
