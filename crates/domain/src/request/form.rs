//! Multipart form types.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{DomainError, DomainResult};

/// Value of a single multipart field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormValue {
    /// Literal text value.
    Text {
        /// The value sent for the field.
        value: String,
    },
    /// File attachment read from disk when the request is built.
    File {
        /// Path to the file; relative paths resolve against the data directory.
        path: PathBuf,
        /// File name reported to the server; defaults to the path's file name.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        file_name: Option<String>,
    },
    /// File attachment already held in memory.
    Bytes {
        /// File name reported to the server.
        file_name: String,
        /// Raw content.
        content: Vec<u8>,
    },
}

/// A named multipart field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormField {
    /// Field name.
    pub name: String,
    /// Field value.
    #[serde(flatten)]
    pub value: FormValue,
}

impl FormField {
    /// Creates a text field.
    #[must_use]
    pub fn text(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Text {
                value: value.into(),
            },
        }
    }

    /// Creates a file field that will be read from `path`.
    #[must_use]
    pub fn file(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::File {
                path: path.into(),
                file_name: None,
            },
        }
    }

    /// Creates a file field from in-memory content.
    #[must_use]
    pub fn bytes(name: impl Into<String>, file_name: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            value: FormValue::Bytes {
                file_name: file_name.into(),
                content,
            },
        }
    }

    /// Parses `name=value` into a text field.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=` or the name is empty.
    pub fn parse_text(raw: &str) -> DomainResult<Self> {
        let (name, value) = split_assignment(raw)?;
        Ok(Self::text(name, value))
    }

    /// Parses `name=path` into a file field.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no `=`, or the name or path is empty.
    pub fn parse_file(raw: &str) -> DomainResult<Self> {
        let (name, path) = split_assignment(raw)?;
        if path.is_empty() {
            return Err(DomainError::InvalidFormField(raw.to_string()));
        }
        Ok(Self::file(name, path))
    }
}

fn split_assignment(raw: &str) -> DomainResult<(&str, &str)> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => Ok((name.trim(), value)),
        _ => Err(DomainError::InvalidFormField(raw.to_string())),
    }
}

/// Ordered multipart form.
///
/// Field order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormData {
    fields: Vec<FormField>,
}

impl FormData {
    /// Creates an empty form.
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Adds a field (builder pattern).
    #[must_use]
    pub fn with(mut self, field: FormField) -> Self {
        self.fields.push(field);
        self
    }

    /// Adds a text field (builder pattern).
    #[must_use]
    pub fn text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(FormField::text(name, value))
    }

    /// Adds a file field (builder pattern).
    #[must_use]
    pub fn file(self, name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        self.with(FormField::file(name, path))
    }

    /// Returns the fields in order.
    #[must_use]
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }

    /// Returns the first text value for a field name.
    #[must_use]
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|f| match &f.value {
            FormValue::Text { value } if f.name == name => Some(value.as_str()),
            _ => None,
        })
    }
}

impl FromIterator<FormField> for FormData {
    fn from_iter<T: IntoIterator<Item = FormField>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
