//! Collection submissions and removal targets.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};
use crate::request::{FormData, FormField, RequestSpec};

/// Path of the submission endpoint.
pub const SUBMIT_PATH: &str = "/submit";

/// How the service treats an existing collection with the same id and version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteMerge {
    /// Reject the submission if the collection exists.
    #[default]
    Prevent,
    /// Replace the existing collection.
    Overwrite,
    /// Merge into the existing collection, rejecting conflicting parts.
    MergePrevent,
    /// Merge into the existing collection, replacing conflicting parts.
    MergeOverwrite,
}

impl OverwriteMerge {
    /// Wire code sent in the `overwrite_merge` field.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Prevent => "0",
            Self::Overwrite => "1",
            Self::MergePrevent => "2",
            Self::MergeOverwrite => "3",
        }
    }
}

impl FromStr for OverwriteMerge {
    type Err = DomainError;

    fn from_str(s: &str) -> DomainResult<Self> {
        match s {
            "0" => Ok(Self::Prevent),
            "1" => Ok(Self::Overwrite),
            "2" => Ok(Self::MergePrevent),
            "3" => Ok(Self::MergeOverwrite),
            other => Err(DomainError::InvalidOverwriteMerge(other.to_string())),
        }
    }
}

/// A collection upload to `POST /submit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSubmission {
    /// Collection id, unique per owner.
    pub id: String,
    /// Collection version.
    pub version: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Citations (PubMed ids or `none`).
    pub citations: String,
    /// Behaviour on an existing collection.
    #[serde(default)]
    pub overwrite_merge: OverwriteMerge,
    /// Document to upload in the `file` field.
    pub file: PathBuf,
}

impl CollectionSubmission {
    /// Creates a submission with version `1`, no citations and `Prevent`.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        Self {
            id: id.into(),
            version: "1".to_string(),
            name: name.into(),
            description: String::new(),
            citations: "none".to_string(),
            overwrite_merge: OverwriteMerge::Prevent,
            file: file.into(),
        }
    }

    /// Sets the description (builder pattern).
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the version (builder pattern).
    #[must_use]
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Sets the overwrite/merge behaviour (builder pattern).
    #[must_use]
    pub const fn with_overwrite_merge(mut self, mode: OverwriteMerge) -> Self {
        self.overwrite_merge = mode;
        self
    }

    /// Checks the fields the service requires.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty id, version or name, or an id the
    /// service cannot use in a URI.
    pub fn validate(&self) -> DomainResult<()> {
        for (field, value) in [
            ("id", &self.id),
            ("version", &self.version),
            ("name", &self.name),
        ] {
            if value.trim().is_empty() {
                return Err(DomainError::InvalidFormField(format!("{field} is empty")));
            }
        }
        if !self
            .id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(DomainError::InvalidFormField(format!(
                "id '{}' may only contain letters, digits and '_'",
                self.id
            )));
        }
        Ok(())
    }

    /// Builds the multipart form in the field order the service expects.
    #[must_use]
    pub fn to_form(&self) -> FormData {
        FormData::new()
            .text("id", &self.id)
            .text("version", &self.version)
            .text("name", &self.name)
            .text("description", &self.description)
            .text("citations", &self.citations)
            .text("overwrite_merge", self.overwrite_merge.code())
            .with(FormField::file("file", self.file.clone()))
    }

    /// Builds the `POST /submit` request with `Accept: text/plain`.
    ///
    /// # Errors
    ///
    /// Returns an error if the submission is invalid.
    pub fn to_request(&self) -> DomainResult<RequestSpec> {
        self.validate()?;
        Ok(RequestSpec::post(SUBMIT_PATH, self.to_form()).with_header("Accept", "text/plain"))
    }

    /// Reference to the collection this submission creates.
    #[must_use]
    pub fn reference(&self, owner: impl Into<String>) -> CollectionRef {
        CollectionRef {
            owner: owner.into(),
            id: self.id.clone(),
            version: self.version.clone(),
        }
    }
}

/// Identifies a stored collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectionRef {
    /// Owning user name.
    pub owner: String,
    /// Collection id.
    pub id: String,
    /// Collection version.
    pub version: String,
}

impl CollectionRef {
    /// Creates a reference.
    #[must_use]
    pub fn new(
        owner: impl Into<String>,
        id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            owner: owner.into(),
            id: id.into(),
            version: version.into(),
        }
    }

    /// Path of the collection's top-level object.
    #[must_use]
    pub fn collection_path(&self) -> String {
        format!(
            "/user/{owner}/{id}/{id}_collection/{version}",
            owner = self.owner,
            id = self.id,
            version = self.version
        )
    }

    /// `GET` request that deletes the collection.
    #[must_use]
    pub fn removal_request(&self) -> RequestSpec {
        RequestSpec::get(format!("{}/removeCollection", self.collection_path()))
            .with_header("Accept", "text/plain")
    }
}

impl fmt::Display for CollectionRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.owner, self.id, self.version)
    }
}
