//! Multipart body builder.
//!
//! Turns a domain [`FormData`] into a `reqwest` multipart form. File fields
//! are read from disk here, right before the request is sent, and the read
//! buffer is owned by the form part so no file handle outlives the call.

use std::path::{Path, PathBuf};

use probe_domain::{FormData, FormValue};
use reqwest::multipart::{Form, Part};

/// Error type for body building operations.
#[derive(Debug, thiserror::Error)]
pub enum BodyBuildError {
    /// File not found.
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Resolved path of the missing file.
        path: PathBuf,
    },

    /// Failed to read file.
    #[error("Failed to read file {}: {message}", path.display())]
    FileReadError {
        /// Resolved path of the file.
        path: PathBuf,
        /// Underlying I/O error message.
        message: String,
    },

    /// Invalid part configuration.
    #[error("Invalid form part '{field}': {message}")]
    InvalidPart {
        /// Field name.
        field: String,
        /// What was wrong with it.
        message: String,
    },
}

/// Builds a multipart form from form fields.
///
/// Relative file paths resolve against `data_dir` when one is given.
///
/// # Errors
///
/// Returns an error if a file cannot be read.
pub async fn build_multipart_form(
    form_data: &FormData,
    data_dir: Option<&Path>,
) -> Result<Form, BodyBuildError> {
    let mut form = Form::new();

    for field in form_data.fields() {
        match &field.value {
            FormValue::Text { value } => {
                form = form.text(field.name.clone(), value.clone());
            }
            FormValue::File { path, file_name } => {
                let file_path = resolve_path(path, data_dir);
                let content = read_file(&file_path).await?;

                let file_name = file_name.clone().unwrap_or_else(|| {
                    file_path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .unwrap_or("file")
                        .to_string()
                });

                let part = file_part(&field.name, content, file_name)?;
                form = form.part(field.name.clone(), part);
            }
            FormValue::Bytes { file_name, content } => {
                let part = file_part(&field.name, content.clone(), file_name.clone())?;
                form = form.part(field.name.clone(), part);
            }
        }
    }

    Ok(form)
}

async fn read_file(path: &Path) -> Result<Vec<u8>, BodyBuildError> {
    tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            BodyBuildError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            BodyBuildError::FileReadError {
                path: path.to_path_buf(),
                message: e.to_string(),
            }
        }
    })
}

fn file_part(field: &str, content: Vec<u8>, file_name: String) -> Result<Part, BodyBuildError> {
    let mime_type = mime_guess::from_path(&file_name)
        .first_or_octet_stream()
        .to_string();

    Part::bytes(content)
        .file_name(file_name)
        .mime_str(&mime_type)
        .map_err(|e| BodyBuildError::InvalidPart {
            field: field.to_string(),
            message: format!("Invalid MIME type: {e}"),
        })
}

/// Resolve a path relative to the data directory or as absolute.
#[must_use]
pub fn resolve_path(path: &Path, data_dir: Option<&Path>) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else if let Some(dir) = data_dir {
        dir.join(path)
    } else {
        path.to_path_buf()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use probe_domain::FormField;
    use tempfile::TempDir;

    #[test]
    fn test_resolve_relative_path_against_data_dir() {
        let resolved = resolve_path(Path::new("BBa_I0462.xml"), Some(Path::new("/data")));
        assert_eq!(resolved, PathBuf::from("/data/BBa_I0462.xml"));
    }

    #[test]
    fn test_resolve_absolute_path_ignores_data_dir() {
        let resolved = resolve_path(Path::new("/tmp/a.xml"), Some(Path::new("/data")));
        assert_eq!(resolved, PathBuf::from("/tmp/a.xml"));
    }

    #[test]
    fn test_resolve_without_data_dir() {
        let resolved = resolve_path(Path::new("a.xml"), None);
        assert_eq!(resolved, PathBuf::from("a.xml"));
    }

    #[tokio::test]
    async fn test_build_text_and_file_fields() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("part.xml"), "<rdf:RDF/>").unwrap();

        let form = FormData::new()
            .text("id", "testid")
            .text("overwrite_merge", "0")
            .file("file", "part.xml");

        let built = build_multipart_form(&form, Some(dir.path())).await;
        assert!(built.is_ok());
    }

    #[tokio::test]
    async fn test_missing_file_is_reported_with_path() {
        let dir = TempDir::new().unwrap();
        let form = FormData::new().file("file", "missing.xml");

        let err = build_multipart_form(&form, Some(dir.path()))
            .await
            .unwrap_err();

        match err {
            BodyBuildError::FileNotFound { path } => {
                assert_eq!(path, dir.path().join("missing.xml"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_in_memory_bytes_field() {
        let form = FormData::new().with(FormField::bytes("file", "inline.xml", b"<x/>".to_vec()));
        assert!(build_multipart_form(&form, None).await.is_ok());
    }

    #[test]
    fn test_file_part_guesses_mime_from_name() {
        assert!(file_part("file", Vec::new(), "a.xml".to_string()).is_ok());
        assert!(file_part("file", Vec::new(), "no_extension".to_string()).is_ok());
    }
}
