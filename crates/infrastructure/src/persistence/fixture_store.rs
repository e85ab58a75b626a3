//! File system based fixture store implementation.

use std::path::{Path, PathBuf};

use probe_application::ports::{FileSystem, FixtureStore, FixtureStoreError};
use probe_domain::{Fixture, FixtureKey};
use tracing::debug;

use crate::serialization::{SerializationError, decode_fixture, encode_fixture};

/// Stores one JSON file per fixture under a directory.
pub struct FileFixtureStore<F: FileSystem> {
    fs: F,
    dir: PathBuf,
}

impl<F: FileSystem> FileFixtureStore<F> {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(fs: F, dir: impl Into<PathBuf>) -> Self {
        Self {
            fs,
            dir: dir.into(),
        }
    }

    /// Directory fixture files live in.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the file for `key`.
    #[must_use]
    pub fn path_for(&self, key: &FixtureKey) -> PathBuf {
        self.dir.join(key.file_name())
    }
}

impl<F: FileSystem> FixtureStore for FileFixtureStore<F> {
    fn location(&self, key: &FixtureKey) -> String {
        self.path_for(key).display().to_string()
    }

    async fn load(&self, key: &FixtureKey) -> Result<Option<Fixture>, FixtureStoreError> {
        let path = self.path_for(key);
        let location = path.display().to_string();

        if !self.fs.exists(&path).await {
            debug!(%location, "no fixture file");
            return Ok(None);
        }

        let bytes = self
            .fs
            .read_file(&path)
            .await
            .map_err(|source| FixtureStoreError::Io {
                location: location.clone(),
                source,
            })?;

        let fixture = decode_fixture(&bytes).map_err(|e| match e {
            SerializationError::UnsupportedSchema(found) => FixtureStoreError::UnsupportedSchema {
                location: location.clone(),
                found,
            },
            other => FixtureStoreError::Corrupt {
                location: location.clone(),
                message: other.to_string(),
            },
        })?;

        // Distinct paths can share a slug; the stored key must be the one asked for.
        if fixture.method != key.method
            || fixture.path != key.path
            || fixture.test_name != key.test_name
        {
            return Err(FixtureStoreError::Corrupt {
                location,
                message: format!(
                    "recorded for {} {} [{}], expected {key}",
                    fixture.method, fixture.path, fixture.test_name
                ),
            });
        }

        Ok(Some(fixture))
    }

    async fn save(&self, fixture: &Fixture) -> Result<(), FixtureStoreError> {
        let key = fixture.key().map_err(|e| FixtureStoreError::Corrupt {
            location: self.dir.display().to_string(),
            message: e.to_string(),
        })?;
        let path = self.path_for(&key);
        let location = path.display().to_string();

        let bytes = encode_fixture(fixture).map_err(|e| FixtureStoreError::Corrupt {
            location: location.clone(),
            message: e.to_string(),
        })?;

        self.fs
            .write_file(&path, &bytes)
            .await
            .map_err(|source| FixtureStoreError::Io {
                location: location.clone(),
                source,
            })?;

        debug!(%location, "fixture written");
        Ok(())
    }
}
