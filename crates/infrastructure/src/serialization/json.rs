//! JSON serialization helpers for deterministic output.

use probe_domain::{FIXTURE_SCHEMA_VERSION, Fixture};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::ser::{PrettyFormatter, Serializer};

/// Error type for serialization operations.
#[derive(Debug, thiserror::Error)]
pub enum SerializationError {
    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// JSON deserialization failed.
    #[error("JSON deserialization failed: {0}")]
    Deserialize(serde_json::Error),

    /// UTF-8 encoding error.
    #[error("UTF-8 encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    /// The document was written by an incompatible fixture format.
    #[error("unsupported schema version {0}")]
    UnsupportedSchema(u32),
}

/// Serializes a value to deterministic JSON.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn to_json_stable<T: Serialize>(value: &T) -> Result<String, SerializationError> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"  ");
    let mut serializer = Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;

    let mut json = String::from_utf8(buffer)?;
    json.push('\n');
    Ok(json)
}

/// Deserializes JSON from bytes.
///
/// # Errors
///
/// Returns an error if the JSON is invalid or doesn't match the expected type.
pub fn from_json_bytes<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, SerializationError> {
    serde_json::from_slice(bytes).map_err(SerializationError::Deserialize)
}

/// Encodes a fixture as the bytes of a fixture file.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn encode_fixture(fixture: &Fixture) -> Result<Vec<u8>, SerializationError> {
    Ok(to_json_stable(fixture)?.into_bytes())
}

/// Decodes a fixture file.
///
/// The schema version is checked before the rest of the document, so files
/// from a newer format report the version instead of a field error.
///
/// # Errors
///
/// Returns an error if the file is not valid JSON, has an unsupported
/// schema version or is missing fields.
pub fn decode_fixture(bytes: &[u8]) -> Result<Fixture, SerializationError> {
    let value: serde_json::Value = from_json_bytes(bytes)?;

    let version = value
        .get("schema_version")
        .and_then(serde_json::Value::as_u64)
        .unwrap_or(0);
    if version != u64::from(FIXTURE_SCHEMA_VERSION) {
        return Err(SerializationError::UnsupportedSchema(
            u32::try_from(version).unwrap_or(u32::MAX),
        ));
    }

    serde_json::from_value(value).map_err(SerializationError::Deserialize)
}
