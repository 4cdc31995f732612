//! Document loading from files and strings.

use std::path::Path;

use serde_json::Value;

use crate::error::DecodeError;

/// Load a raw document value from a file path.
///
/// # Errors
///
/// Returns `DecodeError::FileNotFound` if the file doesn't exist,
/// `DecodeError::ReadError` if it can't be read, or
/// `DecodeError::InvalidJson` if it isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, DecodeError> {
    if !path.exists() {
        return Err(DecodeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| DecodeError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load a raw document value from a JSON string.
///
/// # Errors
///
/// Returns `DecodeError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, DecodeError> {
    serde_json::from_str(content).map_err(|source| DecodeError::InvalidJson { source })
}
