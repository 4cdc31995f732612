//! Error types for EPCIS document decoding and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors during entity construction and document loading.
#[derive(Debug, Error)]
pub enum DecodeError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    // Entity errors (exit code 2)
    #[error("unrecognized document type: {found}")]
    UnknownDocumentType { found: String },

    #[error("unrecognized event type: {found}")]
    UnknownEventType { found: String },

    #[error("invalid value at {path}: expected {expected}, got {actual}")]
    InvalidField {
        path: String,
        expected: &'static str,
        actual: String,
    },
}

/// Fatal lookup failures during validation.
///
/// These abort a validation call immediately: with no catalog entry or
/// resolvable discriminator there is nothing to validate against.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("unknown schema: {name}")]
    UnknownSchema { name: String },

    #[error("unknown field set: {name}")]
    UnknownFieldSet { name: String },

    #[error("unrecognized document type: {found}")]
    UnknownDocumentType { found: String },

    #[error("unrecognized event type: {found}")]
    UnknownEventType { found: String },

    #[error("invalid schema \"{name}\": {message}")]
    InvalidSchema { name: String, message: String },
}

/// Errors raised by assert-mode validation.
#[derive(Debug, Error)]
pub enum ValidateError {
    #[error(transparent)]
    Lookup(#[from] ValidationError),

    #[error("validation failed with {} violation(s)", violations.len())]
    Invalid { violations: Vec<Violation> },
}

/// Classification of a single non-fatal violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    /// The value failed its schema's shape/type/enum constraints.
    Structural,
    /// A field outside the standard field set is not a validly
    /// namespace-qualified extension.
    Extension,
}

/// Single validation violation with path context.
///
/// Violations are accumulated, never individually thrown: one validation
/// pass reports every violation found across the whole tree.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Violation {
    pub kind: ViolationKind,
    /// JSON Pointer (RFC 6901) to the offending field.
    pub path: String,
    /// Human-readable error message.
    pub message: String,
}

impl Violation {
    pub fn structural(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            kind: ViolationKind::Structural,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn extension(path: impl Into<String>, message: impl Into<String>) -> Self {
        Violation {
            kind: ViolationKind::Extension,
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

impl DecodeError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            DecodeError::FileNotFound { .. } | DecodeError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

impl ValidationError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

impl ValidateError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            ValidateError::Lookup(e) => e.exit_code(),
            ValidateError::Invalid { .. } => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_error_exit_codes() {
        let err = DecodeError::FileNotFound {
            path: PathBuf::from("doc.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = DecodeError::UnknownEventType {
            found: "InventoryEvent".into(),
        };
        assert_eq!(err.exit_code(), 2);

        let err = DecodeError::InvalidField {
            path: "/epcList".into(),
            expected: "array of strings",
            actual: "number".into(),
        };
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn validate_error_exit_codes() {
        let err = ValidateError::Invalid {
            violations: vec![Violation::structural("/schemaVersion", "expected string")],
        };
        assert_eq!(err.exit_code(), 1);

        let err = ValidateError::Lookup(ValidationError::UnknownSchema {
            name: "NoSuchDocument".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn violation_display() {
        let v = Violation::extension("/epcisBody/event/factoryId", "not namespace-qualified");
        assert_eq!(
            v.to_string(),
            "/epcisBody/event/factoryId: not namespace-qualified"
        );
    }
}
