//! Error types for dependency extraction and schema loading.

use std::path::PathBuf;
use thiserror::Error;

/// Caller-contract violations. These are programming errors, never bad metadata.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("schema must be a JSON object, got {actual}")]
    NotAnObject { actual: String },
}

/// Why a single expression was dropped.
///
/// Malformed or dangling expressions never fail an extraction; each one is
/// rejected with one of these reasons and left out of the result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("unrecognized expression: expected IF, OnlyOne or Group")]
    UnrecognizedKeyword,

    #[error("malformed {keyword} expression: {message}")]
    Malformed {
        keyword: &'static str,
        message: String,
    },

    #[error("expected a {expected} expression, found {found}")]
    WrongKind {
        expected: &'static str,
        found: &'static str,
    },

    #[error("property \"{key}\" is not defined in the schema")]
    MissingProperty { key: String },

    #[error("{keyword} needs at least {min} properties, got {actual}")]
    TooFewProperties {
        keyword: &'static str,
        min: usize,
        actual: usize,
    },

    #[error("property \"{key}\" cannot depend on itself")]
    SelfReference { key: String },

    #[error("property \"{key}\" already belongs to another group")]
    AlreadyGrouped { key: String },

    #[error("group value is not a string expression")]
    NotAString,
}

impl RejectReason {
    /// Returns the lint diagnostic code for this reason.
    ///
    /// `E001` is reserved for documents that cannot be loaded at all.
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::UnrecognizedKeyword
            | RejectReason::WrongKind { .. }
            | RejectReason::NotAString => "E002",
            RejectReason::Malformed { .. } => "E003",
            RejectReason::MissingProperty { .. } => "E004",
            RejectReason::TooFewProperties { .. } | RejectReason::SelfReference { .. } => "E005",
            RejectReason::AlreadyGrouped { .. } => "E006",
        }
    }
}

/// Structured input with no expression text that parses back to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComposeError {
    #[error("{keyword} expression cannot contain property key {key:?}")]
    UnreadableKey { keyword: &'static str, key: String },

    #[error("string value {value:?} contains both quote characters")]
    UnquotableValue { value: String },
}

impl ComposeError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        2
    }
}

/// Errors while loading a schema document.
#[derive(Debug, Error)]
pub enum LoadError {
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

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl LoadError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            LoadError::FileNotFound { .. } | LoadError::ReadError { .. } => 3,
            _ => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_error_exit_codes() {
        let err = LoadError::FileNotFound {
            path: PathBuf::from("schema.json"),
        };
        assert_eq!(err.exit_code(), 3);

        let err = LoadError::Schema(SchemaError::NotAnObject {
            actual: "array".into(),
        });
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reject_reason_codes() {
        let reason = RejectReason::MissingProperty { key: "zip".into() };
        assert_eq!(reason.code(), "E004");
        assert_eq!(
            RejectReason::AlreadyGrouped { key: "x".into() }.code(),
            "E006"
        );
    }

    #[test]
    fn compose_error_display() {
        let err = ComposeError::UnreadableKey {
            keyword: "IF",
            key: "a=b".into(),
        };
        assert_eq!(
            err.to_string(),
            r#"IF expression cannot contain property key "a=b""#
        );
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn reject_reason_display() {
        let reason = RejectReason::TooFewProperties {
            keyword: "OnlyOne",
            min: 2,
            actual: 1,
        };
        assert_eq!(
            reason.to_string(),
            "OnlyOne needs at least 2 properties, got 1"
        );
    }
}
