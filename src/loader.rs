//! Schema loading from files and strings.

use std::path::Path;

use serde_json::Value;

use crate::error::{LoadError, SchemaError};
use crate::types::json_type_name;

/// Load a schema document from a file path.
///
/// # Errors
///
/// Returns `LoadError::FileNotFound` if the file doesn't exist,
/// `LoadError::InvalidJson` if it isn't valid JSON, or `LoadError::Schema`
/// if the document is not a JSON object.
pub fn load_schema(path: &Path) -> Result<Value, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_schema_str(&content)
}

/// Load a schema document from a JSON string.
///
/// # Errors
///
/// Returns `LoadError::InvalidJson` if the string isn't valid JSON, or
/// `LoadError::Schema` if the document is not a JSON object.
pub fn load_schema_str(content: &str) -> Result<Value, LoadError> {
    let value: Value =
        serde_json::from_str(content).map_err(|source| LoadError::InvalidJson { source })?;

    if !value.is_object() {
        return Err(SchemaError::NotAnObject {
            actual: json_type_name(&value).to_string(),
        }
        .into());
    }

    Ok(value)
}
