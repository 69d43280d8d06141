//! Pulls raw expression strings out of a schema's extensions.
//!
//! Lookups never fail: a missing extension or one with the wrong shape
//! reads as empty, and non-string entries are skipped.

use serde_json::Value;

use crate::schema::SchemaView;
use crate::types::{DEPENDENCIES_EXTENSION, PROPERTY_GROUPS_EXTENSION};

/// Dependency expressions from `x-dependencies`, in declaration order.
pub fn dependency_specifications<'a>(schema: &SchemaView<'a>) -> Vec<&'a str> {
    string_entries(schema.extension(DEPENDENCIES_EXTENSION))
}

/// `(group name, expression)` pairs from `x-property-groups`, in declaration order.
pub fn group_specifications<'a>(schema: &SchemaView<'a>) -> Vec<(&'a str, &'a str)> {
    string_pairs(schema.extension(PROPERTY_GROUPS_EXTENSION))
}

/// String items of an array-valued extension.
pub fn string_entries(extension: Option<&Value>) -> Vec<&str> {
    match extension {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// String-valued members of a map-valued extension.
pub fn string_pairs(extension: Option<&Value>) -> Vec<(&str, &str)> {
    match extension {
        Some(Value::Object(map)) => map
            .iter()
            .filter_map(|(name, value)| value.as_str().map(|s| (name.as_str(), s)))
            .collect(),
        _ => Vec::new(),
    }
}
