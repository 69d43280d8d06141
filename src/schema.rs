//! Read-only view of an object schema's properties and extensions.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::types::{json_type_name, DeclaredType};

/// One declared property of an object schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    pub key: String,
    /// `None` when `type` is missing or not a known OpenAPI type name.
    pub declared_type: Option<DeclaredType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl PropertySchema {
    fn from_json(key: &str, value: &Value) -> Self {
        let text = |name: &str| value.get(name).and_then(Value::as_str).map(String::from);

        Self {
            key: key.to_string(),
            declared_type: value
                .get("type")
                .and_then(Value::as_str)
                .and_then(DeclaredType::parse),
            format: text("format"),
            title: text("title"),
        }
    }
}

/// Ordered snapshot of a schema's properties, plus access to its extensions.
///
/// Property order is the declaration order of the `properties` object, which
/// group assembly depends on.
#[derive(Debug, Clone)]
pub struct SchemaView<'a> {
    root: &'a Map<String, Value>,
    properties: Vec<PropertySchema>,
    index: HashMap<String, usize>,
}

impl<'a> SchemaView<'a> {
    /// Build a view over an object schema.
    ///
    /// A missing or non-object `properties` member gives an empty view.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::NotAnObject` if `schema` is not a JSON object.
    pub fn new(schema: &'a Value) -> Result<Self, SchemaError> {
        let root = schema.as_object().ok_or_else(|| SchemaError::NotAnObject {
            actual: json_type_name(schema).to_string(),
        })?;

        let properties: Vec<PropertySchema> = root
            .get("properties")
            .and_then(Value::as_object)
            .map(|props| {
                props
                    .iter()
                    .map(|(key, value)| PropertySchema::from_json(key, value))
                    .collect()
            })
            .unwrap_or_default();

        let index = properties
            .iter()
            .enumerate()
            .map(|(i, prop)| (prop.key.clone(), i))
            .collect();

        Ok(Self {
            root,
            properties,
            index,
        })
    }

    /// Properties in declaration order.
    pub fn properties(&self) -> &[PropertySchema] {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&PropertySchema> {
        self.index.get(key).map(|&i| &self.properties[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Raw value of a schema extension such as `x-dependencies`.
    pub fn extension(&self, key: &str) -> Option<&'a Value> {
        self.root.get(key)
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}
