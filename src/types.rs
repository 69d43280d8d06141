//! Core types and shared keywords for the inter-parameter dependency language.
//!
//! The parser and the composer both read their keywords from here, so the
//! textual grammar has a single source of truth.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// Schema extension holding the array of dependency expressions.
pub const DEPENDENCIES_EXTENSION: &str = "x-dependencies";

/// Schema extension holding the map of group name to group expression.
pub const PROPERTY_GROUPS_EXTENSION: &str = "x-property-groups";

/// Well-known extension keys, in the order the linter checks them.
pub const IDL_EXTENSIONS: &[&str] = &[DEPENDENCIES_EXTENSION, PROPERTY_GROUPS_EXTENSION];

/// Leading keyword of a "requires" expression.
pub const REQUIRES_KEYWORD: &str = "IF";

/// Separator between the prerequisite and dependant halves of a "requires" expression.
pub const THEN_KEYWORD: &str = "THEN";

/// Leading keyword of an "only one" expression.
pub const ONLY_ONE_KEYWORD: &str = "OnlyOne";

/// Leading keyword of a property group expression.
pub const GROUP_KEYWORD: &str = "Group";

/// Operator binding a property key to a literal value.
pub const VALUE_OPERATOR: &str = "==";

/// Separator between keys in list expressions.
pub const LIST_SEPARATOR: char = ',';

/// Terminator of every expression.
pub const TERMINATOR: char = ';';

/// Quote characters a string literal may be wrapped in, in order of preference.
pub const QUOTES: [char; 2] = ['\'', '"'];

/// Format hints for string properties understood by renderers.
pub mod string_format {
    pub const DATE: &str = "date";
    pub const DAY_OF_WEEK: &str = "day-of-week";
    pub const TIME: &str = "time";
}

/// Format hints for boolean properties understood by renderers.
pub mod boolean_format {
    pub const CHOICE: &str = "choice";
    pub const TOGGLE: &str = "toggle";
}

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Declared data type of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    Boolean,
    String,
    Integer,
    Number,
    Object,
    Array,
}

impl DeclaredType {
    /// Parse an OpenAPI `type` value.
    ///
    /// Returns `None` for unknown names; such properties are treated as untyped.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "boolean" => Some(DeclaredType::Boolean),
            "string" => Some(DeclaredType::String),
            "integer" => Some(DeclaredType::Integer),
            "number" => Some(DeclaredType::Number),
            "object" => Some(DeclaredType::Object),
            "array" => Some(DeclaredType::Array),
            _ => None,
        }
    }

    /// Returns the OpenAPI name of this type.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredType::Boolean => "boolean",
            DeclaredType::String => "string",
            DeclaredType::Integer => "integer",
            DeclaredType::Number => "number",
            DeclaredType::Object => "object",
            DeclaredType::Array => "array",
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed literal value attached to one side of a "requires" dependency.
///
/// An absent literal (`None` wherever a `Literal` is optional) means the
/// property only has to be present; its value is unconstrained.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Number(f64),
    String(String),
}

impl fmt::Display for Literal {
    /// Canonical textual form used inside expressions.
    ///
    /// Strings are single-quoted, or double-quoted when they contain a single
    /// quote. Floats always keep a fractional part or an exponent so they read
    /// back as `Number` rather than `Integer`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Number(n) => write!(f, "{:?}", n),
            Literal::String(s) => {
                let quote = string_quote(s).unwrap_or(QUOTES[0]);
                write!(f, "{quote}{s}{quote}")
            }
        }
    }
}

/// The first quote character that does not occur in `text`.
///
/// `None` means the text contains both and has no quoted form.
pub fn string_quote(text: &str) -> Option<char> {
    QUOTES.into_iter().find(|quote| !text.contains(*quote))
}

impl From<bool> for Literal {
    fn from(value: bool) -> Self {
        Literal::Bool(value)
    }
}

impl From<i64> for Literal {
    fn from(value: i64) -> Self {
        Literal::Integer(value)
    }
}

impl From<f64> for Literal {
    fn from(value: f64) -> Self {
        Literal::Number(value)
    }
}

impl From<&str> for Literal {
    fn from(value: &str) -> Self {
        Literal::String(value.to_string())
    }
}

impl From<String> for Literal {
    fn from(value: String) -> Self {
        Literal::String(value)
    }
}

impl From<Literal> for Value {
    /// Non-finite numbers have no JSON form and become `null`.
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Bool(b) => Value::Bool(b),
            Literal::Integer(i) => Value::from(i),
            Literal::Number(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Literal::String(s) => Value::String(s),
        }
    }
}
