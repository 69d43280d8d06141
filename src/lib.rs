//! IDL Schema
//!
//! Extraction of inter-parameter dependencies and property groups from
//! OpenAPI-style object schemas.
//!
//! Dependencies live in the `x-dependencies` array and groups in the
//! `x-property-groups` map. Each entry is a small textual expression that is
//! checked against the schema's declared properties; entries that don't parse
//! or reference undefined properties are dropped, never fatal.
//!
//! # Example
//!
//! ```
//! use idl_schema::{extract_groups, extract_only_one, extract_requires, Literal, PropertySet, SchemaView};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "x-dependencies": [
//!         "IF isTemporary==true THEN expirationDate;",
//!         "OnlyOne(email, phone);",
//!         "IF isTemporary THEN revokedAt;"
//!     ],
//!     "x-property-groups": { "Contact": "Group(email, phone);" },
//!     "properties": {
//!         "isTemporary": { "type": "boolean" },
//!         "expirationDate": { "type": "string", "format": "date" },
//!         "email": { "type": "string" },
//!         "phone": { "type": "string" }
//!     }
//! });
//!
//! let view = SchemaView::new(&schema).unwrap();
//!
//! // The expression referencing the undefined "revokedAt" is dropped
//! let requires = extract_requires(&view);
//! assert_eq!(requires.len(), 1);
//! assert_eq!(requires[0].prerequisite_value(), Some(&Literal::Bool(true)));
//!
//! assert_eq!(extract_only_one(&view)[0].property_keys(), ["email", "phone"]);
//!
//! let groups = extract_groups(&view, true);
//! let names: Vec<&str> = groups.iter().map(|g| g.name()).collect();
//! assert_eq!(names, ["isTemporary", "expirationDate", "Contact"]);
//! ```
//!
//! # Expressions
//!
//! | Kind | Syntax | Meaning |
//! |------|--------|---------|
//! | Requires | `IF a[==v] THEN b[==w];` | if `a` holds, `b` must hold |
//! | OnlyOne | `OnlyOne(a, b, ...);` | at most one of the keys is set |
//! | Group | `Group(a, b, ...);` | keys are rendered together |
//!
//! Literal values are coerced by the declared `type` of their own property.
//! A literal that doesn't fit leaves that side unconstrained.

mod compose;
mod dependency;
mod error;
mod extract;
mod grammar;
mod groups;
mod linter;
mod loader;
mod resolver;
mod schema;
mod types;

pub use compose::{compose_group, compose_only_one, compose_requires};
pub use dependency::{
    extract_only_one, extract_requires, filter_by_type, type_filtered_properties,
    OnlyOneDependency, PropertyGroup, PropertySet, RequiresDependency,
};
pub use error::{ComposeError, LoadError, RejectReason, SchemaError};
pub use extract::{dependency_specifications, group_specifications};
pub use grammar::{parse, Expression, ExpressionKind, RequiresClause};
pub use groups::{assemble_groups, check_group_requests, extract_groups, GroupRequest};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{load_schema, load_schema_str};
pub use resolver::{coerce_literal, require_keys, validate_keys};
pub use schema::{PropertySchema, SchemaView};
pub use types::{
    boolean_format, json_type_name, string_format, DeclaredType, Literal,
    DEPENDENCIES_EXTENSION, PROPERTY_GROUPS_EXTENSION,
};
