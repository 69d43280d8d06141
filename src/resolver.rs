//! Property resolution - checks key references and coerces literal values.

use crate::error::RejectReason;
use crate::schema::{PropertySchema, SchemaView};
use crate::types::{DeclaredType, Literal, QUOTES};

/// Returns true if every key is a property of `schema`.
pub fn validate_keys<'k>(
    schema: &SchemaView<'_>,
    keys: impl IntoIterator<Item = &'k str>,
) -> bool {
    require_keys(schema, keys).is_ok()
}

/// Like [`validate_keys`], but reports the first missing key.
///
/// # Errors
///
/// Returns `RejectReason::MissingProperty` naming the first key not in the schema.
pub fn require_keys<'k>(
    schema: &SchemaView<'_>,
    keys: impl IntoIterator<Item = &'k str>,
) -> Result<(), RejectReason> {
    match keys.into_iter().find(|key| !schema.contains(key)) {
        Some(key) => Err(RejectReason::MissingProperty {
            key: key.to_string(),
        }),
        None => Ok(()),
    }
}

/// Look up a property, failing with the reason used for dropped expressions.
pub(crate) fn require_property<'s>(
    schema: &'s SchemaView<'_>,
    key: &str,
) -> Result<&'s PropertySchema, RejectReason> {
    schema
        .property(key)
        .ok_or_else(|| RejectReason::MissingProperty {
            key: key.to_string(),
        })
}

/// Coerce a literal token by the declared type of the property it constrains.
///
/// Never fails: a token that does not fit the type, or a property type with no
/// literal form, yields `None` (value unconstrained).
///
/// | Declared type | Coercion |
/// |---|---|
/// | boolean | case-insensitive `true` / `false` |
/// | string | one layer of matching quotes stripped; blank text is unconstrained |
/// | integer, number | integer if possible, else float |
/// | other | unconstrained |
pub fn coerce_literal(token: &str, declared_type: Option<DeclaredType>) -> Option<Literal> {
    match declared_type? {
        DeclaredType::Boolean => parse_bool(token).map(Literal::Bool),
        DeclaredType::String => {
            if token.trim().is_empty() {
                None
            } else {
                Some(Literal::String(strip_quotes(token).to_string()))
            }
        }
        DeclaredType::Integer | DeclaredType::Number => parse_numeric(token),
        DeclaredType::Object | DeclaredType::Array => None,
    }
}

fn parse_bool(token: &str) -> Option<bool> {
    let token = token.trim();
    if token.eq_ignore_ascii_case("true") {
        Some(true)
    } else if token.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

fn parse_numeric(token: &str) -> Option<Literal> {
    let token = token.trim();
    if let Ok(i) = token.parse::<i64>() {
        return Some(Literal::Integer(i));
    }
    token.parse::<f64>().ok().map(Literal::Number)
}

/// Strip exactly one pair of matching surrounding quotes, if present.
fn strip_quotes(token: &str) -> &str {
    for quote in QUOTES {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}
