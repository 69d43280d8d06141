//! Canonical expression text, the inverse of parsing.
//!
//! ```text
//! IF isTemporary==true THEN expirationDate=='2025-01-01';
//! OnlyOne(yes, no);
//! Group(option1, option2);
//! ```
//!
//! Composing refuses input the parser could not read back unchanged, so
//! every `Ok` text parses to the same keys and values.

use crate::error::ComposeError;
use crate::grammar::{is_list_key, is_requires_key};
use crate::types::{
    string_quote, Literal, GROUP_KEYWORD, LIST_SEPARATOR, ONLY_ONE_KEYWORD, REQUIRES_KEYWORD,
    TERMINATOR, THEN_KEYWORD, VALUE_OPERATOR,
};

/// Compose a "requires" expression.
///
/// Omitted values leave that side unconstrained.
///
/// # Errors
///
/// Returns `ComposeError::UnreadableKey` for a key that is empty, padded with
/// whitespace, or contains `=`, `;`, a quote or a `THEN` word, and
/// `ComposeError::UnquotableValue` for a string containing both quote kinds.
pub fn compose_requires(
    prerequisite_key: &str,
    dependant_key: &str,
    prerequisite_value: Option<&Literal>,
    dependant_value: Option<&Literal>,
) -> Result<String, ComposeError> {
    for key in [prerequisite_key, dependant_key] {
        if !is_requires_key(key) {
            return Err(unreadable(REQUIRES_KEYWORD, key));
        }
    }

    let mut out = format!("{} {}", REQUIRES_KEYWORD, prerequisite_key);
    push_value(&mut out, prerequisite_value)?;
    out.push_str(&format!(" {} {}", THEN_KEYWORD, dependant_key));
    push_value(&mut out, dependant_value)?;
    out.push(TERMINATOR);
    Ok(out)
}

/// Compose an "only one" expression over keys, in order.
///
/// # Errors
///
/// Returns `ComposeError::UnreadableKey` for a key that is empty, padded with
/// whitespace, or contains `,`.
pub fn compose_only_one<S: AsRef<str>>(keys: &[S]) -> Result<String, ComposeError> {
    compose_list(ONLY_ONE_KEYWORD, keys)
}

/// Compose a group expression over keys, in order.
///
/// # Errors
///
/// Same as [`compose_only_one`].
pub fn compose_group<S: AsRef<str>>(keys: &[S]) -> Result<String, ComposeError> {
    compose_list(GROUP_KEYWORD, keys)
}

fn compose_list<S: AsRef<str>>(keyword: &'static str, keys: &[S]) -> Result<String, ComposeError> {
    let keys: Vec<&str> = keys.iter().map(|key| key.as_ref()).collect();
    if let Some(key) = keys.iter().find(|key| !is_list_key(key)) {
        return Err(unreadable(keyword, key));
    }

    let separator = format!("{} ", LIST_SEPARATOR);
    Ok(format!("{}({}){}", keyword, keys.join(&separator), TERMINATOR))
}

fn push_value(out: &mut String, value: Option<&Literal>) -> Result<(), ComposeError> {
    if let Some(value) = value {
        if let Literal::String(text) = value {
            if string_quote(text).is_none() {
                return Err(ComposeError::UnquotableValue {
                    value: text.clone(),
                });
            }
        }
        out.push_str(VALUE_OPERATOR);
        out.push_str(&value.to_string());
    }
    Ok(())
}

fn unreadable(keyword: &'static str, key: &str) -> ComposeError {
    ComposeError::UnreadableKey {
        keyword,
        key: key.to_string(),
    }
}
