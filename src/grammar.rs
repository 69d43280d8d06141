//! Recognizer for the three expression shapes.
//!
//! ```text
//! IF <prerequisite>[==<value>] THEN <dependant>[==<value>];
//! OnlyOne(<key>, <key>, ...);
//! Group(<key>, ...);
//! ```
//!
//! Expressions are classified by a case-sensitive keyword prefix. A value is
//! either a quoted string (`'...'` or `"..."`, no escapes) or a bare token with
//! no whitespace, quotes or `;`. Property keys in a "requires" expression may
//! contain whitespace but not `=`, `;` or quotes. All string handling for the
//! language lives here; later stages only see [`Expression`].

use std::sync::OnceLock;

use regex::Regex;

use crate::error::RejectReason;
use crate::types::{
    GROUP_KEYWORD, LIST_SEPARATOR, ONLY_ONE_KEYWORD, QUOTES, REQUIRES_KEYWORD, TERMINATOR,
    THEN_KEYWORD, VALUE_OPERATOR,
};

/// Shape of an expression, decided by its leading keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpressionKind {
    Requires,
    OnlyOne,
    Group,
}

impl ExpressionKind {
    /// Classify an expression by keyword prefix.
    ///
    /// Returns `None` for text that matches no keyword.
    pub fn classify(text: &str) -> Option<Self> {
        if text.starts_with(REQUIRES_KEYWORD) {
            Some(ExpressionKind::Requires)
        } else if text.starts_with(ONLY_ONE_KEYWORD) {
            Some(ExpressionKind::OnlyOne)
        } else if text.starts_with(GROUP_KEYWORD) {
            Some(ExpressionKind::Group)
        } else {
            None
        }
    }

    pub fn keyword(&self) -> &'static str {
        match self {
            ExpressionKind::Requires => REQUIRES_KEYWORD,
            ExpressionKind::OnlyOne => ONLY_ONE_KEYWORD,
            ExpressionKind::Group => GROUP_KEYWORD,
        }
    }
}

/// Raw operands of a "requires" expression, before schema validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiresClause<'a> {
    pub prerequisite: &'a str,
    pub prerequisite_value: Option<&'a str>,
    pub dependant: &'a str,
    pub dependant_value: Option<&'a str>,
}

/// A syntactically valid expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression<'a> {
    Requires(RequiresClause<'a>),
    OnlyOne(Vec<&'a str>),
    Group(Vec<&'a str>),
}

impl Expression<'_> {
    pub fn kind(&self) -> ExpressionKind {
        match self {
            Expression::Requires(_) => ExpressionKind::Requires,
            Expression::OnlyOne(_) => ExpressionKind::OnlyOne,
            Expression::Group(_) => ExpressionKind::Group,
        }
    }
}

/// Parse one expression.
///
/// # Errors
///
/// Returns `RejectReason::UnrecognizedKeyword` when no keyword matches and
/// `RejectReason::Malformed` when the keyword matches but the text does not.
pub fn parse(text: &str) -> Result<Expression<'_>, RejectReason> {
    match ExpressionKind::classify(text) {
        Some(ExpressionKind::Requires) => parse_requires(text).map(Expression::Requires),
        Some(ExpressionKind::OnlyOne) => {
            parse_list(text, ONLY_ONE_KEYWORD).map(Expression::OnlyOne)
        }
        Some(ExpressionKind::Group) => parse_list(text, GROUP_KEYWORD).map(Expression::Group),
        None => Err(RejectReason::UnrecognizedKeyword),
    }
}

fn requires_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let op = regex::escape(VALUE_OPERATOR);
        let end = regex::escape(&TERMINATOR.to_string());
        let quotes: String = QUOTES.iter().map(|q| regex::escape(&q.to_string())).collect();
        let quoted = QUOTES
            .iter()
            .map(|q| {
                let q = regex::escape(&q.to_string());
                format!("{q}[^{q}]*{q}")
            })
            .collect::<Vec<_>>()
            .join("|");
        let key = format!("[^={end}{quotes}]+?");
        let value = format!(r"{quoted}|[^\s{end}{quotes}]+");

        let pattern = format!(
            r"^{if_kw}\s+(?P<prerequisite>{key})(?:{op}(?P<prerequisite_value>{value}))?\s+{then_kw}\s+(?P<dependant>{key})(?:{op}(?P<dependant_value>{value}))?{end}\s*$",
            if_kw = regex::escape(REQUIRES_KEYWORD),
            then_kw = regex::escape(THEN_KEYWORD),
        );
        Regex::new(&pattern).expect("requires pattern is a valid regex")
    })
}

fn parse_requires(text: &str) -> Result<RequiresClause<'_>, RejectReason> {
    let captures = requires_pattern().captures(text).ok_or_else(|| {
        malformed(
            REQUIRES_KEYWORD,
            "expected IF <key>[==<value>] THEN <key>[==<value>]; with quoted or single-token values",
        )
    })?;

    let operand = |name: &str| captures.name(name).map(|m| m.as_str().trim());

    // Key groups are not optional in the pattern.
    let (Some(prerequisite), Some(dependant)) = (operand("prerequisite"), operand("dependant"))
    else {
        return Err(malformed(REQUIRES_KEYWORD, "missing property key"));
    };

    Ok(RequiresClause {
        prerequisite,
        prerequisite_value: operand("prerequisite_value"),
        dependant,
        dependant_value: operand("dependant_value"),
    })
}

/// Parse `<keyword>(<key>, <key>, ...);` into its keys.
///
/// Keys are trimmed but otherwise kept verbatim, duplicates and empty entries included.
fn parse_list<'a>(text: &'a str, keyword: &'static str) -> Result<Vec<&'a str>, RejectReason> {
    let rest = text
        .strip_prefix(keyword)
        .ok_or(RejectReason::UnrecognizedKeyword)?;

    let body = rest
        .trim_end()
        .strip_suffix(TERMINATOR)
        .ok_or_else(|| malformed(keyword, "missing terminating ';'"))?;

    let body = body
        .strip_prefix('(')
        .and_then(|b| b.strip_suffix(')'))
        .ok_or_else(|| malformed(keyword, "property list must be wrapped in parentheses"))?;

    Ok(body.split(LIST_SEPARATOR).map(str::trim).collect())
}

/// Returns true if `key` reads back unchanged as a "requires" operand.
pub(crate) fn is_requires_key(key: &str) -> bool {
    is_list_key(key)
        && !key.contains(|c: char| c == '=' || c == TERMINATOR || QUOTES.contains(&c))
        && !key.split_whitespace().any(|word| word == THEN_KEYWORD)
}

/// Returns true if `key` reads back unchanged as a list element.
pub(crate) fn is_list_key(key: &str) -> bool {
    !key.is_empty() && key.trim() == key && !key.contains(LIST_SEPARATOR)
}

fn malformed(keyword: &'static str, message: &str) -> RejectReason {
    RejectReason::Malformed {
        keyword,
        message: message.to_string(),
    }
}
