//! Dependency objects and their extraction from `x-dependencies`.
//!
//! Each expression is parsed on its own into a `Result`; extraction keeps the
//! successes and drops the rest, logging the reason at `debug` level.

use serde::Serialize;
use tracing::{debug, trace};

use crate::compose::{compose_group, compose_only_one, compose_requires};
use crate::error::{ComposeError, RejectReason};
use crate::extract::dependency_specifications;
use crate::grammar::{self, Expression, ExpressionKind, RequiresClause};
use crate::resolver::{coerce_literal, require_keys, require_property};
use crate::schema::{PropertySchema, SchemaView};
use crate::types::{DeclaredType, Literal, GROUP_KEYWORD, ONLY_ONE_KEYWORD, REQUIRES_KEYWORD};

/// Minimum number of keys in an "only one" expression.
const ONLY_ONE_MIN_KEYS: usize = 2;

/// Minimum number of keys in a group expression.
const GROUP_MIN_KEYS: usize = 1;

/// An ordered set of sibling properties considered together.
///
/// Implemented by [`OnlyOneDependency`] and [`PropertyGroup`] so both can be
/// passed to [`filter_by_type`].
pub trait PropertySet {
    fn property_keys(&self) -> &[String];
}

/// "If the prerequisite holds, the dependant must hold."
///
/// A `None` value means only the property's presence matters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequiresDependency {
    prerequisite_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    prerequisite_value: Option<Literal>,
    dependant_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    dependant_value: Option<Literal>,
}

impl RequiresDependency {
    /// Create a dependency with both values unconstrained.
    pub fn new(prerequisite_key: impl Into<String>, dependant_key: impl Into<String>) -> Self {
        Self {
            prerequisite_key: prerequisite_key.into(),
            prerequisite_value: None,
            dependant_key: dependant_key.into(),
            dependant_value: None,
        }
    }

    /// Constrain the prerequisite to a value.
    pub fn with_prerequisite_value(mut self, value: impl Into<Literal>) -> Self {
        self.prerequisite_value = Some(value.into());
        self
    }

    /// Constrain the dependant to a value.
    pub fn with_dependant_value(mut self, value: impl Into<Literal>) -> Self {
        self.dependant_value = Some(value.into());
        self
    }

    /// Parse one expression against a schema.
    ///
    /// Each literal is coerced by the declared type of its own property; a
    /// literal that does not fit is left unconstrained rather than rejected.
    ///
    /// # Errors
    ///
    /// Returns the reason the expression has to be dropped: bad syntax, a
    /// different expression kind, a missing property, or a property that
    /// depends on itself.
    pub fn parse(specification: &str, schema: &SchemaView<'_>) -> Result<Self, RejectReason> {
        match grammar::parse(specification)? {
            Expression::Requires(clause) => Self::from_clause(clause, schema),
            other => Err(wrong_kind(REQUIRES_KEYWORD, &other)),
        }
    }

    fn from_clause(
        clause: RequiresClause<'_>,
        schema: &SchemaView<'_>,
    ) -> Result<Self, RejectReason> {
        let prerequisite = require_property(schema, clause.prerequisite)?;
        let dependant = require_property(schema, clause.dependant)?;

        if prerequisite.key == dependant.key {
            return Err(RejectReason::SelfReference {
                key: prerequisite.key.clone(),
            });
        }

        Ok(Self {
            prerequisite_key: prerequisite.key.clone(),
            prerequisite_value: clause
                .prerequisite_value
                .and_then(|token| coerce_literal(token, prerequisite.declared_type)),
            dependant_key: dependant.key.clone(),
            dependant_value: clause
                .dependant_value
                .and_then(|token| coerce_literal(token, dependant.declared_type)),
        })
    }

    pub fn prerequisite_key(&self) -> &str {
        &self.prerequisite_key
    }

    pub fn prerequisite_value(&self) -> Option<&Literal> {
        self.prerequisite_value.as_ref()
    }

    pub fn dependant_key(&self) -> &str {
        &self.dependant_key
    }

    pub fn dependant_value(&self) -> Option<&Literal> {
        self.dependant_value.as_ref()
    }

    /// Canonical expression text for this dependency.
    ///
    /// # Errors
    ///
    /// Returns a `ComposeError` if a key or value has no readable text form.
    pub fn to_specification(&self) -> Result<String, ComposeError> {
        compose_requires(
            &self.prerequisite_key,
            &self.dependant_key,
            self.prerequisite_value.as_ref(),
            self.dependant_value.as_ref(),
        )
    }
}

/// Exactly one of the listed properties may be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OnlyOneDependency {
    property_keys: Vec<String>,
}

impl OnlyOneDependency {
    /// Create from keys, kept in the given order.
    pub fn new<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self {
            property_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse one expression against a schema.
    ///
    /// Duplicate keys are kept as written.
    ///
    /// # Errors
    ///
    /// Returns the reason the expression has to be dropped: bad syntax, a
    /// different expression kind, fewer than two keys, or a missing property.
    pub fn parse(specification: &str, schema: &SchemaView<'_>) -> Result<Self, RejectReason> {
        match grammar::parse(specification)? {
            Expression::OnlyOne(keys) => {
                check_arity(ONLY_ONE_KEYWORD, ONLY_ONE_MIN_KEYS, keys.len())?;
                require_keys(schema, keys.iter().copied())?;
                Ok(Self::new(keys))
            }
            other => Err(wrong_kind(ONLY_ONE_KEYWORD, &other)),
        }
    }

    /// Canonical expression text for this dependency.
    ///
    /// # Errors
    ///
    /// Returns a `ComposeError` if a key has no readable text form.
    pub fn to_specification(&self) -> Result<String, ComposeError> {
        compose_only_one(&self.property_keys)
    }
}

impl PropertySet for OnlyOneDependency {
    fn property_keys(&self) -> &[String] {
        &self.property_keys
    }
}

/// A named, ordered set of properties rendered together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyGroup {
    name: String,
    property_keys: Vec<String>,
}

impl PropertyGroup {
    pub fn new<S: Into<String>>(
        name: impl Into<String>,
        keys: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            name: name.into(),
            property_keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// A group of one, named by the property's title or else its key.
    pub fn singleton(property: &PropertySchema) -> Self {
        let name = property.title.as_deref().unwrap_or(&property.key);
        Self::new(name, [property.key.as_str()])
    }

    /// Parse one group expression against a schema.
    ///
    /// This only validates the expression itself; conflicts with other groups
    /// are resolved during assembly.
    ///
    /// # Errors
    ///
    /// Returns the reason the expression has to be dropped: bad syntax, a
    /// different expression kind, or a missing property.
    pub fn parse(
        name: &str,
        specification: &str,
        schema: &SchemaView<'_>,
    ) -> Result<Self, RejectReason> {
        match grammar::parse(specification)? {
            Expression::Group(keys) => {
                check_arity(GROUP_KEYWORD, GROUP_MIN_KEYS, keys.len())?;
                require_keys(schema, keys.iter().copied())?;
                Ok(Self::new(name, keys))
            }
            other => Err(wrong_kind(GROUP_KEYWORD, &other)),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical expression text for this group (the name is not part of it).
    ///
    /// # Errors
    ///
    /// Returns a `ComposeError` if a key has no readable text form.
    pub fn to_specification(&self) -> Result<String, ComposeError> {
        compose_group(&self.property_keys)
    }
}

impl PropertySet for PropertyGroup {
    fn property_keys(&self) -> &[String] {
        &self.property_keys
    }
}

/// All valid "requires" dependencies of a schema, in declaration order.
pub fn extract_requires(schema: &SchemaView<'_>) -> Vec<RequiresDependency> {
    collect_valid(schema, ExpressionKind::Requires, |spec| {
        RequiresDependency::parse(spec, schema)
    })
}

/// All valid "only one" dependencies of a schema, in declaration order.
pub fn extract_only_one(schema: &SchemaView<'_>) -> Vec<OnlyOneDependency> {
    collect_valid(schema, ExpressionKind::OnlyOne, |spec| {
        OnlyOneDependency::parse(spec, schema)
    })
}

/// Keep only the sets whose every member is declared with `declared_type`.
///
/// A set with any member of another type, an untyped member, or a member
/// missing from the schema is left out entirely.
pub fn filter_by_type<'g, G: PropertySet>(
    schema: &SchemaView<'_>,
    groups: &'g [G],
    declared_type: DeclaredType,
) -> Vec<&'g G> {
    groups
        .iter()
        .filter(|group| members_of_type(schema, *group, declared_type).is_some())
        .collect()
}

/// Like [`filter_by_type`], but yields each surviving set's property schemas.
pub fn type_filtered_properties<'s, G: PropertySet>(
    schema: &'s SchemaView<'_>,
    groups: &[G],
    declared_type: DeclaredType,
) -> Vec<Vec<&'s PropertySchema>> {
    groups
        .iter()
        .filter_map(|group| members_of_type(schema, group, declared_type))
        .collect()
}

fn members_of_type<'s, G: PropertySet>(
    schema: &'s SchemaView<'_>,
    group: &G,
    declared_type: DeclaredType,
) -> Option<Vec<&'s PropertySchema>> {
    group
        .property_keys()
        .iter()
        .map(|key| {
            schema
                .property(key)
                .filter(|prop| prop.declared_type == Some(declared_type))
        })
        .collect()
}

/// Run `parse` over every expression of one kind, keeping the successes.
fn collect_valid<T>(
    schema: &SchemaView<'_>,
    kind: ExpressionKind,
    parse: impl Fn(&str) -> Result<T, RejectReason>,
) -> Vec<T> {
    dependency_specifications(schema)
        .into_iter()
        .filter(|spec| ExpressionKind::classify(spec) == Some(kind))
        .filter_map(|spec| match parse(spec) {
            Ok(dependency) => {
                trace!(specification = spec, "accepted dependency");
                Some(dependency)
            }
            Err(reason) => {
                debug!(specification = spec, %reason, "dropped dependency");
                None
            }
        })
        .collect()
}

fn check_arity(keyword: &'static str, min: usize, actual: usize) -> Result<(), RejectReason> {
    if actual < min {
        return Err(RejectReason::TooFewProperties {
            keyword,
            min,
            actual,
        });
    }
    Ok(())
}

fn wrong_kind(expected: &'static str, found: &Expression<'_>) -> RejectReason {
    RejectReason::WrongKind {
        expected,
        found: found.kind().keyword(),
    }
}
