//! Group assembly - partitions a schema's properties into ordered groups.
//!
//! Group expressions are registered in declaration order and the first group
//! to claim a property keeps it. A later group touching any claimed property
//! is rejected as a whole. The partition itself follows the schema's property
//! order, emitting each group where its first member appears.

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use crate::dependency::{PropertyGroup, PropertySet};
use crate::error::RejectReason;
use crate::extract::group_specifications;
use crate::schema::SchemaView;

/// A named group expression awaiting validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRequest {
    pub name: String,
    /// `None` when the extension value was not a string.
    pub specification: Option<String>,
}

impl GroupRequest {
    pub fn new(name: impl Into<String>, specification: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            specification: Some(specification.into()),
        }
    }
}

/// Groups that have successfully claimed their properties.
#[derive(Debug, Default)]
struct GroupClaims {
    groups: Vec<PropertyGroup>,
    owners: HashMap<String, usize>,
}

impl GroupClaims {
    /// Register a group if none of its keys is taken, itself included.
    fn claim(&mut self, group: PropertyGroup) -> Result<&PropertyGroup, RejectReason> {
        {
            let mut seen = HashSet::new();
            for key in group.property_keys() {
                if self.owners.contains_key(key) || !seen.insert(key.as_str()) {
                    return Err(RejectReason::AlreadyGrouped { key: key.clone() });
                }
            }
        }

        let index = self.groups.len();
        for key in group.property_keys() {
            self.owners.insert(key.clone(), index);
        }
        self.groups.push(group);
        Ok(&self.groups[index])
    }

    fn owner(&self, key: &str) -> Option<&PropertyGroup> {
        self.owners.get(key).map(|&i| &self.groups[i])
    }
}

/// The schema's property partition built from its `x-property-groups` extension.
///
/// With `include_singletons`, every property outside an explicit group gets a
/// group of its own; otherwise such properties are left out.
pub fn extract_groups(schema: &SchemaView<'_>, include_singletons: bool) -> Vec<PropertyGroup> {
    let requests = group_specifications(schema)
        .into_iter()
        .map(|(name, spec)| GroupRequest::new(name, spec));
    assemble_groups(schema, requests, include_singletons)
}

/// Build the property partition from caller-supplied group requests.
pub fn assemble_groups(
    schema: &SchemaView<'_>,
    requests: impl IntoIterator<Item = GroupRequest>,
    include_singletons: bool,
) -> Vec<PropertyGroup> {
    let mut claims = GroupClaims::default();
    for (request, outcome) in register(schema, requests, &mut claims) {
        match outcome {
            Ok(_) => trace!(group = %request.name, "registered property group"),
            Err(reason) => debug!(group = %request.name, %reason, "dropped property group"),
        }
    }

    let mut assigned: HashSet<&str> = HashSet::new();
    let mut partition = Vec::new();

    for property in schema.properties() {
        if assigned.contains(property.key.as_str()) {
            continue;
        }

        match claims.owner(&property.key) {
            Some(group) => {
                // Members later in schema order are consumed here too.
                assigned.extend(group.property_keys().iter().map(String::as_str));
                partition.push(group.clone());
            }
            None => {
                if include_singletons {
                    partition.push(PropertyGroup::singleton(property));
                }
                assigned.insert(property.key.as_str());
            }
        }
    }

    partition
}

/// Validate group requests in order, reporting each outcome.
///
/// An `Ok` group is one that [`assemble_groups`] would use.
pub fn check_group_requests(
    schema: &SchemaView<'_>,
    requests: impl IntoIterator<Item = GroupRequest>,
) -> Vec<(GroupRequest, Result<PropertyGroup, RejectReason>)> {
    register(schema, requests, &mut GroupClaims::default())
}

fn register(
    schema: &SchemaView<'_>,
    requests: impl IntoIterator<Item = GroupRequest>,
    claims: &mut GroupClaims,
) -> Vec<(GroupRequest, Result<PropertyGroup, RejectReason>)> {
    requests
        .into_iter()
        .map(|request| {
            let outcome = match request.specification.as_deref() {
                Some(spec) => PropertyGroup::parse(&request.name, spec, schema)
                    .and_then(|group| claims.claim(group).cloned()),
                None => Err(RejectReason::NotAString),
            };
            (request, outcome)
        })
        .collect()
}
