// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::cache::{typename_of, CacheHandle, EntityKey};
use crate::value::Arguments;

/// Describes the field read a resolver is invoked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveInfo {
    /// Key of the entity the field is read on, for example `Group:1`.
    pub parent_key: EntityKey,

    /// Typename of that entity, used to look up registered resolvers.
    pub parent_typename: String,

    /// Name of the field being read, for example `posts`.
    pub field_name: String,

    /// Flag indicating if the cache knows the schema and can serve incomplete results.
    ///
    /// Resolvers may only return partial results for schema aware reads, otherwise they need to
    /// decline.
    pub schema_aware: bool,

    /// Set by a resolver when the returned result is incomplete and a fetch still needs to
    /// happen.
    pub partial: bool,
}

impl ResolveInfo {
    /// Returns a schema aware read descriptor for a field on the given entity.
    pub fn new(parent_key: &str, field_name: &str) -> Self {
        Self {
            parent_key: parent_key.to_string(),
            parent_typename: typename_of(parent_key).to_string(),
            field_name: field_name.to_string(),
            schema_aware: true,
            partial: false,
        }
    }
}

/// Synthetic value of a paginated field, merged from one or many cached pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedSet {
    /// Typename of the query set.
    #[serde(rename = "__typename")]
    pub typename: Option<String>,

    /// Merged references to entities.
    pub items: Vec<EntityKey>,

    /// Total number of entities matching the query.
    pub total: Option<u64>,

    /// Flag indicating if the server has more pages.
    pub has_more: Option<bool>,
}

/// Resolver overriding how a cached field is read.
pub trait Resolver: Debug {
    /// Resolves the field read described by `info` with the given arguments.
    ///
    /// Returns `None` to decline, letting the cache perform a regular lookup instead.
    fn resolve(
        &self,
        field_args: &Arguments,
        cache: &dyn CacheHandle,
        info: &mut ResolveInfo,
    ) -> Option<PaginatedSet>;
}
