// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::cache::{CacheHandle, EntityKey};

pub(crate) const TYPENAME_FIELD: &str = "__typename";

pub(crate) const ITEMS_FIELD: &str = "items";

pub(crate) const TOTAL_FIELD: &str = "total";

pub(crate) const HAS_MORE_FIELD: &str = "hasMore";

/// One cached response to a paginated read, a "query set" in Hylo's API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Typename of the query set, for example `PostQuerySet`.
    #[serde(rename = "__typename", default)]
    pub typename: Option<String>,

    /// References to the entities on this page, in server order.
    ///
    /// `None` when the page entity has no `items` field cached.
    #[serde(default)]
    pub items: Option<Vec<EntityKey>>,

    /// Total number of entities matching the query across all pages.
    #[serde(default)]
    pub total: Option<u64>,

    /// Flag indicating if the server has more pages after this one.
    #[serde(default)]
    pub has_more: Option<bool>,
}

impl PageRecord {
    /// Returns a page with the given items and no further details.
    pub fn new(items: &[&str]) -> Self {
        Self {
            items: Some(items.iter().map(|item| item.to_string()).collect()),
            ..Self::default()
        }
    }

    /// Reads a page stored as entity under the given key.
    pub fn read<C: CacheHandle + ?Sized>(cache: &C, page_key: &str) -> Self {
        Self {
            typename: cache
                .resolve_scalar(page_key, TYPENAME_FIELD)
                .and_then(|value| value.as_str())
                .map(str::to_string),
            items: cache.resolve_links(page_key, ITEMS_FIELD).map(<[_]>::to_vec),
            total: cache
                .resolve_scalar(page_key, TOTAL_FIELD)
                .and_then(|value| value.as_u64()),
            has_more: cache
                .resolve_scalar(page_key, HAS_MORE_FIELD)
                .and_then(|value| value.as_bool()),
        }
    }
}
