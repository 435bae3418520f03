// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::{MemoryCache, PageRecord};
use crate::errors::CacheError;
use crate::value::Arguments;

/// One cached page of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotPage {
    /// Key of the entity the paginated field belongs to, for example `Group:1` or `Query`.
    pub parent: String,

    /// Name of the paginated field.
    pub field: String,

    /// Arguments of the read which returned this page.
    #[serde(default)]
    pub arguments: Option<Arguments>,

    /// The page itself.
    #[serde(flatten)]
    pub page: PageRecord,
}

/// Serializable list of cached pages, written into a [`MemoryCache`] in order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheSnapshot {
    /// Pages in the order they arrived.
    pub pages: Vec<SnapshotPage>,
}

impl CacheSnapshot {
    /// Decodes a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self, CacheError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and decodes a snapshot file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Could not read snapshot file '{}'", path.display()))?;
        let snapshot = Self::from_json(&json)?;
        Ok(snapshot)
    }

    /// Writes all pages into a new cache.
    pub fn to_cache(&self) -> MemoryCache {
        let mut cache = MemoryCache::new();
        for page in &self.pages {
            cache.write_page(&page.parent, &page.field, page.arguments.as_ref(), &page.page);
        }
        cache
    }
}

#[cfg(test)]
mod tests {
    use crate::cache::{CacheHandle, PageRecord};

    use super::CacheSnapshot;

    #[test]
    fn load_snapshot_into_cache() {
        let snapshot = CacheSnapshot::from_json(
            r#"{
                "pages": [
                    {
                        "parent": "Group:1",
                        "field": "posts",
                        "arguments": { "offset": 0, "limit": 2, "sortBy": "created" },
                        "__typename": "PostQuerySet",
                        "items": ["Post:1", "Post:2"],
                        "total": 3,
                        "hasMore": true
                    },
                    {
                        "parent": "Group:1",
                        "field": "posts",
                        "arguments": { "offset": 2, "limit": 2, "sortBy": "created" },
                        "items": ["Post:3"]
                    }
                ]
            }"#,
        )
        .unwrap();

        let cache = snapshot.to_cache();
        let fields = cache.inspect_fields("Group:1");
        assert_eq!(fields.len(), 2);

        let page_key = cache.resolve_link("Group:1", &fields[0].field_key).unwrap();
        assert_eq!(
            PageRecord::read(&cache, page_key),
            PageRecord {
                typename: Some("PostQuerySet".into()),
                total: Some(3),
                has_more: Some(true),
                ..PageRecord::new(&["Post:1", "Post:2"])
            }
        );
    }

    #[test]
    fn invalid_snapshot() {
        assert!(CacheSnapshot::from_json(r#"{ "pages": [{ "field": "posts" }] }"#)
            .expect_err("Expect error")
            .to_string()
            .starts_with("Invalid cache snapshot"));
    }
}
