// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::cache::{field_key, CacheHandle, PageRecord};
use crate::config::PaginationConfig;
use crate::errors::ConfigError;
use crate::pagination::args::compare_args;
use crate::pagination::{PaginatedSet, ResolveInfo, Resolver};
use crate::value::Arguments;

/// Direction in which newly arriving pages are merged into the accumulated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Pages are merged forwards, later pages are put behind earlier ones.
    #[default]
    After,

    /// Pages are merged in reverse, later pages are put in front of earlier ones.
    Before,
}

impl FromStr for MergeMode {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "after" => Ok(MergeMode::After),
            "before" => Ok(MergeMode::Before),
            _ => Err(ConfigError::UnknownMergeMode(value.to_string())),
        }
    }
}

impl fmt::Display for MergeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeMode::After => write!(f, "after"),
            MergeMode::Before => write!(f, "before"),
        }
    }
}

/// Resolver merging offset based pages of a field into one list.
///
/// Two reads belong to the same list when all their arguments apart from offset and limit are
/// equal. All cached pages of that list are merged in cache order, every entity reference is kept
/// only at its first occurrence.
#[derive(Debug, Clone)]
pub struct OffsetPagination {
    offset_argument: String,
    limit_argument: String,
    merge_mode: MergeMode,
}

impl OffsetPagination {
    /// Returns a resolver for the given configuration.
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            offset_argument: config.offset_argument.clone(),
            limit_argument: config.limit_argument.clone(),
            merge_mode: config.merge_mode,
        }
    }

    /// Returns the same resolver merging into the given direction.
    pub fn with_merge_mode(mut self, merge_mode: MergeMode) -> Self {
        self.merge_mode = merge_mode;
        self
    }

    fn ignored_args(&self) -> [&str; 2] {
        [&self.offset_argument, &self.limit_argument]
    }

    /// Returns true if a page at `offset` goes behind the results accumulated so far.
    fn appends(&self, previous_offset: Option<f64>, offset: f64) -> bool {
        // A previous offset of zero counts as "no previous page"
        let is_forward = match previous_offset {
            None => true,
            Some(previous) => previous == 0.0 || offset > previous,
        };

        is_forward == (self.merge_mode == MergeMode::After)
    }
}

impl Default for OffsetPagination {
    fn default() -> Self {
        Self::new(&PaginationConfig::default())
    }
}

impl Resolver for OffsetPagination {
    fn resolve(
        &self,
        field_args: &Arguments,
        cache: &dyn CacheHandle,
        info: &mut ResolveInfo,
    ) -> Option<PaginatedSet> {
        let field_infos: Vec<_> = cache
            .inspect_fields(&info.parent_key)
            .into_iter()
            .filter(|field_info| field_info.field_name == info.field_name)
            .collect();

        if field_infos.is_empty() {
            debug!(
                "No cached pages for {}.{}, fall back to regular lookup",
                info.parent_key, info.field_name
            );
            return None;
        }

        let ignored = self.ignored_args();
        let mut visited = HashSet::new();
        let mut items = Vec::new();
        let mut previous_offset: Option<f64> = None;

        for field_info in field_infos {
            let page_args = match &field_info.arguments {
                Some(page_args) if compare_args(field_args, page_args, &ignored) => page_args,
                _ => continue,
            };

            let page_items = cache
                .resolve_link(&info.parent_key, &field_info.field_key)
                .and_then(|page_key| cache.resolve_links(page_key, "items"))
                .unwrap_or_default();

            let offset = match page_args
                .get(&self.offset_argument)
                .and_then(|value| value.as_f64())
            {
                Some(offset) if !page_items.is_empty() => offset,
                _ => {
                    trace!("Skip page {}", field_info.field_key);
                    continue;
                }
            };

            let new_items: Vec<_> = page_items
                .iter()
                .filter(|item| visited.insert(item.as_str()))
                .cloned()
                .collect();

            if self.appends(previous_offset, offset) {
                items.extend(new_items);
            } else {
                items.splice(0..0, new_items);
            }

            previous_offset = Some(offset);
        }

        let current_key = field_key(&info.field_name, Some(field_args));
        let current_page = cache.resolve_link(&info.parent_key, &current_key);

        if current_page.is_none() {
            if !info.schema_aware {
                debug!(
                    "Current page of {}.{} is not cached, fall back to regular lookup",
                    info.parent_key, info.field_name
                );
                return None;
            }

            info.partial = true;
        }

        let page = current_page
            .map(|page_key| PageRecord::read(cache, page_key))
            .unwrap_or_default();

        Some(PaginatedSet {
            typename: page.typename,
            items,
            total: page.total,
            has_more: page.has_more,
        })
    }
}
