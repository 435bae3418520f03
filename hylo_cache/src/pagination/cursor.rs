// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashSet;

use log::debug;

use crate::cache::{field_key, CacheHandle, FieldInfo, PageRecord};
use crate::pagination::args::{strip_args, PAGINATION_ARGS};
use crate::pagination::{PaginatedSet, ResolveInfo, Resolver};
use crate::value::Arguments;

/// Resolver for forward-only feeds like comments or message threads.
///
/// By default every cached page of the field is concatenated in cache order, regardless of its
/// arguments. [`CursorPagination::by_shape`] only merges pages read with the same
/// non-pagination arguments as the current read.
#[derive(Debug, Clone, Default)]
pub struct CursorPagination {
    by_shape: bool,
    typename: Option<String>,
}

impl CursorPagination {
    /// Returns a resolver concatenating all cached pages of a field.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a resolver concatenating the cached pages of the current query only.
    ///
    /// Pages are de-duplicated and the resolver declines when the current page itself is not
    /// cached yet.
    pub fn by_shape() -> Self {
        Self {
            by_shape: true,
            typename: None,
        }
    }

    /// Reports this typename on merged results instead of the one found in the cache.
    pub fn with_typename(mut self, typename: &str) -> Self {
        self.typename = Some(typename.to_string());
        self
    }

    fn concat_all(&self, pages: Vec<PageRecord>) -> PaginatedSet {
        let mut result = PaginatedSet::default();

        for page in pages {
            if let Some(items) = page.items {
                result.items.extend(items);
            }

            // Keep the last value seen which was set
            result.typename = page.typename.or(result.typename);
            result.has_more = page.has_more.or(result.has_more);
            result.total = page.total.or(result.total);
        }

        if self.typename.is_some() {
            result.typename = self.typename.clone();
        }

        result
    }

    fn concat_shape(&self, pages: Vec<PageRecord>) -> PaginatedSet {
        let mut result = PaginatedSet {
            typename: None,
            items: Vec::new(),
            total: Some(0),
            has_more: Some(false),
        };

        for page in pages {
            let items = match page.items {
                Some(items) => items,
                None => continue,
            };

            // Details always come from the last page holding items, even if unset there
            result.items.extend(items);
            result.has_more = page.has_more;
            result.total = page.total;
            result.typename = page.typename;
        }

        let mut visited = HashSet::new();
        result.items.retain(|item| visited.insert(item.clone()));

        if self.typename.is_some() {
            result.typename = self.typename.clone();
        }

        result
    }
}

impl Resolver for CursorPagination {
    fn resolve(
        &self,
        field_args: &Arguments,
        cache: &dyn CacheHandle,
        info: &mut ResolveInfo,
    ) -> Option<PaginatedSet> {
        let current_key = field_key(&info.field_name, Some(field_args));
        if self.by_shape && cache.resolve_link(&info.parent_key, &current_key).is_none() {
            debug!(
                "Current page of {}.{} is not cached, fetch it first",
                info.parent_key, info.field_name
            );
            return None;
        }

        let shape = strip_args(field_args, &PAGINATION_ARGS);
        let matches_shape = |field_info: &FieldInfo| {
            let page_args = field_info.arguments.clone().unwrap_or_default();
            strip_args(&page_args, &PAGINATION_ARGS) == shape
        };

        let pages: Vec<PageRecord> = cache
            .inspect_fields(&info.parent_key)
            .iter()
            .filter(|field_info| field_info.field_name == info.field_name)
            .filter(|field_info| !self.by_shape || matches_shape(field_info))
            .filter_map(|field_info| cache.resolve_link(&info.parent_key, &field_info.field_key))
            .map(|page_key| PageRecord::read(cache, page_key))
            .collect();

        if pages.is_empty() {
            debug!(
                "No cached pages for {}.{}, fall back to regular lookup",
                info.parent_key, info.field_name
            );
            return None;
        }

        if self.by_shape {
            Some(self.concat_shape(pages))
        } else {
            Some(self.concat_all(pages))
        }
    }
}
