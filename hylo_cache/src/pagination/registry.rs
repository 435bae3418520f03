// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::HashMap;

use log::trace;

use crate::cache::CacheHandle;
use crate::config::{Configuration, ResolverKind};
use crate::errors::ConfigError;
use crate::pagination::{CursorPagination, OffsetPagination, PaginatedSet, ResolveInfo, Resolver};
use crate::value::Arguments;

/// Resolvers registered per entity typename and field name.
#[derive(Debug, Default)]
pub struct ResolverMap {
    resolvers: HashMap<String, HashMap<String, Box<dyn Resolver>>>,
}

impl ResolverMap {
    /// Returns an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the resolvers listed in the configuration.
    pub fn from_config(config: &Configuration) -> Result<Self, ConfigError> {
        let mut map = Self::new();

        for entry in &config.resolvers {
            if map.get(&entry.entity, &entry.field).is_some() {
                return Err(ConfigError::DuplicateResolver(
                    entry.entity.clone(),
                    entry.field.clone(),
                ));
            }

            let resolver: Box<dyn Resolver> = match entry.kind {
                ResolverKind::Offset => {
                    let merge_mode = entry.merge_mode.unwrap_or(config.pagination.merge_mode);
                    Box::new(OffsetPagination::new(&config.pagination).with_merge_mode(merge_mode))
                }
                ResolverKind::Cursor => Box::new(CursorPagination::new()),
                ResolverKind::CursorByShape => {
                    let resolver = CursorPagination::by_shape();
                    match &entry.typename {
                        Some(typename) => Box::new(resolver.with_typename(typename)),
                        None => Box::new(resolver),
                    }
                }
            };

            map.resolvers
                .entry(entry.entity.clone())
                .or_default()
                .insert(entry.field.clone(), resolver);
        }

        Ok(map)
    }

    /// Registers a resolver for a field, replacing any earlier one.
    pub fn insert<R: Resolver + 'static>(&mut self, typename: &str, field_name: &str, resolver: R) {
        self.resolvers
            .entry(typename.to_string())
            .or_default()
            .insert(field_name.to_string(), Box::new(resolver));
    }

    /// Returns the resolver registered for a field.
    pub fn get(&self, typename: &str, field_name: &str) -> Option<&dyn Resolver> {
        self.resolvers
            .get(typename)
            .and_then(|fields| fields.get(field_name))
            .map(|resolver| resolver.as_ref())
    }

    /// Runs the resolver registered for the field read, declining when there is none.
    pub fn resolve(
        &self,
        field_args: &Arguments,
        cache: &dyn CacheHandle,
        info: &mut ResolveInfo,
    ) -> Option<PaginatedSet> {
        match self.get(&info.parent_typename, &info.field_name) {
            Some(resolver) => resolver.resolve(field_args, cache, info),
            None => {
                trace!(
                    "No resolver registered for {}.{}",
                    info.parent_typename,
                    info.field_name
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Configuration, ResolverEntry, ResolverKind};
    use crate::pagination::{MergeMode, OffsetPagination, ResolveInfo};
    use crate::test_utils::{stream_args, stream_cache};

    use super::ResolverMap;

    fn entry(entity: &str, field: &str, kind: ResolverKind) -> ResolverEntry {
        ResolverEntry {
            entity: entity.into(),
            field: field.into(),
            kind,
            merge_mode: None,
            typename: None,
        }
    }

    #[test]
    fn resolve_registered_fields() {
        let mut map = ResolverMap::new();
        map.insert("Group", "posts", OffsetPagination::default());

        let cache = stream_cache(&[(0, &["a", "b"][..]), (2, &["c"][..])]);
        let mut info = ResolveInfo::new("Group:1", "posts");
        let result = map.resolve(&stream_args(2), &cache, &mut info).unwrap();
        assert_eq!(result.items, vec!["a", "b", "c"]);

        // Same field on another type has no resolver
        let mut info = ResolveInfo::new("Person:1", "posts");
        assert_eq!(map.resolve(&stream_args(2), &cache, &mut info), None);
    }

    #[test]
    fn build_from_config() {
        let config = Configuration {
            resolvers: vec![
                ResolverEntry {
                    merge_mode: Some(MergeMode::Before),
                    ..entry("Group", "posts", ResolverKind::Offset)
                },
                entry("Post", "comments", ResolverKind::CursorByShape),
                entry("Query", "threads", ResolverKind::Cursor),
            ],
            ..Configuration::default()
        };

        let map = ResolverMap::from_config(&config).unwrap();
        assert!(map.get("Group", "posts").is_some());
        assert!(map.get("Post", "comments").is_some());
        assert!(map.get("Query", "threads").is_some());
        assert!(map.get("Query", "posts").is_none());
    }

    #[test]
    fn duplicate_resolvers() {
        let config = Configuration {
            resolvers: vec![
                entry("Group", "posts", ResolverKind::Offset),
                entry("Group", "posts", ResolverKind::Cursor),
            ],
            ..Configuration::default()
        };

        assert_eq!(
            ResolverMap::from_config(&config)
                .expect_err("Expect error")
                .to_string(),
            "Resolver for field 'posts' on 'Group' was configured more than once"
        );
    }
}
