// SPDX-License-Identifier: AGPL-3.0-or-later

use log::{debug, trace};

use crate::cache::{entity_key, CacheWriter, EntityKey, ROOT_QUERY};
use crate::errors::CacheError;
use crate::pagination::args::{strip_args, PAGINATION_ARGS};
use crate::value::{ArgumentValue, Arguments};

/// Sort order of a paginated set, read from its `order` argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Newest first, new entities go in front of the first page.
    Descending,

    /// Oldest first, new entities go behind the last page.
    Ascending,
}

impl SortOrder {
    fn from_args(args: Option<&Arguments>) -> Self {
        // Unset or empty orders mean descending, any other value but "desc" ascending
        match args.and_then(|args| args.get("order")) {
            Some(order) if is_set(order) && order.as_str() != Some("desc") => SortOrder::Ascending,
            _ => SortOrder::Descending,
        }
    }
}

fn is_set(value: &ArgumentValue) -> bool {
    match value {
        ArgumentValue::Null => false,
        ArgumentValue::Boolean(value) => *value,
        ArgumentValue::Integer(value) => *value != 0,
        ArgumentValue::Float(value) => *value != 0.0 && !value.is_nan(),
        ArgumentValue::String(value) => !value.is_empty(),
        ArgumentValue::List(_) | ArgumentValue::Object(_) => true,
    }
}

/// Updater adding a newly created entity, like a message or comment, to the cached pages of a
/// paginated field.
///
/// Cached reads of the field are grouped by their non-pagination arguments. In every group the
/// entity is put in front of the first page for descending sets, or behind the last page for
/// ascending ones. When nothing is cached for the field the cache is left alone.
#[derive(Debug, Clone)]
pub struct AppendToPaginatedSet {
    parent_type: String,
    field_name: String,
}

struct PageGroup {
    shape: Arguments,
    order: SortOrder,
    field_keys: Vec<String>,
}

impl AppendToPaginatedSet {
    /// Returns an updater for a field on the given parent type.
    pub fn new(parent_type: &str, field_name: &str) -> Self {
        Self {
            parent_type: parent_type.to_string(),
            field_name: field_name.to_string(),
        }
    }

    /// Returns an updater for a top-level query field.
    pub fn on_query(field_name: &str) -> Self {
        Self::new(ROOT_QUERY, field_name)
    }

    /// Adds the entity to every paginated set of the field on the given parent.
    ///
    /// The parent id may be omitted for root types. Returns true if any page was changed.
    pub fn apply<C: CacheWriter + ?Sized>(
        &self,
        cache: &mut C,
        parent_id: Option<&str>,
        new_item: &str,
    ) -> Result<bool, CacheError> {
        let parent_key = entity_key(&self.parent_type, parent_id);

        let mut groups: Vec<PageGroup> = Vec::new();
        for field_info in cache.inspect_fields(&parent_key) {
            if field_info.field_name != self.field_name {
                continue;
            }

            let shape = strip_args(
                &field_info.arguments.clone().unwrap_or_default(),
                &PAGINATION_ARGS,
            );

            match groups.iter_mut().find(|group| group.shape == shape) {
                Some(group) => group.field_keys.push(field_info.field_key),
                None => groups.push(PageGroup {
                    shape,
                    order: SortOrder::from_args(field_info.arguments.as_ref()),
                    field_keys: vec![field_info.field_key],
                }),
            }
        }

        if groups.is_empty() {
            debug!(
                "No paginated sets cached for {}.{}",
                parent_key, self.field_name
            );
            return Ok(false);
        }

        let mut changed = false;
        for group in groups {
            let target = match group.order {
                SortOrder::Descending => group.field_keys.first(),
                SortOrder::Ascending => group.field_keys.last(),
            };

            let page_key: EntityKey = match target
                .and_then(|field_key| cache.resolve_link(&parent_key, field_key))
            {
                Some(page_key) => page_key.to_string(),
                None => continue,
            };

            let mut items = cache
                .resolve_links(&page_key, "items")
                .map(<[_]>::to_vec)
                .unwrap_or_default();

            if items.iter().any(|item| item == new_item) {
                trace!("{} is already part of {}", new_item, page_key);
                continue;
            }

            match group.order {
                SortOrder::Descending => items.insert(0, new_item.to_string()),
                SortOrder::Ascending => items.push(new_item.to_string()),
            }

            cache.link(&page_key, "items", items)?;
            changed = true;
        }

        Ok(changed)
    }
}
