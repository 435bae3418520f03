// SPDX-License-Identifier: AGPL-3.0-or-later

use indexmap::IndexMap;
use log::trace;

use crate::cache::key::{field_key, parse_field_key};
use crate::cache::page::{HAS_MORE_FIELD, ITEMS_FIELD, TOTAL_FIELD, TYPENAME_FIELD};
use crate::cache::{CacheHandle, CacheValue, CacheWriter, EntityKey, FieldInfo, PageRecord};
use crate::errors::CacheError;
use crate::value::{ArgumentValue, Arguments};

#[derive(Debug, Clone)]
struct StoredField {
    field_name: String,
    arguments: Option<Arguments>,
    value: CacheValue,
}

/// In-memory normalized cache.
///
/// Entities and their fields are kept in the order they were first written, which is the order
/// [`CacheHandle::inspect_fields`] reports them in.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entities: IndexMap<EntityKey, IndexMap<String, StoredField>>,
}

impl MemoryCache {
    /// Returns an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of cached entities, including embedded page entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if nothing was written to this cache yet.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns true if an entity with this key was written.
    pub fn contains_entity(&self, entity_key: &str) -> bool {
        self.entities.contains_key(entity_key)
    }

    /// Writes a field of an entity, creating the entity if needed. Returns the field key.
    ///
    /// Overwriting a field keeps its position.
    pub fn write(
        &mut self,
        entity_key: &str,
        field_name: &str,
        args: Option<&Arguments>,
        value: CacheValue,
    ) -> String {
        let key = field_key(field_name, args);

        self.entities.entry(entity_key.to_string()).or_default().insert(
            key.clone(),
            StoredField {
                field_name: field_name.to_string(),
                arguments: args.filter(|args| !args.is_empty()).cloned(),
                value,
            },
        );

        key
    }

    /// Stores a page as embedded entity of its parent and links the field read to it.
    ///
    /// The page entity is keyed by parent and field key, for example
    /// `Group:1.posts({"offset":0})`, and replaced as a whole when written again. Returns the
    /// key of the page entity.
    pub fn write_page(
        &mut self,
        parent_key: &str,
        field_name: &str,
        args: Option<&Arguments>,
        page: &PageRecord,
    ) -> EntityKey {
        let page_key = format!("{}.{}", parent_key, field_key(field_name, args));
        self.entities.insert(page_key.clone(), IndexMap::new());

        if let Some(typename) = &page.typename {
            self.write(
                &page_key,
                TYPENAME_FIELD,
                None,
                CacheValue::Scalar(typename.as_str().into()),
            );
        }

        if let Some(items) = &page.items {
            self.write(&page_key, ITEMS_FIELD, None, CacheValue::Links(items.clone()));
        }

        self.write(
            &page_key,
            TOTAL_FIELD,
            None,
            CacheValue::Scalar(page.total.into()),
        );
        self.write(
            &page_key,
            HAS_MORE_FIELD,
            None,
            CacheValue::Scalar(page.has_more.map_or(ArgumentValue::Null, Into::into)),
        );

        self.write(
            parent_key,
            field_name,
            args,
            CacheValue::Link(Some(page_key.clone())),
        );

        trace!("Wrote page {}", page_key);

        page_key
    }
}

impl CacheHandle for MemoryCache {
    fn resolve(&self, entity_key: &str, field_key: &str) -> Option<&CacheValue> {
        self.entities
            .get(entity_key)
            .and_then(|fields| fields.get(field_key))
            .map(|field| &field.value)
    }

    fn inspect_fields(&self, entity_key: &str) -> Vec<FieldInfo> {
        self.entities
            .get(entity_key)
            .map(|fields| {
                fields
                    .iter()
                    .map(|(key, field)| FieldInfo {
                        field_key: key.clone(),
                        field_name: field.field_name.clone(),
                        arguments: field.arguments.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl CacheWriter for MemoryCache {
    fn link(
        &mut self,
        entity_key: &str,
        field_key: &str,
        links: Vec<EntityKey>,
    ) -> Result<(), CacheError> {
        let fields = self.entities.get_mut(entity_key).ok_or_else(|| {
            CacheError::UnknownEntity(entity_key.to_string(), field_key.to_string())
        })?;

        match fields.get_mut(field_key) {
            Some(field) => field.value = CacheValue::Links(links),
            None => {
                let (field_name, arguments) = parse_field_key(field_key);
                fields.insert(
                    field_key.to_string(),
                    StoredField {
                        field_name,
                        arguments,
                        value: CacheValue::Links(links),
                    },
                );
            }
        }

        Ok(())
    }
}
