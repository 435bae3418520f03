// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::cache::key::field_key;
use crate::errors::CacheError;
use crate::value::{ArgumentValue, Arguments};

/// Key of an entity in the normalized cache, for example `Post:42`.
pub type EntityKey = String;

/// Value stored for a field of a cached entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CacheValue {
    /// Plain value like a count or a flag.
    Scalar(ArgumentValue),

    /// Reference to another entity, or none.
    Link(Option<EntityKey>),

    /// Ordered references to other entities.
    Links(Vec<EntityKey>),
}

/// Description of one cached field read of an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldInfo {
    /// Key the field read is stored under.
    pub field_key: String,

    /// Name of the field without arguments.
    pub field_name: String,

    /// Arguments of the read, `None` when the field was read without any.
    pub arguments: Option<Arguments>,
}

/// Read access to a normalized cache.
pub trait CacheHandle {
    /// Returns the value stored under a field key of an entity.
    fn resolve(&self, entity_key: &str, field_key: &str) -> Option<&CacheValue>;

    /// Returns all cached field reads of an entity in the order they were first written.
    fn inspect_fields(&self, entity_key: &str) -> Vec<FieldInfo>;

    /// Returns the value stored for a field read with the given arguments.
    fn resolve_field(
        &self,
        entity_key: &str,
        field_name: &str,
        args: Option<&Arguments>,
    ) -> Option<&CacheValue> {
        self.resolve(entity_key, &field_key(field_name, args))
    }

    /// Returns the entity a field links to.
    fn resolve_link(&self, entity_key: &str, field_key: &str) -> Option<&str> {
        match self.resolve(entity_key, field_key) {
            Some(CacheValue::Link(Some(link))) => Some(link),
            _ => None,
        }
    }

    /// Returns the list of entities a field links to.
    fn resolve_links(&self, entity_key: &str, field_key: &str) -> Option<&[EntityKey]> {
        match self.resolve(entity_key, field_key) {
            Some(CacheValue::Links(links)) => Some(links),
            _ => None,
        }
    }

    /// Returns the plain value of a field, `None` for links or missing and null fields.
    fn resolve_scalar(&self, entity_key: &str, field_key: &str) -> Option<&ArgumentValue> {
        match self.resolve(entity_key, field_key) {
            Some(CacheValue::Scalar(value)) if !value.is_null() => Some(value),
            _ => None,
        }
    }
}

/// Write access to a normalized cache, used by updaters reacting to mutation results.
pub trait CacheWriter: CacheHandle {
    /// Replaces the list of entities a field of an existing entity links to.
    fn link(
        &mut self,
        entity_key: &str,
        field_key: &str,
        links: Vec<EntityKey>,
    ) -> Result<(), CacheError>;
}
