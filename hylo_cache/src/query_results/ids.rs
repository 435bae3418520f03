// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Deserializer};

/// Identifier of an entity as sent by the API.
pub type EntityId = String;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

/// Accepts ids sent as strings as well as plain numbers.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<EntityId, D::Error>
where
    D: Deserializer<'de>,
{
    match RawId::deserialize(deserializer)? {
        RawId::Text(id) => Ok(id),
        RawId::Number(id) => Ok(id.to_string()),
    }
}
