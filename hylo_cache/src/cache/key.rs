// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::value::Arguments;

/// Root entity every top-level query field hangs off.
pub const ROOT_QUERY: &str = "Query";

/// Returns the key of an entity, `Typename:id` or just `Typename` for root types.
pub fn entity_key(typename: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{}:{}", typename, id),
        None => typename.to_string(),
    }
}

/// Returns the typename part of an entity key.
pub fn typename_of(entity_key: &str) -> &str {
    // Embedded entities are keyed by their parent, e.g. "Group:1.posts({..})"
    let head = entity_key.split('.').next().unwrap_or(entity_key);
    head.split(':').next().unwrap_or(head)
}

/// Returns the key a field read is stored under.
///
/// Fields read without arguments are keyed by their name only, otherwise the canonical JSON of
/// the arguments is appended, for example `posts({"limit":10,"offset":0})`.
pub fn field_key(field_name: &str, args: Option<&Arguments>) -> String {
    match args {
        Some(args) if !args.is_empty() => {
            let args = serde_json::to_string(args).unwrap_or_else(|_| "{}".into());
            format!("{}({})", field_name, args)
        }
        _ => field_name.to_string(),
    }
}

/// Splits a field key back into field name and arguments.
pub(crate) fn parse_field_key(field_key: &str) -> (String, Option<Arguments>) {
    match field_key.split_once('(') {
        Some((name, rest)) => {
            let args = rest
                .strip_suffix(')')
                .and_then(|json| serde_json::from_str::<Arguments>(json).ok());
            (name.to_string(), args)
        }
        None => (field_key.to_string(), None),
    }
}
