// SPDX-License-Identifier: AGPL-3.0-or-later

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Arguments;

/// Query parameters which make two list queries distinct, in key order.
///
/// Anything else passed along (offsets, component props, ..) never ends up in a key.
pub const QUERY_PARAM_WHITELIST: [&str; 29] = [
    "autocomplete",
    "activePostsOnly",
    "announcementsOnly",
    "id",
    "commentId",
    "context",
    "childPostInclusion",
    "collectionToFilterOut",
    "createdBy",
    "farmQuery",
    "filter",
    "forCollection",
    "groupSlug",
    "groupSlugs",
    "groupType",
    "interactedWithBy",
    "isPublic",
    "mentionsOf",
    "order",
    "page",
    "parentSlugs",
    "postId",
    "search",
    "slug",
    "sortBy",
    "topic",
    "type",
    "types",
    "nearCoord",
];

/// Key of one list query in the query results store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    /// Returns the key as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds the key of a list query from its action type and parameters.
///
/// Parameters are filtered down to [`QUERY_PARAM_WHITELIST`], null values are dropped and the
/// rest is serialized in whitelist order, so equivalent queries always end up under the same key,
/// for example `{"type":"FETCH_POSTS","params":{"context":"groups","slug":"farmers"}}`.
pub fn build_key(action_type: &str, params: &Arguments) -> QueryKey {
    let params = QUERY_PARAM_WHITELIST
        .iter()
        .filter_map(|name| {
            params
                .get(*name)
                .filter(|value| !value.is_null())
                .map(|value| format!("{}:{}", json_string(name), value.to_canonical_json()))
        })
        .collect::<Vec<String>>()
        .join(",");

    QueryKey(format!(
        r#"{{"type":{},"params":{{{}}}}}"#,
        json_string(action_type),
        params
    ))
}

fn json_string(value: &str) -> String {
    // Serializing a string slice can't fail
    serde_json::to_string(value).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::test_utils::args;
    use crate::value::Arguments;

    use super::build_key;

    #[test]
    fn serialize_in_whitelist_order() {
        let key = build_key(
            "FETCH_POSTS",
            &args(&[
                ("slug", "farmers".into()),
                ("sortBy", "created".into()),
                ("context", "groups".into()),
                ("groupSlugs", json!(["farmers"]).into()),
            ]),
        );

        assert_eq!(
            key.as_str(),
            r#"{"type":"FETCH_POSTS","params":{"context":"groups","groupSlugs":["farmers"],"slug":"farmers","sortBy":"created"}}"#
        );
    }

    #[rstest]
    #[case::unwhitelisted_ignored(
        args(&[("groupSlug", "x".into()), ("bogus", "y".into())]),
        args(&[("groupSlug", "x".into())]),
        true
    )]
    #[case::pagination_ignored(
        args(&[("slug", "x".into()), ("offset", 20.into()), ("first", 10.into())]),
        args(&[("slug", "x".into()), ("offset", 0.into())]),
        true
    )]
    #[case::null_dropped(
        args(&[("slug", "x".into()), ("search", json!(null).into())]),
        args(&[("slug", "x".into())]),
        true
    )]
    #[case::empty_string_kept(
        args(&[("slug", "x".into()), ("search", "".into())]),
        args(&[("slug", "x".into())]),
        false
    )]
    #[case::filter_differs(
        args(&[("slug", "x".into()), ("filter", "event".into())]),
        args(&[("slug", "x".into()), ("filter", "offer".into())]),
        false
    )]
    #[case::sort_differs(
        args(&[("slug", "x".into()), ("sortBy", "votes".into())]),
        args(&[("slug", "x".into())]),
        false
    )]
    fn equivalent_queries(#[case] a: Arguments, #[case] b: Arguments, #[case] same: bool) {
        assert_eq!(build_key("FETCH_POSTS", &a) == build_key("FETCH_POSTS", &b), same);
    }

    #[test]
    fn action_type_is_part_of_key() {
        let params = args(&[("slug", "x".into())]);
        assert_ne!(
            build_key("FETCH_POSTS", &params),
            build_key("FETCH_MEMBERS", &params)
        );
    }

    #[test]
    fn no_params() {
        assert_eq!(
            build_key("FETCH_TOPICS", &args(&[])).as_str(),
            r#"{"type":"FETCH_TOPICS","params":{}}"#
        );
    }
}
