// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::BTreeMap;

use log::trace;
use serde::{Deserialize, Serialize};

use crate::query_results::ids::{deserialize_id, EntityId};
use crate::query_results::key::{build_key, QueryKey};
use crate::value::Arguments;

/// Ordered ids one list query returned so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Ids in display order, every id at most once.
    pub ids: Vec<EntityId>,

    /// Total number of entities matching the query, as last reported by the server.
    pub total: Option<u64>,

    /// Flag indicating if the server has more entities for this query.
    pub has_more: Option<bool>,
}

/// Entity returned by a list query, only its id is of interest here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchedItem {
    /// Id of the entity.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: EntityId,
}

/// One page of a list query as returned by the API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResult {
    /// Entities on this page.
    #[serde(default)]
    pub items: Vec<FetchedItem>,

    /// Total number of entities matching the query.
    #[serde(default)]
    pub total: Option<u64>,

    /// Flag indicating if there are more pages.
    #[serde(default)]
    pub has_more: Option<bool>,
}

impl FetchResult {
    /// Returns a result holding the given ids.
    pub fn new(ids: &[&str], total: Option<u64>, has_more: Option<bool>) -> Self {
        Self {
            items: ids
                .iter()
                .map(|id| FetchedItem { id: id.to_string() })
                .collect(),
            total,
            has_more,
        }
    }
}

/// Query results of a session, keyed by action type and whitelisted query parameters.
///
/// Entries are created on the first fetch of a query and never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryResults(BTreeMap<QueryKey, QueryResult>);

impl QueryResults {
    /// Returns an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the entry stored under a key.
    pub fn get(&self, key: &QueryKey) -> Option<&QueryResult> {
        self.0.get(key)
    }

    /// Returns the number of stored queries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no query was stored yet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over all stored queries.
    pub fn iter(&self) -> impl Iterator<Item = (&QueryKey, &QueryResult)> {
        self.0.iter()
    }

    /// Stores the result of a list query.
    ///
    /// With `replace` the stored ids are replaced by the fetched ones, used for fresh loads.
    /// Otherwise fetched ids not stored yet are appended, used when loading more. `total` and
    /// `has_more` are always taken from the latest fetch. Nothing happens without data.
    pub fn update_ids(
        &mut self,
        action_type: &str,
        params: &Arguments,
        data: Option<&FetchResult>,
        replace: bool,
    ) {
        let data = match data {
            Some(data) => data,
            None => return,
        };

        let key = build_key(action_type, params);
        let fetched = data.items.iter().map(|item| item.id.clone());

        let mut ids = match (replace, self.0.remove(&key)) {
            (false, Some(existing)) => existing.ids,
            _ => Vec::new(),
        };

        for id in fetched {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        trace!("Store {} ids under {}", ids.len(), key);

        self.0.insert(
            key,
            QueryResult {
                ids,
                total: data.total,
                has_more: data.has_more,
            },
        );
    }

    /// Puts a newly created entity in front of an already stored query and counts it.
    ///
    /// Queries which were never fetched are left alone. An id the query already holds keeps its
    /// place but is still counted. Returns true if the entry was changed.
    pub fn prepend_id_for_create(&mut self, key: &QueryKey, id: &str) -> bool {
        let entry = match self.0.get_mut(key) {
            Some(entry) => entry,
            None => return false,
        };

        let known = entry.ids.iter().any(|existing| existing == id);
        if !known {
            entry.ids.insert(0, id.to_string());
        }

        let counted = entry.total.is_some();
        entry.total = entry.total.map(|total| total + 1);

        !known || counted
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use crate::query_results::build_key;
    use crate::test_utils::args;

    use super::{FetchResult, QueryResult, QueryResults};

    const FETCH_MEMBERS: &str = "FETCH_MEMBERS";

    fn stored(state: &QueryResults, sort_by: &str) -> QueryResult {
        state
            .get(&build_key(FETCH_MEMBERS, &args(&[("sortBy", sort_by.into())])))
            .cloned()
            .expect("Expect stored query")
    }

    #[test]
    fn append_new_ids() {
        let mut state = QueryResults::new();
        let params = args(&[("sortBy", "name".into()), ("offset", 0.into())]);

        state.update_ids(
            FETCH_MEMBERS,
            &params,
            Some(&FetchResult::new(&["1", "2"], Some(4), Some(true))),
            false,
        );
        state.update_ids(
            FETCH_MEMBERS,
            &args(&[("sortBy", "name".into()), ("offset", 2.into())]),
            Some(&FetchResult::new(&["2", "3", "4"], Some(4), Some(false))),
            false,
        );

        assert_eq!(
            stored(&state, "name"),
            QueryResult {
                ids: vec!["1".into(), "2".into(), "3".into(), "4".into()],
                total: Some(4),
                has_more: Some(false),
            }
        );
    }

    #[test]
    fn replace_ids() {
        let mut state = QueryResults::new();
        let params = args(&[("sortBy", "name".into())]);

        state.update_ids(
            FETCH_MEMBERS,
            &params,
            Some(&FetchResult::new(&["1", "2"], Some(2), Some(false))),
            false,
        );
        state.update_ids(
            FETCH_MEMBERS,
            &params,
            Some(&FetchResult::new(&["3"], Some(1), None)),
            true,
        );

        assert_eq!(
            stored(&state, "name"),
            QueryResult {
                ids: vec!["3".into()],
                total: Some(1),
                has_more: None,
            }
        );
    }

    #[test]
    fn queries_are_kept_apart() {
        let mut state = QueryResults::new();

        state.update_ids(
            FETCH_MEMBERS,
            &args(&[("sortBy", "name".into())]),
            Some(&FetchResult::new(&["1", "2"], None, None)),
            false,
        );
        state.update_ids(
            FETCH_MEMBERS,
            &args(&[("sortBy", "location".into())]),
            Some(&FetchResult::new(&["2", "1"], None, None)),
            false,
        );

        assert_eq!(state.len(), 2);
        assert_eq!(stored(&state, "name").ids, vec!["1", "2"]);
        assert_eq!(stored(&state, "location").ids, vec!["2", "1"]);
    }

    #[test]
    fn no_data_no_change() {
        let mut state = QueryResults::new();
        state.update_ids(FETCH_MEMBERS, &args(&[]), None, true);

        assert!(state.is_empty());
    }

    #[test]
    fn empty_fetch_creates_entry() {
        let mut state = QueryResults::new();
        let params = args(&[("sortBy", "name".into())]);
        state.update_ids(
            FETCH_MEMBERS,
            &params,
            Some(&FetchResult::new(&[], Some(0), Some(false))),
            false,
        );

        assert_eq!(stored(&state, "name").ids, Vec::<String>::new());
    }

    #[test]
    fn prepend_only_to_known_queries() {
        let mut state = QueryResults::new();
        let params = args(&[("sortBy", "name".into())]);
        let key = build_key(FETCH_MEMBERS, &params);
        let unknown = build_key(FETCH_MEMBERS, &args(&[("sortBy", "location".into())]));

        assert!(!state.prepend_id_for_create(&key, "9"));

        state.update_ids(
            FETCH_MEMBERS,
            &params,
            Some(&FetchResult::new(&["1"], Some(1), Some(false))),
            false,
        );

        assert!(state.prepend_id_for_create(&key, "9"));
        assert!(!state.prepend_id_for_create(&unknown, "9"));
        assert_eq!(
            stored(&state, "name"),
            QueryResult {
                ids: vec!["9".into(), "1".into()],
                total: Some(2),
                has_more: Some(false),
            }
        );
    }

    #[test]
    fn count_known_id_without_moving_it() {
        let mut state = QueryResults::new();
        let params = args(&[("sortBy", "name".into())]);
        let key = build_key(FETCH_MEMBERS, &params);

        // Refetched list already holds the new entity
        state.update_ids(
            FETCH_MEMBERS,
            &params,
            Some(&FetchResult::new(&["1", "9"], Some(2), Some(false))),
            false,
        );

        assert!(state.prepend_id_for_create(&key, "9"));
        assert_eq!(stored(&state, "name").ids, vec!["1", "9"]);
        assert_eq!(stored(&state, "name").total, Some(3));

        // Nothing changes without a known total
        state.update_ids(
            FETCH_MEMBERS,
            &params,
            Some(&FetchResult::new(&["1", "9"], None, Some(false))),
            true,
        );
        assert!(!state.prepend_id_for_create(&key, "9"));
        assert_eq!(stored(&state, "name").total, None);
    }

    #[test]
    fn deserialize_numeric_ids() {
        let data: FetchResult = serde_json::from_str(
            r#"{ "items": [{ "id": 12, "name": "Bee" }, { "id": "13" }], "total": 2 }"#,
        )
        .unwrap();

        assert_eq!(data, FetchResult::new(&["12", "13"], Some(2), None));
    }

    proptest! {
        #[test]
        fn appending_twice_is_idempotent(
            existing in prop::collection::vec(0u8..16, 0..10),
            fetched in prop::collection::vec(0u8..16, 0..10),
        ) {
            let existing: Vec<String> = existing.iter().map(u8::to_string).collect();
            let fetched: Vec<String> = fetched.iter().map(u8::to_string).collect();
            let existing: Vec<&str> = existing.iter().map(String::as_str).collect();
            let fetched: Vec<&str> = fetched.iter().map(String::as_str).collect();
            let params = args(&[("sortBy", "name".into())]);

            let mut state = QueryResults::new();
            state.update_ids(FETCH_MEMBERS, &params, Some(&FetchResult::new(&existing, None, None)), false);
            state.update_ids(FETCH_MEMBERS, &params, Some(&FetchResult::new(&fetched, None, None)), false);
            let once = stored(&state, "name");

            state.update_ids(FETCH_MEMBERS, &params, Some(&FetchResult::new(&fetched, None, None)), false);
            let twice = stored(&state, "name");

            prop_assert_eq!(&once, &twice);

            let mut unique = once.ids.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(unique.len(), once.ids.len());
        }
    }
}
