// SPDX-License-Identifier: AGPL-3.0-or-later

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::query_results::key::build_key;
use crate::query_results::store::{QueryResult, QueryResults};
use crate::value::Arguments;

/// Looks up the stored list of one action type for the parameters a view is rendered with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResultsSelector {
    action_type: String,
}

/// Returns a selector for stored lists of the given action type.
pub fn make_get_query_results(action_type: &str) -> QueryResultsSelector {
    QueryResultsSelector {
        action_type: action_type.to_string(),
    }
}

impl QueryResultsSelector {
    /// Action type the selector looks up.
    pub fn action_type(&self) -> &str {
        &self.action_type
    }

    /// Returns the stored list for the given parameters, `None` if it was never fetched.
    ///
    /// Parameters which are not part of query keys are ignored, so the complete set of view
    /// properties can be passed in.
    pub fn select<'a>(
        &self,
        state: &'a QueryResults,
        props: &Arguments,
    ) -> Option<&'a QueryResult> {
        state.get(&build_key(&self.action_type, props))
    }
}

/// Normalized store holding entities by id.
pub trait EntityStore {
    /// Stored entity.
    type Entity;

    /// Returns the entity with the given id.
    fn entity(&self, id: &str) -> Option<&Self::Entity>;
}

impl<T> EntityStore for HashMap<String, T> {
    type Entity = T;

    fn entity(&self, id: &str) -> Option<&T> {
        self.get(id)
    }
}

impl<T> EntityStore for BTreeMap<String, T> {
    type Entity = T;

    fn entity(&self, id: &str) -> Option<&T> {
        self.get(id)
    }
}

/// Resolves a stored list into entities, in stored order.
pub struct ModelSelector<F> {
    results: QueryResultsSelector,
    transform: F,
}

impl<F> fmt::Debug for ModelSelector<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelSelector")
            .field("results", &self.results)
            .finish_non_exhaustive()
    }
}

/// Combines a results selector with an entity store lookup, mapping every entity through
/// `transform`.
pub fn make_query_results_model_selector<F>(
    results: QueryResultsSelector,
    transform: F,
) -> ModelSelector<F> {
    ModelSelector { results, transform }
}

impl<F> ModelSelector<F> {
    /// Returns the entities of the stored list for the given parameters.
    ///
    /// Ids without an entity in the store are skipped. Lists which were never fetched or hold no
    /// ids give an empty result.
    pub fn select<S, T>(&self, state: &QueryResults, entities: &S, props: &Arguments) -> Vec<T>
    where
        S: EntityStore,
        F: Fn(&S::Entity) -> T,
    {
        let result = match self.results.select(state, props) {
            Some(result) => result,
            None => return Vec::new(),
        };

        result
            .ids
            .iter()
            .filter_map(|id| entities.entity(id))
            .map(&self.transform)
            .collect()
    }
}
