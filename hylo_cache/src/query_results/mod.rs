// SPDX-License-Identifier: AGPL-3.0-or-later

//! General-purpose store keeping track of the ordering of lists fetched from the API.
//!
//! The entities themselves live in a separate, normalized entity store. This store only keeps
//! which ids a list query returned, in which order, per distinct query. For example the members
//! list sorted by name is kept apart from the one sorted by location, and both apart from the
//! list shown while searching.
mod ids;
mod key;
mod reducer;
mod selectors;
mod store;
mod subscriptions;

pub use ids::EntityId;
pub use key::{build_key, QueryKey, QUERY_PARAM_WHITELIST};
pub use reducer::{Action, ExtractQueryResults, GraphqlMeta, Meta, Payload, FETCH_POSTS, RECEIVE_POST};
pub use selectors::{
    make_get_query_results, make_query_results_model_selector, EntityStore, ModelSelector,
    QueryResultsSelector,
};
pub use store::{FetchResult, FetchedItem, QueryResult, QueryResults};
pub use subscriptions::{
    candidate_params, GroupRef, KeyTemplate, NewPost, Scope, TemplateValue, TopicRef,
    POST_KEY_TEMPLATES,
};
