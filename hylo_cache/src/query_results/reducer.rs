// SPDX-License-Identifier: AGPL-3.0-or-later

use log::{debug, trace};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::query_results::store::{FetchResult, QueryResults};
use crate::query_results::subscriptions::NewPost;
use crate::value::Arguments;

/// Action type of list queries fetching posts.
pub const FETCH_POSTS: &str = "FETCH_POSTS";

/// Action type of the live socket announcing a newly created post.
pub const RECEIVE_POST: &str = "SocketListener/RECEIVE_POST";

/// Action dispatched to the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Action type, for example "FETCH_POSTS".
    #[serde(rename = "type")]
    pub action_type: String,

    /// Response data of the request behind the action.
    #[serde(default)]
    pub payload: Option<Payload>,

    /// Flag indicating that the request behind the action failed.
    #[serde(default)]
    pub error: bool,

    /// Instructions for reducers on how to treat the action.
    #[serde(default)]
    pub meta: Option<Meta>,
}

/// Response data carried by an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// GraphQL response data.
    #[serde(default)]
    pub data: Value,
}

/// Meta data carried by an action.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    /// Set when the action holds a list query result which should be stored.
    #[serde(default)]
    pub extract_query_results: Option<ExtractQueryResults>,

    /// GraphQL request the action was created for.
    #[serde(default)]
    pub graphql: Option<GraphqlMeta>,
}

/// GraphQL request meta data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphqlMeta {
    /// Variables the query was sent with.
    #[serde(default)]
    pub variables: Arguments,
}

/// Describes where a list query result is found in an action and under which key it is stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractQueryResults {
    /// Stores the result under this action type instead of the action's own.
    #[serde(default, rename = "type")]
    pub query_type: Option<String>,

    /// Parameters to key the result by, defaults to the variables of the GraphQL request.
    #[serde(default)]
    pub params: Option<Arguments>,

    /// Path to the `{ items, total, hasMore }` object inside the payload data, for example
    /// `["group", "posts"]`.
    #[serde(default)]
    pub items_path: Vec<String>,

    /// Replace the stored ids instead of appending to them.
    #[serde(default)]
    pub replace: bool,
}

impl QueryResults {
    /// Applies an action to the store.
    ///
    /// Failed actions are ignored. Actions carrying [`ExtractQueryResults`] and a payload store
    /// the list they hold, live post announcements get matched into the stored posts queries.
    /// Payloads which can't be read are skipped, the store is never left in a broken state.
    pub fn reduce(&mut self, action: &Action) {
        if action.error {
            trace!("Ignore failed action {}", action.action_type);
            return;
        }

        let meta = action.meta.as_ref();
        let extract = meta.and_then(|meta| meta.extract_query_results.as_ref());

        if let (Some(extract), Some(payload)) = (extract, action.payload.as_ref()) {
            self.extract_query_results(action, extract, &payload.data);
            return;
        }

        if action.action_type == RECEIVE_POST {
            let post = action
                .payload
                .as_ref()
                .and_then(|payload| payload.data.get("post"))
                .map(NewPost::deserialize);

            match post {
                Some(Ok(post)) => {
                    self.match_new_post_into_query_results(&post);
                }
                Some(Err(err)) => debug!("Ignore malformed post in {}: {}", RECEIVE_POST, err),
                None => debug!("Ignore {} without post", RECEIVE_POST),
            }
        }
    }

    fn extract_query_results(
        &mut self,
        action: &Action,
        extract: &ExtractQueryResults,
        data: &Value,
    ) {
        let action_type = extract
            .query_type
            .as_deref()
            .unwrap_or(&action.action_type);

        let variables = action
            .meta
            .as_ref()
            .and_then(|meta| meta.graphql.as_ref())
            .map(|graphql| &graphql.variables);

        let empty = Arguments::new();
        let params = extract
            .params
            .as_ref()
            .or(variables)
            .unwrap_or(&empty);

        let result = match lookup(data, &extract.items_path) {
            Some(Value::Null) | None => None,
            Some(value) => match FetchResult::deserialize(value) {
                Ok(result) => Some(result),
                Err(err) => {
                    debug!(
                        "Ignore malformed query result of {} at {:?}: {}",
                        action_type, extract.items_path, err
                    );
                    return;
                }
            },
        };

        self.update_ids(action_type, params, result.as_ref(), extract.replace);
    }
}

/// Follows a path of object keys and array indices into a JSON value.
fn lookup<'a>(data: &'a Value, path: &[String]) -> Option<&'a Value> {
    path.iter().try_fold(data, |value, segment| match value {
        Value::Array(items) => segment
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get(index)),
        _ => value.get(segment.as_str()),
    })
}
