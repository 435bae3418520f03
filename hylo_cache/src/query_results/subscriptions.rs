// SPDX-License-Identifier: AGPL-3.0-or-later

use log::debug;
use serde::{Deserialize, Serialize};

use crate::query_results::ids::{deserialize_id, EntityId};
use crate::query_results::key::{build_key, QueryKey};
use crate::query_results::reducer::FETCH_POSTS;
use crate::query_results::store::QueryResults;
use crate::value::{ArgumentValue, Arguments};

/// Group a post was created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRef {
    /// Slug of the group.
    pub slug: String,
}

/// Topic a post was tagged with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicRef {
    /// Id of the topic as sent, numbers stay numbers.
    pub id: ArgumentValue,
}

/// Post announced by the live socket right after somebody created it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPost {
    /// Id of the post.
    #[serde(deserialize_with = "deserialize_id")]
    pub id: EntityId,

    /// Flag indicating if the post shows up in the public stream.
    #[serde(default)]
    pub is_public: bool,

    /// Post type, for example "discussion", "event" or "offer".
    #[serde(default, rename = "type")]
    pub post_type: Option<String>,

    /// Groups the post was created in.
    #[serde(default)]
    pub groups: Vec<GroupRef>,

    /// Topics the post was tagged with.
    #[serde(default)]
    pub topics: Vec<TopicRef>,
}

/// What a key template is expanded over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Once per post.
    Global,

    /// Once per topic of the post.
    PerTopic,

    /// Once, only if the post is public.
    Public,

    /// Once per group of the post.
    PerGroup,

    /// Once per group and topic pair of the post.
    PerGroupTopic,
}

/// Value of one templated query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateValue {
    /// Fixed string.
    Literal(&'static str),

    /// Slug of the current group.
    GroupSlug,

    /// List holding only the slug of the current group.
    GroupSlugs,

    /// Type of the post, the parameter is left out if the post has none.
    PostType,

    /// Id of the current topic.
    TopicId,
}

/// Parameters of a posts query a new post is likely to show up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyTemplate {
    /// What the template is expanded over.
    pub scope: Scope,

    /// Query parameters by name.
    pub params: &'static [(&'static str, TemplateValue)],
}

use TemplateValue::{GroupSlug, GroupSlugs, Literal, PostType, TopicId};

/// Posts queries sorted by creation or update time, which a new post belongs on top of.
///
/// Map and map drawer queries carry the group in `groupSlugs`, event streams are sorted by start
/// time in both directions.
pub const POST_KEY_TEMPLATES: &[KeyTemplate] = &[
    KeyTemplate {
        scope: Scope::Global,
        params: &[("context", Literal("all"))],
    },
    KeyTemplate {
        scope: Scope::PerTopic,
        params: &[("context", Literal("all")), ("topic", TopicId)],
    },
    KeyTemplate {
        scope: Scope::Public,
        params: &[("context", Literal("public"))],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[("context", Literal("groups")), ("slug", GroupSlug)],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("groupSlugs", GroupSlugs),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("filter", PostType),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("updated")),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("updated")),
            ("search", Literal("")),
            ("groupSlugs", GroupSlugs),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("updated")),
            ("filter", PostType),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("created")),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("created")),
            ("search", Literal("")),
            ("groupSlugs", GroupSlugs),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("created")),
            ("filter", PostType),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("start_time")),
            ("filter", PostType),
            ("order", Literal("asc")),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroup,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("sortBy", Literal("start_time")),
            ("filter", PostType),
            ("order", Literal("desc")),
        ],
    },
    KeyTemplate {
        scope: Scope::PerGroupTopic,
        params: &[
            ("context", Literal("groups")),
            ("slug", GroupSlug),
            ("topic", TopicId),
        ],
    },
];

impl KeyTemplate {
    /// Fills in the template for one post, group and topic.
    fn render(
        &self,
        post: &NewPost,
        group: Option<&GroupRef>,
        topic: Option<&TopicRef>,
    ) -> Arguments {
        self.params
            .iter()
            .filter_map(|(name, value)| {
                let value = match value {
                    Literal(text) => Some(ArgumentValue::from(*text)),
                    GroupSlug => group.map(|group| ArgumentValue::from(group.slug.as_str())),
                    GroupSlugs => group.map(|group| ArgumentValue::from(vec![group.slug.as_str()])),
                    PostType => post.post_type.as_deref().map(ArgumentValue::from),
                    TopicId => topic.map(|topic| topic.id.clone()),
                }?;
                Some((name.to_string(), value))
            })
            .collect()
    }
}

/// Returns the parameters of every posts query the new post plausibly belongs to.
///
/// The same parameters can show up more than once, for example when the post has no type and the
/// filtered variants collapse into the unfiltered ones.
pub fn candidate_params(post: &NewPost) -> Vec<Arguments> {
    let mut candidates = Vec::new();

    for template in POST_KEY_TEMPLATES {
        match template.scope {
            Scope::Global => candidates.push(template.render(post, None, None)),
            Scope::PerTopic => {
                for topic in &post.topics {
                    candidates.push(template.render(post, None, Some(topic)));
                }
            }
            Scope::Public => {
                if post.is_public {
                    candidates.push(template.render(post, None, None));
                }
            }
            Scope::PerGroup => {
                for group in &post.groups {
                    candidates.push(template.render(post, Some(group), None));
                }
            }
            Scope::PerGroupTopic => {
                for group in &post.groups {
                    for topic in &post.topics {
                        candidates.push(template.render(post, Some(group), Some(topic)));
                    }
                }
            }
        }
    }

    candidates
}

impl QueryResults {
    /// Puts a newly created post in front of every stored posts query it belongs to.
    ///
    /// Only queries which were fetched before are touched, every one of them at most once.
    /// Returns the number of changed queries.
    pub fn match_new_post_into_query_results(&mut self, post: &NewPost) -> usize {
        let mut keys: Vec<QueryKey> = Vec::new();
        for params in candidate_params(post) {
            let key = build_key(FETCH_POSTS, &params);
            if !keys.contains(&key) {
                keys.push(key);
            }
        }

        let mut changed = 0;
        for key in &keys {
            if self.prepend_id_for_create(key, &post.id) {
                changed += 1;
            }
        }

        debug!(
            "Matched new post {} into {} of {} candidate queries",
            post.id,
            changed,
            keys.len()
        );

        changed
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use serde_json::json;

    use crate::query_results::{build_key, FetchResult, QueryResult, QueryResults, FETCH_POSTS};
    use crate::test_utils::{args, new_post};
    use crate::value::Arguments;

    use super::{candidate_params, GroupRef, NewPost, TopicRef};

    fn fetched(params: &[Arguments]) -> QueryResults {
        let mut state = QueryResults::new();
        for query in params {
            state.update_ids(
                FETCH_POSTS,
                query,
                Some(&FetchResult::new(&["1", "2"], Some(2), Some(false))),
                false,
            );
        }
        state
    }

    fn entry(state: &QueryResults, params: &Arguments) -> QueryResult {
        state
            .get(&build_key(FETCH_POSTS, params))
            .cloned()
            .expect("Expect stored query")
    }

    #[test]
    fn expand_templates() {
        let post = NewPost {
            is_public: true,
            groups: vec![
                GroupRef {
                    slug: "farmers".into(),
                },
                GroupRef {
                    slug: "bakers".into(),
                },
            ],
            topics: vec![TopicRef { id: "7".into() }, TopicRef { id: "8".into() }],
            ..new_post("99")
        };

        // Global, two topics, public, eleven per group, one per group and topic
        assert_eq!(candidate_params(&post).len(), 1 + 2 + 1 + 2 * 11 + 2 * 2);
    }

    #[test]
    fn private_post_skips_public_stream() {
        let candidates = candidate_params(&new_post("99"));
        assert!(!candidates.contains(&args(&[("context", "public".into())])));
        assert!(candidates.contains(&args(&[("context", "all".into())])));
    }

    #[rstest]
    #[case::group_stream(args(&[("context", "groups".into()), ("slug", "farmers".into())]))]
    #[case::sorted_by_creation(args(&[
        ("context", "groups".into()),
        ("slug", "farmers".into()),
        ("sortBy", "created".into()),
    ]))]
    #[case::filtered_by_type(args(&[
        ("context", "groups".into()),
        ("slug", "farmers".into()),
        ("filter", "discussion".into()),
    ]))]
    #[case::map_drawer(args(&[
        ("context", "groups".into()),
        ("slug", "farmers".into()),
        ("sortBy", "updated".into()),
        ("search", "".into()),
        ("groupSlugs", json!(["farmers"]).into()),
    ]))]
    #[case::events(args(&[
        ("context", "groups".into()),
        ("slug", "farmers".into()),
        ("sortBy", "start_time".into()),
        ("filter", "discussion".into()),
        ("order", "desc".into()),
    ]))]
    #[case::group_topic(args(&[
        ("context", "groups".into()),
        ("slug", "farmers".into()),
        ("topic", "7".into()),
    ]))]
    #[case::all_topic(args(&[("context", "all".into()), ("topic", "7".into())]))]
    fn prepend_into_matching_query(#[case] params: Arguments) {
        let mut state = fetched(&[params.clone()]);

        assert_eq!(state.match_new_post_into_query_results(&new_post("99")), 1);
        assert_eq!(
            entry(&state, &params),
            QueryResult {
                ids: vec!["99".into(), "1".into(), "2".into()],
                total: Some(3),
                has_more: Some(false),
            }
        );
    }

    #[test]
    fn leave_other_queries_alone() {
        let other_group = args(&[("context", "groups".into()), ("slug", "bakers".into())]);
        let sorted_by_votes = args(&[
            ("context", "groups".into()),
            ("slug", "farmers".into()),
            ("sortBy", "votes".into()),
        ]);
        let mut state = fetched(&[other_group, sorted_by_votes]);
        let before = state.clone();

        assert_eq!(state.match_new_post_into_query_results(&new_post("99")), 0);
        assert_eq!(state, before);
    }

    #[test]
    fn never_create_queries() {
        let mut state = QueryResults::new();
        assert_eq!(state.match_new_post_into_query_results(&new_post("99")), 0);
        assert!(state.is_empty());
    }

    #[test]
    fn colliding_keys_count_once() {
        // Without a type the filtered variants are the same queries as the unfiltered ones
        let post = NewPost {
            post_type: None,
            ..new_post("99")
        };
        let group_stream = args(&[("context", "groups".into()), ("slug", "farmers".into())]);
        let sorted = args(&[
            ("context", "groups".into()),
            ("slug", "farmers".into()),
            ("sortBy", "created".into()),
        ]);
        let mut state = fetched(&[group_stream.clone(), sorted.clone()]);

        assert_eq!(state.match_new_post_into_query_results(&post), 2);

        for params in [group_stream, sorted] {
            let stored = entry(&state, &params);
            assert_eq!(stored.ids, vec!["99", "1", "2"]);
            assert_eq!(stored.total, Some(3));
        }
    }

    #[test]
    fn known_post_is_counted_but_not_added_again() {
        let params = args(&[("context", "all".into())]);
        let mut state = fetched(&[params.clone()]);

        assert_eq!(state.match_new_post_into_query_results(&new_post("1")), 1);
        assert_eq!(entry(&state, &params).ids, vec!["1", "2"]);
        assert_eq!(entry(&state, &params).total, Some(3));
    }

    #[test]
    fn deserialize_socket_post() {
        let post: NewPost = serde_json::from_value(json!({
            "id": 99,
            "isPublic": true,
            "type": "event",
            "groups": [{ "slug": "farmers", "name": "Farmers" }],
            "topics": [{ "id": 7, "name": "harvest" }],
            "title": "Harvest party"
        }))
        .unwrap();

        assert_eq!(
            post,
            NewPost {
                id: "99".into(),
                is_public: true,
                post_type: Some("event".into()),
                groups: vec![GroupRef {
                    slug: "farmers".into()
                }],
                topics: vec![TopicRef { id: 7.into() }],
            }
        );
    }

    #[test]
    fn numeric_topic_matches_numeric_variable() {
        let params = args(&[("context", "all".into()), ("topic", 7.into())]);
        let mut state = fetched(&[params.clone()]);

        let post: NewPost = serde_json::from_value(json!({
            "id": "99",
            "topics": [{ "id": 7 }]
        }))
        .unwrap();

        assert_eq!(state.match_new_post_into_query_results(&post), 1);
        assert_eq!(entry(&state, &params).ids, vec!["99", "1", "2"]);

        // A topic sent as string belongs to a differently keyed query
        let text_params = args(&[("context", "all".into()), ("topic", "7".into())]);
        assert_eq!(state.get(&build_key(FETCH_POSTS, &text_params)), None);
    }
}
