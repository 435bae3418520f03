// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::cache::{MemoryCache, PageRecord};
use crate::query_results::{GroupRef, NewPost, TopicRef};
use crate::value::{ArgumentValue, Arguments};

/// Builds an argument map from key value pairs.
pub fn args(pairs: &[(&str, ArgumentValue)]) -> Arguments {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.clone()))
        .collect()
}

/// Returns a page of posts holding the given references.
pub fn posts_page(items: &[&str]) -> PageRecord {
    PageRecord {
        typename: Some("PostQuerySet".into()),
        ..PageRecord::new(items)
    }
}

/// Offset arguments for a group posts stream sorted by creation date.
pub fn stream_args(offset: i64) -> Arguments {
    args(&[
        ("offset", offset.into()),
        ("limit", 2.into()),
        ("sortBy", "created".into()),
    ])
}

/// Writes the given offset pages of `Group:1.posts` into a new cache, in order.
pub fn stream_cache(pages: &[(i64, &[&str])]) -> MemoryCache {
    let mut cache = MemoryCache::new();
    for (offset, items) in pages {
        cache.write_page("Group:1", "posts", Some(&stream_args(*offset)), &posts_page(items));
    }
    cache
}

/// A post freshly created in the "farmers" group.
pub fn new_post(id: &str) -> NewPost {
    NewPost {
        id: id.into(),
        is_public: false,
        post_type: Some("discussion".into()),
        groups: vec![GroupRef {
            slug: "farmers".into(),
        }],
        topics: vec![TopicRef { id: "7".into() }],
    }
}
