// SPDX-License-Identifier: AGPL-3.0-or-later

use serde::{Deserialize, Serialize};

use crate::pagination::MergeMode;

const DEFAULT_OFFSET_ARGUMENT: &str = "offset";

const DEFAULT_LIMIT_ARGUMENT: &str = "limit";

fn default_offset_argument() -> String {
    DEFAULT_OFFSET_ARGUMENT.to_string()
}

fn default_limit_argument() -> String {
    DEFAULT_LIMIT_ARGUMENT.to_string()
}

/// Configuration object holding everything needed to set up the cache resolvers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    /// Settings shared by all offset based resolvers.
    pub pagination: PaginationConfig,

    /// Fields which get a pagination resolver.
    pub resolvers: Vec<ResolverEntry>,
}

/// Settings of the offset pagination resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Name of the field argument defining the page's offset. Defaults to "offset".
    #[serde(default = "default_offset_argument")]
    pub offset_argument: String,

    /// Name of the field argument defining the page's length. Defaults to "limit".
    #[serde(default = "default_limit_argument")]
    pub limit_argument: String,

    /// Merge pages forwards ("after", default) or in reverse ("before").
    ///
    /// In reverse mode later pages are put in front of earlier ones, which suits lists growing
    /// towards the top, like a chat history.
    #[serde(default)]
    pub merge_mode: MergeMode,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            offset_argument: default_offset_argument(),
            limit_argument: default_limit_argument(),
            merge_mode: MergeMode::default(),
        }
    }
}

/// Kind of resolver registered for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolverKind {
    /// Merge offset pages of the same query, see [`crate::pagination::OffsetPagination`].
    Offset,

    /// Concatenate all cursor pages of the field.
    Cursor,

    /// Concatenate the cursor pages of the same query only.
    CursorByShape,
}

/// A paginated field and the resolver it gets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverEntry {
    /// Typename of the entity holding the field, for example "Group" or "Query".
    pub entity: String,

    /// Name of the paginated field.
    pub field: String,

    /// Resolver to use.
    pub kind: ResolverKind,

    /// Overrides the configured merge mode for this field, only used by offset resolvers.
    #[serde(default)]
    pub merge_mode: Option<MergeMode>,

    /// Typename reported on merged results, only used by cursor resolvers matching by shape.
    #[serde(default)]
    pub typename: Option<String>,
}
