// SPDX-License-Identifier: AGPL-3.0-or-later

//! Resolvers merging cached pages of paginated fields.
//!
//! The cache stores every paginated read (every offset or cursor) separately. The resolvers in
//! this module run on each read of such a field and project all compatible cached pages into one
//! logical, growing list. They never write to the cache, except for [`AppendToPaginatedSet`]
//! which is an updater reacting to newly created entities.
mod append;
mod args;
mod cursor;
mod offset;
mod registry;
mod resolver;

pub use append::{AppendToPaginatedSet, SortOrder};
pub use args::{compare_args, strip_args, PAGINATION_ARGS};
pub use cursor::CursorPagination;
pub use offset::{MergeMode, OffsetPagination};
pub use registry::ResolverMap;
pub use resolver::{PaginatedSet, ResolveInfo, Resolver};
