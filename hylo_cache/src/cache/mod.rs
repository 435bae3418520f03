// SPDX-License-Identifier: AGPL-3.0-or-later

//! Normalized cache the pagination resolvers read from.
//!
//! Resolvers never touch a global store, they get a [`CacheHandle`] passed in. [`MemoryCache`]
//! is an in-memory implementation used by tests, the command line tool and embedders without a
//! cache of their own.
mod handle;
mod key;
mod memory;
mod page;
mod snapshot;

pub use handle::{CacheHandle, CacheValue, CacheWriter, EntityKey, FieldInfo};
pub use key::{entity_key, field_key, typename_of, ROOT_QUERY};
pub use memory::MemoryCache;
pub use page::PageRecord;
pub use snapshot::{CacheSnapshot, SnapshotPage};
