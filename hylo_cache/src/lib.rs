// SPDX-License-Identifier: AGPL-3.0-or-later

//! # hylo_cache
//!
//! Client-side query cache projections for the Hylo API.
//!
//! Two independent halves live in this crate:
//!
//! - [`pagination`] resolvers which plug into a normalized GraphQL cache (see [`cache`]) and merge
//! every cached page of a paginated field into one growing list.
//! - [`query_results`], a store keeping ordered, de-duplicated id lists per list query, with
//! selectors resolving those ids against a separate entity store.
#![warn(
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications
)]

pub mod cache;
mod config;
mod errors;
pub mod pagination;
pub mod query_results;
#[cfg(test)]
mod test_utils;
mod value;

pub use config::{Configuration, PaginationConfig, ResolverEntry, ResolverKind};
pub use errors::{CacheError, ConfigError};
pub use value::{ArgumentValue, Arguments};
