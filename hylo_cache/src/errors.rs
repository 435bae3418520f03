// SPDX-License-Identifier: AGPL-3.0-or-later

use thiserror::Error;

/// Errors when writing to a normalized cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Link targets an entity which was never written to the cache.
    #[error("Can't link field '{1}' on unknown entity '{0}'")]
    UnknownEntity(String, String),

    /// Snapshot could not be decoded.
    #[error("Invalid cache snapshot: {0}")]
    InvalidSnapshot(#[from] serde_json::Error),
}

/// Errors when parsing configuration values.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Merge mode is neither "before" nor "after".
    #[error("Unknown merge mode '{0}', expected 'before' or 'after'")]
    UnknownMergeMode(String),

    /// Two resolvers were configured for the same field.
    #[error("Resolver for field '{1}' on '{0}' was configured more than once")]
    DuplicateResolver(String, String),
}
