// SPDX-License-Identifier: AGPL-3.0-or-later

#![allow(clippy::uninlined_format_args)]
mod config;
mod utils;

use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::Parser;
use hylo_cache::cache::CacheSnapshot;
use hylo_cache::pagination::{OffsetPagination, ResolveInfo, Resolver, ResolverMap};
use hylo_cache::query_results::{Action, QueryResults};
use hylo_cache::{Arguments, Configuration};
use log::{info, warn, LevelFilter};

use crate::config::{load_config, print_config, Cli, Command};

fn main() -> Result<()> {
    // Parse command line arguments and merge them with config file and environment
    let cli = Cli::parse();
    let (config_file_path, config_file) = load_config(&cli)?;

    setup_logging(&config_file.log_level);

    eprintln!("{}", print_config(config_file_path.as_deref(), &config_file));

    let config: Configuration = config_file.into();

    match cli.command {
        Command::Merge {
            snapshot,
            entity,
            typename,
            field,
            args,
        } => merge(&config, &snapshot, &entity, typename, &field, &args),
        Command::Replay { actions, state } => replay(&actions, state.as_deref()),
    }
}

fn setup_logging(log_level: &str) {
    // Plain levels are scoped to this crate, anything else is taken as filter string
    let mut builder = env_logger::Builder::new();
    match LevelFilter::from_str(log_level) {
        Ok(level) => builder.filter(Some("hylo_cache"), level),
        Err(_) => builder.parse_filters(log_level),
    };
    builder.init();
}

/// Resolves a field against a cache snapshot and prints the merged result.
///
/// Fields without a configured resolver are merged by offset.
fn merge(
    config: &Configuration,
    snapshot: &Path,
    entity: &str,
    typename: Option<String>,
    field: &str,
    args: &str,
) -> Result<()> {
    let cache = CacheSnapshot::from_file(snapshot)?.to_cache();
    let field_args: Arguments =
        serde_json::from_str(args).context("Field arguments need to be a JSON object")?;

    let mut info = ResolveInfo::new(entity, field);
    if let Some(typename) = typename {
        info.parent_typename = typename;
    }

    let resolvers = ResolverMap::from_config(config)?;
    let fallback = OffsetPagination::new(&config.pagination);
    let resolver: &dyn Resolver = match resolvers.get(&info.parent_typename, field) {
        Some(resolver) => resolver,
        None => {
            info!(
                "No resolver configured for {}.{}, merging by offset",
                info.parent_typename, field
            );
            &fallback
        }
    };

    let result = resolver.resolve(&field_args, &cache, &mut info);
    match &result {
        Some(_) if info.partial => warn!("Current page is not cached, result is partial"),
        Some(set) => info!("Merged {} items", set.items.len()),
        None => warn!("Resolver declined, no page of {}.{} is cached", entity, field),
    }

    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

/// Feeds actions through the query results store and prints the resulting state.
fn replay(actions_path: &Path, state_path: Option<&Path>) -> Result<()> {
    let mut state = match state_path {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Could not read state file '{}'", path.display()))?;
            serde_json::from_str::<QueryResults>(&json).context("Invalid state file")?
        }
        None => QueryResults::new(),
    };

    let json = fs::read_to_string(actions_path).with_context(|| {
        format!("Could not read actions file '{}'", actions_path.display())
    })?;
    let actions: Vec<Action> = serde_json::from_str(&json).context("Invalid actions file")?;

    for action in &actions {
        state.reduce(action);
    }

    info!(
        "Replayed {} actions, {} queries stored",
        actions.len(),
        state.len()
    );

    println!("{}", serde_json::to_string_pretty(&state)?);

    Ok(())
}
