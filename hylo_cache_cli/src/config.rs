// SPDX-License-Identifier: AGPL-3.0-or-later

use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{crate_version, Args, Parser, Subcommand};
use colored::Colorize;
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use hylo_cache::pagination::MergeMode;
use hylo_cache::{Configuration, PaginationConfig, ResolverEntry};
use serde::{Deserialize, Serialize};

use crate::utils::absolute_path;

const CONFIG_FILE_NAME: &str = "config.toml";

const DEFAULT_LOG_LEVEL: &str = "off";

type ConfigFilePath = Option<PathBuf>;

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Configuration which can be de/serialized from a config file.
///
/// See `hylo_cache_cli/config.toml` for an example file and documentation of all values.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Set log verbosity. Possible log levels are: ERROR, WARN, INFO, DEBUG, TRACE. They are
    /// scoped to "hylo_cache" by default.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Settings of offset based resolvers.
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Fields which get a pagination resolver.
    #[serde(default)]
    pub resolvers: Vec<ResolverEntry>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            pagination: PaginationConfig::default(),
            resolvers: Vec::new(),
        }
    }
}

impl From<ConfigFile> for Configuration {
    fn from(value: ConfigFile) -> Self {
        Configuration {
            pagination: value.pagination,
            resolvers: value.resolvers,
        }
    }
}

/// Get configuration from 1. .toml file, 2. environment variables and 3. command line arguments
/// (in that order, meaning that later configuration sources take precedence over the earlier
/// ones).
pub fn load_config(cli: &Cli) -> Result<(ConfigFilePath, ConfigFile)> {
    // Determine if a config file path was provided or if we should look for it in common locations
    let config_file_path: ConfigFilePath = match &cli.config {
        Some(path) => {
            if !path.exists() {
                bail!("Config file '{}' does not exist", path.display());
            }

            Some(path.clone())
        }
        None => try_determine_config_file_path(),
    };

    let mut figment = Figment::from(Serialized::defaults(ConfigFile::default()));
    if let Some(path) = &config_file_path {
        figment = figment.merge(Toml::file(path));
    }

    let config = figment
        .merge(Env::raw().only(&["log_level"]))
        .merge(Serialized::defaults(cli))
        .extract()?;

    Ok((config_file_path, config))
}

/// Command line arguments.
///
/// Configuration arguments are optional and don't get serialized to Figment when they're None.
/// This is to assure that default values do not overwrite settings from the config file.
#[derive(Parser, Serialize, Debug)]
#[command(
    name = "hylo_cache",
    about = "Inspect cached pagination and query results of the Hylo client",
    long_about = None,
    version
)]
pub struct Cli {
    /// Path to an optional "config.toml" file for further configuration.
    ///
    /// When not set the program will try to find a `config.toml` file in the same folder the
    /// program is executed in and otherwise in the regarding operation systems XDG config
    /// directory ("$HOME/.config/hylo_cache/config.toml" on Linux).
    #[arg(short = 'c', long, value_name = "PATH", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    config: Option<PathBuf>,

    /// Set log verbosity. Use this for learning why pages were merged the way they were.
    ///
    /// Possible log levels are: ERROR, WARN, INFO, DEBUG, TRACE. They are scoped to "hylo_cache"
    /// by default.
    ///
    /// If you want to adjust the scope use a filter value, for example "=TRACE" for logging
    /// _everything_.
    #[arg(short = 'l', long, value_name = "LEVEL", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,

    #[command(flatten)]
    pagination: PaginationArgs,

    /// Command to run.
    #[command(subcommand)]
    #[serde(skip)]
    pub command: Command,
}

/// Settings of offset based resolvers, overriding the config file.
#[derive(Args, Serialize, Debug)]
struct PaginationArgs {
    /// Name of the field argument holding the page offset. Defaults to "offset".
    #[arg(long, value_name = "NAME", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    offset_argument: Option<String>,

    /// Name of the field argument holding the page length. Defaults to "limit".
    #[arg(long, value_name = "NAME", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    limit_argument: Option<String>,

    /// Merge pages forwards ("after") or put later pages in front ("before"). Defaults to "after".
    #[arg(long, value_name = "MODE", global = true)]
    #[serde(skip_serializing_if = "Option::is_none")]
    merge_mode: Option<MergeMode>,
}

/// Commands of the command line tool.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Resolve a paginated field against a cache snapshot and print the merged result as JSON.
    Merge {
        /// Path to a JSON cache snapshot.
        #[arg(short = 's', long, value_name = "PATH")]
        snapshot: PathBuf,

        /// Key of the entity holding the field, for example "Group:1" or "Query".
        #[arg(short = 'e', long, value_name = "KEY")]
        entity: String,

        /// Typename used to look up the resolver. Derived from the entity key when not set.
        #[arg(short = 't', long, value_name = "TYPENAME")]
        typename: Option<String>,

        /// Name of the paginated field.
        #[arg(short = 'f', long, value_name = "FIELD")]
        field: String,

        /// Arguments of the field read as JSON object.
        #[arg(short = 'a', long, value_name = "JSON", default_value = "{}")]
        args: String,
    },

    /// Feed a JSON list of actions through the query results store and print the state as JSON.
    Replay {
        /// Path to a JSON file holding a list of actions.
        #[arg(short = 'a', long, value_name = "PATH")]
        actions: PathBuf,

        /// Path to a JSON file holding a previously printed state to start from.
        #[arg(short = 's', long, value_name = "PATH")]
        state: Option<PathBuf>,
    },
}

fn try_determine_config_file_path() -> Option<PathBuf> {
    // Find config file in current folder
    let current_dir = std::env::current_dir()
        .ok()
        .map(|dir| dir.join(CONFIG_FILE_NAME));

    // Find config file in XDG config folder
    let xdg_config_dir = ProjectDirs::from("", "", "hylo_cache")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME));

    [current_dir, xdg_config_dir]
        .into_iter()
        .flatten()
        .find(|path| path.exists())
}

pub fn print_config(config_file_path: Option<&Path>, config: &ConfigFile) -> String {
    let mut output = format!("{} v{}\n\n", "hylo_cache".underline(), crate_version!());

    match config_file_path {
        Some(path) => {
            output += &format!(
                "Loading config file from {}\n",
                absolute_path(path).display().to_string().blue()
            );
        }
        None => {
            output += "No config file provided\n";
        }
    }

    let resolvers: String = if config.resolvers.is_empty() {
        "none (offset resolver for any field)".into()
    } else {
        String::from("\n")
            + &config
                .resolvers
                .iter()
                .map(|entry| format!("• {}.{} ({:?})", entry.entity, entry.field, entry.kind))
                .collect::<Vec<String>>()
                .join("\n")
    };

    output += &format!(
        r"
{}

Offset argument: {}
Limit argument: {}
Merge mode: {}
Resolvers: {}
",
        "Configuration".underline(),
        config.pagination.offset_argument.blue(),
        config.pagination.limit_argument.blue(),
        config.pagination.merge_mode.to_string().blue(),
        resolvers.blue(),
    );

    output
}
