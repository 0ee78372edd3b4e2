// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! Three tiers, later ones win:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SpikescanConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no explicit path is given
pub const CONFIG_FILE_NAME: &str = "spikescan.toml";

/// Environment variable naming an explicit config file
const CONFIG_PATH_VAR: &str = "SPIKESCAN_CONFIG_PATH";

/// Find the configuration file
///
/// Search order:
/// 1. `SPIKESCAN_CONFIG_PATH` environment variable
/// 2. Current working directory
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var(CONFIG_PATH_VAR) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by {} not found: {}",
            CONFIG_PATH_VAR,
            path.display()
        )));
    }

    let mut search_paths = Vec::new();
    if let Ok(cwd) = env::current_dir() {
        search_paths.push(cwd.join(CONFIG_FILE_NAME));
        let mut current = cwd.as_path();
        for _ in 0..5 {
            match current.parent() {
                Some(parent) => {
                    search_paths.push(parent.join(CONFIG_FILE_NAME));
                    current = parent;
                }
                None => break,
            }
        }
    }

    if let Some(path) = search_paths.iter().find(|p| p.exists()) {
        return Ok(path.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet {} to specify a custom location.",
        CONFIG_FILE_NAME, search_list, CONFIG_PATH_VAR
    )))
}

/// Load configuration from a TOML file and apply overrides
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if the file is not found or contains invalid TOML
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikescanConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };

    let content = fs::read_to_string(&config_file)?;
    let mut config: SpikescanConfig = toml::from_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }
    Ok(config)
}

/// Like [`load_config`] with search, but a missing file yields defaults.
///
/// An explicit `SPIKESCAN_CONFIG_PATH` that does not exist is still an error.
pub fn load_config_or_default(
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikescanConfig> {
    match find_config_file() {
        Ok(path) => load_config(Some(&path), cli_args),
        Err(ConfigError::FileNotFound(_)) if env::var(CONFIG_PATH_VAR).is_err() => {
            let mut config = SpikescanConfig::default();
            apply_environment_overrides(&mut config);
            if let Some(cli) = cli_args {
                apply_cli_overrides(&mut config, cli);
            }
            Ok(config)
        }
        Err(e) => Err(e),
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.to_lowercase();
    value == "true" || value == "1" || value == "yes"
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKESCAN_BASE_NETWORK` -> `netlist.base_network`
/// - `SPIKESCAN_LOG_LEVEL` -> `logging.level`
/// - `SPIKESCAN_STRICT_SHAPE` -> `encoder.strict_shape`
pub fn apply_environment_overrides(config: &mut SpikescanConfig) {
    if let Ok(value) = env::var("SPIKESCAN_BASE_NETWORK") {
        config.netlist.base_network = value;
    }
    if let Ok(value) = env::var("SPIKESCAN_LOG_LEVEL") {
        config.logging.level = value;
    }
    if let Ok(value) = env::var("SPIKESCAN_STRICT_SHAPE") {
        config.encoder.strict_shape = parse_flag(&value);
    }
}

/// Apply CLI argument overrides to configuration
///
/// Recognised keys: `epsilon`, `epsilon_t`, `min_pts`, `base_network`,
/// `strict_shape`, `format`, `log_level`. Values that fail to parse are ignored.
pub fn apply_cli_overrides(config: &mut SpikescanConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("epsilon") {
        if let Ok(epsilon) = value.parse::<u32>() {
            config.window.epsilon = epsilon;
        }
    }
    if let Some(value) = cli_args.get("epsilon_t") {
        if let Ok(epsilon_t) = value.parse::<u32>() {
            config.window.epsilon_t = epsilon_t;
        }
    }
    if let Some(value) = cli_args.get("min_pts") {
        if let Ok(min_pts) = value.parse::<u32>() {
            config.window.min_pts = min_pts;
        }
    }
    if let Some(value) = cli_args.get("base_network") {
        config.netlist.base_network = value.clone();
    }
    if let Some(value) = cli_args.get("strict_shape") {
        config.encoder.strict_shape = parse_flag(value);
    }
    if let Some(value) = cli_args.get("format") {
        config.encoder.format = value.clone();
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}
