// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration file loading with override support
//!
//! This module implements the 3-tier configuration loading system:
//! 1. TOML file (base values)
//! 2. Environment variables (runtime overrides)
//! 3. CLI arguments (explicit user overrides)

use crate::{ConfigError, ConfigResult, SpikememConfig};
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const CONFIG_FILE_NAME: &str = "spikemem_configuration.toml";

/// Find the spikemem configuration file
///
/// Search order:
/// 1. `SPIKEMEM_CONFIG_PATH` environment variable
/// 2. Current working directory: `./spikemem_configuration.toml`
/// 3. Up to 5 parent directories
///
/// # Errors
///
/// Returns `ConfigError::FileNotFound` if no config file is found in any location
pub fn find_config_file() -> ConfigResult<PathBuf> {
    if let Ok(env_path) = env::var("SPIKEMEM_CONFIG_PATH") {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return Ok(path);
        }
        return Err(ConfigError::FileNotFound(format!(
            "Config file specified by SPIKEMEM_CONFIG_PATH not found: {}",
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

    if let Some(found) = search_paths.iter().find(|p| p.exists()) {
        return Ok(found.clone());
    }

    let search_list = search_paths
        .iter()
        .map(|p| format!("  - {}", p.display()))
        .collect::<Vec<_>>()
        .join("\n");

    Err(ConfigError::FileNotFound(format!(
        "'{}' not found in any of these locations:\n{}\n\nSet SPIKEMEM_CONFIG_PATH to specify a custom location.",
        CONFIG_FILE_NAME, search_list
    )))
}

/// Parse a configuration document without touching the environment
pub fn parse_config_str(content: &str) -> ConfigResult<SpikememConfig> {
    Ok(toml::from_str(content)?)
}

/// Load configuration from a TOML file
///
/// # Arguments
///
/// * `config_path` - Optional path to config file. If `None`, will search for config file.
/// * `cli_args` - Optional CLI argument overrides
///
/// # Errors
///
/// Returns error if config file is not found or contains invalid TOML.
/// Semantic validation is left to [`crate::validate_config`].
pub fn load_config(
    config_path: Option<&Path>,
    cli_args: Option<&HashMap<String, String>>,
) -> ConfigResult<SpikememConfig> {
    let config_file = match config_path {
        Some(path) => path.to_path_buf(),
        None => find_config_file()?,
    };
    debug!(path = %config_file.display(), "Loading circuit configuration");

    let content = fs::read_to_string(&config_file)?;
    let mut config = parse_config_str(&content)?;

    apply_environment_overrides(&mut config);
    if let Some(cli) = cli_args {
        apply_cli_overrides(&mut config, cli);
    }

    Ok(config)
}

/// Apply environment variable overrides to configuration
///
/// Supported environment variables:
/// - `SPIKEMEM_TIMESTEP_MS` -> `simulation.timestep_ms`
/// - `SPIKEMEM_VARIANT` -> `circuit.variant`
/// - `SPIKEMEM_CUE_SIZE` -> `circuit.cue_size`
/// - `SPIKEMEM_CONTENT_SIZE` -> `circuit.content_size`
/// - `SPIKEMEM_LOG_LEVEL` -> `logging.level`
pub fn apply_environment_overrides(config: &mut SpikememConfig) {
    if let Ok(value) = env::var("SPIKEMEM_TIMESTEP_MS") {
        set_parsed(&mut config.simulation.timestep_ms, "SPIKEMEM_TIMESTEP_MS", &value);
    }
    if let Ok(value) = env::var("SPIKEMEM_VARIANT") {
        config.circuit.variant = value;
    }
    if let Ok(value) = env::var("SPIKEMEM_CUE_SIZE") {
        set_parsed(&mut config.circuit.cue_size, "SPIKEMEM_CUE_SIZE", &value);
    }
    if let Ok(value) = env::var("SPIKEMEM_CONTENT_SIZE") {
        set_parsed(&mut config.circuit.content_size, "SPIKEMEM_CONTENT_SIZE", &value);
    }
    if let Ok(value) = env::var("SPIKEMEM_LOG_LEVEL") {
        config.logging.level = value;
    }
}

/// Apply CLI argument overrides to configuration
///
/// # Arguments
///
/// * `config` - Configuration to modify
/// * `cli_args` - HashMap of CLI arguments (e.g., `{"cue_size": "8", "variant": "ca3"}`)
pub fn apply_cli_overrides(config: &mut SpikememConfig, cli_args: &HashMap<String, String>) {
    if let Some(value) = cli_args.get("timestep_ms") {
        set_parsed(&mut config.simulation.timestep_ms, "timestep_ms", value);
    }
    if let Some(value) = cli_args.get("variant") {
        config.circuit.variant = value.clone();
    }
    if let Some(value) = cli_args.get("cue_size") {
        set_parsed(&mut config.circuit.cue_size, "cue_size", value);
    }
    if let Some(value) = cli_args.get("content_size") {
        set_parsed(&mut config.circuit.content_size, "content_size", value);
    }
    if let Some(value) = cli_args.get("log_level") {
        config.logging.level = value.clone();
    }
}

fn set_parsed<T: std::str::FromStr>(slot: &mut T, key: &str, raw: &str) {
    match raw.trim().parse::<T>() {
        Ok(parsed) => *slot = parsed,
        Err(_) => warn!(key, value = raw, "Ignoring unparsable configuration override"),
    }
}
