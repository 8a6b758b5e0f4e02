// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikemem Configuration System
//!
//! Type-safe loader for the circuit parameter table with support for:
//! - TOML file parsing
//! - Environment variable overrides
//! - CLI argument overrides
//! - Layering a user table over a variant's built-in defaults
//!
//! ## Usage
//!
//! ```rust,no_run
//! use spikemem_config::{load_config, SpikememConfig};
//!
//! // Load configuration with automatic file discovery and overrides
//! let config = load_config(None, None).expect("Failed to load config");
//!
//! println!("Variant: {}", config.circuit.variant);
//! println!("Cue size: {}", config.circuit.cue_size);
//! ```
//!
//! The parameter table is keyed by population name (`[neurons.<name>]`,
//! `[initial_state.<name>]`) and by connection name
//! (`[synapses."<src>-<dst>"]`). Individual fields stay optional at parse
//! time; the topology assembler decides which ones a given circuit requires.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{
    apply_cli_overrides, apply_environment_overrides, find_config_file, load_config,
    parse_config_str,
};

pub use types::*;
pub use validation::{validate_circuit_config, validate_config, ConfigValidationError};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found. Searched: {0}")]
    FileNotFound(String),

    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Invalid parameter table: {0}")]
    ParseError(String),

    #[error("{0}")]
    ValidationError(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;
