// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Observability configuration types

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Base log level for crates without a debug flag (trace, debug, info, warn, error)
    pub level: String,

    /// Colourise console output
    pub ansi: bool,

    /// Base directory for run folders; only used with the `file-logging` feature
    pub log_dir: Option<PathBuf>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            ansi: true,
            log_dir: None,
        }
    }
}

impl ObservabilityConfig {
    /// Console-only configuration at the given level
    pub fn with_level(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }
}
