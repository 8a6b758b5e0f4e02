// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikemem-observability
//!
//! Logging setup shared by every spikemem crate, with per-crate debug flag
//! support.
//!
//! ## Features
//! - `file-logging`: additional combined log file per run (desktop only)

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod config;
pub mod init;

// Re-export commonly used items
pub use cli::*;
pub use config::*;
pub use init::*;

/// Known spikemem crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikemem",
    "spikemem-config",
    "spikemem-npu-neural",
    "spikemem-npu-plasticity",
    "spikemem-npu-runtime",
    "spikemem-npu-engine",
    "spikemem-topology",
];
