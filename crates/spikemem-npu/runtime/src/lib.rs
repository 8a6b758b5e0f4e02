// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikemem Runtime Contract
//!
//! The interface between a memory circuit and the spiking engine that runs
//! it. Topology code is written against [`SimulationEngine`] only, so any
//! event-driven engine that honours the contract can host a circuit.
//!
//! ## Contract summary
//! - populations are created once and never resized
//! - views address contiguous sub-ranges for port wiring
//! - synapse groups are static or plastic; plastic weights stay inside
//!   the bounds of their STDP parameters
//! - weight state leaves the engine only through explicit snapshots

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod error;
pub mod traits;

pub use error::{EngineError, EngineResult};
pub use traits::{
    PopulationHandle, PopulationView, SimulationEngine, SynapseGroupHandle, SynapseKind,
};
