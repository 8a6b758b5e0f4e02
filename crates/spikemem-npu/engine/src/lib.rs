// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikemem Reference Engine
//!
//! A deterministic discrete-time implementation of the
//! [`SimulationEngine`](spikemem_npu_runtime::SimulationEngine) contract,
//! used to run and test memory circuits.
//!
//! ## Architecture
//! - IF_curr_exp neurons stored per population as Structure-of-Arrays
//! - delayed events in a step-keyed queue
//! - spike-pair STDP applied per plastic group in a fixed order
//! - a fire ledger holding every emitted spike
//!
//! ## Tracing
//! `SPIKEMEM_ENGINE_TRACE_DYNAMICS=1` and `SPIKEMEM_ENGINE_TRACE_SYNAPSE=1`
//! emit per-step `trace!` records; see the module docs for filters.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod fire_ledger;
pub mod neural_dynamics;
pub mod neuron_array;
pub mod reference_engine;
pub mod synaptic_propagation;

pub use fire_ledger::FireLedger;
pub use neural_dynamics::{process_neural_dynamics, DynamicsResult};
pub use reference_engine::{EngineStats, ReferenceEngine};
pub use synaptic_propagation::{delay_to_steps, EventQueue, PendingEvent, SynapseGroupState};
