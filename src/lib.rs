// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikemem - spiking associative memory circuits
//!
//! Hippocampus-inspired memories built from leaky integrate-and-fire
//! populations. A cue and a content pattern presented together are stored in
//! plastic synapses by spike-timing-dependent plasticity; presenting the cue
//! alone later recalls the content.
//!
//! ## Quick Start
//!
//! ```rust
//! use spikemem::prelude::*;
//!
//! let mut engine = ReferenceEngine::default();
//! let config = CircuitConfig::default(); // ca3_content_addressable, 5 cues, 10 content bits
//! let mut circuit = TopologyAssembler::for_variant(&config)?.assemble(&mut engine)?;
//!
//! let input = engine.create_spike_source("input", circuit.input_width())?;
//! circuit.connect_in(&mut engine, input)?;
//!
//! // cue 2 together with content {0, 1, 2}
//! engine.schedule_spikes(input, 0, &[2, 5, 6, 7])?;
//! engine.run(20);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: spikemem-config, spikemem-observability    │
//! │  (parameter tables, logging)                            │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  NPU: neural, plasticity, runtime, engine               │
//! │  (IF_curr_exp, STDP, engine contract, reference engine) │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Algorithms: spikemem-topology                          │
//! │  (connectivity rules, descriptors, assembler, I/O)      │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

// Re-export foundation
pub use spikemem_config as config;
pub use spikemem_observability as observability;

// Re-export NPU subsystem
pub use spikemem_npu_engine as engine;
pub use spikemem_npu_neural as neural;
pub use spikemem_npu_plasticity as plasticity;
pub use spikemem_npu_runtime as runtime;

// Re-export algorithms
pub use spikemem_topology as topology;

/// Install logging at the base level of the `[logging]` table.
///
/// `--debug-<crate>` flags and `SPIKEMEM_DEBUG` still raise individual crates
/// to debug. Keep the returned guard alive for as long as logs are written.
pub fn init_logging(config: &config::SpikememConfig) -> anyhow::Result<observability::LoggingGuard> {
    observability::init_logging_default(&config.logging.level)
}

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config, CircuitConfig, SpikememConfig};
    pub use crate::engine::ReferenceEngine;
    pub use crate::neural::{Edge, IfCurrExpParameters, InitialState, ListEdge, Polarity, ReceptorChannel};
    pub use crate::plasticity::StdpParameters;
    pub use crate::runtime::{PopulationHandle, SimulationEngine, SynapseGroupHandle, SynapseKind};
    pub use crate::topology::{
        Circuit, CircuitError, CircuitResult, MemorySnapshot, MemoryVariant, TopologyAssembler,
    };
}
