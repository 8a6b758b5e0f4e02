// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikemem Neural Building Blocks
//!
//! Everything a simulation engine needs to know about single neurons and
//! single synapses:
//! - **Types**: population and synapse-group ids, polarity, receptor channels, edges
//! - **Synapse**: membrane jump of a delivered spike
//! - **Models**: the IF_curr_exp neuron model

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod models;
pub mod synapse;
pub mod types;

pub use models::{
    IfCurrExpModel, IfCurrExpParameters, InitialState, ModelParameters, NeuronModel, IF_CURR_EXP,
};
pub use synapse::{accumulate_contributions, compute_synaptic_contribution};
pub use types::{Edge, ListEdge, Polarity, PopulationId, ReceptorChannel, SynapseGroupId};
