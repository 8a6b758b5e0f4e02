// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikemem Plasticity
//!
//! Spike-timing-dependent plasticity for plastic synapse groups. Storage in
//! a memory circuit is nothing but the accumulated weight state these rules
//! produce.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod rule;
pub mod stdp;

pub use rule::{apply_spike_pairs, PlasticityRule, SpikePairRule, SpikeTiming};
pub use stdp::StdpParameters;
