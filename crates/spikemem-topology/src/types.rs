// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Core types for circuit assembly.
*/

use spikemem_config::ConfigError;
use spikemem_npu_neural::{Polarity, ReceptorChannel};
use spikemem_npu_runtime::EngineError;

/// Result type for topology operations
pub type CircuitResult<T> = Result<T, CircuitError>;

/// Errors raised while assembling or wiring a circuit.
///
/// Everything except `Engine` is raised before the engine is touched.
#[derive(Debug, thiserror::Error)]
pub enum CircuitError {
    /// Missing or invalid parameter table entry
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Connectivity rule applied to incompatible population sizes
    #[error("Size mismatch for {rule}: source has {source_size} units, destination has {dest_size}")]
    SizeMismatch {
        rule: &'static str,
        source_size: usize,
        dest_size: usize,
    },

    /// Polarity of a synapse group does not match its receptor channel
    #[error("Port compatibility error on '{connection}': {polarity} synapses cannot bind the {receptor} receptor")]
    PortCompatibility {
        connection: String,
        polarity: Polarity,
        receptor: ReceptorChannel,
    },

    /// External I/O population width does not match the declared ports
    #[error("Range overflow on {side} ports: declared width {declared}, external population has {actual} units")]
    RangeOverflow {
        side: &'static str,
        declared: usize,
        actual: usize,
    },

    /// Weight snapshot could not be encoded or decoded
    #[error("Snapshot serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl CircuitError {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        CircuitError::Configuration(message.into())
    }
}
