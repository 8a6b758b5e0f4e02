// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for engine operations

use spikemem_npu_neural::{PopulationId, SynapseGroupId};
use thiserror::Error;

/// Engine errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error("Unknown population: {0}")]
    UnknownPopulation(PopulationId),

    #[error("Unknown synapse group: {0}")]
    UnknownSynapseGroup(SynapseGroupId),

    #[error("Index {index} out of range for {population} (size {size})")]
    IndexOutOfRange {
        population: PopulationId,
        index: usize,
        size: usize,
    },

    #[error("View {start}..{end} exceeds {population} (size {size})")]
    ViewOutOfRange {
        population: PopulationId,
        start: usize,
        end: usize,
        size: usize,
    },

    #[error("Invalid delay {delay_ms} ms: the minimum is one time step ({timestep_ms} ms)")]
    InvalidDelay { delay_ms: f32, timestep_ms: f32 },

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("{0} is a spike source and has no receptors")]
    NotReceptive(PopulationId),

    #[error("{0} is not a spike source")]
    NotASpikeSource(PopulationId),
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
