// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Core type definitions shared by the engine contract and the topology layer.

pub mod ids;
pub mod synapse_types;

// Re-export commonly used types
pub use ids::{PopulationId, SynapseGroupId};
pub use synapse_types::{Edge, ListEdge, Polarity, ReceptorChannel};
