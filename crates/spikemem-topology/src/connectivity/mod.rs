// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectivity: rules that generate edges, and synapse groups that carry them.
*/

pub mod rules;
pub mod synapse_group;

pub use rules::{ConnectionRule, DecoderPart, EdgeSet};
pub use synapse_group::{
    check_port_compatibility, resolve_synapse_settings, ResolvedGroup, SynapseGroupRecord,
    SynapseSettings, WeightScale,
};
