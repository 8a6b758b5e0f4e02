// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Weight snapshots of plastic groups.

The weights of a running circuit live only in the engine. A snapshot copies
them out as explicit edges, and applying it to a parameter table turns them
into `initial_edges`, so a fresh circuit starts with the stored memory.
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spikemem_config::{CircuitConfig, ListEdgeConfig};
use spikemem_npu_neural::ListEdge;

use crate::types::CircuitResult;

/// Plastic weights of one circuit, keyed by synapse group name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MemorySnapshot {
    pub variant: String,
    pub groups: BTreeMap<String, Vec<ListEdge>>,
}

impl MemorySnapshot {
    pub fn new(variant: &str) -> Self {
        Self {
            variant: variant.to_string(),
            groups: BTreeMap::new(),
        }
    }

    /// Edges at or above `min_weight`, for inspecting what a group has learned
    pub fn strong_edges(&self, group: &str, min_weight: f32) -> Vec<ListEdge> {
        self.groups
            .get(group)
            .map(|edges| edges.iter().filter(|e| e.weight >= min_weight).copied().collect())
            .unwrap_or_default()
    }

    /// Write every group into `config` as its `initial_edges`
    pub fn apply_to(&self, config: &mut CircuitConfig) {
        for (name, edges) in &self.groups {
            let entry = config.synapses.entry(name.clone()).or_default();
            entry.initial_edges = Some(
                edges
                    .iter()
                    .map(|e| ListEdgeConfig {
                        src: e.src,
                        dst: e.dst,
                        weight: e.weight,
                        delay: e.delay,
                    })
                    .collect(),
            );
        }
    }

    pub fn to_json(&self) -> CircuitResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> CircuitResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
