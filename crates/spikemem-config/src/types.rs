// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! This module defines all configuration structs that map to sections in
//! `spikemem_configuration.toml`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Memory variants the topology crate knows how to assemble
pub const KNOWN_VARIANTS: &[&str] = &["ca3_content_addressable", "ca3", "hippocampus_dg_ca1"];

/// Receptor channel names accepted in `[synapses.*]` tables
pub const KNOWN_RECEPTORS: &[&str] = &["excitatory", "inhibitory"];

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikememConfig {
    pub simulation: SimulationConfig,
    pub circuit: CircuitConfig,
    pub logging: LoggingConfig,
}

/// Discrete-time simulation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Engine time step in milliseconds; also the minimum synaptic delay
    pub timestep_ms: f32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { timestep_ms: 1.0 }
    }
}

/// Logging configuration, installed by `spikemem::init_logging`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default level for every crate without a debug flag (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// The parameter table of one memory circuit
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// Which topology descriptor to assemble (see [`KNOWN_VARIANTS`])
    pub variant: String,
    /// Number of storable cues (one-hot width of the cue populations)
    pub cue_size: usize,
    /// Width of the content pattern
    pub content_size: usize,
    /// Neuron-model parameters keyed by population name
    pub neurons: BTreeMap<String, NeuronParameterSet>,
    /// Initial membrane state keyed by population name
    pub initial_state: BTreeMap<String, InitialStateSet>,
    /// Synapse parameters keyed by connection name (`<src>-<dst>[-role]`)
    pub synapses: BTreeMap<String, SynapseParameterSet>,
}

impl Default for CircuitConfig {
    fn default() -> Self {
        Self {
            variant: "ca3_content_addressable".to_string(),
            cue_size: 5,
            content_size: 10,
            neurons: BTreeMap::new(),
            initial_state: BTreeMap::new(),
            synapses: BTreeMap::new(),
        }
    }
}

impl CircuitConfig {
    /// Layer this table over `defaults`, entry by entry and field by field.
    ///
    /// Scalar settings (`variant`, sizes) always come from `self`. For the keyed
    /// tables, a field present in `self` wins and a missing one falls back to the
    /// same entry in `defaults`.
    pub fn merged_over(&self, defaults: &CircuitConfig) -> CircuitConfig {
        CircuitConfig {
            variant: self.variant.clone(),
            cue_size: self.cue_size,
            content_size: self.content_size,
            neurons: merge_tables(&self.neurons, &defaults.neurons, NeuronParameterSet::overlay),
            initial_state: merge_tables(
                &self.initial_state,
                &defaults.initial_state,
                InitialStateSet::overlay,
            ),
            synapses: merge_tables(&self.synapses, &defaults.synapses, SynapseParameterSet::overlay),
        }
    }
}

fn merge_tables<T: Clone>(
    top: &BTreeMap<String, T>,
    base: &BTreeMap<String, T>,
    overlay: fn(&T, &T) -> T,
) -> BTreeMap<String, T> {
    let mut merged = base.clone();
    for (name, entry) in top {
        let value = match base.get(name) {
            Some(base_entry) => overlay(entry, base_entry),
            None => entry.clone(),
        };
        merged.insert(name.clone(), value);
    }
    merged
}

/// IF_curr_exp neuron parameters as written in the table.
///
/// Every field is optional here so that partial tables can be layered; the
/// assembler reports a configuration error for any field still missing.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct NeuronParameterSet {
    /// Neuron model name; only `IF_curr_exp` is supported
    pub model: Option<String>,
    pub cm: Option<f32>,
    pub i_offset: Option<f32>,
    pub tau_m: Option<f32>,
    pub tau_refrac: Option<f32>,
    #[serde(alias = "tau_syn_E")]
    pub tau_syn_e: Option<f32>,
    #[serde(alias = "tau_syn_I")]
    pub tau_syn_i: Option<f32>,
    pub v_reset: Option<f32>,
    pub v_rest: Option<f32>,
    pub v_thresh: Option<f32>,
}

impl NeuronParameterSet {
    /// Fill every missing field from `base`
    pub fn overlay(&self, base: &Self) -> Self {
        Self {
            model: self.model.clone().or_else(|| base.model.clone()),
            cm: self.cm.or(base.cm),
            i_offset: self.i_offset.or(base.i_offset),
            tau_m: self.tau_m.or(base.tau_m),
            tau_refrac: self.tau_refrac.or(base.tau_refrac),
            tau_syn_e: self.tau_syn_e.or(base.tau_syn_e),
            tau_syn_i: self.tau_syn_i.or(base.tau_syn_i),
            v_reset: self.v_reset.or(base.v_reset),
            v_rest: self.v_rest.or(base.v_rest),
            v_thresh: self.v_thresh.or(base.v_thresh),
        }
    }
}

/// Initial membrane state of a population
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InitialStateSet {
    #[serde(alias = "vInit")]
    pub v_init: Option<f32>,
}

impl InitialStateSet {
    pub fn overlay(&self, base: &Self) -> Self {
        Self {
            v_init: self.v_init.or(base.v_init),
        }
    }
}

/// Parameters of one synapse group.
///
/// `weight` is always a non-negative magnitude; the sign comes from the
/// receptor channel. The STDP fields are only read for plastic connections.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SynapseParameterSet {
    #[serde(alias = "initWeight")]
    pub weight: Option<f32>,
    pub delay: Option<f32>,
    #[serde(alias = "receptor_type")]
    pub receptor: Option<String>,
    pub tau_plus: Option<f32>,
    pub tau_minus: Option<f32>,
    #[serde(alias = "A_plus")]
    pub a_plus: Option<f32>,
    #[serde(alias = "A_minus")]
    pub a_minus: Option<f32>,
    pub w_min: Option<f32>,
    pub w_max: Option<f32>,
    /// Pre-loaded memory content; replaces the rule-generated edges of a plastic group
    pub initial_edges: Option<Vec<ListEdgeConfig>>,
}

impl SynapseParameterSet {
    pub fn overlay(&self, base: &Self) -> Self {
        Self {
            weight: self.weight.or(base.weight),
            delay: self.delay.or(base.delay),
            receptor: self.receptor.clone().or_else(|| base.receptor.clone()),
            tau_plus: self.tau_plus.or(base.tau_plus),
            tau_minus: self.tau_minus.or(base.tau_minus),
            a_plus: self.a_plus.or(base.a_plus),
            a_minus: self.a_minus.or(base.a_minus),
            w_min: self.w_min.or(base.w_min),
            w_max: self.w_max.or(base.w_max),
            initial_edges: self
                .initial_edges
                .clone()
                .or_else(|| base.initial_edges.clone()),
        }
    }
}

/// One explicit `(src, dst, weight, delay)` edge
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ListEdgeConfig {
    pub src: usize,
    pub dst: usize,
    pub weight: f32,
    pub delay: f32,
}
