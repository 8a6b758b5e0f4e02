// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Synaptic Propagation
//!
//! Synapse groups, their spike-pair plasticity, and the delayed event queue
//! that carries membrane jumps to their targets.
//!
//! Events are computed with the weight current at emission time and land
//! `delay` whole steps later.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use ahash::AHashMap;
use spikemem_npu_neural::{
    Edge, IfCurrExpModel, IfCurrExpParameters, ListEdge, NeuronModel, ReceptorChannel,
    SynapseGroupId,
};
use spikemem_npu_plasticity::{apply_spike_pairs, PlasticityRule, SpikePairRule, SpikeTiming};
use spikemem_npu_runtime::{EngineError, EngineResult, PopulationView, SynapseKind};
use tracing::{debug, trace};

use crate::neuron_array::PopulationState;

/// Runtime-gated tracing config for synaptic propagation.
/// Enable with:
/// - SPIKEMEM_ENGINE_TRACE_SYNAPSE=1
///   Optional filter:
/// - SPIKEMEM_ENGINE_TRACE_GROUP=<u32 synapse group id>
struct SynapseTraceCfg {
    enabled: bool,
    group_filter: Option<u32>,
}

fn synapse_trace_cfg() -> &'static SynapseTraceCfg {
    static CFG: OnceLock<SynapseTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("SPIKEMEM_ENGINE_TRACE_SYNAPSE")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let group_filter = std::env::var("SPIKEMEM_ENGINE_TRACE_GROUP")
            .ok()
            .and_then(|v| v.parse().ok());

        SynapseTraceCfg {
            enabled,
            group_filter,
        }
    })
}

/// Synapse lookup index: view-relative source index → edge indices
pub type SynapseIndex = AHashMap<usize, Vec<usize>>;

/// Convert a delay in ms to whole steps (at least one)
pub fn delay_to_steps(delay_ms: f32, timestep_ms: f32) -> EngineResult<u64> {
    let steps = (delay_ms / timestep_ms).round();
    if !steps.is_finite() || steps < 1.0 {
        return Err(EngineError::InvalidDelay {
            delay_ms,
            timestep_ms,
        });
    }
    Ok(steps as u64)
}

/// A membrane jump in flight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEvent {
    /// Index of the target population in creation order
    pub population: usize,
    /// Absolute neuron index inside that population
    pub neuron: usize,
    pub dv: f32,
}

/// Events keyed by the step they are delivered in
#[derive(Debug, Clone, Default)]
pub struct EventQueue {
    events: BTreeMap<u64, Vec<PendingEvent>>,
}

impl EventQueue {
    pub fn push(&mut self, step: u64, event: PendingEvent) {
        self.events.entry(step).or_default().push(event);
    }

    /// Remove and return everything due at `step`
    pub fn take_due(&mut self, step: u64) -> Vec<PendingEvent> {
        self.events.remove(&step).unwrap_or_default()
    }

    pub fn pending(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// One synapse group inside the engine (Structure-of-Arrays, edge order)
#[derive(Debug, Clone)]
pub struct SynapseGroupState {
    pub id: SynapseGroupId,
    pub src: PopulationView,
    pub dst: PopulationView,
    pub receptor: ReceptorChannel,
    pub kind: SynapseKind,
    /// `(src, dst)` relative to the views, sorted by source then destination
    pub edges: Vec<(usize, usize)>,
    pub weights: Vec<f32>,
    pub delays_ms: Vec<f32>,
    pub delay_steps: Vec<u64>,
    rule: Option<SpikePairRule>,
    synapse_index: SynapseIndex,
}

impl SynapseGroupState {
    /// Resolve per-edge weights and delays and build the source index
    pub fn new(
        id: SynapseGroupId,
        src: PopulationView,
        dst: PopulationView,
        edges: &[Edge],
        kind: SynapseKind,
        receptor: ReceptorChannel,
        timestep_ms: f32,
    ) -> EngineResult<Self> {
        let rule = match kind.stdp() {
            Some(params) => {
                params
                    .validate()
                    .map_err(|e| EngineError::InvalidParameters(e.to_string()))?;
                Some(SpikePairRule::new(*params))
            }
            None => None,
        };

        let mut resolved = Vec::with_capacity(edges.len());
        for edge in edges {
            if edge.src >= src.len {
                return Err(EngineError::IndexOutOfRange {
                    population: src.population,
                    index: edge.src,
                    size: src.len,
                });
            }
            if edge.dst >= dst.len {
                return Err(EngineError::IndexOutOfRange {
                    population: dst.population,
                    index: edge.dst,
                    size: dst.len,
                });
            }
            let mut weight = edge.weight.unwrap_or_else(|| kind.default_weight());
            if !weight.is_finite() || weight < 0.0 {
                return Err(EngineError::InvalidParameters(format!(
                    "edge ({}, {}) has weight {}; weights are non-negative magnitudes",
                    edge.src, edge.dst, weight
                )));
            }
            if let Some(rule) = &rule {
                weight = rule.params().clamp(weight);
            }
            let delay_ms = edge.delay.unwrap_or_else(|| kind.default_delay());
            let steps = delay_to_steps(delay_ms, timestep_ms)?;
            resolved.push(((edge.src, edge.dst), weight, delay_ms, steps));
        }
        resolved.sort_by_key(|(pair, ..)| *pair);

        let mut group = Self {
            id,
            src,
            dst,
            receptor,
            kind,
            edges: Vec::with_capacity(resolved.len()),
            weights: Vec::with_capacity(resolved.len()),
            delays_ms: Vec::with_capacity(resolved.len()),
            delay_steps: Vec::with_capacity(resolved.len()),
            rule,
            synapse_index: SynapseIndex::new(),
        };
        for (pair, weight, delay_ms, steps) in resolved {
            group.synapse_index.entry(pair.0).or_default().push(group.edges.len());
            group.edges.push(pair);
            group.weights.push(weight);
            group.delays_ms.push(delay_ms);
            group.delay_steps.push(steps);
        }

        debug!(
            group = %id,
            edges = group.edges.len(),
            plastic = group.rule.is_some(),
            receptor = %receptor,
            "Created synapse group"
        );
        Ok(group)
    }

    pub fn is_plastic(&self) -> bool {
        self.rule.is_some()
    }

    /// Current weights as explicit edges, in edge order
    pub fn snapshot(&self) -> Vec<ListEdge> {
        self.edges
            .iter()
            .zip(&self.weights)
            .zip(&self.delays_ms)
            .map(|((&(src, dst), &weight), &delay)| ListEdge {
                src,
                dst,
                weight,
                delay,
            })
            .collect()
    }

    /// Run spike-pair plasticity for the step at `now_ms`
    ///
    /// `populations` must already carry this step's `fired` flags and the
    /// previous steps' spike times.
    pub fn apply_plasticity(&mut self, populations: &[PopulationState], now_ms: f32) -> usize {
        let Some(rule) = &self.rule else {
            return 0;
        };
        let pre = &populations[self.src.population.0 as usize];
        let post = &populations[self.dst.population.0 as usize];
        let timing = SpikeTiming {
            now_ms,
            pre_fired: &pre.fired[self.src.range()],
            post_fired: &post.fired[self.dst.range()],
            last_pre_ms: &pre.last_spike_ms[self.src.range()],
            last_post_ms: &post.last_spike_ms[self.dst.range()],
        };
        let updates = apply_spike_pairs(rule, &self.edges, &mut self.weights, &timing);

        let cfg = synapse_trace_cfg();
        if updates > 0 && cfg.enabled && cfg.group_filter.map_or(true, |g| g == self.id.0) {
            let (w_min, w_max) = rule.bounds();
            trace!(
                "[PLASTICITY] t={}ms group={} updates={} bounds=[{}, {}] weights={:?}",
                now_ms,
                self.id,
                updates,
                w_min,
                w_max,
                self.weights
            );
        }
        updates
    }

    /// Enqueue the jumps caused by this step's source spikes
    pub fn propagate(
        &self,
        source: &PopulationState,
        target_params: &IfCurrExpParameters,
        model: &IfCurrExpModel,
        step: u64,
        queue: &mut EventQueue,
    ) -> usize {
        let fired = &source.fired[self.src.range()];
        let target = self.dst.population.0 as usize;
        let mut emitted = 0;

        for (rel, _) in fired.iter().enumerate().filter(|&(_, &f)| f) {
            let Some(edge_indices) = self.synapse_index.get(&rel) else {
                continue;
            };
            for &e in edge_indices {
                let dv = model.compute_synaptic_contribution(self.weights[e], self.receptor, target_params);
                queue.push(
                    step + self.delay_steps[e],
                    PendingEvent {
                        population: target,
                        neuron: self.dst.absolute(self.edges[e].1),
                        dv,
                    },
                );
                emitted += 1;
            }
        }

        let cfg = synapse_trace_cfg();
        if emitted > 0 && cfg.enabled && cfg.group_filter.map_or(true, |g| g == self.id.0) {
            trace!("[SYNAPSE] step={} group={} events={}", step, self.id, emitted);
        }
        emitted
    }
}
