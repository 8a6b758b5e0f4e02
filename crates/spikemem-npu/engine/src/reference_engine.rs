// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The reference engine: deterministic, single-threaded, discrete time.
//!
//! Per step, in order:
//! 1. deliver the events due this step
//! 2. update populations in creation order
//! 3. apply plasticity, plastic groups in creation order
//! 4. record spikes and spike times
//! 5. enqueue outgoing events with the current weights

use std::collections::BTreeSet;
use std::ops::Range;

use spikemem_npu_neural::{
    Edge, IfCurrExpModel, IfCurrExpParameters, InitialState, ListEdge, ModelParameters,
    PopulationId, ReceptorChannel, SynapseGroupId,
};
use spikemem_npu_runtime::{
    EngineError, EngineResult, PopulationHandle, PopulationView, SimulationEngine,
    SynapseGroupHandle, SynapseKind,
};
use tracing::{debug, trace};

use crate::fire_ledger::FireLedger;
use crate::neural_dynamics::process_neural_dynamics;
use crate::neuron_array::{PopulationKind, PopulationState};
use crate::synaptic_propagation::{EventQueue, SynapseGroupState};

/// Counters accumulated over the engine's lifetime
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EngineStats {
    pub steps_run: u64,
    pub spikes_emitted: u64,
    pub events_delivered: u64,
    pub plasticity_updates: u64,
}

/// Deterministic discrete-time implementation of [`SimulationEngine`]
#[derive(Debug, Clone)]
pub struct ReferenceEngine {
    timestep_ms: f32,
    model: IfCurrExpModel,
    populations: Vec<PopulationState>,
    groups: Vec<SynapseGroupState>,
    queue: EventQueue,
    ledger: FireLedger,
    current_step: u64,
    stats: EngineStats,
}

impl Default for ReferenceEngine {
    fn default() -> Self {
        Self {
            timestep_ms: 1.0,
            model: IfCurrExpModel::new(),
            populations: Vec::new(),
            groups: Vec::new(),
            queue: EventQueue::default(),
            ledger: FireLedger::new(),
            current_step: 0,
            stats: EngineStats::default(),
        }
    }
}

impl ReferenceEngine {
    /// Create an empty engine with step length `timestep_ms`
    pub fn new(timestep_ms: f32) -> EngineResult<Self> {
        if !(timestep_ms > 0.0) || !timestep_ms.is_finite() {
            return Err(EngineError::InvalidParameters(format!(
                "time step must be a positive number of ms, got {}",
                timestep_ms
            )));
        }
        Ok(Self {
            timestep_ms,
            ..Default::default()
        })
    }

    /// The step that the next call to [`step`](Self::step) simulates
    pub fn current_step(&self) -> u64 {
        self.current_step
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    pub fn pending_events(&self) -> usize {
        self.queue.pending()
    }

    /// Make a spike source emit `indices` during `step`
    pub fn schedule_spikes(
        &mut self,
        source: PopulationHandle,
        step: u64,
        indices: &[usize],
    ) -> EngineResult<()> {
        if step < self.current_step {
            return Err(EngineError::InvalidParameters(format!(
                "step {} has already been simulated (current step {})",
                step, self.current_step
            )));
        }
        let population = self.population_state_mut(source.id)?;
        let size = population.size;
        let id = population.id;
        let PopulationKind::SpikeSource { scheduled } = &mut population.kind else {
            return Err(EngineError::NotASpikeSource(id));
        };
        if let Some(&index) = indices.iter().find(|&&i| i >= size) {
            return Err(EngineError::IndexOutOfRange {
                population: id,
                index,
                size,
            });
        }
        let slot = scheduled.entry(step).or_default();
        slot.extend_from_slice(indices);
        slot.sort_unstable();
        slot.dedup();
        Ok(())
    }

    /// Simulate `steps` consecutive steps
    pub fn run(&mut self, steps: u64) {
        for _ in 0..steps {
            self.step();
        }
    }

    /// Simulate one step
    pub fn step(&mut self) {
        let t = self.current_step;
        let now_ms = t as f32 * self.timestep_ms;

        // 1. deliver
        let due = self.queue.take_due(t);
        self.stats.events_delivered += due.len() as u64;
        for event in due {
            self.populations[event.population].deliver(event.neuron, event.dv);
        }

        // 2. neuron update
        let mut fired_total = 0;
        for population in &mut self.populations {
            fired_total += process_neural_dynamics(&self.model, population, t, self.timestep_ms).neurons_fired;
        }
        self.stats.spikes_emitted += fired_total as u64;

        // 3. plasticity
        for group in self.groups.iter_mut().filter(|g| g.is_plastic()) {
            self.stats.plasticity_updates += group.apply_plasticity(&self.populations, now_ms) as u64;
        }

        // 4. record
        for (index, population) in self.populations.iter_mut().enumerate() {
            self.ledger.archive_step(index, t, population.fired_indices());
            for i in 0..population.size {
                if population.fired[i] {
                    population.last_spike_ms[i] = Some(now_ms);
                }
            }
        }

        // 5. schedule
        if fired_total > 0 {
            for group in &self.groups {
                let source = &self.populations[group.src.population.0 as usize];
                let Some(target_params) = self.populations[group.dst.population.0 as usize].params() else {
                    continue;
                };
                group.propagate(source, target_params, &self.model, t, &mut self.queue);
            }
        }

        if fired_total > 0 {
            trace!(step = t, spikes = fired_total, pending = self.queue.pending(), "Step complete");
        }
        self.current_step += 1;
        self.stats.steps_run += 1;
    }

    /// Every `(step, index)` spike of a population so far
    pub fn spikes(&self, population: PopulationHandle) -> EngineResult<&[(u64, usize)]> {
        self.population_state(population.id)?;
        self.ledger
            .spikes(population.id.0 as usize)
            .ok_or(EngineError::UnknownPopulation(population.id))
    }

    /// Distinct indices of a population that fired during `steps`
    pub fn fired_indices(
        &self,
        population: PopulationHandle,
        steps: Range<u64>,
    ) -> EngineResult<BTreeSet<usize>> {
        self.population_state(population.id)?;
        self.ledger
            .fired_between(population.id.0 as usize, steps)
            .ok_or(EngineError::UnknownPopulation(population.id))
    }

    /// Forget recorded spikes (weights, membranes and pending events are kept)
    pub fn clear_spike_record(&mut self) {
        self.ledger.clear();
    }

    pub fn membrane_potentials(&self, population: PopulationHandle) -> EngineResult<&[f32]> {
        let state = self.population_state(population.id)?;
        state
            .membrane_potentials()
            .ok_or(EngineError::NotReceptive(population.id))
    }

    /// Current weights of a group, in edge order
    pub fn weights(&self, group: SynapseGroupHandle) -> EngineResult<&[f32]> {
        Ok(&self.group_state(group.id)?.weights)
    }

    /// `(src, dst)` pairs of a group, relative to its views, in edge order
    pub fn edges(&self, group: SynapseGroupHandle) -> EngineResult<&[(usize, usize)]> {
        Ok(&self.group_state(group.id)?.edges)
    }

    pub fn population_label(&self, population: PopulationHandle) -> EngineResult<&str> {
        Ok(&self.population_state(population.id)?.label)
    }

    fn population_state(&self, id: PopulationId) -> EngineResult<&PopulationState> {
        self.populations
            .get(id.0 as usize)
            .ok_or(EngineError::UnknownPopulation(id))
    }

    fn population_state_mut(&mut self, id: PopulationId) -> EngineResult<&mut PopulationState> {
        self.populations
            .get_mut(id.0 as usize)
            .ok_or(EngineError::UnknownPopulation(id))
    }

    fn group_state(&self, id: SynapseGroupId) -> EngineResult<&SynapseGroupState> {
        self.groups
            .get(id.0 as usize)
            .ok_or(EngineError::UnknownSynapseGroup(id))
    }

    fn check_view(&self, view: &PopulationView) -> EngineResult<&PopulationState> {
        let state = self.population_state(view.population)?;
        if view.start + view.len > state.size {
            return Err(EngineError::ViewOutOfRange {
                population: view.population,
                start: view.start,
                end: view.start + view.len,
                size: state.size,
            });
        }
        Ok(state)
    }

    fn next_population_id(&self) -> PopulationId {
        PopulationId(self.populations.len() as u32)
    }
}

impl SimulationEngine for ReferenceEngine {
    fn engine_name(&self) -> &'static str {
        "spikemem reference engine"
    }

    fn timestep_ms(&self) -> f32 {
        self.timestep_ms
    }

    fn create_population(
        &mut self,
        label: &str,
        size: usize,
        params: &IfCurrExpParameters,
    ) -> EngineResult<PopulationHandle> {
        if size == 0 {
            return Err(EngineError::InvalidParameters(format!(
                "population '{}' must have at least one neuron",
                label
            )));
        }
        params
            .validate()
            .map_err(|e| EngineError::InvalidParameters(format!("{} ({})", e, label)))?;

        let id = self.next_population_id();
        self.populations
            .push(PopulationState::neurons(id, label, size, *params));
        self.ledger.track_population();
        debug!(population = %id, label, size, "Created population");
        Ok(PopulationHandle { id, size })
    }

    fn create_spike_source(&mut self, label: &str, size: usize) -> EngineResult<PopulationHandle> {
        if size == 0 {
            return Err(EngineError::InvalidParameters(format!(
                "spike source '{}' must have at least one unit",
                label
            )));
        }
        let id = self.next_population_id();
        self.populations
            .push(PopulationState::spike_source(id, label, size));
        self.ledger.track_population();
        debug!(population = %id, label, size, "Created spike source");
        Ok(PopulationHandle { id, size })
    }

    fn set_initial_state(
        &mut self,
        population: PopulationHandle,
        state: &InitialState,
    ) -> EngineResult<()> {
        let target = self.population_state_mut(population.id)?;
        if target.is_spike_source() {
            return Err(EngineError::NotReceptive(population.id));
        }
        target.set_membrane_potential(state.v_init);
        Ok(())
    }

    fn population_view(
        &self,
        population: PopulationHandle,
        range: Range<usize>,
    ) -> EngineResult<PopulationView> {
        let state = self.population_state(population.id)?;
        if range.start > range.end || range.end > state.size {
            return Err(EngineError::ViewOutOfRange {
                population: population.id,
                start: range.start,
                end: range.end,
                size: state.size,
            });
        }
        Ok(PopulationView {
            population: population.id,
            start: range.start,
            len: range.end - range.start,
        })
    }

    fn connect(
        &mut self,
        src: PopulationView,
        dst: PopulationView,
        edges: &[Edge],
        kind: &SynapseKind,
        receptor: ReceptorChannel,
    ) -> EngineResult<SynapseGroupHandle> {
        self.check_view(&src)?;
        if self.check_view(&dst)?.is_spike_source() {
            return Err(EngineError::NotReceptive(dst.population));
        }

        let id = SynapseGroupId(self.groups.len() as u32);
        let group = SynapseGroupState::new(id, src, dst, edges, *kind, receptor, self.timestep_ms)?;
        let handle = SynapseGroupHandle {
            id,
            edge_count: group.edges.len(),
            plastic: group.is_plastic(),
        };
        self.groups.push(group);
        Ok(handle)
    }

    fn snapshot_weights(&self, group: SynapseGroupHandle) -> EngineResult<Vec<ListEdge>> {
        Ok(self.group_state(group.id)?.snapshot())
    }

    fn population_count(&self) -> usize {
        self.populations.len()
    }

    fn synapse_group_count(&self) -> usize {
        self.groups.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikemem_npu_plasticity::StdpParameters;

    fn relay() -> SynapseKind {
        SynapseKind::Static {
            weight: 3.0,
            delay: 1.0,
        }
    }

    fn one_to_one(n: usize) -> Vec<Edge> {
        (0..n).map(|i| Edge::pair(i, i)).collect()
    }

    #[test]
    fn test_relay_fires_one_step_later() {
        let mut engine = ReferenceEngine::default();
        let input = engine.create_spike_source("input", 3).unwrap();
        let cue = engine
            .create_population("cue", 3, &IfCurrExpParameters::default())
            .unwrap();
        engine
            .connect(input.full_view(), cue.full_view(), &one_to_one(3), &relay(), ReceptorChannel::Excitatory)
            .unwrap();

        engine.schedule_spikes(input, 2, &[1]).unwrap();
        engine.run(5);

        assert_eq!(engine.spikes(input).unwrap(), &[(2, 1)]);
        assert_eq!(engine.spikes(cue).unwrap(), &[(3, 1)]);
        assert_eq!(engine.current_step(), 5);
        assert_eq!(engine.stats().events_delivered, 1);
    }

    #[test]
    fn test_inhibition_cancels_excitation() {
        let mut engine = ReferenceEngine::default();
        let input = engine.create_spike_source("input", 2).unwrap();
        let target = engine
            .create_population("target", 1, &IfCurrExpParameters::default())
            .unwrap();
        let exc_view = engine.population_view(input, 0..1).unwrap();
        let inh_view = engine.population_view(input, 1..2).unwrap();
        engine
            .connect(exc_view, target.full_view(), &[Edge::pair(0, 0)], &relay(), ReceptorChannel::Excitatory)
            .unwrap();
        engine
            .connect(inh_view, target.full_view(), &[Edge::pair(0, 0)], &relay(), ReceptorChannel::Inhibitory)
            .unwrap();

        engine.schedule_spikes(input, 0, &[0, 1]).unwrap();
        engine.run(3);
        assert!(engine.spikes(target).unwrap().is_empty());
    }

    #[test]
    fn test_coactivation_potentiates_plastic_group() {
        let mut engine = ReferenceEngine::default();
        let input = engine.create_spike_source("input", 2).unwrap();
        let pre = engine
            .create_population("pre", 1, &IfCurrExpParameters::default())
            .unwrap();
        let post = engine
            .create_population("post", 1, &IfCurrExpParameters::default())
            .unwrap();
        let to_pre = engine.population_view(input, 0..1).unwrap();
        let to_post = engine.population_view(input, 1..2).unwrap();
        engine
            .connect(to_pre, pre.full_view(), &[Edge::pair(0, 0)], &relay(), ReceptorChannel::Excitatory)
            .unwrap();
        engine
            .connect(to_post, post.full_view(), &[Edge::pair(0, 0)], &relay(), ReceptorChannel::Excitatory)
            .unwrap();
        let plastic = engine
            .connect(
                pre.full_view(),
                post.full_view(),
                &[Edge::pair(0, 0)],
                &SynapseKind::Plastic {
                    rule: StdpParameters::default(),
                    init_weight: 0.0,
                    delay: 1.0,
                },
                ReceptorChannel::Excitatory,
            )
            .unwrap();
        assert!(plastic.plastic);

        engine.schedule_spikes(input, 0, &[0, 1]).unwrap();
        engine.run(4);
        assert_eq!(engine.weights(plastic).unwrap(), &[2.0]);

        let snapshot = engine.snapshot_weights(plastic).unwrap();
        assert_eq!(snapshot, vec![ListEdge { src: 0, dst: 0, weight: 2.0, delay: 1.0 }]);
    }

    #[test]
    fn test_schedule_errors() {
        let mut engine = ReferenceEngine::default();
        let input = engine.create_spike_source("input", 2).unwrap();
        let cue = engine
            .create_population("cue", 2, &IfCurrExpParameters::default())
            .unwrap();

        assert!(matches!(
            engine.schedule_spikes(cue, 0, &[0]),
            Err(EngineError::NotASpikeSource(_))
        ));
        assert!(matches!(
            engine.schedule_spikes(input, 0, &[2]),
            Err(EngineError::IndexOutOfRange { index: 2, size: 2, .. })
        ));
        engine.run(3);
        assert!(matches!(
            engine.schedule_spikes(input, 1, &[0]),
            Err(EngineError::InvalidParameters(_))
        ));
    }

    #[test]
    fn test_contract_errors() {
        let mut engine = ReferenceEngine::default();
        let input = engine.create_spike_source("input", 4).unwrap();
        let cue = engine
            .create_population("cue", 2, &IfCurrExpParameters::default())
            .unwrap();

        assert!(matches!(
            engine.population_view(input, 2..5),
            Err(EngineError::ViewOutOfRange { end: 5, size: 4, .. })
        ));
        assert!(matches!(
            engine.connect(cue.full_view(), input.full_view(), &[], &relay(), ReceptorChannel::Excitatory),
            Err(EngineError::NotReceptive(_))
        ));
        assert!(matches!(
            engine.connect(
                input.full_view(),
                cue.full_view(),
                &[Edge::pair(0, 0)],
                &SynapseKind::Static { weight: 3.0, delay: 0.0 },
                ReceptorChannel::Excitatory
            ),
            Err(EngineError::InvalidDelay { .. })
        ));
        assert!(engine.create_population("empty", 0, &IfCurrExpParameters::default()).is_err());
        let bad = IfCurrExpParameters {
            tau_m: 0.0,
            ..Default::default()
        };
        assert!(engine.create_population("bad", 3, &bad).is_err());
        assert_eq!(engine.population_count(), 2);
        assert_eq!(engine.synapse_group_count(), 0);
        assert!(ReferenceEngine::new(0.0).is_err());
    }

    #[test]
    fn test_initial_state_sets_membrane() {
        let mut engine = ReferenceEngine::new(1.0).unwrap();
        let cue = engine
            .create_population("cue", 2, &IfCurrExpParameters::default())
            .unwrap();
        engine.set_initial_state(cue, &InitialState { v_init: -58.0 }).unwrap();
        assert_eq!(engine.membrane_potentials(cue).unwrap(), &[-58.0, -58.0]);
        assert_eq!(engine.population_label(cue).unwrap(), "cue");
    }
}
