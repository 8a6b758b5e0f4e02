// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! The simulation engine a circuit is assembled into
//!
//! A circuit never integrates a membrane or delivers a spike itself. It only
//! creates populations and synapse groups through this trait; whatever
//! implements it owns time, event scheduling, and plasticity execution.

use core::ops::Range;

use spikemem_npu_neural::{Edge, IfCurrExpParameters, InitialState, ListEdge, ReceptorChannel};

use super::handles::{PopulationHandle, PopulationView, SynapseGroupHandle};
use super::kind::SynapseKind;
use crate::error::EngineResult;

/// Collaborator contract of a spiking simulation engine
///
/// # Example
///
/// ```ignore
/// let cue = engine.create_population("cue", 5, &IfCurrExpParameters::default())?;
/// let content = engine.create_population("content", 10, &IfCurrExpParameters::default())?;
/// let edges: Vec<Edge> = all_to_all(5, 10);
/// engine.connect(cue.full_view(), content.full_view(), &edges, &kind, ReceptorChannel::Excitatory)?;
/// ```
pub trait SimulationEngine {
    /// Engine name for logging/debugging
    fn engine_name(&self) -> &'static str;

    /// Step length in ms; also the shortest delay the engine accepts
    fn timestep_ms(&self) -> f32;

    /// Create a population of IF_curr_exp neurons
    fn create_population(
        &mut self,
        label: &str,
        size: usize,
        params: &IfCurrExpParameters,
    ) -> EngineResult<PopulationHandle>;

    /// Create an external input population that emits caller-scheduled spikes
    fn create_spike_source(&mut self, label: &str, size: usize) -> EngineResult<PopulationHandle>;

    /// Set the membrane potential every neuron of `population` starts from
    fn set_initial_state(
        &mut self,
        population: PopulationHandle,
        state: &InitialState,
    ) -> EngineResult<()>;

    /// Address a sub-range of a population
    fn population_view(
        &self,
        population: PopulationHandle,
        range: Range<usize>,
    ) -> EngineResult<PopulationView>;

    /// Create a synapse group.
    ///
    /// Edge indices are relative to `src` and `dst`. An edge's own weight or
    /// delay overrides the defaults of `kind`.
    fn connect(
        &mut self,
        src: PopulationView,
        dst: PopulationView,
        edges: &[Edge],
        kind: &SynapseKind,
        receptor: ReceptorChannel,
    ) -> EngineResult<SynapseGroupHandle>;

    /// Current weights of a group as explicit edges, in edge order
    fn snapshot_weights(&self, group: SynapseGroupHandle) -> EngineResult<Vec<ListEdge>>;

    fn population_count(&self) -> usize;

    fn synapse_group_count(&self) -> usize;
}
