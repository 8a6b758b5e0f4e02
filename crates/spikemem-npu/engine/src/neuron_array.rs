// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Per-population neuron state (Structure-of-Arrays)

use std::collections::BTreeMap;

use spikemem_npu_neural::{IfCurrExpParameters, PopulationId};

/// What drives a population's spikes
#[derive(Debug, Clone)]
pub enum PopulationKind {
    /// IF_curr_exp neurons with shared parameters
    Neurons {
        params: IfCurrExpParameters,
        membrane_potentials: Vec<f32>,
        refractory_countdowns: Vec<u16>,
        /// Summed membrane jumps delivered this step
        synaptic_input: Vec<f32>,
    },
    /// External input that emits exactly what the caller scheduled
    SpikeSource {
        scheduled: BTreeMap<u64, Vec<usize>>,
    },
}

/// One population inside the engine
#[derive(Debug, Clone)]
pub struct PopulationState {
    pub id: PopulationId,
    pub label: String,
    pub size: usize,
    pub kind: PopulationKind,
    /// Spiked in the step being processed
    pub fired: Vec<bool>,
    /// Time (ms) of each neuron's most recent spike in an earlier step
    pub last_spike_ms: Vec<Option<f32>>,
}

impl PopulationState {
    pub fn neurons(id: PopulationId, label: &str, size: usize, params: IfCurrExpParameters) -> Self {
        Self {
            id,
            label: label.to_string(),
            size,
            kind: PopulationKind::Neurons {
                params,
                membrane_potentials: vec![params.v_rest; size],
                refractory_countdowns: vec![0; size],
                synaptic_input: vec![0.0; size],
            },
            fired: vec![false; size],
            last_spike_ms: vec![None; size],
        }
    }

    pub fn spike_source(id: PopulationId, label: &str, size: usize) -> Self {
        Self {
            id,
            label: label.to_string(),
            size,
            kind: PopulationKind::SpikeSource {
                scheduled: BTreeMap::new(),
            },
            fired: vec![false; size],
            last_spike_ms: vec![None; size],
        }
    }

    pub fn is_spike_source(&self) -> bool {
        matches!(self.kind, PopulationKind::SpikeSource { .. })
    }

    pub fn params(&self) -> Option<&IfCurrExpParameters> {
        match &self.kind {
            PopulationKind::Neurons { params, .. } => Some(params),
            PopulationKind::SpikeSource { .. } => None,
        }
    }

    pub fn membrane_potentials(&self) -> Option<&[f32]> {
        match &self.kind {
            PopulationKind::Neurons {
                membrane_potentials, ..
            } => Some(membrane_potentials),
            PopulationKind::SpikeSource { .. } => None,
        }
    }

    /// Overwrite every membrane potential; no-op for spike sources
    pub fn set_membrane_potential(&mut self, v: f32) {
        if let PopulationKind::Neurons {
            membrane_potentials, ..
        } = &mut self.kind
        {
            membrane_potentials.fill(v);
        }
    }

    /// Add a delivered membrane jump to neuron `index`
    #[inline]
    pub fn deliver(&mut self, index: usize, dv: f32) {
        if let PopulationKind::Neurons { synaptic_input, .. } = &mut self.kind {
            synaptic_input[index] += dv;
        }
    }

    /// Indices spiking in the step being processed, ascending
    pub fn fired_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.fired
            .iter()
            .enumerate()
            .filter_map(|(i, &f)| f.then_some(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neurons_start_at_rest() {
        let params = IfCurrExpParameters::default();
        let pop = PopulationState::neurons(PopulationId(0), "cue", 4, params);
        assert_eq!(pop.membrane_potentials(), Some(&[-60.0; 4][..]));
        assert!(!pop.is_spike_source());
        assert_eq!(pop.fired_indices().count(), 0);
    }

    #[test]
    fn test_source_ignores_delivery() {
        let mut pop = PopulationState::spike_source(PopulationId(1), "input", 3);
        pop.deliver(0, 5.0);
        pop.set_membrane_potential(0.0);
        assert!(pop.is_spike_source());
        assert!(pop.params().is_none());
        assert!(pop.membrane_potentials().is_none());
    }

    #[test]
    fn test_fired_indices_ascending() {
        let mut pop = PopulationState::spike_source(PopulationId(1), "input", 5);
        pop.fired[3] = true;
        pop.fired[1] = true;
        assert_eq!(pop.fired_indices().collect::<Vec<_>>(), vec![1, 3]);
    }
}
