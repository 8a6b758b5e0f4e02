// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Dynamics
//!
//! Per-step membrane update of one population.
//!
//! ## Algorithm:
//! 1. Refractory neurons count down, hold at `v_reset` and drop their input
//! 2. Everyone else leaks towards `v_rest` and integrates the delivered jumps
//! 3. Threshold check, reset, refractory countdown

use std::sync::OnceLock;

use spikemem_npu_neural::{IfCurrExpModel, NeuronModel};
use tracing::trace;

use crate::neuron_array::{PopulationKind, PopulationState};

/// Runtime-gated tracing config for neural dynamics.
/// Enable with:
/// - SPIKEMEM_ENGINE_TRACE_DYNAMICS=1
///   Optional filter:
/// - SPIKEMEM_ENGINE_TRACE_POPULATION=<u32 population id>
struct DynamicsTraceCfg {
    enabled: bool,
    population_filter: Option<u32>,
}

fn dynamics_trace_cfg() -> &'static DynamicsTraceCfg {
    static CFG: OnceLock<DynamicsTraceCfg> = OnceLock::new();
    CFG.get_or_init(|| {
        let enabled = std::env::var("SPIKEMEM_ENGINE_TRACE_DYNAMICS")
            .ok()
            .as_deref()
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let population_filter = std::env::var("SPIKEMEM_ENGINE_TRACE_POPULATION")
            .ok()
            .and_then(|v| v.parse().ok());

        DynamicsTraceCfg {
            enabled,
            population_filter,
        }
    })
}

/// Result of one population update
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DynamicsResult {
    pub neurons_processed: usize,
    pub neurons_fired: usize,
    pub neurons_in_refractory: usize,
}

/// Advance every neuron of `population` by one step.
///
/// Sets `population.fired` for the step; spike sources emit the spikes
/// scheduled for `step`.
pub fn process_neural_dynamics(
    model: &IfCurrExpModel,
    population: &mut PopulationState,
    step: u64,
    dt: f32,
) -> DynamicsResult {
    population.fired.fill(false);
    let mut result = DynamicsResult {
        neurons_processed: population.size,
        ..Default::default()
    };

    match &mut population.kind {
        PopulationKind::SpikeSource { scheduled } => {
            if let Some(indices) = scheduled.remove(&step) {
                for i in indices {
                    population.fired[i] = true;
                }
            }
        }
        PopulationKind::Neurons {
            params,
            membrane_potentials,
            refractory_countdowns,
            synaptic_input,
        } => {
            for i in 0..population.size {
                let input = std::mem::take(&mut synaptic_input[i]);

                if refractory_countdowns[i] > 0 {
                    refractory_countdowns[i] -= 1;
                    membrane_potentials[i] = params.v_reset;
                    result.neurons_in_refractory += 1;
                    continue;
                }

                let v = model.update_membrane_potential(membrane_potentials[i], input, params, dt);
                if model.should_fire(v, params, refractory_countdowns[i]) {
                    population.fired[i] = true;
                    membrane_potentials[i] = model.reset_after_fire(params);
                    refractory_countdowns[i] = model.refractory_steps(params, dt);
                } else {
                    membrane_potentials[i] = v;
                }
            }
        }
    }

    result.neurons_fired = population.fired.iter().filter(|&&f| f).count();

    let cfg = dynamics_trace_cfg();
    if cfg.enabled && cfg.population_filter.map_or(true, |p| p == population.id.0) {
        trace!(
            "[DYNAMICS] step={} population={} ({}) fired={:?} refractory={}",
            step,
            population.id,
            population.label,
            population.fired_indices().collect::<Vec<_>>(),
            result.neurons_in_refractory
        );
    }

    result
}
