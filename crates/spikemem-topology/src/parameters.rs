// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Neuron parameter resolution.

A population's entry in the parameter table is layered over the table's
`default` entry; every IF_curr_exp field must be present after layering.
*/

use spikemem_config::{CircuitConfig, InitialStateSet, NeuronParameterSet};
use spikemem_npu_neural::{IfCurrExpParameters, InitialState, ModelParameters, IF_CURR_EXP};

use crate::types::{CircuitError, CircuitResult};

/// Table entry every population falls back to
pub const DEFAULT_ENTRY: &str = "default";

/// Neuron parameters of `population`
///
/// # Errors
///
/// `Configuration` if a field is missing after layering, the model is not
/// IF_curr_exp, or the parameters do not validate.
pub fn resolve_neuron_parameters(
    circuit: &CircuitConfig,
    population: &str,
) -> CircuitResult<IfCurrExpParameters> {
    let layered = layered_entry(&circuit.neurons, population, NeuronParameterSet::overlay);

    if let Some(model) = &layered.model {
        if model != IF_CURR_EXP {
            return Err(CircuitError::configuration(format!(
                "neurons.{}.model '{}' is not supported (expected {})",
                population, model, IF_CURR_EXP
            )));
        }
    }

    let required = |value: Option<f32>, field: &str| {
        value.ok_or_else(|| {
            CircuitError::configuration(format!("neurons.{}.{} is missing", population, field))
        })
    };
    let params = IfCurrExpParameters {
        cm: required(layered.cm, "cm")?,
        i_offset: required(layered.i_offset, "i_offset")?,
        tau_m: required(layered.tau_m, "tau_m")?,
        tau_refrac: required(layered.tau_refrac, "tau_refrac")?,
        tau_syn_e: required(layered.tau_syn_e, "tau_syn_e")?,
        tau_syn_i: required(layered.tau_syn_i, "tau_syn_i")?,
        v_reset: required(layered.v_reset, "v_reset")?,
        v_rest: required(layered.v_rest, "v_rest")?,
        v_thresh: required(layered.v_thresh, "v_thresh")?,
    };
    params
        .validate()
        .map_err(|e| CircuitError::configuration(format!("neurons.{}: {}", population, e)))?;
    Ok(params)
}

/// Initial membrane state of `population`; starts at rest when no `v_init` is given
pub fn resolve_initial_state(
    circuit: &CircuitConfig,
    population: &str,
    params: &IfCurrExpParameters,
) -> InitialState {
    let layered = layered_entry(&circuit.initial_state, population, InitialStateSet::overlay);
    InitialState {
        v_init: layered.v_init.unwrap_or(params.v_rest),
    }
}

fn layered_entry<T: Clone + Default>(
    table: &std::collections::BTreeMap<String, T>,
    name: &str,
    overlay: fn(&T, &T) -> T,
) -> T {
    match (table.get(name), table.get(DEFAULT_ENTRY)) {
        (Some(entry), Some(base)) => overlay(entry, base),
        (Some(entry), None) => entry.clone(),
        (None, Some(base)) => base.clone(),
        (None, None) => T::default(),
    }
}
