// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration validation
//!
//! Checks the values that are present in the table. Whether a field is
//! *required* depends on the circuit being assembled, so absent fields are
//! reported later by the assembler rather than here.

use crate::{
    CircuitConfig, ConfigError, ConfigResult, NeuronParameterSet, SpikememConfig,
    SynapseParameterSet, KNOWN_RECEPTORS, KNOWN_VARIANTS,
};

/// Validation errors that can occur during config validation
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    MissingRequired { field: String },
    InvalidValue { field: String, reason: String },
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequired { field } => {
                write!(f, "Missing required configuration: {}", field)
            }
            Self::InvalidValue { field, reason } => {
                write!(f, "Invalid configuration value for {}: {}", field, reason)
            }
        }
    }
}

/// Validate the complete configuration
///
/// # Errors
///
/// Returns `ConfigError::ValidationError` listing every violation found
pub fn validate_config(config: &SpikememConfig) -> ConfigResult<()> {
    let mut errors = Vec::new();

    if !(config.simulation.timestep_ms > 0.0) {
        errors.push(invalid(
            "simulation.timestep_ms",
            format!("must be > 0, got {}", config.simulation.timestep_ms),
        ));
    }
    collect_circuit_errors(&config.circuit, config.simulation.timestep_ms, &mut errors);

    into_result(errors)
}

/// Validate only the circuit table against a given time step
pub fn validate_circuit_config(circuit: &CircuitConfig, timestep_ms: f32) -> ConfigResult<()> {
    let mut errors = Vec::new();
    collect_circuit_errors(circuit, timestep_ms, &mut errors);
    into_result(errors)
}

fn into_result(errors: Vec<ConfigValidationError>) -> ConfigResult<()> {
    if errors.is_empty() {
        return Ok(());
    }
    let error_messages = errors
        .iter()
        .map(|e| format!("  - {}", e))
        .collect::<Vec<_>>()
        .join("\n");
    Err(ConfigError::ValidationError(format!(
        "Configuration validation failed:\n{}",
        error_messages
    )))
}

fn invalid(field: impl Into<String>, reason: impl Into<String>) -> ConfigValidationError {
    ConfigValidationError::InvalidValue {
        field: field.into(),
        reason: reason.into(),
    }
}

fn collect_circuit_errors(
    circuit: &CircuitConfig,
    timestep_ms: f32,
    errors: &mut Vec<ConfigValidationError>,
) {
    if circuit.variant.is_empty() {
        errors.push(ConfigValidationError::MissingRequired {
            field: "circuit.variant".to_string(),
        });
    } else if !KNOWN_VARIANTS.contains(&circuit.variant.as_str()) {
        errors.push(invalid(
            "circuit.variant",
            format!("unknown variant '{}' (known: {})", circuit.variant, KNOWN_VARIANTS.join(", ")),
        ));
    }
    if circuit.cue_size == 0 {
        errors.push(invalid("circuit.cue_size", "must be >= 1"));
    }
    if circuit.content_size == 0 {
        errors.push(invalid("circuit.content_size", "must be >= 1"));
    }

    for (name, params) in &circuit.neurons {
        validate_neuron_set(name, params, errors);
    }
    for (name, params) in &circuit.synapses {
        validate_synapse_set(name, params, timestep_ms, errors);
    }
}

fn validate_neuron_set(name: &str, params: &NeuronParameterSet, errors: &mut Vec<ConfigValidationError>) {
    let field = |key: &str| format!("circuit.neurons.{}.{}", name, key);

    if let Some(model) = &params.model {
        if model != "IF_curr_exp" {
            errors.push(invalid(field("model"), format!("unsupported neuron model '{}'", model)));
        }
    }
    for (key, value) in [
        ("cm", params.cm),
        ("i_offset", params.i_offset),
        ("tau_m", params.tau_m),
        ("tau_refrac", params.tau_refrac),
        ("tau_syn_e", params.tau_syn_e),
        ("tau_syn_i", params.tau_syn_i),
        ("v_reset", params.v_reset),
        ("v_rest", params.v_rest),
        ("v_thresh", params.v_thresh),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(invalid(field(key), format!("must be finite, got {}", v)));
            }
        }
    }
    for (key, value) in [
        ("cm", params.cm),
        ("tau_m", params.tau_m),
        ("tau_syn_e", params.tau_syn_e),
        ("tau_syn_i", params.tau_syn_i),
    ] {
        if let Some(v) = value {
            if v.is_finite() && v <= 0.0 {
                errors.push(invalid(field(key), format!("must be > 0, got {}", v)));
            }
        }
    }
    if let Some(refrac) = params.tau_refrac {
        if refrac < 0.0 {
            errors.push(invalid(field("tau_refrac"), "must be >= 0"));
        }
    }
    if let (Some(thresh), Some(reset)) = (params.v_thresh, params.v_reset) {
        if thresh.is_finite() && reset.is_finite() && thresh <= reset {
            errors.push(invalid(
                field("v_thresh"),
                format!("must exceed v_reset ({} <= {})", thresh, reset),
            ));
        }
    }
}

fn validate_synapse_set(
    name: &str,
    params: &SynapseParameterSet,
    timestep_ms: f32,
    errors: &mut Vec<ConfigValidationError>,
) {
    let field = |key: &str| format!("circuit.synapses.{}.{}", name, key);

    if let Some(weight) = params.weight {
        if let Some(reason) = weight_problem(weight) {
            errors.push(invalid(field("weight"), reason));
        }
    }
    if let Some(delay) = params.delay {
        if let Some(reason) = delay_problem(delay, timestep_ms) {
            errors.push(invalid(field("delay"), reason));
        }
    }
    for (key, value) in [
        ("tau_plus", params.tau_plus),
        ("tau_minus", params.tau_minus),
        ("a_plus", params.a_plus),
        ("a_minus", params.a_minus),
        ("w_min", params.w_min),
        ("w_max", params.w_max),
    ] {
        if let Some(v) = value {
            if !v.is_finite() {
                errors.push(invalid(field(key), format!("must be finite, got {}", v)));
            }
        }
    }
    if let Some(receptor) = &params.receptor {
        if !KNOWN_RECEPTORS.contains(&receptor.as_str()) {
            errors.push(invalid(field("receptor"), format!("unknown receptor '{}'", receptor)));
        }
    }
    if let (Some(w_min), Some(w_max)) = (params.w_min, params.w_max) {
        if w_min > w_max {
            errors.push(invalid(field("w_min"), format!("{} exceeds w_max {}", w_min, w_max)));
        }
    }
    if let Some(edges) = &params.initial_edges {
        for (i, edge) in edges.iter().enumerate() {
            let at = format!("{}[{}]", field("initial_edges"), i);
            if let Some(reason) = weight_problem(edge.weight) {
                errors.push(invalid(at.clone(), reason));
            }
            if let Some(reason) = delay_problem(edge.delay, timestep_ms) {
                errors.push(invalid(at, reason));
            }
        }
    }
}

fn weight_problem(weight: f32) -> Option<String> {
    if !weight.is_finite() {
        Some(format!("weight must be finite, got {}", weight))
    } else if weight < 0.0 {
        Some("weights are magnitudes; use the receptor for sign".to_string())
    } else {
        None
    }
}

fn delay_problem(delay: f32, timestep_ms: f32) -> Option<String> {
    if !delay.is_finite() {
        Some(format!("delay must be finite, got {}", delay))
    } else if delay < timestep_ms {
        Some(format!("{} ms is below the {} ms time step", delay, timestep_ms))
    } else {
        None
    }
}
