// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neuron Model Traits
//!
//! Defines the interface a neuron model exposes to the reference engine.

use crate::types::ReceptorChannel;

/// Core trait for neuron model computational behavior
///
/// Implementations provide the formulas for:
/// - the membrane jump caused by one delivered spike
/// - the per-step membrane update
/// - the firing condition and post-firing reset
pub trait NeuronModel: Send + Sync {
    /// Model-specific parameters
    type Parameters: ModelParameters;

    /// Human-readable model name for logging/debugging
    fn model_name(&self) -> &'static str;

    /// Membrane jump caused by one spike arriving with `weight` on `receptor`
    ///
    /// `weight` is a non-negative magnitude; the sign comes from the receptor.
    fn compute_synaptic_contribution(
        &self,
        weight: f32,
        receptor: ReceptorChannel,
        params: &Self::Parameters,
    ) -> f32;

    /// Advance the membrane potential by one step of length `dt`
    ///
    /// `synaptic_input` is the sum of all contributions delivered this step.
    fn update_membrane_potential(
        &self,
        current_mp: f32,
        synaptic_input: f32,
        params: &Self::Parameters,
        dt: f32,
    ) -> f32;

    /// `true` if the neuron fires at `membrane_potential`
    fn should_fire(
        &self,
        membrane_potential: f32,
        params: &Self::Parameters,
        refractory_countdown: u16,
    ) -> bool;

    /// Membrane potential right after a spike
    fn reset_after_fire(&self, params: &Self::Parameters) -> f32;

    /// Number of whole steps the neuron stays silent after a spike
    fn refractory_steps(&self, params: &Self::Parameters, dt: f32) -> u16;
}

/// Parameter set of a neuron model
pub trait ModelParameters: Clone + Send + Sync {
    /// Check physical plausibility
    fn validate(&self) -> Result<(), &'static str>;

    /// Number of scalar parameters
    fn parameter_count() -> usize;
}
