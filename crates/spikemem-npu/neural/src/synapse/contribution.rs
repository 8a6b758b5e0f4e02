// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptic contribution calculation
//!
//! Pure functions for computing the membrane jump of delivered spikes.

use crate::types::Polarity;

/// Membrane jump of a single delivered spike
///
/// `contribution = sign × weight × tau_syn / cm`
///
/// The charge of an exponential current with amplitude `weight` and time
/// constant `tau_syn`, deposited on capacitance `cm`.
///
/// # Example
/// ```
/// use spikemem_npu_neural::synapse::compute_synaptic_contribution;
/// use spikemem_npu_neural::Polarity;
///
/// let dv = compute_synaptic_contribution(3.0, 0.3, 0.3, Polarity::Excitatory);
/// assert!((dv - 3.0).abs() < 1e-6);
/// ```
#[inline]
pub fn compute_synaptic_contribution(weight: f32, tau_syn: f32, cm: f32, polarity: Polarity) -> f32 {
    polarity.sign() * weight * tau_syn / cm
}

/// Sum the contributions of a batch of spikes landing on one neuron
///
/// # Panics
/// Panics if `weights` and `polarities` differ in length.
pub fn accumulate_contributions(weights: &[f32], polarities: &[Polarity], tau_syn: f32, cm: f32) -> f32 {
    assert_eq!(weights.len(), polarities.len());
    weights
        .iter()
        .zip(polarities)
        .map(|(&w, &p)| compute_synaptic_contribution(w, tau_syn, cm, p))
        .sum()
}
