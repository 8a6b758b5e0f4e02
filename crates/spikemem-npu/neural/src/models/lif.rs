// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # IF_curr_exp (current-based leaky integrate-and-fire) Neuron Model
//!
//! ## Model Dynamics
//!
//! ```text
//! Synaptic Contribution (per delivered spike):
//!     dv = sign × weight × tau_syn / cm
//!
//!     Where:
//!     - sign = +1.0 (excitatory receptor) or -1.0 (inhibitory receptor)
//!     - tau_syn = tau_syn_e or tau_syn_i, chosen by the receptor
//!
//! Membrane Potential Update (step dt):
//!     V(t+dt) = V_rest + (V(t) - V_rest) × exp(-dt / tau_m)
//!               + Σ dv + i_offset × dt / cm
//!
//! Firing Check:
//!     if refractory_countdown > 0:
//!         hold at V_reset, discard input
//!     else if V(t+dt) ≥ V_thresh:
//!         FIRE, reset to V_reset, countdown = round(tau_refrac / dt)
//! ```
//!
//! The exponentially decaying synaptic current is collapsed into a single
//! jump in the step it arrives.

use super::traits::{ModelParameters, NeuronModel};
use crate::synapse::compute_synaptic_contribution;
use crate::types::ReceptorChannel;
use serde::{Deserialize, Serialize};

/// Name under which this model appears in parameter tables
pub const IF_CURR_EXP: &str = "IF_curr_exp";

/// IF_curr_exp neuron model
#[derive(Debug, Clone, Copy, Default)]
pub struct IfCurrExpModel;

impl IfCurrExpModel {
    pub fn new() -> Self {
        Self
    }
}

impl NeuronModel for IfCurrExpModel {
    type Parameters = IfCurrExpParameters;

    fn model_name(&self) -> &'static str {
        IF_CURR_EXP
    }

    #[inline(always)]
    fn compute_synaptic_contribution(
        &self,
        weight: f32,
        receptor: ReceptorChannel,
        params: &IfCurrExpParameters,
    ) -> f32 {
        compute_synaptic_contribution(weight, params.tau_syn(receptor), params.cm, receptor.polarity())
    }

    #[inline(always)]
    fn update_membrane_potential(
        &self,
        current_mp: f32,
        synaptic_input: f32,
        params: &IfCurrExpParameters,
        dt: f32,
    ) -> f32 {
        let decay = (-dt / params.tau_m).exp();
        params.v_rest
            + (current_mp - params.v_rest) * decay
            + synaptic_input
            + params.i_offset * dt / params.cm
    }

    #[inline(always)]
    fn should_fire(
        &self,
        membrane_potential: f32,
        params: &IfCurrExpParameters,
        refractory_countdown: u16,
    ) -> bool {
        refractory_countdown == 0 && membrane_potential >= params.v_thresh
    }

    #[inline(always)]
    fn reset_after_fire(&self, params: &IfCurrExpParameters) -> f32 {
        params.v_reset
    }

    fn refractory_steps(&self, params: &IfCurrExpParameters, dt: f32) -> u16 {
        (params.tau_refrac / dt).round().clamp(0.0, u16::MAX as f32) as u16
    }
}

/// IF_curr_exp parameters (ms, nF, mV, nA)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IfCurrExpParameters {
    pub cm: f32,
    pub i_offset: f32,
    pub tau_m: f32,
    pub tau_refrac: f32,
    pub tau_syn_e: f32,
    pub tau_syn_i: f32,
    pub v_reset: f32,
    pub v_rest: f32,
    pub v_thresh: f32,
}

impl IfCurrExpParameters {
    /// Synaptic time constant of `receptor`
    #[inline(always)]
    pub fn tau_syn(&self, receptor: ReceptorChannel) -> f32 {
        match receptor {
            ReceptorChannel::Excitatory => self.tau_syn_e,
            ReceptorChannel::Inhibitory => self.tau_syn_i,
        }
    }

    /// Depolarization needed to go from reset to threshold
    pub fn threshold_gap(&self) -> f32 {
        self.v_thresh - self.v_reset
    }
}

impl Default for IfCurrExpParameters {
    fn default() -> Self {
        Self {
            cm: 0.3,
            i_offset: 0.0,
            tau_m: 3.0,
            tau_refrac: 1.0,
            tau_syn_e: 0.3,
            tau_syn_i: 0.3,
            v_reset: -60.0,
            v_rest: -60.0,
            v_thresh: -57.5,
        }
    }
}

impl ModelParameters for IfCurrExpParameters {
    fn validate(&self) -> Result<(), &'static str> {
        if !(self.cm > 0.0) {
            return Err("IF_curr_exp: cm must be > 0");
        }
        if !(self.tau_m > 0.0) {
            return Err("IF_curr_exp: tau_m must be > 0");
        }
        if !(self.tau_syn_e > 0.0) || !(self.tau_syn_i > 0.0) {
            return Err("IF_curr_exp: synaptic time constants must be > 0");
        }
        if !(self.tau_refrac.is_finite() && self.tau_refrac >= 0.0) {
            return Err("IF_curr_exp: tau_refrac must be finite and >= 0");
        }
        if ![self.cm, self.tau_m, self.i_offset, self.v_rest, self.v_reset, self.v_thresh]
            .iter()
            .all(|v| v.is_finite())
        {
            return Err("IF_curr_exp: parameters must be finite");
        }
        if !(self.v_thresh > self.v_reset) {
            return Err("IF_curr_exp: v_thresh must exceed v_reset");
        }
        Ok(())
    }

    fn parameter_count() -> usize {
        9
    }
}

/// Initial membrane state of a population
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialState {
    pub v_init: f32,
}

impl Default for InitialState {
    fn default() -> Self {
        Self { v_init: -60.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_relay_spike_crosses_threshold() {
        let model = IfCurrExpModel::new();
        let params = IfCurrExpParameters::default();

        let jump = model.compute_synaptic_contribution(3.0, ReceptorChannel::Excitatory, &params);
        assert!((jump - 3.0).abs() < 1e-5);

        let v = model.update_membrane_potential(params.v_rest, jump, &params, 1.0);
        assert!(model.should_fire(v, &params, 0));
    }

    #[test]
    fn test_inhibitory_jump_is_negative() {
        let model = IfCurrExpModel::new();
        let params = IfCurrExpParameters::default();
        let jump = model.compute_synaptic_contribution(1.5, ReceptorChannel::Inhibitory, &params);
        assert!((jump + 1.5).abs() < 1e-5);
    }

    #[test]
    fn test_leak_decays_towards_rest() {
        let model = IfCurrExpModel::new();
        let params = IfCurrExpParameters::default();
        let v = model.update_membrane_potential(-58.0, 0.0, &params, 1.0);
        let expected = -60.0 + 2.0 * (-1.0f32 / 3.0).exp();
        assert!((v - expected).abs() < 1e-4);
        assert!(!model.should_fire(v, &params, 0));
    }

    #[test]
    fn test_refractory_blocks_firing() {
        let model = IfCurrExpModel::new();
        let params = IfCurrExpParameters::default();
        assert!(!model.should_fire(0.0, &params, 1));
        assert_eq!(model.refractory_steps(&params, 1.0), 1);
        assert_eq!(model.reset_after_fire(&params), -60.0);
    }

    #[test]
    fn test_offset_current_drives_membrane() {
        let model = IfCurrExpModel::new();
        let params = IfCurrExpParameters {
            i_offset: 0.3,
            ..Default::default()
        };
        let v = model.update_membrane_potential(params.v_rest, 0.0, &params, 1.0);
        assert!((v - -59.0).abs() < 1e-4);
    }

    #[test]
    fn test_parameter_validation() {
        assert!(IfCurrExpParameters::default().validate().is_ok());
        let bad = IfCurrExpParameters {
            v_thresh: -61.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        let bad = IfCurrExpParameters {
            cm: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
        assert!((IfCurrExpParameters::default().threshold_gap() - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_non_finite_parameters_fail_validation() {
        for bad in [
            IfCurrExpParameters {
                v_thresh: f32::NAN,
                ..Default::default()
            },
            IfCurrExpParameters {
                v_rest: f32::NEG_INFINITY,
                ..Default::default()
            },
            IfCurrExpParameters {
                tau_refrac: f32::NAN,
                ..Default::default()
            },
            IfCurrExpParameters {
                cm: f32::INFINITY,
                ..Default::default()
            },
        ] {
            assert!(bad.validate().is_err(), "{:?} validated", bad);
        }
    }
}
