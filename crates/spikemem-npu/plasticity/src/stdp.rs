// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Pure STDP computation
//!
//! Exponential spike-pair windows with additive weight dependence: the size
//! of an update does not depend on the current weight, only the result is
//! clamped into `[w_min, w_max]`.

use serde::{Deserialize, Serialize};

/// STDP constants of one plastic synapse group
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StdpParameters {
    /// Potentiation time constant (ms)
    pub tau_plus: f32,
    /// Depression time constant (ms)
    pub tau_minus: f32,
    /// Potentiation amplitude (A+)
    pub a_plus: f32,
    /// Depression amplitude (A-)
    pub a_minus: f32,
    pub w_min: f32,
    pub w_max: f32,
}

impl Default for StdpParameters {
    fn default() -> Self {
        Self {
            tau_plus: 2.0,
            tau_minus: 200.0,
            a_plus: 2.0,
            a_minus: 1.0,
            w_min: 0.0,
            w_max: 4.0,
        }
    }
}

impl StdpParameters {
    pub fn validate(&self) -> Result<(), &'static str> {
        let constants = [self.tau_plus, self.tau_minus, self.a_plus, self.a_minus, self.w_min, self.w_max];
        if !constants.iter().all(|v| v.is_finite()) {
            return Err("STDP: constants must be finite");
        }
        if !(self.tau_plus > 0.0) || !(self.tau_minus > 0.0) {
            return Err("STDP: time constants must be > 0");
        }
        if self.a_plus < 0.0 || self.a_minus < 0.0 {
            return Err("STDP: amplitudes must be >= 0");
        }
        if !(self.w_min <= self.w_max) {
            return Err("STDP: w_min must not exceed w_max");
        }
        Ok(())
    }

    /// Weight increase for a post spike `elapsed_ms` after its pre spike
    ///
    /// # Example
    /// ```
    /// use spikemem_npu_plasticity::StdpParameters;
    ///
    /// let stdp = StdpParameters::default();
    /// assert_eq!(stdp.potentiation(0.0), stdp.a_plus);
    /// assert!(stdp.potentiation(4.0) < stdp.potentiation(1.0));
    /// ```
    #[inline]
    pub fn potentiation(&self, elapsed_ms: f32) -> f32 {
        self.a_plus * (-elapsed_ms / self.tau_plus).exp()
    }

    /// Weight decrease (returned as a positive magnitude) for a pre spike
    /// `elapsed_ms` after the last post spike
    #[inline]
    pub fn depression(&self, elapsed_ms: f32) -> f32 {
        self.a_minus * (-elapsed_ms / self.tau_minus).exp()
    }

    #[inline]
    pub fn clamp(&self, weight: f32) -> f32 {
        weight.clamp(self.w_min, self.w_max)
    }
}
