// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plasticity rules and their application to one synapse group per step
//!
//! Ordering within a step is fixed so that weight trajectories are
//! reproducible:
//! 1. every pre-synaptic spike, in edge order (source index, then destination
//!    index), depresses against the last post spike strictly before now
//! 2. every post-synaptic spike, in the same edge order, potentiates against
//!    the last pre spike at or before now

use tracing::trace;

use crate::stdp::StdpParameters;

/// Per-edge weight update policy
pub trait PlasticityRule: Send + Sync {
    fn name(&self) -> &'static str;

    /// New weight after a pre spike at `now_ms`
    fn on_pre_spike(&self, weight: f32, now_ms: f32, last_post_ms: Option<f32>) -> f32;

    /// New weight after a post spike at `now_ms`
    fn on_post_spike(&self, weight: f32, now_ms: f32, last_pre_ms: Option<f32>) -> f32;

    /// `(w_min, w_max)`
    fn bounds(&self) -> (f32, f32);
}

/// Additive spike-pair STDP
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikePairRule {
    params: StdpParameters,
}

impl SpikePairRule {
    pub fn new(params: StdpParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &StdpParameters {
        &self.params
    }
}

impl PlasticityRule for SpikePairRule {
    fn name(&self) -> &'static str {
        "spike-pair STDP (additive)"
    }

    #[inline]
    fn on_pre_spike(&self, weight: f32, now_ms: f32, last_post_ms: Option<f32>) -> f32 {
        match last_post_ms {
            Some(post) if post < now_ms => self.params.clamp(weight - self.params.depression(now_ms - post)),
            _ => weight,
        }
    }

    #[inline]
    fn on_post_spike(&self, weight: f32, now_ms: f32, last_pre_ms: Option<f32>) -> f32 {
        match last_pre_ms {
            Some(pre) if pre <= now_ms => self.params.clamp(weight + self.params.potentiation(now_ms - pre)),
            _ => weight,
        }
    }

    fn bounds(&self) -> (f32, f32) {
        (self.params.w_min, self.params.w_max)
    }
}

/// Spike state of a group's endpoints at the current step
///
/// All slices are indexed relative to the group's source and destination
/// views. `last_*_ms` hold spikes from earlier steps only.
#[derive(Debug, Clone, Copy)]
pub struct SpikeTiming<'a> {
    pub now_ms: f32,
    pub pre_fired: &'a [bool],
    pub post_fired: &'a [bool],
    pub last_pre_ms: &'a [Option<f32>],
    pub last_post_ms: &'a [Option<f32>],
}

/// Apply `rule` to every edge touched by a spike this step.
///
/// `edges` must be sorted by `(src, dst)`; `weights` runs parallel to it.
/// Returns the number of weight updates evaluated.
pub fn apply_spike_pairs<R: PlasticityRule + ?Sized>(
    rule: &R,
    edges: &[(usize, usize)],
    weights: &mut [f32],
    timing: &SpikeTiming<'_>,
) -> usize {
    debug_assert_eq!(edges.len(), weights.len());
    let mut updates = 0;

    if timing.pre_fired.iter().any(|&f| f) {
        for (&(src, dst), weight) in edges.iter().zip(weights.iter_mut()) {
            if timing.pre_fired[src] {
                *weight = rule.on_pre_spike(*weight, timing.now_ms, timing.last_post_ms[dst]);
                updates += 1;
            }
        }
    }

    if timing.post_fired.iter().any(|&f| f) {
        for (&(src, dst), weight) in edges.iter().zip(weights.iter_mut()) {
            if timing.post_fired[dst] {
                let last_pre = if timing.pre_fired[src] {
                    Some(timing.now_ms)
                } else {
                    timing.last_pre_ms[src]
                };
                *weight = rule.on_post_spike(*weight, timing.now_ms, last_pre);
                updates += 1;
            }
        }
    }

    if updates > 0 {
        trace!(rule = rule.name(), updates, now_ms = timing.now_ms, "Applied spike-pair updates");
    }
    updates
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn rule() -> SpikePairRule {
        SpikePairRule::new(StdpParameters::default())
    }

    #[test]
    fn test_coincident_pair_potentiates_fully() {
        let edges = [(0, 0)];
        let mut weights = [0.0];
        let timing = SpikeTiming {
            now_ms: 5.0,
            pre_fired: &[true],
            post_fired: &[true],
            last_pre_ms: &[None],
            last_post_ms: &[None],
        };
        assert_eq!(apply_spike_pairs(&rule(), &edges, &mut weights, &timing), 2);
        assert_eq!(weights[0], 2.0);
    }

    #[test]
    fn test_unpaired_pre_depresses_only_after_post() {
        let edges = [(0, 0), (0, 1)];
        let mut weights = [3.0, 3.0];
        let timing = SpikeTiming {
            now_ms: 30.0,
            pre_fired: &[true],
            post_fired: &[false, false],
            last_pre_ms: &[Some(10.0)],
            last_post_ms: &[Some(10.0), None],
        };
        apply_spike_pairs(&rule(), &edges, &mut weights, &timing);
        let expected = 3.0 - (-20.0f32 / 200.0).exp();
        assert!((weights[0] - expected).abs() < 1e-5);
        assert_eq!(weights[1], 3.0);
    }

    #[test]
    fn test_pre_pass_runs_before_post_pass() {
        // Depression lands first, then the coincident post spike restores A+.
        let edges = [(0, 0)];
        let mut weights = [1.0];
        let timing = SpikeTiming {
            now_ms: 21.0,
            pre_fired: &[true],
            post_fired: &[true],
            last_pre_ms: &[Some(1.0)],
            last_post_ms: &[Some(1.0)],
        };
        apply_spike_pairs(&rule(), &edges, &mut weights, &timing);
        let expected = 1.0 - (-0.1f32).exp() + 2.0;
        assert!((weights[0] - expected).abs() < 1e-5);
    }

    #[test]
    fn test_post_without_any_pre_is_ignored() {
        let edges = [(0, 0)];
        let mut weights = [1.0];
        let timing = SpikeTiming {
            now_ms: 3.0,
            pre_fired: &[false],
            post_fired: &[true],
            last_pre_ms: &[None],
            last_post_ms: &[None],
        };
        apply_spike_pairs(&rule(), &edges, &mut weights, &timing);
        assert_eq!(weights[0], 1.0);
    }

    proptest! {
        #[test]
        fn test_weights_stay_within_bounds(
            initial in 0.0f32..4.0,
            spikes in prop::collection::vec((any::<bool>(), any::<bool>()), 1..60),
        ) {
            let rule = rule();
            let (w_min, w_max) = rule.bounds();
            let edges = [(0usize, 0usize)];
            let mut weights = [initial];
            let mut last_pre = [None];
            let mut last_post = [None];
            for (step, (pre, post)) in spikes.into_iter().enumerate() {
                let now = step as f32;
                let timing = SpikeTiming {
                    now_ms: now,
                    pre_fired: &[pre],
                    post_fired: &[post],
                    last_pre_ms: &last_pre,
                    last_post_ms: &last_post,
                };
                apply_spike_pairs(&rule, &edges, &mut weights, &timing);
                prop_assert!(weights[0] >= w_min && weights[0] <= w_max);
                if pre { last_pre[0] = Some(now); }
                if post { last_post[0] = Some(now); }
            }
        }
    }
}
