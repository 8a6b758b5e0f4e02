// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapse type definitions

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Effect of a synapse group on its targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Polarity {
    Excitatory,
    Inhibitory,
}

impl Polarity {
    /// +1.0 for excitatory, -1.0 for inhibitory
    #[inline(always)]
    pub fn sign(self) -> f32 {
        match self {
            Polarity::Excitatory => 1.0,
            Polarity::Inhibitory => -1.0,
        }
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Excitatory => write!(f, "excitatory"),
            Polarity::Inhibitory => write!(f, "inhibitory"),
        }
    }
}

/// Current channel of the destination neuron a synapse group binds to.
///
/// The two channels are physically distinct: each has its own synaptic time
/// constant (`tau_syn_e`, `tau_syn_i`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReceptorChannel {
    Excitatory,
    Inhibitory,
}

impl ReceptorChannel {
    /// Polarity carried by this channel
    pub fn polarity(self) -> Polarity {
        match self {
            ReceptorChannel::Excitatory => Polarity::Excitatory,
            ReceptorChannel::Inhibitory => Polarity::Inhibitory,
        }
    }

    /// The channel a synapse of `polarity` must bind to
    pub fn for_polarity(polarity: Polarity) -> Self {
        match polarity {
            Polarity::Excitatory => ReceptorChannel::Excitatory,
            Polarity::Inhibitory => ReceptorChannel::Inhibitory,
        }
    }
}

impl fmt::Display for ReceptorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.polarity(), f)
    }
}

impl FromStr for ReceptorChannel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "excitatory" => Ok(ReceptorChannel::Excitatory),
            "inhibitory" => Ok(ReceptorChannel::Inhibitory),
            other => Err(format!("unknown receptor channel '{}'", other)),
        }
    }
}

/// One directed edge produced by a connectivity rule.
///
/// Indices are relative to the source and destination views. `weight` and
/// `delay` are `None` when the synapse kind's defaults apply, and set for
/// explicit list edges.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub src: usize,
    pub dst: usize,
    pub weight: Option<f32>,
    pub delay: Option<f32>,
}

impl Edge {
    /// Edge that takes weight and delay from the synapse kind
    #[inline]
    pub const fn pair(src: usize, dst: usize) -> Self {
        Self {
            src,
            dst,
            weight: None,
            delay: None,
        }
    }

    /// Edge with a weight of its own and the kind's delay
    #[inline]
    pub const fn weighted(src: usize, dst: usize, weight: f32) -> Self {
        Self {
            src,
            dst,
            weight: Some(weight),
            delay: None,
        }
    }

    #[inline]
    pub fn endpoints(&self) -> (usize, usize) {
        (self.src, self.dst)
    }
}

impl From<ListEdge> for Edge {
    fn from(edge: ListEdge) -> Self {
        Self {
            src: edge.src,
            dst: edge.dst,
            weight: Some(edge.weight),
            delay: Some(edge.delay),
        }
    }
}

/// Fully resolved edge: the `(src, dst, weight, delay)` tuple of an explicit
/// list and of a weight snapshot
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ListEdge {
    pub src: usize,
    pub dst: usize,
    pub weight: f32,
    pub delay: f32,
}
