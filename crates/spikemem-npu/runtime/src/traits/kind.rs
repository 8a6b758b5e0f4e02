// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Static and plastic synapse kinds

use spikemem_npu_plasticity::StdpParameters;

/// How the weights of a synapse group behave at runtime
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SynapseKind {
    /// Weight and delay fixed at creation
    Static { weight: f32, delay: f32 },
    /// Weight evolves under spike-pair STDP; delay stays fixed
    Plastic {
        rule: StdpParameters,
        init_weight: f32,
        delay: f32,
    },
}

impl SynapseKind {
    /// Weight given to edges that carry none of their own
    pub fn default_weight(&self) -> f32 {
        match self {
            SynapseKind::Static { weight, .. } => *weight,
            SynapseKind::Plastic { init_weight, .. } => *init_weight,
        }
    }

    /// Delay (ms) given to edges that carry none of their own
    pub fn default_delay(&self) -> f32 {
        match self {
            SynapseKind::Static { delay, .. } | SynapseKind::Plastic { delay, .. } => *delay,
        }
    }

    pub fn is_plastic(&self) -> bool {
        matches!(self, SynapseKind::Plastic { .. })
    }

    pub fn stdp(&self) -> Option<&StdpParameters> {
        match self {
            SynapseKind::Plastic { rule, .. } => Some(rule),
            SynapseKind::Static { .. } => None,
        }
    }
}
