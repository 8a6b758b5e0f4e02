// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Handles returned by an engine

use core::ops::Range;

use spikemem_npu_neural::{PopulationId, SynapseGroupId};

/// A created population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopulationHandle {
    pub id: PopulationId,
    pub size: usize,
}

impl PopulationHandle {
    /// View covering the whole population
    pub fn full_view(&self) -> PopulationView {
        PopulationView {
            population: self.id,
            start: 0,
            len: self.size,
        }
    }
}

/// A contiguous index range of one population
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PopulationView {
    pub population: PopulationId,
    pub start: usize,
    pub len: usize,
}

impl PopulationView {
    pub fn range(&self) -> Range<usize> {
        self.start..self.start + self.len
    }

    /// Absolute population index of view index `i`
    #[inline]
    pub fn absolute(&self, i: usize) -> usize {
        self.start + i
    }
}

/// A created synapse group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SynapseGroupHandle {
    pub id: SynapseGroupId,
    pub edge_count: usize,
    pub plastic: bool,
}
