// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Shared harness: a circuit wired to a spike-source input and an output
//! population inside the reference engine

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::ops::Range;

use spikemem::prelude::*;
use spikemem::topology::bits::set_bits;

/// Steps between the starts of two presentations
pub const EPISODE_STEPS: u64 = 20;

pub struct Memory {
    pub engine: ReferenceEngine,
    pub circuit: Circuit,
    pub input: PopulationHandle,
    pub output: PopulationHandle,
}

impl Memory {
    pub fn new(variant: &str) -> Self {
        Self::with_config(CircuitConfig {
            variant: variant.to_string(),
            ..Default::default()
        })
    }

    pub fn with_config(config: CircuitConfig) -> Self {
        spikemem::observability::init_test_logging();
        let mut engine = ReferenceEngine::default();
        let mut circuit = TopologyAssembler::for_variant(&config)
            .unwrap()
            .assemble(&mut engine)
            .unwrap();
        let input = engine
            .create_spike_source("input", circuit.input_width())
            .unwrap();
        let output_params = *circuit.output_neuron_params().unwrap();
        let output = engine
            .create_population("output", circuit.output_width(), &output_params)
            .unwrap();
        circuit.connect_in(&mut engine, input).unwrap();
        circuit.connect_out(&mut engine, output).unwrap();
        Self {
            engine,
            circuit,
            input,
            output,
        }
    }

    /// Input indices of a one-hot cue and a content pattern
    pub fn one_hot_input(&self, cue: Option<usize>, content: &[usize]) -> Vec<usize> {
        let cue_start = self.circuit.input_port("cue").unwrap().range.start;
        let content_start = self.circuit.input_port("content").unwrap().range.start;
        cue.map(|c| cue_start + c)
            .into_iter()
            .chain(content.iter().map(|&j| content_start + j))
            .collect()
    }

    /// Input indices of a binary cue code and a content pattern
    pub fn binary_input(&self, code: usize, content: &[usize]) -> Vec<usize> {
        let cue_start = self.circuit.input_port("cue").unwrap().range.start;
        let content_start = self.circuit.input_port("content").unwrap().range.start;
        set_bits(code)
            .into_iter()
            .map(|b| cue_start + b)
            .chain(content.iter().map(|&j| content_start + j))
            .collect()
    }

    /// Emit `indices` on the input at the current step, then run one episode
    pub fn present(&mut self, indices: &[usize]) -> Range<u64> {
        let start = self.engine.current_step();
        self.engine
            .schedule_spikes(self.input, start, indices)
            .unwrap();
        self.engine.run(EPISODE_STEPS);
        start..start + EPISODE_STEPS
    }

    pub fn store(&mut self, cue: usize, content: &[usize], episodes: usize) {
        let indices = self.one_hot_input(Some(cue), content);
        for _ in 0..episodes {
            self.present(&indices);
        }
    }

    pub fn fired(&self, population: &str, window: Range<u64>) -> BTreeSet<usize> {
        let handle = self.circuit.population(population).unwrap();
        self.engine.fired_indices(handle, window).unwrap()
    }

    pub fn output_fired(&self, window: Range<u64>) -> BTreeSet<usize> {
        self.engine.fired_indices(self.output, window).unwrap()
    }
}

pub fn set(indices: &[usize]) -> BTreeSet<usize> {
    indices.iter().copied().collect()
}
