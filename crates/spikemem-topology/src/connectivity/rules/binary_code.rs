// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Binary code converters between a bit-vector population and a one-hot population.

Unit `k - 1` of a one-hot population stands for the code `k`; code 0 is
reserved for "no input" and has no unit.
*/

use spikemem_npu_neural::Edge;

use crate::bits::{bit_width, set_bits};

/// Edges of a binary → one-hot decoder
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecoderEdges {
    /// Set bit `b` of `k` → unit `k - 1`, each carrying `margin / popcount(k)`
    pub excitatory: Vec<Edge>,
    /// Clear bit `b` of `k` → unit `k - 1`, weight from the synapse kind
    pub inhibitory: Vec<Edge>,
}

/// Binary → one-hot decoder over `units` codes.
///
/// The set bits of a code share `margin` between them, so together they lift
/// the matching unit across threshold; any clear bit that is active vetoes it.
pub fn binary_decoder(units: usize, margin: f32) -> DecoderEdges {
    let width = bit_width(units);
    let mut edges = DecoderEdges::default();
    for code in 1..=units {
        let unit = code - 1;
        let ones = set_bits(code);
        let share = margin / ones.len() as f32;
        let mut next_one = ones.iter().peekable();
        for bit in 0..width {
            if next_one.peek() == Some(&&bit) {
                next_one.next();
                edges.excitatory.push(Edge::weighted(bit, unit, share));
            } else {
                edges.inhibitory.push(Edge::pair(bit, unit));
            }
        }
    }
    edges
}

/// One-hot → binary encoder: unit `i` drives the bits set in `i + 1`
pub fn binary_encoder(units: usize) -> Vec<Edge> {
    (0..units)
        .flat_map(|unit| set_bits(unit + 1).into_iter().map(move |bit| Edge::pair(unit, bit)))
        .collect()
}
