// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Connectivity rules.

Every rule is a pure function of the endpoint sizes: the same inputs always
yield the same edge list, in the same order.
*/

pub mod binary_code;
pub mod explicit;
pub mod trivial;

pub use binary_code::{binary_decoder, binary_encoder, DecoderEdges};
pub use explicit::from_list;
pub use trivial::{all_to_all, all_to_one, one_to_one};

use spikemem_npu_neural::{Edge, ListEdge};

use crate::bits::bit_width;
use crate::types::{CircuitError, CircuitResult};

/// Which half of a binary decoder a connection carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecoderPart {
    /// Set bits excite their code's unit
    SetBits,
    /// Clear bits veto their code's unit
    ClearBits,
}

/// Connectivity rule of one connection in a topology descriptor
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionRule {
    OneToOne,
    /// `exclude_self` only takes effect when source and destination are the
    /// same population
    AllToAll { exclude_self: bool },
    /// Every pair except index-aligned ones between two equally sized populations
    AllButCorresponding,
    AllToOne { dst_index: usize },
    /// One all-to-one group per destination unit
    AllToOnePerUnit,
    FromList(Vec<ListEdge>),
    BinaryDecoder(DecoderPart),
    BinaryEncoder,
}

/// Edges of one synapse group produced by a rule
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeSet {
    /// Destination unit for per-unit expansions
    pub unit: Option<usize>,
    pub edges: Vec<Edge>,
}

impl ConnectionRule {
    pub fn name(&self) -> &'static str {
        match self {
            ConnectionRule::OneToOne => "one-to-one",
            ConnectionRule::AllToAll { exclude_self: false } => "all-to-all",
            ConnectionRule::AllToAll { exclude_self: true } => "all-to-all-except-self",
            ConnectionRule::AllButCorresponding => "all-but-corresponding",
            ConnectionRule::AllToOne { .. } => "all-to-one",
            ConnectionRule::AllToOnePerUnit => "all-to-one-per-unit",
            ConnectionRule::FromList(_) => "from-list",
            ConnectionRule::BinaryDecoder(_) => "binary-decoder",
            ConnectionRule::BinaryEncoder => "binary-encoder",
        }
    }

    /// Expand into the edge sets of one or more synapse groups.
    ///
    /// `weight` is the resolved group weight; rules that spread it over
    /// several edges (the decoder's set bits) write it into the edges.
    pub fn expand(
        &self,
        src_size: usize,
        dst_size: usize,
        same_population: bool,
        weight: f32,
    ) -> CircuitResult<Vec<EdgeSet>> {
        let single = |edges: Vec<Edge>| vec![EdgeSet { unit: None, edges }];
        let sets = match self {
            ConnectionRule::OneToOne => single(one_to_one(src_size, dst_size)?),
            ConnectionRule::AllToAll { exclude_self } => {
                single(all_to_all(src_size, dst_size, *exclude_self && same_population))
            }
            ConnectionRule::AllButCorresponding => {
                self.require_sizes(src_size, dst_size, dst_size)?;
                single(all_to_all(src_size, dst_size, true))
            }
            ConnectionRule::AllToOne { dst_index } => {
                single(all_to_one(src_size, *dst_index, dst_size)?)
            }
            ConnectionRule::AllToOnePerUnit => (0..dst_size)
                .map(|unit| {
                    Ok(EdgeSet {
                        unit: Some(unit),
                        edges: all_to_one(src_size, unit, dst_size)?,
                    })
                })
                .collect::<CircuitResult<Vec<_>>>()?,
            ConnectionRule::FromList(list) => single(from_list(list, src_size, dst_size)?),
            ConnectionRule::BinaryDecoder(part) => {
                self.require_sizes(src_size, dst_size, bit_width(dst_size))?;
                let decoder = binary_decoder(dst_size, weight);
                single(match part {
                    DecoderPart::SetBits => decoder.excitatory,
                    DecoderPart::ClearBits => decoder.inhibitory,
                })
            }
            ConnectionRule::BinaryEncoder => {
                self.require_sizes(src_size, dst_size, bit_width(src_size))?;
                single(binary_encoder(src_size))
            }
        };
        Ok(sets)
    }

    /// Check that the side this rule derives from the other one has the expected size
    fn require_sizes(&self, src_size: usize, dst_size: usize, expected: usize) -> CircuitResult<()> {
        let actual = match self {
            ConnectionRule::BinaryEncoder => dst_size,
            _ => src_size,
        };
        if actual != expected {
            return Err(CircuitError::SizeMismatch {
                rule: self.name(),
                source_size: src_size,
                dest_size: dst_size,
            });
        }
        Ok(())
    }
}
