// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Explicit edge lists - pre-loaded memory content.
*/

use spikemem_npu_neural::{Edge, ListEdge};

use crate::types::{CircuitError, CircuitResult};

/// From-list - exactly the supplied `(src, dst, weight, delay)` tuples
///
/// Every index must fall inside its population; each edge keeps its own
/// weight and delay.
pub fn from_list(list: &[ListEdge], src_size: usize, dst_size: usize) -> CircuitResult<Vec<Edge>> {
    list.iter()
        .enumerate()
        .map(|(i, edge)| {
            if edge.src >= src_size || edge.dst >= dst_size {
                return Err(CircuitError::configuration(format!(
                    "edge {} ({} -> {}) is outside a {}x{} connection",
                    i, edge.src, edge.dst, src_size, dst_size
                )));
            }
            Ok(Edge::from(*edge))
        })
        .collect()
}
