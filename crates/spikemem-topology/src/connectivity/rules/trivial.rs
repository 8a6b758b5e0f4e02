// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Trivial connectivity rules - index pairings that need no geometry.
*/

use spikemem_npu_neural::Edge;

use crate::types::{CircuitError, CircuitResult};

/// One-to-one - unit `i` of the source drives unit `i` of the destination
pub fn one_to_one(src_size: usize, dst_size: usize) -> CircuitResult<Vec<Edge>> {
    if src_size != dst_size {
        return Err(CircuitError::SizeMismatch {
            rule: "one-to-one",
            source_size: src_size,
            dest_size: dst_size,
        });
    }
    Ok((0..src_size).map(|i| Edge::pair(i, i)).collect())
}

/// All-to-all - full Cartesian product, source-major.
///
/// `exclude_self` drops the `(i, i)` pairs; callers only set it when source
/// and destination are the same population.
pub fn all_to_all(src_size: usize, dst_size: usize, exclude_self: bool) -> Vec<Edge> {
    let mut edges = Vec::with_capacity(src_size * dst_size);
    for src in 0..src_size {
        for dst in 0..dst_size {
            if exclude_self && src == dst {
                continue;
            }
            edges.push(Edge::pair(src, dst));
        }
    }
    edges
}

/// All-to-one - every source unit converges on `dst_index`
pub fn all_to_one(src_size: usize, dst_index: usize, dst_size: usize) -> CircuitResult<Vec<Edge>> {
    if dst_index >= dst_size {
        return Err(CircuitError::configuration(format!(
            "all-to-one target {} is outside a destination of {} units",
            dst_index, dst_size
        )));
    }
    Ok((0..src_size).map(|src| Edge::pair(src, dst_index)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_to_one_pairs_indices() {
        let edges = one_to_one(4, 4).unwrap();
        assert_eq!(edges.len(), 4);
        assert!(edges.iter().all(|e| e.src == e.dst));
    }

    #[test]
    fn test_one_to_one_rejects_unequal_sizes() {
        let err = one_to_one(5, 10).unwrap_err();
        assert!(matches!(
            err,
            CircuitError::SizeMismatch {
                source_size: 5,
                dest_size: 10,
                ..
            }
        ));
    }

    #[test]
    fn test_all_to_all_counts() {
        assert_eq!(all_to_all(3, 4, false).len(), 12);
        let lateral = all_to_all(5, 5, true);
        assert_eq!(lateral.len(), 20);
        assert!(lateral.iter().all(|e| e.src != e.dst));
    }

    #[test]
    fn test_all_to_one_targets_single_unit() {
        let edges = all_to_one(5, 3, 10).unwrap();
        assert_eq!(edges.len(), 5);
        assert!(edges.iter().all(|e| e.dst == 3));
        assert!(all_to_one(5, 10, 10).is_err());
    }

    #[test]
    fn test_empty_source() {
        assert!(all_to_all(0, 4, false).is_empty());
        assert!(all_to_one(0, 0, 1).unwrap().is_empty());
    }
}
