// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Property tests for the connectivity rule library

use std::collections::BTreeSet;

use proptest::prelude::*;
use spikemem_npu_neural::Edge;
use spikemem_topology::connectivity::rules::{all_to_all, all_to_one, binary_decoder, one_to_one};
use spikemem_topology::ConnectionRule;

fn pairs(edges: &[Edge]) -> BTreeSet<(usize, usize)> {
    edges.iter().map(Edge::endpoints).collect()
}

proptest! {
    #[test]
    fn one_to_one_pairs_each_index_once(size in 1usize..64) {
        let edges = one_to_one(size, size).unwrap();
        prop_assert_eq!(edges.len(), size);
        let endpoints = pairs(&edges);
        prop_assert_eq!(endpoints.len(), size);
        prop_assert!(endpoints.iter().all(|&(src, dst)| src == dst));
    }

    #[test]
    fn one_to_one_rejects_any_mismatch(src in 1usize..32, dst in 1usize..32) {
        prop_assume!(src != dst);
        prop_assert!(one_to_one(src, dst).is_err());
    }

    #[test]
    fn lateral_all_to_all_has_no_self_edges(size in 1usize..40) {
        let edges = all_to_all(size, size, true);
        prop_assert_eq!(edges.len(), size * size - size);
        prop_assert!(edges.iter().all(|e| e.src != e.dst));
        prop_assert_eq!(pairs(&edges).len(), edges.len());
    }

    #[test]
    fn rules_are_idempotent(src in 1usize..24, dst in 1usize..24, exclude_self in any::<bool>(), same in any::<bool>()) {
        let rule = ConnectionRule::AllToAll { exclude_self };
        let first = rule.expand(src, dst, same, 1.0).unwrap();
        let second = rule.expand(src, dst, same, 1.0).unwrap();
        prop_assert_eq!(pairs(&first[0].edges), pairs(&second[0].edges));

        let per_unit = ConnectionRule::AllToOnePerUnit;
        prop_assert_eq!(
            per_unit.expand(src, dst, false, 1.0).unwrap(),
            per_unit.expand(src, dst, false, 1.0).unwrap()
        );
    }

    #[test]
    fn all_to_one_over_every_target_is_all_to_all(src in 1usize..24, dst in 1usize..24) {
        let union: BTreeSet<_> = (0..dst)
            .flat_map(|j| all_to_one(src, j, dst).unwrap())
            .map(|e| e.endpoints())
            .collect();
        prop_assert_eq!(union, pairs(&all_to_all(src, dst, false)));
    }

    #[test]
    fn decoder_excitation_sums_to_margin(units in 1usize..64, margin in 0.5f32..10.0) {
        let edges = binary_decoder(units, margin);
        for unit in 0..units {
            let total: f32 = edges
                .excitatory
                .iter()
                .filter(|e| e.dst == unit)
                .filter_map(|e| e.weight)
                .sum();
            prop_assert!((total - margin).abs() < 1e-3 * margin);
        }
    }
}
