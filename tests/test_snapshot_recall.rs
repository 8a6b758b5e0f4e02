// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Stored weights carried into a fresh circuit through `initial_edges`

mod common;

use common::{set, Memory};
use spikemem::prelude::*;

#[test]
fn test_snapshot_seeds_a_fresh_circuit() {
    let mut trained = Memory::new("ca3_content_addressable");
    trained.store(2, &[0, 1, 2], 3);
    let snapshot = trained.circuit.snapshot(&trained.engine).unwrap();
    assert_eq!(snapshot.variant, "ca3_content_addressable");
    let strong = snapshot.strong_edges("cue_by_cue-content_by_cue", 2.5);
    assert_eq!(strong.iter().map(|e| (e.src, e.dst)).collect::<Vec<_>>(), vec![(2, 0), (2, 1), (2, 2)]);

    let json = snapshot.to_json().unwrap();
    let restored = MemorySnapshot::from_json(&json).unwrap();
    let mut config = CircuitConfig::default();
    restored.apply_to(&mut config);

    let mut fresh = Memory::with_config(config);
    let cue = fresh.one_hot_input(Some(2), &[]);
    let recall = fresh.present(&cue);
    assert_eq!(fresh.fired("content_by_cue", recall.clone()), set(&[0, 1, 2]));
    assert_eq!(fresh.output_fired(recall), set(&[2, 5, 6, 7]));

    let content = fresh.one_hot_input(None, &[0, 1, 2]);
    let reverse = fresh.present(&content);
    assert_eq!(fresh.fired("cue_by_content", reverse), set(&[2]));
}

#[test]
fn test_explicit_edges_without_learning() {
    let mut config = CircuitConfig {
        variant: "ca3".to_string(),
        ..Default::default()
    };
    let mut preloaded = MemorySnapshot::new("ca3");
    preloaded.groups.insert(
        "cue-content".to_string(),
        [4, 8]
            .into_iter()
            .map(|dst| ListEdge {
                src: 1,
                dst,
                weight: 4.0,
                delay: 1.0,
            })
            .collect(),
    );
    preloaded.apply_to(&mut config);

    let mut memory = Memory::with_config(config);
    assert_eq!(memory.circuit.group("cue-content").unwrap().handle.edge_count, 2);
    let cue = memory.one_hot_input(Some(1), &[]);
    let recall = memory.present(&cue);
    assert_eq!(memory.fired("content", recall.clone()), set(&[4, 8]));
    assert_eq!(memory.output_fired(recall), set(&[1, 9, 13]));
}
