// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Plain CA3 and DG-CA3-CA1 memories

mod common;

use common::{set, Memory};
use spikemem::topology::bits::set_bits;

#[test]
fn test_plain_ca3_store_and_recall() {
    let mut memory = Memory::new("ca3");
    memory.store(2, &[0, 1, 2], 3);

    let cue = memory.one_hot_input(Some(2), &[]);
    let recall = memory.present(&cue);
    assert_eq!(memory.fired("content", recall.clone()), set(&[0, 1, 2]));
    assert_eq!(memory.output_fired(recall), set(&[2, 5, 6, 7]));

    let other = memory.one_hot_input(Some(3), &[]);
    let window = memory.present(&other);
    assert!(memory.fired("content", window).is_empty());
}

#[test]
fn test_dg_decodes_every_code_and_ca1_reencodes_it() {
    let mut memory = Memory::new("hippocampus_dg_ca1");
    for code in 1..=5 {
        let input = memory.binary_input(code, &[]);
        let window = memory.present(&input);
        assert_eq!(memory.fired("dg", window.clone()), set(&[code - 1]), "code {}", code);
        assert_eq!(memory.fired("cue", window.clone()), set(&[code - 1]));
        assert_eq!(memory.output_fired(window), set(&set_bits(code)), "code {}", code);
    }
}

#[test]
fn test_dg_ca1_store_and_recall() {
    let mut memory = Memory::new("hippocampus_dg_ca1");
    let write = memory.binary_input(3, &[0, 1, 2]);
    for _ in 0..3 {
        memory.present(&write);
    }

    let cue = memory.binary_input(3, &[]);
    let recall = memory.present(&cue);
    assert_eq!(memory.fired("content", recall.clone()), set(&[0, 1, 2]));
    // cue bits {0, 1}, content shifted past the 3 cue bits
    assert_eq!(memory.output_fired(recall), set(&[0, 1, 3, 4, 5]));

    let other = memory.binary_input(4, &[]);
    let window = memory.present(&other);
    assert!(memory.fired("content", window.clone()).is_empty());
    assert_eq!(memory.output_fired(window), set(&[2]));
}
