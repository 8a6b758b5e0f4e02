// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! A failed assembly leaves the engine untouched

use std::io::Write;

use spikemem::config::{ListEdgeConfig, NeuronParameterSet, SynapseParameterSet};
use spikemem::prelude::*;
use spikemem::topology::{ConnectionRule, ConnectionSpec, Endpoint, SizeExpr, TopologyDescriptor};

fn assert_engine_empty(engine: &ReferenceEngine) {
    assert_eq!(engine.population_count(), 0);
    assert_eq!(engine.synapse_group_count(), 0);
}

fn override_synapse(name: &str, table: SynapseParameterSet) -> CircuitConfig {
    let mut config = CircuitConfig::default();
    config.synapses.insert(name.to_string(), table);
    config
}

/// cue -> content one-to-one, sized by the table
fn mismatched_descriptor() -> TopologyDescriptor {
    TopologyDescriptor::new("mismatch")
        .population("cue", SizeExpr::Cue)
        .population("content", SizeExpr::Content)
        .connect(ConnectionSpec::new(
            "cue-content",
            Endpoint::population("cue"),
            Endpoint::population("content"),
            ConnectionRule::OneToOne,
            Polarity::Excitatory,
        ))
}

fn ca3_table() -> CircuitConfig {
    MemoryVariant::Ca3.default_config().unwrap()
}

#[test]
fn test_receptor_against_polarity_is_rejected() {
    spikemem::observability::init_test_logging();
    let config = override_synapse(
        "cue_by_content-cue_by_content",
        SynapseParameterSet {
            receptor: Some("excitatory".to_string()),
            ..Default::default()
        },
    );
    let mut engine = ReferenceEngine::default();
    let err = TopologyAssembler::for_variant(&config)
        .unwrap()
        .assemble(&mut engine)
        .unwrap_err();
    match err {
        CircuitError::PortCompatibility { connection, .. } => {
            assert_eq!(connection, "cue_by_content-cue_by_content")
        }
        other => panic!("expected PortCompatibility, got {other:?}"),
    }
    assert_engine_empty(&engine);
}

#[test]
fn test_sub_step_delay_is_a_config_error() {
    let config = override_synapse(
        "cue_by_cue-content_by_cue",
        SynapseParameterSet {
            delay: Some(0.5),
            ..Default::default()
        },
    );
    let mut engine = ReferenceEngine::default();
    let err = TopologyAssembler::for_variant(&config)
        .unwrap()
        .assemble(&mut engine)
        .unwrap_err();
    assert!(matches!(err, CircuitError::Config(_)), "{err:?}");
    assert!(err.to_string().contains("cue_by_cue-content_by_cue.delay"));
    assert_engine_empty(&engine);
}

#[test]
fn test_non_finite_weight_never_reaches_the_engine() {
    for weight in [f32::NAN, f32::INFINITY] {
        let config = override_synapse(
            "cue_by_cue-cue_merge",
            SynapseParameterSet {
                weight: Some(weight),
                ..Default::default()
            },
        );
        let assembler = TopologyAssembler::for_variant(&config).unwrap();
        assert!(assembler.plan(1.0).is_err());

        let mut engine = ReferenceEngine::default();
        let err = assembler.assemble(&mut engine).unwrap_err();
        assert!(matches!(err, CircuitError::Config(_)), "{err:?}");
        assert!(err.to_string().contains("cue_by_cue-cue_merge.weight"), "{err}");
        assert_engine_empty(&engine);
    }
}

#[test]
fn test_non_finite_seed_edge_never_reaches_the_engine() {
    let config = override_synapse(
        "cue_by_cue-content_by_cue",
        SynapseParameterSet {
            initial_edges: Some(vec![ListEdgeConfig {
                src: 0,
                dst: 0,
                weight: f32::NAN,
                delay: 1.0,
            }]),
            ..Default::default()
        },
    );
    let mut engine = ReferenceEngine::default();
    let err = TopologyAssembler::for_variant(&config)
        .unwrap()
        .assemble(&mut engine)
        .unwrap_err();
    assert!(err.to_string().contains("initial_edges[0]"), "{err}");
    assert_engine_empty(&engine);
}

#[test]
fn test_one_to_one_size_mismatch() {
    let mut engine = ReferenceEngine::default();
    let err = TopologyAssembler::new(mismatched_descriptor(), ca3_table())
        .assemble(&mut engine)
        .unwrap_err();
    assert!(
        matches!(
            err,
            CircuitError::SizeMismatch {
                source_size: 5,
                dest_size: 10,
                ..
            }
        ),
        "{err:?}"
    );
    assert_engine_empty(&engine);
}

#[test]
fn test_missing_neuron_field_names_it() {
    let mut config = ca3_table();
    config.cue_size = 10;
    config.neurons.insert(
        "default".to_string(),
        NeuronParameterSet {
            cm: Some(0.3),
            i_offset: Some(0.0),
            ..Default::default()
        },
    );
    let mut engine = ReferenceEngine::default();
    let err = TopologyAssembler::new(mismatched_descriptor(), config)
        .assemble(&mut engine)
        .unwrap_err();
    assert!(matches!(err, CircuitError::Configuration(_)), "{err:?}");
    assert!(err.to_string().contains("tau_m"), "{err}");
    assert_engine_empty(&engine);
}

#[test]
fn test_missing_synapse_entry() {
    let mut config = ca3_table();
    config.cue_size = 10;
    config.synapses.clear();
    let mut engine = ReferenceEngine::default();
    let err = TopologyAssembler::new(mismatched_descriptor(), config)
        .assemble(&mut engine)
        .unwrap_err();
    assert!(err.to_string().contains("cue-content"), "{err}");
    assert_engine_empty(&engine);
}

#[test]
fn test_zero_sized_circuit() {
    let config = CircuitConfig {
        content_size: 0,
        ..Default::default()
    };
    let mut engine = ReferenceEngine::default();
    let err = TopologyAssembler::for_variant(&config)
        .unwrap()
        .assemble(&mut engine)
        .unwrap_err();
    assert!(err.to_string().contains("circuit.content_size"));
    assert_engine_empty(&engine);
}

#[test]
fn test_assemble_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("memory.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "[circuit]").unwrap();
    writeln!(file, "variant = \"ca3\"").unwrap();
    writeln!(file, "cue_size = 4").unwrap();
    writeln!(file, "content_size = 6").unwrap();
    writeln!(file, "[circuit.synapses.\"cue-content\"]").unwrap();
    writeln!(file, "delay = 2.0").unwrap();
    drop(file);

    let config = load_config(Some(&path), None).unwrap();
    let assembler = TopologyAssembler::for_variant(&config.circuit).unwrap();
    let plastic = assembler.plan(config.simulation.timestep_ms).unwrap();
    let group = plastic.groups.iter().find(|g| g.name == "cue-content").unwrap();
    assert_eq!(group.edges.len(), 24);
    assert_eq!(group.kind.default_delay(), 2.0);

    let mut engine = ReferenceEngine::default();
    let circuit = assembler.assemble(&mut engine).unwrap();
    assert_eq!(circuit.input_width(), 10);
    assert_eq!(circuit.output_width(), 10);
    assert_eq!(engine.population_count(), 2);
}
