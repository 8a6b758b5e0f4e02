// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
# spikemem Topology

Assembles spiking associative-memory circuits into any engine that implements
[`SimulationEngine`](spikemem_npu_runtime::SimulationEngine).

## Architecture

- **Registry** ([`registry`]): creates populations and records their handles
- **Connectivity** ([`connectivity`]): pure connection rules and synapse group
  resolution (weights, delays, receptor checks, explicit edge lists)
- **Descriptors** ([`descriptor`], [`variants`]): each memory variant is plain
  data listing populations, ports and connections
- **Assembler** ([`assembler`]): plans a descriptor against a parameter table,
  then commits it; a failed plan never touches the engine
- **Circuit** ([`circuit`]): the assembled memory, its I/O adapter and weight
  snapshots

## Example

```rust
use spikemem_config::CircuitConfig;
use spikemem_npu_engine::ReferenceEngine;
use spikemem_npu_runtime::SimulationEngine;
use spikemem_topology::TopologyAssembler;

let mut engine = ReferenceEngine::default();
let assembler = TopologyAssembler::for_variant(&CircuitConfig::default())?;
let mut circuit = assembler.assemble(&mut engine)?;

let input = engine.create_spike_source("input", circuit.input_width())?;
let output_params = *circuit.output_neuron_params().expect("variant has outputs");
let output = engine.create_population("output", circuit.output_width(), &output_params)?;
circuit.connect_in(&mut engine, input)?;
circuit.connect_out(&mut engine, output)?;
# Ok::<(), Box<dyn std::error::Error>>(())
```
*/

pub mod assembler;
pub mod bits;
pub mod circuit;
pub mod connectivity;
pub mod descriptor;
pub mod parameters;
pub mod registry;
pub mod snapshot;
pub mod types;
pub mod variants;

pub use assembler::{CircuitPlan, PlannedPopulation, PortLayout, TopologyAssembler, OUTPUT_NEURONS};
pub use circuit::Circuit;
pub use connectivity::{
    ConnectionRule, DecoderPart, EdgeSet, ResolvedGroup, SynapseGroupRecord, WeightScale,
};
pub use descriptor::{
    CircuitDimensions, ConnectionSpec, Endpoint, PopulationSpec, PortSpec, SizeExpr,
    TopologyDescriptor,
};
pub use registry::{PopulationRecord, PopulationRegistry};
pub use snapshot::MemorySnapshot;
pub use types::{CircuitError, CircuitResult};
pub use variants::MemoryVariant;
