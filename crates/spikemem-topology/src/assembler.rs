// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Topology assembler.

Assembly runs in two phases:

1. **Plan** - pure resolution of sizes, neuron parameters, rule edges,
   receptor bindings and scaled weights. Every error is raised here.
2. **Commit** - populations, then synapse groups, are created in the engine.

A plan that fails leaves the engine exactly as it was.
*/

use core::ops::Range;
use ahash::{AHashMap, AHashSet};

use spikemem_config::{validate_circuit_config, CircuitConfig};
use spikemem_npu_neural::{IfCurrExpParameters, InitialState};
use spikemem_npu_runtime::SimulationEngine;
use tracing::{debug, info, warn};

use crate::circuit::Circuit;
use crate::connectivity::{resolve_synapse_settings, ResolvedGroup};
use crate::descriptor::{CircuitDimensions, Endpoint, PortSpec, TopologyDescriptor};
use crate::parameters::{resolve_initial_state, resolve_neuron_parameters};
use crate::registry::PopulationRegistry;
use crate::types::{CircuitError, CircuitResult};
use crate::variants::MemoryVariant;

/// Neuron-table entry used for the external output population
pub const OUTPUT_NEURONS: &str = "output";

/// A population with everything needed to create it
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedPopulation {
    pub name: String,
    pub size: usize,
    pub params: IfCurrExpParameters,
    pub initial_state: InitialState,
}

/// Index range of one named port inside the external I/O population
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortLayout {
    pub name: String,
    pub range: Range<usize>,
}

impl PortLayout {
    pub fn width(&self) -> usize {
        self.range.len()
    }
}

/// Fully resolved circuit, not yet created anywhere
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitPlan {
    pub variant: String,
    pub dimensions: CircuitDimensions,
    pub populations: Vec<PlannedPopulation>,
    /// In descriptor order; port groups included
    pub groups: Vec<ResolvedGroup>,
    pub inputs: Vec<PortLayout>,
    pub outputs: Vec<PortLayout>,
    /// Neurons the caller should give the output population
    pub output_params: Option<IfCurrExpParameters>,
}

/// Builds circuits from a descriptor and a parameter table
#[derive(Debug, Clone)]
pub struct TopologyAssembler {
    descriptor: TopologyDescriptor,
    config: CircuitConfig,
}

impl TopologyAssembler {
    pub fn new(descriptor: TopologyDescriptor, config: CircuitConfig) -> Self {
        Self { descriptor, config }
    }

    /// Assembler for the variant named in `config`, with `config` layered
    /// over that variant's default table
    pub fn for_variant(config: &CircuitConfig) -> CircuitResult<Self> {
        let variant: MemoryVariant = config.variant.parse()?;
        let merged = config.merged_over(&variant.default_config()?);
        Ok(Self::new(variant.descriptor(), merged))
    }

    pub fn descriptor(&self) -> &TopologyDescriptor {
        &self.descriptor
    }

    pub fn config(&self) -> &CircuitConfig {
        &self.config
    }

    /// Resolve the whole circuit without creating anything
    ///
    /// # Errors
    ///
    /// Every [`CircuitError`] assembly can raise except `Engine`.
    pub fn plan(&self, timestep_ms: f32) -> CircuitResult<CircuitPlan> {
        validate_circuit_config(&self.config, timestep_ms)?;
        self.descriptor.validate()?;

        let dims = CircuitDimensions {
            cue: self.config.cue_size,
            content: self.config.content_size,
        };

        let mut populations = Vec::with_capacity(self.descriptor.populations.len());
        let mut by_name: AHashMap<&str, (usize, IfCurrExpParameters)> = AHashMap::new();
        for spec in &self.descriptor.populations {
            let size = spec.size.resolve(dims);
            let params = resolve_neuron_parameters(&self.config, &spec.name)?;
            PopulationRegistry::check_population(&spec.name, size, &params)?;
            let initial_state = resolve_initial_state(&self.config, &spec.name, &params);
            by_name.insert(spec.name.as_str(), (size, params));
            populations.push(PlannedPopulation {
                name: spec.name.clone(),
                size,
                params,
                initial_state,
            });
        }

        let inputs = layout_ports("input", &self.descriptor.inputs, dims)?;
        let outputs = layout_ports("output", &self.descriptor.outputs, dims)?;
        let port_width = |ports: &[PortLayout], name: &str| {
            ports.iter().find(|p| p.name == name).map(PortLayout::width)
        };

        let mut groups = Vec::new();
        for spec in &self.descriptor.connections {
            let size_of = |end: &Endpoint| -> Option<usize> {
                match end {
                    Endpoint::Population(name) => by_name.get(name.as_str()).map(|(size, _)| *size),
                    Endpoint::Input(port) => port_width(&inputs, port),
                    Endpoint::Output(port) => port_width(&outputs, port),
                }
            };
            let (Some(src_size), Some(dst_size)) = (size_of(&spec.src), size_of(&spec.dst)) else {
                return Err(CircuitError::configuration(format!(
                    "connection '{}' has an unresolved endpoint",
                    spec.name
                )));
            };
            let dst_params = spec
                .dst
                .population_name()
                .and_then(|name| by_name.get(name))
                .map(|(_, params)| params);

            let settings = resolve_synapse_settings(
                &spec.name,
                self.config.synapses.get(&spec.name),
                spec.polarity,
                spec.plastic,
                timestep_ms,
            )?;
            let resolved = ResolvedGroup::resolve(spec, &settings, src_size, dst_size, dims, dst_params)
                .map_err(|e| {
                    warn!(connection = %spec.name, rule = spec.rule.name(), error = %e, "Connection rule failed");
                    e
                })?;
            groups.extend(resolved);
        }

        let used: AHashSet<&str> = self
            .descriptor
            .connections
            .iter()
            .map(|c| c.name.as_str())
            .collect();
        for key in self.config.synapses.keys().filter(|k| !used.contains(k.as_str())) {
            warn!(connection = %key, circuit = %self.descriptor.name, "Synapse parameters match no connection");
        }

        let output_params = if outputs.is_empty() {
            None
        } else {
            Some(resolve_neuron_parameters(&self.config, OUTPUT_NEURONS)?)
        };

        debug!(
            circuit = %self.descriptor.name,
            populations = populations.len(),
            groups = groups.len(),
            "Planned circuit"
        );
        Ok(CircuitPlan {
            variant: self.descriptor.name.clone(),
            dimensions: dims,
            populations,
            groups,
            inputs,
            outputs,
            output_params,
        })
    }

    /// Plan, then create the circuit in `engine`.
    ///
    /// Groups touching an I/O port are held back until
    /// [`Circuit::connect_in`] / [`Circuit::connect_out`].
    pub fn assemble<E: SimulationEngine + ?Sized>(&self, engine: &mut E) -> CircuitResult<Circuit> {
        let plan = self.plan(engine.timestep_ms())?;

        let mut registry = PopulationRegistry::new();
        for population in &plan.populations {
            registry.create_population(
                engine,
                &population.name,
                population.size,
                &population.params,
                &population.initial_state,
            )?;
        }

        let mut records = Vec::new();
        let mut pending_inputs = Vec::new();
        let mut pending_outputs = Vec::new();
        for group in plan.groups {
            match (&group.src, &group.dst) {
                (Endpoint::Input(_), _) => pending_inputs.push(group),
                (_, Endpoint::Output(_)) => pending_outputs.push(group),
                (Endpoint::Population(src), Endpoint::Population(dst)) => {
                    let (Some(src), Some(dst)) = (registry.handle(src), registry.handle(dst)) else {
                        return Err(CircuitError::configuration(format!(
                            "group '{}' joins unregistered populations",
                            group.name
                        )));
                    };
                    records.push(group.commit(engine, src.full_view(), dst.full_view())?);
                }
                (Endpoint::Population(_), Endpoint::Input(_)) | (Endpoint::Output(_), _) => {
                    return Err(CircuitError::configuration(format!(
                        "group '{}' runs against the port direction",
                        group.name
                    )));
                }
            }
        }

        info!(
            circuit = %plan.variant,
            engine = engine.engine_name(),
            cue = plan.dimensions.cue,
            content = plan.dimensions.content,
            populations = registry.len(),
            groups = records.len(),
            "Assembled memory circuit"
        );
        Ok(Circuit {
            variant: plan.variant,
            dimensions: plan.dimensions,
            registry,
            groups: records,
            inputs: plan.inputs,
            outputs: plan.outputs,
            pending_inputs,
            pending_outputs,
            input: None,
            output: None,
            output_params: plan.output_params,
        })
    }
}

fn layout_ports(side: &str, ports: &[PortSpec], dims: CircuitDimensions) -> CircuitResult<Vec<PortLayout>> {
    let mut offset = 0;
    let mut layout = Vec::with_capacity(ports.len());
    for port in ports {
        let width = port.width.resolve(dims);
        if width == 0 {
            return Err(CircuitError::configuration(format!(
                "{} port '{}' has zero width",
                side, port.name
            )));
        }
        layout.push(PortLayout {
            name: port.name.clone(),
            range: offset..offset + width,
        });
        offset += width;
    }
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikemem_npu_engine::ReferenceEngine;

    fn default_assembler(variant: &str) -> TopologyAssembler {
        let config = CircuitConfig {
            variant: variant.to_string(),
            ..Default::default()
        };
        TopologyAssembler::for_variant(&config).unwrap()
    }

    #[test]
    fn test_plan_resolves_sizes_and_ports() {
        let plan = default_assembler("ca3_content_addressable").plan(1.0).unwrap();
        assert_eq!(plan.populations.len(), 8);
        assert_eq!(plan.inputs[0].range, 0..5);
        assert_eq!(plan.inputs[1].range, 5..15);
        assert_eq!(plan.outputs[1].range, 5..15);
        assert_eq!(plan.output_params.map(|p| p.cm), Some(0.27));
        // 19 connections, the per-unit veto expands into 10 groups
        assert_eq!(plan.groups.len(), 19 - 1 + 10);
    }

    #[test]
    fn test_plan_scales_lateral_inhibition_with_content() {
        let mut config = CircuitConfig {
            content_size: 20,
            ..Default::default()
        };
        config.variant = "ca3_content_addressable".to_string();
        let plan = TopologyAssembler::for_variant(&config).unwrap().plan(1.0).unwrap();
        let lateral = plan
            .groups
            .iter()
            .find(|g| g.name == "cue_by_content-cue_by_content")
            .unwrap();
        assert!((lateral.kind.default_weight() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_dg_plan_uses_threshold_margin() {
        let plan = default_assembler("hippocampus_dg_ca1").plan(1.0).unwrap();
        assert_eq!(plan.inputs[0].range, 0..3);
        let veto = plan.groups.iter().find(|g| g.name == "input-dg-inh").unwrap();
        assert!((veto.kind.default_weight() - 3.0).abs() < 1e-5);
        let population = plan.populations.iter().find(|p| p.name == "ca1").unwrap();
        assert_eq!(population.size, 3);
    }

    #[test]
    fn test_unknown_variant() {
        let config = CircuitConfig {
            variant: "entorhinal".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            TopologyAssembler::for_variant(&config),
            Err(CircuitError::Configuration(_))
        ));
    }

    #[test]
    fn test_failed_plan_leaves_engine_empty() {
        let mut config = CircuitConfig::default();
        config.synapses.insert(
            "cue_by_cue-content_gate".to_string(),
            spikemem_config::SynapseParameterSet {
                receptor: Some("excitatory".to_string()),
                ..Default::default()
            },
        );
        let assembler = TopologyAssembler::for_variant(&config).unwrap();
        let mut engine = ReferenceEngine::default();
        let err = assembler.assemble(&mut engine).unwrap_err();
        assert!(matches!(err, CircuitError::PortCompatibility { .. }));
        assert_eq!(engine.population_count(), 0);
        assert_eq!(engine.synapse_group_count(), 0);
    }

    #[test]
    fn test_assemble_holds_back_port_groups() {
        let mut engine = ReferenceEngine::default();
        let circuit = default_assembler("ca3").assemble(&mut engine).unwrap();
        assert_eq!(engine.population_count(), 2);
        assert_eq!(engine.synapse_group_count(), 1);
        assert_eq!(circuit.groups().len(), 1);
        assert!(circuit.groups()[0].is_plastic());
    }
}
