// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
An assembled memory circuit and its external I/O adapter.

The circuit owns the populations and synapse groups the assembler created.
The external input and output populations belong to the caller; the circuit
only wires its ports onto sub-ranges of them.
*/

use spikemem_npu_neural::IfCurrExpParameters;
use spikemem_npu_runtime::{PopulationHandle, PopulationView, SimulationEngine};
use tracing::info;

use crate::assembler::PortLayout;
use crate::connectivity::{ResolvedGroup, SynapseGroupRecord};
use crate::descriptor::{CircuitDimensions, Endpoint};
use crate::registry::PopulationRegistry;
use crate::snapshot::MemorySnapshot;
use crate::types::{CircuitError, CircuitResult};

/// One memory instance living in an engine
#[derive(Debug, Clone)]
pub struct Circuit {
    pub(crate) variant: String,
    pub(crate) dimensions: CircuitDimensions,
    pub(crate) registry: PopulationRegistry,
    pub(crate) groups: Vec<SynapseGroupRecord>,
    pub(crate) inputs: Vec<PortLayout>,
    pub(crate) outputs: Vec<PortLayout>,
    pub(crate) pending_inputs: Vec<ResolvedGroup>,
    pub(crate) pending_outputs: Vec<ResolvedGroup>,
    pub(crate) input: Option<PopulationHandle>,
    pub(crate) output: Option<PopulationHandle>,
    pub(crate) output_params: Option<IfCurrExpParameters>,
}

#[derive(Clone, Copy)]
enum Side {
    Input,
    Output,
}

impl Side {
    fn as_str(self) -> &'static str {
        match self {
            Side::Input => "input",
            Side::Output => "output",
        }
    }
}

impl Circuit {
    pub fn variant(&self) -> &str {
        &self.variant
    }

    pub fn dimensions(&self) -> CircuitDimensions {
        self.dimensions
    }

    pub fn registry(&self) -> &PopulationRegistry {
        &self.registry
    }

    /// Handle of an owned population
    pub fn population(&self, name: &str) -> Option<PopulationHandle> {
        self.registry.handle(name)
    }

    /// Synapse groups created so far, in creation order
    pub fn groups(&self) -> &[SynapseGroupRecord] {
        &self.groups
    }

    pub fn group(&self, name: &str) -> Option<&SynapseGroupRecord> {
        self.groups.iter().find(|g| g.name == name)
    }

    pub fn plastic_groups(&self) -> impl Iterator<Item = &SynapseGroupRecord> {
        self.groups.iter().filter(|g| g.is_plastic())
    }

    pub fn input_ports(&self) -> &[PortLayout] {
        &self.inputs
    }

    pub fn output_ports(&self) -> &[PortLayout] {
        &self.outputs
    }

    pub fn input_port(&self, name: &str) -> Option<&PortLayout> {
        self.inputs.iter().find(|p| p.name == name)
    }

    pub fn output_port(&self, name: &str) -> Option<&PortLayout> {
        self.outputs.iter().find(|p| p.name == name)
    }

    /// Size the external input population must have
    pub fn input_width(&self) -> usize {
        self.inputs.iter().map(PortLayout::width).sum()
    }

    /// Size the external output population must have
    pub fn output_width(&self) -> usize {
        self.outputs.iter().map(PortLayout::width).sum()
    }

    /// Neuron parameters for the external output population
    pub fn output_neuron_params(&self) -> Option<&IfCurrExpParameters> {
        self.output_params.as_ref()
    }

    /// Wire the input ports onto consecutive sub-ranges of `input`
    ///
    /// # Errors
    ///
    /// `RangeOverflow` if `input` is not exactly as wide as the declared
    /// ports, `Configuration` if an input is already connected.
    pub fn connect_in<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        input: PopulationHandle,
    ) -> CircuitResult<()> {
        self.check_io(Side::Input, input)?;
        let pending = std::mem::take(&mut self.pending_inputs);
        if let Err(e) = self.commit_port_groups(engine, Side::Input, input, &pending) {
            self.pending_inputs = pending;
            return Err(e);
        }
        self.input = Some(input);
        Ok(())
    }

    /// Wire the merged readout onto consecutive sub-ranges of `output`
    ///
    /// # Errors
    ///
    /// As for [`connect_in`](Self::connect_in).
    pub fn connect_out<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        output: PopulationHandle,
    ) -> CircuitResult<()> {
        self.check_io(Side::Output, output)?;
        let pending = std::mem::take(&mut self.pending_outputs);
        if let Err(e) = self.commit_port_groups(engine, Side::Output, output, &pending) {
            self.pending_outputs = pending;
            return Err(e);
        }
        self.output = Some(output);
        Ok(())
    }

    pub fn input(&self) -> Option<PopulationHandle> {
        self.input
    }

    pub fn output(&self) -> Option<PopulationHandle> {
        self.output
    }

    /// Current weights of every plastic group
    pub fn snapshot<E: SimulationEngine + ?Sized>(&self, engine: &E) -> CircuitResult<MemorySnapshot> {
        let mut snapshot = MemorySnapshot::new(&self.variant);
        for group in self.plastic_groups() {
            snapshot
                .groups
                .insert(group.name.clone(), engine.snapshot_weights(group.handle)?);
        }
        Ok(snapshot)
    }

    fn check_io(&self, side: Side, external: PopulationHandle) -> CircuitResult<()> {
        let (connected, declared) = match side {
            Side::Input => (self.input.is_some(), self.input_width()),
            Side::Output => (self.output.is_some(), self.output_width()),
        };
        if connected {
            return Err(CircuitError::configuration(format!(
                "the {} of circuit '{}' is already connected",
                side.as_str(),
                self.variant
            )));
        }
        if declared != external.size {
            return Err(CircuitError::RangeOverflow {
                side: side.as_str(),
                declared,
                actual: external.size,
            });
        }
        Ok(())
    }

    fn commit_port_groups<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        side: Side,
        external: PopulationHandle,
        pending: &[ResolvedGroup],
    ) -> CircuitResult<()> {
        let mut views = Vec::with_capacity(pending.len());
        for group in pending {
            let (port, inner) = match (side, &group.src, &group.dst) {
                (Side::Input, Endpoint::Input(port), inner) => (port, inner),
                (Side::Output, inner, Endpoint::Output(port)) => (port, inner),
                _ => {
                    return Err(CircuitError::configuration(format!(
                        "group '{}' is not an {} port group",
                        group.name,
                        side.as_str()
                    )))
                }
            };
            let layout = match side {
                Side::Input => self.input_port(port),
                Side::Output => self.output_port(port),
            }
            .ok_or_else(|| CircuitError::configuration(format!("unknown {} port '{}'", side.as_str(), port)))?;
            let ported = engine.population_view(external, layout.range.clone())?;
            let owned = inner
                .population_name()
                .and_then(|name| self.population(name))
                .map(|handle| handle.full_view())
                .ok_or_else(|| {
                    CircuitError::configuration(format!("group '{}' has no circuit population", group.name))
                })?;
            let (src, dst): (PopulationView, PopulationView) = match side {
                Side::Input => (ported, owned),
                Side::Output => (owned, ported),
            };
            views.push((group, src, dst));
        }

        for (group, src, dst) in views {
            let record = group.commit(engine, src, dst)?;
            self.groups.push(record);
        }
        info!(
            circuit = %self.variant,
            side = side.as_str(),
            population = %external.id,
            width = external.size,
            "Connected external population"
        );
        Ok(())
    }
}
