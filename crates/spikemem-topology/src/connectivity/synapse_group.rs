// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Synapse group construction.

Resolution turns a connection spec and its parameter-table entry into fully
determined edge lists, weights, delays and receptor bindings without touching
an engine. Committing hands a resolved group to the engine.
*/

use spikemem_config::SynapseParameterSet;
use spikemem_npu_neural::{Edge, IfCurrExpParameters, ListEdge, Polarity, ReceptorChannel};
use spikemem_npu_plasticity::StdpParameters;
use spikemem_npu_runtime::{PopulationView, SimulationEngine, SynapseGroupHandle, SynapseKind};
use tracing::debug;

use super::rules::from_list;
use crate::descriptor::{CircuitDimensions, ConnectionSpec, Endpoint, SizeExpr};
use crate::types::{CircuitError, CircuitResult};

/// How the table weight of a connection becomes its effective weight
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WeightScale {
    /// Table weight as is
    Unit,
    /// Table weight times the size of a cooperating population, for
    /// winner-take-all inhibition that must hold at any width
    SizeOf(SizeExpr),
    /// Table weight plus the destination's `v_thresh - v_reset`
    ThresholdMargin,
}

impl WeightScale {
    pub fn apply(
        &self,
        weight: f32,
        dims: CircuitDimensions,
        dst_params: Option<&IfCurrExpParameters>,
    ) -> CircuitResult<f32> {
        match self {
            WeightScale::Unit => Ok(weight),
            WeightScale::SizeOf(size) => Ok(weight * size.resolve(dims) as f32),
            WeightScale::ThresholdMargin => dst_params
                .map(|params| weight + params.threshold_gap())
                .ok_or_else(|| {
                    CircuitError::configuration(
                        "threshold-margin weights need a destination population with neuron parameters",
                    )
                }),
        }
    }
}

/// Parameter-table entry of one connection with every required field present
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseSettings {
    pub weight: f32,
    pub delay: f32,
    pub receptor: ReceptorChannel,
    /// Present exactly for plastic connections
    pub stdp: Option<StdpParameters>,
    pub initial_edges: Option<Vec<ListEdge>>,
}

/// The receptor a group binds must carry the group's polarity
pub fn check_port_compatibility(
    connection: &str,
    polarity: Polarity,
    receptor: ReceptorChannel,
) -> CircuitResult<()> {
    if receptor.polarity() != polarity {
        return Err(CircuitError::PortCompatibility {
            connection: connection.to_string(),
            polarity,
            receptor,
        });
    }
    Ok(())
}

/// Read the `synapses.<name>` entry for a connection.
///
/// # Errors
///
/// `Configuration` for a missing entry or field, STDP constants that do not
/// validate, a delay shorter than one time step, or an explicit edge list on a
/// static connection. `PortCompatibility` when the receptor contradicts the
/// connection's polarity.
pub fn resolve_synapse_settings(
    name: &str,
    table: Option<&SynapseParameterSet>,
    polarity: Polarity,
    plastic: bool,
    timestep_ms: f32,
) -> CircuitResult<SynapseSettings> {
    let table = table.ok_or_else(|| {
        CircuitError::configuration(format!("no synapse parameters for connection '{}'", name))
    })?;
    let required = |value: Option<f32>, field: &str| {
        value.ok_or_else(|| {
            CircuitError::configuration(format!("synapses.{}.{} is missing", name, field))
        })
    };

    let weight = required(table.weight, "weight")?;
    let delay = required(table.delay, "delay")?;
    check_delay(name, delay, timestep_ms)?;

    let receptor = match &table.receptor {
        Some(text) => text
            .parse::<ReceptorChannel>()
            .map_err(|e| CircuitError::configuration(format!("synapses.{}.receptor: {}", name, e)))?,
        None => ReceptorChannel::for_polarity(polarity),
    };
    check_port_compatibility(name, polarity, receptor)?;

    let stdp = if plastic {
        let params = StdpParameters {
            tau_plus: required(table.tau_plus, "tau_plus")?,
            tau_minus: required(table.tau_minus, "tau_minus")?,
            a_plus: required(table.a_plus, "a_plus")?,
            a_minus: required(table.a_minus, "a_minus")?,
            w_min: required(table.w_min, "w_min")?,
            w_max: required(table.w_max, "w_max")?,
        };
        params
            .validate()
            .map_err(|e| CircuitError::configuration(format!("synapses.{}: {}", name, e)))?;
        Some(params)
    } else {
        None
    };

    let initial_edges = match &table.initial_edges {
        Some(_) if !plastic => {
            return Err(CircuitError::configuration(format!(
                "synapses.{}.initial_edges only applies to plastic connections",
                name
            )));
        }
        Some(list) => {
            let mut edges = Vec::with_capacity(list.len());
            for edge in list {
                check_delay(name, edge.delay, timestep_ms)?;
                edges.push(ListEdge {
                    src: edge.src,
                    dst: edge.dst,
                    weight: edge.weight,
                    delay: edge.delay,
                });
            }
            Some(edges)
        }
        None => None,
    };

    Ok(SynapseSettings {
        weight,
        delay,
        receptor,
        stdp,
        initial_edges,
    })
}

fn check_delay(name: &str, delay_ms: f32, timestep_ms: f32) -> CircuitResult<()> {
    let steps = (delay_ms / timestep_ms).round();
    if !steps.is_finite() || steps < 1.0 {
        return Err(CircuitError::configuration(format!(
            "synapses.{}: delay {} ms is shorter than one {} ms time step",
            name, delay_ms, timestep_ms
        )));
    }
    Ok(())
}

/// A synapse group ready to be handed to an engine
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedGroup {
    pub name: String,
    pub src: Endpoint,
    pub dst: Endpoint,
    pub edges: Vec<Edge>,
    pub kind: SynapseKind,
    pub polarity: Polarity,
    pub receptor: ReceptorChannel,
}

impl ResolvedGroup {
    /// Build the groups of one connection.
    ///
    /// Per-unit rules yield one group per destination unit, named
    /// `<connection>[<unit>]`. An explicit edge list replaces the rule's edges.
    pub fn resolve(
        spec: &ConnectionSpec,
        settings: &SynapseSettings,
        src_size: usize,
        dst_size: usize,
        dims: CircuitDimensions,
        dst_params: Option<&IfCurrExpParameters>,
    ) -> CircuitResult<Vec<ResolvedGroup>> {
        let weight = spec.weight_scale.apply(settings.weight, dims, dst_params)?;
        let kind = match settings.stdp {
            Some(rule) => SynapseKind::Plastic {
                rule,
                init_weight: weight,
                delay: settings.delay,
            },
            None => SynapseKind::Static {
                weight,
                delay: settings.delay,
            },
        };

        let edge_sets = match &settings.initial_edges {
            Some(list) => vec![(None, from_list(list, src_size, dst_size)?)],
            None => {
                let same_population = spec.src.population_name().is_some() && spec.src == spec.dst;
                spec.rule
                    .expand(src_size, dst_size, same_population, weight)?
                    .into_iter()
                    .map(|set| (set.unit, set.edges))
                    .collect()
            }
        };

        Ok(edge_sets
            .into_iter()
            .map(|(unit, edges)| ResolvedGroup {
                name: match unit {
                    Some(unit) => format!("{}[{}]", spec.name, unit),
                    None => spec.name.clone(),
                },
                src: spec.src.clone(),
                dst: spec.dst.clone(),
                edges,
                kind,
                polarity: spec.polarity,
                receptor: settings.receptor,
            })
            .collect())
    }

    pub fn is_plastic(&self) -> bool {
        self.kind.is_plastic()
    }

    /// Create the group in `engine` between two resolved views
    pub fn commit<E: SimulationEngine + ?Sized>(
        &self,
        engine: &mut E,
        src: PopulationView,
        dst: PopulationView,
    ) -> CircuitResult<SynapseGroupRecord> {
        let handle = engine.connect(src, dst, &self.edges, &self.kind, self.receptor)?;
        debug!(
            group = %self.name,
            src = %self.src,
            dst = %self.dst,
            edges = handle.edge_count,
            plastic = handle.plastic,
            receptor = %self.receptor,
            "Created synapse group"
        );
        Ok(SynapseGroupRecord {
            name: self.name.clone(),
            src: self.src.clone(),
            dst: self.dst.clone(),
            handle,
            polarity: self.polarity,
            receptor: self.receptor,
        })
    }
}

/// A synapse group that exists in an engine
#[derive(Debug, Clone, PartialEq)]
pub struct SynapseGroupRecord {
    pub name: String,
    pub src: Endpoint,
    pub dst: Endpoint,
    pub handle: SynapseGroupHandle,
    pub polarity: Polarity,
    pub receptor: ReceptorChannel,
}

impl SynapseGroupRecord {
    pub fn is_plastic(&self) -> bool {
        self.handle.plastic
    }
}
