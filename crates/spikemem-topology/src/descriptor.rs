// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Declarative topology descriptors.

A descriptor is plain data: which populations exist, how wide the external
ports are, and which rule wires each connection. Every memory variant is a
descriptor value; the assembler is the only code that interprets one.
*/

use core::fmt;
use ahash::AHashSet;

use spikemem_npu_neural::Polarity;

use crate::bits::bit_width;
use crate::connectivity::{ConnectionRule, WeightScale};
use crate::types::{CircuitError, CircuitResult};

/// Widths every size expression is resolved against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CircuitDimensions {
    pub cue: usize,
    pub content: usize,
}

/// Population or port size in terms of the circuit dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeExpr {
    Cue,
    Content,
    /// Bits needed to write the largest cue code: ⌈log2(cue + 1)⌉
    CueBits,
    Fixed(usize),
}

impl SizeExpr {
    pub fn resolve(&self, dims: CircuitDimensions) -> usize {
        match self {
            SizeExpr::Cue => dims.cue,
            SizeExpr::Content => dims.content,
            SizeExpr::CueBits => bit_width(dims.cue),
            SizeExpr::Fixed(n) => *n,
        }
    }
}

/// One end of a connection
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// A population the circuit owns
    Population(String),
    /// A sub-range of the external input population
    Input(String),
    /// A sub-range of the external output population
    Output(String),
}

impl Endpoint {
    pub fn population(name: impl Into<String>) -> Self {
        Endpoint::Population(name.into())
    }

    pub fn input(port: impl Into<String>) -> Self {
        Endpoint::Input(port.into())
    }

    pub fn output(port: impl Into<String>) -> Self {
        Endpoint::Output(port.into())
    }

    /// Owned population name, if this end is one
    pub fn population_name(&self) -> Option<&str> {
        match self {
            Endpoint::Population(name) => Some(name),
            Endpoint::Input(_) | Endpoint::Output(_) => None,
        }
    }

    pub fn is_port(&self) -> bool {
        !matches!(self, Endpoint::Population(_))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Population(name) => write!(f, "{}", name),
            Endpoint::Input(port) => write!(f, "input[{}]", port),
            Endpoint::Output(port) => write!(f, "output[{}]", port),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PopulationSpec {
    /// Also the key of the population's `neurons` and `initial_state` entries
    pub name: String,
    pub size: SizeExpr,
}

/// A named sub-range of an external I/O population; ranges are laid out in
/// declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct PortSpec {
    pub name: String,
    pub width: SizeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionSpec {
    /// Also the key of the connection's `synapses` entry
    pub name: String,
    pub src: Endpoint,
    pub dst: Endpoint,
    pub rule: ConnectionRule,
    pub polarity: Polarity,
    pub plastic: bool,
    pub weight_scale: WeightScale,
}

impl ConnectionSpec {
    /// Static connection with an unscaled weight
    pub fn new(
        name: impl Into<String>,
        src: Endpoint,
        dst: Endpoint,
        rule: ConnectionRule,
        polarity: Polarity,
    ) -> Self {
        Self {
            name: name.into(),
            src,
            dst,
            rule,
            polarity,
            plastic: false,
            weight_scale: WeightScale::Unit,
        }
    }

    pub fn plastic(mut self) -> Self {
        self.plastic = true;
        self
    }

    pub fn scaled(mut self, scale: WeightScale) -> Self {
        self.weight_scale = scale;
        self
    }
}

/// Complete description of one memory circuit
#[derive(Debug, Clone, PartialEq)]
pub struct TopologyDescriptor {
    pub name: String,
    pub populations: Vec<PopulationSpec>,
    pub inputs: Vec<PortSpec>,
    pub outputs: Vec<PortSpec>,
    pub connections: Vec<ConnectionSpec>,
}

impl TopologyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            populations: Vec::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            connections: Vec::new(),
        }
    }

    pub fn population(mut self, name: impl Into<String>, size: SizeExpr) -> Self {
        self.populations.push(PopulationSpec {
            name: name.into(),
            size,
        });
        self
    }

    pub fn input(mut self, name: impl Into<String>, width: SizeExpr) -> Self {
        self.inputs.push(PortSpec {
            name: name.into(),
            width,
        });
        self
    }

    pub fn output(mut self, name: impl Into<String>, width: SizeExpr) -> Self {
        self.outputs.push(PortSpec {
            name: name.into(),
            width,
        });
        self
    }

    pub fn connect(mut self, connection: ConnectionSpec) -> Self {
        self.connections.push(connection);
        self
    }

    pub fn population_spec(&self, name: &str) -> Option<&PopulationSpec> {
        self.populations.iter().find(|p| p.name == name)
    }

    /// Structural checks that need no parameter table
    pub fn validate(&self) -> CircuitResult<()> {
        let mut names = AHashSet::new();
        for spec in &self.populations {
            if !names.insert(spec.name.as_str()) {
                return Err(CircuitError::configuration(format!(
                    "population '{}' is declared twice in '{}'",
                    spec.name, self.name
                )));
            }
        }
        for (side, ports) in [("input", &self.inputs), ("output", &self.outputs)] {
            let mut seen = AHashSet::new();
            if let Some(port) = ports.iter().find(|p| !seen.insert(p.name.as_str())) {
                return Err(CircuitError::configuration(format!(
                    "{} port '{}' is declared twice",
                    side, port.name
                )));
            }
        }

        let mut connection_names = AHashSet::new();
        for connection in &self.connections {
            if !connection_names.insert(connection.name.as_str()) {
                return Err(CircuitError::configuration(format!(
                    "connection '{}' is declared twice",
                    connection.name
                )));
            }
            self.check_endpoint(connection, &connection.src, true)?;
            self.check_endpoint(connection, &connection.dst, false)?;
            if connection.plastic && (connection.src.is_port() || connection.dst.is_port()) {
                return Err(CircuitError::configuration(format!(
                    "plastic connection '{}' must join two circuit populations",
                    connection.name
                )));
            }
        }
        Ok(())
    }

    fn check_endpoint(&self, connection: &ConnectionSpec, end: &Endpoint, is_source: bool) -> CircuitResult<()> {
        let known = match end {
            Endpoint::Population(name) => self.population_spec(name).is_some(),
            Endpoint::Input(port) => is_source && self.inputs.iter().any(|p| &p.name == port),
            Endpoint::Output(port) => !is_source && self.outputs.iter().any(|p| &p.name == port),
        };
        if known {
            Ok(())
        } else {
            Err(CircuitError::configuration(format!(
                "connection '{}' refers to unknown or misplaced endpoint {}",
                connection.name, end
            )))
        }
    }
}
