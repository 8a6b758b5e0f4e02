// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
The memory variants shipped with the crate.

Each variant is a [`TopologyDescriptor`] plus a default parameter table.
Population names double as `neurons` keys and connection names as
`synapses` keys of that table.
*/

use core::fmt;
use core::str::FromStr;

use spikemem_config::{parse_config_str, CircuitConfig, KNOWN_VARIANTS};
use spikemem_npu_neural::Polarity::{Excitatory, Inhibitory};

use crate::connectivity::{ConnectionRule, DecoderPart, WeightScale};
use crate::descriptor::{ConnectionSpec, Endpoint, SizeExpr, TopologyDescriptor};
use crate::types::{CircuitError, CircuitResult};

const CA3_CONTENT_ADDRESSABLE_TOML: &str = include_str!("../config/ca3_content_addressable.toml");
const CA3_TOML: &str = include_str!("../config/ca3.toml");
const HIPPOCAMPUS_DG_CA1_TOML: &str = include_str!("../config/hippocampus_dg_ca1.toml");

/// A memory circuit layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemoryVariant {
    /// CA3 recalling in both directions, cue from content and content from cue
    Ca3ContentAddressable,
    /// CA3 with a single plastic cue → content projection
    Ca3,
    /// Binary cue decoded by DG, stored in CA3, re-encoded by CA1
    HippocampusDgCa1,
}

impl MemoryVariant {
    pub const ALL: [MemoryVariant; 3] = [
        MemoryVariant::Ca3ContentAddressable,
        MemoryVariant::Ca3,
        MemoryVariant::HippocampusDgCa1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryVariant::Ca3ContentAddressable => "ca3_content_addressable",
            MemoryVariant::Ca3 => "ca3",
            MemoryVariant::HippocampusDgCa1 => "hippocampus_dg_ca1",
        }
    }

    pub fn descriptor(&self) -> TopologyDescriptor {
        match self {
            MemoryVariant::Ca3ContentAddressable => ca3_content_addressable(),
            MemoryVariant::Ca3 => ca3(),
            MemoryVariant::HippocampusDgCa1 => hippocampus_dg_ca1(),
        }
    }

    /// Built-in parameter table
    pub fn default_config(&self) -> CircuitResult<CircuitConfig> {
        let document = match self {
            MemoryVariant::Ca3ContentAddressable => CA3_CONTENT_ADDRESSABLE_TOML,
            MemoryVariant::Ca3 => CA3_TOML,
            MemoryVariant::HippocampusDgCa1 => HIPPOCAMPUS_DG_CA1_TOML,
        };
        Ok(parse_config_str(document)?.circuit)
    }
}

impl fmt::Display for MemoryVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemoryVariant {
    type Err = CircuitError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MemoryVariant::ALL
            .into_iter()
            .find(|variant| variant.as_str() == s.trim())
            .ok_or_else(|| {
                CircuitError::configuration(format!(
                    "unknown memory variant '{}' (known: {})",
                    s,
                    KNOWN_VARIANTS.join(", ")
                ))
            })
    }
}

fn pop(name: &str) -> Endpoint {
    Endpoint::population(name)
}

fn excite(name: &str, src: Endpoint, dst: Endpoint, rule: ConnectionRule) -> ConnectionSpec {
    ConnectionSpec::new(name, src, dst, rule, Excitatory)
}

fn inhibit(name: &str, src: Endpoint, dst: Endpoint, rule: ConnectionRule) -> ConnectionSpec {
    ConnectionSpec::new(name, src, dst, rule, Inhibitory)
}

fn relay(name: &str, src: Endpoint, dst: Endpoint) -> ConnectionSpec {
    excite(name, src, dst, ConnectionRule::OneToOne)
}

const ALL_TO_ALL: ConnectionRule = ConnectionRule::AllToAll { exclude_self: false };
const LATERAL: ConnectionRule = ConnectionRule::AllToAll { exclude_self: true };

/// Content-addressable CA3.
///
/// `*_by_cue` populations are driven from the cue side and `*_by_content`
/// from the content side. `content_gate` only passes content-side activity on
/// to `content_by_content` while no cue is present: the cue vetoes every gate
/// unit, and `gate_interneuron` adds drive once content arrives alone.
pub fn ca3_content_addressable() -> TopologyDescriptor {
    let content_wide = WeightScale::SizeOf(SizeExpr::Content);
    TopologyDescriptor::new(MemoryVariant::Ca3ContentAddressable.as_str())
        .population("cue_by_cue", SizeExpr::Cue)
        .population("cue_by_content", SizeExpr::Cue)
        .population("content_by_cue", SizeExpr::Content)
        .population("content_by_content", SizeExpr::Content)
        .population("content_gate", SizeExpr::Content)
        .population("gate_interneuron", SizeExpr::Fixed(1))
        .population("cue_merge", SizeExpr::Cue)
        .population("content_merge", SizeExpr::Content)
        .input("cue", SizeExpr::Cue)
        .input("content", SizeExpr::Content)
        .output("cue", SizeExpr::Cue)
        .output("content", SizeExpr::Content)
        .connect(relay("input-cue_by_cue", Endpoint::input("cue"), pop("cue_by_cue")))
        .connect(relay("input-content_by_cue", Endpoint::input("content"), pop("content_by_cue")))
        // cue side
        .connect(relay("cue_by_cue-cue_by_content", pop("cue_by_cue"), pop("cue_by_content")))
        .connect(
            inhibit(
                "cue_by_cue-cue_by_content-inh",
                pop("cue_by_cue"),
                pop("cue_by_content"),
                ConnectionRule::AllButCorresponding,
            )
            .scaled(content_wide),
        )
        .connect(inhibit(
            "cue_by_cue-content_gate",
            pop("cue_by_cue"),
            pop("content_gate"),
            ConnectionRule::AllToOnePerUnit,
        ))
        // gate
        .connect(relay("content_by_cue-content_gate", pop("content_by_cue"), pop("content_gate")))
        .connect(excite(
            "content_by_cue-gate_interneuron",
            pop("content_by_cue"),
            pop("gate_interneuron"),
            ALL_TO_ALL,
        ))
        .connect(excite(
            "gate_interneuron-content_gate",
            pop("gate_interneuron"),
            pop("content_gate"),
            ALL_TO_ALL,
        ))
        .connect(relay("content_gate-content_by_content", pop("content_gate"), pop("content_by_content")))
        .connect(inhibit(
            "content_by_cue-content_by_cue",
            pop("content_by_cue"),
            pop("content_by_cue"),
            LATERAL,
        ))
        // associations
        .connect(
            excite("cue_by_cue-content_by_cue", pop("cue_by_cue"), pop("content_by_cue"), ALL_TO_ALL)
                .plastic(),
        )
        .connect(
            excite(
                "content_by_content-cue_by_content",
                pop("content_by_content"),
                pop("cue_by_content"),
                ALL_TO_ALL,
            )
            .plastic(),
        )
        .connect(
            inhibit("cue_by_content-cue_by_content", pop("cue_by_content"), pop("cue_by_content"), LATERAL)
                .scaled(content_wide),
        )
        // readout
        .connect(relay("cue_by_cue-cue_merge", pop("cue_by_cue"), pop("cue_merge")))
        .connect(relay("cue_by_content-cue_merge", pop("cue_by_content"), pop("cue_merge")))
        .connect(relay("content_by_cue-content_merge", pop("content_by_cue"), pop("content_merge")))
        .connect(relay("content_by_content-content_merge", pop("content_by_content"), pop("content_merge")))
        .connect(relay("cue_merge-output", pop("cue_merge"), Endpoint::output("cue")))
        .connect(relay("content_merge-output", pop("content_merge"), Endpoint::output("content")))
}

/// Plain CA3: one-hot cue, plastic cue → content
pub fn ca3() -> TopologyDescriptor {
    TopologyDescriptor::new(MemoryVariant::Ca3.as_str())
        .population("cue", SizeExpr::Cue)
        .population("content", SizeExpr::Content)
        .input("cue", SizeExpr::Cue)
        .input("content", SizeExpr::Content)
        .output("cue", SizeExpr::Cue)
        .output("content", SizeExpr::Content)
        .connect(relay("input-cue", Endpoint::input("cue"), pop("cue")))
        .connect(relay("input-content", Endpoint::input("content"), pop("content")))
        .connect(excite("cue-content", pop("cue"), pop("content"), ALL_TO_ALL).plastic())
        .connect(relay("cue-output", pop("cue"), Endpoint::output("cue")))
        .connect(relay("content-output", pop("content"), Endpoint::output("content")))
}

/// DG-CA3-CA1 with a binary cue.
///
/// Code `k` on the cue input activates DG unit `k - 1`; code 0 means no cue.
pub fn hippocampus_dg_ca1() -> TopologyDescriptor {
    TopologyDescriptor::new(MemoryVariant::HippocampusDgCa1.as_str())
        .population("dg", SizeExpr::Cue)
        .population("cue", SizeExpr::Cue)
        .population("content", SizeExpr::Content)
        .population("ca1", SizeExpr::CueBits)
        .input("cue", SizeExpr::CueBits)
        .input("content", SizeExpr::Content)
        .output("cue", SizeExpr::CueBits)
        .output("content", SizeExpr::Content)
        .connect(
            excite(
                "input-dg",
                Endpoint::input("cue"),
                pop("dg"),
                ConnectionRule::BinaryDecoder(DecoderPart::SetBits),
            )
            .scaled(WeightScale::ThresholdMargin),
        )
        .connect(
            inhibit(
                "input-dg-inh",
                Endpoint::input("cue"),
                pop("dg"),
                ConnectionRule::BinaryDecoder(DecoderPart::ClearBits),
            )
            .scaled(WeightScale::ThresholdMargin),
        )
        .connect(inhibit("dg-dg", pop("dg"), pop("dg"), LATERAL))
        .connect(relay("dg-cue", pop("dg"), pop("cue")))
        .connect(relay("input-content", Endpoint::input("content"), pop("content")))
        .connect(excite("cue-content", pop("cue"), pop("content"), ALL_TO_ALL).plastic())
        .connect(excite("cue-ca1", pop("cue"), pop("ca1"), ConnectionRule::BinaryEncoder))
        .connect(relay("ca1-output", pop("ca1"), Endpoint::output("cue")))
        .connect(relay("content-output", pop("content"), Endpoint::output("content")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_names_roundtrip() {
        for variant in MemoryVariant::ALL {
            assert_eq!(variant.as_str().parse::<MemoryVariant>().unwrap(), variant);
            assert!(KNOWN_VARIANTS.contains(&variant.as_str()));
        }
        assert!("ca2".parse::<MemoryVariant>().is_err());
    }

    #[test]
    fn test_descriptors_are_well_formed() {
        for variant in MemoryVariant::ALL {
            let descriptor = variant.descriptor();
            descriptor.validate().unwrap();
            assert_eq!(descriptor.name, variant.as_str());
        }
    }

    #[test]
    fn test_default_tables_cover_every_connection() {
        for variant in MemoryVariant::ALL {
            let config = variant.default_config().unwrap();
            assert_eq!(config.variant, variant.as_str());
            for connection in &variant.descriptor().connections {
                assert!(
                    config.synapses.contains_key(&connection.name),
                    "{} has no synapse entry for {}",
                    variant,
                    connection.name
                );
            }
        }
    }

    #[test]
    fn test_gate_population_sizes() {
        let descriptor = ca3_content_addressable();
        assert_eq!(descriptor.populations.len(), 8);
        assert_eq!(
            descriptor.population_spec("gate_interneuron").map(|p| p.size),
            Some(SizeExpr::Fixed(1))
        );
        let plastic: Vec<_> = descriptor
            .connections
            .iter()
            .filter(|c| c.plastic)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(plastic, vec!["cue_by_cue-content_by_cue", "content_by_content-cue_by_content"]);
    }
}
