// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neuron Model Architecture
//!
//! Trait-based neuron models. Populations in a memory circuit all use
//! [`IfCurrExpModel`]; the trait is the seam the engine integrates through.

pub mod lif;
pub mod traits;

pub use lif::{IfCurrExpModel, IfCurrExpParameters, InitialState, IF_CURR_EXP};
pub use traits::{ModelParameters, NeuronModel};
