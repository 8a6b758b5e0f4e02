// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine abstraction traits and the handle types they exchange

pub mod engine;
pub mod handles;
pub mod kind;

pub use engine::SimulationEngine;
pub use handles::{PopulationHandle, PopulationView, SynapseGroupHandle};
pub use kind::SynapseKind;
