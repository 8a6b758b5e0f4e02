// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synaptic computation module

pub mod contribution;

pub use contribution::*;
