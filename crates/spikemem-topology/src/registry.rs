// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Population registry.

Records every population a circuit creates. Handles are the only way other
components reference a population; lookup by name exists for assembly and
inspection.
*/

use ahash::AHashMap;
use spikemem_npu_neural::{IfCurrExpParameters, InitialState, ModelParameters};
use spikemem_npu_runtime::{PopulationHandle, SimulationEngine};
use tracing::debug;

use crate::types::{CircuitError, CircuitResult};

/// A created population and the parameters it was created with
#[derive(Debug, Clone, PartialEq)]
pub struct PopulationRecord {
    pub name: String,
    pub handle: PopulationHandle,
    pub params: IfCurrExpParameters,
    pub initial_state: InitialState,
}

/// Populations of one circuit, in creation order
#[derive(Debug, Clone, Default)]
pub struct PopulationRegistry {
    records: Vec<PopulationRecord>,
    by_name: AHashMap<String, usize>,
}

impl PopulationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a population in `engine` and set its initial state
    ///
    /// # Errors
    ///
    /// `Configuration` for a zero size, invalid parameters, or a name that is
    /// already registered. These checks run before the engine is called.
    pub fn create_population<E: SimulationEngine + ?Sized>(
        &mut self,
        engine: &mut E,
        name: &str,
        size: usize,
        params: &IfCurrExpParameters,
        initial_state: &InitialState,
    ) -> CircuitResult<PopulationHandle> {
        Self::check_population(name, size, params)?;
        if self.by_name.contains_key(name) {
            return Err(CircuitError::configuration(format!(
                "population '{}' already exists",
                name
            )));
        }

        let handle = engine.create_population(name, size, params)?;
        engine.set_initial_state(handle, initial_state)?;
        debug!(population = name, id = %handle.id, size, v_init = initial_state.v_init, "Registered population");

        self.by_name.insert(name.to_string(), self.records.len());
        self.records.push(PopulationRecord {
            name: name.to_string(),
            handle,
            params: *params,
            initial_state: *initial_state,
        });
        Ok(handle)
    }

    /// Checks `create_population` performs before touching an engine
    pub fn check_population(name: &str, size: usize, params: &IfCurrExpParameters) -> CircuitResult<()> {
        if size == 0 {
            return Err(CircuitError::configuration(format!(
                "population '{}' must have at least one unit",
                name
            )));
        }
        params
            .validate()
            .map_err(|e| CircuitError::configuration(format!("population '{}': {}", name, e)))
    }

    pub fn get(&self, name: &str) -> Option<&PopulationRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    pub fn handle(&self, name: &str) -> Option<PopulationHandle> {
        self.get(name).map(|record| record.handle)
    }

    /// Records in creation order
    pub fn iter(&self) -> impl Iterator<Item = &PopulationRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spikemem_npu_engine::ReferenceEngine;

    #[test]
    fn test_create_and_lookup() {
        let mut engine = ReferenceEngine::default();
        let mut registry = PopulationRegistry::new();
        let params = IfCurrExpParameters::default();
        let state = InitialState { v_init: -58.0 };

        let cue = registry
            .create_population(&mut engine, "cue", 5, &params, &state)
            .unwrap();
        assert_eq!(cue.size, 5);
        assert_eq!(registry.handle("cue"), Some(cue));
        assert_eq!(registry.get("cue").unwrap().initial_state.v_init, -58.0);
        assert_eq!(engine.membrane_potentials(cue).unwrap(), &[-58.0; 5]);
        assert!(registry.get("content").is_none());
    }

    #[test]
    fn test_rejections_leave_engine_untouched() {
        let mut engine = ReferenceEngine::default();
        let mut registry = PopulationRegistry::new();
        let params = IfCurrExpParameters::default();
        let state = InitialState::default();

        assert!(matches!(
            registry.create_population(&mut engine, "empty", 0, &params, &state),
            Err(CircuitError::Configuration(_))
        ));
        let broken = IfCurrExpParameters {
            cm: 0.0,
            ..params
        };
        assert!(registry
            .create_population(&mut engine, "broken", 3, &broken, &state)
            .is_err());
        assert_eq!(engine.population_count(), 0);

        registry
            .create_population(&mut engine, "cue", 3, &params, &state)
            .unwrap();
        assert!(registry
            .create_population(&mut engine, "cue", 3, &params, &state)
            .is_err());
        assert_eq!(engine.population_count(), 1);
        assert_eq!(registry.len(), 1);
    }
}
