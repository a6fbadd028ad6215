// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cardperks::{BenefitInstanceState, StateKey, StateRepository, StayRepository};
use cardperks_domain::StayLog;
use std::collections::BTreeMap;

use crate::error::PersistenceError;

/// Benefit state and the stay log held only in memory.
///
/// Flushing never fails and writes nothing.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<StateKey, BenefitInstanceState>,
    log: StayLog,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `log`.
    #[must_use]
    pub fn with_stay_log(log: StayLog) -> Self {
        Self {
            entries: BTreeMap::new(),
            log,
        }
    }
}

impl StateRepository for MemoryStore {
    type Error = PersistenceError;

    fn get(&self, key: &StateKey) -> Option<BenefitInstanceState> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: StateKey, state: BenefitInstanceState) {
        self.entries.insert(key, state);
    }

    fn remove(&mut self, key: &StateKey) {
        self.entries.remove(key);
    }

    fn entries(&self) -> Vec<(StateKey, BenefitInstanceState)> {
        self.entries
            .iter()
            .map(|(key, state)| (key.clone(), *state))
            .collect()
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl StayRepository for MemoryStore {
    type Error = PersistenceError;

    fn stay_log(&self) -> &StayLog {
        &self.log
    }

    fn set_stay_log(&mut self, log: StayLog) {
        self.log = log;
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}
