// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cardperks::{BenefitInstanceState, StateKey, StateRepository, StayRepository};
use cardperks_domain::StayLog;
use std::path::{Path, PathBuf};

use crate::error::PersistenceError;
use crate::json::{JsonStateFile, JsonStayFile};
use crate::memory::MemoryStore;
use crate::sqlite::SqliteStore;

/// A storage backend chosen at startup.
///
/// Callers hold a single `Store` and use it as both repositories without
/// knowing which backend sits underneath.
#[derive(Debug)]
pub enum Store {
    /// The legacy pair of JSON files.
    Json {
        /// `benefits_state.json`.
        state: JsonStateFile,
        /// `stays_state.json`.
        stays: JsonStayFile,
    },
    /// One `SQLite` database for both.
    Sqlite(SqliteStore),
    /// Nothing is written anywhere.
    Memory(MemoryStore),
}

impl Store {
    /// Opens the JSON state and stays files.
    ///
    /// # Arguments
    ///
    /// * `state_path` - Path of the benefit state file
    /// * `stays_path` - Path of the stays file
    ///
    /// # Errors
    ///
    /// Returns an error if the state file exists but cannot be loaded.
    pub fn open_json(
        state_path: impl Into<PathBuf>,
        stays_path: impl Into<PathBuf>,
    ) -> Result<Self, PersistenceError> {
        Ok(Self::Json {
            state: JsonStateFile::open(state_path)?,
            stays: JsonStayFile::open(stays_path),
        })
    }

    /// Opens (or creates) a `SQLite` database file.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or loaded.
    pub fn open_sqlite(path: &Path) -> Result<Self, PersistenceError> {
        Ok(Self::Sqlite(SqliteStore::open(path)?))
    }

    /// Creates an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::Memory(MemoryStore::new())
    }
}

impl StateRepository for Store {
    type Error = PersistenceError;

    fn get(&self, key: &StateKey) -> Option<BenefitInstanceState> {
        match self {
            Self::Json { state, .. } => state.get(key),
            Self::Sqlite(store) => StateRepository::get(store, key),
            Self::Memory(store) => StateRepository::get(store, key),
        }
    }

    fn set(&mut self, key: StateKey, value: BenefitInstanceState) {
        match self {
            Self::Json { state, .. } => state.set(key, value),
            Self::Sqlite(store) => StateRepository::set(store, key, value),
            Self::Memory(store) => StateRepository::set(store, key, value),
        }
    }

    fn remove(&mut self, key: &StateKey) {
        match self {
            Self::Json { state, .. } => state.remove(key),
            Self::Sqlite(store) => StateRepository::remove(store, key),
            Self::Memory(store) => StateRepository::remove(store, key),
        }
    }

    fn entries(&self) -> Vec<(StateKey, BenefitInstanceState)> {
        match self {
            Self::Json { state, .. } => state.entries(),
            Self::Sqlite(store) => StateRepository::entries(store),
            Self::Memory(store) => StateRepository::entries(store),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Json { state, .. } => state.flush(),
            Self::Sqlite(store) => StateRepository::flush(store),
            Self::Memory(store) => StateRepository::flush(store),
        }
    }
}

impl StayRepository for Store {
    type Error = PersistenceError;

    fn stay_log(&self) -> &StayLog {
        match self {
            Self::Json { stays, .. } => stays.stay_log(),
            Self::Sqlite(store) => store.stay_log(),
            Self::Memory(store) => store.stay_log(),
        }
    }

    fn set_stay_log(&mut self, log: StayLog) {
        match self {
            Self::Json { stays, .. } => stays.set_stay_log(log),
            Self::Sqlite(store) => store.set_stay_log(log),
            Self::Memory(store) => store.set_stay_log(log),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        match self {
            Self::Json { stays, .. } => stays.flush(),
            Self::Sqlite(store) => StayRepository::flush(store),
            Self::Memory(store) => StayRepository::flush(store),
        }
    }
}
