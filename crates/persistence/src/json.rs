// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The JSON files written by earlier versions of the tracker.
//!
//! `benefits_state.json` maps `"{benefit_id}|{period}"` to an instance
//! state. `stays_state.json` holds `{"stays": [...], "goh_nights": [...]}`.
//! Both are rewritten in full, indented by two spaces, on every flush.

use cardperks::{BenefitInstanceState, StateKey, StateRepository, StayRepository};
use cardperks_domain::StayLog;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::PersistenceError;

/// Serializes `value` with two-space indentation and writes it to `path`.
fn write_pretty<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    let mut contents: String = serde_json::to_string_pretty(value)?;
    contents.push('\n');
    std::fs::write(path, contents)?;
    Ok(())
}

/// Benefit state backed by a JSON object on disk.
#[derive(Debug, Clone)]
pub struct JsonStateFile {
    path: PathBuf,
    entries: BTreeMap<StateKey, BenefitInstanceState>,
}

impl JsonStateFile {
    /// Loads the state file at `path`.
    ///
    /// A missing file is an empty state; it is created on the first flush.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// a key is not of the form `benefit|period`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path: PathBuf = path.into();
        if !path.exists() {
            info!("State file {} not found, starting empty", path.display());
            return Ok(Self {
                path,
                entries: BTreeMap::new(),
            });
        }

        let contents: String = std::fs::read_to_string(&path)?;
        let raw: BTreeMap<String, BenefitInstanceState> = if contents.trim().is_empty() {
            BTreeMap::new()
        } else {
            serde_json::from_str(&contents)?
        };

        let mut entries: BTreeMap<StateKey, BenefitInstanceState> = BTreeMap::new();
        for (key, state) in raw {
            let key: StateKey = key
                .parse::<StateKey>()
                .map_err(|err| PersistenceError::InvalidRecord(err.to_string()))?;
            entries.insert(key, state);
        }

        info!(
            "Loaded {} benefit states from {}",
            entries.len(),
            path.display()
        );
        Ok(Self { path, entries })
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateRepository for JsonStateFile {
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
        let raw: BTreeMap<String, &BenefitInstanceState> = self
            .entries
            .iter()
            .map(|(key, state)| (key.to_string(), state))
            .collect();
        write_pretty(&self.path, &raw)?;
        debug!(
            "Wrote {} benefit states to {}",
            raw.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// The stay log backed by a JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonStayFile {
    path: PathBuf,
    log: StayLog,
}

impl JsonStayFile {
    /// Loads the stays file at `path`.
    ///
    /// A missing or unreadable file is an empty log.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path: PathBuf = path.into();
        let log: StayLog = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str::<StayLog>(&contents) {
                Ok(log) => {
                    info!(
                        "Loaded {} stays and {} guest nights from {}",
                        log.stays().len(),
                        log.guest_nights().len(),
                        path.display()
                    );
                    log
                }
                Err(err) => {
                    warn!(
                        "Stays file {} is corrupt, starting empty: {}",
                        path.display(),
                        err
                    );
                    StayLog::new()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StayLog::new(),
            Err(err) => {
                warn!(
                    "Stays file {} could not be read, starting empty: {}",
                    path.display(),
                    err
                );
                StayLog::new()
            }
        };
        Self { path, log }
    }

    /// Returns the file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StayRepository for JsonStayFile {
    type Error = PersistenceError;

    fn stay_log(&self) -> &StayLog {
        &self.log
    }

    fn set_stay_log(&mut self, log: StayLog) {
        self.log = log;
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        write_pretty(&self.path, &self.log)?;
        debug!("Wrote stays to {}", self.path.display());
        Ok(())
    }
}
