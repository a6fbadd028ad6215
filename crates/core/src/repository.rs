// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage seams.
//!
//! The core never sees file paths or connections. Implementations hold an
//! in-memory copy and write it out on `flush`.

use crate::state::{BenefitInstanceState, StateKey};
use cardperks_domain::StayLog;

/// Keyed storage for benefit instance state.
pub trait StateRepository {
    /// The error returned when persisting fails.
    type Error: std::error::Error;

    /// Returns the stored state for `key`, if any.
    fn get(&self, key: &StateKey) -> Option<BenefitInstanceState>;

    /// Stores `state` under `key`, replacing any previous value.
    fn set(&mut self, key: StateKey, state: BenefitInstanceState);

    /// Drops the entry for `key`, if any.
    fn remove(&mut self, key: &StateKey);

    /// Returns every stored entry.
    fn entries(&self) -> Vec<(StateKey, BenefitInstanceState)>;

    /// Persists pending changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn flush(&mut self) -> Result<(), Self::Error>;
}

/// Storage for the stay log.
pub trait StayRepository {
    /// The error returned when persisting fails.
    type Error: std::error::Error;

    /// Returns the current stay log.
    fn stay_log(&self) -> &StayLog;

    /// Replaces the stay log.
    fn set_stay_log(&mut self, log: StayLog);

    /// Persists pending changes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn flush(&mut self) -> Result<(), Self::Error>;
}
