// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply::apply_stay;
use crate::command::StayCommand;
use crate::error::CoreError;
use crate::repository::StayRepository;
use crate::state::StayTransition;
use cardperks_domain::StayLog;
use time::Date;
use tracing::info;

/// Records hotel stays and guest-of-honor nights.
///
/// Every accepted mutation is flushed before it returns. Rejected input
/// leaves the log unchanged.
#[derive(Debug)]
pub struct StayTracker<S: StayRepository> {
    repository: S,
}

impl<S: StayRepository> StayTracker<S> {
    /// Creates a new stay tracker.
    #[must_use]
    pub const fn new(repository: S) -> Self {
        Self { repository }
    }

    /// Returns the current log.
    #[must_use]
    pub fn log(&self) -> &StayLog {
        self.repository.stay_log()
    }

    /// Consumes the tracker and returns its repository.
    #[must_use]
    pub fn into_repository(self) -> S {
        self.repository
    }

    /// Records a stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty, check-out is not after
    /// check-in, or the log cannot be written.
    pub fn add_stay(&mut self, name: &str, check_in: Date, check_out: Date) -> Result<(), CoreError> {
        self.execute(StayCommand::AddStay {
            name: name.to_string(),
            check_in,
            check_out,
        })
    }

    /// Deletes a stay by index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the log cannot be
    /// written.
    pub fn delete_stay(&mut self, index: usize) -> Result<(), CoreError> {
        self.execute(StayCommand::DeleteStay { index })
    }

    /// Records a guest-of-honor night.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the log cannot be written.
    pub fn add_guest_night(&mut self, name: &str, date: Date) -> Result<(), CoreError> {
        self.execute(StayCommand::AddGuestNight {
            name: name.to_string(),
            date,
        })
    }

    /// Deletes a guest-of-honor night by index.
    ///
    /// # Errors
    ///
    /// Returns an error if the index is out of range or the log cannot be
    /// written.
    pub fn delete_guest_night(&mut self, index: usize) -> Result<(), CoreError> {
        self.execute(StayCommand::DeleteGuestNight { index })
    }

    fn execute(&mut self, command: StayCommand) -> Result<(), CoreError> {
        let transition: StayTransition = apply_stay(self.repository.stay_log(), command)?;
        let stays: usize = transition.new_log.stays().len();
        let guest_nights: usize = transition.new_log.guest_nights().len();

        let previous: StayLog = self.repository.stay_log().clone();
        self.repository.set_stay_log(transition.new_log);
        if let Err(err) = self.repository.flush() {
            self.repository.set_stay_log(previous);
            return Err(CoreError::StateFlushFailed(err.to_string()));
        }

        info!(
            "{}: {} stays, {} guest nights recorded",
            transition.action, stays, guest_nights
        );
        Ok(())
    }
}
