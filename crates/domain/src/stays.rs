// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Hotel stays and guest-of-honor nights.

use crate::date_format::iso_date;
use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use time::Date;

/// A completed or planned hotel stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stay {
    /// The hotel or location name.
    pub name: String,
    /// The check-in date.
    #[serde(with = "iso_date")]
    pub check_in: Date,
    /// The check-out date, strictly after check-in.
    #[serde(with = "iso_date")]
    pub check_out: Date,
}

impl Stay {
    /// Creates a new stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or check-out is not after
    /// check-in.
    pub fn new(name: &str, check_in: Date, check_out: Date) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidStay(String::from(
                "Stay name cannot be empty",
            )));
        }
        if check_out <= check_in {
            return Err(DomainError::InvalidStay(format!(
                "check-out {check_out} must be after check-in {check_in}"
            )));
        }
        Ok(Self {
            name: name.to_string(),
            check_in,
            check_out,
        })
    }

    /// Returns the number of nights stayed.
    #[must_use]
    pub fn nights(&self) -> i64 {
        (self.check_out - self.check_in).whole_days()
    }

    /// Returns true once the stay has checked out by `reference`.
    #[must_use]
    pub fn is_completed(&self, reference: Date) -> bool {
        self.check_out <= reference
    }
}

/// A night credited through a guest-of-honor booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestOfHonorNight {
    /// The guest name or a description.
    pub name: String,
    /// The night's date.
    #[serde(with = "iso_date")]
    pub date: Date,
}

impl GuestOfHonorNight {
    /// Creates a new guest-of-honor night.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty.
    pub fn new(name: &str, date: Date) -> Result<Self, DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::InvalidGuestNight(String::from(
                "Guest name cannot be empty",
            )));
        }
        Ok(Self {
            name: name.to_string(),
            date,
        })
    }
}

/// Stays and guest-of-honor nights, each in insertion order.
///
/// Serializes to `{"stays": [...], "goh_nights": [...]}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StayLog {
    #[serde(default)]
    stays: Vec<Stay>,
    #[serde(default, rename = "goh_nights")]
    guest_nights: Vec<GuestOfHonorNight>,
}

impl StayLog {
    /// Creates an empty log.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stays: Vec::new(),
            guest_nights: Vec::new(),
        }
    }

    /// Returns every stay in insertion order.
    #[must_use]
    pub fn stays(&self) -> &[Stay] {
        &self.stays
    }

    /// Returns every guest-of-honor night in insertion order.
    #[must_use]
    pub fn guest_nights(&self) -> &[GuestOfHonorNight] {
        &self.guest_nights
    }

    /// Appends a stay.
    ///
    /// # Errors
    ///
    /// Returns an error if the stay is invalid; the log is unchanged.
    pub fn add_stay(&mut self, name: &str, check_in: Date, check_out: Date) -> Result<(), DomainError> {
        let stay: Stay = Stay::new(name, check_in, check_out)?;
        self.stays.push(stay);
        Ok(())
    }

    /// Removes and returns the stay at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn delete_stay(&mut self, index: usize) -> Result<Stay, DomainError> {
        if index >= self.stays.len() {
            return Err(DomainError::StayIndexOutOfRange {
                index,
                len: self.stays.len(),
            });
        }
        Ok(self.stays.remove(index))
    }

    /// Appends a guest-of-honor night.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty; the log is unchanged.
    pub fn add_guest_night(&mut self, name: &str, date: Date) -> Result<(), DomainError> {
        let night: GuestOfHonorNight = GuestOfHonorNight::new(name, date)?;
        self.guest_nights.push(night);
        Ok(())
    }

    /// Removes and returns the guest-of-honor night at `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is out of range.
    pub fn delete_guest_night(&mut self, index: usize) -> Result<GuestOfHonorNight, DomainError> {
        if index >= self.guest_nights.len() {
            return Err(DomainError::GuestNightIndexOutOfRange {
                index,
                len: self.guest_nights.len(),
            });
        }
        Ok(self.guest_nights.remove(index))
    }
}
