// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;
use time::Date;

/// A command represents user intent as data only.
///
/// Commands are the only way to request benefit state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Flip the posted flag of a benefit instance.
    ToggleBenefit {
        /// The unique benefit id.
        benefit_id: String,
        /// The period identifier.
        period: String,
        /// The anniversary year a calendar-family use counts toward.
        anniversary_year: Option<i32>,
    },
    /// Set the posted flag explicitly.
    SetPosted {
        /// The unique benefit id.
        benefit_id: String,
        /// The period identifier.
        period: String,
        /// The new posted flag.
        posted: bool,
        /// The post date; defaults to today when posting.
        post_date: Option<Date>,
    },
    /// Record or clear a partial-usage amount.
    SetCustomAmount {
        /// The unique benefit id.
        benefit_id: String,
        /// The period identifier.
        period: String,
        /// The amount used; `None` clears it.
        amount: Option<Decimal>,
    },
}

impl Command {
    /// Returns the unique benefit id the command targets.
    #[must_use]
    pub fn benefit_id(&self) -> &str {
        match self {
            Self::ToggleBenefit { benefit_id, .. }
            | Self::SetPosted { benefit_id, .. }
            | Self::SetCustomAmount { benefit_id, .. } => benefit_id,
        }
    }

    /// Returns the period the command targets.
    #[must_use]
    pub fn period(&self) -> &str {
        match self {
            Self::ToggleBenefit { period, .. }
            | Self::SetPosted { period, .. }
            | Self::SetCustomAmount { period, .. } => period,
        }
    }
}

/// A command against the stay log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StayCommand {
    /// Record a hotel stay.
    AddStay {
        /// The hotel or location name.
        name: String,
        /// The check-in date.
        check_in: Date,
        /// The check-out date.
        check_out: Date,
    },
    /// Remove a stay by position.
    DeleteStay {
        /// The zero-based index.
        index: usize,
    },
    /// Record a guest-of-honor night.
    AddGuestNight {
        /// The guest name or a description.
        name: String,
        /// The night's date.
        date: Date,
    },
    /// Remove a guest-of-honor night by position.
    DeleteGuestNight {
        /// The zero-based index.
        index: usize,
    },
}
