// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Card key is empty or invalid.
    InvalidCardKey(String),
    /// Benefit identifier is empty or invalid.
    InvalidBenefitId(String),
    /// A benefit identifier appears twice on the same card.
    DuplicateBenefitId {
        /// The card the duplicate was found on.
        card_key: String,
        /// The duplicated benefit identifier.
        benefit_id: String,
    },
    /// Renewal month is outside 1-12.
    InvalidRenewalMonth {
        /// The card whose renewal month is invalid.
        card_key: String,
        /// The invalid month.
        month: u8,
    },
    /// Renewal day does not exist in the renewal month.
    InvalidRenewalDay {
        /// The card whose renewal day is invalid.
        card_key: String,
        /// The renewal month.
        month: u8,
        /// The invalid day.
        day: u8,
    },
    /// A currency amount is invalid.
    InvalidAmount {
        /// The field holding the amount.
        field: String,
        /// Why the amount was rejected.
        reason: String,
    },
    /// A partial-usage amount is negative or exceeds the face amount.
    InvalidCustomAmount {
        /// The rejected amount.
        amount: Decimal,
        /// The benefit's face amount.
        face_amount: Decimal,
    },
    /// Period identifier could not be parsed.
    InvalidPeriod(String),
    /// A calendar date could not be constructed.
    InvalidDate {
        /// The year component.
        year: i32,
        /// The month component.
        month: u8,
        /// The day component.
        day: u8,
    },
    /// A date interval ends before it starts.
    InvalidInterval {
        /// The interval start.
        start: time::Date,
        /// The interval end.
        end: time::Date,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// Failed to parse date from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
    /// Reward schedule parameters are inconsistent.
    InvalidRewardSchedule(String),
    /// Stay input was rejected.
    InvalidStay(String),
    /// Guest-of-honor night input was rejected.
    InvalidGuestNight(String),
    /// Stay index does not exist.
    StayIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of recorded stays.
        len: usize,
    },
    /// Guest-of-honor night index does not exist.
    GuestNightIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// The number of recorded guest nights.
        len: usize,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCardKey(msg) => write!(f, "Invalid card key: {msg}"),
            Self::InvalidBenefitId(msg) => write!(f, "Invalid benefit id: {msg}"),
            Self::DuplicateBenefitId {
                card_key,
                benefit_id,
            } => {
                write!(
                    f,
                    "Benefit '{benefit_id}' is defined more than once on card '{card_key}'"
                )
            }
            Self::InvalidRenewalMonth { card_key, month } => {
                write!(
                    f,
                    "Invalid renewal month {month} for card '{card_key}'. Must be between 1 and 12"
                )
            }
            Self::InvalidRenewalDay {
                card_key,
                month,
                day,
            } => {
                write!(
                    f,
                    "Invalid renewal day {day} for card '{card_key}': month {month} has no such day"
                )
            }
            Self::InvalidAmount { field, reason } => {
                write!(f, "Invalid amount for {field}: {reason}")
            }
            Self::InvalidCustomAmount {
                amount,
                face_amount,
            } => {
                write!(
                    f,
                    "Invalid custom amount {amount}: must be between 0 and the face amount {face_amount}"
                )
            }
            Self::InvalidPeriod(period) => write!(f, "Invalid period identifier '{period}'"),
            Self::InvalidDate { year, month, day } => {
                write!(f, "Invalid calendar date {year:04}-{month:02}-{day:02}")
            }
            Self::InvalidInterval { start, end } => {
                write!(f, "Invalid date interval: {end} is before {start}")
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
            Self::InvalidRewardSchedule(msg) => write!(f, "Invalid reward schedule: {msg}"),
            Self::InvalidStay(msg) => write!(f, "Invalid stay: {msg}"),
            Self::InvalidGuestNight(msg) => write!(f, "Invalid guest-of-honor night: {msg}"),
            Self::StayIndexOutOfRange { index, len } => {
                write!(f, "Stay index {index} is out of range ({len} stays recorded)")
            }
            Self::GuestNightIndexOutOfRange { index, len } => {
                write!(
                    f,
                    "Guest-of-honor night index {index} is out of range ({len} recorded)"
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
