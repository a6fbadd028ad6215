// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cardperks_domain::{DomainError, StayLog, iso_date};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;

/// Usage state of one benefit in one period.
///
/// Entries are created on first mutation and are never deleted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BenefitInstanceState {
    /// Whether the benefit has been used and credited.
    #[serde(default)]
    pub posted: bool,
    /// The date the benefit was marked posted.
    #[serde(with = "iso_date::option", default)]
    pub post_date: Option<Date>,
    /// The amount actually used, when less than the face amount.
    #[serde(default)]
    pub custom_amount: Option<Decimal>,
    /// For calendar-family periods: the anniversary year the use counts
    /// toward.
    #[serde(default)]
    pub posted_anniversary_year: Option<i32>,
}

impl BenefitInstanceState {
    /// Returns the value credited for a posted benefit: the custom amount
    /// when positive, otherwise `face_amount`.
    #[must_use]
    pub fn credited_amount(&self, face_amount: Decimal) -> Decimal {
        match self.custom_amount {
            Some(amount) if amount > Decimal::ZERO => amount,
            _ => face_amount,
        }
    }
}

/// The persisted key of a benefit instance: `"{benefit_id}|{period}"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateKey {
    benefit_id: String,
    period: String,
}

impl StateKey {
    /// Creates a new state key.
    ///
    /// # Arguments
    ///
    /// * `benefit_id` - The unique benefit id
    /// * `period` - The period identifier string
    #[must_use]
    pub fn new(benefit_id: &str, period: &str) -> Self {
        Self {
            benefit_id: benefit_id.to_string(),
            period: period.to_string(),
        }
    }

    /// Returns the unique benefit id.
    #[must_use]
    pub fn benefit_id(&self) -> &str {
        &self.benefit_id
    }

    /// Returns the period identifier string.
    #[must_use]
    pub fn period(&self) -> &str {
        &self.period
    }
}

impl std::fmt::Display for StateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}|{}", self.benefit_id, self.period)
    }
}

impl FromStr for StateKey {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.split_once('|') {
            Some((benefit_id, period)) if !benefit_id.is_empty() && !period.is_empty() => {
                Ok(Self::new(benefit_id, period))
            }
            _ => Err(DomainError::InvalidBenefitId(format!(
                "state key '{value}' is not of the form 'benefit|period'"
            ))),
        }
    }
}

/// The result of a successful benefit state transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The key of the mutated instance.
    pub key: StateKey,
    /// The state after the transition.
    pub new_state: BenefitInstanceState,
    /// The command name, for logging.
    pub action: &'static str,
}

/// The result of a successful stay log transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StayTransition {
    /// The log after the transition.
    pub new_log: StayLog,
    /// The command name, for logging.
    pub action: &'static str,
}
