// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Availability of benefits that may be used once every four years.

use serde::Serialize;

/// Anniversary years that must pass before the benefit can be used again.
pub const COOLDOWN_YEARS: i32 = 4;

/// Availability of an every-4-years benefit in one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CooldownStatus {
    /// Whether the benefit can be used in the checked period.
    pub is_available: bool,
    /// The first year the benefit can be used again; absent when available.
    pub next_available_year: Option<i32>,
    /// The most recent year the benefit was used, if ever.
    pub last_used_year: Option<i32>,
}

impl CooldownStatus {
    /// A benefit that has never been used.
    #[must_use]
    pub const fn unused() -> Self {
        Self {
            is_available: true,
            next_available_year: None,
            last_used_year: None,
        }
    }

    /// Returns the reason shown when the benefit cannot be used.
    #[must_use]
    pub fn disabled_reason(&self) -> Option<String> {
        if self.is_available {
            return None;
        }
        match (self.last_used_year, self.next_available_year) {
            (Some(last), Some(next)) => Some(format!("Used in {last}, available again in {next}")),
            _ => None,
        }
    }
}

/// Checks whether an every-4-years benefit is available.
///
/// # Arguments
///
/// * `current_year` - The year of the period being checked
/// * `usage_years` - The years of every posted use of this benefit
///
/// # Returns
///
/// Unused benefits are available. Otherwise the benefit is available from
/// `last_used + 4` onward; `next_available_year` is reported only while it is
/// unavailable.
#[must_use]
pub fn check_cooldown<I>(current_year: i32, usage_years: I) -> CooldownStatus
where
    I: IntoIterator<Item = i32>,
{
    let Some(last_used) = usage_years.into_iter().max() else {
        return CooldownStatus::unused();
    };
    let next_available: i32 = last_used.saturating_add(COOLDOWN_YEARS);

    if current_year >= next_available {
        CooldownStatus {
            is_available: true,
            next_available_year: None,
            last_used_year: Some(last_used),
        }
    } else {
        CooldownStatus {
            is_available: false,
            next_available_year: Some(next_available),
            last_used_year: Some(last_used),
        }
    }
}
