// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod anniversary;
mod cooldown;
mod date_format;
mod error;
mod interval;
mod nights;
mod period;
mod rewards;
mod spending;
mod stays;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use anniversary::{
    ANNIVERSARY_WINDOW_DAYS, anniversary_window, anniversary_year_of,
    calendar_period_overlaps_anniversary_year, find_anniversary_year,
};
pub use cooldown::{COOLDOWN_YEARS, CooldownStatus, check_cooldown};
pub use date_format::{format_iso_date, iso_date, parse_iso_date};
pub use interval::{DateInterval, calendar_interval};
pub use nights::{NightsSummary, nights_summary};
pub use period::{
    AnniversaryUnit, CalendarUnit, MONTH_ABBREVIATIONS, PERIOD_HORIZON, PeriodIdentifier,
    generate_periods, is_anniversary_period, parse_period_for_sorting, period_year,
    sort_by_period,
};
pub use rewards::{RewardSchedule, SingleTierPolicy};
pub use spending::{
    BusinessSpendingSummary, CumulativeScope, EXCLUDED_TRANSACTION_TYPES,
    FREE_NIGHT_CERTIFICATE_SPEND, NightsBreakdown, PersonalSpendingSummary, RewardEvent,
    STATEMENT_CLOSING_DAY, SpendingTransaction, business_spending_summary, calculate_rewards,
    personal_spending_summary, statement_cutoff, total_bonus_nights, yearly_breakdown,
};
pub use stays::{GuestOfHonorNight, Stay, StayLog};

// Re-export public types
pub use error::DomainError;
pub use types::{
    BenefitDefinition, CardDefinition, CardMeta, DEFAULT_ANNUAL_BONUS_NIGHTS, Frequency,
    RenewalType, TrackerConfig,
};
pub use validation::{validate_card_definition, validate_custom_amount, validate_tracker_config};
