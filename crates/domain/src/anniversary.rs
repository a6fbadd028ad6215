// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Anniversary-year windows.
//!
//! Anniversary year `Y` of a card renewing on month `m`, day `d` is the
//! closed interval `[date(Y, m, d), date(Y, m, d) + 364 days]`. The label is
//! the year the annual fee is charged in.
//!
//! ## Invariants
//!
//! - `anniversary_year_of(window(Y).start) == Y`
//! - `anniversary_year_of(window(Y).end) == Y`
//! - Consecutive windows are contiguous unless a February 29 falls between
//!   one renewal date and the next. Then the day before the next renewal
//!   belongs to no window, and [`anniversary_year_of`] still assigns it to `Y`.

use crate::error::DomainError;
use crate::interval::{DateInterval, calendar_interval};
use crate::types::CardMeta;
use time::{Date, Duration, Month};

/// The number of days added to the window start to reach its end.
pub const ANNIVERSARY_WINDOW_DAYS: i64 = 364;

fn renewal_date(card: &CardMeta, year: i32) -> Result<Date, DomainError> {
    let invalid = || DomainError::InvalidDate {
        year,
        month: card.renewal_month(),
        day: card.renewal_day(),
    };
    let month: Month = Month::try_from(card.renewal_month()).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, card.renewal_day()).map_err(|_| invalid())
}

/// Computes the closed date window of an anniversary year.
///
/// # Arguments
///
/// * `card` - The card whose renewal date defines the window
/// * `year` - The anniversary-year label
///
/// # Errors
///
/// Returns an error if the renewal date cannot be built in `year` or the end
/// date overflows.
pub fn anniversary_window(card: &CardMeta, year: i32) -> Result<DateInterval, DomainError> {
    let start: Date = renewal_date(card, year)?;
    let end: Date = start
        .checked_add(Duration::days(ANNIVERSARY_WINDOW_DAYS))
        .ok_or_else(|| DomainError::DateArithmeticOverflow {
            operation: format!("computing the {year} anniversary window of '{}'", card.key()),
        })?;
    DateInterval::new(start, end)
}

/// Maps a date to the anniversary-year label it falls in.
///
/// Dates on or after the renewal date of their own year belong to that
/// year; earlier dates belong to the previous year.
///
/// # Errors
///
/// Returns an error if the renewal date cannot be built in the date's year.
pub fn anniversary_year_of(card: &CardMeta, date: Date) -> Result<i32, DomainError> {
    let renewal: Date = renewal_date(card, date.year())?;
    if date >= renewal {
        Ok(date.year())
    } else {
        Ok(date.year() - 1)
    }
}

/// Returns the first candidate year whose window contains `date`.
///
/// Unlike [`anniversary_year_of`], this returns `None` for the day before a
/// renewal that follows a leap day.
#[must_use]
pub fn find_anniversary_year<I>(card: &CardMeta, date: Date, candidates: I) -> Option<i32>
where
    I: IntoIterator<Item = i32>,
{
    candidates.into_iter().find(|year| {
        anniversary_window(card, *year).is_ok_and(|window| window.contains(date))
    })
}

/// Tests whether a calendar period overlaps an anniversary-year window.
///
/// # Returns
///
/// `false` when the period has no calendar interval (including every
/// anniversary-family period) or the window cannot be built.
#[must_use]
pub fn calendar_period_overlaps_anniversary_year(
    card: &CardMeta,
    period: &str,
    anniversary_year: i32,
) -> bool {
    let Some(period_interval) = calendar_interval(period) else {
        return false;
    };
    anniversary_window(card, anniversary_year)
        .is_ok_and(|window| period_interval.overlaps(&window))
}
