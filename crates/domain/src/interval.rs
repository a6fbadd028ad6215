// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Closed date intervals and the calendar-period interval resolver.

use crate::date_format::iso_date;
use crate::error::DomainError;
use crate::period::month_from_abbreviation;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// A closed interval of dates: both `start` and `end` are included.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateInterval {
    /// The first day of the interval (inclusive).
    #[serde(with = "iso_date")]
    start: Date,
    /// The last day of the interval (inclusive).
    #[serde(with = "iso_date")]
    end: Date,
}

impl DateInterval {
    /// Creates a new closed interval.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is before `start`.
    pub fn new(start: Date, end: Date) -> Result<Self, DomainError> {
        if end < start {
            return Err(DomainError::InvalidInterval { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first day (inclusive).
    #[must_use]
    pub const fn start(&self) -> Date {
        self.start
    }

    /// Returns the last day (inclusive).
    #[must_use]
    pub const fn end(&self) -> Date {
        self.end
    }

    /// Returns true if `date` falls within the interval.
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }

    /// Returns true if the two closed intervals share at least one day.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns the number of days covered, counting both ends.
    #[must_use]
    pub fn duration_days(&self) -> i64 {
        (self.end - self.start).whole_days() + 1
    }
}

/// Returns the last day of a month, respecting leap years.
pub(crate) fn last_day_of_month(year: i32, month: Month) -> Option<Date> {
    let (next_year, next_month): (i32, Month) = if month == Month::December {
        (year.checked_add(1)?, Month::January)
    } else {
        (year, month.next())
    };
    Date::from_calendar_date(next_year, next_month, 1)
        .ok()?
        .previous_day()
}

/// Builds the interval covering `first_month..=last_month` of `year`.
pub(crate) fn month_span(year: i32, first_month: Month, last_month: Month) -> Option<DateInterval> {
    let start: Date = Date::from_calendar_date(year, first_month, 1).ok()?;
    let end: Date = last_day_of_month(year, last_month)?;
    DateInterval::new(start, end).ok()
}

/// Resolves a calendar-family period string to its date interval.
///
/// Supported shapes:
/// - `"2026"` - January 1 to December 31
/// - `"2026-H1"` / `"2026-H2"` - first or second half
/// - `"2026-Q1"` .. `"2026-Q4"` - three-month block
/// - `"2026-Jan"` .. `"2026-Dec"` - one month
/// - `"2026-M01"` .. `"2026-M12"` - one month, legacy spelling
///
/// Month abbreviations are checked before the `M`/`H`/`Q` prefixes so that
/// names such as `"Mar"` or `"May"` are never read as a legacy month number.
///
/// # Returns
///
/// `None` for anything else, including anniversary-family periods.
#[must_use]
pub fn calendar_interval(period: &str) -> Option<DateInterval> {
    let Some((year_part, unit)) = period.split_once('-') else {
        let year: i32 = parse_year(period)?;
        return month_span(year, Month::January, Month::December);
    };
    let year: i32 = parse_year(year_part)?;

    if let Some(month) = month_from_abbreviation(unit) {
        return month_span(year, month, month);
    }

    if let Some(number) = unit.strip_prefix('M') {
        let month: Month = Month::try_from(number.parse::<u8>().ok()?).ok()?;
        return month_span(year, month, month);
    }

    if let Some(half) = unit.strip_prefix('H') {
        return match half {
            "1" => month_span(year, Month::January, Month::June),
            "2" => month_span(year, Month::July, Month::December),
            _ => None,
        };
    }

    if let Some(quarter) = unit.strip_prefix('Q') {
        return match quarter {
            "1" => month_span(year, Month::January, Month::March),
            "2" => month_span(year, Month::April, Month::June),
            "3" => month_span(year, Month::July, Month::September),
            "4" => month_span(year, Month::October, Month::December),
            _ => None,
        };
    }

    None
}

fn parse_year(value: &str) -> Option<i32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<i32>().ok()
}
