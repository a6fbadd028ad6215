// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Period identifiers.
//!
//! A period names one renewal slot of a benefit. Two families exist:
//!
//! - Calendar: `"2026"`, `"2026-H1"`, `"2026-Q3"`, `"2026-Jan"`
//! - Anniversary: `"2026-A07"`, `"2026-AH2-07"`, `"2026-AQ4-07"`, where the
//!   trailing `07` is the card's renewal month
//!
//! ## Invariants
//!
//! - The family is decided only by the substring `-A` followed by a digit,
//!   `H` or `Q`. `"2026-Apr"` and `"2026-Aug"` are calendar periods.
//! - The string form is the persisted format and is produced exactly by
//!   [`PeriodIdentifier`]'s `Display` implementation.

use crate::error::DomainError;
use crate::interval::{DateInterval, month_span};
use crate::types::{BenefitDefinition, CardMeta, Frequency, RenewalType};
use std::ops::RangeInclusive;
use std::str::FromStr;
use time::{Date, Month};

/// Month abbreviations used by calendar monthly periods, January first.
pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Year offsets (relative to today) for which periods are generated.
pub const PERIOD_HORIZON: RangeInclusive<i32> = -2..=1;

/// Resolves a month abbreviation, ignoring ASCII case.
pub(crate) fn month_from_abbreviation(value: &str) -> Option<Month> {
    let index: usize = MONTH_ABBREVIATIONS
        .iter()
        .position(|abbrev| abbrev.eq_ignore_ascii_case(value))?;
    let number: u8 = u8::try_from(index + 1).ok()?;
    Month::try_from(number).ok()
}

const fn month_abbreviation(month: Month) -> &'static str {
    MONTH_ABBREVIATIONS[month as usize - 1]
}

/// The sub-year unit of a calendar-family period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalendarUnit {
    /// The whole calendar year.
    Year,
    /// Half 1 (January-June) or 2 (July-December).
    Half(u8),
    /// Quarter 1-4.
    Quarter(u8),
    /// A single month.
    Month(Month),
}

/// The sub-year unit of an anniversary-family period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnniversaryUnit {
    /// The whole anniversary year.
    Year,
    /// Half 1 or 2 of the anniversary year.
    Half(u8),
    /// Quarter 1-4 of the anniversary year.
    Quarter(u8),
}

/// A typed period identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodIdentifier {
    /// A period on January-December boundaries.
    Calendar {
        /// The calendar year.
        year: i32,
        /// The sub-year unit.
        unit: CalendarUnit,
    },
    /// A period on card-renewal boundaries.
    Anniversary {
        /// The anniversary-year label (the year the window starts in).
        year: i32,
        /// The sub-year unit.
        unit: AnniversaryUnit,
        /// The card's renewal month (1-12).
        renewal_month: u8,
    },
}

impl PeriodIdentifier {
    /// Returns the period's year label.
    #[must_use]
    pub const fn year(&self) -> i32 {
        match self {
            Self::Calendar { year, .. } | Self::Anniversary { year, .. } => *year,
        }
    }

    /// Returns true for anniversary-family periods.
    #[must_use]
    pub const fn is_anniversary(&self) -> bool {
        matches!(self, Self::Anniversary { .. })
    }

    /// Returns the chronological sort key `(year, month)`.
    ///
    /// Agrees with [`parse_period_for_sorting`] on the string form.
    #[must_use]
    pub fn sort_key(&self) -> (i32, i32) {
        match self {
            Self::Calendar { year, unit } => {
                let month: i32 = match unit {
                    CalendarUnit::Year => 0,
                    CalendarUnit::Half(1) => 1,
                    CalendarUnit::Half(_) => 7,
                    CalendarUnit::Quarter(quarter) => (i32::from(*quarter) - 1) * 3 + 1,
                    CalendarUnit::Month(month) => i32::from(u8::from(*month)),
                };
                (*year, month)
            }
            Self::Anniversary {
                year,
                renewal_month,
                ..
            } => (*year, i32::from(*renewal_month)),
        }
    }

    /// Returns the date interval of a calendar-family period.
    ///
    /// Anniversary periods return `None`; their dates depend on the renewal
    /// day, see [`crate::anniversary_window`].
    #[must_use]
    pub fn calendar_interval(&self) -> Option<DateInterval> {
        let Self::Calendar { year, unit } = *self else {
            return None;
        };
        match unit {
            CalendarUnit::Year => month_span(year, Month::January, Month::December),
            CalendarUnit::Half(1) => month_span(year, Month::January, Month::June),
            CalendarUnit::Half(2) => month_span(year, Month::July, Month::December),
            CalendarUnit::Half(_) => None,
            CalendarUnit::Quarter(quarter) => {
                let first_number: u8 = quarter.checked_sub(1)?.checked_mul(3)?.checked_add(1)?;
                let first: Month = Month::try_from(first_number).ok()?;
                let last: Month = first.next().next();
                month_span(year, first, last)
            }
            CalendarUnit::Month(month) => month_span(year, month, month),
        }
    }
}

impl std::fmt::Display for PeriodIdentifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Calendar { year, unit } => match unit {
                CalendarUnit::Year => write!(f, "{year}"),
                CalendarUnit::Half(half) => write!(f, "{year}-H{half}"),
                CalendarUnit::Quarter(quarter) => write!(f, "{year}-Q{quarter}"),
                CalendarUnit::Month(month) => write!(f, "{year}-{}", month_abbreviation(*month)),
            },
            Self::Anniversary {
                year,
                unit,
                renewal_month,
            } => match unit {
                AnniversaryUnit::Year => write!(f, "{year}-A{renewal_month:02}"),
                AnniversaryUnit::Half(half) => write!(f, "{year}-AH{half}-{renewal_month:02}"),
                AnniversaryUnit::Quarter(quarter) => {
                    write!(f, "{year}-AQ{quarter}-{renewal_month:02}")
                }
            },
        }
    }
}

impl FromStr for PeriodIdentifier {
    type Err = DomainError;

    /// Parses the exact persisted format.
    ///
    /// Unlike [`parse_period_for_sorting`], this rejects out-of-range halves,
    /// quarters and renewal months.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::InvalidPeriod(value.to_string());
        let segments: Vec<&str> = value.split('-').collect();
        let year: i32 = parse_digits(segments[0]).ok_or_else(invalid)?;

        match segments.as_slice() {
            [_] => Ok(Self::Calendar {
                year,
                unit: CalendarUnit::Year,
            }),
            [_, unit] => {
                if let Some(month) = month_from_abbreviation(unit) {
                    return Ok(Self::Calendar {
                        year,
                        unit: CalendarUnit::Month(month),
                    });
                }
                if let Some(month) = unit.strip_prefix('A') {
                    return Ok(Self::Anniversary {
                        year,
                        unit: AnniversaryUnit::Year,
                        renewal_month: parse_renewal_month(month).ok_or_else(invalid)?,
                    });
                }
                if let Some(half) = unit.strip_prefix('H') {
                    return Ok(Self::Calendar {
                        year,
                        unit: CalendarUnit::Half(parse_ordinal(half, 2).ok_or_else(invalid)?),
                    });
                }
                if let Some(quarter) = unit.strip_prefix('Q') {
                    return Ok(Self::Calendar {
                        year,
                        unit: CalendarUnit::Quarter(parse_ordinal(quarter, 4).ok_or_else(invalid)?),
                    });
                }
                Err(invalid())
            }
            [_, unit, month] => {
                let renewal_month: u8 = parse_renewal_month(month).ok_or_else(invalid)?;
                let unit: AnniversaryUnit = if let Some(half) = unit.strip_prefix("AH") {
                    AnniversaryUnit::Half(parse_ordinal(half, 2).ok_or_else(invalid)?)
                } else if let Some(quarter) = unit.strip_prefix("AQ") {
                    AnniversaryUnit::Quarter(parse_ordinal(quarter, 4).ok_or_else(invalid)?)
                } else {
                    return Err(invalid());
                };
                Ok(Self::Anniversary {
                    year,
                    unit,
                    renewal_month,
                })
            }
            _ => Err(invalid()),
        }
    }
}

fn parse_digits(value: &str) -> Option<i32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse::<i32>().ok()
}

fn parse_ordinal(value: &str, max: u8) -> Option<u8> {
    let number: u8 = u8::try_from(parse_digits(value)?).ok()?;
    (1..=max).contains(&number).then_some(number)
}

fn parse_renewal_month(value: &str) -> Option<u8> {
    if value.len() != 2 {
        return None;
    }
    parse_ordinal(value, 12)
}

/// Enumerates every period a benefit can occupy around `today`.
///
/// # Arguments
///
/// * `benefit` - The benefit definition
/// * `card` - The card the benefit belongs to
/// * `today` - The reference date; periods cover years `today.year() - 2`
///   through `today.year() + 1`
///
/// # Returns
///
/// Periods in chronological order. Calendar every-4-years benefits and
/// anniversary monthly benefits have no period rule and produce nothing.
#[must_use]
pub fn generate_periods(
    benefit: &BenefitDefinition,
    card: &CardMeta,
    today: Date,
) -> Vec<PeriodIdentifier> {
    let renewal_month: u8 = card.renewal_month();
    let mut periods: Vec<PeriodIdentifier> = Vec::new();

    for offset in PERIOD_HORIZON {
        let year: i32 = today.year() + offset;
        let calendar = |unit: CalendarUnit| PeriodIdentifier::Calendar { year, unit };
        let anniversary = |unit: AnniversaryUnit| PeriodIdentifier::Anniversary {
            year,
            unit,
            renewal_month,
        };

        match (benefit.renewal_type(), benefit.frequency()) {
            (RenewalType::CalendarYear, Frequency::Yearly) => {
                periods.push(calendar(CalendarUnit::Year));
            }
            (RenewalType::CalendarYear, Frequency::HalfYearly) => {
                periods.extend((1..=2).map(|half| calendar(CalendarUnit::Half(half))));
            }
            (RenewalType::CalendarYear, Frequency::Quarterly) => {
                periods.extend((1..=4).map(|quarter| calendar(CalendarUnit::Quarter(quarter))));
            }
            (RenewalType::CalendarYear, Frequency::Monthly) => {
                let mut month: Month = Month::January;
                for _ in 0..12 {
                    periods.push(calendar(CalendarUnit::Month(month)));
                    month = month.next();
                }
            }
            (RenewalType::CardAnniversary, Frequency::Yearly | Frequency::EveryFourYears) => {
                periods.push(anniversary(AnniversaryUnit::Year));
            }
            (RenewalType::CardAnniversary, Frequency::HalfYearly) => {
                periods.extend((1..=2).map(|half| anniversary(AnniversaryUnit::Half(half))));
            }
            (RenewalType::CardAnniversary, Frequency::Quarterly) => {
                periods.extend(
                    (1..=4).map(|quarter| anniversary(AnniversaryUnit::Quarter(quarter))),
                );
            }
            (RenewalType::CalendarYear, Frequency::EveryFourYears)
            | (RenewalType::CardAnniversary, Frequency::Monthly) => {}
        }
    }

    periods
}

/// Returns true if the period string belongs to the anniversary family.
#[must_use]
pub fn is_anniversary_period(period: &str) -> bool {
    period.match_indices("-A").any(|(index, _)| {
        period[index + 2..]
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_digit() || c == 'H' || c == 'Q')
    })
}

/// Returns the leading year of a period string, if it parses.
#[must_use]
pub fn period_year(period: &str) -> Option<i32> {
    let year_part: &str = period.split('-').next()?;
    parse_digits(year_part)
}

/// Computes a chronological sort key `(year, month)` for any period string.
///
/// Resolution order:
/// 1. `"YYYY-Mon"` resolves to that month
/// 2. a second segment containing `A` resolves to the trailing one or two
///    digits of the month part (the last segment when there are three or
///    more, else the second segment), or 0
/// 3. `Q{n}` resolves to `(n - 1) * 3 + 1`
/// 4. `H{n}` resolves to 1 for the first half, 7 otherwise
/// 5. a bare year resolves to month 0
///
/// Anything else, including any numeric parse failure, yields the sentinel
/// `(0, 0)`, which sorts before every valid period.
#[must_use]
pub fn parse_period_for_sorting(period: &str) -> (i32, i32) {
    sort_key_of(period).unwrap_or((0, 0))
}

fn sort_key_of(period: &str) -> Option<(i32, i32)> {
    let segments: Vec<&str> = period.split('-').collect();
    let year: i32 = segments[0].trim().parse::<i32>().ok()?;

    let [_, unit, ..] = segments.as_slice() else {
        return Some((year, 0));
    };

    let four_digit_year: bool =
        segments[0].len() == 4 && segments[0].bytes().all(|b| b.is_ascii_digit());
    let abbreviated: Option<Month> = if segments.len() == 2 && four_digit_year {
        month_from_abbreviation(unit)
    } else {
        None
    };
    if let Some(month) = abbreviated {
        return Some((year, i32::from(u8::from(month))));
    }

    if unit.contains('A') {
        let month_part: String = if segments.len() > 2 {
            segments[segments.len() - 1].to_string()
        } else {
            unit.replace('A', "")
        };
        return Some((year, trailing_month(&month_part)));
    }

    if unit.contains('Q') {
        let quarter: i32 = unit.replace('Q', "").trim().parse::<i32>().ok()?;
        let month: i32 = quarter.checked_sub(1)?.checked_mul(3)?.checked_add(1)?;
        return Some((year, month));
    }

    if unit.contains('H') {
        let half: i32 = unit.replace('H', "").trim().parse::<i32>().ok()?;
        return Some((year, if half == 1 { 1 } else { 7 }));
    }

    None
}

fn trailing_month(month_part: &str) -> i32 {
    let bytes: &[u8] = month_part.as_bytes();
    let digit = |b: &u8| i32::from(*b - b'0');
    match bytes {
        [.., tens, ones] if tens.is_ascii_digit() && ones.is_ascii_digit() => {
            digit(tens) * 10 + digit(ones)
        }
        [.., ones] if ones.is_ascii_digit() => digit(ones),
        _ => 0,
    }
}

/// Stable-sorts items chronologically by their period string.
///
/// Items whose period does not parse sort first; ties keep input order.
pub fn sort_by_period<T, F>(items: &mut [T], period_of: F)
where
    F: Fn(&T) -> &str,
{
    items.sort_by_key(|item| parse_period_for_sorting(period_of(item)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use time::macros::date;

    fn card(renewal_month: u8) -> CardMeta {
        CardMeta::new("test_card_2025", "Test Card", Decimal::new(695, 0), renewal_month, 15)
            .unwrap()
    }

    fn benefit(frequency: Frequency, renewal_type: RenewalType) -> BenefitDefinition {
        BenefitDefinition::new("credit", "Credit", Decimal::new(100, 0), frequency, renewal_type)
            .unwrap()
    }

    fn generated(frequency: Frequency, renewal_type: RenewalType) -> Vec<String> {
        generate_periods(&benefit(frequency, renewal_type), &card(7), date!(2026 - 03 - 10))
            .iter()
            .map(ToString::to_string)
            .collect()
    }

    #[test]
    fn test_generate_calendar_yearly() {
        assert_eq!(
            generated(Frequency::Yearly, RenewalType::CalendarYear),
            vec!["2024", "2025", "2026", "2027"]
        );
    }

    #[test]
    fn test_generate_calendar_half_yearly() {
        let periods: Vec<String> = generated(Frequency::HalfYearly, RenewalType::CalendarYear);
        assert_eq!(periods.len(), 8);
        assert_eq!(&periods[..2], &["2024-H1", "2024-H2"]);
        assert_eq!(periods[7], "2027-H2");
    }

    #[test]
    fn test_generate_calendar_quarterly() {
        let periods: Vec<String> = generated(Frequency::Quarterly, RenewalType::CalendarYear);
        assert_eq!(periods.len(), 16);
        assert_eq!(&periods[4..8], &["2025-Q1", "2025-Q2", "2025-Q3", "2025-Q4"]);
    }

    #[test]
    fn test_generate_calendar_monthly_uses_abbreviations() {
        let periods: Vec<String> = generated(Frequency::Monthly, RenewalType::CalendarYear);
        assert_eq!(periods.len(), 48);
        assert_eq!(periods[0], "2024-Jan");
        assert_eq!(periods[11], "2024-Dec");
        assert_eq!(periods[47], "2027-Dec");
    }

    #[test]
    fn test_generate_anniversary_periods_pad_renewal_month() {
        assert_eq!(
            generated(Frequency::Yearly, RenewalType::CardAnniversary),
            vec!["2024-A07", "2025-A07", "2026-A07", "2027-A07"]
        );
        assert_eq!(
            generated(Frequency::EveryFourYears, RenewalType::CardAnniversary),
            vec!["2024-A07", "2025-A07", "2026-A07", "2027-A07"]
        );
        let halves: Vec<String> = generated(Frequency::HalfYearly, RenewalType::CardAnniversary);
        assert_eq!(&halves[..2], &["2024-AH1-07", "2024-AH2-07"]);
        let quarters: Vec<String> = generated(Frequency::Quarterly, RenewalType::CardAnniversary);
        assert_eq!(quarters.len(), 16);
        assert_eq!(quarters[3], "2024-AQ4-07");
    }

    #[test]
    fn test_generate_unsupported_combinations_produce_nothing() {
        assert!(generated(Frequency::EveryFourYears, RenewalType::CalendarYear).is_empty());
        assert!(generated(Frequency::Monthly, RenewalType::CardAnniversary).is_empty());
    }

    #[test]
    fn test_display_round_trips_through_from_str() {
        for period in [
            "2026", "2026-H2", "2026-Q3", "2026-Apr", "2026-Aug", "2026-A11", "2026-AH1-07",
            "2026-AQ4-01",
        ] {
            let parsed: PeriodIdentifier = period.parse().unwrap();
            assert_eq!(parsed.to_string(), period);
        }
    }

    #[test]
    fn test_from_str_distinguishes_month_abbreviations_from_anniversary() {
        assert_eq!(
            "2026-Apr".parse::<PeriodIdentifier>().unwrap(),
            PeriodIdentifier::Calendar {
                year: 2026,
                unit: CalendarUnit::Month(Month::April),
            }
        );
        assert!("2026-A04".parse::<PeriodIdentifier>().unwrap().is_anniversary());
    }

    #[test]
    fn test_from_str_rejects_malformed_periods() {
        for period in [
            "", "20x6", "2026-H3", "2026-Q0", "2026-A13", "2026-A7", "2026-AH3-07", "2026-AQ1-7",
            "2026-Foo", "2026-M01", "2026-AH1-07-01",
        ] {
            assert!(
                matches!(
                    period.parse::<PeriodIdentifier>(),
                    Err(DomainError::InvalidPeriod(_))
                ),
                "{period}"
            );
        }
    }

    #[test]
    fn test_is_anniversary_period() {
        assert!(is_anniversary_period("2026-A11"));
        assert!(is_anniversary_period("2026-AH1-07"));
        assert!(is_anniversary_period("2026-AQ2-07"));
        assert!(!is_anniversary_period("2026-Apr"));
        assert!(!is_anniversary_period("2026-Aug"));
        assert!(!is_anniversary_period("2026-H1"));
        assert!(!is_anniversary_period("2026"));
    }

    #[test]
    fn test_sort_key_for_documented_shapes() {
        assert_eq!(parse_period_for_sorting("2025-May"), (2025, 5));
        assert_eq!(parse_period_for_sorting("2026-Apr"), (2026, 4));
        assert_eq!(parse_period_for_sorting("2026-Aug"), (2026, 8));
        assert_eq!(parse_period_for_sorting("2026-Q1"), (2026, 1));
        assert_eq!(parse_period_for_sorting("2026-Q4"), (2026, 10));
        assert_eq!(parse_period_for_sorting("2025-H2"), (2025, 7));
        assert_eq!(parse_period_for_sorting("2026-A11"), (2026, 11));
        assert_eq!(parse_period_for_sorting("2025-AH1-11"), (2025, 11));
        assert_eq!(parse_period_for_sorting("2025-AQ3-04"), (2025, 4));
        assert_eq!(parse_period_for_sorting("2026"), (2026, 0));
    }

    #[test]
    fn test_sort_key_anniversary_fallbacks() {
        assert_eq!(parse_period_for_sorting("2026-A7"), (2026, 7));
        assert_eq!(parse_period_for_sorting("2026-A"), (2026, 0));
        assert_eq!(parse_period_for_sorting("2026-AH1-x"), (2026, 0));
    }

    #[test]
    fn test_sort_key_sentinel_for_unparseable() {
        assert_eq!(parse_period_for_sorting("garbage"), (0, 0));
        assert_eq!(parse_period_for_sorting("abc-Q1"), (0, 0));
        assert_eq!(parse_period_for_sorting("2026-Qx"), (0, 0));
        assert_eq!(parse_period_for_sorting("2026-Foo"), (0, 0));
        assert_eq!(parse_period_for_sorting(""), (0, 0));
    }

    #[test]
    fn test_sort_key_sentinel_for_oversized_quarter() {
        assert_eq!(parse_period_for_sorting("2026-Q2147483647"), (0, 0));
        assert_eq!(parse_period_for_sorting("2026-Q-2147483648"), (0, 0));
        assert_eq!(parse_period_for_sorting("2026-Q4"), (2026, 10));
    }

    #[test]
    fn test_month_abbreviation_needs_four_digit_year() {
        assert_eq!(parse_period_for_sorting("2026-Apr"), (2026, 4));
        assert_eq!(parse_period_for_sorting("26-Apr"), (26, 0));
        assert_eq!(parse_period_for_sorting("026-Mar"), (0, 0));
    }

    #[test]
    fn test_typed_sort_key_matches_string_sort_key() {
        for period in [
            "2026", "2026-H1", "2026-H2", "2026-Q2", "2026-Sep", "2026-A03", "2026-AQ2-11",
        ] {
            let parsed: PeriodIdentifier = period.parse().unwrap();
            assert_eq!(parsed.sort_key(), parse_period_for_sorting(period), "{period}");
        }
    }

    #[test]
    fn test_sort_by_period_is_stable() {
        let mut items: Vec<(&str, u32)> = vec![
            ("2025-Dec", 1),
            ("2025-Jan", 2),
            ("bogus", 3),
            ("2025-Q1", 4),
            ("2025-Jun", 5),
        ];
        sort_by_period(&mut items, |item| item.0);
        let order: Vec<u32> = items.iter().map(|item| item.1).collect();
        // "2025-Jan" and "2025-Q1" share key (2025, 1) and keep input order.
        assert_eq!(order, vec![3, 2, 4, 5, 1]);
    }

    #[test]
    fn test_calendar_interval_of_typed_quarter() {
        let period: PeriodIdentifier = "2026-Q3".parse().unwrap();
        let interval: DateInterval = period.calendar_interval().unwrap();
        assert_eq!(interval.start(), date!(2026 - 07 - 01));
        assert_eq!(interval.end(), date!(2026 - 09 - 30));
        assert!(
            "2026-A07"
                .parse::<PeriodIdentifier>()
                .unwrap()
                .calendar_interval()
                .is_none()
        );
    }

    #[test]
    fn test_period_year() {
        assert_eq!(period_year("2026-AH1-07"), Some(2026));
        assert_eq!(period_year("2026"), Some(2026));
        assert_eq!(period_year("x-Q1"), None);
    }
}
