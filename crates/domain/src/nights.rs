// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Year-to-date elite night totals from every source.

use crate::spending::NightsBreakdown;
use crate::stays::StayLog;
use serde::Serialize;
use time::Date;

/// Elite nights from card bonuses, stays and guest-of-honor bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NightsSummary {
    /// Nights granted at the start of the year.
    pub cc_yearly_start: i64,
    /// Card bonus nights that have posted.
    pub cc_nights_posted: i64,
    /// Card bonus nights awaiting the next statement.
    pub cc_nights_pending: i64,
    /// Nights from stays that have checked out.
    pub current_nights: i64,
    /// Nights from stays that have not checked out.
    pub upcoming_nights: i64,
    /// Guest-of-honor nights on or before the reference date.
    pub goh_nights: i64,
    /// Guest-of-honor nights after the reference date.
    pub goh_nights_upcoming: i64,
    /// Nights already credited.
    pub nights_posted: i64,
    /// Nights credited once everything pending and upcoming lands.
    pub nights_total: i64,
}

/// Builds the nights summary.
///
/// # Arguments
///
/// * `annual_start` - Bonus nights granted every January
/// * `personal` - Current-year personal card breakdown
/// * `business` - Current-year business card breakdown
/// * `log` - Recorded stays and guest-of-honor nights
/// * `reference` - The date separating completed from upcoming
#[must_use]
pub fn nights_summary(
    annual_start: u32,
    personal: NightsBreakdown,
    business: NightsBreakdown,
    log: &StayLog,
    reference: Date,
) -> NightsSummary {
    let cc_yearly_start: i64 = i64::from(annual_start);
    let cc_nights_posted: i64 = personal.posted + business.posted;
    let cc_nights_pending: i64 = personal.pending + business.pending;

    let (completed, upcoming): (Vec<_>, Vec<_>) = log
        .stays()
        .iter()
        .partition(|stay| stay.is_completed(reference));
    let current_nights: i64 = completed.iter().map(|stay| stay.nights()).sum();
    let upcoming_nights: i64 = upcoming.iter().map(|stay| stay.nights()).sum();

    let past_guest: usize = log
        .guest_nights()
        .iter()
        .filter(|night| night.date <= reference)
        .count();
    let goh_nights: i64 = i64::try_from(past_guest).unwrap_or(i64::MAX);
    let goh_nights_upcoming: i64 =
        i64::try_from(log.guest_nights().len() - past_guest).unwrap_or(i64::MAX);

    NightsSummary {
        cc_yearly_start,
        cc_nights_posted,
        cc_nights_pending,
        current_nights,
        upcoming_nights,
        goh_nights,
        goh_nights_upcoming,
        nights_posted: cc_yearly_start + current_nights + goh_nights + cc_nights_posted,
        nights_total: cc_yearly_start
            + current_nights
            + goh_nights
            + goh_nights_upcoming
            + personal.total
            + business.total
            + upcoming_nights,
    }
}
