// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Bonus-night reports assembled from statements, stays and the tracker.

use cardperks::{BenefitTracker, StateRepository};
use cardperks_domain::{
    BusinessSpendingSummary, CumulativeScope, NightsBreakdown, NightsSummary,
    PersonalSpendingSummary, RewardEvent, RewardSchedule, SpendingTransaction, StayLog,
    business_spending_summary, calculate_rewards, personal_spending_summary, total_bonus_nights,
    yearly_breakdown,
};
use serde::Serialize;
use std::path::Path;
use time::Date;
use tracing::debug;

use crate::error::ApiError;
use crate::statement::load_statement_folder;

/// Folder of personal card statements under the transactions root.
pub const PERSONAL_STATEMENTS_DIR: &str = "hyatt personal";

/// Folder of business card statements under the transactions root.
pub const BUSINESS_STATEMENTS_DIR: &str = "hyatt business";

/// Personal card spending and awards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalSpendingReport {
    /// Progress toward the next bonus; absent without transactions.
    pub summary: Option<PersonalSpendingSummary>,
    /// Every award and clawback summed.
    pub bonus_nights_earned: i64,
    /// This year's awards split at the statement cutoff.
    pub this_year: NightsBreakdown,
    /// Transactions with running totals, in transaction-date order.
    pub events: Vec<RewardEvent>,
}

/// Business card spending and awards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessSpendingReport {
    /// Progress toward the next bonus; absent without transactions.
    pub summary: Option<BusinessSpendingSummary>,
    /// Every award and clawback summed.
    pub bonus_nights_earned: i64,
    /// This year's awards split at the statement cutoff.
    pub this_year: NightsBreakdown,
    /// Transactions with running totals, in transaction-date order.
    pub events: Vec<RewardEvent>,
}

/// Both cards' spending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpendingReport {
    /// The personal card.
    pub personal: PersonalSpendingReport,
    /// The business card.
    pub business: BusinessSpendingReport,
}

/// Runs personal card transactions through the lifetime schedule.
///
/// # Errors
///
/// Returns an error if the statement cutoff for `today` cannot be computed.
pub fn personal_spending_report(
    transactions: &[SpendingTransaction],
    today: Date,
) -> Result<PersonalSpendingReport, ApiError> {
    let schedule: RewardSchedule = RewardSchedule::personal();
    let events: Vec<RewardEvent> =
        calculate_rewards(transactions, &schedule, CumulativeScope::Lifetime);
    debug!("Personal card: {} reward events", events.len());

    Ok(PersonalSpendingReport {
        summary: personal_spending_summary(&events, &schedule, today.year()),
        bonus_nights_earned: total_bonus_nights(&events),
        this_year: yearly_breakdown(&events, today)?,
        events,
    })
}

/// Runs business card transactions through the per-year schedule.
///
/// # Errors
///
/// Returns an error if the statement cutoff for `today` cannot be computed.
pub fn business_spending_report(
    transactions: &[SpendingTransaction],
    today: Date,
) -> Result<BusinessSpendingReport, ApiError> {
    let schedule: RewardSchedule = RewardSchedule::business();
    let events: Vec<RewardEvent> =
        calculate_rewards(transactions, &schedule, CumulativeScope::PostDateYear);
    debug!("Business card: {} reward events", events.len());

    Ok(BusinessSpendingReport {
        summary: business_spending_summary(&events, &schedule, today.year()),
        bonus_nights_earned: total_bonus_nights(&events),
        this_year: yearly_breakdown(&events, today)?,
        events,
    })
}

/// Loads both statement folders under `root` and reports on them.
///
/// # Arguments
///
/// * `root` - Directory holding the personal and business statement folders
/// * `today` - The reference date
///
/// # Errors
///
/// Returns an error if a statement cannot be loaded.
pub fn spending_report(root: &Path, today: Date) -> Result<SpendingReport, ApiError> {
    let personal: Vec<SpendingTransaction> =
        load_statement_folder(&root.join(PERSONAL_STATEMENTS_DIR))?;
    let business: Vec<SpendingTransaction> =
        load_statement_folder(&root.join(BUSINESS_STATEMENTS_DIR))?;

    Ok(SpendingReport {
        personal: personal_spending_report(&personal, today)?,
        business: business_spending_report(&business, today)?,
    })
}

/// Combines card awards, stays and guest nights into the year's night count.
#[must_use]
pub fn nights_report<R: StateRepository>(
    tracker: &BenefitTracker<R>,
    spending: &SpendingReport,
    log: &StayLog,
) -> NightsSummary {
    tracker.nights_summary(spending.personal.this_year, spending.business.this_year, log)
}
