// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Spending streams: cumulative sums, awards, and the posted/pending split.
//!
//! ## Rules
//!
//! - Payments and fees never count toward rewards.
//! - Transactions are processed in transaction-date order; equal dates keep
//!   statement order.
//! - Year-to-date cumulative spend resets on the post-date year.
//! - A statement closes on the 23rd. Before the 3rd of a month the previous
//!   month's statement is the most recent one.

use crate::date_format::iso_date;
use crate::error::DomainError;
use crate::rewards::RewardSchedule;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::{Date, Month};

/// Transaction types that never earn rewards.
pub const EXCLUDED_TRANSACTION_TYPES: [&str; 2] = ["Payment", "Fee"];

/// Annual spend that earns the free-night certificate on the personal card.
pub const FREE_NIGHT_CERTIFICATE_SPEND: Decimal = Decimal::from_parts(15000, 0, 0, false, 0);

/// Day of month on which statements close.
pub const STATEMENT_CLOSING_DAY: u8 = 23;

/// One card transaction, with purchases as positive amounts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingTransaction {
    /// The date the purchase was made.
    #[serde(with = "iso_date")]
    pub transaction_date: Date,
    /// The date the charge posted to the account.
    #[serde(with = "iso_date")]
    pub post_date: Date,
    /// The spend amount. Refunds are negative.
    pub amount: Decimal,
    /// The statement's transaction type (e.g. "Sale", "Return", "Payment").
    pub kind: String,
    /// The merchant description.
    pub description: String,
}

impl SpendingTransaction {
    /// Returns true unless the transaction is a payment or a fee.
    #[must_use]
    pub fn counts_toward_rewards(&self) -> bool {
        !EXCLUDED_TRANSACTION_TYPES.contains(&self.kind.as_str())
    }
}

/// Which running total drives the award calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CumulativeScope {
    /// Spend accumulates over the card's lifetime.
    Lifetime,
    /// Spend resets at the start of every post-date year.
    PostDateYear,
}

/// A transaction annotated with running totals and its award.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RewardEvent {
    /// The underlying transaction.
    pub transaction: SpendingTransaction,
    /// Lifetime cumulative spend including this transaction.
    pub cumulative: Decimal,
    /// Cumulative spend within the post-date year including this transaction.
    pub year_cumulative: Decimal,
    /// Units awarded (positive) or clawed back (negative), if any.
    pub nights: Option<i64>,
}

impl RewardEvent {
    /// Returns the post-date year the event is attributed to.
    #[must_use]
    pub const fn year(&self) -> i32 {
        self.transaction.post_date.year()
    }
}

/// Runs a transaction stream through a reward schedule.
///
/// # Arguments
///
/// * `transactions` - Transactions in statement order
/// * `schedule` - The reward schedule
/// * `scope` - Which running total drives awards
///
/// # Returns
///
/// One event per rewardable transaction, in transaction-date order.
#[must_use]
pub fn calculate_rewards(
    transactions: &[SpendingTransaction],
    schedule: &RewardSchedule,
    scope: CumulativeScope,
) -> Vec<RewardEvent> {
    let mut ordered: Vec<&SpendingTransaction> = transactions
        .iter()
        .filter(|t| t.counts_toward_rewards())
        .collect();
    ordered.sort_by_key(|t| t.transaction_date);

    let mut cumulative: Decimal = Decimal::ZERO;
    let mut year_totals: HashMap<i32, Decimal> = HashMap::new();
    let mut events: Vec<RewardEvent> = Vec::with_capacity(ordered.len());

    for transaction in ordered {
        let previous: Decimal = cumulative;
        cumulative += transaction.amount;

        let year_total: &mut Decimal = year_totals
            .entry(transaction.post_date.year())
            .or_insert(Decimal::ZERO);
        let previous_year: Decimal = *year_total;
        *year_total += transaction.amount;
        let year_cumulative: Decimal = *year_total;

        let nights: Option<i64> = match scope {
            CumulativeScope::Lifetime => schedule.award(previous, cumulative),
            CumulativeScope::PostDateYear => schedule.award(previous_year, year_cumulative),
        };

        events.push(RewardEvent {
            transaction: transaction.clone(),
            cumulative,
            year_cumulative,
            nights,
        });
    }

    events
}

/// Returns the sum of every award and clawback.
#[must_use]
pub fn total_bonus_nights(events: &[RewardEvent]) -> i64 {
    events.iter().filter_map(|event| event.nights).sum()
}

/// Returns the close date of the most recent statement.
///
/// # Errors
///
/// Returns an error if the previous month cannot be represented.
pub fn statement_cutoff(today: Date) -> Result<Date, DomainError> {
    let (year, month): (i32, Month) = if today.day() > 2 {
        (today.year(), today.month())
    } else if today.month() == Month::January {
        (today.year() - 1, Month::December)
    } else {
        (today.year(), today.month().previous())
    };
    Date::from_calendar_date(year, month, STATEMENT_CLOSING_DAY).map_err(|_| {
        DomainError::InvalidDate {
            year,
            month: u8::from(month),
            day: STATEMENT_CLOSING_DAY,
        }
    })
}

/// Current-year bonus nights split at the statement cutoff.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightsBreakdown {
    /// Nights from transactions that posted on or before the cutoff.
    pub posted: i64,
    /// Nights from transactions that posted after the cutoff.
    pub pending: i64,
    /// `posted + pending`.
    pub total: i64,
}

/// Splits the current year's awards into posted and pending nights.
///
/// Only events whose post date falls in `today`'s year are counted.
///
/// # Errors
///
/// Returns an error if the statement cutoff cannot be computed.
pub fn yearly_breakdown(events: &[RewardEvent], today: Date) -> Result<NightsBreakdown, DomainError> {
    let cutoff: Date = statement_cutoff(today)?;
    let current_year: Vec<&RewardEvent> = events
        .iter()
        .filter(|event| event.year() == today.year())
        .collect();

    let total: i64 = current_year.iter().filter_map(|event| event.nights).sum();
    let posted: i64 = current_year
        .iter()
        .filter(|event| event.transaction.post_date <= cutoff)
        .filter_map(|event| event.nights)
        .sum();

    Ok(NightsBreakdown {
        posted,
        pending: total - posted,
        total,
    })
}

/// Progress of the personal card toward its next bonus and certificate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonalSpendingSummary {
    /// Lifetime spend.
    pub total_spending: Decimal,
    /// Spend in the current post-date year.
    pub ytd_spending: Decimal,
    /// The lifetime tier reached.
    pub current_tier: i64,
    /// Spend remaining to the next tier.
    pub spend_to_next_bonus: Decimal,
    /// Spend remaining this year to the free-night certificate.
    pub spend_to_certificate: Decimal,
    /// Spend at which the current tier started.
    pub current_threshold: Decimal,
    /// Spend at which the next tier starts.
    pub next_threshold: Decimal,
}

/// Progress of the business card toward its next bonus this year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BusinessSpendingSummary {
    /// Spend in the current post-date year.
    pub ytd_spending: Decimal,
    /// The tier reached this year.
    pub current_tier: i64,
    /// Spend remaining to the next tier.
    pub spend_to_next_bonus: Decimal,
    /// Spend at which the current tier started.
    pub current_threshold: Decimal,
    /// Spend at which the next tier starts.
    pub next_threshold: Decimal,
}

fn cents(value: Decimal) -> Decimal {
    value.round_dp(2)
}

fn ytd_spending(events: &[RewardEvent], current_year: i32) -> Decimal {
    events
        .iter()
        .rev()
        .find(|event| event.year() == current_year)
        .map_or(Decimal::ZERO, |event| event.year_cumulative)
}

/// Tier position of a running total: tier, current threshold, next threshold.
fn tier_position(schedule: &RewardSchedule, spend: Decimal) -> (i64, Decimal, Decimal) {
    let tier: i64 = schedule.tier_of(spend).max(0);
    let current_threshold: Decimal = Decimal::from(tier) * schedule.tier_increment();
    let next_threshold: Decimal = current_threshold + schedule.tier_increment();
    (tier, current_threshold, next_threshold)
}

/// Summarizes personal card progress.
///
/// # Returns
///
/// `None` when there are no events.
#[must_use]
pub fn personal_spending_summary(
    events: &[RewardEvent],
    schedule: &RewardSchedule,
    current_year: i32,
) -> Option<PersonalSpendingSummary> {
    let latest: &RewardEvent = events.last()?;
    let total_spending: Decimal = latest.cumulative;
    let ytd: Decimal = ytd_spending(events, current_year);
    let (current_tier, current_threshold, next_threshold) = tier_position(schedule, total_spending);

    Some(PersonalSpendingSummary {
        total_spending: cents(total_spending),
        ytd_spending: cents(ytd),
        current_tier,
        spend_to_next_bonus: cents((next_threshold - total_spending).max(Decimal::ZERO)),
        spend_to_certificate: cents((FREE_NIGHT_CERTIFICATE_SPEND - ytd).max(Decimal::ZERO)),
        current_threshold: cents(current_threshold),
        next_threshold: cents(next_threshold),
    })
}

/// Summarizes business card progress for the current year.
///
/// # Returns
///
/// `None` when there are no events.
#[must_use]
pub fn business_spending_summary(
    events: &[RewardEvent],
    schedule: &RewardSchedule,
    current_year: i32,
) -> Option<BusinessSpendingSummary> {
    if events.is_empty() {
        return None;
    }
    let ytd: Decimal = ytd_spending(events, current_year);
    let (current_tier, current_threshold, next_threshold) = tier_position(schedule, ytd);

    Some(BusinessSpendingSummary {
        ytd_spending: cents(ytd),
        current_tier,
        spend_to_next_bonus: cents((next_threshold - ytd).max(Decimal::ZERO)),
        current_threshold: cents(current_threshold),
        next_threshold: cents(next_threshold),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn purchase(transaction_date: Date, post_date: Date, amount: i64) -> SpendingTransaction {
        SpendingTransaction {
            transaction_date,
            post_date,
            amount: Decimal::from(amount),
            kind: String::from("Sale"),
            description: String::from("Merchant"),
        }
    }

    #[test]
    fn test_statement_cutoff_mid_month() {
        assert_eq!(
            statement_cutoff(date!(2026 - 05 - 10)).unwrap(),
            date!(2026 - 05 - 23)
        );
        assert_eq!(
            statement_cutoff(date!(2026 - 05 - 03)).unwrap(),
            date!(2026 - 05 - 23)
        );
    }

    #[test]
    fn test_statement_cutoff_early_month_uses_previous_statement() {
        assert_eq!(
            statement_cutoff(date!(2026 - 05 - 02)).unwrap(),
            date!(2026 - 04 - 23)
        );
        assert_eq!(
            statement_cutoff(date!(2026 - 01 - 01)).unwrap(),
            date!(2025 - 12 - 23)
        );
    }

    #[test]
    fn test_payments_and_fees_are_excluded() {
        let mut payment: SpendingTransaction =
            purchase(date!(2026 - 01 - 05), date!(2026 - 01 - 06), -6000);
        payment.kind = String::from("Payment");
        let mut fee: SpendingTransaction =
            purchase(date!(2026 - 01 - 05), date!(2026 - 01 - 06), 95);
        fee.kind = String::from("Fee");
        let sale: SpendingTransaction = purchase(date!(2026 - 01 - 07), date!(2026 - 01 - 08), 100);

        let events: Vec<RewardEvent> = calculate_rewards(
            &[payment, fee, sale],
            &RewardSchedule::personal(),
            CumulativeScope::Lifetime,
        );
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].cumulative, Decimal::from(100));
    }

    #[test]
    fn test_lifetime_cumulative_orders_by_transaction_date() {
        let transactions: Vec<SpendingTransaction> = vec![
            purchase(date!(2026 - 02 - 01), date!(2026 - 02 - 02), 3000),
            purchase(date!(2026 - 01 - 01), date!(2026 - 01 - 02), 4000),
        ];
        let events: Vec<RewardEvent> = calculate_rewards(
            &transactions,
            &RewardSchedule::personal(),
            CumulativeScope::Lifetime,
        );
        assert_eq!(events[0].transaction.amount, Decimal::from(4000));
        assert_eq!(events[0].nights, None);
        assert_eq!(events[1].cumulative, Decimal::from(7000));
        assert_eq!(events[1].nights, Some(2));
    }

    #[test]
    fn test_refund_claws_back_personal_nights() {
        let mut refund: SpendingTransaction =
            purchase(date!(2026 - 03 - 01), date!(2026 - 03 - 02), -4000);
        refund.kind = String::from("Return");
        let transactions: Vec<SpendingTransaction> = vec![
            purchase(date!(2026 - 01 - 01), date!(2026 - 01 - 02), 4900),
            purchase(date!(2026 - 02 - 01), date!(2026 - 02 - 02), 6100),
            refund,
        ];
        let events: Vec<RewardEvent> = calculate_rewards(
            &transactions,
            &RewardSchedule::personal(),
            CumulativeScope::Lifetime,
        );
        let nights: Vec<Option<i64>> = events.iter().map(|e| e.nights).collect();
        assert_eq!(nights, vec![None, Some(4), Some(-4)]);
        assert_eq!(total_bonus_nights(&events), 0);
    }

    #[test]
    fn test_business_cumulative_resets_by_post_date_year() {
        let transactions: Vec<SpendingTransaction> = vec![
            purchase(date!(2025 - 12 - 20), date!(2025 - 12 - 22), 9000),
            // Purchased in 2025 but posts in 2026.
            purchase(date!(2025 - 12 - 30), date!(2026 - 01 - 02), 2000),
            purchase(date!(2026 - 01 - 10), date!(2026 - 01 - 11), 8500),
        ];
        let events: Vec<RewardEvent> = calculate_rewards(
            &transactions,
            &RewardSchedule::business(),
            CumulativeScope::PostDateYear,
        );
        assert_eq!(events[1].year_cumulative, Decimal::from(2000));
        assert_eq!(events[2].year_cumulative, Decimal::from(10_500));
        assert_eq!(events[2].nights, Some(5));
        assert_eq!(events[2].cumulative, Decimal::from(19_500));
    }

    #[test]
    fn test_yearly_breakdown_splits_at_cutoff() {
        let transactions: Vec<SpendingTransaction> = vec![
            purchase(date!(2025 - 06 - 01), date!(2025 - 06 - 02), 10_000),
            purchase(date!(2026 - 03 - 01), date!(2026 - 03 - 02), 10_000),
            purchase(date!(2026 - 05 - 24), date!(2026 - 05 - 25), 10_000),
        ];
        let events: Vec<RewardEvent> = calculate_rewards(
            &transactions,
            &RewardSchedule::business(),
            CumulativeScope::PostDateYear,
        );
        let breakdown: NightsBreakdown = yearly_breakdown(&events, date!(2026 - 05 - 26)).unwrap();
        assert_eq!(
            breakdown,
            NightsBreakdown {
                posted: 5,
                pending: 10,
                total: 15,
            }
        );
    }

    #[test]
    fn test_yearly_breakdown_without_current_year_events() {
        let events: Vec<RewardEvent> = calculate_rewards(
            &[purchase(date!(2024 - 06 - 01), date!(2024 - 06 - 02), 10_000)],
            &RewardSchedule::business(),
            CumulativeScope::PostDateYear,
        );
        assert_eq!(
            yearly_breakdown(&events, date!(2026 - 05 - 26)).unwrap(),
            NightsBreakdown::default()
        );
    }

    #[test]
    fn test_personal_spending_summary() {
        let transactions: Vec<SpendingTransaction> = vec![
            purchase(date!(2025 - 06 - 01), date!(2025 - 06 - 02), 6000),
            SpendingTransaction {
                amount: Decimal::new(123_456, 2),
                ..purchase(date!(2026 - 02 - 01), date!(2026 - 02 - 02), 0)
            },
        ];
        let schedule: RewardSchedule = RewardSchedule::personal();
        let events: Vec<RewardEvent> =
            calculate_rewards(&transactions, &schedule, CumulativeScope::Lifetime);
        let summary: PersonalSpendingSummary =
            personal_spending_summary(&events, &schedule, 2026).unwrap();

        assert_eq!(summary.total_spending, Decimal::new(723_456, 2));
        assert_eq!(summary.ytd_spending, Decimal::new(123_456, 2));
        assert_eq!(summary.current_tier, 1);
        assert_eq!(summary.current_threshold, Decimal::from(5000));
        assert_eq!(summary.next_threshold, Decimal::from(10_000));
        assert_eq!(summary.spend_to_next_bonus, Decimal::new(276_544, 2));
        assert_eq!(summary.spend_to_certificate, Decimal::new(1_376_544, 2));
    }

    #[test]
    fn test_business_spending_summary_without_current_year_spend() {
        let schedule: RewardSchedule = RewardSchedule::business();
        let events: Vec<RewardEvent> = calculate_rewards(
            &[purchase(date!(2025 - 06 - 01), date!(2025 - 06 - 02), 25_000)],
            &schedule,
            CumulativeScope::PostDateYear,
        );
        let summary: BusinessSpendingSummary =
            business_spending_summary(&events, &schedule, 2026).unwrap();
        assert_eq!(summary.ytd_spending, Decimal::ZERO);
        assert_eq!(summary.current_tier, 0);
        assert_eq!(summary.spend_to_next_bonus, Decimal::from(10_000));
    }

    #[test]
    fn test_summaries_of_empty_stream() {
        assert!(personal_spending_summary(&[], &RewardSchedule::personal(), 2026).is_none());
        assert!(business_spending_summary(&[], &RewardSchedule::business(), 2026).is_none());
    }
}
