// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tiered spend-to-reward conversion.
//!
//! Cumulative spend is divided into tiers of `tier_increment`. Moving from
//! one cumulative total to the next either awards units (crossing upward),
//! claws units back (dropping below a tier boundary, e.g. after a refund),
//! or changes nothing.
//!
//! ## Rules
//!
//! - `prev_tier = floor(prev / increment)`, `cur_tier = floor(cur / increment)`
//! - Upward by exactly one tier: the single-tier award
//! - Upward by several tiers: `table[cur_tier]` (highest tier only)
//! - Downward: `-table[prev_tier]`
//! - Nothing happens unless `cur_tier > 0`
//! - Table lookups past the last tier use the last tier's value

use crate::error::DomainError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// How a single-tier crossing is rewarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleTierPolicy {
    /// A fixed number of units regardless of the tier reached.
    Flat(i64),
    /// The table value of the tier reached.
    TableLookup,
}

/// A tier increment, single-tier policy and tier reward table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSchedule {
    tier_increment: Decimal,
    single_tier: SingleTierPolicy,
    /// `table[0]` is the value of tier 1.
    table: Vec<i64>,
}

impl RewardSchedule {
    /// Creates a new reward schedule.
    ///
    /// # Arguments
    ///
    /// * `tier_increment` - The spend per tier
    /// * `single_tier` - The policy for single-tier crossings
    /// * `table` - Reward units for tiers `1..=table.len()`
    ///
    /// # Errors
    ///
    /// Returns an error if the increment is not positive or the table is
    /// empty.
    pub fn new(
        tier_increment: Decimal,
        single_tier: SingleTierPolicy,
        table: Vec<i64>,
    ) -> Result<Self, DomainError> {
        if tier_increment <= Decimal::ZERO {
            return Err(DomainError::InvalidRewardSchedule(format!(
                "tier increment {tier_increment} must be positive"
            )));
        }
        if table.is_empty() {
            return Err(DomainError::InvalidRewardSchedule(String::from(
                "reward table must define at least one tier",
            )));
        }
        Ok(Self {
            tier_increment,
            single_tier,
            table,
        })
    }

    /// The personal card: 2 nights per $5,000, up to 22 nights at tier 11.
    #[must_use]
    pub fn personal() -> Self {
        Self {
            tier_increment: Decimal::from(5000),
            single_tier: SingleTierPolicy::Flat(2),
            table: (1..=11).map(|tier| tier * 2).collect(),
        }
    }

    /// The business card: 5 nights per $10,000 within a year, up to 30.
    #[must_use]
    pub fn business() -> Self {
        Self {
            tier_increment: Decimal::from(10000),
            single_tier: SingleTierPolicy::TableLookup,
            table: (1..=6).map(|tier| tier * 5).collect(),
        }
    }

    /// Returns the spend per tier.
    #[must_use]
    pub const fn tier_increment(&self) -> Decimal {
        self.tier_increment
    }

    /// Returns the tier reached by a cumulative spend, rounding down.
    #[must_use]
    pub fn tier_of(&self, cumulative: Decimal) -> i64 {
        let quotient: Decimal = (cumulative / self.tier_increment).floor();
        quotient.to_i64().unwrap_or(if quotient.is_sign_negative() {
            i64::MIN
        } else {
            i64::MAX
        })
    }

    /// Returns the table value of a tier, capped at the last tier.
    ///
    /// Tiers below 1 are worth nothing.
    #[must_use]
    pub fn table_value(&self, tier: i64) -> i64 {
        if tier < 1 {
            return 0;
        }
        let index: usize = usize::try_from(tier - 1)
            .unwrap_or(usize::MAX)
            .min(self.table.len() - 1);
        self.table[index]
    }

    /// Computes the award or clawback for moving from `previous` to
    /// `current` cumulative spend.
    ///
    /// # Returns
    ///
    /// The signed number of units, or `None` when no tier boundary that
    /// matters was crossed.
    #[must_use]
    pub fn award(&self, previous: Decimal, current: Decimal) -> Option<i64> {
        let previous_tier: i64 = self.tier_of(previous);
        let current_tier: i64 = self.tier_of(current);

        if current_tier <= 0 {
            return None;
        }

        if current_tier > previous_tier {
            if current_tier.saturating_sub(previous_tier) == 1 {
                return Some(match self.single_tier {
                    SingleTierPolicy::Flat(units) => units,
                    SingleTierPolicy::TableLookup => self.table_value(current_tier),
                });
            }
            return Some(self.table_value(current_tier));
        }

        if current_tier < previous_tier {
            return Some(-self.table_value(previous_tier));
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dollars(value: i64) -> Decimal {
        Decimal::from(value)
    }

    #[test]
    fn test_personal_single_tier_crossing_awards_two() {
        let schedule: RewardSchedule = RewardSchedule::personal();
        assert_eq!(schedule.award(dollars(4900), dollars(5100)), Some(2));
        assert_eq!(schedule.award(dollars(49_900), dollars(50_100)), Some(2));
    }

    #[test]
    fn test_personal_multi_tier_jump_uses_highest_tier() {
        let schedule: RewardSchedule = RewardSchedule::personal();
        assert_eq!(schedule.award(dollars(4900), dollars(11_000)), Some(4));
        assert_eq!(schedule.award(dollars(0), dollars(100_000)), Some(22));
    }

    #[test]
    fn test_personal_drop_claws_back_previous_tier() {
        let schedule: RewardSchedule = RewardSchedule::personal();
        assert_eq!(schedule.award(dollars(11_000), dollars(7000)), Some(-4));
    }

    #[test]
    fn test_no_change_within_tier_or_below_first_tier() {
        let schedule: RewardSchedule = RewardSchedule::personal();
        assert_eq!(schedule.award(dollars(2000), dollars(3000)), None);
        assert_eq!(schedule.award(dollars(6000), dollars(6500)), None);
        // Dropping into tier 0 is not clawed back.
        assert_eq!(schedule.award(dollars(5100), dollars(4900)), None);
    }

    #[test]
    fn test_business_uses_table_and_caps_at_thirty() {
        let schedule: RewardSchedule = RewardSchedule::business();
        assert_eq!(schedule.award(dollars(9900), dollars(10_100)), Some(5));
        assert_eq!(schedule.award(dollars(19_900), dollars(20_100)), Some(10));
        assert_eq!(schedule.award(dollars(59_900), dollars(60_100)), Some(30));
        assert_eq!(schedule.award(dollars(69_900), dollars(70_100)), Some(30));
    }

    #[test]
    fn test_fractional_cents_stay_in_lower_tier() {
        let schedule: RewardSchedule = RewardSchedule::personal();
        assert_eq!(schedule.tier_of(Decimal::new(499_999, 2)), 0);
        assert_eq!(schedule.tier_of(Decimal::new(500_000, 2)), 1);
        assert_eq!(schedule.tier_of(Decimal::new(-1, 2)), -1);
    }

    #[test]
    fn test_table_value_caps_and_floors() {
        let schedule: RewardSchedule = RewardSchedule::business();
        assert_eq!(schedule.table_value(0), 0);
        assert_eq!(schedule.table_value(3), 15);
        assert_eq!(schedule.table_value(i64::MAX), 30);
    }

    #[test]
    fn test_new_rejects_degenerate_schedules() {
        assert!(matches!(
            RewardSchedule::new(Decimal::ZERO, SingleTierPolicy::Flat(1), vec![1]),
            Err(DomainError::InvalidRewardSchedule(_))
        ));
        assert!(matches!(
            RewardSchedule::new(dollars(100), SingleTierPolicy::TableLookup, Vec::new()),
            Err(DomainError::InvalidRewardSchedule(_))
        ));
    }
}
