// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Card value summaries and the anniversary-year view.

use crate::error::CoreError;
use crate::repository::StateRepository;
use crate::tracker::{BenefitInstance, BenefitTracker};
use cardperks_domain::{
    CardDefinition, Frequency, NightsBreakdown, NightsSummary, StayLog,
    calendar_period_overlaps_anniversary_year, nights_summary, period_year,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

/// Current calendar-year value of one card entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardSummary {
    /// The card entry key.
    pub card_key: String,
    /// The card's display name.
    pub card_name: String,
    /// The annual fee.
    pub annual_fee: Decimal,
    /// Value of posted benefits.
    pub total_posted: Decimal,
    /// Face value of every benefit.
    pub total_potential: Decimal,
    /// Posted value minus the fee.
    pub net_value_posted: Decimal,
    /// Potential value minus the fee.
    pub net_value_potential: Decimal,
    /// Posted net value as a percentage of the fee.
    pub roi_posted: Decimal,
    /// Potential net value as a percentage of the fee.
    pub roi_potential: Decimal,
}

/// Value of one card entry within an anniversary year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    /// The anniversary year.
    pub year: i32,
    /// Value of benefits posted in this year.
    pub total_posted_year: Decimal,
    /// Face value of benefits still usable in this year.
    pub total_potential_year: Decimal,
    /// Posted value minus the fee.
    pub net_value_posted_year: Decimal,
    /// Posted net value as a percentage of the fee.
    pub roi_posted_year: Decimal,
}

/// Returns `(value - fee) / fee * 100`, or zero for fee-free cards.
fn roi(value: Decimal, annual_fee: Decimal) -> Decimal {
    if annual_fee > Decimal::ZERO {
        ((value - annual_fee) / annual_fee * Decimal::ONE_HUNDRED).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

impl<R: StateRepository> BenefitTracker<R> {
    /// Summarizes the current calendar year of a card entry.
    ///
    /// Only periods whose year is today's year are counted.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` if no entry has this key.
    pub fn card_summary(&self, card_key: &str) -> Result<CardSummary, CoreError> {
        let card: &CardDefinition = self.card(card_key)?;
        let current_year: i32 = self.today().year();
        let current: Vec<BenefitInstance> = self
            .card_benefits(card_key)
            .into_iter()
            .filter(|instance| period_year(&instance.period) == Some(current_year))
            .collect();

        let total_posted: Decimal = current
            .iter()
            .filter(|instance| instance.state.posted)
            .map(BenefitInstance::credited_amount)
            .sum();
        let total_potential: Decimal = current.iter().map(|instance| instance.amount).sum();
        let annual_fee: Decimal = card.meta.annual_fee();

        Ok(CardSummary {
            card_key: card_key.to_string(),
            card_name: card.meta.display_name().to_string(),
            annual_fee,
            total_posted,
            total_potential,
            net_value_posted: total_posted - annual_fee,
            net_value_potential: total_potential - annual_fee,
            roi_posted: roi(total_posted, annual_fee),
            roi_potential: roi(total_potential, annual_fee),
        })
    }

    /// Summarizes every card entry, in configuration order.
    #[must_use]
    pub fn all_card_summaries(&self) -> Vec<CardSummary> {
        self.config()
            .cards
            .iter()
            .filter_map(|card| self.card_summary(card.meta.key()).ok())
            .collect()
    }

    /// Lists the instances of a card that belong to an anniversary year.
    ///
    /// Anniversary periods belong to the year they are labelled with.
    /// Calendar periods belong to every anniversary year they overlap. The
    /// first instance of each `(category, period)` pair wins.
    #[must_use]
    pub fn filtered_benefits_for_year(&self, card_key: &str, year: i32) -> Vec<BenefitInstance> {
        let Some(card) = self.config().card(card_key) else {
            return Vec::new();
        };

        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut filtered: Vec<BenefitInstance> = Vec::new();
        for instance in self.card_benefits(card_key) {
            let include: bool = if instance.is_anniversary() {
                instance.period_anniversary_year() == Some(year)
            } else {
                calendar_period_overlaps_anniversary_year(&card.meta, &instance.period, year)
            };
            if include && seen.insert((instance.category.clone(), instance.period.clone())) {
                filtered.push(instance);
            }
        }

        debug!(
            "{} instances of card {} belong to anniversary year {}",
            filtered.len(),
            card_key,
            year
        );
        filtered
    }

    /// Totals posted and potential value of instances in an anniversary
    /// year.
    ///
    /// # Arguments
    ///
    /// * `benefits` - Instances already filtered to the year
    /// * `annual_fee` - The card entry's annual fee
    /// * `year` - The anniversary year
    ///
    /// # Returns
    ///
    /// Anniversary instances count toward potential (every-4-years ones only
    /// while available) and toward posted when posted. Calendar instances
    /// count toward potential unless posted in another year, and toward
    /// posted only when attributed to `year`.
    #[must_use]
    pub fn year_summary(
        &self,
        benefits: &[BenefitInstance],
        annual_fee: Decimal,
        year: i32,
    ) -> YearSummary {
        let mut total_posted_year: Decimal = Decimal::ZERO;
        let mut total_potential_year: Decimal = Decimal::ZERO;

        for instance in benefits {
            let attributed_here: bool = instance.state.posted_anniversary_year == Some(year);

            let counts_potential: bool = if instance.is_anniversary() {
                instance.frequency != Frequency::EveryFourYears
                    || self.every_four_years_info(instance).status.is_available
            } else {
                !instance.state.posted || attributed_here
            };
            if counts_potential {
                total_potential_year += instance.amount;
            }

            let counts_posted: bool =
                instance.state.posted && (instance.is_anniversary() || attributed_here);
            if counts_posted {
                total_posted_year += instance.credited_amount();
            }
        }

        let net_value_posted_year: Decimal = total_posted_year - annual_fee;
        YearSummary {
            year,
            total_posted_year,
            total_potential_year,
            net_value_posted_year,
            roi_posted_year: roi(total_posted_year, annual_fee),
        }
    }

    /// Explains why an instance cannot be changed in an anniversary year.
    ///
    /// # Returns
    ///
    /// The cooldown reason for a locked every-4-years benefit, or
    /// `"Used in {year}"` for a posted calendar benefit attributed to another
    /// anniversary year. `None` when the instance can be changed.
    #[must_use]
    pub fn lock_reason(&self, instance: &BenefitInstance, year: i32) -> Option<String> {
        if instance.frequency == Frequency::EveryFourYears {
            let reason: Option<String> = self.every_four_years_info(instance).disabled_reason;
            if reason.is_some() {
                return reason;
            }
        }
        if instance.is_anniversary() || !instance.state.posted {
            return None;
        }
        match instance.state.posted_anniversary_year {
            Some(attributed) if attributed != year => Some(format!("Used in {attributed}")),
            _ => None,
        }
    }

    /// Builds the nights summary using the configured annual bonus.
    #[must_use]
    pub fn nights_summary(
        &self,
        personal: NightsBreakdown,
        business: NightsBreakdown,
        log: &StayLog,
    ) -> NightsSummary {
        nights_summary(
            self.config().annual_bonus_nights,
            personal,
            business,
            log,
            self.today(),
        )
    }
}
