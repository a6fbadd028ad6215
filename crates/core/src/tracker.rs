// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::apply::{ApplyContext, apply};
use crate::command::Command;
use crate::error::CoreError;
use crate::repository::StateRepository;
use crate::state::{BenefitInstanceState, StateKey, TransitionResult};
use cardperks_domain::{
    BenefitDefinition, CardDefinition, CardMeta, CooldownStatus, Frequency, RenewalType,
    TrackerConfig, anniversary_window, anniversary_year_of, calendar_interval, check_cooldown,
    find_anniversary_year, generate_periods, is_anniversary_period, period_year,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use time::Date;
use tracing::{debug, info};

/// Year offsets around today searched when attributing a calendar benefit's
/// post date to an anniversary year.
const ATTRIBUTION_OFFSETS: std::ops::RangeInclusive<i32> = -2..=2;

/// One benefit in one period, joined with its stored state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenefitInstance {
    /// The unique benefit id used as the state key prefix.
    pub benefit_id: String,
    /// The card entry the instance was generated from.
    pub card_key: String,
    /// The card's display name.
    pub card_name: String,
    /// The benefit's display category.
    pub category: String,
    /// The face amount.
    pub amount: Decimal,
    /// How often the benefit renews.
    pub frequency: Frequency,
    /// Which year boundaries the benefit renews on.
    pub renewal_type: RenewalType,
    /// The period identifier.
    pub period: String,
    /// The stored state, or the default when never mutated.
    #[serde(flatten)]
    pub state: BenefitInstanceState,
}

impl BenefitInstance {
    /// Returns true when the period is in the anniversary family.
    #[must_use]
    pub fn is_anniversary(&self) -> bool {
        is_anniversary_period(&self.period)
    }

    /// Returns the period's year for anniversary periods.
    #[must_use]
    pub fn period_anniversary_year(&self) -> Option<i32> {
        if self.is_anniversary() {
            period_year(&self.period)
        } else {
            None
        }
    }

    /// Returns the value credited when posted.
    #[must_use]
    pub fn credited_amount(&self) -> Decimal {
        self.state.credited_amount(self.amount)
    }
}

/// Availability of an every-4-years benefit, with the reason shown when it
/// is locked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenefitAvailability {
    /// The cooldown check result.
    #[serde(flatten)]
    pub status: CooldownStatus,
    /// `"Used in {last}, available again in {next}"` while unavailable.
    pub disabled_reason: Option<String>,
}

impl From<CooldownStatus> for BenefitAvailability {
    fn from(status: CooldownStatus) -> Self {
        Self {
            disabled_reason: status.disabled_reason(),
            status,
        }
    }
}

/// One card-year entry of a card group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardYear {
    /// The year label.
    pub year: i32,
    /// The configuration key of this card-year entry.
    pub card_key: String,
}

/// Card-year entries that share a base name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardGroup {
    /// The card key without its year suffix.
    pub base_name: String,
    /// The display name of the first entry.
    pub display_name: String,
    /// Entries ordered from the latest year to the earliest.
    pub years: Vec<CardYear>,
    /// The year whose anniversary window contains today, if any.
    pub current_anniversary_year: Option<i32>,
}

/// Which monthly periods a bulk update touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthlyScope {
    /// Every monthly period.
    All,
    /// Periods starting on or before today.
    UpToToday,
    /// Periods starting after today.
    AfterToday,
}

/// Tracks benefit usage against a configuration and a state repository.
///
/// Every mutation is flushed to the repository before it returns.
#[derive(Debug)]
pub struct BenefitTracker<R: StateRepository> {
    config: TrackerConfig,
    repository: R,
    today: Date,
}

impl<R: StateRepository> BenefitTracker<R> {
    /// Creates a new tracker.
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `repository` - The state store
    /// * `today` - The date used for period generation and post dates
    #[must_use]
    pub const fn new(config: TrackerConfig, repository: R, today: Date) -> Self {
        Self {
            config,
            repository,
            today,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Returns the date the tracker treats as today.
    #[must_use]
    pub const fn today(&self) -> Date {
        self.today
    }

    /// Returns the state repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Consumes the tracker and returns its repository.
    #[must_use]
    pub fn into_repository(self) -> R {
        self.repository
    }

    /// Looks up a card entry.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` if no entry has this key.
    pub fn card(&self, card_key: &str) -> Result<&CardDefinition, CoreError> {
        self.config
            .card(card_key)
            .ok_or_else(|| CoreError::CardNotFound(card_key.to_string()))
    }

    /// Lists every benefit instance of a card across the period horizon.
    ///
    /// Unknown cards yield an empty list.
    #[must_use]
    pub fn card_benefits(&self, card_key: &str) -> Vec<BenefitInstance> {
        let Some(card) = self.config.card(card_key) else {
            return Vec::new();
        };
        let meta: &CardMeta = &card.meta;

        let mut instances: Vec<BenefitInstance> = Vec::new();
        for benefit in &card.benefits {
            let benefit_id: String = meta.unique_benefit_id(benefit);
            for period in generate_periods(benefit, meta, self.today) {
                let period: String = period.to_string();
                let state: BenefitInstanceState = self
                    .repository
                    .get(&StateKey::new(&benefit_id, &period))
                    .unwrap_or_default();
                instances.push(BenefitInstance {
                    benefit_id: benefit_id.clone(),
                    card_key: meta.key().to_string(),
                    card_name: meta.display_name().to_string(),
                    category: benefit.category().to_string(),
                    amount: benefit.amount(),
                    frequency: benefit.frequency(),
                    renewal_type: benefit.renewal_type(),
                    period,
                    state,
                });
            }
        }

        debug!(
            "Generated {} benefit instances for card {}",
            instances.len(),
            card_key
        );
        instances
    }

    /// Lists every benefit instance of every card, in configuration order.
    #[must_use]
    pub fn all_benefits(&self) -> Vec<BenefitInstance> {
        self.config
            .cards
            .iter()
            .flat_map(|card| self.card_benefits(card.meta.key()))
            .collect()
    }

    /// Groups benefit instances by category label.
    ///
    /// # Arguments
    ///
    /// * `card_key` - Restrict to one card, or `None` for all cards
    #[must_use]
    pub fn benefits_by_category(
        &self,
        card_key: Option<&str>,
    ) -> BTreeMap<String, Vec<BenefitInstance>> {
        let instances: Vec<BenefitInstance> = match card_key {
            Some(key) => self.card_benefits(key),
            None => self.all_benefits(),
        };
        let mut grouped: BTreeMap<String, Vec<BenefitInstance>> = BTreeMap::new();
        for instance in instances {
            grouped
                .entry(instance.category.clone())
                .or_default()
                .push(instance);
        }
        grouped
    }

    /// Flips the posted flag of a benefit instance.
    ///
    /// # Arguments
    ///
    /// * `benefit_id` - The unique benefit id
    /// * `period` - The period identifier
    /// * `anniversary_year` - The anniversary year a calendar-family use counts
    ///   toward; ignored for anniversary periods
    ///
    /// # Errors
    ///
    /// Returns `StateFlushFailed` if the repository cannot be written.
    pub fn toggle_benefit(
        &mut self,
        benefit_id: &str,
        period: &str,
        anniversary_year: Option<i32>,
    ) -> Result<BenefitInstanceState, CoreError> {
        self.execute(Command::ToggleBenefit {
            benefit_id: benefit_id.to_string(),
            period: period.to_string(),
            anniversary_year,
        })
    }

    /// Sets the posted flag explicitly.
    ///
    /// The post date defaults to today. Unposting clears the post date and
    /// the attributed anniversary year.
    ///
    /// # Errors
    ///
    /// Returns `StateFlushFailed` if the repository cannot be written.
    pub fn set_benefit_posted(
        &mut self,
        benefit_id: &str,
        period: &str,
        posted: bool,
        post_date: Option<Date>,
    ) -> Result<BenefitInstanceState, CoreError> {
        self.execute(Command::SetPosted {
            benefit_id: benefit_id.to_string(),
            period: period.to_string(),
            posted,
            post_date,
        })
    }

    /// Records or clears the amount actually used.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The benefit id is not configured on any card
    /// - The amount is negative or exceeds the face amount
    /// - The repository cannot be written
    pub fn set_custom_amount(
        &mut self,
        benefit_id: &str,
        period: &str,
        amount: Option<Decimal>,
    ) -> Result<BenefitInstanceState, CoreError> {
        self.execute(Command::SetCustomAmount {
            benefit_id: benefit_id.to_string(),
            period: period.to_string(),
            amount,
        })
    }

    /// Returns the stored custom amount, or `default` when none is stored.
    #[must_use]
    pub fn custom_amount(
        &self,
        benefit_id: &str,
        period: &str,
        default: Option<Decimal>,
    ) -> Option<Decimal> {
        self.repository
            .get(&StateKey::new(benefit_id, period))
            .and_then(|state| state.custom_amount)
            .or(default)
    }

    /// Returns the face amount of a unique benefit id, searching cards in
    /// configuration order.
    #[must_use]
    pub fn face_amount(&self, benefit_id: &str) -> Option<Decimal> {
        self.config.cards.iter().find_map(|card| {
            card.benefits
                .iter()
                .find(|benefit| card.meta.unique_benefit_id(benefit) == benefit_id)
                .map(BenefitDefinition::amount)
        })
    }

    /// Returns the anniversary year of a posted instance's post date.
    #[must_use]
    pub fn benefit_anniversary_year(&self, instance: &BenefitInstance) -> Option<i32> {
        if !instance.state.posted {
            return None;
        }
        let post_date: Date = instance.state.post_date?;
        let card: &CardDefinition = self.config.card(&instance.card_key)?;
        anniversary_year_of(&card.meta, post_date).ok()
    }

    /// Returns the anniversary year, near today, whose window contains a
    /// posted instance's post date.
    ///
    /// Returns `None` when the post date falls in the one-day gap after a
    /// leap-year window.
    #[must_use]
    pub fn posted_calendar_benefit_anniversary_year(
        &self,
        instance: &BenefitInstance,
    ) -> Option<i32> {
        if !instance.state.posted {
            return None;
        }
        let post_date: Date = instance.state.post_date?;
        let card: &CardDefinition = self.config.card(&instance.card_key)?;
        let current_year: i32 = self.today.year();
        find_anniversary_year(
            &card.meta,
            post_date,
            ATTRIBUTION_OFFSETS.map(|offset| current_year + offset),
        )
    }

    /// Checks the four-year cooldown of an instance.
    ///
    /// Benefits that are not every-4-years are always available.
    #[must_use]
    pub fn every_four_years_info(&self, instance: &BenefitInstance) -> BenefitAvailability {
        if instance.frequency != Frequency::EveryFourYears {
            return CooldownStatus::unused().into();
        }
        let Some(current_year) = period_year(&instance.period) else {
            return CooldownStatus::unused().into();
        };

        let usage_years: Vec<i32> = self
            .repository
            .entries()
            .into_iter()
            .filter(|(key, state)| state.posted && key.benefit_id() == instance.benefit_id)
            .filter_map(|(key, _)| period_year(key.period()))
            .collect();

        check_cooldown(current_year, usage_years).into()
    }

    /// Groups card-year entries by base name, in first-appearance order.
    ///
    /// Entries without a year label are omitted.
    #[must_use]
    pub fn card_groups(&self) -> Vec<CardGroup> {
        let mut groups: Vec<CardGroup> = Vec::new();
        for card in &self.config.cards {
            let Some(year) = card.year_label() else {
                continue;
            };
            let base_name: &str = card.meta.base_name();
            let entry: CardYear = CardYear {
                year,
                card_key: card.meta.key().to_string(),
            };
            match groups.iter_mut().find(|group| group.base_name == base_name) {
                Some(group) => group.years.push(entry),
                None => groups.push(CardGroup {
                    base_name: base_name.to_string(),
                    display_name: card.meta.display_name().to_string(),
                    years: vec![entry],
                    current_anniversary_year: None,
                }),
            }
        }

        for group in &mut groups {
            group.years.sort_by_key(|entry| Reverse(entry.year));
            group.current_anniversary_year = group
                .years
                .iter()
                .find(|entry| {
                    self.config.card(&entry.card_key).is_some_and(|card| {
                        anniversary_window(&card.meta, entry.year)
                            .is_ok_and(|window| window.contains(self.today))
                    })
                })
                .map(|entry| entry.year);
        }
        groups
    }

    /// Sets the posted flag of every unlocked monthly instance of a category
    /// in one anniversary year.
    ///
    /// Instances already in the target state are left alone. Calendar
    /// instances being posted are attributed to `anniversary_year`.
    ///
    /// # Returns
    ///
    /// The number of instances changed.
    ///
    /// # Errors
    ///
    /// Returns `CardNotFound` for an unknown card, or the first flush
    /// failure.
    pub fn set_monthly_posted(
        &mut self,
        card_key: &str,
        anniversary_year: i32,
        category: &str,
        posted: bool,
        scope: MonthlyScope,
    ) -> Result<usize, CoreError> {
        self.card(card_key)?;
        let today: Date = self.today;
        let targets: Vec<BenefitInstance> = self
            .filtered_benefits_for_year(card_key, anniversary_year)
            .into_iter()
            .filter(|instance| {
                instance.category == category && instance.frequency == Frequency::Monthly
            })
            .filter(|instance| self.lock_reason(instance, anniversary_year).is_none())
            .filter(|instance| instance.state.posted != posted)
            .filter(|instance| match scope {
                MonthlyScope::All => true,
                MonthlyScope::UpToToday => calendar_interval(&instance.period)
                    .is_some_and(|interval| interval.start() <= today),
                MonthlyScope::AfterToday => calendar_interval(&instance.period)
                    .is_some_and(|interval| interval.start() > today),
            })
            .collect();

        for instance in &targets {
            let attributed: Option<i32> = if posted && !instance.is_anniversary() {
                Some(anniversary_year)
            } else {
                None
            };
            self.toggle_benefit(&instance.benefit_id, &instance.period, attributed)?;
        }

        info!(
            "Set {} monthly {} instances of card {} to posted={}",
            targets.len(),
            category,
            card_key,
            posted
        );
        Ok(targets.len())
    }

    fn execute(&mut self, command: Command) -> Result<BenefitInstanceState, CoreError> {
        let key: StateKey = StateKey::new(command.benefit_id(), command.period());
        let previous: Option<BenefitInstanceState> = self.repository.get(&key);
        let current: BenefitInstanceState = previous.unwrap_or_default();
        let context: ApplyContext = ApplyContext {
            today: self.today,
            face_amount: self.face_amount(key.benefit_id()),
        };

        let result: TransitionResult = apply(&current, command, &context)?;
        self.repository.set(result.key.clone(), result.new_state);
        if let Err(err) = self.repository.flush() {
            match previous {
                Some(state) => self.repository.set(key, state),
                None => self.repository.remove(&key),
            }
            return Err(CoreError::StateFlushFailed(err.to_string()));
        }

        info!(
            "{} {}: posted={} post_date={:?} custom_amount={:?}",
            result.action,
            result.key,
            result.new_state.posted,
            result.new_state.post_date,
            result.new_state.custom_amount
        );
        Ok(result.new_state)
    }
}
