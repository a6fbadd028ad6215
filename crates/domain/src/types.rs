// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Configuration-sourced domain types: cards and their benefits.

use crate::error::DomainError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::{Date, Month};

/// How often a benefit renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Frequency {
    /// Once per year.
    #[default]
    #[serde(rename = "yearly")]
    Yearly,
    /// Twice per year.
    #[serde(rename = "half_yearly")]
    HalfYearly,
    /// Four times per year.
    #[serde(rename = "quarterly")]
    Quarterly,
    /// Twelve times per year.
    #[serde(rename = "monthly")]
    Monthly,
    /// Once per four anniversary years (e.g. Global Entry / TSA `PreCheck`).
    #[serde(rename = "every_4_years")]
    EveryFourYears,
}

impl Frequency {
    /// Returns the configuration spelling of this frequency.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Yearly => "yearly",
            Self::HalfYearly => "half_yearly",
            Self::Quarterly => "quarterly",
            Self::Monthly => "monthly",
            Self::EveryFourYears => "every_4_years",
        }
    }
}

impl std::fmt::Display for Frequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which year boundaries a benefit renews on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenewalType {
    /// Periods follow the January-December calendar.
    #[default]
    CalendarYear,
    /// Periods follow the card's renewal date.
    CardAnniversary,
}

impl RenewalType {
    /// Returns the configuration spelling of this renewal type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CalendarYear => "calendar_year",
            Self::CardAnniversary => "card_anniversary",
        }
    }
}

impl std::fmt::Display for RenewalType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single benefit offered by a card.
///
/// Benefit definitions are immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenefitDefinition {
    id: String,
    category: String,
    amount: Decimal,
    frequency: Frequency,
    renewal_type: RenewalType,
}

impl BenefitDefinition {
    /// Creates a new `BenefitDefinition`.
    ///
    /// # Arguments
    ///
    /// * `id` - The benefit identifier, unique within its card
    /// * `category` - The display category (e.g. "Dining Credit")
    /// * `amount` - The face amount per period
    /// * `frequency` - How often the benefit renews
    /// * `renewal_type` - Calendar or card-anniversary boundaries
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The identifier is empty
    /// - The face amount is negative
    pub fn new(
        id: &str,
        category: &str,
        amount: Decimal,
        frequency: Frequency,
        renewal_type: RenewalType,
    ) -> Result<Self, DomainError> {
        if id.trim().is_empty() {
            return Err(DomainError::InvalidBenefitId(String::from(
                "Benefit id cannot be empty",
            )));
        }
        if amount < Decimal::ZERO {
            return Err(DomainError::InvalidAmount {
                field: format!("benefit '{id}' amount"),
                reason: format!("{amount} is negative"),
            });
        }

        Ok(Self {
            id: id.to_string(),
            category: category.to_string(),
            amount,
            frequency,
            renewal_type,
        })
    }

    /// Returns the benefit identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the display category.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the face amount per period.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the renewal frequency.
    #[must_use]
    pub const fn frequency(&self) -> Frequency {
        self.frequency
    }

    /// Returns the renewal type.
    #[must_use]
    pub const fn renewal_type(&self) -> RenewalType {
        self.renewal_type
    }
}

/// Renewal metadata for one card-year configuration entry.
///
/// The renewal day must exist in the renewal month of a non-leap year, so an
/// anniversary window can be built for every year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardMeta {
    key: String,
    display_name: String,
    annual_fee: Decimal,
    renewal_month: u8,
    renewal_day: u8,
}

impl CardMeta {
    /// Creates a new `CardMeta`.
    ///
    /// # Arguments
    ///
    /// * `key` - The configuration key (e.g. `schwab_platinum_2025`)
    /// * `display_name` - The human-readable card name
    /// * `annual_fee` - The annual fee
    /// * `renewal_month` - The renewal month (1-12)
    /// * `renewal_day` - The renewal day of month
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key is empty
    /// - The annual fee is negative
    /// - The renewal month is outside 1-12
    /// - The renewal day does not exist in that month of a non-leap year
    pub fn new(
        key: &str,
        display_name: &str,
        annual_fee: Decimal,
        renewal_month: u8,
        renewal_day: u8,
    ) -> Result<Self, DomainError> {
        if key.trim().is_empty() {
            return Err(DomainError::InvalidCardKey(String::from(
                "Card key cannot be empty",
            )));
        }
        if annual_fee < Decimal::ZERO {
            return Err(DomainError::InvalidAmount {
                field: format!("card '{key}' annual fee"),
                reason: format!("{annual_fee} is negative"),
            });
        }

        let month: Month =
            Month::try_from(renewal_month).map_err(|_| DomainError::InvalidRenewalMonth {
                card_key: key.to_string(),
                month: renewal_month,
            })?;

        // 2023 is not a leap year, which rules out February 29.
        if Date::from_calendar_date(2023, month, renewal_day).is_err() {
            return Err(DomainError::InvalidRenewalDay {
                card_key: key.to_string(),
                month: renewal_month,
                day: renewal_day,
            });
        }

        Ok(Self {
            key: key.to_string(),
            display_name: display_name.to_string(),
            annual_fee,
            renewal_month,
            renewal_day,
        })
    }

    /// Returns the configuration key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Returns the annual fee.
    #[must_use]
    pub const fn annual_fee(&self) -> Decimal {
        self.annual_fee
    }

    /// Returns the renewal month (1-12).
    #[must_use]
    pub const fn renewal_month(&self) -> u8 {
        self.renewal_month
    }

    /// Returns the renewal day of month.
    #[must_use]
    pub const fn renewal_day(&self) -> u8 {
        self.renewal_day
    }

    /// Returns the card key with any trailing `_YYYY` segment removed.
    ///
    /// Card-year entries of the same card share this base name.
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.year_suffix().map_or(self.key.as_str(), |(base, _)| base)
    }

    /// Returns the year label encoded in the key's last segment, if any.
    #[must_use]
    pub fn key_year(&self) -> Option<i32> {
        self.year_suffix()
            .and_then(|(_, suffix)| suffix.parse::<i32>().ok())
    }

    fn year_suffix(&self) -> Option<(&str, &str)> {
        self.key.rsplit_once('_').filter(|(_, suffix)| {
            !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit())
        })
    }

    /// Builds the state identifier for one of this card's benefits.
    ///
    /// Calendar-year benefits are keyed by the base name so their state is
    /// shared across card-year entries. Anniversary benefits keep the full
    /// key because they belong to one card year.
    #[must_use]
    pub fn unique_benefit_id(&self, benefit: &BenefitDefinition) -> String {
        match benefit.renewal_type() {
            RenewalType::CalendarYear => format!("{}_{}", self.base_name(), benefit.id()),
            RenewalType::CardAnniversary => format!("{}_{}", self.key, benefit.id()),
        }
    }
}

/// A card-year configuration entry: renewal metadata plus its benefits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardDefinition {
    /// The card's renewal metadata.
    pub meta: CardMeta,
    /// Explicit year label from configuration, if any.
    pub year: Option<i32>,
    /// The benefits offered in this card year.
    pub benefits: Vec<BenefitDefinition>,
}

impl CardDefinition {
    /// Creates a new `CardDefinition`.
    #[must_use]
    pub const fn new(meta: CardMeta, year: Option<i32>, benefits: Vec<BenefitDefinition>) -> Self {
        Self {
            meta,
            year,
            benefits,
        }
    }

    /// Returns the year label: the explicit year, else the key's year suffix.
    #[must_use]
    pub fn year_label(&self) -> Option<i32> {
        self.year.or_else(|| self.meta.key_year())
    }
}

/// The validated tracker configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerConfig {
    /// Card entries in configuration order.
    pub cards: Vec<CardDefinition>,
    /// Bonus nights granted at the start of every year.
    pub annual_bonus_nights: u32,
}

/// Bonus nights granted at the start of every year when not configured.
pub const DEFAULT_ANNUAL_BONUS_NIGHTS: u32 = 5;

impl TrackerConfig {
    /// Creates a configuration from card entries.
    #[must_use]
    pub const fn new(cards: Vec<CardDefinition>) -> Self {
        Self {
            cards,
            annual_bonus_nights: DEFAULT_ANNUAL_BONUS_NIGHTS,
        }
    }

    /// Looks up a card entry by key.
    #[must_use]
    pub fn card(&self, key: &str) -> Option<&CardDefinition> {
        self.cards.iter().find(|card| card.meta.key() == key)
    }
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
