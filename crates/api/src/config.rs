// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Loading the card and benefit configuration file.
//!
//! The file has a top-level `cards:` map from card key to card entry, in
//! YAML or JSON:
//!
//! ```yaml
//! cards:
//!   amex_platinum_2025:
//!     display_name: Amex Platinum
//!     annual_fee: 695
//!     renewal_month: 7
//!     renewal_day: 15
//!     benefits:
//!       - id: uber
//!         category: Uber Cash
//!         amount: 15
//!         frequency: monthly
//!         renewal_type: calendar_year
//! ```
//!
//! Cards keep the order in which they appear in the file.

use cardperks_domain::{
    BenefitDefinition, CardDefinition, CardMeta, DEFAULT_ANNUAL_BONUS_NIGHTS, Frequency,
    RenewalType, TrackerConfig, validate_tracker_config,
};
use rust_decimal::Decimal;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use tracing::info;

use crate::error::ApiError;

/// The syntax of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// YAML (`.yaml`, `.yml`, or anything else).
    Yaml,
    /// JSON (`.json`).
    Json,
}

impl ConfigFormat {
    /// Chooses the format from the file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Yaml,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    cards: OrderedCards,
    #[serde(default)]
    annual_bonus_nights: Option<u32>,
}

/// The `cards:` map with its entries in file order.
#[derive(Debug)]
struct OrderedCards(Vec<(String, RawCard)>);

impl<'de> Deserialize<'de> for OrderedCards {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CardsVisitor;

        impl<'de> Visitor<'de> for CardsVisitor {
            type Value = OrderedCards;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from card key to card entry")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut cards: Vec<(String, RawCard)> =
                    Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, card)) = map.next_entry::<String, RawCard>()? {
                    cards.push((key, card));
                }
                Ok(OrderedCards(cards))
            }
        }

        deserializer.deserialize_map(CardsVisitor)
    }
}

#[derive(Debug, Deserialize)]
struct RawCard {
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    year: Option<i32>,
    #[serde(default)]
    annual_fee: Decimal,
    #[serde(default = "default_renewal_component")]
    renewal_month: u8,
    #[serde(default = "default_renewal_component")]
    renewal_day: u8,
    #[serde(default)]
    benefits: Vec<RawBenefit>,
}

const fn default_renewal_component() -> u8 {
    1
}

#[derive(Debug, Deserialize)]
struct RawBenefit {
    id: String,
    category: String,
    amount: Decimal,
    #[serde(default)]
    frequency: Frequency,
    #[serde(default)]
    renewal_type: RenewalType,
}

impl RawCard {
    fn into_definition(self, key: &str) -> Result<CardDefinition, ApiError> {
        let display_name: String = self.display_name.unwrap_or_else(|| key.to_string());
        let meta: CardMeta = CardMeta::new(
            key,
            &display_name,
            self.annual_fee,
            self.renewal_month,
            self.renewal_day,
        )
        .map_err(|err| ApiError::invalid_card(key, err))?;

        let benefits: Vec<BenefitDefinition> = self
            .benefits
            .into_iter()
            .enumerate()
            .map(|(index, benefit)| {
                BenefitDefinition::new(
                    &benefit.id,
                    &benefit.category,
                    benefit.amount,
                    benefit.frequency,
                    benefit.renewal_type,
                )
                .map_err(|err| ApiError::invalid_card(key, format!("benefit {index}: {err}")))
            })
            .collect::<Result<Vec<BenefitDefinition>, ApiError>>()?;

        Ok(CardDefinition::new(meta, self.year, benefits))
    }
}

/// Parses and validates configuration text.
///
/// # Arguments
///
/// * `contents` - The configuration file contents
/// * `format` - The syntax of `contents`
///
/// # Errors
///
/// Returns `InvalidConfig` if the text cannot be parsed, a card entry has
/// an invalid field, or a card lists the same benefit id twice.
pub fn parse_config(contents: &str, format: ConfigFormat) -> Result<TrackerConfig, ApiError> {
    let raw: RawConfig = match format {
        ConfigFormat::Yaml => {
            serde_yaml::from_str(contents).map_err(|err| ApiError::InvalidConfig {
                message: format!("YAML parsing error: {err}"),
            })?
        }
        ConfigFormat::Json => {
            serde_json::from_str(contents).map_err(|err| ApiError::InvalidConfig {
                message: format!("JSON parsing error: {err}"),
            })?
        }
    };

    let cards: Vec<CardDefinition> = raw
        .cards
        .0
        .into_iter()
        .map(|(key, card)| card.into_definition(&key))
        .collect::<Result<Vec<CardDefinition>, ApiError>>()?;

    let mut config: TrackerConfig = TrackerConfig::new(cards);
    config.annual_bonus_nights = raw
        .annual_bonus_nights
        .unwrap_or(DEFAULT_ANNUAL_BONUS_NIGHTS);

    validate_tracker_config(&config).map_err(|err| ApiError::InvalidConfig {
        message: err.to_string(),
    })?;

    Ok(config)
}

/// Loads the configuration file at `path`.
///
/// The format follows the file extension.
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file does not exist, `Io` if it cannot be
/// read, and `InvalidConfig` if it is malformed.
pub fn load_config(path: &Path) -> Result<TrackerConfig, ApiError> {
    if !path.exists() {
        return Err(ApiError::ConfigNotFound {
            path: path.to_path_buf(),
        });
    }

    let contents: String = std::fs::read_to_string(path).map_err(|source| ApiError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config: TrackerConfig = parse_config(&contents, ConfigFormat::from_path(path))?;

    info!(
        "Loaded {} cards from {}",
        config.cards.len(),
        path.display()
    );
    Ok(config)
}
