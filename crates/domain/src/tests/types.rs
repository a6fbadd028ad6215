// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BenefitDefinition, CardDefinition, CardMeta, DEFAULT_ANNUAL_BONUS_NIGHTS, DomainError,
    Frequency, RenewalType, TrackerConfig,
};
use rust_decimal::Decimal;

fn create_test_card(key: &str) -> CardMeta {
    CardMeta::new(key, "Schwab Platinum", Decimal::from(695), 7, 15).unwrap()
}

fn create_test_benefit(id: &str, renewal_type: RenewalType) -> BenefitDefinition {
    BenefitDefinition::new(
        id,
        "Airline Credit",
        Decimal::from(200),
        Frequency::Yearly,
        renewal_type,
    )
    .unwrap()
}

#[test]
fn test_card_meta_creation() {
    let card: CardMeta = create_test_card("schwab_platinum_2025");
    assert_eq!(card.key(), "schwab_platinum_2025");
    assert_eq!(card.display_name(), "Schwab Platinum");
    assert_eq!(card.annual_fee(), Decimal::from(695));
    assert_eq!(card.renewal_month(), 7);
    assert_eq!(card.renewal_day(), 15);
}

#[test]
fn test_card_meta_rejects_invalid_renewal_month() {
    let result: Result<CardMeta, DomainError> =
        CardMeta::new("card", "Card", Decimal::ZERO, 13, 1);
    assert!(matches!(
        result,
        Err(DomainError::InvalidRenewalMonth { month: 13, .. })
    ));
}

#[test]
fn test_card_meta_rejects_day_missing_from_month() {
    assert!(matches!(
        CardMeta::new("card", "Card", Decimal::ZERO, 4, 31),
        Err(DomainError::InvalidRenewalDay {
            month: 4,
            day: 31,
            ..
        })
    ));
    // February 29 does not exist every year.
    assert!(matches!(
        CardMeta::new("card", "Card", Decimal::ZERO, 2, 29),
        Err(DomainError::InvalidRenewalDay { .. })
    ));
    assert!(CardMeta::new("card", "Card", Decimal::ZERO, 2, 28).is_ok());
}

#[test]
fn test_card_meta_rejects_negative_fee_and_empty_key() {
    assert!(matches!(
        CardMeta::new("card", "Card", Decimal::from(-1), 1, 1),
        Err(DomainError::InvalidAmount { .. })
    ));
    assert!(matches!(
        CardMeta::new("  ", "Card", Decimal::ZERO, 1, 1),
        Err(DomainError::InvalidCardKey(_))
    ));
}

#[test]
fn test_base_name_strips_year_suffix() {
    assert_eq!(
        create_test_card("schwab_platinum_2025").base_name(),
        "schwab_platinum"
    );
    assert_eq!(create_test_card("amex_gold").base_name(), "amex_gold");
    assert_eq!(create_test_card("plain").base_name(), "plain");
}

#[test]
fn test_key_year() {
    assert_eq!(create_test_card("schwab_platinum_2025").key_year(), Some(2025));
    assert_eq!(create_test_card("amex_gold").key_year(), None);
}

#[test]
fn test_signed_suffix_is_not_a_year() {
    for key in ["amex_+2025", "amex_-5"] {
        let card: CardMeta = create_test_card(key);
        assert_eq!(card.key_year(), None, "{key}");
        assert_eq!(card.base_name(), key);
    }
}

#[test]
fn test_unique_benefit_id_depends_on_renewal_type() {
    let card: CardMeta = create_test_card("schwab_platinum_2025");
    let calendar: BenefitDefinition = create_test_benefit("airline", RenewalType::CalendarYear);
    let anniversary: BenefitDefinition =
        create_test_benefit("clear", RenewalType::CardAnniversary);

    assert_eq!(card.unique_benefit_id(&calendar), "schwab_platinum_airline");
    assert_eq!(
        card.unique_benefit_id(&anniversary),
        "schwab_platinum_2025_clear"
    );
}

#[test]
fn test_benefit_definition_validation() {
    assert!(matches!(
        BenefitDefinition::new(
            "",
            "Credit",
            Decimal::ONE,
            Frequency::Yearly,
            RenewalType::CalendarYear
        ),
        Err(DomainError::InvalidBenefitId(_))
    ));
    assert!(matches!(
        BenefitDefinition::new(
            "credit",
            "Credit",
            Decimal::NEGATIVE_ONE,
            Frequency::Yearly,
            RenewalType::CalendarYear
        ),
        Err(DomainError::InvalidAmount { .. })
    ));
}

#[test]
fn test_card_definition_year_label() {
    let explicit: CardDefinition =
        CardDefinition::new(create_test_card("amex_gold"), Some(2024), Vec::new());
    let from_key: CardDefinition =
        CardDefinition::new(create_test_card("amex_gold_2025"), None, Vec::new());
    let none: CardDefinition = CardDefinition::new(create_test_card("amex_gold"), None, Vec::new());

    assert_eq!(explicit.year_label(), Some(2024));
    assert_eq!(from_key.year_label(), Some(2025));
    assert_eq!(none.year_label(), None);
}

#[test]
fn test_tracker_config_lookup() {
    let config: TrackerConfig = TrackerConfig::new(vec![CardDefinition::new(
        create_test_card("amex_gold"),
        None,
        Vec::new(),
    )]);
    assert_eq!(config.annual_bonus_nights, DEFAULT_ANNUAL_BONUS_NIGHTS);
    assert!(config.card("amex_gold").is_some());
    assert!(config.card("missing").is_none());
}

#[test]
fn test_frequency_and_renewal_type_spellings() {
    assert_eq!(Frequency::EveryFourYears.to_string(), "every_4_years");
    assert_eq!(Frequency::HalfYearly.as_str(), "half_yearly");
    assert_eq!(RenewalType::CardAnniversary.to_string(), "card_anniversary");
    assert_eq!(Frequency::default(), Frequency::Yearly);
    assert_eq!(RenewalType::default(), RenewalType::CalendarYear);

    let parsed: Frequency = serde_json::from_str("\"every_4_years\"").unwrap();
    assert_eq!(parsed, Frequency::EveryFourYears);
    let parsed: RenewalType = serde_json::from_str("\"card_anniversary\"").unwrap();
    assert_eq!(parsed, RenewalType::CardAnniversary);
}
