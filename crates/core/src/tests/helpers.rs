// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    BenefitInstance, BenefitInstanceState, BenefitTracker, StateKey, StateRepository,
    StayRepository,
};
use cardperks_domain::{
    BenefitDefinition, CardDefinition, CardMeta, Frequency, RenewalType, StayLog, TrackerConfig,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use time::Date;
use time::macros::date;

pub const TODAY: Date = date!(2026 - 03 - 10);

/// In-memory repository that counts flushes and can be told to fail them.
#[derive(Debug, Default)]
pub struct TestRepository {
    pub entries: BTreeMap<StateKey, BenefitInstanceState>,
    pub stay_log: StayLog,
    pub flushes: usize,
    pub fail_flush: bool,
}

impl TestRepository {
    pub fn failing() -> Self {
        Self {
            fail_flush: true,
            ..Self::default()
        }
    }

    fn try_flush(&mut self) -> Result<(), std::io::Error> {
        if self.fail_flush {
            return Err(std::io::Error::other("disk full"));
        }
        self.flushes += 1;
        Ok(())
    }
}

impl StateRepository for TestRepository {
    type Error = std::io::Error;

    fn get(&self, key: &StateKey) -> Option<BenefitInstanceState> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: StateKey, state: BenefitInstanceState) {
        self.entries.insert(key, state);
    }

    fn remove(&mut self, key: &StateKey) {
        self.entries.remove(key);
    }

    fn entries(&self) -> Vec<(StateKey, BenefitInstanceState)> {
        self.entries
            .iter()
            .map(|(key, state)| (key.clone(), *state))
            .collect()
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.try_flush()
    }
}

impl StayRepository for TestRepository {
    type Error = std::io::Error;

    fn stay_log(&self) -> &StayLog {
        &self.stay_log
    }

    fn set_stay_log(&mut self, log: StayLog) {
        self.stay_log = log;
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.try_flush()
    }
}

pub fn benefit(
    id: &str,
    category: &str,
    amount: i64,
    frequency: Frequency,
    renewal_type: RenewalType,
) -> BenefitDefinition {
    BenefitDefinition::new(id, category, Decimal::from(amount), frequency, renewal_type).unwrap()
}

/// Two card-year entries of a July 15 renewal card plus a yearless
/// business card.
pub fn create_test_config() -> TrackerConfig {
    let platinum_2025: CardDefinition = CardDefinition::new(
        CardMeta::new("amex_platinum_2025", "Amex Platinum", Decimal::from(695), 7, 15).unwrap(),
        None,
        vec![
            benefit("uber", "Uber Cash", 15, Frequency::Monthly, RenewalType::CalendarYear),
            benefit("saks", "Saks Credit", 50, Frequency::HalfYearly, RenewalType::CalendarYear),
            benefit(
                "airline",
                "Airline Fee Credit",
                200,
                Frequency::Yearly,
                RenewalType::CardAnniversary,
            ),
            benefit(
                "GE_precheck",
                "Global Entry",
                120,
                Frequency::EveryFourYears,
                RenewalType::CardAnniversary,
            ),
        ],
    );
    let platinum_2024: CardDefinition = CardDefinition::new(
        CardMeta::new("amex_platinum_2024", "Amex Platinum", Decimal::from(695), 7, 15).unwrap(),
        None,
        vec![
            benefit("saks", "Saks Credit", 50, Frequency::HalfYearly, RenewalType::CalendarYear),
            benefit(
                "airline",
                "Airline Fee Credit",
                200,
                Frequency::Yearly,
                RenewalType::CardAnniversary,
            ),
        ],
    );
    let business: CardDefinition = CardDefinition::new(
        CardMeta::new("hyatt_business", "Hyatt Business", Decimal::from(199), 1, 1).unwrap(),
        None,
        vec![benefit(
            "hotel",
            "Hotel Credit",
            50,
            Frequency::HalfYearly,
            RenewalType::CardAnniversary,
        )],
    );
    TrackerConfig::new(vec![platinum_2025, platinum_2024, business])
}

pub fn create_test_tracker() -> BenefitTracker<TestRepository> {
    BenefitTracker::new(create_test_config(), TestRepository::default(), TODAY)
}

pub fn find_instance(
    tracker: &BenefitTracker<TestRepository>,
    card_key: &str,
    benefit_id: &str,
    period: &str,
) -> BenefitInstance {
    tracker
        .card_benefits(card_key)
        .into_iter()
        .find(|instance| instance.benefit_id == benefit_id && instance.period == period)
        .unwrap()
}
