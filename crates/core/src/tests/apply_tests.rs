// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::TODAY;
use crate::{
    ApplyContext, BenefitInstanceState, Command, CoreError, StateKey, StayCommand,
    StayTransition, TransitionResult, apply, apply_stay,
};
use cardperks_domain::{DomainError, StayLog};
use rust_decimal::Decimal;
use time::macros::date;

fn context(face_amount: Option<i64>) -> ApplyContext {
    ApplyContext {
        today: TODAY,
        face_amount: face_amount.map(Decimal::from),
    }
}

fn toggle(period: &str, anniversary_year: Option<i32>) -> Command {
    Command::ToggleBenefit {
        benefit_id: String::from("amex_platinum_saks"),
        period: String::from(period),
        anniversary_year,
    }
}

#[test]
fn test_toggle_on_calendar_period_records_attribution() {
    let result: TransitionResult = apply(
        &BenefitInstanceState::default(),
        toggle("2025-H2", Some(2025)),
        &context(Some(50)),
    )
    .unwrap();

    assert_eq!(result.key.to_string(), "amex_platinum_saks|2025-H2");
    assert_eq!(result.action, "ToggleBenefit");
    assert!(result.new_state.posted);
    assert_eq!(result.new_state.post_date, Some(TODAY));
    assert_eq!(result.new_state.posted_anniversary_year, Some(2025));
}

#[test]
fn test_toggle_on_anniversary_period_ignores_attribution() {
    let result: TransitionResult = apply(
        &BenefitInstanceState::default(),
        toggle("2025-A07", Some(2025)),
        &context(None),
    )
    .unwrap();

    assert!(result.new_state.posted);
    assert_eq!(result.new_state.posted_anniversary_year, None);
}

#[test]
fn test_toggle_off_clears_date_and_attribution_but_keeps_amount() {
    let current: BenefitInstanceState = BenefitInstanceState {
        posted: true,
        post_date: Some(date!(2025 - 09 - 01)),
        custom_amount: Some(Decimal::from(20)),
        posted_anniversary_year: Some(2025),
    };

    let result: TransitionResult =
        apply(&current, toggle("2025-H2", None), &context(Some(50))).unwrap();

    assert!(!result.new_state.posted);
    assert_eq!(result.new_state.post_date, None);
    assert_eq!(result.new_state.posted_anniversary_year, None);
    assert_eq!(result.new_state.custom_amount, Some(Decimal::from(20)));
}

#[test]
fn test_set_posted_defaults_to_today_and_honors_explicit_date() {
    let command = |post_date| Command::SetPosted {
        benefit_id: String::from("amex_platinum_2025_airline"),
        period: String::from("2025-A07"),
        posted: true,
        post_date,
    };

    let defaulted: TransitionResult =
        apply(&BenefitInstanceState::default(), command(None), &context(None)).unwrap();
    assert_eq!(defaulted.new_state.post_date, Some(TODAY));

    let explicit: TransitionResult = apply(
        &BenefitInstanceState::default(),
        command(Some(date!(2025 - 08 - 02))),
        &context(None),
    )
    .unwrap();
    assert_eq!(explicit.new_state.post_date, Some(date!(2025 - 08 - 02)));
}

#[test]
fn test_set_unposted_clears_attribution() {
    let current: BenefitInstanceState = BenefitInstanceState {
        posted: true,
        post_date: Some(date!(2025 - 09 - 01)),
        custom_amount: None,
        posted_anniversary_year: Some(2025),
    };
    let command: Command = Command::SetPosted {
        benefit_id: String::from("amex_platinum_saks"),
        period: String::from("2025-H2"),
        posted: false,
        post_date: Some(TODAY),
    };

    let result: TransitionResult = apply(&current, command, &context(Some(50))).unwrap();

    assert_eq!(result.new_state, BenefitInstanceState::default());
}

#[test]
fn test_custom_amount_bounds() {
    let command = |amount: i64| Command::SetCustomAmount {
        benefit_id: String::from("amex_platinum_saks"),
        period: String::from("2025-H2"),
        amount: Some(Decimal::from(amount)),
    };
    let current: BenefitInstanceState = BenefitInstanceState::default();

    assert!(apply(&current, command(0), &context(Some(50))).is_ok());
    assert!(apply(&current, command(50), &context(Some(50))).is_ok());

    let too_large: CoreError = apply(&current, command(51), &context(Some(50))).unwrap_err();
    assert_eq!(
        too_large,
        CoreError::DomainViolation(DomainError::InvalidCustomAmount {
            amount: Decimal::from(51),
            face_amount: Decimal::from(50),
        })
    );
    assert!(matches!(
        apply(&current, command(-1), &context(Some(50))),
        Err(CoreError::DomainViolation(
            DomainError::InvalidCustomAmount { .. }
        ))
    ));
}

#[test]
fn test_custom_amount_requires_configured_benefit() {
    let command: Command = Command::SetCustomAmount {
        benefit_id: String::from("unknown"),
        period: String::from("2025"),
        amount: None,
    };

    let err: CoreError = apply(&BenefitInstanceState::default(), command, &context(None))
        .unwrap_err();

    assert_eq!(
        err,
        CoreError::BenefitNotFound {
            benefit_id: String::from("unknown")
        }
    );
}

#[test]
fn test_state_key_round_trip_and_rejection() {
    let key: StateKey = "amex_platinum_saks|2025-H2".parse().unwrap();
    assert_eq!(key.benefit_id(), "amex_platinum_saks");
    assert_eq!(key.period(), "2025-H2");
    assert_eq!(key.to_string(), "amex_platinum_saks|2025-H2");

    assert!("no-separator".parse::<StateKey>().is_err());
    assert!("|2025".parse::<StateKey>().is_err());
}

#[test]
fn test_credited_amount_prefers_positive_custom_amount() {
    let mut state: BenefitInstanceState = BenefitInstanceState::default();
    assert_eq!(state.credited_amount(Decimal::from(50)), Decimal::from(50));

    state.custom_amount = Some(Decimal::ZERO);
    assert_eq!(state.credited_amount(Decimal::from(50)), Decimal::from(50));

    state.custom_amount = Some(Decimal::from(20));
    assert_eq!(state.credited_amount(Decimal::from(50)), Decimal::from(20));
}

#[test]
fn test_apply_stay_leaves_input_untouched() {
    let log: StayLog = StayLog::new();
    let transition: StayTransition = apply_stay(
        &log,
        StayCommand::AddStay {
            name: String::from("Park Hyatt Tokyo"),
            check_in: date!(2026 - 04 - 01),
            check_out: date!(2026 - 04 - 04),
        },
    )
    .unwrap();

    assert!(log.stays().is_empty());
    assert_eq!(transition.new_log.stays().len(), 1);
    assert_eq!(transition.action, "AddStay");
}

#[test]
fn test_apply_stay_rejects_inverted_dates() {
    let result = apply_stay(
        &StayLog::new(),
        StayCommand::AddStay {
            name: String::from("Andaz"),
            check_in: date!(2026 - 04 - 04),
            check_out: date!(2026 - 04 - 04),
        },
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidStay(_)))
    ));
}
