// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{Command, StayCommand};
use crate::error::CoreError;
use crate::state::{BenefitInstanceState, StateKey, StayTransition, TransitionResult};
use cardperks_domain::{StayLog, is_anniversary_period, validate_custom_amount};
use rust_decimal::Decimal;
use time::Date;

/// Inputs a transition needs beyond the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApplyContext {
    /// The date recorded as the post date when none is given.
    pub today: Date,
    /// The benefit's face amount, when the benefit is configured.
    pub face_amount: Option<Decimal>,
}

/// Applies a command to the current state of one benefit instance.
///
/// This function is pure: it never touches a repository.
///
/// # Arguments
///
/// * `current` - The current instance state (default when never mutated)
/// * `command` - The command to apply
/// * `context` - The date and face amount the command is evaluated against
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new state
/// * `Err(CoreError)` if the command is invalid
///
/// # Errors
///
/// Returns an error if:
/// - A custom amount is negative or exceeds the face amount
/// - A custom amount targets a benefit with no configured face amount
pub fn apply(
    current: &BenefitInstanceState,
    command: Command,
    context: &ApplyContext,
) -> Result<TransitionResult, CoreError> {
    let key: StateKey = StateKey::new(command.benefit_id(), command.period());
    let calendar_family: bool = !is_anniversary_period(key.period());

    match command {
        Command::ToggleBenefit {
            anniversary_year, ..
        } => {
            let mut new_state: BenefitInstanceState = *current;
            new_state.posted = !current.posted;
            if new_state.posted {
                new_state.post_date = Some(context.today);
                if calendar_family && anniversary_year.is_some() {
                    new_state.posted_anniversary_year = anniversary_year;
                }
            } else {
                new_state.post_date = None;
                new_state.posted_anniversary_year = None;
            }

            Ok(TransitionResult {
                key,
                new_state,
                action: "ToggleBenefit",
            })
        }
        Command::SetPosted {
            posted, post_date, ..
        } => {
            let mut new_state: BenefitInstanceState = *current;
            new_state.posted = posted;
            if posted {
                new_state.post_date = Some(post_date.unwrap_or(context.today));
            } else {
                new_state.post_date = None;
                new_state.posted_anniversary_year = None;
            }

            Ok(TransitionResult {
                key,
                new_state,
                action: "SetPosted",
            })
        }
        Command::SetCustomAmount { amount, .. } => {
            let Some(face_amount) = context.face_amount else {
                return Err(CoreError::BenefitNotFound {
                    benefit_id: key.benefit_id().to_string(),
                });
            };
            if let Some(amount) = amount {
                validate_custom_amount(amount, face_amount)?;
            }

            let mut new_state: BenefitInstanceState = *current;
            new_state.custom_amount = amount;

            Ok(TransitionResult {
                key,
                new_state,
                action: "SetCustomAmount",
            })
        }
    }
}

/// Applies a command to the stay log.
///
/// The input log is never modified; a rejected command leaves no trace.
///
/// # Errors
///
/// Returns an error if the stay or guest night is invalid or the index does
/// not exist.
pub fn apply_stay(log: &StayLog, command: StayCommand) -> Result<StayTransition, CoreError> {
    let mut new_log: StayLog = log.clone();
    let action: &'static str = match command {
        StayCommand::AddStay {
            name,
            check_in,
            check_out,
        } => {
            new_log.add_stay(&name, check_in, check_out)?;
            "AddStay"
        }
        StayCommand::DeleteStay { index } => {
            new_log.delete_stay(index)?;
            "DeleteStay"
        }
        StayCommand::AddGuestNight { name, date } => {
            new_log.add_guest_night(&name, date)?;
            "AddGuestNight"
        }
        StayCommand::DeleteGuestNight { index } => {
            new_log.delete_guest_night(index)?;
            "DeleteGuestNight"
        }
    };

    Ok(StayTransition { new_log, action })
}
