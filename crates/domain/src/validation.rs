// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::types::{CardDefinition, TrackerConfig};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Validates that a card's benefit identifiers are unique.
///
/// Field-level rules (non-empty ids, non-negative amounts, valid renewal
/// dates) are enforced when the definitions are constructed.
///
/// # Arguments
///
/// * `card` - The card entry to validate
///
/// # Returns
///
/// * `Ok(())` if every benefit id appears once
/// * `Err(DomainError::DuplicateBenefitId)` otherwise
///
/// # Errors
///
/// Returns an error naming the first duplicated benefit id.
pub fn validate_card_definition(card: &CardDefinition) -> Result<(), DomainError> {
    let mut seen: HashSet<&str> = HashSet::new();

    for benefit in &card.benefits {
        // Rule: benefit ids are unique within a card entry
        if !seen.insert(benefit.id()) {
            return Err(DomainError::DuplicateBenefitId {
                card_key: card.meta.key().to_string(),
                benefit_id: benefit.id().to_string(),
            });
        }
    }

    Ok(())
}

/// Validates every card entry of a configuration.
///
/// # Errors
///
/// Returns the first card-level validation failure.
pub fn validate_tracker_config(config: &TrackerConfig) -> Result<(), DomainError> {
    for card in &config.cards {
        validate_card_definition(card)?;
    }
    Ok(())
}

/// Validates a partial-usage amount against the benefit's face amount.
///
/// # Arguments
///
/// * `amount` - The amount actually used
/// * `face_amount` - The benefit's face amount
///
/// # Errors
///
/// Returns an error if the amount is negative or exceeds the face amount.
pub fn validate_custom_amount(amount: Decimal, face_amount: Decimal) -> Result<(), DomainError> {
    if amount < Decimal::ZERO || amount > face_amount {
        return Err(DomainError::InvalidCustomAmount {
            amount,
            face_amount,
        });
    }
    Ok(())
}
