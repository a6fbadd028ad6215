// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cardperks_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// No configured card offers a benefit with this unique id.
    BenefitNotFound {
        /// The unique benefit id that was requested.
        benefit_id: String,
    },
    /// No card entry has this key.
    CardNotFound(String),
    /// The repository could not persist a mutation.
    StateFlushFailed(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::BenefitNotFound { benefit_id } => {
                write!(f, "Benefit '{benefit_id}' not found in configuration")
            }
            Self::CardNotFound(card_key) => write!(f, "Card '{card_key}' not found"),
            Self::StateFlushFailed(msg) => write!(f, "Failed to persist state: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}
