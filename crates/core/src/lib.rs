// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod apply;
mod command;
mod error;
mod repository;
mod state;
mod stays;
mod summary;
mod tracker;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{ApplyContext, apply, apply_stay};
pub use command::{Command, StayCommand};
pub use error::CoreError;
pub use repository::{StateRepository, StayRepository};
pub use state::{BenefitInstanceState, StateKey, StayTransition, TransitionResult};
pub use stays::StayTracker;
pub use summary::{CardSummary, YearSummary};
pub use tracker::{
    BenefitAvailability, BenefitInstance, BenefitTracker, CardGroup, CardYear, MonthlyScope,
};
