// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Boundary layer of the card perks tracker.
//!
//! Reads the files the tracker is driven by (the card configuration and
//! the statement exports) and assembles the spending and nights reports.

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

mod config;
mod error;
mod reports;
mod statement;

#[cfg(test)]
mod tests;

pub use config::{ConfigFormat, load_config, parse_config};
pub use error::ApiError;
pub use reports::{
    BUSINESS_STATEMENTS_DIR, BusinessSpendingReport, PERSONAL_STATEMENTS_DIR,
    PersonalSpendingReport, SpendingReport, business_spending_report, nights_report,
    personal_spending_report, spending_report,
};
pub use statement::{
    StatementRow, deduplicate_statements, load_statement_folder, parse_statement_date,
    parse_transactions, read_statement, statement_files,
};
