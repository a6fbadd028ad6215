// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use cardperks_domain::SpendingTransaction;
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use time::Date;
use time::macros::date;

pub const TODAY: Date = date!(2026 - 03 - 10);

pub const STATEMENT_HEADER: &str =
    "Transaction Date,Post Date,Description,Category,Type,Amount,Memo\n";

pub const SAMPLE_CONFIG: &str = "\
cards:
  amex_platinum_2025:
    display_name: Amex Platinum
    annual_fee: 695
    renewal_month: 7
    renewal_day: 15
    benefits:
      - id: uber
        category: Uber Cash
        amount: 15
        frequency: monthly
        renewal_type: calendar_year
      - id: airline
        category: Airline Fee Credit
        amount: 200
        renewal_type: card_anniversary
  hyatt_business:
    annual_fee: 199
    benefits:
      - id: hotel
        category: Hotel Credit
        amount: 12.5
        frequency: half_yearly
";

/// Writes `contents` to `name` inside `dir` and returns the path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path: PathBuf = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Builds a purchase with a positive spend amount.
pub fn purchase(transaction_date: Date, post_date: Date, amount: i64) -> SpendingTransaction {
    SpendingTransaction {
        transaction_date,
        post_date,
        amount: Decimal::from(amount),
        kind: String::from("Sale"),
        description: String::from("Merchant"),
    }
}
