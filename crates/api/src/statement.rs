// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Importing card statement exports.
//!
//! Statements are CSV files with the columns `Transaction Date`,
//! `Post Date`, `Description`, `Category`, `Type`, `Amount` and `Memo`.
//! Dates are `MM/DD/YYYY` and purchases are negative amounts.
//!
//! Consecutive exports usually overlap, so the same transaction can appear
//! in several files of a folder. Rows are compared column by column across
//! files and each distinct row is kept as many times as it appears in the
//! single file that holds it most often.

use cardperks_domain::SpendingTransaction;
use csv::StringRecord;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Statement dates, with or without zero padding.
const STATEMENT_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[month padding:none]/[day padding:none]/[year]");

/// Columns every statement must have (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &["transaction_date", "post_date", "type", "amount"];

/// One statement row exactly as exported.
///
/// Fields are kept as text so that rows compare the way they were written.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StatementRow {
    /// `Transaction Date`.
    pub transaction_date: String,
    /// `Post Date`.
    pub post_date: String,
    /// `Description`.
    pub description: String,
    /// `Category`.
    pub category: String,
    /// `Type`.
    pub kind: String,
    /// `Amount`.
    pub amount: String,
    /// `Memo`.
    pub memo: String,
}

impl StatementRow {
    /// Converts the row into a transaction with purchases made positive.
    ///
    /// # Returns
    ///
    /// `None` if either date or the amount cannot be parsed.
    #[must_use]
    pub fn to_transaction(&self) -> Option<SpendingTransaction> {
        let transaction_date: Date = parse_statement_date(&self.transaction_date)?;
        let post_date: Date = parse_statement_date(&self.post_date)?;
        let amount: Decimal = Decimal::from_str(self.amount.trim()).ok()?;

        Some(SpendingTransaction {
            transaction_date,
            post_date,
            amount: -amount,
            kind: self.kind.clone(),
            description: self.description.clone(),
        })
    }
}

/// Parses an `MM/DD/YYYY` statement date.
#[must_use]
pub fn parse_statement_date(value: &str) -> Option<Date> {
    Date::parse(value.trim(), STATEMENT_DATE_FORMAT).ok()
}

/// Normalizes a CSV header string for case-insensitive, whitespace-tolerant matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Validates that all required headers are present in the CSV.
fn validate_headers(
    headers: &StringRecord,
    path: &Path,
) -> Result<HashMap<String, usize>, ApiError> {
    let header_map: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| (normalize_header(header), idx))
        .collect();

    let missing: Vec<&str> = REQUIRED_HEADERS
        .iter()
        .copied()
        .filter(|required| !header_map.contains_key(*required))
        .collect();

    if !missing.is_empty() {
        return Err(ApiError::InvalidStatement {
            path: path.to_path_buf(),
            reason: format!("Missing required headers: {}", missing.join(", ")),
        });
    }

    Ok(header_map)
}

/// Reads the rows of one statement.
///
/// Records the CSV reader cannot decode are skipped with a warning.
///
/// # Arguments
///
/// * `reader` - The statement contents
/// * `path` - The statement path, used in messages
///
/// # Errors
///
/// Returns `InvalidStatement` if the header row cannot be read or lacks a
/// required column.
pub fn read_statement<R: Read>(reader: R, path: &Path) -> Result<Vec<StatementRow>, ApiError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidStatement {
            path: path.to_path_buf(),
            reason: format!("Failed to read CSV headers: {e}"),
        })?
        .clone();
    let header_map: HashMap<String, usize> = validate_headers(&headers, path)?;

    let mut rows: Vec<StatementRow> = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record: StringRecord = match result {
            Ok(rec) => rec,
            Err(e) => {
                warn!(
                    "Skipping row {} of {}: CSV parse error: {}",
                    idx + 1,
                    path.display(),
                    e
                );
                continue;
            }
        };

        let get_field = |name: &str| -> String {
            header_map
                .get(name)
                .and_then(|&col| record.get(col))
                .map(|s| s.trim().to_string())
                .unwrap_or_default()
        };

        rows.push(StatementRow {
            transaction_date: get_field("transaction_date"),
            post_date: get_field("post_date"),
            description: get_field("description"),
            category: get_field("category"),
            kind: get_field("type"),
            amount: get_field("amount"),
            memo: get_field("memo"),
        });
    }

    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Merges the rows of overlapping statement exports.
///
/// Each distinct row is kept as many times as it appears in the file where
/// it appears most often. Output order follows first appearance.
#[must_use]
pub fn deduplicate_statements(files: &[Vec<StatementRow>]) -> Vec<StatementRow> {
    let mut keep: HashMap<&StatementRow, usize> = HashMap::new();
    for rows in files {
        let mut in_file: HashMap<&StatementRow, usize> = HashMap::new();
        for row in rows {
            *in_file.entry(row).or_insert(0) += 1;
        }
        for (row, count) in in_file {
            let best: &mut usize = keep.entry(row).or_insert(0);
            *best = (*best).max(count);
        }
    }

    let mut merged: Vec<StatementRow> = Vec::new();
    for row in files.iter().flatten() {
        if let Some(remaining) = keep.get_mut(row)
            && *remaining > 0
        {
            *remaining -= 1;
            merged.push(row.clone());
        }
    }

    let total: usize = files.iter().map(Vec::len).sum();
    if merged.len() < total {
        debug!(
            "Dropped {} overlapping statement rows",
            total - merged.len()
        );
    }
    merged
}

/// Converts statement rows into transactions.
///
/// Rows with an unparseable date or amount are skipped with a warning.
#[must_use]
pub fn parse_transactions(rows: &[StatementRow]) -> Vec<SpendingTransaction> {
    rows.iter()
        .filter_map(|row| {
            let transaction: Option<SpendingTransaction> = row.to_transaction();
            if transaction.is_none() {
                warn!(
                    "Skipping statement row with unparseable date or amount: {} {} {} '{}'",
                    row.transaction_date, row.post_date, row.amount, row.description
                );
            }
            transaction
        })
        .collect()
}

/// Lists the `*.csv` and `*.CSV` files of a folder, sorted by name.
///
/// # Errors
///
/// Returns `Io` if the folder cannot be listed.
pub fn statement_files(folder: &Path) -> Result<Vec<PathBuf>, ApiError> {
    let io_error = |source: std::io::Error| ApiError::Io {
        path: folder.to_path_buf(),
        source,
    };

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in std::fs::read_dir(folder).map_err(io_error)? {
        let path: PathBuf = entry.map_err(io_error)?.path();
        let is_csv: bool = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "csv" || ext == "CSV");
        if is_csv && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Loads every statement in a folder as one transaction list.
///
/// A missing folder yields no transactions.
///
/// # Errors
///
/// Returns an error if the folder or a statement cannot be read, or a
/// statement lacks a required column.
pub fn load_statement_folder(folder: &Path) -> Result<Vec<SpendingTransaction>, ApiError> {
    if !folder.is_dir() {
        warn!("Statement folder {} does not exist", folder.display());
        return Ok(Vec::new());
    }

    let mut files: Vec<Vec<StatementRow>> = Vec::new();
    for path in statement_files(folder)? {
        let file: std::fs::File = std::fs::File::open(&path).map_err(|source| ApiError::Io {
            path: path.clone(),
            source,
        })?;
        files.push(read_statement(file, &path)?);
    }

    let transactions: Vec<SpendingTransaction> =
        parse_transactions(&deduplicate_statements(&files));
    info!(
        "Loaded {} transactions from {} statements in {}",
        transactions.len(),
        files.len(),
        folder.display()
    );
    Ok(transactions)
}
