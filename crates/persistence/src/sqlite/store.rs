// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use cardperks::{BenefitInstanceState, StateKey, StateRepository, StayRepository};
use cardperks_domain::{StayLog, format_iso_date, parse_iso_date};
use rusqlite::{Connection, Transaction, params};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::str::FromStr;
use time::Date;
use tracing::{debug, info};

use super::schema::initialize_schema;
use crate::error::PersistenceError;

/// A `benefit_state` row before its text columns are parsed.
struct StateRow {
    benefit_id: String,
    period: String,
    posted: bool,
    post_date: Option<String>,
    custom_amount: Option<String>,
    posted_anniversary_year: Option<i32>,
}

fn parse_date_column(value: &str, column: &str) -> Result<Date, PersistenceError> {
    parse_iso_date(value)
        .map_err(|err| PersistenceError::InvalidRecord(format!("{column}: {err}")))
}

impl StateRow {
    fn into_entry(self) -> Result<(StateKey, BenefitInstanceState), PersistenceError> {
        let post_date: Option<Date> = self
            .post_date
            .as_deref()
            .map(|value| parse_date_column(value, "post_date"))
            .transpose()?;
        let custom_amount: Option<Decimal> = self
            .custom_amount
            .as_deref()
            .map(|value| {
                Decimal::from_str(value).map_err(|err| {
                    PersistenceError::InvalidRecord(format!("custom_amount '{value}': {err}"))
                })
            })
            .transpose()?;

        Ok((
            StateKey::new(&self.benefit_id, &self.period),
            BenefitInstanceState {
                posted: self.posted,
                post_date,
                custom_amount,
                posted_anniversary_year: self.posted_anniversary_year,
            },
        ))
    }
}

/// Benefit state and the stay log in one `SQLite` database.
///
/// Rows are loaded at open. `set` only marks keys dirty; `flush` upserts the
/// dirty keys in a single transaction.
#[derive(Debug)]
pub struct SqliteStore {
    conn: Connection,
    entries: BTreeMap<StateKey, BenefitInstanceState>,
    dirty: BTreeSet<StateKey>,
    log: StayLog,
    log_dirty: bool,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, the schema cannot
    /// be created, or a stored row is invalid.
    pub fn open(path: &Path) -> Result<Self, PersistenceError> {
        info!("Opening SQLite database at: {}", path.display());
        Self::load(Connection::open(path)?)
    }

    /// Opens a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the schema cannot be created.
    pub fn open_in_memory() -> Result<Self, PersistenceError> {
        Self::load(Connection::open_in_memory()?)
    }

    fn load(conn: Connection) -> Result<Self, PersistenceError> {
        initialize_schema(&conn)?;
        let entries: BTreeMap<StateKey, BenefitInstanceState> = load_entries(&conn)?;
        let log: StayLog = load_stay_log(&conn)?;
        info!(
            "Loaded {} benefit states, {} stays and {} guest nights",
            entries.len(),
            log.stays().len(),
            log.guest_nights().len()
        );
        Ok(Self {
            conn,
            entries,
            dirty: BTreeSet::new(),
            log,
            log_dirty: false,
        })
    }

    /// Returns the number of keys changed since the last flush.
    #[must_use]
    pub fn pending_changes(&self) -> usize {
        self.dirty.len()
    }
}

fn load_entries(
    conn: &Connection,
) -> Result<BTreeMap<StateKey, BenefitInstanceState>, PersistenceError> {
    let mut stmt = conn.prepare(
        "SELECT benefit_id, period, posted, post_date, custom_amount, posted_anniversary_year
         FROM benefit_state",
    )?;
    let rows: Vec<StateRow> = stmt
        .query_map([], |row| {
            Ok(StateRow {
                benefit_id: row.get(0)?,
                period: row.get(1)?,
                posted: row.get(2)?,
                post_date: row.get(3)?,
                custom_amount: row.get(4)?,
                posted_anniversary_year: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<StateRow>, rusqlite::Error>>()?;

    rows.into_iter().map(StateRow::into_entry).collect()
}

fn load_stay_log(conn: &Connection) -> Result<StayLog, PersistenceError> {
    let mut log: StayLog = StayLog::new();

    let mut stays = conn.prepare("SELECT name, check_in, check_out FROM stays ORDER BY position")?;
    let stay_rows: Vec<(String, String, String)> = stays
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;
    for (name, check_in, check_out) in stay_rows {
        log.add_stay(
            &name,
            parse_date_column(&check_in, "check_in")?,
            parse_date_column(&check_out, "check_out")?,
        )
        .map_err(|err| PersistenceError::InvalidRecord(err.to_string()))?;
    }

    let mut nights =
        conn.prepare("SELECT name, night_date FROM guest_nights ORDER BY position")?;
    let night_rows: Vec<(String, String)> = nights
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, rusqlite::Error>>()?;
    for (name, date) in night_rows {
        log.add_guest_night(&name, parse_date_column(&date, "night_date")?)
            .map_err(|err| PersistenceError::InvalidRecord(err.to_string()))?;
    }

    Ok(log)
}

fn upsert_state(
    tx: &Transaction<'_>,
    key: &StateKey,
    state: &BenefitInstanceState,
) -> Result<(), PersistenceError> {
    tx.execute(
        "INSERT INTO benefit_state
             (benefit_id, period, posted, post_date, custom_amount, posted_anniversary_year)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(benefit_id, period) DO UPDATE SET
             posted = excluded.posted,
             post_date = excluded.post_date,
             custom_amount = excluded.custom_amount,
             posted_anniversary_year = excluded.posted_anniversary_year",
        params![
            key.benefit_id(),
            key.period(),
            state.posted,
            state.post_date.map(format_iso_date),
            state.custom_amount.map(|amount| amount.to_string()),
            state.posted_anniversary_year,
        ],
    )?;
    Ok(())
}

fn replace_stay_log(tx: &Transaction<'_>, log: &StayLog) -> Result<(), PersistenceError> {
    tx.execute("DELETE FROM stays", [])?;
    tx.execute("DELETE FROM guest_nights", [])?;

    for (position, stay) in log.stays().iter().enumerate() {
        tx.execute(
            "INSERT INTO stays (position, name, check_in, check_out) VALUES (?1, ?2, ?3, ?4)",
            params![
                i64::try_from(position).unwrap_or(i64::MAX),
                stay.name,
                format_iso_date(stay.check_in),
                format_iso_date(stay.check_out),
            ],
        )?;
    }
    for (position, night) in log.guest_nights().iter().enumerate() {
        tx.execute(
            "INSERT INTO guest_nights (position, name, night_date) VALUES (?1, ?2, ?3)",
            params![
                i64::try_from(position).unwrap_or(i64::MAX),
                night.name,
                format_iso_date(night.date),
            ],
        )?;
    }
    Ok(())
}

impl StateRepository for SqliteStore {
    type Error = PersistenceError;

    fn get(&self, key: &StateKey) -> Option<BenefitInstanceState> {
        self.entries.get(key).copied()
    }

    fn set(&mut self, key: StateKey, state: BenefitInstanceState) {
        self.dirty.insert(key.clone());
        self.entries.insert(key, state);
    }

    fn remove(&mut self, key: &StateKey) {
        self.dirty.remove(key);
        self.entries.remove(key);
    }

    fn entries(&self) -> Vec<(StateKey, BenefitInstanceState)> {
        self.entries
            .iter()
            .map(|(key, state)| (key.clone(), *state))
            .collect()
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if self.dirty.is_empty() {
            return Ok(());
        }

        let tx: Transaction<'_> = self.conn.transaction()?;
        for key in &self.dirty {
            if let Some(state) = self.entries.get(key) {
                upsert_state(&tx, key, state)?;
            }
        }
        tx.commit()?;

        debug!("Upserted {} benefit states", self.dirty.len());
        self.dirty.clear();
        Ok(())
    }
}

impl StayRepository for SqliteStore {
    type Error = PersistenceError;

    fn stay_log(&self) -> &StayLog {
        &self.log
    }

    fn set_stay_log(&mut self, log: StayLog) {
        self.log = log;
        self.log_dirty = true;
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        if !self.log_dirty {
            return Ok(());
        }

        let tx: Transaction<'_> = self.conn.transaction()?;
        replace_stay_log(&tx, &self.log)?;
        tx.commit()?;

        debug!(
            "Wrote {} stays and {} guest nights",
            self.log.stays().len(),
            self.log.guest_nights().len()
        );
        self.log_dirty = false;
        Ok(())
    }
}
