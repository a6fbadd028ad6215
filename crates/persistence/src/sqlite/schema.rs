// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rusqlite::Connection;
use tracing::info;

use crate::error::PersistenceError;

/// Initializes the database schema.
///
/// # Arguments
///
/// * `conn` - The database connection to initialize
///
/// # Errors
///
/// Returns an error if schema creation fails.
pub fn initialize_schema(conn: &Connection) -> Result<(), PersistenceError> {
    info!("Initializing database schema");

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS benefit_state (
            benefit_id TEXT NOT NULL,
            period TEXT NOT NULL,
            posted INTEGER NOT NULL DEFAULT 0 CHECK(posted IN (0, 1)),
            post_date TEXT,
            custom_amount TEXT,
            posted_anniversary_year INTEGER,
            PRIMARY KEY (benefit_id, period)
        );

        CREATE TABLE IF NOT EXISTS stays (
            position INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            check_in TEXT NOT NULL,
            check_out TEXT NOT NULL CHECK(check_out > check_in)
        );

        CREATE TABLE IF NOT EXISTS guest_nights (
            position INTEGER PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            night_date TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}
