// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage backends for the card perks tracker.
//!
//! Every backend implements the repository traits of the `cardperks` crate:
//!
//! - [`JsonStateFile`] and [`JsonStayFile`] read and write the JSON files
//!   used by earlier versions of the tracker
//! - [`SqliteStore`] keeps benefit state and stays in one `SQLite` database,
//!   on disk or in memory
//! - [`MemoryStore`] keeps everything in memory
//!
//! [`Store`] wraps whichever backend was chosen at startup.
//!
//! All backends load eagerly and serve reads from memory. Writes reach the
//! backing store only on `flush`.

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

mod error;
mod json;
mod memory;
mod sqlite;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use json::{JsonStateFile, JsonStayFile};
pub use memory::MemoryStore;
pub use sqlite::{SqliteStore, initialize_schema};
pub use store::Store;
