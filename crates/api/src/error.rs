// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use cardperks::CoreError;
use cardperks_domain::DomainError;
use cardperks_persistence::PersistenceError;
use std::path::PathBuf;
use thiserror::Error;

/// API-level errors.
///
/// Lower-layer errors are wrapped unchanged; the remaining variants cover
/// the files this layer reads itself.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configuration file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The configuration file could not be parsed or failed validation.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// A statement file is missing required columns or cannot be read.
    #[error("Invalid statement {}: {reason}", path.display())]
    InvalidStatement { path: PathBuf, reason: String },

    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A domain rule was violated.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// A tracker operation failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The storage backend failed.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl ApiError {
    /// Builds an `InvalidConfig` error scoped to one card.
    pub(crate) fn invalid_card(card_key: &str, message: impl std::fmt::Display) -> Self {
        Self::InvalidConfig {
            message: format!("card '{card_key}': {message}"),
        }
    }
}
