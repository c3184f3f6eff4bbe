// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Persistence of [`SyncRecord`]s.

mod file;
mod noop;
mod sqlite;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::StoreError;
use crate::record::SyncRecord;

pub use crate::store::file::FileStore;
pub use crate::store::noop::NoopStore;
pub use crate::store::sqlite::SqliteStore;

/// Keyed storage of sync records.
///
/// A single instance may be shared between tasks; implementations serialize writers
/// against readers.
#[async_trait]
pub trait SyncStore: Send + Sync + std::fmt::Debug {
    /// Returns the record stored under the key, or a fresh unsynced record carrying it.
    ///
    /// # Errors
    ///
    /// Only infrastructure failures are errors; a missing record is not.
    async fn get(&self, owner: &str, uid: &str, fingerprint: &str)
    -> Result<SyncRecord, StoreError>;

    /// Stores `record`, replacing any previous value under its key.
    ///
    /// # Errors
    ///
    /// Returns an error if the record could not be persisted.
    async fn put(&self, record: &SyncRecord) -> Result<(), StoreError>;

    /// Releases the store. Calling it again is a no-op; any other call afterwards fails
    /// with [`StoreError::Closed`].
    ///
    /// # Errors
    ///
    /// Returns an error if pending data could not be flushed.
    async fn close(&self) -> Result<(), StoreError>;
}

/// Which store to use and where it keeps its data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    /// Keep nothing; every event is always pending.
    None,

    /// CSV file.
    File {
        /// Location of the file.
        path: Option<PathBuf>,
    },

    /// `SQLite` database; in memory when no path is given.
    Sqlite {
        /// Location of the database file.
        path: Option<PathBuf>,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Sqlite { path: None }
    }
}

impl StoreConfig {
    /// The configured path, if the store has one.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            StoreConfig::None => None,
            StoreConfig::File { path } | StoreConfig::Sqlite { path } => path.as_deref(),
        }
    }

    /// Replaces the path, keeping the store kind.
    #[must_use]
    pub fn with_path(self, new: PathBuf) -> Self {
        match self {
            StoreConfig::None => StoreConfig::None,
            StoreConfig::File { .. } => StoreConfig::File { path: Some(new) },
            StoreConfig::Sqlite { .. } => StoreConfig::Sqlite { path: Some(new) },
        }
    }

    /// Opens the configured store.
    ///
    /// # Errors
    ///
    /// Returns an error if a file store has no path, or the database cannot be opened.
    pub async fn open(&self) -> Result<Box<dyn SyncStore>, StoreError> {
        Ok(match self {
            StoreConfig::None => Box::new(NoopStore::new()),
            StoreConfig::File { path: Some(path) } => Box::new(FileStore::new(path.clone())),
            StoreConfig::File { path: None } => {
                return Err(StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "file store needs a path",
                )));
            }
            StoreConfig::Sqlite { path } => Box::new(SqliteStore::open(path.as_deref()).await?),
        })
    }
}
