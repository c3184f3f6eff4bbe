// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::error::StoreError;
use crate::record::{SyncRecord, record_key};
use crate::store::SyncStore;

/// Key-value store on `SQLite`, partitioned by owner.
///
/// Keys are `uid:fingerprint`, values the JSON-encoded record.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Opens a sqlite database, creating it and its schema if needed.
    /// If `filename` is `None`, it opens an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub async fn open(filename: Option<&Path>) -> Result<Self, StoreError> {
        let (options, pool_options) = if let Some(filename) = filename {
            tracing::info!(path = %filename.display(), "connecting to SQLite database");
            if let Some(dir) = filename.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(dir).await?;
            }
            let options = SqliteConnectOptions::new()
                .filename(filename)
                .create_if_missing(true);
            (options, SqlitePoolOptions::new())
        } else {
            tracing::info!("connecting to in-memory SQLite database");
            // every connection would get its own empty database, so keep exactly one alive
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (SqliteConnectOptions::new().in_memory(true), pool_options)
        };

        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("src/store/migrations") // relative path from the crate root
            .run(&pool)
            .await?;

        Ok(Self { pool })
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.pool.is_closed() {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SyncStore for SqliteStore {
    async fn get(
        &self,
        owner: &str,
        uid: &str,
        fingerprint: &str,
    ) -> Result<SyncRecord, StoreError> {
        const SQL: &str = "SELECT value FROM sync_records WHERE owner = ? AND key = ?;";

        self.ensure_open()?;
        let key = record_key(uid, fingerprint);
        let mut tx = self.pool.begin().await.map_err(closed_or)?;
        let row: Option<(String,)> = sqlx::query_as(SQL)
            .bind(owner)
            .bind(&key)
            .fetch_optional(&mut *tx)
            .await?;
        tx.commit().await?;

        let Some((value,)) = row else {
            return Ok(SyncRecord::new(owner, uid, fingerprint));
        };
        let record: SyncRecord = serde_json::from_str(&value)?;
        if record.owner != owner || record.key() != key {
            return Err(StoreError::Corrupt {
                key,
                reason: format!("value belongs to {}/{}", record.owner, record.key()),
            });
        }
        Ok(record)
    }

    async fn put(&self, record: &SyncRecord) -> Result<(), StoreError> {
        const SQL: &str = "\
INSERT INTO sync_records (owner, key, value)
VALUES (?, ?, ?)
ON CONFLICT(owner, key) DO UPDATE SET
    value = excluded.value;
";

        self.ensure_open()?;
        let value = serde_json::to_string(record)?;
        let mut tx = self.pool.begin().await.map_err(closed_or)?;
        sqlx::query(SQL)
            .bind(&record.owner)
            .bind(record.key())
            .bind(value)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        if !self.pool.is_closed() {
            tracing::debug!("closing database connection");
            self.pool.close().await;
        }
        Ok(())
    }
}

fn closed_or(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolClosed => StoreError::Closed,
        err => StoreError::Database(err),
    }
}
