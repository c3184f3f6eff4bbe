// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::record::SyncRecord;
use crate::store::SyncStore;

/// Append-only CSV store.
///
/// Every `put` appends a row; `get` scans the whole file and the last matching row wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    closed: RwLock<bool>,
}

impl FileStore {
    /// Creates a store backed by `path`. The file is created on the first write.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            closed: RwLock::new(false),
        }
    }

    /// Location of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<Vec<u8>, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn is_empty(&self) -> Result<bool, StoreError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) => Ok(meta.len() == 0),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(true),
            Err(err) => Err(err.into()),
        }
    }
}

#[async_trait]
impl SyncStore for FileStore {
    async fn get(
        &self,
        owner: &str,
        uid: &str,
        fingerprint: &str,
    ) -> Result<SyncRecord, StoreError> {
        let closed = self.closed.read().await;
        if *closed {
            return Err(StoreError::Closed);
        }

        let bytes = self.read_all().await?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(bytes.as_slice());

        let mut found = None;
        for row in reader.deserialize::<SyncRecord>() {
            let record = row?;
            if record.owner == owner && record.uid == uid && record.fingerprint == fingerprint {
                found = Some(record);
            }
        }
        Ok(found.unwrap_or_else(|| SyncRecord::new(owner, uid, fingerprint)))
    }

    async fn put(&self, record: &SyncRecord) -> Result<(), StoreError> {
        let closed = self.closed.write().await;
        if *closed {
            return Err(StoreError::Closed);
        }

        let needs_header = self.is_empty().await?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(Vec::new());
        writer.serialize(record)?;
        let row = writer
            .into_inner()
            .map_err(|err| StoreError::Io(err.into_error()))?;

        if let Some(dir) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(&row).await?;
        file.sync_data().await?;
        Ok(())
    }

    async fn close(&self) -> Result<(), StoreError> {
        let mut closed = self.closed.write().await;
        if !*closed {
            tracing::debug!(path = %self.path.display(), "closing file store");
            *closed = true;
        }
        Ok(())
    }
}
