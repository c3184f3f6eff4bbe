// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use crate::error::StoreError;
use crate::record::SyncRecord;
use crate::store::SyncStore;

/// Store that remembers nothing.
#[derive(Debug, Default)]
pub struct NoopStore {
    closed: AtomicBool,
}

impl NoopStore {
    /// Creates the store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_open(&self) -> Result<(), StoreError> {
        if self.closed.load(Ordering::Acquire) {
            Err(StoreError::Closed)
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl SyncStore for NoopStore {
    async fn get(
        &self,
        owner: &str,
        uid: &str,
        fingerprint: &str,
    ) -> Result<SyncRecord, StoreError> {
        self.ensure_open()?;
        Ok(SyncRecord::new(owner, uid, fingerprint))
    }

    async fn put(&self, _record: &SyncRecord) -> Result<(), StoreError> {
        self.ensure_open()
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Direction;

    #[tokio::test]
    async fn never_remembers() {
        let store = NoopStore::new();
        let mut record = SyncRecord::new("user1", "uid-1", "abc");
        record.mark_synced(Direction::Outbound, jiff::Timestamp::now());
        store.put(&record).await.unwrap();

        let got = store.get("user1", "uid-1", "abc").await.unwrap();
        assert_eq!(got, SyncRecord::new("user1", "uid-1", "abc"));
    }

    #[tokio::test]
    async fn fails_after_close() {
        let store = NoopStore::new();
        store.close().await.unwrap();
        store.close().await.unwrap();
        assert!(matches!(
            store.get("user1", "uid-1", "abc").await,
            Err(StoreError::Closed)
        ));
    }
}
