// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Local record of the operator's vacation requests.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fk_core::VacationRequest;
use tokio::sync::Mutex;

use crate::error::Result;
use crate::storage::KvStore;

/// Storage key of the vacation book.
pub const VACATIONS_KEY: &str = "vacation_requests";

/// Persistent list of vacation requests, optimistic ones included.
///
/// Mutations always apply in memory. A failed write is logged and marks the
/// book dirty; the next successful write stores the full list.
pub struct VacationBook {
    store: Arc<dyn KvStore>,
    records: Mutex<Vec<VacationRequest>>,
    dirty: AtomicBool,
}

impl VacationBook {
    pub async fn open(store: Arc<dyn KvStore>) -> Result<Self> {
        let records = match store.get(VACATIONS_KEY).await? {
            Some(raw) if !raw.trim().is_empty() => serde_json::from_str(&raw)?,
            _ => Vec::new(),
        };
        Ok(VacationBook {
            store,
            records: Mutex::new(records),
            dirty: AtomicBool::new(false),
        })
    }

    /// All records, newest first.
    pub async fn list(&self) -> Vec<VacationRequest> {
        let mut records = self.records.lock().await.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    /// Looks a record up by local or server id.
    pub async fn get(&self, id: &str) -> Option<VacationRequest> {
        self.records
            .lock()
            .await
            .iter()
            .find(|r| r.matches(id))
            .cloned()
    }

    /// Adds a record, replacing one with the same local id.
    pub async fn insert(&self, record: VacationRequest) {
        let mut records = self.records.lock().await;
        match records.iter_mut().find(|r| r.local_id == record.local_id) {
            Some(existing) => *existing = record,
            None => records.push(record),
        }
        self.persist(&records).await;
    }

    /// Applies `f` to the record matching `id`, returning the updated copy.
    pub async fn update<F>(&self, id: &str, f: F) -> Option<VacationRequest>
    where
        F: FnOnce(&mut VacationRequest),
    {
        let mut records = self.records.lock().await;
        let record = records.iter_mut().find(|r| r.matches(id))?;
        f(record);
        let updated = record.clone();
        self.persist(&records).await;
        Some(updated)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    async fn persist(&self, records: &[VacationRequest]) {
        let result = match serde_json::to_string(records) {
            Ok(json) => self.store.set(VACATIONS_KEY, json).await.map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match result {
            Ok(()) => self.dirty.store(false, Ordering::Release),
            Err(e) => {
                self.dirty.store(true, Ordering::Release);
                tracing::warn!(error = %e, "failed to persist vacation requests");
            }
        }
    }
}

#[cfg(test)]
#[path = "book_tests.rs"]
mod tests;
