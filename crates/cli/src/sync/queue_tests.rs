// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the offline queue module.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use crate::sync::test_helpers::make_test_job;
use super::*;
use crate::storage::{FileStore, MemoryStore};
use tempfile::tempdir;

fn ids(jobs: &[QueuedJob]) -> Vec<String> {
    jobs.iter()
        .map(|j| j.client_ref().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_queue_missing_key_is_empty() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store).await.unwrap();
    assert_eq!(queue.pending_count().await, 0);
    assert!(queue.list().await.is_empty());
    assert!(queue.dead_letters().await.is_empty());
}

#[tokio::test]
async fn test_queue_preserves_fifo_order() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store).await.unwrap();

    for r in ["a", "b", "c"] {
        queue.enqueue(make_test_job(r)).await.unwrap();
    }

    assert_eq!(ids(&queue.list().await), vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_queue_survives_reopen() {
    let dir = tempdir().unwrap();
    let store: Arc<dyn KvStore> = Arc::new(FileStore::open(dir.path()).unwrap());

    {
        let queue = OfflineQueue::open(Arc::clone(&store)).await.unwrap();
        queue.enqueue(make_test_job("a")).await.unwrap();
        queue.enqueue(make_test_job("b")).await.unwrap();
    }

    let reopened = OfflineQueue::open(store).await.unwrap();
    assert_eq!(ids(&reopened.list().await), vec!["a", "b"]);
}

#[tokio::test]
async fn test_queue_persists_json_array() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store.clone()).await.unwrap();
    queue.enqueue(make_test_job("a")).await.unwrap();

    let raw = store.raw(QUEUE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let arr = value.as_array().unwrap();
    assert_eq!(arr.len(), 1);
    assert_eq!(arr[0]["kind"], "CreateVacationRequest");
    assert_eq!(arr[0]["payload"]["clientRef"], "a");
}

#[tokio::test]
async fn test_dequeue_removes_only_matching_job() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store).await.unwrap();
    let a = make_test_job("a");
    let b = make_test_job("b");
    queue.enqueue(a.clone()).await.unwrap();
    queue.enqueue(b).await.unwrap();

    assert!(queue.dequeue(&a.id).await.unwrap());
    assert_eq!(ids(&queue.list().await), vec!["b"]);
}

#[tokio::test]
async fn test_dequeue_absent_id_is_noop() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store.clone()).await.unwrap();
    let a = make_test_job("a");
    queue.enqueue(a.clone()).await.unwrap();

    assert!(queue.dequeue(&a.id).await.unwrap());
    // Second removal: nothing happens, even if storage is broken.
    store.set_fail_writes(true);
    assert!(!queue.dequeue(&a.id).await.unwrap());
    assert!(!queue.dequeue("never-queued").await.unwrap());
    assert_eq!(queue.pending_count().await, 0);
}

#[tokio::test]
async fn test_clear_empties_queue_and_storage() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store.clone()).await.unwrap();
    queue.enqueue(make_test_job("a")).await.unwrap();
    queue.enqueue(make_test_job("b")).await.unwrap();

    queue.clear().await.unwrap();

    assert_eq!(queue.pending_count().await, 0);
    assert_eq!(store.raw(QUEUE_KEY).unwrap(), "[]");
}

#[tokio::test]
async fn test_enqueue_write_failure_keeps_job_in_memory() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store.clone()).await.unwrap();

    store.set_fail_writes(true);
    let result = queue.enqueue(make_test_job("a")).await;

    assert!(matches!(result, Err(QueueError::Store(_))));
    assert!(queue.is_dirty());
    assert_eq!(queue.pending_count().await, 1);
    assert!(store.raw(QUEUE_KEY).is_none());

    // Next successful write persists everything.
    store.set_fail_writes(false);
    queue.enqueue(make_test_job("b")).await.unwrap();
    assert!(!queue.is_dirty());

    let reopened = OfflineQueue::open(store).await.unwrap();
    assert_eq!(ids(&reopened.list().await), vec!["a", "b"]);
}

#[tokio::test]
async fn test_open_corrupt_storage_is_error() {
    let store = Arc::new(MemoryStore::new());
    store.set(QUEUE_KEY, "{not json".to_string()).await.unwrap();

    let result = OfflineQueue::open(store).await;
    assert!(matches!(result, Err(QueueError::Serialization(_))));
}

#[tokio::test]
async fn test_open_accepts_legacy_type_field() {
    let store = Arc::new(MemoryStore::new());
    let raw = r#"[{"id":"j1","type":"CreateCorrective","payload":{"clientRef":"x"},"createdAt":"2026-03-01T08:00:00Z"}]"#;
    store.set(QUEUE_KEY, raw.to_string()).await.unwrap();

    let queue = OfflineQueue::open(store).await.unwrap();
    let jobs = queue.list().await;
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].kind, fk_core::JobKind::CreateCorrective);
    assert_eq!(jobs[0].attempts, 0);
}

#[tokio::test]
async fn test_record_failure_counts_attempts() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store).await.unwrap();
    let a = make_test_job("a");
    queue.enqueue(a.clone()).await.unwrap();

    assert_eq!(queue.record_failure(&a.id, "400").await.unwrap(), Some(1));
    assert_eq!(queue.record_failure(&a.id, "422").await.unwrap(), Some(2));
    assert_eq!(queue.record_failure("missing", "x").await.unwrap(), None);

    let job = &queue.list().await[0];
    assert_eq!(job.attempts, 2);
    assert_eq!(job.last_error.as_deref(), Some("422"));
}

#[tokio::test]
async fn test_bury_moves_job_to_dead_letters() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store.clone()).await.unwrap();
    let a = make_test_job("a");
    let b = make_test_job("b");
    queue.enqueue(a.clone()).await.unwrap();
    queue.enqueue(b).await.unwrap();

    let buried = queue.bury(&a.id).await.unwrap().unwrap();
    assert_eq!(buried.id, a.id);
    assert_eq!(ids(&queue.list().await), vec!["b"]);
    assert_eq!(ids(&queue.dead_letters().await), vec!["a"]);
    assert!(queue.bury(&a.id).await.unwrap().is_none());

    let reopened = OfflineQueue::open(store).await.unwrap();
    assert_eq!(ids(&reopened.dead_letters().await), vec!["a"]);
    assert_eq!(reopened.pending_count().await, 1);
}

#[tokio::test]
async fn test_bury_write_failure_keeps_move_in_memory() {
    let store = Arc::new(MemoryStore::new());
    let queue = OfflineQueue::open(store.clone()).await.unwrap();
    let a = make_test_job("a");
    queue.enqueue(a.clone()).await.unwrap();

    store.set_fail_writes(true);
    assert!(queue.bury(&a.id).await.is_err());
    assert!(queue.is_dirty());
    assert_eq!(queue.pending_count().await, 0);
    assert_eq!(ids(&queue.dead_letters().await), vec!["a"]);
}

#[tokio::test]
async fn test_pending_count_matches_list_under_concurrency() {
    let store = Arc::new(MemoryStore::new());
    let queue = Arc::new(OfflineQueue::open(store.clone()).await.unwrap());

    let mut handles = Vec::new();
    for i in 0..20 {
        let queue = Arc::clone(&queue);
        handles.push(tokio::spawn(async move {
            queue.enqueue(make_test_job(&format!("j{i}"))).await.unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    assert_eq!(queue.pending_count().await, 20);
    assert_eq!(queue.list().await.len(), 20);

    // No lost update: the persisted list has every job.
    let reopened = OfflineQueue::open(store).await.unwrap();
    assert_eq!(reopened.pending_count().await, 20);
}

#[tokio::test]
async fn test_separate_keys_are_independent() {
    let store: Arc<dyn KvStore> = Arc::new(MemoryStore::new());
    let first = OfflineQueue::open_with_key(Arc::clone(&store), "q1").await.unwrap();
    let second = OfflineQueue::open_with_key(store, "q2").await.unwrap();

    first.enqueue(make_test_job("a")).await.unwrap();
    assert_eq!(first.pending_count().await, 1);
    assert_eq!(second.pending_count().await, 0);
}
