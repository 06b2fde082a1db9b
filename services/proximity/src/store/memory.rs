//! In-memory implementation of the selection store.
//!
//! # Purpose
//! Implements [`SelectionStore`] with a `HashMap` keyed by `user_id` guarded by
//! a `tokio::sync::RwLock`. It exists for:
//! - local development and tests (no external dependencies)
//! - deployments where durability is not required
//!
//! # Durability and consistency
//! - **Not durable**: all state is lost on process restart.
//! - **Single-process consistency**: the upsert looks up and writes under one
//!   write lock, so two racing submissions for the same `user_id` can never
//!   both take the insert branch.
//! - Reads take the read lock and observe the last committed write.
use super::{SelectionStore, StoreError, StoreResult};
use crate::model::{Selection, Submission, UpsertOutcome};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug)]
struct SelectionTable {
    /// Next surrogate key; ids start at 1 and are never reused.
    next_id: i64,
    rows: HashMap<String, Selection>,
}

/// In-memory selection store.
///
/// Cloning shares the same underlying table.
#[derive(Clone)]
pub struct InMemoryStore {
    table: Arc<RwLock<SelectionTable>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            table: Arc::new(RwLock::new(SelectionTable {
                next_id: 1,
                rows: HashMap::new(),
            })),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SelectionStore for InMemoryStore {
    async fn upsert_selection(&self, submission: Submission) -> StoreResult<UpsertOutcome> {
        let mut guard = self.table.write().await;
        let table = &mut *guard;
        let outcome = match table.rows.get_mut(&submission.user_id) {
            Some(existing) => {
                existing.country = submission.country;
                existing.salary = submission.salary;
                existing.people = submission.people;
                existing.work = submission.work;
                UpsertOutcome::Updated(existing.clone())
            }
            None => {
                let id = table.next_id;
                table.next_id += 1;
                let selection = submission.into_selection(id);
                table
                    .rows
                    .insert(selection.user_id.clone(), selection.clone());
                UpsertOutcome::Created(selection)
            }
        };
        metrics::gauge!("proximity_selections_total").set(table.rows.len() as f64);
        Ok(outcome)
    }

    async fn get_selection(&self, user_id: &str) -> StoreResult<Selection> {
        self.table
            .read()
            .await
            .rows
            .get(user_id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound("selection".into()))
    }

    async fn list_selections(&self) -> StoreResult<Vec<Selection>> {
        let table = self.table.read().await;
        let mut rows: Vec<Selection> = table.rows.values().cloned().collect();
        // Match the durable backend, which scans in key order.
        rows.sort_by_key(|row| row.id);
        Ok(rows)
    }

    async fn count_selections(&self) -> StoreResult<u64> {
        Ok(self.table.read().await.rows.len() as u64)
    }

    async fn health_check(&self) -> StoreResult<()> {
        // In-memory backend is always "healthy" if the process is running.
        Ok(())
    }

    fn is_durable(&self) -> bool {
        false
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(user_id: &str, country: &str, salary: i32, people: i32, work: i32) -> Submission {
        Submission {
            user_id: user_id.to_string(),
            country: country.to_string(),
            salary,
            people,
            work,
        }
    }

    #[tokio::test]
    async fn upsert_creates_then_updates_in_place() {
        let store = InMemoryStore::new();

        let created = store
            .upsert_selection(submission("u1", "A", 2, 4, 6))
            .await
            .expect("create");
        assert!(created.is_created());
        let id = created.selection().id;

        let updated = store
            .upsert_selection(submission("u1", "B", 9, 8, 7))
            .await
            .expect("update");
        assert!(!updated.is_created());
        assert_eq!(updated.selection().id, id);

        assert_eq!(store.count_selections().await.expect("count"), 1);
        let stored = store.get_selection("u1").await.expect("get");
        assert_eq!(
            stored,
            Selection {
                id,
                user_id: "u1".to_string(),
                country: "B".to_string(),
                salary: 9,
                people: 8,
                work: 7,
            }
        );
    }

    #[tokio::test]
    async fn ids_are_distinct_and_never_reassigned() {
        let store = InMemoryStore::new();
        let a = store
            .upsert_selection(submission("a", "X", 1, 1, 1))
            .await
            .expect("a");
        let b = store
            .upsert_selection(submission("b", "X", 1, 1, 1))
            .await
            .expect("b");
        let a_again = store
            .upsert_selection(submission("a", "Y", 2, 2, 2))
            .await
            .expect("a again");
        assert_ne!(a.selection().id, b.selection().id);
        assert_eq!(a.selection().id, a_again.selection().id);

        let listed = store.list_selections().await.expect("list");
        let ids: Vec<i64> = listed.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.selection().id, b.selection().id]);
    }

    #[tokio::test]
    async fn missing_identity_is_not_found() {
        let store = InMemoryStore::new();
        let err = store.get_selection("nobody").await.expect_err("missing");
        assert!(matches!(err, StoreError::NotFound(_)));
        assert!(store.list_selections().await.expect("list").is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_first_submissions_for_same_identity_create_one_row() {
        let store = InMemoryStore::new();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .upsert_selection(submission("shared", "A", (i % 10) + 1, 5, 5))
                    .await
                    .expect("upsert")
            }));
        }
        let mut created = 0;
        let mut ids = Vec::new();
        for handle in handles {
            let outcome = handle.await.expect("join");
            if outcome.is_created() {
                created += 1;
            }
            ids.push(outcome.selection().id);
        }
        assert_eq!(created, 1);
        assert!(ids.iter().all(|id| *id == ids[0]));
        assert_eq!(store.count_selections().await.expect("count"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_distinct_identities_get_distinct_ids() {
        let store = InMemoryStore::new();
        let first = store.clone();
        let second = store.clone();
        let (a, b) = tokio::join!(
            tokio::spawn(async move { first.upsert_selection(submission("p", "A", 1, 2, 3)).await }),
            tokio::spawn(async move { second.upsert_selection(submission("q", "A", 3, 2, 1)).await }),
        );
        let a = a.expect("join").expect("p");
        let b = b.expect("join").expect("q");
        assert!(a.is_created() && b.is_created());
        assert_ne!(a.selection().id, b.selection().id);
        assert_eq!(store.count_selections().await.expect("count"), 2);
    }

    #[tokio::test]
    async fn backend_health_and_identity() {
        let store = InMemoryStore::new();
        store.health_check().await.expect("health");
        assert!(!store.is_durable());
        assert_eq!(store.backend_name(), "memory");
    }
}
