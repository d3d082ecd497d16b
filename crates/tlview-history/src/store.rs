//! The currently loaded record collection.
//!
//! Reloads follow a latest-request-wins policy: every load takes a ticket,
//! and a load may replace the collection only while no newer load is still
//! in flight and no newer load has already committed. A load that fails
//! gives up its ticket with [`HistoryStore::abandon`], so an older load that
//! is still running can apply its result. A failed load never touches the
//! current collection.

use std::collections::BTreeSet;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use tlview_core::LocationRecord;

use crate::client::HistoryClient;
use crate::error::HistoryError;
use crate::source::HistorySource;

/// Proof that a load was started; redeemed with [`HistoryStore::commit`]
/// or released with [`HistoryStore::abandon`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    generation: u64,
}

impl LoadTicket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.generation
    }
}

/// Result of a completed reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    Applied { generation: u64, count: usize },
    /// A newer load was in flight or had already committed.
    Superseded { generation: u64 },
}

#[derive(Debug)]
struct State {
    issued: u64,
    in_flight: BTreeSet<u64>,
    generation: u64,
    records: Arc<[LocationRecord]>,
    loaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug)]
pub struct HistoryStore {
    state: RwLock<State>,
}

impl Default for HistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                issued: 0,
                in_flight: BTreeSet::new(),
                generation: 0,
                records: Arc::from(Vec::new()),
                loaded_at: None,
            }),
        }
    }

    /// Start a load; it outranks every load started before it.
    pub fn begin_load(&self) -> LoadTicket {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.issued += 1;
        let generation = state.issued;
        state.in_flight.insert(generation);
        LoadTicket { generation }
    }

    /// Replace the collection unless a newer load is in flight or committed.
    ///
    /// Returns `false` (and drops `records`) for superseded or already
    /// redeemed tickets.
    pub fn commit(&self, ticket: LoadTicket, records: Vec<LocationRecord>) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !state.in_flight.remove(&ticket.generation) {
            return false;
        }
        let newer_in_flight = state.in_flight.range(ticket.generation + 1..).next().is_some();
        if newer_in_flight || ticket.generation <= state.generation {
            tracing::info!(
                generation = ticket.generation,
                committed = state.generation,
                newer_in_flight,
                "discarding superseded history load"
            );
            return false;
        }
        state.generation = ticket.generation;
        state.records = Arc::from(records);
        state.loaded_at = Some(Utc::now());
        true
    }

    /// Release a ticket whose load failed so older in-flight loads may commit.
    pub fn abandon(&self, ticket: LoadTicket) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .in_flight
            .remove(&ticket.generation);
    }

    /// The current collection. Cheap to clone and safe to hold across reloads.
    #[must_use]
    pub fn records(&self) -> Arc<[LocationRecord]> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.records)
    }

    /// Generation of the committed collection; `0` before the first load.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .generation
    }

    #[must_use]
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .loaded_at
    }

    /// Load `source` through `client` and commit the result under a fresh ticket.
    ///
    /// # Errors
    ///
    /// Propagates the load failure; the current collection is kept.
    pub async fn reload(
        &self,
        client: &HistoryClient,
        source: &HistorySource,
    ) -> Result<ReloadOutcome, HistoryError> {
        let ticket = self.begin_load();
        let records = match client.load(source).await {
            Ok(records) => records,
            Err(err) => {
                self.abandon(ticket);
                tracing::warn!(
                    generation = ticket.generation,
                    error = %err,
                    "history load failed; keeping previous dataset"
                );
                return Err(err);
            }
        };
        let count = records.len();
        if self.commit(ticket, records) {
            Ok(ReloadOutcome::Applied {
                generation: ticket.generation,
                count,
            })
        } else {
            Ok(ReloadOutcome::Superseded {
                generation: ticket.generation,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::io::Write;
    use tlview_core::VisitRecord;

    fn record(name: &str) -> LocationRecord {
        LocationRecord::Visit(VisitRecord {
            start_time: Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap(),
            end_time: Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
            name: name.to_string(),
            place_id: None,
            latitude: 1.0,
            longitude: 2.0,
        })
    }

    fn test_client() -> HistoryClient {
        HistoryClient::new(5, "tlview-test/0.1", 0, 0).expect("client")
    }

    #[test]
    fn starts_empty() {
        let store = HistoryStore::new();
        assert!(store.records().is_empty());
        assert_eq!(store.generation(), 0);
        assert!(store.loaded_at().is_none());
    }

    #[test]
    fn commit_replaces_collection_wholesale() {
        let store = HistoryStore::new();
        let first = store.begin_load();
        assert!(store.commit(first, vec![record("a"), record("b")]));
        assert_eq!(store.records().len(), 2);

        let second = store.begin_load();
        assert!(store.commit(second, vec![record("c")]));
        let records = store.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].display_name(), "c");
        assert_eq!(store.generation(), second.generation());
    }

    #[test]
    fn latest_request_wins_over_late_finisher() {
        let store = HistoryStore::new();
        let older = store.begin_load();
        let newer = store.begin_load();

        assert!(store.commit(newer, vec![record("newer")]));
        assert!(!store.commit(older, vec![record("older")]));
        assert_eq!(store.records()[0].display_name(), "newer");
    }

    #[test]
    fn stale_ticket_cannot_commit_before_newer_finishes() {
        let store = HistoryStore::new();
        let older = store.begin_load();
        let _newer = store.begin_load();
        assert!(!store.commit(older, vec![record("older")]));
        assert!(store.records().is_empty());
    }

    #[test]
    fn failed_newer_load_lets_older_load_commit() {
        let store = HistoryStore::new();
        let older = store.begin_load();
        let newer = store.begin_load();

        store.abandon(newer);
        assert!(store.commit(older, vec![record("older")]));
        assert_eq!(store.records()[0].display_name(), "older");
        assert_eq!(store.generation(), older.generation());
    }

    #[test]
    fn abandoned_ticket_cannot_commit() {
        let store = HistoryStore::new();
        let ticket = store.begin_load();
        store.abandon(ticket);
        assert!(!store.commit(ticket, vec![record("late")]));
        assert!(store.records().is_empty());
    }

    #[test]
    fn ticket_cannot_commit_twice() {
        let store = HistoryStore::new();
        let ticket = store.begin_load();
        assert!(store.commit(ticket, vec![record("a")]));
        assert!(!store.commit(ticket, vec![record("b")]));
        assert_eq!(store.records()[0].display_name(), "a");
    }

    #[test]
    fn held_snapshot_survives_reload() {
        let store = HistoryStore::new();
        let t1 = store.begin_load();
        store.commit(t1, vec![record("old")]);
        let held = store.records();
        let t2 = store.begin_load();
        store.commit(t2, vec![]);
        assert_eq!(held.len(), 1);
        assert!(store.records().is_empty());
    }

    #[tokio::test]
    async fn reload_applies_file_source() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(
            br#"[{"startTime":"2024-01-01T08:00:00Z","endTime":"2024-01-01T09:00:00Z",
                 "visit":{"topCandidate":{"placeLocation":"geo:1,2","semanticType":"Home"}}}]"#,
        )
        .expect("write");
        let store = HistoryStore::new();
        let outcome = store
            .reload(&test_client(), &HistorySource::File(file.path().to_path_buf()))
            .await
            .expect("reload");
        assert_eq!(
            outcome,
            ReloadOutcome::Applied {
                generation: 1,
                count: 1
            }
        );
        assert_eq!(store.records()[0].display_name(), "Home");
    }

    #[tokio::test]
    async fn failed_reload_keeps_previous_dataset() {
        let store = HistoryStore::new();
        let ticket = store.begin_load();
        store.commit(ticket, vec![record("kept")]);

        let dir = tempfile::tempdir().expect("temp dir");
        let result = store
            .reload(
                &test_client(),
                &HistorySource::File(dir.path().join("missing.json")),
            )
            .await;
        assert!(matches!(result, Err(HistoryError::Io { .. })));
        assert_eq!(store.records()[0].display_name(), "kept");
        assert_eq!(store.generation(), 1);
    }

    #[tokio::test]
    async fn failed_reload_releases_its_claim() {
        let store = HistoryStore::new();
        let in_flight = store.begin_load();

        let dir = tempfile::tempdir().expect("temp dir");
        let result = store
            .reload(
                &test_client(),
                &HistorySource::File(dir.path().join("missing.json")),
            )
            .await;
        assert!(result.is_err());

        assert!(store.commit(in_flight, vec![record("fresh")]));
        assert_eq!(store.records()[0].display_name(), "fresh");
    }
}
