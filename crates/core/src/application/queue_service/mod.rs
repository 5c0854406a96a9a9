// Queue Service - keyed queue records behind one store-wide gate
//
// Every operation runs its whole load -> decide -> save cycle while holding
// the gate, so concurrent callers only ever see whole snapshots and no
// update is lost between a load and the following save.

use crate::application::estimator::{TrailingMeanEstimator, WaitEstimator};
use crate::domain::{QueueId, QueueRecord, Store, Timestamp};
use crate::error::{AppError, Result};
use crate::port::{IdProvider, QueueStore, TimeProvider};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Result of joining a queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinTicket {
    pub name: String,
    /// 1-based position right after joining
    pub position: usize,
}

/// Read-only view of one queue
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueSnapshot {
    pub queue_id: QueueId,
    pub created_at: Timestamp,
    pub users: Vec<String>,
    /// Projected wait for someone joining now
    pub estimated_wait_secs: f64,
    pub average_service_secs: f64,
}

/// Aggregate counts across all queues
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub queue_count: usize,
    pub waiting_total: usize,
}

/// Queue State Manager
pub struct QueueService {
    store: Arc<dyn QueueStore>,
    id_provider: Arc<dyn IdProvider>,
    time_provider: Arc<dyn TimeProvider>,
    estimator: Arc<dyn WaitEstimator>,
    gate: Mutex<()>,
}

/// Trimmed name, or `None` when absent or blank
fn normalize_name(name: Option<&str>) -> Option<String> {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .map(str::to_string)
}

impl QueueService {
    pub fn new(
        store: Arc<dyn QueueStore>,
        id_provider: Arc<dyn IdProvider>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            store,
            id_provider,
            time_provider,
            estimator: Arc::new(TrailingMeanEstimator::default()),
            gate: Mutex::new(()),
        }
    }

    /// Replace the wait estimation strategy
    pub fn with_estimator(mut self, estimator: Arc<dyn WaitEstimator>) -> Self {
        self.estimator = estimator;
        self
    }

    /// Create an empty queue and return its new ID
    pub async fn create(&self) -> Result<QueueId> {
        let _gate = self.gate.lock().await;
        let mut store = self.load().await?;

        let mut queue_id = self.id_provider.queue_id();
        while store.contains(&queue_id) {
            debug!(queue_id = %queue_id, "Queue ID collision, regenerating");
            queue_id = self.id_provider.queue_id();
        }

        let now = self.time_provider.now_millis();
        store.insert(QueueRecord::new(queue_id.clone(), now));
        self.save(&store).await?;

        info!(queue_id = %queue_id, "Queue created");
        Ok(queue_id)
    }

    /// Append to the tail, generating a placeholder name when none is given
    pub async fn join(&self, queue_id: &str, name: Option<&str>) -> Result<JoinTicket> {
        let name = normalize_name(name).unwrap_or_else(|| self.id_provider.guest_name());

        let ticket = self
            .mutate(queue_id, move |record, _now| {
                let position = record.enqueue(name.clone());
                JoinTicket { name, position }
            })
            .await?;

        debug!(queue_id = %queue_id, name = %ticket.name, position = ticket.position, "Joined queue");
        Ok(ticket)
    }

    /// Append a caller-named entry to the tail
    pub async fn add(&self, queue_id: &str, name: Option<&str>) -> Result<()> {
        let name = normalize_name(name).ok_or(AppError::MissingName)?;

        let position = self
            .mutate(queue_id, move |record, _now| record.enqueue(name))
            .await?;

        debug!(queue_id = %queue_id, position, "Added to queue");
        Ok(())
    }

    /// Serve the head of the queue, returning who was removed (if anyone)
    pub async fn call_next(&self, queue_id: &str) -> Result<Option<String>> {
        let (removed, history_len) = self
            .mutate(queue_id, |record, now| {
                let removed = record.call_next(now);
                (removed, record.service_history.len())
            })
            .await?;

        info!(
            queue_id = %queue_id,
            removed = ?removed,
            history_len,
            "Called next"
        );
        Ok(removed)
    }

    /// Empty the queue; service history and last call time are kept
    pub async fn clear(&self, queue_id: &str) -> Result<()> {
        let cleared = self
            .mutate(queue_id, |record, _now| {
                let waiting = record.waiting();
                record.clear();
                waiting
            })
            .await?;

        info!(queue_id = %queue_id, cleared, "Queue cleared");
        Ok(())
    }

    /// Current users and the estimated wait for a new joiner
    pub async fn read(&self, queue_id: &str) -> Result<QueueSnapshot> {
        let _gate = self.gate.lock().await;
        let store = self.load().await?;
        let record = store
            .get(queue_id)
            .ok_or_else(|| AppError::NotFound(queue_id.to_string()))?;

        let snapshot = QueueSnapshot {
            queue_id: record.id.clone(),
            created_at: record.created_at,
            users: record.users.iter().cloned().collect(),
            estimated_wait_secs: self
                .estimator
                .estimate_wait_secs(record.waiting(), &record.service_history),
            average_service_secs: self.estimator.average_service_secs(&record.service_history),
        };

        debug!(queue_id = %queue_id, waiting = snapshot.users.len(), "Read queue");
        Ok(snapshot)
    }

    /// Queue and waiting-user totals
    pub async fn stats(&self) -> Result<StoreStats> {
        let _gate = self.gate.lock().await;
        let store = self.load().await?;

        Ok(StoreStats {
            queue_count: store.len(),
            waiting_total: store.records().map(QueueRecord::waiting).sum(),
        })
    }

    /// Run `op` against one record inside a full gated load/save cycle.
    /// An unknown ID fails before anything is saved.
    async fn mutate<T, F>(&self, queue_id: &str, op: F) -> Result<T>
    where
        F: FnOnce(&mut QueueRecord, Timestamp) -> T + Send,
        T: Send,
    {
        let _gate = self.gate.lock().await;
        let mut store = self.load().await?;

        let now = self.time_provider.now_millis();
        let record = store
            .get_mut(queue_id)
            .ok_or_else(|| AppError::NotFound(queue_id.to_string()))?;
        let outcome = op(record, now);

        self.save(&store).await?;
        Ok(outcome)
    }

    async fn load(&self) -> Result<Store> {
        self.store.load().await.inspect_err(|e| {
            warn!(error = %e, "Failed to load queue store");
        })
    }

    async fn save(&self, store: &Store) -> Result<()> {
        self.store.save(store).await.inspect_err(|e| {
            warn!(error = %e, "Failed to save queue store");
        })
    }
}
