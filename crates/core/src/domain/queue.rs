// Queue Domain Model

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};

/// Queue identifier (8 hex characters, opaque to callers)
pub type QueueId = String;

/// Instant in epoch milliseconds
pub type Timestamp = i64;

/// Number of service intervals kept per queue
pub const SERVICE_HISTORY_CAPACITY: usize = 3;

/// Most recent observed service intervals in seconds, oldest first.
///
/// Never holds more than [`SERVICE_HISTORY_CAPACITY`] samples; recording a new
/// sample evicts the oldest ones beyond the capacity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServiceHistory(Vec<f64>);

impl ServiceHistory {
    pub fn new() -> Self {
        Self(Vec::with_capacity(SERVICE_HISTORY_CAPACITY))
    }

    /// Build a history from samples, keeping only the most recent ones
    pub fn from_samples(samples: impl IntoIterator<Item = f64>) -> Self {
        let mut history = Self::new();
        for sample in samples {
            history.record(sample);
        }
        history
    }

    /// Append a service interval, evicting the oldest beyond capacity
    pub fn record(&mut self, secs: f64) {
        self.0.push(secs);
        if self.0.len() > SERVICE_HISTORY_CAPACITY {
            let excess = self.0.len() - SERVICE_HISTORY_CAPACITY;
            self.0.drain(..excess);
        }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Arithmetic mean of the samples, `None` when empty
    pub fn mean(&self) -> Option<f64> {
        if self.0.is_empty() {
            return None;
        }
        Some(self.0.iter().sum::<f64>() / self.0.len() as f64)
    }
}

/// One waiting queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueueRecord {
    pub id: QueueId,
    pub created_at: Timestamp,

    /// FIFO order, head is served next
    pub users: VecDeque<String>,

    pub service_history: ServiceHistory,

    /// Instant of the most recent call-next (creation time if never called)
    pub last_call_time: Timestamp,
}

impl QueueRecord {
    /// Create an empty queue
    ///
    /// # Arguments
    ///
    /// * `id` - Queue ID (injected, not generated)
    /// * `now_millis` - Creation timestamp (injected, not system time)
    pub fn new(id: impl Into<String>, now_millis: Timestamp) -> Self {
        Self {
            id: id.into(),
            created_at: now_millis,
            users: VecDeque::new(),
            service_history: ServiceHistory::new(),
            last_call_time: now_millis,
        }
    }

    /// Append to the tail, returning the 1-based position taken
    pub fn enqueue(&mut self, name: impl Into<String>) -> usize {
        self.users.push_back(name.into());
        self.users.len()
    }

    /// Serve the head of the queue.
    ///
    /// When someone is removed, the interval since the previous call is
    /// recorded as a service sample. The call instant is stamped either way so
    /// the next interval is measured from here. `last_call_time` never moves
    /// backwards, even if the clock does.
    pub fn call_next(&mut self, now_millis: Timestamp) -> Option<String> {
        let now_millis = now_millis.max(self.last_call_time);
        let removed = self.users.pop_front();

        if removed.is_some() {
            let elapsed_ms = now_millis.saturating_sub(self.last_call_time).max(0);
            self.service_history.record(elapsed_ms as f64 / 1000.0);
        }

        self.last_call_time = now_millis;
        removed
    }

    /// Drop everyone waiting; history and last call time are kept
    pub fn clear(&mut self) {
        self.users.clear();
    }

    pub fn waiting(&self) -> usize {
        self.users.len()
    }
}

/// All queues, keyed by ID. No ordering across keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    queues: HashMap<QueueId, QueueRecord>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &str) -> Option<&QueueRecord> {
        self.queues.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut QueueRecord> {
        self.queues.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.queues.contains_key(id)
    }

    /// Insert a record under its own ID, replacing any previous one
    pub fn insert(&mut self, record: QueueRecord) {
        self.queues.insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.queues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = &QueueRecord> {
        self.queues.values()
    }
}

impl FromIterator<QueueRecord> for Store {
    fn from_iter<I: IntoIterator<Item = QueueRecord>>(iter: I) -> Self {
        let mut store = Store::new();
        for record in iter {
            store.insert(record);
        }
        store
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_empty() {
        let record = QueueRecord::new("ab12cd34", 1_000);
        assert_eq!(record.created_at, 1_000);
        assert_eq!(record.last_call_time, 1_000);
        assert!(record.users.is_empty());
        assert!(record.service_history.is_empty());
    }

    #[test]
    fn test_enqueue_preserves_fifo_order() {
        let mut record = QueueRecord::new("q", 0);
        assert_eq!(record.enqueue("Alice"), 1);
        assert_eq!(record.enqueue("Bob"), 2);
        assert_eq!(record.enqueue("Carol"), 3);

        assert_eq!(record.call_next(1_000).as_deref(), Some("Alice"));
        assert_eq!(record.call_next(2_000).as_deref(), Some("Bob"));
        assert_eq!(record.users, VecDeque::from(vec!["Carol".to_string()]));
    }

    #[test]
    fn test_call_next_records_service_interval() {
        let mut record = QueueRecord::new("q", 10_000);
        record.enqueue("Alice");

        let removed = record.call_next(25_500);

        assert_eq!(removed.as_deref(), Some("Alice"));
        assert_eq!(record.service_history.as_slice(), &[15.5]);
        assert_eq!(record.last_call_time, 25_500);
    }

    #[test]
    fn test_call_next_on_empty_queue_only_stamps_time() {
        let mut record = QueueRecord::new("q", 0);

        assert_eq!(record.call_next(60_000), None);
        assert!(record.service_history.is_empty());
        assert_eq!(record.last_call_time, 60_000);

        // Next interval is measured from the empty call, not from creation
        record.enqueue("Alice");
        record.call_next(65_000);
        assert_eq!(record.service_history.as_slice(), &[5.0]);
    }

    #[test]
    fn test_call_next_never_moves_last_call_time_backwards() {
        let mut record = QueueRecord::new("q", 50_000);
        record.enqueue("Alice");

        record.call_next(40_000);

        assert_eq!(record.last_call_time, 50_000);
        assert_eq!(record.service_history.as_slice(), &[0.0]);
    }

    #[test]
    fn test_call_next_saturates_on_extreme_last_call_time() {
        let mut record = QueueRecord::new("q", 0);
        record.last_call_time = i64::MIN;
        record.enqueue("Alice");

        assert_eq!(record.call_next(1_700_000_000_000).as_deref(), Some("Alice"));

        let sample = record.service_history.as_slice()[0];
        assert!(sample >= 0.0);
        assert_eq!(record.last_call_time, 1_700_000_000_000);
    }

    #[test]
    fn test_service_history_keeps_three_most_recent() {
        let mut history = ServiceHistory::new();
        for secs in [1.0, 2.0, 3.0, 4.0, 5.0] {
            history.record(secs);
            assert!(history.len() <= SERVICE_HISTORY_CAPACITY);
        }
        assert_eq!(history.as_slice(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_service_history_from_samples_truncates() {
        let history = ServiceHistory::from_samples(vec![9.0, 8.0, 7.0, 6.0]);
        assert_eq!(history.as_slice(), &[8.0, 7.0, 6.0]);
    }

    #[test]
    fn test_service_history_mean() {
        assert_eq!(ServiceHistory::new().mean(), None);
        let history = ServiceHistory::from_samples(vec![3.0, 6.0, 12.0]);
        assert_eq!(history.mean(), Some(7.0));
    }

    #[test]
    fn test_clear_keeps_history_and_call_time() {
        let mut record = QueueRecord::new("q", 0);
        record.enqueue("Alice");
        record.enqueue("Bob");
        record.call_next(4_000);

        record.clear();

        assert!(record.users.is_empty());
        assert_eq!(record.service_history.as_slice(), &[4.0]);
        assert_eq!(record.last_call_time, 4_000);
    }

    #[test]
    fn test_store_insert_and_lookup() {
        let mut store = Store::new();
        store.insert(QueueRecord::new("aaaa0001", 0));
        store.insert(QueueRecord::new("aaaa0002", 0));

        assert_eq!(store.len(), 2);
        assert!(store.contains("aaaa0001"));
        assert!(store.get("missing").is_none());

        store.get_mut("aaaa0002").unwrap().enqueue("Alice");
        assert_eq!(store.get("aaaa0002").unwrap().waiting(), 1);
    }
}
