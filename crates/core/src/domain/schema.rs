// Persisted Document Schema
//
// The whole Store is persisted as one JSON object keyed by queue ID. Instants
// are stored as epoch seconds (f64) so documents written by earlier releases,
// which only carried `created` and `users`, still load.

use crate::domain::queue::{QueueId, QueueRecord, ServiceHistory, Store, Timestamp};
use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// One queue as it appears in the persisted document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredQueue {
    #[serde(default)]
    pub created: Option<f64>,

    #[serde(default)]
    pub users: Vec<String>,

    #[serde(default)]
    pub service_history: Option<Vec<f64>>,

    #[serde(default)]
    pub last_call_time: Option<f64>,
}

/// The persisted document, keys in sorted order
pub type QueueDocument = BTreeMap<QueueId, StoredQueue>;

/// Latest instant a document may carry (9999-12-31T23:59:59Z)
const MAX_EPOCH_SECS: f64 = 253_402_300_799.0;

fn secs_to_millis(secs: f64) -> Timestamp {
    (secs * 1000.0).round() as Timestamp
}

fn millis_to_secs(millis: Timestamp) -> f64 {
    millis as f64 / 1000.0
}

/// Bring a document up to the current record shape.
///
/// Pure and idempotent: records missing `service_history` get an empty one,
/// records missing `last_call_time` (or `created`) get `now_millis`, and
/// over-long histories keep only their most recent samples.
pub fn upgrade(document: QueueDocument, now_millis: Timestamp) -> Store {
    document
        .into_iter()
        .map(|(id, stored)| {
            let created_at = stored.created.map(secs_to_millis).unwrap_or(now_millis);
            QueueRecord {
                id,
                created_at,
                users: VecDeque::from(stored.users),
                service_history: ServiceHistory::from_samples(
                    stored.service_history.unwrap_or_default(),
                ),
                last_call_time: stored
                    .last_call_time
                    .map(secs_to_millis)
                    .unwrap_or(now_millis),
            }
        })
        .collect()
}

/// Inverse of [`upgrade`] for a fully populated Store
pub fn to_document(store: &Store) -> QueueDocument {
    store
        .records()
        .map(|record| {
            (
                record.id.clone(),
                StoredQueue {
                    created: Some(millis_to_secs(record.created_at)),
                    users: record.users.iter().cloned().collect(),
                    service_history: Some(record.service_history.as_slice().to_vec()),
                    last_call_time: Some(millis_to_secs(record.last_call_time)),
                },
            )
        })
        .collect()
}

fn check_range(id: &str, field: &str, secs: f64) -> Result<()> {
    if (0.0..=MAX_EPOCH_SECS).contains(&secs) {
        return Ok(());
    }
    Err(AppError::StoreUnavailable(format!(
        "Queue {} has out-of-range {}: {}",
        id, field, secs
    )))
}

/// Reject instants and samples that cannot come from a real clock
fn validate(document: &QueueDocument) -> Result<()> {
    for (id, stored) in document {
        if let Some(created) = stored.created {
            check_range(id, "created", created)?;
        }
        if let Some(last_call_time) = stored.last_call_time {
            check_range(id, "last_call_time", last_call_time)?;
        }
        for sample in stored.service_history.iter().flatten() {
            check_range(id, "service_history sample", *sample)?;
        }
    }
    Ok(())
}

/// Parse document text and upgrade it. Blank text is an empty Store.
///
/// A document that parses but carries out-of-range times is rejected as
/// `StoreUnavailable` like any other unreadable document.
pub fn decode_document(text: &str, now_millis: Timestamp) -> Result<Store> {
    if text.trim().is_empty() {
        return Ok(Store::new());
    }
    let document: QueueDocument = serde_json::from_str(text)?;
    validate(&document)?;
    Ok(upgrade(document, now_millis))
}

/// Serialize the whole Store
pub fn encode_document(store: &Store) -> Result<String> {
    Ok(serde_json::to_string(&to_document(store))?)
}
