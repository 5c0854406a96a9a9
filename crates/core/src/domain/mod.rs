// Domain Layer - Pure business logic and entities

pub mod queue;
pub mod schema;

// Re-exports
pub use queue::{
    QueueId, QueueRecord, ServiceHistory, Store, Timestamp, SERVICE_HISTORY_CAPACITY,
};
pub use schema::{decode_document, encode_document, upgrade, QueueDocument, StoredQueue};
