// Application Layer - Use Cases and Business Logic

pub mod estimator;
pub mod queue_service;

// Re-exports
pub use estimator::{TrailingMeanEstimator, WaitEstimator, DEFAULT_SERVICE_SECS};
pub use queue_service::{JoinTicket, QueueService, QueueSnapshot, StoreStats};
