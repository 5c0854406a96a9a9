// ID Provider Port (for deterministic testing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Length of a queue ID in hex characters
pub const QUEUE_ID_LEN: usize = 8;

/// Length of the random suffix in placeholder names
const GUEST_SUFFIX_LEN: usize = 6;

/// ID provider interface (allows deterministic IDs in tests)
pub trait IdProvider: Send + Sync {
    /// Generate a new queue ID candidate
    fn queue_id(&self) -> String;

    /// Generate a display name for someone who joined without one.
    /// Unique enough for display, not guaranteed globally unique.
    fn guest_name(&self) -> String;
}

/// UUID v4 provider (production)
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn queue_id(&self) -> String {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(QUEUE_ID_LEN);
        id
    }

    fn guest_name(&self) -> String {
        let mut suffix = uuid::Uuid::new_v4().to_string();
        suffix.truncate(GUEST_SUFFIX_LEN);
        format!("User_{}", suffix)
    }
}

/// Counter-based provider: `00000001`, `00000002`, ... and `User_000001`, ...
#[derive(Debug)]
pub struct SequenceIdProvider {
    next_queue: AtomicU64,
    next_guest: AtomicU64,
}

impl SequenceIdProvider {
    pub fn new() -> Self {
        Self {
            next_queue: AtomicU64::new(1),
            next_guest: AtomicU64::new(1),
        }
    }
}

impl Default for SequenceIdProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl IdProvider for SequenceIdProvider {
    fn queue_id(&self) -> String {
        let n = self.next_queue.fetch_add(1, Ordering::SeqCst);
        format!("{:08x}", n)
    }

    fn guest_name(&self) -> String {
        let n = self.next_guest.fetch_add(1, Ordering::SeqCst);
        format!("User_{:06x}", n)
    }
}
