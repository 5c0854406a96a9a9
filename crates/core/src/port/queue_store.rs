// Queue Store Port (Durable Store interface)

use crate::domain::{decode_document, encode_document, Store};
use crate::error::{AppError, Result};
use crate::port::TimeProvider;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Whole-document persistence for the Store.
///
/// Implementations keep no cache between calls: every `load` reads the
/// backing medium again. Callers are responsible for serializing
/// load/mutate/save cycles; a store only guarantees that each call moves the
/// document as a unit.
#[async_trait]
pub trait QueueStore: Send + Sync {
    /// Read and upgrade the persisted document (empty Store if none yet)
    async fn load(&self) -> Result<Store>;

    /// Overwrite the persisted document in full
    async fn save(&self, store: &Store) -> Result<()>;
}

/// Store backed by an encoded document held in process memory.
///
/// Only the serialized text is kept, so each load decodes (and upgrades) it
/// exactly like a file or database would. Used as the ephemeral backend and
/// in tests, where it can be switched unavailable.
pub struct MemoryQueueStore {
    document: Mutex<String>,
    time_provider: Arc<dyn TimeProvider>,
    unavailable: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryQueueStore {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self::with_document(String::new(), time_provider)
    }

    /// Start from existing document text (e.g. a legacy document)
    pub fn with_document(document: impl Into<String>, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            document: Mutex::new(document.into()),
            time_provider,
            unavailable: AtomicBool::new(false),
            saves: AtomicUsize::new(0),
        }
    }

    /// Make every subsequent load/save fail with `StoreUnavailable`
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Current document text
    pub fn document(&self) -> Result<String> {
        Ok(self.lock_document()?.clone())
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn check_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::StoreUnavailable(
                "memory store switched unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn lock_document(&self) -> Result<std::sync::MutexGuard<'_, String>> {
        self.document
            .lock()
            .map_err(|e| AppError::StoreUnavailable(format!("memory store poisoned: {}", e)))
    }
}

#[async_trait]
impl QueueStore for MemoryQueueStore {
    async fn load(&self) -> Result<Store> {
        self.check_available()?;
        let text = self.lock_document()?.clone();
        decode_document(&text, self.time_provider.now_millis())
    }

    async fn save(&self, store: &Store) -> Result<()> {
        self.check_available()?;
        let text = encode_document(store)?;
        *self.lock_document()? = text;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
