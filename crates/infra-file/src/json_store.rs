//! JSON file QueueStore.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, warn};
use waitline_core::domain::{decode_document, encode_document, Store};
use waitline_core::error::Result;
use waitline_core::port::{QueueStore, TimeProvider};

/// File-backed store holding the entire document in a single file.
///
/// Saves go to a sibling `.tmp` file which is then renamed over the target,
/// so the file on disk is always either the previous or the new document.
pub struct JsonFileStore {
    path: PathBuf,
    time_provider: Arc<dyn TimeProvider>,
}

impl JsonFileStore {
    /// Create a store at `path`, creating its parent directory if needed.
    /// The file itself is created on first save.
    pub async fn new(path: impl Into<PathBuf>, time_provider: Arc<dyn TimeProvider>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        debug!("JsonFileStore initialized at {:?}", path);

        Ok(Self {
            path,
            time_provider,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `bytes` to `temp_path`, flush it to disk, then rename it over
    /// the target and flush the directory entry.
    async fn replace_with(&self, temp_path: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::File::create(temp_path).await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        drop(file);

        fs::rename(temp_path, &self.path).await?;
        self.sync_parent_dir().await;
        Ok(())
    }

    /// Persist the rename. Not every platform can open a directory, so
    /// failures are only logged.
    async fn sync_parent_dir(&self) {
        let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) else {
            return;
        };
        let synced = match fs::File::open(parent).await {
            Ok(dir) => dir.sync_all().await,
            Err(e) => Err(e),
        };
        if let Err(e) = synced {
            debug!(error = %e, "Could not sync directory {:?}", parent);
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl QueueStore for JsonFileStore {
    async fn load(&self) -> Result<Store> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No queue document at {:?} yet", self.path);
                return Ok(Store::new());
            }
            Err(e) => return Err(e.into()),
        };

        let store = decode_document(&text, self.time_provider.now_millis())?;
        debug!(queues = store.len(), "Loaded queue document from {:?}", self.path);
        Ok(store)
    }

    async fn save(&self, store: &Store) -> Result<()> {
        let text = encode_document(store)?;
        let temp_path = self.temp_path();

        if let Err(e) = self.replace_with(&temp_path, text.as_bytes()).await {
            // Best effort: the previous document is still intact
            let _ = fs::remove_file(&temp_path).await;
            warn!(error = %e, "Failed to replace queue document at {:?}", self.path);
            return Err(e.into());
        }

        debug!(queues = store.len(), "Saved queue document to {:?}", self.path);
        Ok(())
    }
}
