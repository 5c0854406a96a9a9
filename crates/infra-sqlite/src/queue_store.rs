// SQLite QueueStore Implementation

use async_trait::async_trait;
use sqlx::SqlitePool;
use std::sync::Arc;
use tracing::debug;
use waitline_core::domain::{decode_document, encode_document, Store};
use waitline_core::error::{AppError, Result};
use waitline_core::port::{QueueStore, TimeProvider};

/// Row holding the whole Store
const DOCUMENT_NAME: &str = "queues";

// Helper to convert sqlx::Error to AppError with structured information
pub(crate) fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            // SQLite error codes: https://www.sqlite.org/rescode.html
            match db_err.code().as_deref() {
                Some("5") => AppError::StoreUnavailable(format!(
                    "Database locked (SQLITE_BUSY): {}",
                    db_err.message()
                )),
                Some("13") => {
                    AppError::StoreUnavailable(format!("Database full: {}", db_err.message()))
                }
                Some(code) => AppError::StoreUnavailable(format!(
                    "Database error [{}]: {}",
                    code,
                    db_err.message()
                )),
                None => {
                    AppError::StoreUnavailable(format!("Database error: {}", db_err.message()))
                }
            }
        }
        // Connection, pool, protocol errors
        _ => AppError::StoreUnavailable(err.to_string()),
    }
}

/// Keeps the encoded Store in a single `queue_documents` row
pub struct SqliteQueueStore {
    pool: SqlitePool,
    time_provider: Arc<dyn TimeProvider>,
}

impl SqliteQueueStore {
    pub fn new(pool: SqlitePool, time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            pool,
            time_provider,
        }
    }
}

#[async_trait]
impl QueueStore for SqliteQueueStore {
    async fn load(&self) -> Result<Store> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM queue_documents WHERE name = ?")
                .bind(DOCUMENT_NAME)
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        let store = match body {
            Some(body) => decode_document(&body, self.time_provider.now_millis())?,
            None => Store::new(),
        };

        debug!(queues = store.len(), "Loaded queue document");
        Ok(store)
    }

    async fn save(&self, store: &Store) -> Result<()> {
        let body = encode_document(store)?;
        let now = self.time_provider.now_millis();

        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO queue_documents (name, body, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(name) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at
            "#,
        )
        .bind(DOCUMENT_NAME)
        .bind(&body)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(queues = store.len(), bytes = body.len(), "Saved queue document");
        Ok(())
    }
}
