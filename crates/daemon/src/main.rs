//! Waitline - Main Entry Point
//!
//! Composition root: reads configuration, picks the durable store, wires the
//! queue service and serves it over JSON-RPC until Ctrl+C.

mod config;

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::info;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use config::{DaemonConfig, LogFormat, StoreBackend};
use waitline_api_rpc::{RpcServer, RpcServerConfig};
use waitline_core::application::{QueueService, TrailingMeanEstimator};
use waitline_core::port::id_provider::UuidProvider;
use waitline_core::port::time_provider::SystemTimeProvider;
use waitline_core::port::{MemoryQueueStore, QueueStore, TimeProvider};
use waitline_infra_file::JsonFileStore;
use waitline_infra_sqlite::{create_pool, run_migrations, SqliteQueueStore};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_tracing(config: &DaemonConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("waitline=info"));

    let console = match config.log_format {
        // Production: JSON structured logging
        LogFormat::Json => fmt::layer().json().boxed(),
        // Development: Pretty formatting with colors
        LogFormat::Pretty => fmt::layer().pretty().boxed(),
    };

    let file = match &config.log_dir {
        Some(log_dir) => {
            std::fs::create_dir_all(log_dir)
                .with_context(|| format!("Failed to create log dir {}", log_dir.display()))?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("waitline")
                .filename_suffix("log")
                .build(log_dir)
                .context("Failed to create log file appender")?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);

            // Flushes on drop, so it must outlive main
            static GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
                std::sync::OnceLock::new();
            let _ = GUARD.set(guard);

            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console)
        .with(file)
        .init();

    Ok(())
}

async fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    Ok(())
}

async fn open_store(
    backend: &StoreBackend,
    time_provider: Arc<dyn TimeProvider>,
) -> Result<Arc<dyn QueueStore>> {
    match backend {
        StoreBackend::Sqlite { db_path } => {
            info!(db_path = %db_path.display(), "Initializing database...");
            ensure_parent_dir(db_path).await?;
            let db_path = db_path
                .to_str()
                .with_context(|| format!("Database path is not UTF-8: {}", db_path.display()))?;

            let pool = create_pool(db_path).await.context("DB pool creation failed")?;
            run_migrations(&pool).await.context("Migration failed")?;
            Ok(Arc::new(SqliteQueueStore::new(pool, time_provider)))
        }
        StoreBackend::JsonFile { path } => {
            info!(path = %path.display(), "Using JSON document store");
            let store = JsonFileStore::new(path.clone(), time_provider)
                .await
                .context("JSON store setup failed")?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; queues are lost on exit");
            Ok(Arc::new(MemoryQueueStore::new(time_provider)))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Configuration + logging
    let config = DaemonConfig::from_env()?;
    init_tracing(&config)?;

    info!("Waitline v{} starting...", VERSION);

    // 2. Durable store
    let time_provider: Arc<dyn TimeProvider> = Arc::new(SystemTimeProvider);
    let store = open_store(&config.store, time_provider.clone()).await?;

    // 3. Setup dependencies (DI wiring)
    let estimator = Arc::new(TrailingMeanEstimator::new(config.default_service_secs));
    let service = Arc::new(
        QueueService::new(store, Arc::new(UuidProvider), time_provider).with_estimator(estimator),
    );

    // 4. Start JSON-RPC server
    let rpc_config = RpcServerConfig {
        host: config.rpc_host.clone(),
        port: config.rpc_port,
        public_url: config.public_url.clone(),
    };
    let running = RpcServer::new(rpc_config, service)
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("RPC server start failed: {}", e))?;

    info!(addr = %running.addr, "System ready. Press Ctrl+C to shutdown");

    // 5. Wait for shutdown signal
    tokio::signal::ctrl_c().await?;

    info!("Shutdown signal received. Exiting gracefully...");

    running
        .handle
        .stop()
        .map_err(|e| anyhow::anyhow!("RPC server stop failed: {}", e))?;
    running.handle.stopped().await;

    info!("Shutdown complete.");

    Ok(())
}
