//! Daemon configuration from `WAITLINE_*` environment variables

use anyhow::{bail, Context, Result};
use std::path::PathBuf;
use waitline_core::application::DEFAULT_SERVICE_SECS;

const DEFAULT_DB_PATH: &str = "~/.waitline/queues.db";
const DEFAULT_DATA_FILE: &str = "~/.waitline/queues.json";
const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// Which durable store backs the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Sqlite { db_path: PathBuf },
    JsonFile { path: PathBuf },
    /// Lost on exit
    Memory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct DaemonConfig {
    pub store: StoreBackend,
    pub rpc_host: String,
    pub rpc_port: u16,
    pub public_url: Option<String>,
    pub default_service_secs: f64,
    pub log_format: LogFormat,
    /// Daily rolling log files go here when set
    pub log_dir: Option<PathBuf>,
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl DaemonConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let store = match var("WAITLINE_STORE").as_deref().unwrap_or("sqlite") {
            "sqlite" => StoreBackend::Sqlite {
                db_path: expand(var("WAITLINE_DB_PATH").as_deref().unwrap_or(DEFAULT_DB_PATH)),
            },
            "json" => StoreBackend::JsonFile {
                path: expand(
                    var("WAITLINE_DATA_FILE")
                        .as_deref()
                        .unwrap_or(DEFAULT_DATA_FILE),
                ),
            },
            "memory" => StoreBackend::Memory,
            other => bail!(
                "WAITLINE_STORE must be one of sqlite, json, memory (got {:?})",
                other
            ),
        };

        let rpc_port = match var("WAITLINE_RPC_PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("WAITLINE_RPC_PORT is not a valid port: {:?}", port))?,
            None => DEFAULT_RPC_PORT,
        };

        let default_service_secs = match var("WAITLINE_DEFAULT_SERVICE_SECS") {
            Some(secs) => {
                let secs: f64 = secs.parse().with_context(|| {
                    format!("WAITLINE_DEFAULT_SERVICE_SECS is not a number: {:?}", secs)
                })?;
                if !secs.is_finite() || secs < 0.0 {
                    bail!("WAITLINE_DEFAULT_SERVICE_SECS must be non-negative");
                }
                secs
            }
            None => DEFAULT_SERVICE_SECS,
        };

        let log_format = match var("WAITLINE_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        };

        Ok(Self {
            store,
            rpc_host: var("WAITLINE_RPC_HOST").unwrap_or_else(|| DEFAULT_RPC_HOST.to_string()),
            rpc_port,
            public_url: var("WAITLINE_PUBLIC_URL"),
            default_service_secs,
            log_format,
            log_dir: var("WAITLINE_LOG_DIR").map(|dir| expand(&dir)),
        })
    }
}
