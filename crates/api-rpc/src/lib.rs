//! JSON-RPC API Layer
//!
//! Exposes the queue operations over JSON-RPC 2.0 (HTTP).

pub mod error;
pub mod handler;
pub mod server;
pub mod types;

pub use server::{RpcServer, RpcServerConfig, RunningServer};
