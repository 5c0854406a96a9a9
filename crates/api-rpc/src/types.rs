//! RPC Request/Response Types
//!
//! Defines the JSON-RPC method parameters and results.

use serde::{Deserialize, Serialize};

/// queue.create.v1 - Create a queue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateResponse {
    pub queue_id: String,
    /// Shareable link, present when a public base URL is configured
    #[serde(skip_serializing_if = "Option::is_none")]
    pub queue_url: Option<String>,
}

/// queue.join.v1 - Join a queue (name optional)
#[derive(Debug, Deserialize)]
pub struct JoinRequest {
    pub queue_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinResponse {
    pub name: String,
    pub position: usize,
}

/// queue.add.v1 - Add a named entry (name required)
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    pub queue_id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Acknowledgment for add and clear
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

/// queue.next.v1, queue.clear.v1, queue.read.v1 - Address one queue
#[derive(Debug, Deserialize)]
pub struct QueueRequest {
    pub queue_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NextResponse {
    /// `null` when the queue was already empty
    pub removed: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse {
    pub queue_id: String,
    pub users: Vec<String>,
    pub estimated_wait_secs: f64,
    pub average_service_secs: f64,
    /// Epoch milliseconds
    pub created_at: i64,
}

/// admin.stats.v1 - Get service statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsResponse {
    pub queue_count: usize,
    pub waiting_total: usize,
    pub uptime_seconds: u64,
}
