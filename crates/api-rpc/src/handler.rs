//! RPC Method Handlers
//!
//! Translates each JSON-RPC method into one queue service operation.

use crate::error::to_rpc_error;
use crate::types::{
    AckResponse, AddRequest, CreateResponse, JoinRequest, JoinResponse, NextResponse,
    QueueRequest, ReadResponse, StatsResponse,
};
use jsonrpsee::types::ErrorObjectOwned;
use std::sync::Arc;
use waitline_core::application::QueueService;

/// RPC Handler with injected dependencies
pub struct RpcHandler {
    service: Arc<QueueService>,
    public_url: Option<String>,
    start_time: std::time::Instant,
}

impl RpcHandler {
    pub fn new(service: Arc<QueueService>, public_url: Option<String>) -> Self {
        Self {
            service,
            public_url: public_url.map(|url| url.trim_end_matches('/').to_string()),
            start_time: std::time::Instant::now(),
        }
    }

    /// queue.create.v1
    pub async fn create(&self) -> Result<CreateResponse, ErrorObjectOwned> {
        let queue_id = self.service.create().await.map_err(to_rpc_error)?;
        let queue_url = self
            .public_url
            .as_ref()
            .map(|base| format!("{}/queue/{}", base, queue_id));

        Ok(CreateResponse {
            queue_id,
            queue_url,
        })
    }

    /// queue.join.v1
    pub async fn join(&self, params: JoinRequest) -> Result<JoinResponse, ErrorObjectOwned> {
        let ticket = self
            .service
            .join(&params.queue_id, params.name.as_deref())
            .await
            .map_err(to_rpc_error)?;

        Ok(JoinResponse {
            name: ticket.name,
            position: ticket.position,
        })
    }

    /// queue.add.v1
    pub async fn add(&self, params: AddRequest) -> Result<AckResponse, ErrorObjectOwned> {
        self.service
            .add(&params.queue_id, params.name.as_deref())
            .await
            .map_err(to_rpc_error)?;

        Ok(AckResponse { ok: true })
    }

    /// queue.next.v1
    pub async fn next(&self, params: QueueRequest) -> Result<NextResponse, ErrorObjectOwned> {
        let removed = self
            .service
            .call_next(&params.queue_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(NextResponse { removed })
    }

    /// queue.clear.v1
    pub async fn clear(&self, params: QueueRequest) -> Result<AckResponse, ErrorObjectOwned> {
        self.service
            .clear(&params.queue_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(AckResponse { ok: true })
    }

    /// queue.read.v1
    pub async fn read(&self, params: QueueRequest) -> Result<ReadResponse, ErrorObjectOwned> {
        let snapshot = self
            .service
            .read(&params.queue_id)
            .await
            .map_err(to_rpc_error)?;

        Ok(ReadResponse {
            queue_id: snapshot.queue_id,
            users: snapshot.users,
            estimated_wait_secs: snapshot.estimated_wait_secs,
            average_service_secs: snapshot.average_service_secs,
            created_at: snapshot.created_at,
        })
    }

    /// admin.stats.v1
    pub async fn stats(&self) -> Result<StatsResponse, ErrorObjectOwned> {
        let stats = self.service.stats().await.map_err(to_rpc_error)?;

        Ok(StatsResponse {
            queue_count: stats.queue_count,
            waiting_total: stats.waiting_total,
            uptime_seconds: self.start_time.elapsed().as_secs(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::code;
    use waitline_core::port::id_provider::SequenceIdProvider;
    use waitline_core::port::time_provider::ManualClock;
    use waitline_core::port::MemoryQueueStore;

    fn handler(public_url: Option<&str>) -> (RpcHandler, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(0));
        let service = Arc::new(QueueService::new(
            Arc::new(MemoryQueueStore::new(clock.clone())),
            Arc::new(SequenceIdProvider::new()),
            clock.clone(),
        ));
        (
            RpcHandler::new(service, public_url.map(str::to_string)),
            clock,
        )
    }

    fn queue(queue_id: &str) -> QueueRequest {
        QueueRequest {
            queue_id: queue_id.to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_builds_queue_url() {
        let (handler, _) = handler(Some("https://queues.example.com/"));

        let created = handler.create().await.unwrap();

        assert_eq!(created.queue_id, "00000001");
        assert_eq!(
            created.queue_url.as_deref(),
            Some("https://queues.example.com/queue/00000001")
        );
    }

    #[tokio::test]
    async fn test_create_without_public_url() {
        let (handler, _) = handler(None);
        assert!(handler.create().await.unwrap().queue_url.is_none());
    }

    #[tokio::test]
    async fn test_join_next_read_flow() {
        let (handler, clock) = handler(None);
        let queue_id = handler.create().await.unwrap().queue_id;

        let joined = handler
            .join(JoinRequest {
                queue_id: queue_id.clone(),
                name: Some("Alice".to_string()),
            })
            .await
            .unwrap();
        assert_eq!(joined.position, 1);

        let added = handler
            .add(AddRequest {
                queue_id: queue_id.clone(),
                name: Some("Bob".to_string()),
            })
            .await
            .unwrap();
        assert!(added.ok);

        clock.advance_secs(20);
        let next = handler.next(queue(&queue_id)).await.unwrap();
        assert_eq!(next.removed.as_deref(), Some("Alice"));

        let read = handler.read(queue(&queue_id)).await.unwrap();
        assert_eq!(read.users, vec!["Bob"]);
        assert_eq!(read.estimated_wait_secs, 20.0);

        assert!(handler.clear(queue(&queue_id)).await.unwrap().ok);
        let next = handler.next(queue(&queue_id)).await.unwrap();
        assert!(next.removed.is_none());
    }

    #[tokio::test]
    async fn test_errors_map_to_codes() {
        let (handler, _) = handler(None);

        let err = handler.read(queue("deadbeef")).await.unwrap_err();
        assert_eq!(err.code(), code::NOT_FOUND);

        let queue_id = handler.create().await.unwrap().queue_id;
        let err = handler
            .add(AddRequest {
                queue_id,
                name: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.code(), code::MISSING_NAME);
    }

    #[tokio::test]
    async fn test_stats() {
        let (handler, _) = handler(None);
        let queue_id = handler.create().await.unwrap().queue_id;
        handler
            .join(JoinRequest {
                queue_id,
                name: None,
            })
            .await
            .unwrap();

        let stats = handler.stats().await.unwrap();
        assert_eq!(stats.queue_count, 1);
        assert_eq!(stats.waiting_total, 1);
    }
}
