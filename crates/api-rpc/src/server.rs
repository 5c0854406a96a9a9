//! JSON-RPC Server
//!
//! Serves the queue methods as JSON-RPC 2.0 over HTTP.

use crate::handler::RpcHandler;
use crate::types::{AddRequest, JoinRequest, QueueRequest};
use jsonrpsee::server::{Server, ServerHandle};
use jsonrpsee::RpcModule;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use waitline_core::application::QueueService;

const DEFAULT_RPC_HOST: &str = "127.0.0.1";
const DEFAULT_RPC_PORT: u16 = 9630;

/// RPC Server Configuration
#[derive(Debug, Clone)]
pub struct RpcServerConfig {
    pub host: String,
    pub port: u16,
    /// Base URL used to build shareable queue links
    pub public_url: Option<String>,
}

impl Default for RpcServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_RPC_HOST.to_string(),
            port: DEFAULT_RPC_PORT,
            public_url: None,
        }
    }
}

/// A started server: the bound address plus its stop handle
pub struct RunningServer {
    pub addr: SocketAddr,
    pub handle: ServerHandle,
}

/// RPC Server
pub struct RpcServer {
    config: RpcServerConfig,
    handler: Arc<RpcHandler>,
}

impl RpcServer {
    pub fn new(config: RpcServerConfig, service: Arc<QueueService>) -> Self {
        let handler = Arc::new(RpcHandler::new(service, config.public_url.clone()));
        Self { config, handler }
    }

    /// Bind and start serving. Port 0 picks a free port; see `RunningServer::addr`.
    pub async fn start(self) -> Result<RunningServer, String> {
        let addr = format!("{}:{}", self.config.host, self.config.port);

        let server = Server::builder()
            .build(&addr)
            .await
            .map_err(|e| format!("Failed to build server on {}: {}", addr, e))?;
        let local_addr = server
            .local_addr()
            .map_err(|e| format!("Failed to read bound address: {}", e))?;

        let module = self.build_module()?;

        info!(addr = %local_addr, "JSON-RPC server started");

        Ok(RunningServer {
            addr: local_addr,
            handle: server.start(module),
        })
    }

    fn build_module(&self) -> Result<RpcModule<()>, String> {
        let mut module = RpcModule::new(());

        let handler = self.handler.clone();
        module
            .register_async_method("queue.create.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.create().await }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.join.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: JoinRequest = params.parse()?;
                    handler.join(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.add.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: AddRequest = params.parse()?;
                    handler.add(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.next.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueRequest = params.parse()?;
                    handler.next(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.clear.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueRequest = params.parse()?;
                    handler.clear(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        let handler = self.handler.clone();
        module
            .register_async_method("queue.read.v1", move |params, _, _| {
                let handler = handler.clone();
                async move {
                    let req: QueueRequest = params.parse()?;
                    handler.read(req).await
                }
            })
            .map_err(|e| e.to_string())?;

        // Admin
        let handler = self.handler.clone();
        module
            .register_async_method("admin.stats.v1", move |_, _, _| {
                let handler = handler.clone();
                async move { handler.stats().await }
            })
            .map_err(|e| e.to_string())?;

        Ok(module)
    }
}
