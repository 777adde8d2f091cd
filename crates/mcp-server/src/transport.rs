//! Streamable-HTTP listener for an rmcp server.
//!
//! The service runs stateless: every `POST /mcp` gets a fresh handler
//! from the factory and its own one-shot transport, so request ids from
//! different clients never meet. There are no sessions and no standalone
//! SSE stream.

use std::net::SocketAddr;

use axum::Router;
use rmcp::ServerHandler;
use rmcp::model::Tool;
use rmcp::transport::streamable_http_server::session::local::LocalSessionManager;
use rmcp::transport::streamable_http_server::{StreamableHttpServerConfig, StreamableHttpService};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::{Error, Result};

/// Route every server exposes.
pub const MCP_PATH: &str = "/mcp";

/// Build the router serving `factory`'s handlers at [`MCP_PATH`].
pub fn router<S, F>(factory: F) -> Router
where
    S: ServerHandler,
    F: Fn() -> std::io::Result<S> + Send + Sync + 'static,
{
    let service = StreamableHttpService::new(
        factory,
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );
    Router::new().nest_service(MCP_PATH, service)
}

/// Bind the listening socket.
pub async fn bind(addr: SocketAddr) -> Result<TcpListener> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| Error::Bind { addr, source })
}

/// Serve until the process is terminated.
pub async fn serve<S, F>(listener: TcpListener, factory: F) -> Result<()>
where
    S: ServerHandler,
    F: Fn() -> std::io::Result<S> + Send + Sync + 'static,
{
    axum::serve(listener, router(factory)).await?;
    Ok(())
}

/// Bind `addr`, announce the endpoint, then serve.
pub async fn listen<S, F>(label: &str, addr: SocketAddr, factory: F) -> Result<()>
where
    S: ServerHandler,
    F: Fn() -> std::io::Result<S> + Send + Sync + 'static,
{
    let listener = bind(addr).await?;
    tracing::info!(
        "{label} MCP Server running on http://localhost:{}{MCP_PATH}",
        addr.port()
    );
    serve(listener, factory).await
}

/// Startup listing of what a server exposes.
pub fn log_registered_tools(server: &str, tools: &[Tool]) {
    for tool in tools {
        tracing::info!(
            server,
            tool = %tool.name,
            title = tool.title.as_deref().unwrap_or(""),
            "registered tool"
        );
    }
}

/// A server running on a background task, stopped on drop.
pub struct RunningServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<std::io::Result<()>>,
}

impl RunningServer {
    /// Serve on a background task.
    pub fn spawn<S, F>(listener: TcpListener, factory: F) -> Result<Self>
    where
        S: ServerHandler,
        F: Fn() -> std::io::Result<S> + Send + Sync + 'static,
    {
        let addr = listener.local_addr()?;
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(factory);

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        Ok(Self {
            addr,
            shutdown: Some(shutdown_tx),
            task,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Endpoint URL as seen from this host.
    pub fn url(&self) -> String {
        format!("http://{}{MCP_PATH}", self.addr)
    }

    /// Stop accepting connections and wait for in-flight requests.
    pub async fn shutdown(mut self) -> Result<()> {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
        match (&mut self.task).await {
            Ok(result) => Ok(result?),
            Err(e) => Err(Error::Io(std::io::Error::other(e))),
        }
    }
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        if let Some(sender) = self.shutdown.take() {
            let _ = sender.send(());
        }
    }
}
