//! Web server for chatrelay.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tower_http::compression::CompressionLayer;

use crate::config::{ServerConfig, WebConfig};
use crate::{RelayError, Result};

use super::router::create_router;
use super::ws::ChatRelay;

/// HTTP and WebSocket server for the relay.
pub struct ChatServer {
    /// Server address.
    addr: SocketAddr,
    /// Relay shared with connection handlers.
    relay: Arc<ChatRelay>,
    /// Web configuration.
    web_config: WebConfig,
}

impl ChatServer {
    /// Create a new server.
    pub fn new(server: &ServerConfig, web: &WebConfig, relay: Arc<ChatRelay>) -> Result<Self> {
        let addr = format!("{}:{}", server.host, server.port)
            .parse::<SocketAddr>()
            .map_err(|e| {
                RelayError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    server.host, server.port
                ))
            })?;

        Ok(Self {
            addr,
            relay,
            web_config: web.clone(),
        })
    }

    /// Get the configured address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    async fn bind(self) -> Result<(TcpListener, axum::Router)> {
        let router = create_router(self.relay, &self.web_config).layer(CompressionLayer::new());
        let listener = TcpListener::bind(self.addr).await?;
        Ok((listener, router))
    }

    /// Run the server until the listener fails.
    pub async fn run(self) -> Result<()> {
        let (listener, router) = self.bind().await?;
        tracing::info!("Server is up and running on http://{}", listener.local_addr()?);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server in the background and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let (listener, router) = self.bind().await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Server is up and running on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
