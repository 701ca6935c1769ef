use std::future::Future;
use std::net::SocketAddr;

use stockroom_store::Inventory;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router_with_limit;

/// Inventory HTTP server.
pub struct InventoryServer {
    config: ServerConfig,
}

impl InventoryServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Open the on-disk inventory, creating the cache directory if absent.
    pub async fn open_inventory(&self) -> ServerResult<Inventory> {
        self.config.validate()?;
        let inventory = Inventory::open(&self.config.cache_dir, &self.config.store_file).await?;
        tracing::info!(
            cache_dir = %self.config.cache_dir.display(),
            store = %self.config.store_path().display(),
            "opened inventory"
        );
        Ok(inventory)
    }

    /// Build the router over the on-disk inventory (useful for testing).
    pub async fn router(&self) -> ServerResult<axum::Router> {
        let inventory = self.open_inventory().await?;
        Ok(build_router_with_limit(inventory, self.config.max_upload_bytes))
    }

    /// Start serving requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        self.serve_on(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> ServerResult<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let app = self.router().await?;
        let addr: SocketAddr = listener.local_addr()?;
        tracing::info!("stockroom listening on {addr}");
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C; shutting down");
        return;
    }
    tracing::info!("shutdown requested");
}
