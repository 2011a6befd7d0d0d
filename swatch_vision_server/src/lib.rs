// THEORY:
// `swatch_vision_server` puts the sampling engine behind HTTP and owns the persistence
// boundary. The store is built once from `ServerConfig`, wrapped in `AppState` and handed
// to the router; handlers never reach for ambient state.

pub mod api;
pub mod config;
pub mod record;
pub mod store;

pub use api::{AppState, router};
pub use config::{ServerConfig, StoreConfig};
pub use record::{NewColorRecord, StoredColorRecord};
pub use store::{ColorStore, JsonLinesColorStore, MemoryColorStore, StoreError};

use std::net::SocketAddr;
use tokio::sync::oneshot;
use tracing::{error, info};

/// A server accepting connections in a background task.
pub struct RunningServer {
    pub local_addr: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl RunningServer {
    /// Stops accepting connections, lets in-flight requests finish and waits for the
    /// server task to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(e) = self.handle.await {
            error!(error = %e, "Server task ended abnormally");
        }
    }
}

/// Binds `bind_addr` and serves `state` until [`RunningServer::shutdown`] is called.
pub async fn start_server(bind_addr: &str, state: AppState) -> anyhow::Result<RunningServer> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    let local_addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let app = router(state);
    let handle = tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        if let Err(e) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            error!(error = %e, "Server stopped with error");
        }
    });

    info!("Swatch Vision server listening on http://{}", local_addr);
    Ok(RunningServer {
        local_addr,
        shutdown_tx,
        handle,
    })
}
