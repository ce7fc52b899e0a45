use std::net::SocketAddr;
use std::sync::Arc;

use axum::{routing::get, Router};

use crate::collection::CollectionService;
use crate::storage::Storage;

mod handlers;
mod models;

use handlers::{funkos, health, not_found};

pub struct AppState<S: Storage> {
    pub service: Arc<CollectionService<S>>,
    pub started_at: std::time::SystemTime,
}

impl<S: Storage> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            started_at: self.started_at,
        }
    }
}

pub fn router<S: Storage + Send + Sync + 'static>(state: AppState<S>) -> Router {
    Router::new()
        .route("/health", get(health::<S>))
        .route("/funkos", get(funkos::<S>))
        .fallback(not_found)
        .with_state(state)
}

pub async fn serve<S: Storage + Send + Sync + 'static>(
    addr: SocketAddr,
    service: Arc<CollectionService<S>>,
    shutdown: tokio_util::sync::CancellationToken,
) -> anyhow::Result<()> {
    log::info!("🌐 REST service on http://{}", addr);

    let state = AppState {
        service,
        started_at: std::time::SystemTime::now(),
    };

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move {
            shutdown.cancelled().await;
            log::info!("🛑 REST shutdown requested");
        })
        .await?;
    log::info!("👋 REST server exited");
    Ok(())
}
