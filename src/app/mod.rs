mod wiring;

use std::sync::Arc;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::cli::Backend;
use crate::collection::CollectionService;
use crate::{context, rest, storage};

pub struct App {
    pub ctx: context::Context,
    pub service: Arc<CollectionService<Arc<dyn storage::Storage + Send + Sync>>>,
}

impl App {
    pub fn from_cli() -> Result<Self> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli);

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting funkodex");
        log::info!(
            "🗄️ Backend: {}",
            match ctx.backend {
                Backend::File => "file",
                Backend::Sqlite => "sqlite",
            }
        );
        log::info!("📂 Data dir: {}", ctx.data_dir.to_string_lossy());
        if let Some(path) = ctx.log_file.as_deref() {
            log::info!("📝 Log file: {}", path.to_string_lossy());
        }

        wiring::init_data_dir(&ctx)?;
        let storage = wiring::init_storage(&ctx)?;
        let service = Arc::new(CollectionService::new(storage));

        Ok(Self { ctx, service })
    }
}

pub async fn run_daemon(app: App) -> Result<()> {
    log::info!("🌐 REST API: http://{}", app.ctx.listen);

    let shutdown = CancellationToken::new();

    let api_addr = app.ctx.listen;
    let rest_service = app.service.clone();
    let rest_shutdown = shutdown.clone();

    let mut rest_handle = tokio::spawn(async move {
        if let Err(e) = rest::serve(api_addr, rest_service, rest_shutdown).await {
            log::error!("REST server error: {}", e);
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("🧨 Ctrl-C received, shutting down");
        }
        _ = &mut rest_handle => {},
    }

    shutdown.cancel();
    if let Err(e) = rest_handle.await {
        if !e.is_cancelled() {
            log::error!("REST server error: {}", e);
            return Err(e.into());
        }
    }

    log::info!("✅ Shutdown complete");
    Ok(())
}

pub async fn run() -> Result<()> {
    let app = App::from_cli()?;
    run_daemon(app).await
}
