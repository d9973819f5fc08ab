use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

use config::settings::{AppConfig, StorageConfig};
use infrastructure::engine::ffmpeg::FfmpegEngine;
use infrastructure::storage::StorageGateway;
use infrastructure::storage::local::LocalStorage;
use infrastructure::storage::s3::S3Storage;
use modules::progress::hub::ProgressHub;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting server...");

    let config = AppConfig::new().context("Invalid configuration")?;

    workers::janitor::sweep_work_dir(&config.work_dir)
        .await
        .with_context(|| format!("Cannot prepare work dir {}", config.work_dir.display()))?;

    let storage: Arc<dyn StorageGateway> = match &config.storage {
        StorageConfig::S3 {
            endpoint,
            bucket,
            access_key,
            secret_key,
            region,
        } => Arc::new(S3Storage::new(endpoint, bucket, access_key, secret_key, region)),
        StorageConfig::Local {
            dir,
            public_base_url,
        } => Arc::new(LocalStorage::new(dir.clone(), public_base_url).await?),
    };

    let engine = Arc::new(FfmpegEngine::new(config.ffmpeg_path.clone()));

    let addr = format!("0.0.0.0:{}", config.server_port);
    let state = AppState::new(config, storage, engine);
    let hub = state.progress.clone();
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(hub))
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal(hub: Arc<ProgressHub>) {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
    hub.shutdown_all().await;
}
