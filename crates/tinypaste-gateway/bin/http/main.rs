mod cli;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tinypaste_gateway::{telemetry, App, AppState};
use tinypaste_generator::SecretIdSettings;
use tinypaste_ratelimit::{RateLimiter, RateLimiterSettings};
use tinypaste_service::{PasteService, PasteServiceSettings};
use tinypaste_storage::{InMemoryRepository, MySqlRepository, Repository};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::cli::{LogFormatArg, StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CLI::try_parse()?;
    telemetry::init(config.log_format == LogFormatArg::Json);

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        rate_limit = config.rate_limit,
        rate_window_secs = config.rate_window_secs,
        "starting tinypaste"
    );

    let limiter = Arc::new(RateLimiter::new(
        RateLimiterSettings::builder()
            .limit(config.rate_limit)
            .window(Duration::from_secs(config.rate_window_secs))
            .build(),
    )?);
    if config.sweep_interval_secs > 0 {
        limiter.spawn_sweeper(Duration::from_secs(config.sweep_interval_secs));
    }

    let settings = PasteServiceSettings::builder()
        .secret(
            SecretIdSettings::builder()
                .max_attempts(config.secret_max_attempts)
                .build(),
        )
        .build();

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(config.listen_addr, InMemoryRepository::new(), settings, limiter).await?;
        }
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .context("mysql dsn is required when storage backend is mysql")?;
            let repository = MySqlRepository::connect(&mysql_dsn).await?;
            repository.migrate().await?;
            run_server(config.listen_addr, repository, settings, limiter).await?;
        }
    }

    Ok(())
}

async fn run_server<R: Repository>(
    listen_addr: SocketAddr,
    repository: R,
    settings: PasteServiceSettings,
    limiter: Arc<RateLimiter>,
) -> anyhow::Result<()> {
    let service = PasteService::new(repository, settings);
    let app = App::router(AppState::new(Arc::new(service), limiter));

    let listener = TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    info!(listen_addr = %listener.local_addr()?, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
