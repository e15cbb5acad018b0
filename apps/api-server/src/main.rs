//! # Agora API Server
//!
//! The main entry point for the Actix-web HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, web};
use anyhow::Context;
use tracing_actix_web::TracingLogger;

use agora_core::ports::FeedNotifier;
use api_server::middleware::AuthMiddleware;
use api_server::telemetry::{TelemetryConfig, init_telemetry};
use api_server::{AppConfig, AppState, cors, handlers};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(&TelemetryConfig::from_env());

    let config = AppConfig::from_env();

    tracing::info!(
        "Starting Agora API Server on {}:{}",
        config.host,
        config.port
    );

    let notifier = start_notifier(&config).await?;
    let state = AppState::new(&config, notifier)
        .await
        .context("failed to build application state")?;

    let upload_dir = config.upload_dir.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(AuthMiddleware::new(state.tokens.clone()))
            .wrap(TracingLogger::default())
            .wrap(cors())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_extractors)
            .configure(|cfg| handlers::configure_routes(cfg, &upload_dir))
    })
    .bind((config.host.as_str(), config.port))
    .with_context(|| format!("failed to bind {}:{}", config.host, config.port))?
    .run()
    .await?;

    Ok(())
}

#[cfg(feature = "websocket")]
async fn start_notifier(config: &AppConfig) -> anyhow::Result<Arc<dyn FeedNotifier>> {
    let notifier = api_server::websocket::serve((config.host.as_str(), config.socket_port))
        .await
        .with_context(|| format!("failed to bind socket port {}", config.socket_port))?;
    Ok(Arc::new(notifier))
}

#[cfg(not(feature = "websocket"))]
async fn start_notifier(_config: &AppConfig) -> anyhow::Result<Arc<dyn FeedNotifier>> {
    tracing::warn!("websocket feature disabled - feed events stay in-process");
    Ok(Arc::new(agora_infra::BroadcastNotifier::default()))
}
