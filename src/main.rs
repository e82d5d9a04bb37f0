// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::application::calendar::LocalCalendar;
use crate::application::cooldown_service::CooldownController;
use crate::application::flow_service::FlowReconciler;
use crate::application::history_service::HistoryController;
use crate::application::notification_service::Notifier;
use crate::domain::flow::FlowLayout;
use crate::infrastructure::config::load_dashboard_config;
use crate::infrastructure::http_client::SolnaxApiClient;
use crate::presentation::app_state::AppState;
use crate::presentation::router::build_router;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load configuration
    let config = load_dashboard_config()?;

    // Create the backend client (infrastructure layer), shared by every controller
    let client = Arc::new(SolnaxApiClient::new(
        &config.backend.base_url,
        config.backend.request_timeout(),
    )?);

    // Start controllers (application layer)
    let notifier = Notifier::new(config.notifications.display_for());
    let history = HistoryController::start(
        client.clone(),
        Arc::new(LocalCalendar),
        config.polling.history_interval(),
    );
    let flow = FlowReconciler::start(
        client.clone(),
        FlowLayout::default(),
        config.flow.dead_band,
        config.polling.instant_interval(),
    );
    let cooldown = CooldownController::start(client.clone(), notifier.clone());

    let state = Arc::new(AppState {
        history,
        flow,
        cooldown,
        notifier,
    });

    // Build router (presentation layer)
    let router = build_router(state.clone());

    // Start server
    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind))?;
    tracing::info!(
        backend = %config.backend.base_url,
        "Starting solnax-dashboard on {}",
        addr
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    state.stop();
    tracing::info!("Stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
