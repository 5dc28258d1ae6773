//! wg-config-gen - WireGuard client configuration generator
//!
//! Generates a fresh Curve25519 key pair per request and renders it, together
//! with the caller's tunnel parameters, into a WireGuard `.conf` file.

mod api;
mod config;
mod error;
mod wireguard;

use std::net::SocketAddr;

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api::ApiState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wg_config_gen=info,tower_http=debug".into()),
        )
        .init();

    tracing::info!("Starting wg-config-gen...");

    // Load configuration
    let config = config::Config::load()?;
    tracing::info!("Configuration loaded");

    let state = ApiState::new(&config);
    let cors = CorsLayer::permissive();

    let app = api::routes().with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors),
    );

    // Start server
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
