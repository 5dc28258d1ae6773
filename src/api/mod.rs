//! API module - HTTP handlers and routes

pub mod download;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::config::Config;
use crate::wireguard::TunnelParameters;

/// Shared, read-only state for the handlers. Nothing here changes after startup.
#[derive(Clone)]
pub struct ApiState {
    pub defaults: Arc<TunnelParameters>,
    pub download_filename: Arc<str>,
}

impl ApiState {
    pub fn new(config: &Config) -> Self {
        Self {
            defaults: Arc::new(config.defaults.clone()),
            download_filename: Arc::from(config.download.default_filename.as_str()),
        }
    }
}

pub fn routes() -> Router<ApiState> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        .route("/api/health", get(handlers::health_check))
        // WireGuard
        .route("/api/wireguard/defaults", get(handlers::wireguard::get_defaults))
        .route("/api/wireguard/keypair", post(handlers::wireguard::generate_keypair))
        .route(
            "/api/wireguard/public-key",
            post(handlers::wireguard::derive_public_key),
        )
        .route("/api/wireguard/config", post(handlers::wireguard::generate_config))
        .route(
            "/api/wireguard/config/download",
            post(handlers::wireguard::download_config),
        )
        .route("/api/wireguard/validate", post(handlers::wireguard::validate_config))
}
