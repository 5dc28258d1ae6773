//! WireGuard API handlers
//!
//! Key generation, public key derivation, config file generation and download.

use axum::{
    extract::{Query, State},
    http::{header, HeaderName, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;

use crate::api::download::attachment_filename;
use crate::api::ApiState;
use crate::error::AppError;
use crate::wireguard::encoding::decode_key;
use crate::wireguard::validation::validate_params;
use crate::wireguard::{
    generate_artifact, GeneratedArtifact, KeyPair, KeyPairGenerator, TunnelParameters,
};

pub const PUBLIC_KEY_HEADER: &str = "x-wireguard-public-key";

// ============================================================================
// Request types
// ============================================================================

/// Tunnel parameters as sent by a client; missing fields take the configured defaults
#[derive(Debug, Default, Deserialize)]
pub struct TunnelParametersInput {
    pub client_address: Option<String>,
    pub dns: Option<String>,
    pub server_public_key: Option<String>,
    pub server_endpoint: Option<String>,
    pub allowed_ips: Option<String>,
    pub persistent_keepalive: Option<u32>,
}

impl TunnelParametersInput {
    pub fn apply_to(self, defaults: &TunnelParameters) -> TunnelParameters {
        TunnelParameters {
            client_address: self
                .client_address
                .unwrap_or_else(|| defaults.client_address.clone()),
            dns: self.dns.unwrap_or_else(|| defaults.dns.clone()),
            server_public_key: self
                .server_public_key
                .unwrap_or_else(|| defaults.server_public_key.clone()),
            server_endpoint: self
                .server_endpoint
                .unwrap_or_else(|| defaults.server_endpoint.clone()),
            allowed_ips: self
                .allowed_ips
                .unwrap_or_else(|| defaults.allowed_ips.clone()),
            persistent_keepalive: self
                .persistent_keepalive
                .unwrap_or(defaults.persistent_keepalive),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GenerateConfigRequest {
    #[serde(flatten)]
    pub params: TunnelParametersInput,
    /// Reject syntactically invalid parameters instead of embedding them
    #[serde(default)]
    pub validate: bool,
}

#[derive(Deserialize)]
pub struct DerivePublicKeyRequest {
    pub private_key: String,
}

#[derive(Deserialize, Default)]
pub struct DownloadQuery {
    pub filename: Option<String>,
}

/// Resolve parameters, optionally validate, then run one generation cycle
fn run_generation(
    state: &ApiState,
    req: GenerateConfigRequest,
) -> Result<GeneratedArtifact, AppError> {
    let params = req.params.apply_to(&state.defaults);

    if req.validate {
        validate_params(&params).map_err(AppError::InvalidParameters)?;
    }

    let artifact = generate_artifact(&mut KeyPairGenerator::os(), &params)?;
    tracing::info!(
        client_public_key = %artifact.client_public_key,
        endpoint = %params.server_endpoint,
        "Generated WireGuard client config"
    );
    Ok(artifact)
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /api/wireguard/defaults - Default tunnel parameters
pub async fn get_defaults(State(state): State<ApiState>) -> Json<TunnelParameters> {
    Json(state.defaults.as_ref().clone())
}

/// POST /api/wireguard/keypair - Generate a new key pair
pub async fn generate_keypair() -> Result<impl IntoResponse, AppError> {
    let keypair = crate::wireguard::keygen::generate_keypair()?;
    Ok(Json(serde_json::json!({
        "ok": true,
        "private_key": keypair.private_key_base64(),
        "public_key": keypair.public_key_base64(),
    })))
}

/// POST /api/wireguard/public-key - Derive the public key for an existing private key
pub async fn derive_public_key(
    Json(req): Json<DerivePublicKeyRequest>,
) -> Result<impl IntoResponse, AppError> {
    let private_key = decode_key(&req.private_key)?;
    let keypair = KeyPair::from_private_key(private_key);
    Ok(Json(serde_json::json!({
        "ok": true,
        "public_key": keypair.public_key_base64(),
    })))
}

/// POST /api/wireguard/config - Generate a WireGuard client config file
pub async fn generate_config(
    State(state): State<ApiState>,
    Json(req): Json<GenerateConfigRequest>,
) -> Result<impl IntoResponse, AppError> {
    let artifact = run_generation(&state, req)?;
    Ok(Json(serde_json::json!({
        "ok": true,
        "config": artifact.config_text,
        "client_public_key": artifact.client_public_key,
    })))
}

/// POST /api/wireguard/config/download - Generate a config and return it as a .conf attachment
pub async fn download_config(
    State(state): State<ApiState>,
    Query(q): Query<DownloadQuery>,
    Json(req): Json<GenerateConfigRequest>,
) -> Result<impl IntoResponse, AppError> {
    let artifact = run_generation(&state, req)?;
    let filename = attachment_filename(q.filename.as_deref(), &state.download_filename);

    Ok((
        StatusCode::OK,
        [
            (
                header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
            (
                HeaderName::from_static(PUBLIC_KEY_HEADER),
                artifact.client_public_key,
            ),
        ],
        artifact.config_text,
    ))
}

/// POST /api/wireguard/validate - Check tunnel parameters without generating keys
pub async fn validate_config(
    State(state): State<ApiState>,
    Json(input): Json<TunnelParametersInput>,
) -> Json<serde_json::Value> {
    let params = input.apply_to(&state.defaults);
    match validate_params(&params) {
        Ok(()) => Json(serde_json::json!({
            "ok": true,
            "errors": [],
        })),
        Err(errors) => Json(serde_json::json!({
            "ok": false,
            "errors": errors,
        })),
    }
}
