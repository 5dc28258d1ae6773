//! WireGuard client configuration file generator

use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

use super::encoding::encode_key;
use super::keygen::{KeyGenError, KeyPair, KeyPairGenerator};

/// Network parameters embedded verbatim into a client config
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TunnelParameters {
    pub client_address: String,
    pub dns: String,
    pub server_public_key: String,
    pub server_endpoint: String,
    pub allowed_ips: String,
    pub persistent_keepalive: u32,
}

impl Default for TunnelParameters {
    fn default() -> Self {
        Self {
            client_address: "10.0.0.2/32".to_string(),
            dns: "1.1.1.1".to_string(),
            server_public_key: String::new(),
            server_endpoint: "vpn.example.com:51820".to_string(),
            allowed_ips: "0.0.0.0/0".to_string(),
            persistent_keepalive: 25,
        }
    }
}

/// Output of one generation cycle
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedArtifact {
    pub config_text: String,
    pub client_public_key: String,
}

/// Render a key pair and tunnel parameters into a WireGuard client config (.conf format).
///
/// Fields are interpolated as-is: a value containing a newline will break the file.
/// Run [`super::validation::validate_params`] first when that matters.
pub fn format_config(keypair: KeyPair, params: &TunnelParameters) -> GeneratedArtifact {
    let config_text = format!(
        "[Interface]\n\
         PrivateKey = {}\n\
         Address = {}\n\
         DNS = {}\n\
         \n\
         [Peer]\n\
         PublicKey = {}\n\
         Endpoint = {}\n\
         AllowedIPs = {}\n\
         PersistentKeepalive = {}",
        encode_key(&keypair.private_key),
        params.client_address,
        params.dns,
        params.server_public_key,
        params.server_endpoint,
        params.allowed_ips,
        params.persistent_keepalive,
    )
    .trim()
    .to_string();

    GeneratedArtifact {
        config_text,
        client_public_key: encode_key(&keypair.public_key),
    }
}

/// Full cycle: draw one fresh key pair, then render it
pub fn generate_artifact<R: RngCore + CryptoRng>(
    generator: &mut KeyPairGenerator<R>,
    params: &TunnelParameters,
) -> Result<GeneratedArtifact, KeyGenError> {
    let keypair = generator.generate()?;
    Ok(format_config(keypair, params))
}
