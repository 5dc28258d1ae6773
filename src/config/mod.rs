//! Configuration module

use serde::Deserialize;

use crate::wireguard::TunnelParameters;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    /// Parameters offered to clients before they fill anything in
    #[serde(default)]
    pub defaults: TunnelParameters,
    #[serde(default)]
    pub download: DownloadConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DownloadConfig {
    #[serde(default = "default_filename")]
    pub default_filename: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            default_filename: default_filename(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8082
}

fn default_filename() -> String {
    "wg0.conf".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::Environment::with_prefix("WGCONF").separator("__"))
            .build()?;

        Ok(Self::from_settings(settings))
    }

    fn from_settings(settings: config::Config) -> Self {
        settings.try_deserialize().unwrap_or_else(|e| {
            tracing::warn!("Invalid configuration, using defaults: {}", e);
            Config::default()
        })
    }
}
