//! WireGuard module
//!
//! - `keygen`: Curve25519 key pair generation
//! - `config`: Client configuration file generator
//! - `encoding`: Base64 key encoding
//! - `validation`: Optional parameter checks, applied before formatting

pub mod config;
pub mod encoding;
pub mod keygen;
pub mod validation;

pub use config::{generate_artifact, GeneratedArtifact, TunnelParameters};
pub use keygen::{KeyGenError, KeyPair, KeyPairGenerator};
