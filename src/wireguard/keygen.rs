//! WireGuard Curve25519 key pair generation

use std::fmt;

use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use thiserror::Error;
use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::encoding::{encode_key, KEY_LEN};

#[derive(Error, Debug)]
pub enum KeyGenError {
    #[error("secure randomness source unavailable: {0}")]
    RandomnessUnavailable(#[from] rand::Error),
}

/// Raw WireGuard key pair (32-byte private scalar, 32-byte public point).
/// Both keys are wiped when the pair is dropped.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyPair {
    pub private_key: [u8; KEY_LEN],
    pub public_key: [u8; KEY_LEN],
}

impl KeyPair {
    /// Derive a key pair from existing private key material.
    ///
    /// The scalar is clamped before it is stored, so the private key matches
    /// what `wg genkey` would print for the same bytes.
    pub fn from_private_key(private_key: [u8; KEY_LEN]) -> Self {
        let clamped = Zeroizing::new(clamp_scalar(private_key));
        let secret = StaticSecret::from(*clamped);
        let public = PublicKey::from(&secret);

        Self {
            private_key: secret.to_bytes(),
            public_key: public.to_bytes(),
        }
    }

    pub fn public_key_base64(&self) -> String {
        encode_key(&self.public_key)
    }

    pub fn private_key_base64(&self) -> String {
        encode_key(&self.private_key)
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("private_key", &"<redacted>")
            .field("public_key", &self.public_key_base64())
            .finish()
    }
}

/// Standard X25519 clamping: clear the 3 low bits, clear bit 255, set bit 254
pub fn clamp_scalar(mut scalar: [u8; KEY_LEN]) -> [u8; KEY_LEN] {
    scalar[0] &= 248;
    scalar[31] &= 127;
    scalar[31] |= 64;
    scalar
}

/// Key pair generator over an injected cryptographically secure RNG
pub struct KeyPairGenerator<R> {
    rng: R,
}

impl KeyPairGenerator<OsRng> {
    /// Generator backed by the operating system's secure random source
    pub fn os() -> Self {
        Self::new(OsRng)
    }
}

impl<R: RngCore + CryptoRng> KeyPairGenerator<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate a new Curve25519 key pair for WireGuard
    pub fn generate(&mut self) -> Result<KeyPair, KeyGenError> {
        let mut scalar = Zeroizing::new([0u8; KEY_LEN]);
        self.rng.try_fill_bytes(&mut *scalar)?;

        let keypair = KeyPair::from_private_key(*scalar);
        tracing::debug!(public_key = %keypair.public_key_base64(), "Generated WireGuard key pair");
        Ok(keypair)
    }
}

/// Generate a key pair from the OS random source
pub fn generate_keypair() -> Result<KeyPair, KeyGenError> {
    KeyPairGenerator::os().generate()
}
