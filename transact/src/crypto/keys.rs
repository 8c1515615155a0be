//! # Key Management
//!
//! Ed25519 keypair wrapper used wherever this crate needs to hold key
//! material itself: tests, benchmarks, local tooling. Production callers
//! usually supply their own signer (a hardware wallet, a KMS) through
//! [`crate::signing::Ed25519Signer`] and never hand keys to this crate.
//!
//! ## Security considerations
//!
//! - Private keys are zeroized on drop (thanks, ed25519-dalek).
//! - Generation uses `OsRng`.
//! - Key bytes are never logged and never appear in `Debug` output.

use ed25519_dalek::{Signer, SigningKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use std::fmt;
use thiserror::Error;

use crate::address::Address;
use crate::config::{PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};

/// Errors that can occur during key operations.
///
/// Intentionally vague about *why* something failed.
#[derive(Debug, Error)]
pub enum KeyError {
    #[error("invalid secret key bytes: expected {expected} bytes, got {got}")]
    InvalidSecretKey { expected: usize, got: usize },
}

/// An Ed25519 keypair.
///
/// Does not implement `Serialize`. Exporting a secret key should be a
/// deliberate call to [`Ed25519Keypair::secret_key_bytes`].
pub struct Ed25519Keypair {
    signing_key: SigningKey,
}

impl Ed25519Keypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Build a keypair deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Build a keypair from a seed slice, checking its length.
    pub fn from_seed_slice(seed: &[u8]) -> Result<Self, KeyError> {
        let seed: [u8; SECRET_KEY_LENGTH] =
            seed.try_into().map_err(|_| KeyError::InvalidSecretKey {
                expected: SECRET_KEY_LENGTH,
                got: seed.len(),
            })?;
        Ok(Self::from_seed(&seed))
    }

    /// Raw public key bytes.
    pub fn public_key_bytes(&self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.signing_key.verifying_key().to_bytes()
    }

    /// The account address controlled by this key.
    pub fn address(&self) -> Address {
        Address::from_public_key(self.public_key_bytes())
    }

    /// Sign raw bytes. No domain prefix is added here; see
    /// [`crate::signing`] for the domain-separated entry points.
    pub fn sign(&self, message: &[u8]) -> [u8; SIGNATURE_LENGTH] {
        self.signing_key.sign(message).to_bytes()
    }

    /// Export the 32-byte seed. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        self.signing_key.to_bytes()
    }
}

impl Clone for Ed25519Keypair {
    fn clone(&self) -> Self {
        Self::from_seed(&self.signing_key.to_bytes())
    }
}

impl fmt::Debug for Ed25519Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Keypair(pub={})", hex::encode(self.public_key_bytes()))
    }
}

impl PartialEq for Ed25519Keypair {
    /// Compared by public key only.
    fn eq(&self, other: &Self) -> bool {
        self.public_key_bytes() == other.public_key_bytes()
    }
}

impl Eq for Ed25519Keypair {}
