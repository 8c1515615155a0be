//! # Addresses
//!
//! An address is the human-facing form of a 32-byte Ed25519 public key (or
//! of a 32-byte hash standing in for one, for multisig and program
//! accounts):
//!
//! ```text
//! public_key (32 bytes)
//!     -> checksum = SHA-512/256(public_key)[28..32]
//!     -> base32(public_key ‖ checksum), RFC 4648 alphabet, no padding
//!     -> 58 characters
//! ```
//!
//! The checksum catches typos when users paste addresses around. Parsing
//! always verifies it; there is no "lenient" mode.

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{ADDRESS_LENGTH, CHECKSUM_LENGTH, HASH_LENGTH, PUBLIC_KEY_LENGTH};
use crate::crypto::hash::sha512_256;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors raised while parsing or building an address.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    /// The text is not 58 characters long.
    #[error("invalid address length: expected {expected} characters, got {got}")]
    InvalidLength { expected: usize, got: usize },

    /// The text is not valid unpadded base32.
    #[error("invalid base32 in address: {0}")]
    InvalidEncoding(String),

    /// The trailing checksum does not match the key.
    #[error("address checksum mismatch for {address}")]
    ChecksumMismatch { address: String },

    /// Raw bytes handed to [`Address::from_slice`] are not 32 bytes.
    #[error("invalid public key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },
}

// ---------------------------------------------------------------------------
// Address
// ---------------------------------------------------------------------------

/// A 32-byte account identifier with a checksummed text form.
///
/// The default value is the all-zero address, which the wire format treats
/// as "absent".
///
/// # Examples
///
/// ```
/// use algokit_transact::Address;
///
/// let zero: Address = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ"
///     .parse()
///     .unwrap();
/// assert_eq!(zero, Address::default());
/// assert_eq!(zero.to_string().len(), 58);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; PUBLIC_KEY_LENGTH]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Address = Address([0u8; PUBLIC_KEY_LENGTH]);

    /// Wrap raw public key (or account hash) bytes.
    pub const fn from_public_key(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Wrap a slice, checking it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, AddressError> {
        let arr: [u8; PUBLIC_KEY_LENGTH] =
            bytes.try_into().map_err(|_| AddressError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH,
                got: bytes.len(),
            })?;
        Ok(Self(arr))
    }

    /// Raw 32 bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    /// `true` for the all-zero address.
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; PUBLIC_KEY_LENGTH]
    }

    /// The 4-byte checksum that trails the key in the text form.
    pub fn checksum(&self) -> [u8; CHECKSUM_LENGTH] {
        let hash = sha512_256(&self.0);
        let mut out = [0u8; CHECKSUM_LENGTH];
        out.copy_from_slice(&hash[HASH_LENGTH - CHECKSUM_LENGTH..]);
        out
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_LENGTH {
            return Err(AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: s.len(),
            });
        }

        let decoded = BASE32_NOPAD
            .decode(s.as_bytes())
            .map_err(|e| AddressError::InvalidEncoding(e.to_string()))?;
        if decoded.len() != PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH {
            return Err(AddressError::InvalidKeyLength {
                expected: PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH,
                got: decoded.len(),
            });
        }

        let (key, checksum) = decoded.split_at(PUBLIC_KEY_LENGTH);
        let address = Address::from_slice(key)?;
        if address.checksum().as_slice() != checksum {
            return Err(AddressError::ChecksumMismatch {
                address: s.to_string(),
            });
        }
        Ok(address)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH];
        buf[..PUBLIC_KEY_LENGTH].copy_from_slice(&self.0);
        buf[PUBLIC_KEY_LENGTH..].copy_from_slice(&self.checksum());
        f.write_str(&BASE32_NOPAD.encode(&buf))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self)
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for Address {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
