//! # Hashing Utilities
//!
//! The protocol uses exactly one hash function: **SHA-512/256** (SHA-512
//! with the distinct SHA-512/256 initial values, truncated to 32 bytes). It
//! is what address checksums, transaction ids, group ids, escrow addresses
//! and multisig addresses are all built from. Using anything else produces
//! values no other implementation will recognize.
//!
//! ## Domain prefixes
//!
//! Every hash that identifies a protocol object is taken over a short ASCII
//! tag followed by the payload (see [`crate::config`]). [`hash_with_domain`]
//! feeds the tag and the payload parts into one hasher without building an
//! intermediate buffer.

use sha2::{Digest, Sha512_256};

use crate::config::HASH_LENGTH;

/// Compute SHA-512/256 of the input.
///
/// # Example
///
/// ```
/// use algokit_transact::crypto::sha512_256;
///
/// let digest = sha512_256(b"");
/// assert_eq!(
///     hex::encode(digest),
///     "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
/// );
/// ```
pub fn sha512_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha512_256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Hash `domain ‖ parts[0] ‖ parts[1] ‖ …` with SHA-512/256.
///
/// Equivalent to concatenating everything and calling [`sha512_256`], minus
/// the allocation.
pub fn hash_with_domain(domain: &[u8], parts: &[&[u8]]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha512_256::new();
    hasher.update(domain);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
