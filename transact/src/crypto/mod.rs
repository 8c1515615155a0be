//! # Cryptographic Primitives
//!
//! Two primitives and nothing else:
//!
//! - **SHA-512/256** for every identifier the protocol derives.
//! - **Ed25519** for every signature.
//!
//! Both are thin wrappers over audited crates (`sha2`, `ed25519-dalek`).
//! Domain separation is not applied here; it is the job of
//! [`crate::signing`] and [`crate::transaction`], which know which tag
//! belongs to which payload.

pub mod hash;
pub mod keys;

pub use hash::{hash_with_domain, sha512_256};
pub use keys::{Ed25519Keypair, KeyError};
