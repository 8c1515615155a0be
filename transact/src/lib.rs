// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # algokit-transact
//!
//! Transaction codec and signing engine. Typed transactions go in, canonical
//! bytes and signatures come out, and those bytes agree exactly with every
//! other implementation of the same protocol. "It round-trips here" is not
//! the bar; "it hashes to the same id everywhere" is.
//!
//! ## Architecture
//!
//! ```text
//!   Transaction (typed)
//!        │  field descriptors (codec::field)
//!        ▼
//!   WireMap ── canonicalize ──▶ msgpack bytes ──▶ "TX" ‖ bytes ──▶ id / signature
//!        ▲                                              │
//!        └──────────── decode (forward compatible) ◀────┘
//! ```
//!
//! - **address**: 32-byte keys and their checksummed base32 text form.
//! - **codec**: wire values, canonical ordering, msgpack, and the declarative
//!   object mapping.
//! - **transaction**: the transaction model, fees, ids, groups, and signed
//!   envelopes.
//! - **signing**: domain-separated signers, multisig aggregation, logic
//!   signatures, and verification.
//! - **crypto**: SHA-512/256 and Ed25519, nothing more.
//! - **config**: protocol constants and domain tags.
//!
//! ## Design Philosophy
//!
//! 1. Byte-exact output. Canonical form is defined once and used everywhere.
//! 2. Every signing domain has its own tag, and the types keep them apart.
//! 3. Unknown values from newer protocol versions decode instead of failing.
//! 4. No I/O. Everything is a pure function of its inputs.

pub mod address;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod signing;
pub mod transaction;

pub use address::{Address, AddressError};
pub use codec::CodecError;
pub use crypto::Ed25519Keypair;
pub use signing::SigningError;
pub use transaction::{SignedTransaction, Transaction, TransactionBuilder, TransactionError};
