//! # Signing Engine
//!
//! Domain-separated signature production on top of the transaction codec.
//!
//! ## Architecture
//!
//! ```text
//! signer.rs            - signer traits, domain payloads, AddressWithSigners
//! multisig.rs          - MultisigMetadata, new / apply / merge / address
//! multisig_account.rs  - MultisigAccount transaction signer
//! logicsig.rs          - LogicSigAccount (escrow or delegated program)
//! verification.rs      - signature checks in each domain
//! ```
//!
//! ## Domains
//!
//! Every signature covers a payload that starts with a fixed tag:
//!
//! | Tag           | Payload                                  |
//! |---------------|------------------------------------------|
//! | `TX`          | canonical transaction                    |
//! | `Program`     | program (single-key delegation)          |
//! | `MsigProgram` | multisig address ‖ program               |
//! | `ProgData`    | program address ‖ data                   |
//! | `MX`          | arbitrary bytes                          |
//!
//! Each signer trait builds its own payload and cannot be handed another
//! domain's bytes, so a signature made in one domain never verifies in
//! another.
//!
//! Signing is synchronous and stateless. Signers are `Send + Sync`, so a
//! caller may sign many transactions across threads at once.

pub mod logicsig;
pub mod multisig;
pub mod multisig_account;
pub mod signer;
pub mod verification;

use thiserror::Error;

use crate::address::Address;
use crate::transaction::TransactionError;

pub use logicsig::LogicSigAccount;
pub use multisig::{
    address_from_multisig_signature, apply_multisig_subsignature, merge_multisignatures,
    new_multisig_signature, MultisigMetadata,
};
pub use multisig_account::MultisigAccount;
pub use signer::{
    bytes_payload, generate_address_with_signers, logic_sig_payload, program_data_payload,
    sign_transaction, AddressWithSigners, BytesSigner, Ed25519Signer, LogicSigSigner,
    ProgramDataSigner, TransactionSigner,
};
pub use verification::{
    verify_bytes, verify_logic_sig_delegation, verify_multisig, verify_program_data,
    verify_signed_transaction, verify_transaction_signature,
};

/// Errors raised while producing or checking signatures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SigningError {
    #[error(transparent)]
    Transaction(#[from] TransactionError),

    #[error("multisig requires at least one participant")]
    EmptyParticipants,

    #[error("multisig version must be non-zero")]
    InvalidVersion,

    #[error("threshold {threshold} is outside 1..={participants}")]
    InvalidThreshold { threshold: u8, participants: usize },

    #[error("{address} is not a participant of this multisig")]
    NotAParticipant { address: Address },

    /// Two multisigs being merged disagree on a parameter.
    #[error("multisig {field} mismatch")]
    MultisigMismatch { field: &'static str },

    #[error("transaction index {index} out of range for {len} transactions")]
    IndexOutOfRange { index: usize, len: usize },

    /// A logic signature account was asked to sign before holding a program.
    #[error("logic signature program is empty")]
    EmptyProgram,

    /// An external signer failed.
    #[error("signer failed: {0}")]
    Signer(String),

    #[error("invalid public key")]
    InvalidPublicKey,

    /// Intentionally vague about which check failed.
    #[error("signature verification failed")]
    VerificationFailed,
}
