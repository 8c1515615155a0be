//! Signer traits and the single-key signer bundle.
//!
//! [`Ed25519Signer`] is the only place raw key material is touched: it signs
//! whatever bytes it is given. Everything above it is typed by domain. A
//! [`LogicSigSigner`] can only sign a program delegation, a
//! [`ProgramDataSigner`] only program data, and so on, each adding its own
//! tag before the raw signer sees the payload.
//!
//! [`generate_address_with_signers`] wraps one raw signer into an
//! [`AddressWithSigners`] that implements all four domain traits over the
//! same key.

use std::fmt;
use std::sync::Arc;

use tracing::trace;

use super::SigningError;
use crate::address::Address;
use crate::config::{
    BYTES_DOMAIN, MULTISIG_PROGRAM_DOMAIN, PROGRAM_DATA_DOMAIN, PROGRAM_DOMAIN, PUBLIC_KEY_LENGTH,
    SIGNATURE_LENGTH,
};
use crate::crypto::keys::Ed25519Keypair;
use crate::transaction::{encode_signed_transaction, encode_transaction, SignedTransaction, Transaction};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Signs raw bytes with one Ed25519 key.
///
/// Implemented by [`Ed25519Keypair`] and by any
/// `Fn(&[u8]) -> Result<[u8; 64], SigningError>`, so a hardware wallet or a
/// remote KMS can be plugged in as a closure.
pub trait Ed25519Signer: Send + Sync {
    fn sign_raw(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SigningError>;
}

impl<F> Ed25519Signer for F
where
    F: Fn(&[u8]) -> Result<[u8; SIGNATURE_LENGTH], SigningError> + Send + Sync,
{
    fn sign_raw(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SigningError> {
        self(message)
    }
}

impl Ed25519Signer for Ed25519Keypair {
    fn sign_raw(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SigningError> {
        Ok(self.sign(message))
    }
}

/// Signs a batch of transactions, returning encoded signed transactions for
/// the requested indexes, in the order requested.
pub trait TransactionSigner: Send + Sync {
    fn sign_transactions(&self, txs: &[Transaction], indexes: &[usize]) -> Result<Vec<Vec<u8>>, SigningError>;
}

/// Signs a program delegation. With `msig_address` the delegation is bound
/// to that multisig account.
pub trait LogicSigSigner: Send + Sync {
    fn sign_logic_sig(
        &self,
        program: &[u8],
        msig_address: Option<&Address>,
    ) -> Result<[u8; SIGNATURE_LENGTH], SigningError>;
}

/// Signs data on behalf of a program, for the program to check on chain.
pub trait ProgramDataSigner: Send + Sync {
    fn sign_program_data(
        &self,
        data: &[u8],
        program_address: &Address,
    ) -> Result<[u8; SIGNATURE_LENGTH], SigningError>;
}

/// Signs arbitrary bytes under the `MX` tag.
pub trait BytesSigner: Send + Sync {
    fn sign_bytes(&self, data: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SigningError>;
}

/// Sign the transactions at `indexes` with `sign` and encode each result.
pub(crate) fn sign_indexed(
    txs: &[Transaction],
    indexes: &[usize],
    sign: impl Fn(&Transaction) -> Result<SignedTransaction, SigningError>,
) -> Result<Vec<Vec<u8>>, SigningError> {
    let mut out = Vec::with_capacity(indexes.len());
    for &index in indexes {
        let tx = txs.get(index).ok_or(SigningError::IndexOutOfRange {
            index,
            len: txs.len(),
        })?;
        out.push(encode_signed_transaction(&sign(tx)?)?);
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Domain payloads
// ---------------------------------------------------------------------------

fn tagged(tag: &[u8], parts: &[&[u8]]) -> Vec<u8> {
    let len = tag.len() + parts.iter().map(|p| p.len()).sum::<usize>();
    let mut out = Vec::with_capacity(len);
    out.extend_from_slice(tag);
    for part in parts {
        out.extend_from_slice(part);
    }
    out
}

/// `"Program" ‖ program`, or `"MsigProgram" ‖ msig_address ‖ program`.
pub fn logic_sig_payload(program: &[u8], msig_address: Option<&Address>) -> Vec<u8> {
    match msig_address {
        Some(address) => tagged(MULTISIG_PROGRAM_DOMAIN, &[address.as_bytes().as_slice(), program]),
        None => tagged(PROGRAM_DOMAIN, &[program]),
    }
}

/// `"ProgData" ‖ program_address ‖ data`.
pub fn program_data_payload(program_address: &Address, data: &[u8]) -> Vec<u8> {
    tagged(PROGRAM_DATA_DOMAIN, &[program_address.as_bytes().as_slice(), data])
}

/// `"MX" ‖ data`.
pub fn bytes_payload(data: &[u8]) -> Vec<u8> {
    tagged(BYTES_DOMAIN, &[data])
}

// ---------------------------------------------------------------------------
// AddressWithSigners
// ---------------------------------------------------------------------------

/// One account address with every domain signer bound to its key.
///
/// Cloning shares the underlying signer.
#[derive(Clone)]
pub struct AddressWithSigners {
    address: Address,
    signer: Arc<dyn Ed25519Signer>,
}

/// Bundle a public key and a raw signer for it.
///
/// The signer is not checked against the key; a mismatch surfaces as a
/// signature that fails verification.
pub fn generate_address_with_signers(
    public_key: [u8; PUBLIC_KEY_LENGTH],
    signer: impl Ed25519Signer + 'static,
) -> AddressWithSigners {
    AddressWithSigners {
        address: Address::from_public_key(public_key),
        signer: Arc::new(signer),
    }
}

impl AddressWithSigners {
    /// Convenience for a locally held keypair.
    pub fn from_keypair(keypair: Ed25519Keypair) -> Self {
        generate_address_with_signers(keypair.public_key_bytes(), keypair)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Sign an already domain-tagged payload.
    pub(crate) fn sign_raw_payload(&self, payload: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SigningError> {
        self.signer.sign_raw(payload)
    }

    /// Sign one transaction. `auth_address` is set when the sender is a
    /// different (rekeyed) account.
    pub fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SigningError> {
        trace!(sender = %tx.sender, signer = %self.address, "signing transaction");
        let signature = self.sign_raw_payload(&encode_transaction(tx)?)?;
        let mut stx = SignedTransaction::unsigned(tx.clone());
        stx.signature = Some(signature);
        if tx.sender != self.address {
            stx.auth_address = Some(self.address);
        }
        Ok(stx)
    }
}

impl fmt::Debug for AddressWithSigners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressWithSigners")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}

impl TransactionSigner for AddressWithSigners {
    fn sign_transactions(&self, txs: &[Transaction], indexes: &[usize]) -> Result<Vec<Vec<u8>>, SigningError> {
        sign_indexed(txs, indexes, |tx| self.sign_transaction(tx))
    }
}

impl LogicSigSigner for AddressWithSigners {
    fn sign_logic_sig(
        &self,
        program: &[u8],
        msig_address: Option<&Address>,
    ) -> Result<[u8; SIGNATURE_LENGTH], SigningError> {
        trace!(signer = %self.address, multisig = msig_address.is_some(), "signing program delegation");
        self.signer.sign_raw(&logic_sig_payload(program, msig_address))
    }
}

impl ProgramDataSigner for AddressWithSigners {
    fn sign_program_data(
        &self,
        data: &[u8],
        program_address: &Address,
    ) -> Result<[u8; SIGNATURE_LENGTH], SigningError> {
        self.signer.sign_raw(&program_data_payload(program_address, data))
    }
}

impl BytesSigner for AddressWithSigners {
    fn sign_bytes(&self, data: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], SigningError> {
        self.signer.sign_raw(&bytes_payload(data))
    }
}

/// Sign a transaction with a locally held keypair.
pub fn sign_transaction(tx: &Transaction, keypair: &Ed25519Keypair) -> Result<SignedTransaction, SigningError> {
    AddressWithSigners::from_keypair(keypair.clone()).sign_transaction(tx)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
