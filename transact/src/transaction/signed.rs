//! Signed transactions and the authorization structures they carry.
//!
//! A [`SignedTransaction`] wraps a [`Transaction`] with at most one
//! authorization:
//!
//! - `sig`: a plain Ed25519 signature,
//! - `msig`: a [`MultisigSignature`],
//! - `lsig`: a [`LogicSignature`] (program plus optional delegation).
//!
//! ## Validation policy
//!
//! Encoding and decoding both run [`SignedTransaction::validate`]: more than
//! one authorization is rejected, while an envelope with none is accepted so
//! that unsigned transactions can be sized and simulated. The wrapped
//! transaction must pass [`Transaction::validate`] and the `txn` key must be
//! present on the wire. Signature length is enforced by the `[u8; 64]` type
//! and by the decoder.

use super::builder::Transaction;
use super::error::TransactionError;
use crate::address::Address;
use crate::codec::{CodecError, FieldDescriptor as F, FieldReader, FieldWriter, WireEntity};
use crate::config::{MULTISIG_ADDRESS_DOMAIN, PROGRAM_DOMAIN, SIGNATURE_LENGTH};
use crate::crypto::hash::hash_with_domain;

// ---------------------------------------------------------------------------
// Multisig
// ---------------------------------------------------------------------------

/// One participant slot of a multisig.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigSubsignature {
    /// The participant's public key.
    pub public_key: Address,
    pub signature: Option<[u8; SIGNATURE_LENGTH]>,
}

impl MultisigSubsignature {
    pub fn unsigned(public_key: Address) -> Self {
        Self {
            public_key,
            signature: None,
        }
    }
}

const SUBSIG_KEY: F = F::address("pk");
const SUBSIG_SIG: F = F::plain("s");

impl WireEntity for MultisigSubsignature {
    const NAME: &'static str = "MultisigSubsignature";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[SUBSIG_KEY, SUBSIG_SIG];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.address(&SUBSIG_KEY, &self.public_key);
        w.plain_opt(&SUBSIG_SIG, &self.signature);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            public_key: r.address(&SUBSIG_KEY)?,
            signature: r.plain_opt(&SUBSIG_SIG)?,
        })
    }
}

/// A threshold multisignature. Participant order is part of the identity:
/// the same keys in a different order form a different account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultisigSignature {
    pub version: u8,
    pub threshold: u8,
    pub subsignatures: Vec<MultisigSubsignature>,
}

impl MultisigSignature {
    /// Participant keys in order.
    pub fn participants(&self) -> Vec<Address> {
        self.subsignatures.iter().map(|s| s.public_key).collect()
    }

    /// The multisig account address:
    /// `SHA-512/256("MultisigAddr" ‖ version ‖ threshold ‖ pk₁ ‖ … ‖ pkₙ)`.
    pub fn address(&self) -> Address {
        multisig_address(self.version, self.threshold, self.subsignatures.iter().map(|s| &s.public_key))
    }

    pub fn signed_count(&self) -> usize {
        self.subsignatures.iter().filter(|s| s.signature.is_some()).count()
    }

    pub fn is_fully_signed(&self) -> bool {
        self.signed_count() >= self.threshold as usize
    }

    /// Structural checks: non-zero version, at least one participant,
    /// `1 <= threshold <= participants`.
    pub fn validate(&self) -> Result<(), TransactionError> {
        let invalid = |reason: String| TransactionError::InvalidMultisig { reason };
        if self.version == 0 {
            return Err(invalid("version must be non-zero".into()));
        }
        if self.subsignatures.is_empty() {
            return Err(invalid("no participants".into()));
        }
        if self.threshold == 0 || self.threshold as usize > self.subsignatures.len() {
            return Err(invalid(format!(
                "threshold {} outside 1..={}",
                self.threshold,
                self.subsignatures.len()
            )));
        }
        Ok(())
    }
}

pub(crate) fn multisig_address<'a>(
    version: u8,
    threshold: u8,
    participants: impl Iterator<Item = &'a Address>,
) -> Address {
    let keys: Vec<&[u8]> = participants.map(|a| a.as_bytes().as_slice()).collect();
    let header = [version, threshold];
    let mut parts: Vec<&[u8]> = Vec::with_capacity(keys.len() + 1);
    parts.push(&header);
    parts.extend(keys);
    Address::from_public_key(hash_with_domain(MULTISIG_ADDRESS_DOMAIN, &parts))
}

const MSIG_VERSION: F = F::plain("v");
const MSIG_THRESHOLD: F = F::plain("thr").keep_zero();
const MSIG_SUBSIGS: F = F::nested("subsig", MultisigSubsignature::fields);

impl WireEntity for MultisigSignature {
    const NAME: &'static str = "MultisigSignature";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[MSIG_VERSION, MSIG_THRESHOLD, MSIG_SUBSIGS];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.uint(&MSIG_VERSION, self.version);
        w.uint(&MSIG_THRESHOLD, self.threshold);
        w.nested_seq(&MSIG_SUBSIGS, &self.subsignatures)
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            version: r.uint(&MSIG_VERSION, u8::MAX)?,
            threshold: r.uint(&MSIG_THRESHOLD, u8::MAX)?,
            subsignatures: r.nested_seq(&MSIG_SUBSIGS)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Logic signature
// ---------------------------------------------------------------------------

/// A program authorizing transactions, optionally delegated by an account.
///
/// With no signature set the program acts for its own escrow address. With
/// `signature`, `multisignature`, or `logic_multisignature` set, it acts
/// for the account that signed it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicSignature {
    pub logic: Vec<u8>,
    pub args: Vec<Vec<u8>>,
    pub signature: Option<[u8; SIGNATURE_LENGTH]>,
    /// Multisig delegation over the `Program` payload.
    pub multisignature: Option<MultisigSignature>,
    /// Multisig delegation over the `MsigProgram` payload, which binds the
    /// delegation to one multisig address.
    pub logic_multisignature: Option<MultisigSignature>,
}

impl LogicSignature {
    /// Escrow address of the program: `SHA-512/256("Program" ‖ program)`.
    pub fn escrow_address(&self) -> Address {
        program_address(&self.logic)
    }

    pub fn is_delegated(&self) -> bool {
        self.signature.is_some() || self.multisignature.is_some() || self.logic_multisignature.is_some()
    }

    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.logic.is_empty() {
            return Err(TransactionError::InvalidLogicSig {
                reason: "program is empty".into(),
            });
        }
        let delegations = [
            self.signature.is_some(),
            self.multisignature.is_some(),
            self.logic_multisignature.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if delegations > 1 {
            return Err(TransactionError::InvalidLogicSig {
                reason: format!("{delegations} delegation signatures set; at most one is allowed"),
            });
        }
        if let Some(msig) = self.multisignature.as_ref().or(self.logic_multisignature.as_ref()) {
            msig.validate()?;
        }
        Ok(())
    }
}

pub(crate) fn program_address(program: &[u8]) -> Address {
    Address::from_public_key(hash_with_domain(PROGRAM_DOMAIN, &[program]))
}

const LSIG_LOGIC: F = F::plain("l");
const LSIG_ARGS: F = F::byte_seq("arg");
const LSIG_SIG: F = F::plain("sig");
const LSIG_MSIG: F = F::nested("msig", MultisigSignature::fields);
const LSIG_LMSIG: F = F::nested("lmsig", MultisigSignature::fields);

impl WireEntity for LogicSignature {
    const NAME: &'static str = "LogicSignature";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[LSIG_LOGIC, LSIG_ARGS, LSIG_SIG, LSIG_MSIG, LSIG_LMSIG];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&LSIG_LOGIC, &self.logic);
        w.byte_seq(&LSIG_ARGS, &self.args);
        w.plain_opt(&LSIG_SIG, &self.signature);
        w.nested_opt(&LSIG_MSIG, &self.multisignature)?;
        w.nested_opt(&LSIG_LMSIG, &self.logic_multisignature)
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            logic: r.plain(&LSIG_LOGIC)?,
            args: r.byte_seq(&LSIG_ARGS)?,
            signature: r.plain_opt(&LSIG_SIG)?,
            multisignature: r.nested_opt(&LSIG_MSIG)?,
            logic_multisignature: r.nested_opt(&LSIG_LMSIG)?,
        })
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: Option<[u8; SIGNATURE_LENGTH]>,
    pub multisignature: Option<MultisigSignature>,
    pub logic_signature: Option<LogicSignature>,
    /// The authorizing address when it differs from the sender (rekeyed
    /// accounts).
    pub auth_address: Option<Address>,
}

impl SignedTransaction {
    /// An envelope with no authorization.
    pub fn unsigned(transaction: Transaction) -> Self {
        Self {
            transaction,
            signature: None,
            multisignature: None,
            logic_signature: None,
            auth_address: None,
        }
    }

    /// The address whose authority the transaction claims.
    pub fn signer_address(&self) -> Address {
        self.auth_address.unwrap_or(self.transaction.sender)
    }

    pub fn authorization_count(&self) -> usize {
        [
            self.signature.is_some(),
            self.multisignature.is_some(),
            self.logic_signature.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count()
    }

    /// Apply the validation policy described in the module docs.
    pub fn validate(&self) -> Result<(), TransactionError> {
        self.transaction.validate()?;
        let count = self.authorization_count();
        if count > 1 {
            return Err(TransactionError::ConflictingAuthorization { count });
        }
        if let Some(msig) = &self.multisignature {
            msig.validate()?;
        }
        if let Some(lsig) = &self.logic_signature {
            lsig.validate()?;
        }
        Ok(())
    }
}

const STX_TXN: F = F::nested("txn", Transaction::fields);
const STX_SIG: F = F::plain("sig");
const STX_MSIG: F = F::nested("msig", MultisigSignature::fields);
const STX_LSIG: F = F::nested("lsig", LogicSignature::fields);
const STX_AUTH: F = F::address("sgnr");

impl WireEntity for SignedTransaction {
    const NAME: &'static str = "SignedTransaction";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[STX_TXN, STX_SIG, STX_MSIG, STX_LSIG, STX_AUTH];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.nested(&STX_TXN, &self.transaction)?;
        w.plain_opt(&STX_SIG, &self.signature);
        w.nested_opt(&STX_MSIG, &self.multisignature)?;
        w.nested_opt(&STX_LSIG, &self.logic_signature)?;
        w.address_opt(&STX_AUTH, &self.auth_address);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            transaction: r.nested_required(&STX_TXN)?,
            signature: r.plain_opt(&STX_SIG)?,
            multisignature: r.nested_opt(&STX_MSIG)?,
            logic_signature: r.nested_opt(&STX_LSIG)?,
            auth_address: r.address_opt(&STX_AUTH)?,
        })
    }
}
