//! Logic signature accounts.
//!
//! A program can authorize transactions in two ways:
//!
//! ```text
//! undelegated           acts for its escrow address SHA-512/256("Program" ‖ program)
//! delegated (single)    an account signed "Program" ‖ program; acts for that account
//! delegated (multisig)  participants signed "MsigProgram" ‖ msig ‖ program;
//!                       acts for the multisig account
//! ```
//!
//! `delegate` and `delegate_multisig` replace any previous delegation rather
//! than adding to it.

use tracing::debug;

use super::multisig::{apply_multisig_subsignature, MultisigMetadata};
use super::signer::{sign_indexed, AddressWithSigners, LogicSigSigner, TransactionSigner};
use super::SigningError;
use crate::address::Address;
use crate::config::SIGNATURE_LENGTH;
use crate::transaction::signed::program_address;
use crate::transaction::{LogicSignature, MultisigSignature, SignedTransaction, Transaction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicSigAccount {
    program: Vec<u8>,
    args: Vec<Vec<u8>>,
    signature: Option<[u8; SIGNATURE_LENGTH]>,
    logic_multisignature: Option<MultisigSignature>,
    /// Set together with `signature`.
    delegator: Option<Address>,
}

impl LogicSigAccount {
    pub fn new(program: Vec<u8>, args: Vec<Vec<u8>>) -> Result<Self, SigningError> {
        if program.is_empty() {
            return Err(SigningError::EmptyProgram);
        }
        Ok(Self {
            program,
            args,
            signature: None,
            logic_multisignature: None,
            delegator: None,
        })
    }

    pub fn program(&self) -> &[u8] {
        &self.program
    }

    pub fn args(&self) -> &[Vec<u8>] {
        &self.args
    }

    pub fn is_delegated(&self) -> bool {
        self.signature.is_some() || self.logic_multisignature.is_some()
    }

    /// Delegate to a single account.
    pub fn delegate(&self, signer: &AddressWithSigners) -> Result<Self, SigningError> {
        let signature = signer.sign_logic_sig(&self.program, None)?;
        debug!(delegator = %signer.address(), "delegated logic signature");
        Ok(Self {
            signature: Some(signature),
            logic_multisignature: None,
            delegator: Some(signer.address()),
            ..self.clone()
        })
    }

    /// Delegate to a multisig account. Each signer must be a participant;
    /// participants without a signer stay unsigned.
    pub fn delegate_multisig(
        &self,
        params: &MultisigMetadata,
        sub_signers: &[AddressWithSigners],
    ) -> Result<Self, SigningError> {
        let msig_address = params.address();
        let mut msig = params.to_signature()?;
        for signer in sub_signers {
            let signature = signer.sign_logic_sig(&self.program, Some(&msig_address))?;
            msig = apply_multisig_subsignature(&msig, &signer.address(), signature)?;
        }
        debug!(
            account = %msig_address,
            signed = msig.signed_count(),
            threshold = msig.threshold,
            "delegated logic signature to multisig"
        );
        Ok(Self {
            signature: None,
            logic_multisignature: Some(msig),
            delegator: None,
            ..self.clone()
        })
    }

    /// The account this program authorizes for.
    pub fn address(&self) -> Address {
        if let Some(msig) = &self.logic_multisignature {
            return msig.address();
        }
        match (&self.signature, self.delegator) {
            (Some(_), Some(delegator)) => delegator,
            _ => program_address(&self.program),
        }
    }

    pub fn to_logic_signature(&self) -> LogicSignature {
        LogicSignature {
            logic: self.program.clone(),
            args: self.args.clone(),
            signature: self.signature,
            multisignature: None,
            logic_multisignature: self.logic_multisignature.clone(),
        }
    }

    pub fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SigningError> {
        let address = self.address();
        let mut stx = SignedTransaction::unsigned(tx.clone());
        stx.logic_signature = Some(self.to_logic_signature());
        if tx.sender != address {
            stx.auth_address = Some(address);
        }
        stx.validate()?;
        Ok(stx)
    }
}

impl TransactionSigner for LogicSigAccount {
    fn sign_transactions(&self, txs: &[Transaction], indexes: &[usize]) -> Result<Vec<Vec<u8>>, SigningError> {
        sign_indexed(txs, indexes, |tx| self.sign_transaction(tx))
    }
}
