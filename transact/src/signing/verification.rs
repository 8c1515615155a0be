//! Signature verification in each signing domain.
//!
//! Each function rebuilds the tagged payload for its domain and checks the
//! signature over it, so a signature produced for one domain fails here for
//! every other. Verification uses the strict Ed25519 rules (no small-order
//! keys, canonical `S`).
//!
//! Failures are reported as [`SigningError::VerificationFailed`] without
//! saying which check failed.

use ed25519_dalek::{Signature, VerifyingKey};
use tracing::debug;

use super::signer::{bytes_payload, logic_sig_payload, program_data_payload};
use super::SigningError;
use crate::address::Address;
use crate::config::SIGNATURE_LENGTH;
use crate::transaction::{encode_transaction, LogicSignature, MultisigSignature, SignedTransaction, Transaction};

fn verify_raw(
    public_key: &Address,
    message: &[u8],
    signature: &[u8; SIGNATURE_LENGTH],
) -> Result<(), SigningError> {
    let key = VerifyingKey::from_bytes(public_key.as_bytes()).map_err(|_| SigningError::InvalidPublicKey)?;
    key.verify_strict(message, &Signature::from_bytes(signature))
        .map_err(|_| SigningError::VerificationFailed)
}

/// Check a plain transaction signature made by `signer`.
pub fn verify_transaction_signature(
    tx: &Transaction,
    signer: &Address,
    signature: &[u8; SIGNATURE_LENGTH],
) -> Result<(), SigningError> {
    verify_raw(signer, &encode_transaction(tx)?, signature)
}

/// Check data signed by `signer` for the program at `program_address`.
pub fn verify_program_data(
    data: &[u8],
    program_address: &Address,
    signer: &Address,
    signature: &[u8; SIGNATURE_LENGTH],
) -> Result<(), SigningError> {
    verify_raw(signer, &program_data_payload(program_address, data), signature)
}

/// Check bytes signed under the `MX` tag.
pub fn verify_bytes(data: &[u8], signer: &Address, signature: &[u8; SIGNATURE_LENGTH]) -> Result<(), SigningError> {
    verify_raw(signer, &bytes_payload(data), signature)
}

/// Check a multisig over `payload`: the structure must be valid, every
/// present subsignature must verify, and at least `threshold` must be
/// present.
pub fn verify_multisig(msig: &MultisigSignature, payload: &[u8]) -> Result<(), SigningError> {
    msig.validate()?;
    let mut valid = 0usize;
    for sub in &msig.subsignatures {
        if let Some(signature) = &sub.signature {
            verify_raw(&sub.public_key, payload, signature)?;
            valid += 1;
        }
    }
    if valid < msig.threshold as usize {
        debug!(valid, threshold = msig.threshold, "multisig below threshold");
        return Err(SigningError::VerificationFailed);
    }
    Ok(())
}

/// Check that `lsig` authorizes for `account`.
///
/// An undelegated program only authorizes for its own escrow address.
pub fn verify_logic_sig_delegation(lsig: &LogicSignature, account: &Address) -> Result<(), SigningError> {
    lsig.validate()?;
    if let Some(signature) = &lsig.signature {
        return verify_raw(account, &logic_sig_payload(&lsig.logic, None), signature);
    }
    if let Some(msig) = &lsig.logic_multisignature {
        if msig.address() != *account {
            return Err(SigningError::VerificationFailed);
        }
        return verify_multisig(msig, &logic_sig_payload(&lsig.logic, Some(account)));
    }
    if let Some(msig) = &lsig.multisignature {
        if msig.address() != *account {
            return Err(SigningError::VerificationFailed);
        }
        return verify_multisig(msig, &logic_sig_payload(&lsig.logic, None));
    }
    if lsig.escrow_address() != *account {
        return Err(SigningError::VerificationFailed);
    }
    Ok(())
}

/// Check whichever authorization a signed transaction carries against its
/// signer address (`sgnr` if set, else the sender). An unsigned envelope
/// fails.
pub fn verify_signed_transaction(stx: &SignedTransaction) -> Result<(), SigningError> {
    stx.validate()?;
    let signer = stx.signer_address();
    if let Some(signature) = &stx.signature {
        return verify_transaction_signature(&stx.transaction, &signer, signature);
    }
    if let Some(msig) = &stx.multisignature {
        if msig.address() != signer {
            return Err(SigningError::VerificationFailed);
        }
        return verify_multisig(msig, &encode_transaction(&stx.transaction)?);
    }
    if let Some(lsig) = &stx.logic_signature {
        return verify_logic_sig_delegation(lsig, &signer);
    }
    Err(SigningError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Ed25519Keypair;
    use crate::signing::{
        AddressWithSigners, BytesSigner, LogicSigAccount, LogicSigSigner, MultisigAccount, MultisigMetadata,
        ProgramDataSigner,
    };
    use crate::transaction::{PaymentFields, TransactionBody, TransactionBuilder};

    fn signer(seed: u8) -> AddressWithSigners {
        AddressWithSigners::from_keypair(Ed25519Keypair::from_seed(&[seed; 32]))
    }

    fn tx(sender: Address) -> Transaction {
        TransactionBuilder::new(TransactionBody::Payment(PaymentFields {
            receiver: Address::from_public_key([8u8; 32]),
            amount: 5,
            close_remainder_to: None,
        }))
        .sender(sender)
        .fee(1_000)
        .validity(1, 100)
        .genesis_hash([1u8; 32])
        .build()
        .unwrap()
    }

    #[test]
    fn transaction_signature_verifies() {
        let alice = signer(1);
        let stx = alice.sign_transaction(&tx(alice.address())).unwrap();
        assert!(verify_signed_transaction(&stx).is_ok());

        let mut tampered = stx.clone();
        tampered.transaction.fee = Some(2_000);
        assert_eq!(
            verify_signed_transaction(&tampered).unwrap_err(),
            SigningError::VerificationFailed
        );
    }

    #[test]
    fn signatures_do_not_cross_domains() {
        let alice = signer(1);
        let program = alice.address();
        let data = b"same bytes";

        let bytes_sig = alice.sign_bytes(data).unwrap();
        let data_sig = alice.sign_program_data(data, &program).unwrap();
        let lsig_sig = alice.sign_logic_sig(data, None).unwrap();

        assert!(verify_bytes(data, &alice.address(), &bytes_sig).is_ok());
        assert!(verify_program_data(data, &program, &alice.address(), &data_sig).is_ok());

        assert!(verify_program_data(data, &program, &alice.address(), &bytes_sig).is_err());
        assert!(verify_bytes(data, &alice.address(), &data_sig).is_err());
        assert!(verify_bytes(data, &alice.address(), &lsig_sig).is_err());

        // A transaction signature is not an MX signature over the same bytes.
        let t = tx(alice.address());
        let tx_sig = alice.sign_transaction(&t).unwrap().signature.unwrap();
        let raw = crate::transaction::encode_transaction_raw(&t).unwrap();
        assert!(verify_bytes(&raw, &alice.address(), &tx_sig).is_err());
    }

    #[test]
    fn wrong_key_fails() {
        let sig = signer(1).sign_bytes(b"x").unwrap();
        assert_eq!(
            verify_bytes(b"x", &signer(2).address(), &sig).unwrap_err(),
            SigningError::VerificationFailed
        );
    }

    #[test]
    fn multisig_threshold_is_enforced() {
        let params = MultisigMetadata {
            version: 1,
            threshold: 2,
            participants: vec![signer(1).address(), signer(2).address()],
        };
        let full = MultisigAccount::new(params.clone(), vec![signer(1), signer(2)]).unwrap();
        let partial = MultisigAccount::new(params, vec![signer(1)]).unwrap();
        let t = tx(full.address());

        assert!(verify_signed_transaction(&full.sign_transaction(&t).unwrap()).is_ok());
        assert_eq!(
            verify_signed_transaction(&partial.sign_transaction(&t).unwrap()).unwrap_err(),
            SigningError::VerificationFailed
        );
    }

    #[test]
    fn logic_sig_paths() {
        let program = vec![0x06, 0x81, 0x01];
        let escrow = LogicSigAccount::new(program.clone(), vec![]).unwrap();
        assert!(verify_signed_transaction(&escrow.sign_transaction(&tx(escrow.address())).unwrap()).is_ok());

        let delegated = escrow.delegate(&signer(1)).unwrap();
        let stx = delegated.sign_transaction(&tx(signer(1).address())).unwrap();
        assert!(verify_signed_transaction(&stx).is_ok());
        // Delegation by alice does not authorize for bob.
        assert!(verify_logic_sig_delegation(stx.logic_signature.as_ref().unwrap(), &signer(2).address()).is_err());

        let params = MultisigMetadata {
            version: 1,
            threshold: 1,
            participants: vec![signer(1).address(), signer(2).address()],
        };
        let msig_delegated = escrow.delegate_multisig(&params, &[signer(2)]).unwrap();
        let stx = msig_delegated.sign_transaction(&tx(params.address())).unwrap();
        assert!(verify_signed_transaction(&stx).is_ok());
    }

    #[test]
    fn unsigned_envelope_fails() {
        let stx = SignedTransaction::unsigned(tx(signer(1).address()));
        assert_eq!(
            verify_signed_transaction(&stx).unwrap_err(),
            SigningError::VerificationFailed
        );
    }
}
