//! A multisig account that signs transactions with its locally available
//! participants.

use tracing::debug;

use super::multisig::{apply_multisig_subsignature, MultisigMetadata};
use super::signer::{sign_indexed, AddressWithSigners, TransactionSigner};
use super::SigningError;
use crate::address::Address;
use crate::transaction::{encode_transaction, SignedTransaction, Transaction};

/// Multisig parameters plus signers for some (not necessarily all) of the
/// participants.
#[derive(Debug, Clone)]
pub struct MultisigAccount {
    params: MultisigMetadata,
    address: Address,
    sub_signers: Vec<AddressWithSigners>,
}

impl MultisigAccount {
    /// Every sub-signer must be a participant. Having fewer signers than the
    /// threshold is allowed; the result is a partial signature to be merged
    /// later.
    pub fn new(params: MultisigMetadata, sub_signers: Vec<AddressWithSigners>) -> Result<Self, SigningError> {
        // Validates version, threshold and participant count.
        params.to_signature()?;
        if let Some(outsider) = sub_signers
            .iter()
            .find(|s| !params.participants.contains(&s.address()))
        {
            return Err(SigningError::NotAParticipant {
                address: outsider.address(),
            });
        }
        Ok(Self {
            address: params.address(),
            params,
            sub_signers,
        })
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn params(&self) -> &MultisigMetadata {
        &self.params
    }

    /// Sign one transaction with every available sub-signer.
    pub fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, SigningError> {
        let payload = encode_transaction(tx)?;
        let mut msig = self.params.to_signature()?;
        for signer in &self.sub_signers {
            let signature = signer.sign_raw_payload(&payload)?;
            msig = apply_multisig_subsignature(&msig, &signer.address(), signature)?;
        }
        debug!(
            account = %self.address,
            signed = msig.signed_count(),
            threshold = msig.threshold,
            "multisig account signed transaction"
        );

        let mut stx = SignedTransaction::unsigned(tx.clone());
        stx.multisignature = Some(msig);
        if tx.sender != self.address {
            stx.auth_address = Some(self.address);
        }
        stx.validate()?;
        Ok(stx)
    }
}

impl TransactionSigner for MultisigAccount {
    fn sign_transactions(&self, txs: &[Transaction], indexes: &[usize]) -> Result<Vec<Vec<u8>>, SigningError> {
        sign_indexed(txs, indexes, |tx| self.sign_transaction(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Ed25519Keypair;
    use crate::transaction::{decode_signed_transaction, PaymentFields, TransactionBody, TransactionBuilder};

    fn signer(seed: u8) -> AddressWithSigners {
        AddressWithSigners::from_keypair(Ed25519Keypair::from_seed(&[seed; 32]))
    }

    fn params(threshold: u8) -> MultisigMetadata {
        MultisigMetadata {
            version: 1,
            threshold,
            participants: vec![signer(1).address(), signer(2).address(), signer(3).address()],
        }
    }

    fn tx(sender: Address) -> Transaction {
        TransactionBuilder::new(TransactionBody::Payment(PaymentFields {
            receiver: Address::from_public_key([8u8; 32]),
            amount: 5,
            close_remainder_to: None,
        }))
        .sender(sender)
        .fee(1_000)
        .validity(10, 20)
        .genesis_hash([1u8; 32])
        .build()
        .unwrap()
    }

    #[test]
    fn signs_with_available_participants() {
        let account = MultisigAccount::new(params(2), vec![signer(1), signer(3)]).unwrap();
        let stx = account.sign_transaction(&tx(account.address())).unwrap();
        let msig = stx.multisignature.as_ref().unwrap();
        assert!(msig.is_fully_signed());
        assert!(msig.subsignatures[1].signature.is_none());
        assert_eq!(stx.auth_address, None);
        assert_eq!(msig.address(), account.address());
    }

    #[test]
    fn rekeyed_sender_sets_auth_address() {
        let account = MultisigAccount::new(params(1), vec![signer(2)]).unwrap();
        let stx = account.sign_transaction(&tx(Address::from_public_key([7u8; 32]))).unwrap();
        assert_eq!(stx.auth_address, Some(account.address()));
    }

    #[test]
    fn rejects_outsider_signer() {
        assert_eq!(
            MultisigAccount::new(params(1), vec![signer(9)]).unwrap_err(),
            SigningError::NotAParticipant {
                address: signer(9).address()
            }
        );
    }

    #[test]
    fn rejects_bad_threshold() {
        assert!(matches!(
            MultisigAccount::new(params(4), vec![]),
            Err(SigningError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn batch_output_decodes() {
        let account = MultisigAccount::new(params(2), vec![signer(1), signer(2)]).unwrap();
        let txs = vec![tx(account.address()), tx(account.address())];
        let blobs = account.sign_transactions(&txs, &[0, 1]).unwrap();
        assert_eq!(blobs.len(), 2);
        let stx = decode_signed_transaction(&blobs[0]).unwrap();
        assert_eq!(stx.multisignature.unwrap().signed_count(), 2);
    }
}
