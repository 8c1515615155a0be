//! Multisignature construction and aggregation.
//!
//! A multisig starts empty, one unsigned slot per participant, and fills up
//! as participants sign:
//!
//! ```text
//! new_multisig_signature(v, thr, [A, B, C])   -> [A:-, B:-, C:-]
//! apply_multisig_subsignature(.., A, sigA)     -> [A:✓, B:-, C:-]
//! merge_multisignatures(x, [A:-, B:-, C:✓])    -> [A:✓, B:-, C:✓]
//! ```
//!
//! Every operation returns a new value. Participants are matched by public
//! key; a key listed twice fills both of its slots.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SigningError;
use crate::address::Address;
use crate::config::SIGNATURE_LENGTH;
use crate::transaction::signed::multisig_address;
use crate::transaction::{MultisigSignature, MultisigSubsignature};

/// The parameters that define a multisig account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigMetadata {
    pub version: u8,
    pub threshold: u8,
    /// Order matters: it is part of the account address.
    pub participants: Vec<Address>,
}

impl MultisigMetadata {
    pub fn address(&self) -> Address {
        multisig_address(self.version, self.threshold, self.participants.iter())
    }

    /// The empty multisig for these parameters.
    pub fn to_signature(&self) -> Result<MultisigSignature, SigningError> {
        new_multisig_signature(self.version, self.threshold, &self.participants)
    }
}

impl From<&MultisigSignature> for MultisigMetadata {
    fn from(msig: &MultisigSignature) -> Self {
        Self {
            version: msig.version,
            threshold: msig.threshold,
            participants: msig.participants(),
        }
    }
}

fn check_parameters(version: u8, threshold: u8, participants: usize) -> Result<(), SigningError> {
    if version == 0 {
        return Err(SigningError::InvalidVersion);
    }
    if participants == 0 {
        return Err(SigningError::EmptyParticipants);
    }
    if threshold == 0 || threshold as usize > participants {
        return Err(SigningError::InvalidThreshold {
            threshold,
            participants,
        });
    }
    Ok(())
}

/// An unsigned multisig over `participants`, in the given order.
pub fn new_multisig_signature(
    version: u8,
    threshold: u8,
    participants: &[Address],
) -> Result<MultisigSignature, SigningError> {
    check_parameters(version, threshold, participants.len())?;
    Ok(MultisigSignature {
        version,
        threshold,
        subsignatures: participants.iter().copied().map(MultisigSubsignature::unsigned).collect(),
    })
}

/// Place `signature` in every slot belonging to `participant`.
pub fn apply_multisig_subsignature(
    msig: &MultisigSignature,
    participant: &Address,
    signature: [u8; SIGNATURE_LENGTH],
) -> Result<MultisigSignature, SigningError> {
    let mut out = msig.clone();
    let mut applied = false;
    for slot in out.subsignatures.iter_mut().filter(|s| s.public_key == *participant) {
        slot.signature = Some(signature);
        applied = true;
    }
    if !applied {
        return Err(SigningError::NotAParticipant { address: *participant });
    }
    debug!(
        participant = %participant,
        signed = out.signed_count(),
        threshold = out.threshold,
        "applied multisig subsignature"
    );
    Ok(out)
}

/// Combine two partial signature sets over the same account.
///
/// Version, threshold, and the ordered participant list must agree. Where
/// both carry a signature for a slot, `other`'s wins.
pub fn merge_multisignatures(
    msig: &MultisigSignature,
    other: &MultisigSignature,
) -> Result<MultisigSignature, SigningError> {
    if msig.version != other.version {
        return Err(SigningError::MultisigMismatch { field: "version" });
    }
    if msig.threshold != other.threshold {
        return Err(SigningError::MultisigMismatch { field: "threshold" });
    }
    if msig.participants() != other.participants() {
        return Err(SigningError::MultisigMismatch { field: "participants" });
    }

    let subsignatures = msig
        .subsignatures
        .iter()
        .zip(&other.subsignatures)
        .map(|(a, b)| MultisigSubsignature {
            public_key: a.public_key,
            signature: b.signature.or(a.signature),
        })
        .collect();
    let merged = MultisigSignature {
        version: msig.version,
        threshold: msig.threshold,
        subsignatures,
    };
    debug!(signed = merged.signed_count(), threshold = merged.threshold, "merged multisignatures");
    Ok(merged)
}

/// Account address of a multisig, from its version, threshold and ordered
/// participant keys. Signatures do not affect it.
pub fn address_from_multisig_signature(msig: &MultisigSignature) -> Address {
    msig.address()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_public_key([b; 32])
    }

    #[test]
    fn new_rejects_bad_parameters() {
        assert_eq!(
            new_multisig_signature(0, 1, &[addr(1)]).unwrap_err(),
            SigningError::InvalidVersion
        );
        assert_eq!(
            new_multisig_signature(1, 1, &[]).unwrap_err(),
            SigningError::EmptyParticipants
        );
        assert_eq!(
            new_multisig_signature(1, 0, &[addr(1)]).unwrap_err(),
            SigningError::InvalidThreshold {
                threshold: 0,
                participants: 1
            }
        );
        assert_eq!(
            new_multisig_signature(1, 3, &[addr(1), addr(2)]).unwrap_err(),
            SigningError::InvalidThreshold {
                threshold: 3,
                participants: 2
            }
        );
    }

    #[test]
    fn new_is_unsigned_and_ordered() {
        let msig = new_multisig_signature(1, 2, &[addr(1), addr(2)]).unwrap();
        assert_eq!(msig.participants(), vec![addr(1), addr(2)]);
        assert_eq!(msig.signed_count(), 0);
        assert!(!msig.is_fully_signed());
    }

    #[test]
    fn two_of_two_flow() {
        let empty = new_multisig_signature(2, 2, &[addr(1), addr(2)]).unwrap();
        let one = apply_multisig_subsignature(&empty, &addr(1), [0xaa; 64]).unwrap();
        assert!(!one.is_fully_signed());
        assert_eq!(empty.signed_count(), 0);
        let both = apply_multisig_subsignature(&one, &addr(2), [0xbb; 64]).unwrap();
        assert!(both.is_fully_signed());
        assert_eq!(both.subsignatures[0].signature, Some([0xaa; 64]));
        assert_eq!(both.subsignatures[1].signature, Some([0xbb; 64]));
    }

    #[test]
    fn apply_rejects_outsider() {
        let msig = new_multisig_signature(1, 1, &[addr(1)]).unwrap();
        assert_eq!(
            apply_multisig_subsignature(&msig, &addr(9), [0u8; 64]).unwrap_err(),
            SigningError::NotAParticipant { address: addr(9) }
        );
    }

    #[test]
    fn apply_fills_duplicate_slots() {
        let msig = new_multisig_signature(1, 2, &[addr(1), addr(1)]).unwrap();
        let signed = apply_multisig_subsignature(&msig, &addr(1), [1u8; 64]).unwrap();
        assert_eq!(signed.signed_count(), 2);
    }

    #[test]
    fn merge_combines_and_last_wins() {
        let empty = new_multisig_signature(1, 2, &[addr(1), addr(2)]).unwrap();
        let a = apply_multisig_subsignature(&empty, &addr(1), [1u8; 64]).unwrap();
        let b = apply_multisig_subsignature(&empty, &addr(2), [2u8; 64]).unwrap();
        let merged = merge_multisignatures(&a, &b).unwrap();
        assert!(merged.is_fully_signed());

        let a2 = apply_multisig_subsignature(&empty, &addr(1), [3u8; 64]).unwrap();
        let merged = merge_multisignatures(&a, &a2).unwrap();
        assert_eq!(merged.subsignatures[0].signature, Some([3u8; 64]));

        // A null on the right does not erase the left.
        let merged = merge_multisignatures(&a, &empty).unwrap();
        assert_eq!(merged.subsignatures[0].signature, Some([1u8; 64]));
    }

    #[test]
    fn merge_rejects_mismatch() {
        let a = new_multisig_signature(1, 1, &[addr(1), addr(2)]).unwrap();
        let version = new_multisig_signature(2, 1, &[addr(1), addr(2)]).unwrap();
        let threshold = new_multisig_signature(1, 2, &[addr(1), addr(2)]).unwrap();
        let order = new_multisig_signature(1, 1, &[addr(2), addr(1)]).unwrap();
        assert_eq!(
            merge_multisignatures(&a, &version).unwrap_err(),
            SigningError::MultisigMismatch { field: "version" }
        );
        assert_eq!(
            merge_multisignatures(&a, &threshold).unwrap_err(),
            SigningError::MultisigMismatch { field: "threshold" }
        );
        assert_eq!(
            merge_multisignatures(&a, &order).unwrap_err(),
            SigningError::MultisigMismatch { field: "participants" }
        );
    }

    #[test]
    fn address_ignores_signatures() {
        let empty = new_multisig_signature(1, 2, &[addr(1), addr(2)]).unwrap();
        let signed = apply_multisig_subsignature(&empty, &addr(1), [1u8; 64]).unwrap();
        assert_eq!(
            address_from_multisig_signature(&empty),
            address_from_multisig_signature(&signed)
        );
        let other_threshold = new_multisig_signature(1, 1, &[addr(1), addr(2)]).unwrap();
        let other_version = new_multisig_signature(2, 2, &[addr(1), addr(2)]).unwrap();
        assert_ne!(empty.address(), other_threshold.address());
        assert_ne!(empty.address(), other_version.address());
    }

    #[test]
    fn metadata_matches_signature() {
        let meta = MultisigMetadata {
            version: 1,
            threshold: 1,
            participants: vec![addr(1), addr(2)],
        };
        let msig = meta.to_signature().unwrap();
        assert_eq!(meta.address(), msig.address());
        assert_eq!(MultisigMetadata::from(&msig), meta);
    }
}
