//! # Protocol Configuration & Constants
//!
//! Every magic number the codec and signing engine depend on lives here.
//! These values are part of the wire contract shared with every other
//! implementation of the protocol, so none of them are configurable at
//! runtime. Change one and your transactions stop being valid everywhere
//! else.
//!
//! The only runtime knob is fee configuration, which lives in
//! [`crate::transaction::FeeParams`] and defaults to the values below.

// ---------------------------------------------------------------------------
// Key & Signature Material
// ---------------------------------------------------------------------------

/// Ed25519 public key length in bytes. Also the length of an address payload.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Output length of SHA-512/256, the protocol's only hash function.
pub const HASH_LENGTH: usize = 32;

/// Number of trailing hash bytes appended to a public key as its checksum.
pub const CHECKSUM_LENGTH: usize = 4;

/// Textual address length: base32 of 36 bytes (key + checksum), unpadded.
pub const ADDRESS_LENGTH: usize = 58;

/// Textual transaction id length: base32 of a 32-byte hash, unpadded.
pub const TRANSACTION_ID_LENGTH: usize = 52;

/// Key registration carries a 64-byte state proof key.
pub const STATE_PROOF_KEY_LENGTH: usize = 64;

// ---------------------------------------------------------------------------
// Domain Separators
// ---------------------------------------------------------------------------
//
// Each signing or hashing context prepends one of these tags. Two contexts
// never share a tag, so bytes produced for one can never be valid in another.

/// Prefix of every transaction encoding that gets signed or hashed into an id.
pub const TRANSACTION_DOMAIN: &[u8] = b"TX";

/// Prefix of the encoded id list hashed into a group id.
pub const TRANSACTION_GROUP_DOMAIN: &[u8] = b"TG";

/// Prefix for program hashing (escrow address) and single-key delegation.
pub const PROGRAM_DOMAIN: &[u8] = b"Program";

/// Prefix for delegation by a specific multisig address.
pub const MULTISIG_PROGRAM_DOMAIN: &[u8] = b"MsigProgram";

/// Prefix for data signed on behalf of a program address.
pub const PROGRAM_DATA_DOMAIN: &[u8] = b"ProgData";

/// Prefix for arbitrary application bytes.
pub const BYTES_DOMAIN: &[u8] = b"MX";

/// Prefix for multisig address derivation.
pub const MULTISIG_ADDRESS_DOMAIN: &[u8] = b"MultisigAddr";

// ---------------------------------------------------------------------------
// Transaction Limits
// ---------------------------------------------------------------------------

/// Maximum number of transactions bound into one atomic group.
pub const MAX_TX_GROUP_SIZE: usize = 16;

/// Bytes a single signature adds to an encoded signed transaction: the
/// `sig` key, the 64-byte bin payload and its header, plus the `txn`
/// envelope. Added to the raw size when estimating fees.
pub const SIGNATURE_ENCODING_INCR: usize = 75;

// ---------------------------------------------------------------------------
// Codec Limits
// ---------------------------------------------------------------------------

/// Recursion budget of the msgpack reader. Each container level spends two
/// steps and each string or byte leaf one more, so the deepest protocol
/// structure (a Merkle path inside a state proof reveal inside a signed
/// transaction, nine containers) needs about twenty.
pub const MAX_WIRE_DEPTH: usize = 64;

// ---------------------------------------------------------------------------
// Fee Parameters
// ---------------------------------------------------------------------------

/// Protocol minimum fee per transaction, in the smallest unit.
pub const DEFAULT_MIN_FEE: u64 = 1_000;

/// Default per-byte fee. Zero outside of congestion.
pub const DEFAULT_FEE_PER_BYTE: u64 = 0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_tags_are_distinct() {
        let tags = [
            TRANSACTION_DOMAIN,
            TRANSACTION_GROUP_DOMAIN,
            PROGRAM_DOMAIN,
            MULTISIG_PROGRAM_DOMAIN,
            PROGRAM_DATA_DOMAIN,
            BYTES_DOMAIN,
            MULTISIG_ADDRESS_DOMAIN,
        ];
        for (i, a) in tags.iter().enumerate() {
            for b in tags.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_text_lengths_match_base32() {
        // ceil(bits / 5)
        assert_eq!(ADDRESS_LENGTH, ((PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH) * 8 + 4) / 5);
        assert_eq!(TRANSACTION_ID_LENGTH, (HASH_LENGTH * 8 + 4) / 5);
    }

    #[test]
    fn test_signature_overhead_covers_signature() {
        assert!(SIGNATURE_ENCODING_INCR > SIGNATURE_LENGTH);
    }
}
