//! Errors for transaction validation and the operations built on the codec.

use thiserror::Error;

use crate::codec::CodecError;

/// Errors raised while building, validating, encoding, or grouping
/// transactions.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransactionError {
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// An id was requested for a transaction without a genesis hash.
    #[error("transaction has no genesis hash; cannot compute its id")]
    MissingGenesisHash,

    #[error("cannot group an empty list of transactions")]
    EmptyGroup,

    #[error("group of {size} transactions exceeds the maximum of {max}")]
    GroupTooLarge { size: usize, max: usize },

    #[error("transaction at index {index} is already part of a group")]
    AlreadyGrouped { index: usize },

    #[error("invalid validity window: first valid {first_valid} is after last valid {last_valid}")]
    InvalidValidityWindow { first_valid: u64, last_valid: u64 },

    #[error("calculated fee {fee} exceeds the maximum of {max_fee}")]
    FeeTooHigh { fee: u64, max_fee: u64 },

    #[error("fee calculation overflowed")]
    FeeOverflow,

    /// More than one of signature, multisig, logic signature is set.
    #[error("signed transaction carries {count} authorizations; at most one is allowed")]
    ConflictingAuthorization { count: usize },

    #[error("invalid multisig: {reason}")]
    InvalidMultisig { reason: String },

    #[error("invalid logic signature: {reason}")]
    InvalidLogicSig { reason: String },
}
