//! Size estimation and fee assignment.
//!
//! ```text
//! size = len(canonical bytes with fee cleared) + signature overhead
//! fee  = max(fee_per_byte * size, min_fee) + extra_fee
//! ```
//!
//! The size is measured with the fee field cleared, so assigning a fee to a
//! transaction that already has one gives the same result as assigning it to
//! a fresh one.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::builder::Transaction;
use super::error::TransactionError;
use super::ops::encode_transaction_raw;
use crate::config::{DEFAULT_FEE_PER_BYTE, DEFAULT_MIN_FEE, SIGNATURE_ENCODING_INCR};

/// Fee parameters, typically taken from the network's suggested params.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeParams {
    pub fee_per_byte: u64,
    pub min_fee: u64,
    /// Added after the minimum is applied, e.g. to cover inner transactions.
    #[serde(default)]
    pub extra_fee: Option<u64>,
    /// Reject fees above this cap.
    #[serde(default)]
    pub max_fee: Option<u64>,
}

impl Default for FeeParams {
    fn default() -> Self {
        Self {
            fee_per_byte: DEFAULT_FEE_PER_BYTE,
            min_fee: DEFAULT_MIN_FEE,
            extra_fee: None,
            max_fee: None,
        }
    }
}

/// Estimated size of the signed transaction in bytes.
pub fn estimate_size(tx: &Transaction) -> Result<usize, TransactionError> {
    Ok(encode_transaction_raw(tx)?.len() + SIGNATURE_ENCODING_INCR)
}

/// Compute the fee for `tx` under `params`.
pub fn calculate_fee(tx: &Transaction, params: &FeeParams) -> Result<u64, TransactionError> {
    let mut without_fee = tx.clone();
    without_fee.fee = None;
    let size = estimate_size(&without_fee)? as u64;

    let fee = params
        .fee_per_byte
        .checked_mul(size)
        .ok_or(TransactionError::FeeOverflow)?
        .max(params.min_fee)
        .checked_add(params.extra_fee.unwrap_or(0))
        .ok_or(TransactionError::FeeOverflow)?;

    if let Some(max_fee) = params.max_fee {
        if fee > max_fee {
            return Err(TransactionError::FeeTooHigh { fee, max_fee });
        }
    }
    Ok(fee)
}

/// Return a copy of `tx` with its fee set by [`calculate_fee`].
pub fn assign_fee(tx: &Transaction, params: &FeeParams) -> Result<Transaction, TransactionError> {
    let fee = calculate_fee(tx, params)?;
    debug!(fee, fee_per_byte = params.fee_per_byte, "assigned transaction fee");
    let mut out = tx.clone();
    // A zero fee is absent on the wire.
    out.fee = (fee > 0).then_some(fee);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address;
    use crate::transaction::{PaymentFields, TransactionBody, TransactionBuilder};

    fn tx() -> Transaction {
        TransactionBuilder::new(TransactionBody::Payment(PaymentFields {
            receiver: Address::from_public_key([2u8; 32]),
            amount: 1_000_000,
            close_remainder_to: None,
        }))
        .sender(Address::from_public_key([1u8; 32]))
        .validity(1, 1_000)
        .genesis_hash([3u8; 32])
        .build()
        .unwrap()
    }

    #[test]
    fn size_includes_signature_overhead() {
        let raw = encode_transaction_raw(&tx()).unwrap();
        assert_eq!(estimate_size(&tx()).unwrap(), raw.len() + 75);
    }

    #[test]
    fn min_fee_applies_when_per_byte_is_zero() {
        assert_eq!(calculate_fee(&tx(), &FeeParams::default()).unwrap(), 1_000);
    }

    #[test]
    fn per_byte_fee_scales_with_size() {
        let params = FeeParams {
            fee_per_byte: 100,
            min_fee: 1_000,
            ..Default::default()
        };
        let size = estimate_size(&tx()).unwrap() as u64;
        assert_eq!(calculate_fee(&tx(), &params).unwrap(), 100 * size);
    }

    #[test]
    fn extra_fee_is_added_after_minimum() {
        let params = FeeParams {
            extra_fee: Some(2_000),
            ..Default::default()
        };
        assert_eq!(calculate_fee(&tx(), &params).unwrap(), 3_000);
    }

    #[test]
    fn max_fee_is_enforced() {
        let params = FeeParams {
            min_fee: 5_000,
            max_fee: Some(4_000),
            ..Default::default()
        };
        assert_eq!(
            calculate_fee(&tx(), &params).unwrap_err(),
            TransactionError::FeeTooHigh {
                fee: 5_000,
                max_fee: 4_000
            }
        );
    }

    #[test]
    fn overflow_is_reported() {
        let params = FeeParams {
            fee_per_byte: u64::MAX,
            ..Default::default()
        };
        assert_eq!(calculate_fee(&tx(), &params).unwrap_err(), TransactionError::FeeOverflow);
    }

    #[test]
    fn assign_fee_is_idempotent() {
        let params = FeeParams {
            fee_per_byte: 10,
            min_fee: 0,
            ..Default::default()
        };
        let once = assign_fee(&tx(), &params).unwrap();
        let twice = assign_fee(&once, &params).unwrap();
        assert_eq!(once.fee, twice.fee);
        assert!(once.fee.unwrap() > 0);
    }

    #[test]
    fn zero_fee_is_assigned_as_absent() {
        let params = FeeParams {
            fee_per_byte: 0,
            min_fee: 0,
            ..Default::default()
        };
        let free = assign_fee(&tx(), &params).unwrap();
        assert_eq!(free.fee, None);
        let bytes = encode_transaction_raw(&free).unwrap();
        assert_eq!(crate::transaction::decode_transaction(&bytes).unwrap(), free);
    }

    #[test]
    fn assign_fee_leaves_input_untouched() {
        let original = tx();
        let _ = assign_fee(&original, &FeeParams::default()).unwrap();
        assert_eq!(original.fee, None);
    }

    #[test]
    fn fee_params_json() {
        let params: FeeParams = serde_json::from_str(r#"{"fee_per_byte":0,"min_fee":1000}"#).unwrap();
        assert_eq!(params, FeeParams::default());
    }
}
