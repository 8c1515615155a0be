//! Operations over the transaction model: byte encodings, identifiers, and
//! atomic grouping.
//!
//! ```text
//! encode_transaction_raw   canonical msgpack
//! encode_transaction       "TX" ‖ canonical msgpack      (what gets signed)
//! transaction_id_raw       SHA-512/256("TX" ‖ canonical msgpack)
//! transaction_id           base32, no padding, 52 chars
//! group id                 SHA-512/256("TG" ‖ msgpack({"txlist": [raw ids]}))
//! ```

use data_encoding::BASE32_NOPAD;
use tracing::debug;

use super::builder::Transaction;
use super::error::TransactionError;
use super::signed::SignedTransaction;
use crate::codec::{decode_entity, encode_entity, pack, CodecError, WireMap, WireValue};
use crate::config::{
    HASH_LENGTH, MAX_TX_GROUP_SIZE, TRANSACTION_DOMAIN, TRANSACTION_GROUP_DOMAIN, TRANSACTION_ID_LENGTH,
};
use crate::crypto::hash::{hash_with_domain, sha512_256};

// ---------------------------------------------------------------------------
// Transaction encoding
// ---------------------------------------------------------------------------

/// Canonical bytes of a transaction, without a domain prefix.
///
/// Every id, group and signature is derived from these bytes, so a
/// transaction that fails [`Transaction::validate`] never gets this far.
pub fn encode_transaction_raw(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    tx.validate()?;
    Ok(encode_entity(tx)?)
}

/// `"TX" ‖ canonical bytes`. This is the payload a transaction signature
/// covers.
pub fn encode_transaction(tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
    let raw = encode_transaction_raw(tx)?;
    let mut out = Vec::with_capacity(TRANSACTION_DOMAIN.len() + raw.len());
    out.extend_from_slice(TRANSACTION_DOMAIN);
    out.extend_from_slice(&raw);
    Ok(out)
}

/// Decode a transaction from either encoding. A leading `"TX"` is stripped;
/// canonical bytes never start with it because they open with a map header.
pub fn decode_transaction(bytes: &[u8]) -> Result<Transaction, TransactionError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput.into());
    }
    let body = bytes.strip_prefix(TRANSACTION_DOMAIN).unwrap_or(bytes);
    let tx: Transaction = decode_entity(body)?;
    tx.validate()?;
    Ok(tx)
}

pub fn encode_transactions(txs: &[Transaction]) -> Result<Vec<Vec<u8>>, TransactionError> {
    txs.iter().map(encode_transaction).collect()
}

pub fn decode_transactions<B: AsRef<[u8]>>(blobs: &[B]) -> Result<Vec<Transaction>, TransactionError> {
    blobs.iter().map(|b| decode_transaction(b.as_ref())).collect()
}

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Raw 32-byte transaction id.
///
/// Requires a genesis hash: without one the transaction cannot be submitted
/// anywhere and has no canonical id.
pub fn transaction_id_raw(tx: &Transaction) -> Result<[u8; HASH_LENGTH], TransactionError> {
    if tx.genesis_hash.is_none() {
        return Err(TransactionError::MissingGenesisHash);
    }
    Ok(sha512_256(&encode_transaction(tx)?))
}

/// Transaction id in its 52-character text form.
pub fn transaction_id(tx: &Transaction) -> Result<String, TransactionError> {
    let mut id = BASE32_NOPAD.encode(&transaction_id_raw(tx)?);
    id.truncate(TRANSACTION_ID_LENGTH);
    Ok(id)
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

/// Group id of an ordered list of transactions.
pub fn compute_group(txs: &[Transaction]) -> Result<[u8; HASH_LENGTH], TransactionError> {
    if txs.is_empty() {
        return Err(TransactionError::EmptyGroup);
    }
    if txs.len() > MAX_TX_GROUP_SIZE {
        return Err(TransactionError::GroupTooLarge {
            size: txs.len(),
            max: MAX_TX_GROUP_SIZE,
        });
    }
    if let Some(index) = txs.iter().position(|tx| tx.group.is_some()) {
        return Err(TransactionError::AlreadyGrouped { index });
    }

    let ids = txs
        .iter()
        .map(|tx| transaction_id_raw(tx).map(|id| WireValue::Bytes(id.to_vec())))
        .collect::<Result<Vec<_>, _>>()?;
    let mut map = WireMap::new();
    map.insert("txlist", WireValue::Array(ids));
    let encoded = pack(&WireValue::Map(map))?;

    Ok(hash_with_domain(TRANSACTION_GROUP_DOMAIN, &[encoded.as_slice()]))
}

/// Bind transactions into an atomic group: either all are confirmed or
/// none is. Returns copies with `group` set; the inputs are untouched.
pub fn group_transactions(txs: &[Transaction]) -> Result<Vec<Transaction>, TransactionError> {
    let group = compute_group(txs)?;
    debug!(size = txs.len(), group = %BASE32_NOPAD.encode(&group), "formed transaction group");
    Ok(txs
        .iter()
        .cloned()
        .map(|mut tx| {
            tx.group = Some(group);
            tx
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Signed transactions
// ---------------------------------------------------------------------------

/// Validate and encode a signed transaction.
pub fn encode_signed_transaction(stx: &SignedTransaction) -> Result<Vec<u8>, TransactionError> {
    stx.validate()?;
    Ok(encode_entity(stx)?)
}

/// Decode and validate a signed transaction.
pub fn decode_signed_transaction(bytes: &[u8]) -> Result<SignedTransaction, TransactionError> {
    let stx: SignedTransaction = decode_entity(bytes)?;
    stx.validate()?;
    Ok(stx)
}

pub fn encode_signed_transactions(stxs: &[SignedTransaction]) -> Result<Vec<Vec<u8>>, TransactionError> {
    stxs.iter().map(encode_signed_transaction).collect()
}

pub fn decode_signed_transactions<B: AsRef<[u8]>>(
    blobs: &[B],
) -> Result<Vec<SignedTransaction>, TransactionError> {
    blobs.iter().map(|b| decode_signed_transaction(b.as_ref())).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
