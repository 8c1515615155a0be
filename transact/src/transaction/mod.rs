//! # Transaction Model
//!
//! Typed transactions, their wire mapping, and the pure operations that
//! prepare them for signing.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        - TransactionType and OnApplicationComplete (enum-by-value)
//! kinds.rs        - per-kind field groups (payment, assets, keyreg, app call)
//! state_proof.rs  - state-proof and heartbeat payloads
//! builder.rs      - Transaction, TransactionBody, TransactionBuilder
//! signed.rs       - SignedTransaction, MultisigSignature, LogicSignature
//! fees.rs         - size estimation and fee assignment
//! ops.rs          - encodings, ids, grouping
//! error.rs        - TransactionError
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** with [`TransactionBuilder`].
//! 2. **Price** with [`assign_fee`].
//! 3. **Group** (optional) with [`group_transactions`].
//! 4. **Sign** through [`crate::signing`].
//! 5. **Submit** the bytes from [`encode_signed_transaction`].
//!
//! Every step returns new values; nothing is mutated in place.

pub mod builder;
pub mod error;
pub mod fees;
pub mod kinds;
pub mod ops;
pub mod signed;
pub mod state_proof;
pub mod types;

pub use builder::{Transaction, TransactionBody, TransactionBuilder};
pub use error::TransactionError;
pub use fees::{assign_fee, calculate_fee, estimate_size, FeeParams};
pub use kinds::{
    ApplicationCallFields, AssetConfigFields, AssetFreezeFields, AssetParams, AssetTransferFields,
    BoxReference, KeyRegistrationFields, PaymentFields, StateSchema,
};
pub use ops::{
    compute_group, decode_signed_transaction, decode_signed_transactions, decode_transaction,
    decode_transactions, encode_signed_transaction, encode_signed_transactions, encode_transaction,
    encode_transaction_raw, encode_transactions, group_transactions, transaction_id, transaction_id_raw,
};
pub use signed::{LogicSignature, MultisigSignature, MultisigSubsignature, SignedTransaction};
pub use state_proof::{HeartbeatFields, HeartbeatProof, StateProof, StateProofFields, StateProofMessage};
pub use types::{OnApplicationComplete, TransactionType};
