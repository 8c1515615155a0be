//! The [`Transaction`] entity and its fluent builder.
//!
//! A transaction is a set of common fields plus exactly one kind-specific
//! field group. In memory the group is a [`TransactionBody`] variant; on the
//! wire its keys are inlined next to the common ones and the `type` key
//! says which group they belong to.
//!
//! Encoding dispatches on the body variant. Decoding only has the flat map,
//! so every flattened descriptor carries a presence predicate that checks
//! the raw `type` value, and the first group whose predicate holds is
//! decoded. A `type` nothing recognizes yields [`TransactionBody::Unknown`].

use tracing::warn;

use super::error::TransactionError;
use super::kinds::{
    ApplicationCallFields, AssetConfigFields, AssetFreezeFields, AssetTransferFields,
    KeyRegistrationFields, PaymentFields,
};
use super::state_proof::{HeartbeatFields, StateProofFields};
use super::types::TransactionType;
use crate::address::Address;
use crate::codec::{
    from_wire, to_wire, CodecError, FieldDescriptor as F, FieldReader, FieldWriter, WireEntity, WireMap,
};

// ---------------------------------------------------------------------------
// TransactionBody
// ---------------------------------------------------------------------------

/// The kind-specific part of a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionBody {
    Payment(PaymentFields),
    AssetTransfer(AssetTransferFields),
    AssetFreeze(AssetFreezeFields),
    AssetConfig(AssetConfigFields),
    KeyRegistration(KeyRegistrationFields),
    ApplicationCall(ApplicationCallFields),
    StateProof(StateProofFields),
    Heartbeat(HeartbeatFields),
    /// Decoded from a `type` this crate does not know. Carries no fields.
    Unknown,
}

impl TransactionBody {
    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Payment(_) => TransactionType::Payment,
            Self::AssetTransfer(_) => TransactionType::AssetTransfer,
            Self::AssetFreeze(_) => TransactionType::AssetFreeze,
            Self::AssetConfig(_) => TransactionType::AssetConfig,
            Self::KeyRegistration(_) => TransactionType::KeyRegistration,
            Self::ApplicationCall(_) => TransactionType::ApplicationCall,
            Self::StateProof(_) => TransactionType::StateProof,
            Self::Heartbeat(_) => TransactionType::Heartbeat,
            Self::Unknown => TransactionType::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An unsigned transaction.
///
/// Values are treated as immutable: operations such as fee assignment and
/// grouping return a modified copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub sender: Address,
    /// `None` until a fee is assigned.
    pub fee: Option<u64>,
    pub first_valid: u64,
    pub last_valid: u64,
    pub genesis_hash: Option<[u8; 32]>,
    pub genesis_id: Option<String>,
    pub note: Option<Vec<u8>>,
    /// Re-key the sender's account to this address after the transaction.
    pub rekey_to: Option<Address>,
    /// Mutual-exclusion lease; two transactions with the same sender and
    /// lease cannot both be confirmed within the validity window.
    pub lease: Option<[u8; 32]>,
    /// Group id assigned by [`crate::transaction::group_transactions`].
    pub group: Option<[u8; 32]>,
    pub body: TransactionBody,
}

impl Transaction {
    pub fn transaction_type(&self) -> TransactionType {
        self.body.transaction_type()
    }

    /// Check the invariants that do not depend on the network.
    pub fn validate(&self) -> Result<(), TransactionError> {
        if self.first_valid > self.last_valid {
            return Err(TransactionError::InvalidValidityWindow {
                first_valid: self.first_valid,
                last_valid: self.last_valid,
            });
        }
        Ok(())
    }

    /// This transaction as it reads back from its own encoding.
    ///
    /// An optional field holding its zero value (`Some(0)`, an empty note,
    /// an all-zero schema) is left off the wire, so it decodes as `None`.
    /// The normalized copy has every such field collapsed already and
    /// compares equal to its decoded bytes.
    pub fn normalized(&self) -> Result<Self, TransactionError> {
        Ok(from_wire(&to_wire(self)?)?)
    }

    pub fn payment(&self) -> Option<&PaymentFields> {
        match &self.body {
            TransactionBody::Payment(f) => Some(f),
            _ => None,
        }
    }

    pub fn asset_transfer(&self) -> Option<&AssetTransferFields> {
        match &self.body {
            TransactionBody::AssetTransfer(f) => Some(f),
            _ => None,
        }
    }

    pub fn asset_freeze(&self) -> Option<&AssetFreezeFields> {
        match &self.body {
            TransactionBody::AssetFreeze(f) => Some(f),
            _ => None,
        }
    }

    pub fn asset_config(&self) -> Option<&AssetConfigFields> {
        match &self.body {
            TransactionBody::AssetConfig(f) => Some(f),
            _ => None,
        }
    }

    pub fn key_registration(&self) -> Option<&KeyRegistrationFields> {
        match &self.body {
            TransactionBody::KeyRegistration(f) => Some(f),
            _ => None,
        }
    }

    pub fn application_call(&self) -> Option<&ApplicationCallFields> {
        match &self.body {
            TransactionBody::ApplicationCall(f) => Some(f),
            _ => None,
        }
    }

    pub fn state_proof(&self) -> Option<&StateProofFields> {
        match &self.body {
            TransactionBody::StateProof(f) => Some(f),
            _ => None,
        }
    }

    pub fn heartbeat(&self) -> Option<&HeartbeatFields> {
        match &self.body {
            TransactionBody::Heartbeat(f) => Some(f),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Wire mapping
// ---------------------------------------------------------------------------

fn type_is(map: &WireMap, ty: TransactionType) -> bool {
    map.get("type").and_then(|v| v.as_str()) == Some(ty.as_str())
}

fn is_payment(map: &WireMap) -> bool {
    type_is(map, TransactionType::Payment)
}

fn is_asset_transfer(map: &WireMap) -> bool {
    type_is(map, TransactionType::AssetTransfer)
}

fn is_asset_freeze(map: &WireMap) -> bool {
    type_is(map, TransactionType::AssetFreeze)
}

fn is_asset_config(map: &WireMap) -> bool {
    type_is(map, TransactionType::AssetConfig)
}

fn is_key_registration(map: &WireMap) -> bool {
    type_is(map, TransactionType::KeyRegistration)
}

fn is_application_call(map: &WireMap) -> bool {
    type_is(map, TransactionType::ApplicationCall)
}

fn is_state_proof(map: &WireMap) -> bool {
    type_is(map, TransactionType::StateProof)
}

const TX_TYPE: F = F::enum_value("type").keep_zero();
const TX_SENDER: F = F::address("snd");
const TX_FEE: F = F::plain("fee");
const TX_FIRST_VALID: F = F::plain("fv");
const TX_LAST_VALID: F = F::plain("lv");
const TX_GENESIS_ID: F = F::plain("gen");
const TX_GENESIS_HASH: F = F::plain("gh");
const TX_NOTE: F = F::plain("note");
const TX_LEASE: F = F::plain("lx");
const TX_REKEY_TO: F = F::address("rekey");
const TX_GROUP: F = F::plain("grp");

const TX_PAYMENT: F = F::flattened("payment", PaymentFields::fields, is_payment);
const TX_ASSET_TRANSFER: F = F::flattened("asset_transfer", AssetTransferFields::fields, is_asset_transfer);
const TX_ASSET_FREEZE: F = F::flattened("asset_freeze", AssetFreezeFields::fields, is_asset_freeze);
const TX_ASSET_CONFIG: F = F::flattened("asset_config", AssetConfigFields::fields, is_asset_config);
const TX_KEY_REGISTRATION: F =
    F::flattened("key_registration", KeyRegistrationFields::fields, is_key_registration);
const TX_APPLICATION_CALL: F =
    F::flattened("application_call", ApplicationCallFields::fields, is_application_call);
const TX_STATE_PROOF: F = F::flattened("state_proof", StateProofFields::fields, is_state_proof);
const TX_HEARTBEAT: F = F::nested("hb", HeartbeatFields::fields);

impl WireEntity for Transaction {
    const NAME: &'static str = "Transaction";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[
            TX_TYPE,
            TX_SENDER,
            TX_FEE,
            TX_FIRST_VALID,
            TX_LAST_VALID,
            TX_GENESIS_ID,
            TX_GENESIS_HASH,
            TX_NOTE,
            TX_LEASE,
            TX_REKEY_TO,
            TX_GROUP,
            TX_PAYMENT,
            TX_ASSET_TRANSFER,
            TX_ASSET_FREEZE,
            TX_ASSET_CONFIG,
            TX_KEY_REGISTRATION,
            TX_APPLICATION_CALL,
            TX_STATE_PROOF,
            TX_HEARTBEAT,
        ];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.enum_value(&TX_TYPE, &self.transaction_type());
        w.address(&TX_SENDER, &self.sender);
        w.plain_opt(&TX_FEE, &self.fee);
        w.plain(&TX_FIRST_VALID, &self.first_valid);
        w.plain(&TX_LAST_VALID, &self.last_valid);
        w.plain_opt(&TX_GENESIS_ID, &self.genesis_id);
        w.plain_opt(&TX_GENESIS_HASH, &self.genesis_hash);
        w.plain_opt(&TX_NOTE, &self.note);
        w.plain_opt(&TX_LEASE, &self.lease);
        w.address_opt(&TX_REKEY_TO, &self.rekey_to);
        w.plain_opt(&TX_GROUP, &self.group);

        match &self.body {
            TransactionBody::Payment(f) => w.flattened(&TX_PAYMENT, f),
            TransactionBody::AssetTransfer(f) => w.flattened(&TX_ASSET_TRANSFER, f),
            TransactionBody::AssetFreeze(f) => w.flattened(&TX_ASSET_FREEZE, f),
            TransactionBody::AssetConfig(f) => w.flattened(&TX_ASSET_CONFIG, f),
            TransactionBody::KeyRegistration(f) => w.flattened(&TX_KEY_REGISTRATION, f),
            TransactionBody::ApplicationCall(f) => w.flattened(&TX_APPLICATION_CALL, f),
            TransactionBody::StateProof(f) => w.flattened(&TX_STATE_PROOF, f),
            TransactionBody::Heartbeat(f) => w.nested(&TX_HEARTBEAT, f),
            TransactionBody::Unknown => Ok(()),
        }
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        let ty: TransactionType = r.enum_value(&TX_TYPE);
        let body = if let Some(f) = r.flattened(&TX_PAYMENT)? {
            TransactionBody::Payment(f)
        } else if let Some(f) = r.flattened(&TX_ASSET_TRANSFER)? {
            TransactionBody::AssetTransfer(f)
        } else if let Some(f) = r.flattened(&TX_ASSET_FREEZE)? {
            TransactionBody::AssetFreeze(f)
        } else if let Some(f) = r.flattened(&TX_ASSET_CONFIG)? {
            TransactionBody::AssetConfig(f)
        } else if let Some(f) = r.flattened(&TX_KEY_REGISTRATION)? {
            TransactionBody::KeyRegistration(f)
        } else if let Some(f) = r.flattened(&TX_APPLICATION_CALL)? {
            TransactionBody::ApplicationCall(f)
        } else if let Some(f) = r.flattened(&TX_STATE_PROOF)? {
            TransactionBody::StateProof(f)
        } else if ty == TransactionType::Heartbeat {
            TransactionBody::Heartbeat(r.nested(&TX_HEARTBEAT)?)
        } else {
            warn!(
                tx_type = ?r.map().get("type"),
                "unrecognized transaction type, decoding as unknown"
            );
            TransactionBody::Unknown
        };

        Ok(Self {
            sender: r.address(&TX_SENDER)?,
            fee: r.plain_opt(&TX_FEE)?,
            first_valid: r.plain(&TX_FIRST_VALID)?,
            last_valid: r.plain(&TX_LAST_VALID)?,
            genesis_id: r.plain_opt(&TX_GENESIS_ID)?,
            genesis_hash: r.plain_opt(&TX_GENESIS_HASH)?,
            note: r.plain_opt(&TX_NOTE)?,
            lease: r.plain_opt(&TX_LEASE)?,
            rekey_to: r.address_opt(&TX_REKEY_TO)?,
            group: r.plain_opt(&TX_GROUP)?,
            body,
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for unsigned [`Transaction`] values.
///
/// ```
/// use algokit_transact::transaction::{PaymentFields, TransactionBody, TransactionBuilder};
/// use algokit_transact::Address;
///
/// let tx = TransactionBuilder::new(TransactionBody::Payment(PaymentFields {
///     receiver: Address::ZERO,
///     amount: 0,
///     close_remainder_to: None,
/// }))
/// .sender(Address::ZERO)
/// .validity(1, 1000)
/// .build()
/// .unwrap();
///
/// assert_eq!(tx.last_valid, 1000);
/// ```
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    tx: Transaction,
}

impl TransactionBuilder {
    /// Start from a body; every common field starts absent or zero.
    pub fn new(body: TransactionBody) -> Self {
        Self {
            tx: Transaction {
                sender: Address::ZERO,
                fee: None,
                first_valid: 0,
                last_valid: 0,
                genesis_hash: None,
                genesis_id: None,
                note: None,
                rekey_to: None,
                lease: None,
                group: None,
                body,
            },
        }
    }

    pub fn sender(mut self, sender: Address) -> Self {
        self.tx.sender = sender;
        self
    }

    /// Fixed fee. Usually left unset and filled in by
    /// [`crate::transaction::assign_fee`].
    pub fn fee(mut self, fee: u64) -> Self {
        self.tx.fee = Some(fee);
        self
    }

    pub fn first_valid(mut self, round: u64) -> Self {
        self.tx.first_valid = round;
        self
    }

    pub fn last_valid(mut self, round: u64) -> Self {
        self.tx.last_valid = round;
        self
    }

    /// Set both ends of the validity window.
    pub fn validity(self, first_valid: u64, last_valid: u64) -> Self {
        self.first_valid(first_valid).last_valid(last_valid)
    }

    pub fn genesis_hash(mut self, hash: [u8; 32]) -> Self {
        self.tx.genesis_hash = Some(hash);
        self
    }

    pub fn genesis_id(mut self, id: impl Into<String>) -> Self {
        self.tx.genesis_id = Some(id.into());
        self
    }

    pub fn note(mut self, note: impl Into<Vec<u8>>) -> Self {
        self.tx.note = Some(note.into());
        self
    }

    pub fn rekey_to(mut self, address: Address) -> Self {
        self.tx.rekey_to = Some(address);
        self
    }

    pub fn lease(mut self, lease: [u8; 32]) -> Self {
        self.tx.lease = Some(lease);
        self
    }

    /// Consume the builder, checking the validity window. The result is
    /// [normalized](Transaction::normalized).
    pub fn build(self) -> Result<Transaction, TransactionError> {
        self.tx.validate()?;
        self.tx.normalized()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
