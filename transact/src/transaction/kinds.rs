//! Per-kind field groups.
//!
//! Each group is written into the transaction's own map (flattened), so its
//! wire keys sit next to the common ones:
//!
//! ```text
//! payment            rcv amt close
//! asset transfer     xaid aamt arcv asnd aclose
//! asset freeze       faid fadd afrz
//! asset config       caid apar{t dc df un an au am m r f c}
//! key registration   votekey selkey sprfkey votefst votelst votekd nonpart
//! application call   apid apan apap apsu apgs apls apep apaa apat apfa apas apbx
//! ```

use serde::{Deserialize, Serialize};

use super::types::OnApplicationComplete;
use crate::address::Address;
use crate::codec::{CodecError, FieldDescriptor as F, FieldReader, FieldWriter, WireEntity};
use crate::config::STATE_PROOF_KEY_LENGTH;

// ---------------------------------------------------------------------------
// Payment
// ---------------------------------------------------------------------------

/// Moves the native currency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PaymentFields {
    pub receiver: Address,
    pub amount: u64,
    /// Send the sender's remaining balance here and close the account.
    pub close_remainder_to: Option<Address>,
}

const PAY_RECEIVER: F = F::address("rcv");
const PAY_AMOUNT: F = F::plain("amt");
const PAY_CLOSE: F = F::address("close");

impl WireEntity for PaymentFields {
    const NAME: &'static str = "PaymentFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[PAY_RECEIVER, PAY_AMOUNT, PAY_CLOSE];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.address(&PAY_RECEIVER, &self.receiver);
        w.plain(&PAY_AMOUNT, &self.amount);
        w.address_opt(&PAY_CLOSE, &self.close_remainder_to);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            receiver: r.address(&PAY_RECEIVER)?,
            amount: r.plain(&PAY_AMOUNT)?,
            close_remainder_to: r.address_opt(&PAY_CLOSE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Asset transfer
// ---------------------------------------------------------------------------

/// Moves units of an asset, opts in (zero-amount self transfer), or claws
/// back when `asset_sender` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetTransferFields {
    pub asset_id: u64,
    pub amount: u64,
    pub receiver: Address,
    /// Revocation target; only the asset's clawback account may set it.
    pub asset_sender: Option<Address>,
    pub close_remainder_to: Option<Address>,
}

const AXFER_ASSET: F = F::plain("xaid");
const AXFER_AMOUNT: F = F::plain("aamt");
const AXFER_RECEIVER: F = F::address("arcv");
const AXFER_SENDER: F = F::address("asnd");
const AXFER_CLOSE: F = F::address("aclose");

impl WireEntity for AssetTransferFields {
    const NAME: &'static str = "AssetTransferFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[AXFER_ASSET, AXFER_AMOUNT, AXFER_RECEIVER, AXFER_SENDER, AXFER_CLOSE];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&AXFER_ASSET, &self.asset_id);
        w.plain(&AXFER_AMOUNT, &self.amount);
        w.address(&AXFER_RECEIVER, &self.receiver);
        w.address_opt(&AXFER_SENDER, &self.asset_sender);
        w.address_opt(&AXFER_CLOSE, &self.close_remainder_to);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            asset_id: r.plain(&AXFER_ASSET)?,
            amount: r.plain(&AXFER_AMOUNT)?,
            receiver: r.address(&AXFER_RECEIVER)?,
            asset_sender: r.address_opt(&AXFER_SENDER)?,
            close_remainder_to: r.address_opt(&AXFER_CLOSE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Asset freeze
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetFreezeFields {
    pub asset_id: u64,
    pub freeze_target: Address,
    pub frozen: bool,
}

const AFRZ_ASSET: F = F::plain("faid");
const AFRZ_TARGET: F = F::address("fadd");
const AFRZ_FROZEN: F = F::plain("afrz");

impl WireEntity for AssetFreezeFields {
    const NAME: &'static str = "AssetFreezeFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[AFRZ_ASSET, AFRZ_TARGET, AFRZ_FROZEN];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&AFRZ_ASSET, &self.asset_id);
        w.address(&AFRZ_TARGET, &self.freeze_target);
        w.plain(&AFRZ_FROZEN, &self.frozen);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            asset_id: r.plain(&AFRZ_ASSET)?,
            freeze_target: r.address(&AFRZ_TARGET)?,
            frozen: r.plain(&AFRZ_FROZEN)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Asset config
// ---------------------------------------------------------------------------

/// Creates (`asset_id` 0), reconfigures, or destroys (no `params`) an asset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetConfigFields {
    pub asset_id: u64,
    pub params: Option<AssetParams>,
}

/// Asset parameters (`apar`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetParams {
    pub total: u64,
    pub decimals: u32,
    pub default_frozen: bool,
    pub unit_name: Option<String>,
    pub asset_name: Option<String>,
    pub url: Option<String>,
    pub metadata_hash: Option<[u8; 32]>,
    pub manager: Option<Address>,
    pub reserve: Option<Address>,
    pub freeze: Option<Address>,
    pub clawback: Option<Address>,
}

const APAR_TOTAL: F = F::plain("t");
const APAR_DECIMALS: F = F::plain("dc");
const APAR_DEFAULT_FROZEN: F = F::plain("df");
const APAR_UNIT_NAME: F = F::plain("un");
const APAR_ASSET_NAME: F = F::plain("an");
const APAR_URL: F = F::plain("au");
const APAR_METADATA_HASH: F = F::plain("am");
const APAR_MANAGER: F = F::address("m");
const APAR_RESERVE: F = F::address("r");
const APAR_FREEZE: F = F::address("f");
const APAR_CLAWBACK: F = F::address("c");

impl WireEntity for AssetParams {
    const NAME: &'static str = "AssetParams";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[
            APAR_TOTAL,
            APAR_DECIMALS,
            APAR_DEFAULT_FROZEN,
            APAR_UNIT_NAME,
            APAR_ASSET_NAME,
            APAR_URL,
            APAR_METADATA_HASH,
            APAR_MANAGER,
            APAR_RESERVE,
            APAR_FREEZE,
            APAR_CLAWBACK,
        ];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&APAR_TOTAL, &self.total);
        w.uint(&APAR_DECIMALS, self.decimals);
        w.plain(&APAR_DEFAULT_FROZEN, &self.default_frozen);
        w.plain_opt(&APAR_UNIT_NAME, &self.unit_name);
        w.plain_opt(&APAR_ASSET_NAME, &self.asset_name);
        w.plain_opt(&APAR_URL, &self.url);
        w.plain_opt(&APAR_METADATA_HASH, &self.metadata_hash);
        w.address_opt(&APAR_MANAGER, &self.manager);
        w.address_opt(&APAR_RESERVE, &self.reserve);
        w.address_opt(&APAR_FREEZE, &self.freeze);
        w.address_opt(&APAR_CLAWBACK, &self.clawback);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            total: r.plain(&APAR_TOTAL)?,
            decimals: r.uint(&APAR_DECIMALS, u32::MAX)?,
            default_frozen: r.plain(&APAR_DEFAULT_FROZEN)?,
            unit_name: r.plain_opt(&APAR_UNIT_NAME)?,
            asset_name: r.plain_opt(&APAR_ASSET_NAME)?,
            url: r.plain_opt(&APAR_URL)?,
            metadata_hash: r.plain_opt(&APAR_METADATA_HASH)?,
            manager: r.address_opt(&APAR_MANAGER)?,
            reserve: r.address_opt(&APAR_RESERVE)?,
            freeze: r.address_opt(&APAR_FREEZE)?,
            clawback: r.address_opt(&APAR_CLAWBACK)?,
        })
    }
}

const ACFG_ASSET: F = F::plain("caid");
const ACFG_PARAMS: F = F::nested("apar", AssetParams::fields);

impl WireEntity for AssetConfigFields {
    const NAME: &'static str = "AssetConfigFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[ACFG_ASSET, ACFG_PARAMS];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&ACFG_ASSET, &self.asset_id);
        w.nested_opt(&ACFG_PARAMS, &self.params)
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            asset_id: r.plain(&ACFG_ASSET)?,
            params: r.nested_opt(&ACFG_PARAMS)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Key registration
// ---------------------------------------------------------------------------

/// Brings an account online (all keys set) or takes it offline (none set).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyRegistrationFields {
    pub vote_key: Option<[u8; 32]>,
    pub selection_key: Option<[u8; 32]>,
    pub state_proof_key: Option<[u8; STATE_PROOF_KEY_LENGTH]>,
    pub vote_first: Option<u64>,
    pub vote_last: Option<u64>,
    pub vote_key_dilution: Option<u64>,
    /// Permanently mark the account as non-participating.
    pub non_participation: bool,
}

impl KeyRegistrationFields {
    /// `true` when this registration takes the account online.
    pub fn is_online(&self) -> bool {
        self.vote_key.is_some() && self.selection_key.is_some()
    }
}

const KEYREG_VOTE: F = F::plain("votekey");
const KEYREG_SELECTION: F = F::plain("selkey");
const KEYREG_STATE_PROOF: F = F::plain("sprfkey");
const KEYREG_FIRST: F = F::plain("votefst");
const KEYREG_LAST: F = F::plain("votelst");
const KEYREG_DILUTION: F = F::plain("votekd");
const KEYREG_NONPART: F = F::plain("nonpart");

impl WireEntity for KeyRegistrationFields {
    const NAME: &'static str = "KeyRegistrationFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[
            KEYREG_VOTE,
            KEYREG_SELECTION,
            KEYREG_STATE_PROOF,
            KEYREG_FIRST,
            KEYREG_LAST,
            KEYREG_DILUTION,
            KEYREG_NONPART,
        ];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain_opt(&KEYREG_VOTE, &self.vote_key);
        w.plain_opt(&KEYREG_SELECTION, &self.selection_key);
        w.plain_opt(&KEYREG_STATE_PROOF, &self.state_proof_key);
        w.plain_opt(&KEYREG_FIRST, &self.vote_first);
        w.plain_opt(&KEYREG_LAST, &self.vote_last);
        w.plain_opt(&KEYREG_DILUTION, &self.vote_key_dilution);
        w.plain(&KEYREG_NONPART, &self.non_participation);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            vote_key: r.plain_opt(&KEYREG_VOTE)?,
            selection_key: r.plain_opt(&KEYREG_SELECTION)?,
            state_proof_key: r.plain_opt(&KEYREG_STATE_PROOF)?,
            vote_first: r.plain_opt(&KEYREG_FIRST)?,
            vote_last: r.plain_opt(&KEYREG_LAST)?,
            vote_key_dilution: r.plain_opt(&KEYREG_DILUTION)?,
            non_participation: r.plain(&KEYREG_NONPART)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Application call
// ---------------------------------------------------------------------------

/// Storage an application reserves (`apgs` / `apls`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSchema {
    pub num_uints: u64,
    pub num_byte_slices: u64,
}

const SCHEMA_UINTS: F = F::plain("nui");
const SCHEMA_BYTES: F = F::plain("nbs");

impl WireEntity for StateSchema {
    const NAME: &'static str = "StateSchema";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[SCHEMA_UINTS, SCHEMA_BYTES];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&SCHEMA_UINTS, &self.num_uints);
        w.plain(&SCHEMA_BYTES, &self.num_byte_slices);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            num_uints: r.plain(&SCHEMA_UINTS)?,
            num_byte_slices: r.plain(&SCHEMA_BYTES)?,
        })
    }
}

/// A box the call may touch. `app_index` 0 means the called application;
/// other values are 1-based positions in the foreign apps list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxReference {
    pub app_index: u64,
    pub name: Vec<u8>,
}

const BOX_INDEX: F = F::plain("i");
const BOX_NAME: F = F::plain("n");

impl WireEntity for BoxReference {
    const NAME: &'static str = "BoxReference";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[BOX_INDEX, BOX_NAME];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&BOX_INDEX, &self.app_index);
        w.plain(&BOX_NAME, &self.name);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            app_index: r.plain(&BOX_INDEX)?,
            name: r.plain(&BOX_NAME)?,
        })
    }
}

/// Calls, creates (`app_id` 0), updates, or deletes an application.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationCallFields {
    pub app_id: u64,
    pub on_complete: OnApplicationComplete,
    pub approval_program: Vec<u8>,
    pub clear_state_program: Vec<u8>,
    pub global_state_schema: Option<StateSchema>,
    pub local_state_schema: Option<StateSchema>,
    pub extra_program_pages: u32,
    pub args: Vec<Vec<u8>>,
    pub account_references: Vec<Address>,
    pub app_references: Vec<u64>,
    pub asset_references: Vec<u64>,
    pub box_references: Vec<BoxReference>,
}

const APPL_ID: F = F::plain("apid");
const APPL_ON_COMPLETE: F = F::enum_value("apan");
const APPL_APPROVAL: F = F::plain("apap");
const APPL_CLEAR: F = F::plain("apsu");
const APPL_GLOBAL_SCHEMA: F = F::nested("apgs", StateSchema::fields);
const APPL_LOCAL_SCHEMA: F = F::nested("apls", StateSchema::fields);
const APPL_EXTRA_PAGES: F = F::plain("apep");
const APPL_ARGS: F = F::byte_seq("apaa");
const APPL_ACCOUNTS: F = F::address_seq("apat");
const APPL_APPS: F = F::int_seq("apfa");
const APPL_ASSETS: F = F::int_seq("apas");
const APPL_BOXES: F = F::nested("apbx", BoxReference::fields);

impl WireEntity for ApplicationCallFields {
    const NAME: &'static str = "ApplicationCallFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[
            APPL_ID,
            APPL_ON_COMPLETE,
            APPL_APPROVAL,
            APPL_CLEAR,
            APPL_GLOBAL_SCHEMA,
            APPL_LOCAL_SCHEMA,
            APPL_EXTRA_PAGES,
            APPL_ARGS,
            APPL_ACCOUNTS,
            APPL_APPS,
            APPL_ASSETS,
            APPL_BOXES,
        ];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&APPL_ID, &self.app_id);
        w.enum_value(&APPL_ON_COMPLETE, &self.on_complete);
        w.plain(&APPL_APPROVAL, &self.approval_program);
        w.plain(&APPL_CLEAR, &self.clear_state_program);
        w.nested_opt(&APPL_GLOBAL_SCHEMA, &self.global_state_schema)?;
        w.nested_opt(&APPL_LOCAL_SCHEMA, &self.local_state_schema)?;
        w.uint(&APPL_EXTRA_PAGES, self.extra_program_pages);
        w.byte_seq(&APPL_ARGS, &self.args);
        w.address_seq(&APPL_ACCOUNTS, &self.account_references);
        w.int_seq(&APPL_APPS, &self.app_references);
        w.int_seq(&APPL_ASSETS, &self.asset_references);
        w.nested_seq(&APPL_BOXES, &self.box_references)
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            app_id: r.plain(&APPL_ID)?,
            on_complete: r.enum_value(&APPL_ON_COMPLETE),
            approval_program: r.plain(&APPL_APPROVAL)?,
            clear_state_program: r.plain(&APPL_CLEAR)?,
            global_state_schema: r.nested_opt(&APPL_GLOBAL_SCHEMA)?,
            local_state_schema: r.nested_opt(&APPL_LOCAL_SCHEMA)?,
            extra_program_pages: r.uint(&APPL_EXTRA_PAGES, u32::MAX)?,
            args: r.byte_seq(&APPL_ARGS)?,
            account_references: r.address_seq(&APPL_ACCOUNTS)?,
            app_references: r.int_seq(&APPL_APPS)?,
            asset_references: r.int_seq(&APPL_ASSETS)?,
            box_references: r.nested_seq(&APPL_BOXES)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode_entity, encode_entity, field::check_unique_keys, to_wire};

    #[test]
    fn asset_params_nested_roundtrip() {
        let fields = AssetConfigFields {
            asset_id: 0,
            params: Some(AssetParams {
                total: 1_000_000,
                decimals: 6,
                unit_name: Some("TOK".into()),
                asset_name: Some("Token".into()),
                manager: Some(Address::from_public_key([3u8; 32])),
                ..Default::default()
            }),
        };
        let bytes = encode_entity(&fields).unwrap();
        assert_eq!(decode_entity::<AssetConfigFields>(&bytes).unwrap(), fields);
    }

    #[test]
    fn destroy_has_no_params() {
        let fields = AssetConfigFields {
            asset_id: 77,
            params: None,
        };
        let map = to_wire(&fields).unwrap();
        assert_eq!(map.keys(), vec!["caid"]);
    }

    #[test]
    fn application_call_sequences_roundtrip() {
        let fields = ApplicationCallFields {
            app_id: 12,
            on_complete: OnApplicationComplete::OptIn,
            args: vec![b"hello".to_vec(), vec![0, 1]],
            account_references: vec![Address::from_public_key([8u8; 32])],
            app_references: vec![1, 2],
            asset_references: vec![31566704],
            box_references: vec![BoxReference {
                app_index: 0,
                name: b"box".to_vec(),
            }],
            global_state_schema: Some(StateSchema {
                num_uints: 1,
                num_byte_slices: 2,
            }),
            ..Default::default()
        };
        let bytes = encode_entity(&fields).unwrap();
        assert_eq!(decode_entity::<ApplicationCallFields>(&bytes).unwrap(), fields);
    }

    #[test]
    fn noop_on_complete_is_omitted() {
        let fields = ApplicationCallFields {
            app_id: 5,
            ..Default::default()
        };
        let map = to_wire(&fields).unwrap();
        assert_eq!(map.keys(), vec!["apid"]);
    }

    #[test]
    fn keyreg_offline_and_online() {
        let offline = KeyRegistrationFields::default();
        assert!(!offline.is_online());
        assert!(to_wire(&offline).unwrap().is_empty());

        let online = KeyRegistrationFields {
            vote_key: Some([1u8; 32]),
            selection_key: Some([2u8; 32]),
            state_proof_key: Some([3u8; 64]),
            vote_first: Some(1),
            vote_last: Some(1_000_000),
            vote_key_dilution: Some(1000),
            non_participation: false,
        };
        assert!(online.is_online());
        let bytes = encode_entity(&online).unwrap();
        assert_eq!(decode_entity::<KeyRegistrationFields>(&bytes).unwrap(), online);
    }

    #[test]
    fn field_groups_have_unique_keys() {
        check_unique_keys(PaymentFields::NAME, PaymentFields::fields()).unwrap();
        check_unique_keys(AssetParams::NAME, AssetParams::fields()).unwrap();
        check_unique_keys(ApplicationCallFields::NAME, ApplicationCallFields::fields()).unwrap();
    }
}
