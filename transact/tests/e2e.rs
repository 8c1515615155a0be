//! End-to-end tests for the transaction codec and signing engine.
//!
//! These go through the public API only: build a transaction, price it,
//! group it, sign it every way the protocol allows, encode it, decode it,
//! and verify it. Byte-level expectations that other implementations depend
//! on (key order, the `TX` prefix, the zero address) are pinned here.

use std::collections::BTreeMap;

use algokit_transact::codec::{pack, WireMap, WireValue};
use algokit_transact::signing::{
    address_from_multisig_signature, apply_multisig_subsignature, merge_multisignatures,
    new_multisig_signature, verify_bytes, verify_program_data, verify_signed_transaction,
    AddressWithSigners, BytesSigner, LogicSigAccount, MultisigAccount, MultisigMetadata,
    ProgramDataSigner, TransactionSigner,
};
use algokit_transact::transaction::state_proof::{Participant, Reveal};
use algokit_transact::transaction::{
    assign_fee, decode_signed_transactions, decode_transaction, encode_transaction,
    encode_transaction_raw, group_transactions, transaction_id, ApplicationCallFields,
    AssetConfigFields, AssetFreezeFields, AssetParams, AssetTransferFields, BoxReference, FeeParams,
    HeartbeatFields, KeyRegistrationFields, OnApplicationComplete, PaymentFields, StateProofFields,
    StateProofMessage, StateSchema, TransactionBody, TransactionType,
};
use algokit_transact::{
    Address, Ed25519Keypair, SigningError, Transaction, TransactionBuilder, TransactionError,
};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const ZERO_ADDRESS: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ";
const GENESIS_HASH: [u8; 32] = [0x48; 32];

fn account(seed: u8) -> AddressWithSigners {
    AddressWithSigners::from_keypair(Ed25519Keypair::from_seed(&[seed; 32]))
}

fn addr(b: u8) -> Address {
    Address::from_public_key([b; 32])
}

fn with_body(sender: Address, body: TransactionBody) -> Transaction {
    TransactionBuilder::new(body)
        .sender(sender)
        .fee(1_000)
        .validity(1_000, 2_000)
        .genesis_hash(GENESIS_HASH)
        .genesis_id("testnet-v1.0")
        .build()
        .expect("valid transaction")
}

fn payment(sender: Address, amount: u64) -> Transaction {
    with_body(
        sender,
        TransactionBody::Payment(PaymentFields {
            receiver: addr(9),
            amount,
            close_remainder_to: None,
        }),
    )
}

fn every_variant() -> Vec<TransactionBody> {
    let mut reveals = BTreeMap::new();
    reveals.insert(
        3,
        Reveal {
            participant: Participant {
                weight: 5,
                ..Default::default()
            },
            ..Default::default()
        },
    );
    vec![
        TransactionBody::Payment(PaymentFields {
            receiver: addr(2),
            amount: 42,
            close_remainder_to: Some(addr(3)),
        }),
        TransactionBody::AssetTransfer(AssetTransferFields {
            asset_id: 31_566_704,
            amount: 10,
            receiver: addr(2),
            asset_sender: Some(addr(4)),
            close_remainder_to: None,
        }),
        TransactionBody::AssetFreeze(AssetFreezeFields {
            asset_id: 7,
            freeze_target: addr(5),
            frozen: true,
        }),
        TransactionBody::AssetConfig(AssetConfigFields {
            asset_id: 0,
            params: Some(AssetParams {
                total: 1_000_000,
                decimals: 6,
                unit_name: Some("USD".into()),
                asset_name: Some("Dollar".into()),
                url: Some("https://example.com".into()),
                metadata_hash: Some([1u8; 32]),
                manager: Some(addr(6)),
                ..Default::default()
            }),
        }),
        TransactionBody::KeyRegistration(KeyRegistrationFields {
            vote_key: Some([1u8; 32]),
            selection_key: Some([2u8; 32]),
            state_proof_key: Some([3u8; 64]),
            vote_first: Some(100),
            vote_last: Some(200),
            vote_key_dilution: Some(10),
            non_participation: false,
        }),
        TransactionBody::ApplicationCall(ApplicationCallFields {
            app_id: 0,
            on_complete: OnApplicationComplete::OptIn,
            approval_program: vec![0x06, 0x81, 0x01],
            clear_state_program: vec![0x06, 0x81, 0x01],
            global_state_schema: Some(StateSchema {
                num_uints: 1,
                num_byte_slices: 2,
            }),
            local_state_schema: None,
            extra_program_pages: 1,
            args: vec![b"create".to_vec()],
            account_references: vec![addr(7)],
            app_references: vec![12],
            asset_references: vec![13],
            box_references: vec![BoxReference {
                app_index: 0,
                name: b"box".to_vec(),
            }],
        }),
        TransactionBody::StateProof(StateProofFields {
            state_proof_type: 0,
            state_proof: Some(algokit_transact::transaction::StateProof {
                signed_weight: 99,
                reveals,
                positions_to_reveal: vec![1, 2],
                ..Default::default()
            }),
            message: Some(StateProofMessage {
                first_attested_round: 257,
                last_attested_round: 512,
                ..Default::default()
            }),
        }),
        TransactionBody::Heartbeat(HeartbeatFields {
            address: addr(8),
            seed: vec![1, 2, 3],
            key_dilution: 100,
            ..Default::default()
        }),
    ]
}

// ---------------------------------------------------------------------------
// Zero-Address Payment
// ---------------------------------------------------------------------------

#[test]
fn zero_address_payment_roundtrip() {
    let zero: Address = ZERO_ADDRESS.parse().unwrap();
    let tx = TransactionBuilder::new(TransactionBody::Payment(PaymentFields {
        receiver: zero,
        amount: 0,
        close_remainder_to: None,
    }))
    .sender(zero)
    .validity(1, 1_000)
    .build()
    .unwrap();

    let decoded = decode_transaction(&encode_transaction(&tx).unwrap()).unwrap();
    assert_eq!(decoded.transaction_type(), TransactionType::Payment);
    assert_eq!(decoded.sender.to_string(), ZERO_ADDRESS);
    let pay = decoded.payment().unwrap();
    assert_eq!(pay.receiver, zero);
    assert_eq!(pay.amount, 0);
    assert_eq!((decoded.first_valid, decoded.last_valid), (1, 1_000));
    assert_eq!(decoded, tx);

    // Zero address, zero amount, no fee: only the window and type are written.
    let raw = encode_transaction_raw(&tx).unwrap();
    let map = algokit_transact::codec::unpack_map(&raw).unwrap();
    assert_eq!(map.keys(), vec!["fv", "lv", "type"]);
}

// ---------------------------------------------------------------------------
// Variant Round-Trips
// ---------------------------------------------------------------------------

#[test]
fn every_variant_roundtrips_in_both_forms() {
    for body in every_variant() {
        let tx = with_body(addr(1), body);
        let prefixed = encode_transaction(&tx).unwrap();
        let raw = encode_transaction_raw(&tx).unwrap();
        assert_eq!(decode_transaction(&prefixed).unwrap(), tx, "{}", tx.transaction_type());
        assert_eq!(decode_transaction(&raw).unwrap(), tx, "{}", tx.transaction_type());
        // Re-encoding the decoded value is byte-identical.
        assert_eq!(encode_transaction_raw(&decode_transaction(&raw).unwrap()).unwrap(), raw);
    }
}

#[test]
fn encoding_is_deterministic() {
    for body in every_variant() {
        let a = with_body(addr(1), body.clone());
        let b = with_body(addr(1), body);
        assert_eq!(encode_transaction(&a).unwrap(), encode_transaction(&b).unwrap());
    }
}

// ---------------------------------------------------------------------------
// Forward Compatibility
// ---------------------------------------------------------------------------

#[test]
fn unknown_type_decodes_as_unknown() {
    let mut map = WireMap::new();
    map.insert("type", WireValue::String("xyz".into()));
    map.insert("snd", WireValue::Bytes(vec![1u8; 32]));
    map.insert("fv", WireValue::UInt(5));
    map.insert("lv", WireValue::UInt(6));
    map.insert("amt", WireValue::UInt(100));
    map.insert("rcv", WireValue::Bytes(vec![2u8; 32]));
    let bytes = pack(&WireValue::Map(map)).unwrap();

    let tx = decode_transaction(&bytes).unwrap();
    assert_eq!(tx.transaction_type(), TransactionType::Unknown);
    assert_eq!(tx.body, TransactionBody::Unknown);
    assert!(tx.payment().is_none());
    assert!(tx.asset_transfer().is_none());
    assert!(tx.heartbeat().is_none());
    assert_eq!(tx.sender, addr(1));
    assert_eq!(tx.first_valid, 5);
}

// ---------------------------------------------------------------------------
// Fees
// ---------------------------------------------------------------------------

#[test]
fn fee_assignment_is_idempotent() {
    let params = FeeParams {
        fee_per_byte: 10,
        min_fee: 1_000,
        extra_fee: None,
        max_fee: None,
    };
    let tx = payment(addr(1), 5);
    let once = assign_fee(&tx, &params).unwrap();
    let twice = assign_fee(&once, &params).unwrap();
    assert_eq!(once.fee, twice.fee);
    assert!(once.fee.unwrap() >= 1_000);
}

#[test]
fn fee_cap_is_enforced() {
    let params = FeeParams {
        fee_per_byte: 1_000,
        max_fee: Some(5_000),
        ..FeeParams::default()
    };
    assert!(matches!(
        assign_fee(&payment(addr(1), 5), &params),
        Err(TransactionError::FeeTooHigh { max_fee: 5_000, .. })
    ));
}

// ---------------------------------------------------------------------------
// Grouping
// ---------------------------------------------------------------------------

#[test]
fn group_sign_and_submit() {
    let alice = account(1);
    let bob = account(2);
    let txs = group_transactions(&[payment(alice.address(), 10), payment(bob.address(), 20)]).unwrap();
    assert_eq!(txs[0].group, txs[1].group);

    let reordered = group_transactions(&[payment(bob.address(), 20), payment(alice.address(), 10)]).unwrap();
    assert_ne!(txs[0].group, reordered[0].group);

    let mut blobs = alice.sign_transactions(&txs, &[0]).unwrap();
    blobs.extend(bob.sign_transactions(&txs, &[1]).unwrap());
    let signed = decode_signed_transactions(&blobs).unwrap();
    for stx in &signed {
        verify_signed_transaction(stx).unwrap();
    }
    assert_ne!(transaction_id(&signed[0].transaction).unwrap(), transaction_id(&signed[1].transaction).unwrap());
}

#[test]
fn grouping_rejections() {
    assert_eq!(group_transactions(&[]).unwrap_err(), TransactionError::EmptyGroup);
    let seventeen: Vec<Transaction> = (0..17).map(|i| payment(addr(1), i)).collect();
    assert!(matches!(
        group_transactions(&seventeen),
        Err(TransactionError::GroupTooLarge { size: 17, max: 16 })
    ));
    let grouped = group_transactions(&[payment(addr(1), 1)]).unwrap();
    assert!(matches!(
        group_transactions(&grouped),
        Err(TransactionError::AlreadyGrouped { index: 0 })
    ));
}

// ---------------------------------------------------------------------------
// Domain Separation
// ---------------------------------------------------------------------------

#[test]
fn transaction_signature_is_useless_elsewhere() {
    let alice = account(1);
    let tx = payment(alice.address(), 1);
    let stx = alice.sign_transaction(&tx).unwrap();
    let sig = stx.signature.unwrap();
    let raw = encode_transaction_raw(&tx).unwrap();
    let program = addr(3);

    assert!(verify_signed_transaction(&stx).is_ok());
    assert_eq!(
        verify_program_data(&raw, &program, &alice.address(), &sig).unwrap_err(),
        SigningError::VerificationFailed
    );
    assert!(verify_bytes(&raw, &alice.address(), &sig).is_err());

    // Same payload, two domains, two different signatures.
    assert_ne!(
        alice.sign_bytes(&raw).unwrap(),
        alice.sign_program_data(&raw, &program).unwrap()
    );
}

// ---------------------------------------------------------------------------
// Multisig
// ---------------------------------------------------------------------------

#[test]
fn multisig_two_of_two() {
    let a = account(1);
    let b = account(2);
    let msig = new_multisig_signature(2, 2, &[a.address(), b.address()]).unwrap();
    let msig = apply_multisig_subsignature(&msig, &a.address(), [0xaa; 64]).unwrap();
    let msig = apply_multisig_subsignature(&msig, &b.address(), [0xbb; 64]).unwrap();
    assert!(msig.is_fully_signed());

    assert!(matches!(
        apply_multisig_subsignature(&msig, &addr(99), [0u8; 64]),
        Err(SigningError::NotAParticipant { .. })
    ));

    let same = new_multisig_signature(2, 2, &[a.address(), b.address()]).unwrap();
    let other_threshold = new_multisig_signature(2, 1, &[a.address(), b.address()]).unwrap();
    let other_version = new_multisig_signature(1, 2, &[a.address(), b.address()]).unwrap();
    assert_eq!(address_from_multisig_signature(&msig), address_from_multisig_signature(&same));
    assert_ne!(address_from_multisig_signature(&msig), address_from_multisig_signature(&other_threshold));
    assert_ne!(address_from_multisig_signature(&msig), address_from_multisig_signature(&other_version));
}

#[test]
fn multisig_partial_signers_merge() {
    let params = MultisigMetadata {
        version: 1,
        threshold: 2,
        participants: vec![account(1).address(), account(2).address(), account(3).address()],
    };
    let first = MultisigAccount::new(params.clone(), vec![account(1)]).unwrap();
    let second = MultisigAccount::new(params.clone(), vec![account(3)]).unwrap();
    let tx = payment(params.address(), 50);

    let part_a = first.sign_transaction(&tx).unwrap();
    let part_b = second.sign_transaction(&tx).unwrap();
    assert!(verify_signed_transaction(&part_a).is_err());

    let mut combined = part_a.clone();
    combined.multisignature = Some(
        merge_multisignatures(
            part_a.multisignature.as_ref().unwrap(),
            part_b.multisignature.as_ref().unwrap(),
        )
        .unwrap(),
    );
    assert!(verify_signed_transaction(&combined).is_ok());
}

// ---------------------------------------------------------------------------
// Logic Signatures
// ---------------------------------------------------------------------------

#[test]
fn logic_sig_escrow_and_delegation() {
    let program = vec![0x06, 0x81, 0x01];
    let escrow = LogicSigAccount::new(program, vec![b"arg0".to_vec()]).unwrap();
    let blobs = escrow.sign_transactions(&[payment(escrow.address(), 1)], &[0]).unwrap();
    let stx = &decode_signed_transactions(&blobs).unwrap()[0];
    assert!(verify_signed_transaction(stx).is_ok());
    assert_eq!(stx.logic_signature.as_ref().unwrap().args, vec![b"arg0".to_vec()]);

    let delegated = escrow.delegate(&account(4)).unwrap();
    let stx = delegated.sign_transaction(&payment(account(4).address(), 1)).unwrap();
    assert!(verify_signed_transaction(&stx).is_ok());
}
