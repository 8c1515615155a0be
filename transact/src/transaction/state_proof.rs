//! State-proof and heartbeat payloads.
//!
//! These transactions are produced by the network itself rather than by
//! wallets, but a client still has to decode them to walk a block and to
//! recompute their ids. The structures are deep; most fields are opaque
//! digests and are kept as byte strings.
//!
//! ```text
//! sp ─┬─ c   signature commitment
//!     ├─ w   signed weight
//!     ├─ S   signature merkle proof  {pth hsh{t} td}
//!     ├─ P   participant merkle proof
//!     ├─ v   salt version
//!     ├─ r   { position → reveal{ s{ s{sig idx prf vkey{k}} l } p{ p{cmt lf} w } } }
//!     └─ pr  positions to reveal
//! ```

use std::collections::BTreeMap;

use crate::address::Address;
use crate::codec::{CodecError, FieldDescriptor as F, FieldReader, FieldWriter, WireEntity};

// ---------------------------------------------------------------------------
// Merkle proofs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HashFactory {
    pub hash_type: u64,
}

const HF_TYPE: F = F::plain("t");

impl WireEntity for HashFactory {
    const NAME: &'static str = "HashFactory";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[HF_TYPE];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&HF_TYPE, &self.hash_type);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            hash_type: r.plain(&HF_TYPE)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerkleArrayProof {
    pub path: Vec<Vec<u8>>,
    pub hash_factory: HashFactory,
    pub tree_depth: u64,
}

const MAP_PATH: F = F::byte_seq("pth");
const MAP_HASH_FACTORY: F = F::nested("hsh", HashFactory::fields);
const MAP_DEPTH: F = F::plain("td");

impl WireEntity for MerkleArrayProof {
    const NAME: &'static str = "MerkleArrayProof";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[MAP_PATH, MAP_HASH_FACTORY, MAP_DEPTH];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.byte_seq(&MAP_PATH, &self.path);
        w.nested(&MAP_HASH_FACTORY, &self.hash_factory)?;
        w.plain(&MAP_DEPTH, &self.tree_depth);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            path: r.byte_seq(&MAP_PATH)?,
            hash_factory: r.nested(&MAP_HASH_FACTORY)?,
            tree_depth: r.plain(&MAP_DEPTH)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Reveals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FalconVerifier {
    pub public_key: Vec<u8>,
}

const FV_KEY: F = F::plain("k");

impl WireEntity for FalconVerifier {
    const NAME: &'static str = "FalconVerifier";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[FV_KEY];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&FV_KEY, &self.public_key);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            public_key: r.plain(&FV_KEY)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FalconSignature {
    pub signature: Vec<u8>,
    pub vector_commitment_index: u64,
    pub proof: MerkleArrayProof,
    pub verifying_key: FalconVerifier,
}

const FS_SIG: F = F::plain("sig");
const FS_INDEX: F = F::plain("idx");
const FS_PROOF: F = F::nested("prf", MerkleArrayProof::fields);
const FS_VKEY: F = F::nested("vkey", FalconVerifier::fields);

impl WireEntity for FalconSignature {
    const NAME: &'static str = "FalconSignature";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[FS_SIG, FS_INDEX, FS_PROOF, FS_VKEY];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&FS_SIG, &self.signature);
        w.plain(&FS_INDEX, &self.vector_commitment_index);
        w.nested(&FS_PROOF, &self.proof)?;
        w.nested(&FS_VKEY, &self.verifying_key)
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            signature: r.plain(&FS_SIG)?,
            vector_commitment_index: r.plain(&FS_INDEX)?,
            proof: r.nested(&FS_PROOF)?,
            verifying_key: r.nested(&FS_VKEY)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SigslotCommit {
    pub signature: FalconSignature,
    pub lower_sig_weight: u64,
}

const SC_SIG: F = F::nested("s", FalconSignature::fields);
const SC_LOWER: F = F::plain("l");

impl WireEntity for SigslotCommit {
    const NAME: &'static str = "SigslotCommit";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[SC_SIG, SC_LOWER];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.nested(&SC_SIG, &self.signature)?;
        w.plain(&SC_LOWER, &self.lower_sig_weight);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            signature: r.nested(&SC_SIG)?,
            lower_sig_weight: r.plain(&SC_LOWER)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerkleSignatureVerifier {
    pub commitment: Vec<u8>,
    pub key_lifetime: u64,
}

const MSV_COMMITMENT: F = F::plain("cmt");
const MSV_LIFETIME: F = F::plain("lf");

impl WireEntity for MerkleSignatureVerifier {
    const NAME: &'static str = "MerkleSignatureVerifier";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[MSV_COMMITMENT, MSV_LIFETIME];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&MSV_COMMITMENT, &self.commitment);
        w.plain(&MSV_LIFETIME, &self.key_lifetime);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            commitment: r.plain(&MSV_COMMITMENT)?,
            key_lifetime: r.plain(&MSV_LIFETIME)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Participant {
    pub verifier: MerkleSignatureVerifier,
    pub weight: u64,
}

const PART_VERIFIER: F = F::nested("p", MerkleSignatureVerifier::fields);
const PART_WEIGHT: F = F::plain("w");

impl WireEntity for Participant {
    const NAME: &'static str = "Participant";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[PART_VERIFIER, PART_WEIGHT];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.nested(&PART_VERIFIER, &self.verifier)?;
        w.plain(&PART_WEIGHT, &self.weight);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            verifier: r.nested(&PART_VERIFIER)?,
            weight: r.plain(&PART_WEIGHT)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reveal {
    pub sigslot: SigslotCommit,
    pub participant: Participant,
}

const REVEAL_SIGSLOT: F = F::nested("s", SigslotCommit::fields);
const REVEAL_PARTICIPANT: F = F::nested("p", Participant::fields);

impl WireEntity for Reveal {
    const NAME: &'static str = "Reveal";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[REVEAL_SIGSLOT, REVEAL_PARTICIPANT];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.nested(&REVEAL_SIGSLOT, &self.sigslot)?;
        w.nested(&REVEAL_PARTICIPANT, &self.participant)
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            sigslot: r.nested(&REVEAL_SIGSLOT)?,
            participant: r.nested(&REVEAL_PARTICIPANT)?,
        })
    }
}

// ---------------------------------------------------------------------------
// State proof
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateProof {
    pub sig_commit: Vec<u8>,
    pub signed_weight: u64,
    pub sig_proofs: MerkleArrayProof,
    pub part_proofs: MerkleArrayProof,
    pub merkle_signature_salt_version: u64,
    /// Reveals keyed by position.
    pub reveals: BTreeMap<u64, Reveal>,
    pub positions_to_reveal: Vec<u64>,
}

const SP_COMMIT: F = F::plain("c");
const SP_WEIGHT: F = F::plain("w");
const SP_SIG_PROOFS: F = F::nested("S", MerkleArrayProof::fields);
const SP_PART_PROOFS: F = F::nested("P", MerkleArrayProof::fields);
const SP_SALT: F = F::plain("v");
const SP_REVEALS: F = F::custom("r");
const SP_POSITIONS: F = F::int_seq("pr");

impl WireEntity for StateProof {
    const NAME: &'static str = "StateProof";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[
            SP_COMMIT,
            SP_WEIGHT,
            SP_SIG_PROOFS,
            SP_PART_PROOFS,
            SP_SALT,
            SP_REVEALS,
            SP_POSITIONS,
        ];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&SP_COMMIT, &self.sig_commit);
        w.plain(&SP_WEIGHT, &self.signed_weight);
        w.nested(&SP_SIG_PROOFS, &self.sig_proofs)?;
        w.nested(&SP_PART_PROOFS, &self.part_proofs)?;
        w.plain(&SP_SALT, &self.merkle_signature_salt_version);
        w.int_keyed(&SP_REVEALS, &self.reveals)?;
        w.int_seq(&SP_POSITIONS, &self.positions_to_reveal);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            sig_commit: r.plain(&SP_COMMIT)?,
            signed_weight: r.plain(&SP_WEIGHT)?,
            sig_proofs: r.nested(&SP_SIG_PROOFS)?,
            part_proofs: r.nested(&SP_PART_PROOFS)?,
            merkle_signature_salt_version: r.plain(&SP_SALT)?,
            reveals: r.int_keyed(&SP_REVEALS)?,
            positions_to_reveal: r.int_seq(&SP_POSITIONS)?,
        })
    }
}

/// The message a state proof attests to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateProofMessage {
    pub block_headers_commitment: Vec<u8>,
    pub voters_commitment: Vec<u8>,
    pub ln_proven_weight: u64,
    pub first_attested_round: u64,
    pub last_attested_round: u64,
}

const MSG_HEADERS: F = F::plain("b");
const MSG_VOTERS: F = F::plain("v");
const MSG_WEIGHT: F = F::plain("P");
const MSG_FIRST: F = F::plain("f");
const MSG_LAST: F = F::plain("l");

impl WireEntity for StateProofMessage {
    const NAME: &'static str = "StateProofMessage";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[MSG_HEADERS, MSG_VOTERS, MSG_WEIGHT, MSG_FIRST, MSG_LAST];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&MSG_HEADERS, &self.block_headers_commitment);
        w.plain(&MSG_VOTERS, &self.voters_commitment);
        w.plain(&MSG_WEIGHT, &self.ln_proven_weight);
        w.plain(&MSG_FIRST, &self.first_attested_round);
        w.plain(&MSG_LAST, &self.last_attested_round);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            block_headers_commitment: r.plain(&MSG_HEADERS)?,
            voters_commitment: r.plain(&MSG_VOTERS)?,
            ln_proven_weight: r.plain(&MSG_WEIGHT)?,
            first_attested_round: r.plain(&MSG_FIRST)?,
            last_attested_round: r.plain(&MSG_LAST)?,
        })
    }
}

/// Field group of a state-proof transaction (`sptype sp spmsg`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateProofFields {
    pub state_proof_type: u64,
    pub state_proof: Option<StateProof>,
    pub message: Option<StateProofMessage>,
}

const STPF_TYPE: F = F::plain("sptype");
const STPF_PROOF: F = F::nested("sp", StateProof::fields);
const STPF_MESSAGE: F = F::nested("spmsg", StateProofMessage::fields);

impl WireEntity for StateProofFields {
    const NAME: &'static str = "StateProofFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[STPF_TYPE, STPF_PROOF, STPF_MESSAGE];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&STPF_TYPE, &self.state_proof_type);
        w.nested_opt(&STPF_PROOF, &self.state_proof)?;
        w.nested_opt(&STPF_MESSAGE, &self.message)
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            state_proof_type: r.plain(&STPF_TYPE)?,
            state_proof: r.nested_opt(&STPF_PROOF)?,
            message: r.nested_opt(&STPF_MESSAGE)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Heartbeat
// ---------------------------------------------------------------------------

/// Proof that a participation key is live (`prf` inside `hb`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeartbeatProof {
    pub signature: [u8; 64],
    pub public_key: [u8; 32],
    pub public_key_2: [u8; 32],
    pub public_key_1_signature: [u8; 64],
    pub public_key_2_signature: [u8; 64],
}

impl Default for HeartbeatProof {
    fn default() -> Self {
        Self {
            signature: [0u8; 64],
            public_key: [0u8; 32],
            public_key_2: [0u8; 32],
            public_key_1_signature: [0u8; 64],
            public_key_2_signature: [0u8; 64],
        }
    }
}

const HBP_SIG: F = F::plain("s");
const HBP_PK: F = F::plain("p");
const HBP_PK2: F = F::plain("p2");
const HBP_PK1_SIG: F = F::plain("p1s");
const HBP_PK2_SIG: F = F::plain("p2s");

impl WireEntity for HeartbeatProof {
    const NAME: &'static str = "HeartbeatProof";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[HBP_SIG, HBP_PK, HBP_PK2, HBP_PK1_SIG, HBP_PK2_SIG];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.plain(&HBP_SIG, &self.signature);
        w.plain(&HBP_PK, &self.public_key);
        w.plain(&HBP_PK2, &self.public_key_2);
        w.plain(&HBP_PK1_SIG, &self.public_key_1_signature);
        w.plain(&HBP_PK2_SIG, &self.public_key_2_signature);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            signature: r.plain(&HBP_SIG)?,
            public_key: r.plain(&HBP_PK)?,
            public_key_2: r.plain(&HBP_PK2)?,
            public_key_1_signature: r.plain(&HBP_PK1_SIG)?,
            public_key_2_signature: r.plain(&HBP_PK2_SIG)?,
        })
    }
}

/// Body of a heartbeat transaction, nested under `hb`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeartbeatFields {
    pub address: Address,
    pub proof: HeartbeatProof,
    pub seed: Vec<u8>,
    pub vote_id: [u8; 32],
    pub key_dilution: u64,
}

const HB_ADDRESS: F = F::address("a");
const HB_PROOF: F = F::nested("prf", HeartbeatProof::fields);
const HB_SEED: F = F::plain("sd");
const HB_VOTE_ID: F = F::plain("vid");
const HB_DILUTION: F = F::plain("kd");

impl WireEntity for HeartbeatFields {
    const NAME: &'static str = "HeartbeatFields";

    fn fields() -> &'static [F] {
        const FIELDS: &[F] = &[HB_ADDRESS, HB_PROOF, HB_SEED, HB_VOTE_ID, HB_DILUTION];
        FIELDS
    }

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError> {
        w.address(&HB_ADDRESS, &self.address);
        w.nested(&HB_PROOF, &self.proof)?;
        w.plain(&HB_SEED, &self.seed);
        w.plain(&HB_VOTE_ID, &self.vote_id);
        w.plain(&HB_DILUTION, &self.key_dilution);
        Ok(())
    }

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError> {
        Ok(Self {
            address: r.address(&HB_ADDRESS)?,
            proof: r.nested(&HB_PROOF)?,
            seed: r.plain(&HB_SEED)?,
            vote_id: r.plain(&HB_VOTE_ID)?,
            key_dilution: r.plain(&HB_DILUTION)?,
        })
    }
}
