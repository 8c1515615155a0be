//! # Wire Codec
//!
//! Every byte that is hashed or signed passes through this module. The codec
//! is split in layers so the canonical form is produced in exactly one place:
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ typed entities (Transaction, Multisig, ...)   │
//! ├──────────────────────────────────────────────┤
//! │ object   - descriptor-driven field walkers    │
//! │ field    - wire keys, omit policies, kinds    │
//! ├──────────────────────────────────────────────┤
//! │ wire     - ordered key/value tree, key order  │
//! ├──────────────────────────────────────────────┤
//! │ msgpack  - bytes                              │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Canonical encoding
//!
//! Two encoders holding the same entity must produce identical bytes.
//! That holds because:
//!
//! - fields at their zero value are omitted unless the descriptor says
//!   otherwise,
//! - map keys are written in canonical order (integers, then strings, then
//!   byte strings),
//! - every scalar uses its smallest MessagePack encoding.

pub mod error;
pub mod field;
pub mod msgpack;
pub mod object;
pub mod wire;

pub use error::CodecError;
pub use field::{FieldDescriptor, FieldKind, OmitPolicy, WireEnum};
pub use msgpack::{pack, unpack, unpack_map};
pub use object::{from_wire, to_canonical_wire, to_wire, FieldReader, FieldWriter, WireEntity, WirePlain};
pub use wire::{canonicalize, compare_keys, sort_canonical, WireMap, WireValue};

/// Canonical bytes of an entity.
pub fn encode_entity<T: WireEntity>(entity: &T) -> Result<Vec<u8>, CodecError> {
    pack(&to_canonical_wire(entity)?)
}

/// Decode an entity from bytes holding one top-level map.
pub fn decode_entity<T: WireEntity>(bytes: &[u8]) -> Result<T, CodecError> {
    from_wire(&unpack_map(bytes)?)
}
