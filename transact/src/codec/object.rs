//! The object codec: typed entities to and from wire trees.
//!
//! An entity implements [`WireEntity`] by declaring its descriptor table and
//! walking its fields in declaration order through a [`FieldWriter`] (encode)
//! or a [`FieldReader`] (decode). The walkers apply the descriptor's omit
//! policy and value transform; the entity only says which field goes through
//! which descriptor.
//!
//! ```text
//! entity ──write_fields──▶ FieldWriter ──▶ WireMap (declaration order)
//!                                             │ sort_canonical
//!                                             ▼
//!                                         canonical WireValue ──▶ msgpack
//! ```
//!
//! Each walker method is typed for one [`FieldKind`], and debug builds check
//! that the descriptor handed in declares that kind.

use std::collections::BTreeMap;

use super::error::CodecError;
use super::field::{FieldDescriptor, FieldKind, WireEnum};
use super::wire::{sort_canonical, WireMap, WireValue};
use crate::address::Address;

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// A structured value with a wire representation.
pub trait WireEntity: Sized {
    /// Entity name used in error messages.
    const NAME: &'static str;

    /// Descriptor table, one entry per field in declaration order.
    fn fields() -> &'static [FieldDescriptor];

    fn write_fields(&self, w: &mut FieldWriter<'_>) -> Result<(), CodecError>;

    fn read_fields(r: &FieldReader<'_>) -> Result<Self, CodecError>;
}

/// Scalar types a `plain` field can hold.
pub trait WirePlain: Sized {
    /// Expected wire type, for error messages.
    const EXPECTED: &'static str;

    fn to_wire(&self) -> WireValue;

    /// Convert back, or `None` when the wire value has the wrong type or size.
    fn from_wire(value: &WireValue) -> Option<Self>;

    fn zero() -> Self;

    fn is_zero(&self) -> bool;

    /// Required byte length, for fixed-width byte fields.
    fn fixed_len() -> Option<usize> {
        None
    }
}

impl WirePlain for u64 {
    const EXPECTED: &'static str = "unsigned integer";

    fn to_wire(&self) -> WireValue {
        WireValue::UInt(*self)
    }

    fn from_wire(value: &WireValue) -> Option<Self> {
        value.as_u64()
    }

    fn zero() -> Self {
        0
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl WirePlain for bool {
    const EXPECTED: &'static str = "bool";

    fn to_wire(&self) -> WireValue {
        WireValue::Bool(*self)
    }

    fn from_wire(value: &WireValue) -> Option<Self> {
        match value {
            WireValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn zero() -> Self {
        false
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl WirePlain for String {
    const EXPECTED: &'static str = "string";

    fn to_wire(&self) -> WireValue {
        WireValue::String(self.clone())
    }

    fn from_wire(value: &WireValue) -> Option<Self> {
        value.as_str().map(str::to_string)
    }

    fn zero() -> Self {
        String::new()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl WirePlain for Vec<u8> {
    const EXPECTED: &'static str = "bytes";

    fn to_wire(&self) -> WireValue {
        WireValue::Bytes(self.clone())
    }

    fn from_wire(value: &WireValue) -> Option<Self> {
        value.as_bytes().map(<[u8]>::to_vec)
    }

    fn zero() -> Self {
        Vec::new()
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl<const N: usize> WirePlain for [u8; N] {
    const EXPECTED: &'static str = "fixed-length bytes";

    fn to_wire(&self) -> WireValue {
        WireValue::Bytes(self.to_vec())
    }

    fn from_wire(value: &WireValue) -> Option<Self> {
        value.as_bytes().and_then(|b| b.try_into().ok())
    }

    fn zero() -> Self {
        [0u8; N]
    }

    fn is_zero(&self) -> bool {
        self.iter().all(|b| *b == 0)
    }

    fn fixed_len() -> Option<usize> {
        Some(N)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Encode an entity into a wire map in declaration order.
pub fn to_wire<T: WireEntity>(entity: &T) -> Result<WireMap, CodecError> {
    let mut map = WireMap::new();
    entity.write_fields(&mut FieldWriter::new(&mut map))?;
    Ok(map)
}

/// Encode an entity into its canonical wire tree (keys in canonical order).
pub fn to_canonical_wire<T: WireEntity>(entity: &T) -> Result<WireValue, CodecError> {
    Ok(sort_canonical(WireValue::Map(to_wire(entity)?)))
}

/// Decode an entity from a wire map.
pub fn from_wire<T: WireEntity>(map: &WireMap) -> Result<T, CodecError> {
    T::read_fields(&FieldReader::new(map, T::NAME))
}

fn check_kind(field: &FieldDescriptor, expected: fn(&FieldKind) -> bool) {
    debug_assert!(
        expected(&field.kind),
        "descriptor '{}' declares kind {}",
        field.key,
        field.kind.name()
    );
}

// ---------------------------------------------------------------------------
// FieldWriter
// ---------------------------------------------------------------------------

/// Encode-side walker over one wire map.
pub struct FieldWriter<'a> {
    map: &'a mut WireMap,
}

impl<'a> FieldWriter<'a> {
    pub fn new(map: &'a mut WireMap) -> Self {
        Self { map }
    }

    fn put(&mut self, field: &FieldDescriptor, value: WireValue, is_zero: bool) {
        if field.should_write(true, is_zero) {
            self.map.insert(field.key, value);
        }
    }

    pub fn plain<V: WirePlain>(&mut self, field: &FieldDescriptor, value: &V) {
        check_kind(field, |k| matches!(k, FieldKind::Plain));
        self.put(field, value.to_wire(), value.is_zero());
    }

    pub fn plain_opt<V: WirePlain>(&mut self, field: &FieldDescriptor, value: &Option<V>) {
        check_kind(field, |k| matches!(k, FieldKind::Plain));
        if let Some(value) = value {
            self.put(field, value.to_wire(), value.is_zero());
        }
    }

    /// Narrow integer written as an unsigned wire integer.
    pub fn uint<N: Into<u64> + Copy>(&mut self, field: &FieldDescriptor, value: N) {
        self.plain(field, &value.into());
    }

    pub fn uint_opt<N: Into<u64> + Copy>(&mut self, field: &FieldDescriptor, value: Option<N>) {
        self.plain_opt(field, &value.map(Into::into));
    }

    pub fn address(&mut self, field: &FieldDescriptor, value: &Address) {
        check_kind(field, |k| matches!(k, FieldKind::Address));
        self.put(field, WireValue::Bytes(value.as_bytes().to_vec()), value.is_zero());
    }

    pub fn address_opt(&mut self, field: &FieldDescriptor, value: &Option<Address>) {
        if let Some(value) = value {
            self.address(field, value);
        }
    }

    pub fn enum_value<E: WireEnum>(&mut self, field: &FieldDescriptor, value: &E) {
        check_kind(field, |k| matches!(k, FieldKind::EnumByValue));
        self.put(field, value.to_wire(), value.is_zero());
    }

    pub fn byte_seq(&mut self, field: &FieldDescriptor, values: &[Vec<u8>]) {
        check_kind(field, |k| matches!(k, FieldKind::ByteSequence));
        let items = values.iter().map(|b| WireValue::Bytes(b.clone())).collect();
        self.put(field, WireValue::Array(items), values.is_empty());
    }

    pub fn int_seq(&mut self, field: &FieldDescriptor, values: &[u64]) {
        check_kind(field, |k| matches!(k, FieldKind::IntSequence));
        let items = values.iter().map(|n| WireValue::UInt(*n)).collect();
        self.put(field, WireValue::Array(items), values.is_empty());
    }

    pub fn address_seq(&mut self, field: &FieldDescriptor, values: &[Address]) {
        check_kind(field, |k| matches!(k, FieldKind::AddressSequence));
        let items = values
            .iter()
            .map(|a| WireValue::Bytes(a.as_bytes().to_vec()))
            .collect();
        self.put(field, WireValue::Array(items), values.is_empty());
    }

    pub fn nested<T: WireEntity>(&mut self, field: &FieldDescriptor, value: &T) -> Result<(), CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Nested(_)));
        let map = to_wire(value)?;
        let is_zero = map.is_empty();
        self.put(field, WireValue::Map(map), is_zero);
        Ok(())
    }

    pub fn nested_opt<T: WireEntity>(&mut self, field: &FieldDescriptor, value: &Option<T>) -> Result<(), CodecError> {
        match value {
            Some(value) => self.nested(field, value),
            None => Ok(()),
        }
    }

    /// Sequence of sub-entities, each written as a nested map.
    pub fn nested_seq<T: WireEntity>(&mut self, field: &FieldDescriptor, values: &[T]) -> Result<(), CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Nested(_)));
        let items = values
            .iter()
            .map(|v| to_wire(v).map(WireValue::Map))
            .collect::<Result<Vec<_>, _>>()?;
        self.put(field, WireValue::Array(items), values.is_empty());
        Ok(())
    }

    /// Map keyed by integers whose values are sub-entities.
    pub fn int_keyed<T: WireEntity>(&mut self, field: &FieldDescriptor, values: &BTreeMap<u64, T>) -> Result<(), CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Custom));
        let mut map = WireMap::new();
        for (key, value) in values {
            map.push(WireValue::UInt(*key), WireValue::Map(to_wire(value)?));
        }
        let is_zero = map.is_empty();
        self.put(field, WireValue::Map(map), is_zero);
        Ok(())
    }

    /// Write a sub-entity's fields into this map, at this level.
    pub fn flattened<T: WireEntity>(&mut self, field: &FieldDescriptor, value: &T) -> Result<(), CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Flattened { .. }));
        value.write_fields(self)
    }

    /// Write a value produced by a custom transform.
    pub fn custom(&mut self, field: &FieldDescriptor, value: WireValue) {
        check_kind(field, |k| matches!(k, FieldKind::Custom));
        let is_zero = value.is_default_like();
        self.put(field, value, is_zero);
    }
}

// ---------------------------------------------------------------------------
// FieldReader
// ---------------------------------------------------------------------------

/// Decode-side walker over one wire map. Missing fields decode as absent or
/// as their zero value.
pub struct FieldReader<'a> {
    map: &'a WireMap,
    entity: &'static str,
}

impl<'a> FieldReader<'a> {
    pub fn new(map: &'a WireMap, entity: &'static str) -> Self {
        Self { map, entity }
    }

    /// The raw map being read.
    pub fn map(&self) -> &'a WireMap {
        self.map
    }

    fn mismatch(field: &FieldDescriptor, expected: &'static str, found: &WireValue) -> CodecError {
        CodecError::UnexpectedType {
            key: field.key.to_string(),
            expected,
            found: found.type_name(),
        }
    }

    fn get(&self, field: &FieldDescriptor) -> Option<&'a WireValue> {
        match self.map.get(field.key) {
            Some(WireValue::Nil) | None => None,
            Some(value) => Some(value),
        }
    }

    pub fn plain_opt<V: WirePlain>(&self, field: &FieldDescriptor) -> Result<Option<V>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Plain));
        match self.get(field) {
            None => Ok(None),
            Some(value) => V::from_wire(value).map(Some).ok_or_else(|| match (value, V::fixed_len()) {
                (WireValue::Bytes(b), Some(expected)) => CodecError::InvalidLength {
                    key: field.key.to_string(),
                    expected,
                    found: b.len(),
                },
                (other, _) => Self::mismatch(field, V::EXPECTED, other),
            }),
        }
    }

    pub fn plain<V: WirePlain>(&self, field: &FieldDescriptor) -> Result<V, CodecError> {
        Ok(self.plain_opt(field)?.unwrap_or_else(V::zero))
    }

    /// Narrow integer; values that do not fit are rejected.
    pub fn uint_opt<N: TryFrom<u64> + Into<u64> + Copy>(&self, field: &FieldDescriptor, max: N) -> Result<Option<N>, CodecError> {
        match self.plain_opt::<u64>(field)? {
            None => Ok(None),
            Some(value) => N::try_from(value).map(Some).map_err(|_| CodecError::IntegerOverflow {
                key: field.key.to_string(),
                value,
                max: max.into(),
            }),
        }
    }

    pub fn uint<N: TryFrom<u64> + Into<u64> + Copy + Default>(&self, field: &FieldDescriptor, max: N) -> Result<N, CodecError> {
        Ok(self.uint_opt(field, max)?.unwrap_or_default())
    }

    pub fn address_opt(&self, field: &FieldDescriptor) -> Result<Option<Address>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Address));
        match self.get(field) {
            None => Ok(None),
            Some(WireValue::Bytes(bytes)) => Address::from_slice(bytes)
                .map(Some)
                .map_err(|source| CodecError::InvalidAddress {
                    key: field.key.to_string(),
                    source,
                }),
            Some(other) => Err(Self::mismatch(field, "address bytes", other)),
        }
    }

    pub fn address(&self, field: &FieldDescriptor) -> Result<Address, CodecError> {
        Ok(self.address_opt(field)?.unwrap_or_default())
    }

    /// Never fails: unknown values map to the enum's unknown member.
    pub fn enum_value<E: WireEnum>(&self, field: &FieldDescriptor) -> E {
        check_kind(field, |k| matches!(k, FieldKind::EnumByValue));
        match self.get(field) {
            None => E::zero(),
            Some(value) => E::from_wire(value),
        }
    }

    fn array(&self, field: &FieldDescriptor) -> Result<&'a [WireValue], CodecError> {
        match self.get(field) {
            None => Ok(&[]),
            Some(WireValue::Array(items)) => Ok(items),
            Some(other) => Err(Self::mismatch(field, "array", other)),
        }
    }

    pub fn byte_seq(&self, field: &FieldDescriptor) -> Result<Vec<Vec<u8>>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::ByteSequence));
        self.array(field)?
            .iter()
            .map(|item| {
                item.as_bytes()
                    .map(<[u8]>::to_vec)
                    .ok_or_else(|| Self::mismatch(field, "bytes", item))
            })
            .collect()
    }

    pub fn int_seq(&self, field: &FieldDescriptor) -> Result<Vec<u64>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::IntSequence));
        self.array(field)?
            .iter()
            .map(|item| item.as_u64().ok_or_else(|| Self::mismatch(field, "unsigned integer", item)))
            .collect()
    }

    pub fn address_seq(&self, field: &FieldDescriptor) -> Result<Vec<Address>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::AddressSequence));
        self.array(field)?
            .iter()
            .map(|item| match item {
                WireValue::Bytes(bytes) => Address::from_slice(bytes).map_err(|source| CodecError::InvalidAddress {
                    key: field.key.to_string(),
                    source,
                }),
                other => Err(Self::mismatch(field, "address bytes", other)),
            })
            .collect()
    }

    pub fn nested_opt<T: WireEntity>(&self, field: &FieldDescriptor) -> Result<Option<T>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Nested(_)));
        match self.get(field) {
            None => Ok(None),
            Some(WireValue::Map(map)) => from_wire(map).map(Some),
            Some(other) => Err(Self::mismatch(field, "map", other)),
        }
    }

    pub fn nested<T: WireEntity>(&self, field: &FieldDescriptor) -> Result<T, CodecError> {
        match self.nested_opt(field)? {
            Some(value) => Ok(value),
            None => from_wire(&WireMap::new()),
        }
    }

    /// Like [`FieldReader::nested`], but an absent field is an error rather
    /// than a zero-valued entity.
    pub fn nested_required<T: WireEntity>(&self, field: &FieldDescriptor) -> Result<T, CodecError> {
        self.nested_opt(field)?.ok_or_else(|| CodecError::MissingField {
            entity: self.entity,
            key: field.key,
        })
    }

    pub fn nested_seq<T: WireEntity>(&self, field: &FieldDescriptor) -> Result<Vec<T>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Nested(_)));
        self.array(field)?
            .iter()
            .map(|item| match item {
                WireValue::Map(map) => from_wire(map),
                other => Err(Self::mismatch(field, "map", other)),
            })
            .collect()
    }

    pub fn int_keyed<T: WireEntity>(&self, field: &FieldDescriptor) -> Result<BTreeMap<u64, T>, CodecError> {
        check_kind(field, |k| matches!(k, FieldKind::Custom));
        let map = match self.get(field) {
            None => return Ok(BTreeMap::new()),
            Some(WireValue::Map(map)) => map,
            Some(other) => return Err(Self::mismatch(field, "map", other)),
        };
        let mut out = BTreeMap::new();
        for (key, value) in map.iter() {
            let key = key
                .as_u64()
                .ok_or_else(|| Self::mismatch(field, "integer key", key))?;
            let value = match value {
                WireValue::Map(inner) => from_wire(inner)?,
                other => return Err(Self::mismatch(field, "map", other)),
            };
            out.insert(key, value);
        }
        Ok(out)
    }

    /// Decode a flattened group from this same map if the group's presence
    /// predicate holds for it.
    pub fn flattened<T: WireEntity>(&self, field: &FieldDescriptor) -> Result<Option<T>, CodecError> {
        match field.kind {
            FieldKind::Flattened { present, .. } => {
                if present(self.map) {
                    T::read_fields(&FieldReader::new(self.map, T::NAME)).map(Some)
                } else {
                    Ok(None)
                }
            }
            _ => Err(CodecError::UnexpectedType {
                key: field.key.to_string(),
                expected: "flattened descriptor",
                found: field.kind.name(),
            }),
        }
    }

    /// Raw value for a custom transform.
    pub fn custom(&self, field: &FieldDescriptor) -> Option<&'a WireValue> {
        check_kind(field, |k| matches!(k, FieldKind::Custom));
        self.get(field)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
