//! Field-mapping metadata.
//!
//! Every entity that crosses the wire declares one [`FieldDescriptor`] per
//! field, in declaration order, as a `const` table (see
//! [`super::object::WireEntity::fields`]). A descriptor says three things:
//!
//! - the **wire key** the field is written under,
//! - the **omit policy** deciding when the field is left out,
//! - the **kind** of transform applied to the value on its way to the wire.
//!
//! Kinds that refer to another entity (`Nested`, `Flattened`) hold that
//! entity's descriptor table as a function pointer, so pointing a nested or
//! flattened descriptor at something that is not a [`WireEntity`] fails to
//! compile.
//!
//! [`WireEntity`]: super::object::WireEntity

use super::error::CodecError;
use super::wire::{WireMap, WireValue};

/// When a field is left out of the wire tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OmitPolicy {
    /// Leave out when absent or equal to its type's zero value.
    IfDefault,
    /// Leave out only when absent; a present zero is written.
    IfNull,
    /// Always written when present, zero or not.
    Never,
}

/// Descriptor table accessor of another entity.
pub type FieldTable = fn() -> &'static [FieldDescriptor];

/// Presence predicate of a flattened group, evaluated on the raw parent map.
pub type Presence = fn(&WireMap) -> bool;

/// How a field's value maps to its wire form.
#[derive(Clone, Copy)]
pub enum FieldKind {
    /// Scalar or byte string written as-is.
    Plain,
    /// Sub-entity written as a nested map.
    Nested(FieldTable),
    /// Sub-entity whose fields are written into the parent map. The key of
    /// a flattened descriptor names the group and never appears on the wire.
    Flattened { fields: FieldTable, present: Presence },
    /// Address written as its raw 32 bytes.
    Address,
    /// Enum written as its wire value, not its name.
    EnumByValue,
    /// Sequence of byte strings.
    ByteSequence,
    /// Sequence of integers.
    IntSequence,
    /// Sequence of addresses, each as raw bytes.
    AddressSequence,
    /// Value produced and consumed by a hand-written transform.
    Custom,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Plain => "plain",
            Self::Nested(_) => "nested",
            Self::Flattened { .. } => "flattened",
            Self::Address => "address",
            Self::EnumByValue => "enum-by-value",
            Self::ByteSequence => "byte-sequence",
            Self::IntSequence => "int-sequence",
            Self::AddressSequence => "address-sequence",
            Self::Custom => "custom",
        }
    }
}

impl std::fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Declarative mapping of one entity field to one wire entry.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    pub key: &'static str,
    pub kind: FieldKind,
    pub omit: OmitPolicy,
}

impl FieldDescriptor {
    const fn new(key: &'static str, kind: FieldKind) -> Self {
        Self {
            key,
            kind,
            omit: OmitPolicy::IfDefault,
        }
    }

    pub const fn plain(key: &'static str) -> Self {
        Self::new(key, FieldKind::Plain)
    }

    pub const fn nested(key: &'static str, fields: FieldTable) -> Self {
        Self::new(key, FieldKind::Nested(fields))
    }

    pub const fn flattened(name: &'static str, fields: FieldTable, present: Presence) -> Self {
        Self::new(name, FieldKind::Flattened { fields, present })
    }

    pub const fn address(key: &'static str) -> Self {
        Self::new(key, FieldKind::Address)
    }

    pub const fn enum_value(key: &'static str) -> Self {
        Self::new(key, FieldKind::EnumByValue)
    }

    pub const fn byte_seq(key: &'static str) -> Self {
        Self::new(key, FieldKind::ByteSequence)
    }

    pub const fn int_seq(key: &'static str) -> Self {
        Self::new(key, FieldKind::IntSequence)
    }

    pub const fn address_seq(key: &'static str) -> Self {
        Self::new(key, FieldKind::AddressSequence)
    }

    pub const fn custom(key: &'static str) -> Self {
        Self::new(key, FieldKind::Custom)
    }

    /// Write the field even when it holds its zero value.
    pub const fn keep_zero(mut self) -> Self {
        self.omit = OmitPolicy::Never;
        self
    }

    /// Write the field whenever it is present.
    pub const fn omit_if_null(mut self) -> Self {
        self.omit = OmitPolicy::IfNull;
        self
    }

    /// Whether a value in this field should be written.
    pub fn should_write(&self, present: bool, is_zero: bool) -> bool {
        match self.omit {
            OmitPolicy::IfDefault => present && !is_zero,
            OmitPolicy::IfNull | OmitPolicy::Never => present,
        }
    }
}

/// Every wire key an entity can produce, with flattened groups resolved.
pub fn wire_keys(fields: &[FieldDescriptor]) -> Vec<&'static str> {
    let mut keys = Vec::with_capacity(fields.len());
    for field in fields {
        match field.kind {
            FieldKind::Flattened { fields, .. } => keys.extend(wire_keys(fields())),
            _ => keys.push(field.key),
        }
    }
    keys
}

/// Enforce that an entity's wire keys are unique once flattening is resolved.
pub fn check_unique_keys(entity: &'static str, fields: &[FieldDescriptor]) -> Result<(), CodecError> {
    let keys = wire_keys(fields);
    for (i, key) in keys.iter().enumerate() {
        if keys[..i].contains(key) {
            return Err(CodecError::DuplicateKey { entity, key });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Enum-by-value
// ---------------------------------------------------------------------------

/// An enum written to the wire by value.
///
/// Decoding never fails: a value the enum does not know maps to its
/// designated unknown member, so payloads from newer protocol versions
/// still decode.
pub trait WireEnum: Sized + Copy + PartialEq {
    /// Member the decoder falls back to.
    const UNKNOWN: Self;

    fn to_wire(&self) -> WireValue;

    /// Map a wire value back to a member, or `None` if unrecognized.
    fn from_known(value: &WireValue) -> Option<Self>;

    /// Whether this member is the type's zero value (omitted by default).
    fn is_zero(&self) -> bool;

    /// The absent-field value.
    fn zero() -> Self;

    fn from_wire(value: &WireValue) -> Self {
        Self::from_known(value).unwrap_or(Self::UNKNOWN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INNER: &[FieldDescriptor] = &[FieldDescriptor::plain("x"), FieldDescriptor::plain("y")];
    const CLASH: &[FieldDescriptor] = &[FieldDescriptor::plain("a")];

    fn inner() -> &'static [FieldDescriptor] {
        INNER
    }

    fn clash() -> &'static [FieldDescriptor] {
        CLASH
    }

    fn always(_: &WireMap) -> bool {
        true
    }

    #[test]
    fn flattened_keys_are_inlined() {
        let fields = [
            FieldDescriptor::plain("a"),
            FieldDescriptor::flattened("group", inner, always),
            FieldDescriptor::nested("n", inner),
        ];
        assert_eq!(wire_keys(&fields), vec!["a", "x", "y", "n"]);
        assert!(check_unique_keys("ok", &fields).is_ok());
    }

    #[test]
    fn duplicate_after_flattening_is_rejected() {
        let fields = [
            FieldDescriptor::plain("a"),
            FieldDescriptor::flattened("group", clash, always),
        ];
        let err = check_unique_keys("bad", &fields).unwrap_err();
        assert_eq!(
            err,
            CodecError::DuplicateKey {
                entity: "bad",
                key: "a"
            }
        );
    }

    #[test]
    fn omit_policies() {
        let default = FieldDescriptor::plain("f");
        assert!(!default.should_write(true, true));
        assert!(default.should_write(true, false));
        assert!(!default.should_write(false, false));

        let keep = FieldDescriptor::plain("thr").keep_zero();
        assert_eq!(keep.omit, OmitPolicy::Never);
        assert!(keep.should_write(true, true));
        assert!(!keep.should_write(false, true));

        let nullable = FieldDescriptor::plain("n").omit_if_null();
        assert!(nullable.should_write(true, true));
        assert!(!nullable.should_write(false, true));
    }

    #[test]
    fn kind_names() {
        assert_eq!(FieldDescriptor::address("snd").kind.name(), "address");
        assert_eq!(FieldDescriptor::int_seq("apfa").kind.name(), "int-sequence");
        assert_eq!(format!("{:?}", FieldDescriptor::enum_value("type").kind), "enum-by-value");
    }
}
