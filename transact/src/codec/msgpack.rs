//! Binary codec: wire trees to and from MessagePack bytes.
//!
//! The writer emits every value in its smallest encoding and writes map
//! entries in the order they appear, so a canonically ordered tree always
//! yields the same bytes. Byte strings use the `bin` family and text uses
//! the `str` family; the two never mix.
//!
//! The reader accepts exactly one top-level map and rejects anything the
//! protocol never produces (floats, extension types, invalid UTF-8).
//! Input nested past [`MAX_WIRE_DEPTH`] is rejected while reading, before
//! anything recurses over the decoded tree.

use rmpv::{Utf8String, Value};

use super::error::CodecError;
use super::wire::{WireMap, WireValue};
use crate::config::MAX_WIRE_DEPTH;

/// Serialize a wire value.
pub fn pack(value: &WireValue) -> Result<Vec<u8>, CodecError> {
    let mut buf = Vec::new();
    rmpv::encode::write_value(&mut buf, &to_rmpv(value))
        .map_err(|e| CodecError::Encode(e.to_string()))?;
    Ok(buf)
}

/// Deserialize exactly one wire value.
pub fn unpack(bytes: &[u8]) -> Result<WireValue, CodecError> {
    if bytes.is_empty() {
        return Err(CodecError::EmptyInput);
    }
    let mut reader = bytes;
    let value = rmpv::decode::read_value_with_max_depth(&mut reader, MAX_WIRE_DEPTH).map_err(|e| match e {
        rmpv::decode::Error::DepthLimitExceeded => {
            CodecError::Malformed(format!("nesting exceeds depth limit {MAX_WIRE_DEPTH}"))
        }
        other => CodecError::Malformed(other.to_string()),
    })?;
    if !reader.is_empty() {
        return Err(CodecError::TrailingBytes {
            remaining: reader.len(),
        });
    }
    from_rmpv(value)
}

/// Deserialize exactly one top-level map.
pub fn unpack_map(bytes: &[u8]) -> Result<WireMap, CodecError> {
    match unpack(bytes)? {
        WireValue::Map(map) => Ok(map),
        other => Err(CodecError::NotAMap {
            found: other.type_name(),
        }),
    }
}

fn to_rmpv(value: &WireValue) -> Value {
    match value {
        WireValue::Nil => Value::Nil,
        WireValue::Bool(b) => Value::Boolean(*b),
        WireValue::UInt(n) => Value::from(*n),
        WireValue::Int(n) => Value::from(*n),
        WireValue::String(s) => Value::String(Utf8String::from(s.as_str())),
        WireValue::Bytes(b) => Value::Binary(b.clone()),
        WireValue::Array(items) => Value::Array(items.iter().map(to_rmpv).collect()),
        WireValue::Map(map) => Value::Map(
            map.iter()
                .map(|(k, v)| (to_rmpv(k), to_rmpv(v)))
                .collect(),
        ),
    }
}

fn from_rmpv(value: Value) -> Result<WireValue, CodecError> {
    Ok(match value {
        Value::Nil => WireValue::Nil,
        Value::Boolean(b) => WireValue::Bool(b),
        Value::Integer(n) => match (n.as_u64(), n.as_i64()) {
            (Some(u), _) => WireValue::UInt(u),
            (None, Some(i)) => WireValue::Int(i),
            (None, None) => return Err(CodecError::Malformed(format!("integer out of range: {n}"))),
        },
        Value::String(s) => match s.into_str() {
            Some(text) => WireValue::String(text),
            None => return Err(CodecError::Malformed("string is not valid UTF-8".into())),
        },
        Value::Binary(b) => WireValue::Bytes(b),
        Value::Array(items) => WireValue::Array(
            items
                .into_iter()
                .map(from_rmpv)
                .collect::<Result<_, _>>()?,
        ),
        Value::Map(entries) => {
            let mut map = WireMap::new();
            for (k, v) in entries {
                map.push(from_rmpv(k)?, from_rmpv(v)?);
            }
            WireValue::Map(map)
        }
        Value::F32(_) | Value::F64(_) => return Err(CodecError::UnsupportedType { found: "float" }),
        Value::Ext(..) => return Err(CodecError::UnsupportedType { found: "extension" }),
    })
}
