//! Error types for the codec layer.

use thiserror::Error;

use crate::address::AddressError;

/// Errors raised while mapping entities to wire trees or wire trees to bytes.
///
/// Decode errors name the wire key they were raised for so a failing
/// payload can be traced back to the offending field.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodecError {
    /// Zero-length input handed to a decoder.
    #[error("cannot decode empty input")]
    EmptyInput,

    /// The top-level value is not a map.
    #[error("expected a map at the top level, found {found}")]
    NotAMap { found: &'static str },

    /// The bytes are not a well-formed container.
    #[error("malformed msgpack: {0}")]
    Malformed(String),

    /// A complete value was decoded but bytes remain.
    #[error("{remaining} trailing bytes after top-level value")]
    TrailingBytes { remaining: usize },

    /// The container holds a wire type this protocol never uses.
    #[error("unsupported wire type: {found}")]
    UnsupportedType { found: &'static str },

    /// A field holds a value of the wrong wire type.
    #[error("field '{key}': expected {expected}, found {found}")]
    UnexpectedType {
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A field the entity cannot exist without is absent.
    #[error("entity '{entity}' is missing required field '{key}'")]
    MissingField { entity: &'static str, key: &'static str },

    /// A fixed-width byte field has the wrong length.
    #[error("field '{key}': expected {expected} bytes, found {found}")]
    InvalidLength {
        key: String,
        expected: usize,
        found: usize,
    },

    /// An integer does not fit the field's width.
    #[error("field '{key}': value {value} exceeds {max}")]
    IntegerOverflow { key: String, value: u64, max: u64 },

    /// An address field failed to parse.
    #[error("field '{key}': {source}")]
    InvalidAddress {
        key: String,
        #[source]
        source: AddressError,
    },

    /// Two descriptors of one entity resolve to the same wire key.
    #[error("entity '{entity}' declares wire key '{key}' more than once")]
    DuplicateKey { entity: &'static str, key: &'static str },

    /// The binary writer failed.
    #[error("encode failed: {0}")]
    Encode(String),
}
