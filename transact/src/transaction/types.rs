//! Enumerations written to the wire by value.
//!
//! Both enums carry an `Unknown` member. Decoding a value this crate does
//! not recognize lands there instead of failing, so transactions produced
//! by newer protocol versions can still be inspected.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::codec::{WireEnum, WireValue};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// The transaction discriminator (`type` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
    Payment,
    AssetTransfer,
    AssetFreeze,
    AssetConfig,
    KeyRegistration,
    ApplicationCall,
    StateProof,
    Heartbeat,
    /// A discriminator this crate does not know.
    Unknown,
}

impl TransactionType {
    /// The wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Payment => "pay",
            Self::AssetTransfer => "axfer",
            Self::AssetFreeze => "afrz",
            Self::AssetConfig => "acfg",
            Self::KeyRegistration => "keyreg",
            Self::ApplicationCall => "appl",
            Self::StateProof => "stpf",
            Self::Heartbeat => "hb",
            Self::Unknown => "unknown",
        }
    }

    /// Parse a wire tag. Unrecognized tags map to [`TransactionType::Unknown`].
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "pay" => Self::Payment,
            "axfer" => Self::AssetTransfer,
            "afrz" => Self::AssetFreeze,
            "acfg" => Self::AssetConfig,
            "keyreg" => Self::KeyRegistration,
            "appl" => Self::ApplicationCall,
            "stpf" => Self::StateProof,
            "hb" => Self::Heartbeat,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl WireEnum for TransactionType {
    const UNKNOWN: Self = Self::Unknown;

    fn to_wire(&self) -> WireValue {
        WireValue::from(self.as_str())
    }

    fn from_known(value: &WireValue) -> Option<Self> {
        match Self::from_tag(value.as_str()?) {
            Self::Unknown => None,
            known => Some(known),
        }
    }

    // The discriminator is always written.
    fn is_zero(&self) -> bool {
        false
    }

    fn zero() -> Self {
        Self::Unknown
    }
}

// ---------------------------------------------------------------------------
// OnApplicationComplete
// ---------------------------------------------------------------------------

/// What happens to an application call's sender after the program runs
/// (`apan` on the wire).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnApplicationComplete {
    #[default]
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
    /// A value this crate does not know. Re-encodes as `u64::MAX`.
    Unknown,
}

impl OnApplicationComplete {
    pub fn as_u64(&self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::OptIn => 1,
            Self::CloseOut => 2,
            Self::ClearState => 3,
            Self::UpdateApplication => 4,
            Self::DeleteApplication => 5,
            Self::Unknown => u64::MAX,
        }
    }
}

impl WireEnum for OnApplicationComplete {
    const UNKNOWN: Self = Self::Unknown;

    fn to_wire(&self) -> WireValue {
        WireValue::UInt(self.as_u64())
    }

    fn from_known(value: &WireValue) -> Option<Self> {
        Some(match value.as_u64()? {
            0 => Self::NoOp,
            1 => Self::OptIn,
            2 => Self::CloseOut,
            3 => Self::ClearState,
            4 => Self::UpdateApplication,
            5 => Self::DeleteApplication,
            _ => return None,
        })
    }

    fn is_zero(&self) -> bool {
        *self == Self::NoOp
    }

    fn zero() -> Self {
        Self::NoOp
    }
}
