//! Core type definitions shared by every transaction kind.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TransactError;
use crate::msgpack::{Decode, Encode, Value};

// ---------------------------------------------------------------------------
// TransactionType
// ---------------------------------------------------------------------------

/// Discriminant for the operation a transaction represents.
///
/// Every transaction falls into exactly one of these categories. The type
/// is written to the wire as a short tag under the `type` key and decides
/// which kind-specific fields may appear alongside the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TransactionType {
    /// Move microAlgos between accounts.
    Payment,
    /// Move units of an asset, opt in, or revoke.
    AssetTransfer,
    /// Create, reconfigure, or destroy an asset.
    AssetConfig,
    /// Freeze or unfreeze an account's asset holding.
    AssetFreeze,
    /// Create, call, update, or delete an application.
    AppCall,
    /// Register participation keys, go offline, or opt out for good.
    KeyRegistration,
    /// Prove a participating account is still alive.
    Heartbeat,
    /// Submit a compact certificate of a block range.
    StateProof,
}

impl TransactionType {
    pub const ALL: [TransactionType; 8] = [
        Self::Payment,
        Self::AssetTransfer,
        Self::AssetConfig,
        Self::AssetFreeze,
        Self::AppCall,
        Self::KeyRegistration,
        Self::Heartbeat,
        Self::StateProof,
    ];

    /// The tag written under the `type` key.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::Payment => "pay",
            Self::AssetTransfer => "axfer",
            Self::AssetConfig => "acfg",
            Self::AssetFreeze => "afrz",
            Self::AppCall => "appl",
            Self::KeyRegistration => "keyreg",
            Self::Heartbeat => "hb",
            Self::StateProof => "stpf",
        }
    }

    pub fn from_wire_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.wire_tag() == tag)
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payment => write!(f, "Payment"),
            Self::AssetTransfer => write!(f, "AssetTransfer"),
            Self::AssetConfig => write!(f, "AssetConfig"),
            Self::AssetFreeze => write!(f, "AssetFreeze"),
            Self::AppCall => write!(f, "AppCall"),
            Self::KeyRegistration => write!(f, "KeyRegistration"),
            Self::Heartbeat => write!(f, "Heartbeat"),
            Self::StateProof => write!(f, "StateProof"),
        }
    }
}

/// Accepts either the display name (`KeyRegistration`) or the wire tag
/// (`keyreg`).
impl FromStr for TransactionType {
    type Err = TransactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.to_string() == s || t.wire_tag() == s)
            .ok_or_else(|| TransactError::Input(format!("unknown transaction type `{s}`")))
    }
}

impl Encode for TransactionType {
    fn to_value(&self) -> Value {
        Value::Str(self.wire_tag().to_owned())
    }

    fn is_zero(&self) -> bool {
        false
    }
}

impl Decode for TransactionType {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let tag = String::from_value(value, path)?;
        Self::from_wire_tag(&tag).ok_or_else(|| {
            TransactError::decoding(path, format!("unknown transaction type `{tag}`"))
        })
    }
}

// ---------------------------------------------------------------------------
// OnApplicationComplete
// ---------------------------------------------------------------------------

/// What happens to the sender's application state after an app call runs.
///
/// Encoded as its integer discriminant; `NoOp` is zero and therefore
/// omitted from the wire.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OnApplicationComplete {
    #[default]
    NoOp,
    OptIn,
    CloseOut,
    ClearState,
    UpdateApplication,
    DeleteApplication,
}

impl OnApplicationComplete {
    pub fn as_u64(self) -> u64 {
        match self {
            Self::NoOp => 0,
            Self::OptIn => 1,
            Self::CloseOut => 2,
            Self::ClearState => 3,
            Self::UpdateApplication => 4,
            Self::DeleteApplication => 5,
        }
    }
}

impl TryFrom<u64> for OnApplicationComplete {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::NoOp),
            1 => Ok(Self::OptIn),
            2 => Ok(Self::CloseOut),
            3 => Ok(Self::ClearState),
            4 => Ok(Self::UpdateApplication),
            5 => Ok(Self::DeleteApplication),
            other => Err(other),
        }
    }
}

impl Encode for OnApplicationComplete {
    fn to_value(&self) -> Value {
        Value::Uint(self.as_u64())
    }

    fn is_zero(&self) -> bool {
        *self == Self::NoOp
    }
}

impl Decode for OnApplicationComplete {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let n = u64::from_value(value, path)?;
        Self::try_from(n).map_err(|n| {
            TransactError::decoding(path, format!("unknown on-completion action {n}"))
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_tags_are_distinct_and_reversible() {
        for t in TransactionType::ALL {
            assert_eq!(TransactionType::from_wire_tag(t.wire_tag()), Some(t));
        }
        assert_eq!(TransactionType::from_wire_tag("nope"), None);
    }

    #[test]
    fn parses_display_name_and_tag() {
        assert_eq!(
            "KeyRegistration".parse::<TransactionType>().unwrap(),
            TransactionType::KeyRegistration
        );
        assert_eq!(
            "axfer".parse::<TransactionType>().unwrap(),
            TransactionType::AssetTransfer
        );
        assert!("Transfer".parse::<TransactionType>().is_err());
    }

    #[test]
    fn unknown_tag_fails_decode() {
        let err = TransactionType::from_value(Value::Str("xfer".into()), "txn.type").unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding("txn.type", "unknown transaction type `xfer`")
        );
    }

    #[test]
    fn transaction_type_serde_uses_variant_names() {
        let json = serde_json::to_string(&TransactionType::KeyRegistration).unwrap();
        assert_eq!(json, "\"KeyRegistration\"");
        let back: TransactionType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TransactionType::KeyRegistration);
    }

    #[test]
    fn on_complete_integer_mapping() {
        assert!(OnApplicationComplete::NoOp.is_zero());
        assert_eq!(OnApplicationComplete::DeleteApplication.to_value(), Value::Uint(5));
        assert_eq!(OnApplicationComplete::try_from(3), Ok(OnApplicationComplete::ClearState));
        assert_eq!(OnApplicationComplete::try_from(6), Err(6));
    }
}
