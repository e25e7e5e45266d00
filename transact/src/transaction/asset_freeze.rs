//! Asset freeze transactions.

use serde::{Deserialize, Serialize};

use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{CanonicalMap, MapReader};

use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::TransactionType;
use super::validation::{non_zero_id, Validate};

/// Freezes or unfreezes `freeze_target`'s holding of `asset_id`. Only the
/// asset's freeze account may send this.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetFreezeTransactionFields {
    pub asset_id: u64,
    pub freeze_target: Address,
    #[serde(default)]
    pub frozen: bool,
}

impl Validate for AssetFreezeTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        non_zero_id("asset_id", self.asset_id)
    }
}

impl TransactionFields for AssetFreezeTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::AssetFreeze;
    const WIRE_KEYS: &'static [&'static str] = &["afrz", "fadd", "faid"];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("faid", &self.asset_id)
            .put("fadd", &self.freeze_target)
            .put("afrz", &self.frozen);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            asset_id: map.take_or_default("faid")?,
            freeze_target: map.take_or_default("fadd")?,
            frozen: map.take_or_default("afrz")?,
        })
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::AssetFreeze {
            header,
            fields: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::CanonicalMsgpack;
    use crate::transaction::TransactionBuilder;

    #[test]
    fn unfreeze_omits_flag_and_round_trips() {
        let fields = AssetFreezeTransactionFields {
            asset_id: 77,
            freeze_target: Address::new([6u8; 32]),
            frozen: false,
        };
        let tx = TransactionBuilder::new(Address::new([5u8; 32]), 100, 200)
            .build(fields)
            .unwrap();
        let raw = tx.encode_raw().unwrap();
        // "afrz" still appears as the type tag, but never as a key holding a bool.
        assert!(!raw
            .windows(6)
            .any(|w| w == [0xa4, b'a', b'f', b'r', b'z', 0xc3]));
        assert_eq!(Transaction::decode(&raw).unwrap(), tx);
    }
}
