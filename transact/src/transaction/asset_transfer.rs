//! Asset transfer transactions: sends, opt-ins, opt-outs, and clawbacks.

use serde::{Deserialize, Serialize};

use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{CanonicalMap, MapReader};

use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::TransactionType;
use super::validation::{non_zero_id, Validate};

/// Moves `amount` units of `asset_id` to `receiver`.
///
/// A zero-amount transfer to oneself is an opt-in. Setting
/// `close_remainder_to` opts out. Setting `asset_sender` makes this a
/// clawback, which only the asset's clawback account may send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetTransferTransactionFields {
    pub asset_id: u64,
    pub amount: u64,
    pub receiver: Address,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_sender: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_remainder_to: Option<Address>,
}

impl AssetTransferTransactionFields {
    /// An opt-in: a zero transfer from `account` to itself.
    pub fn opt_in(asset_id: u64, account: Address) -> Self {
        Self {
            asset_id,
            receiver: account,
            ..Default::default()
        }
    }

    pub fn is_clawback(&self) -> bool {
        self.asset_sender.is_some()
    }
}

impl Validate for AssetTransferTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        non_zero_id("asset_id", self.asset_id)
    }
}

impl TransactionFields for AssetTransferTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::AssetTransfer;
    const WIRE_KEYS: &'static [&'static str] = &["aamt", "aclose", "arcv", "asnd", "xaid"];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("xaid", &self.asset_id)
            .put("aamt", &self.amount)
            .put("arcv", &self.receiver)
            .put("asnd", &self.asset_sender)
            .put("aclose", &self.close_remainder_to);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            asset_id: map.take_or_default("xaid")?,
            amount: map.take_or_default("aamt")?,
            receiver: map.take_or_default("arcv")?,
            asset_sender: map.take("asnd")?,
            close_remainder_to: map.take("aclose")?,
        })
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::AssetTransfer {
            header,
            fields: self,
        }
    }
}
