//! Payment transactions.

use serde::{Deserialize, Serialize};

use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{CanonicalMap, MapReader};

use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::TransactionType;
use super::validation::Validate;

/// Moves microAlgos from the sender to `receiver`, optionally closing the
/// sender's account and sweeping the remainder to `close_remainder_to`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentTransactionFields {
    pub receiver: Address,
    pub amount: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub close_remainder_to: Option<Address>,
}

impl Validate for PaymentTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        Ok(())
    }
}

impl TransactionFields for PaymentTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::Payment;
    const WIRE_KEYS: &'static [&'static str] = &["amt", "close", "rcv"];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("rcv", &self.receiver)
            .put("amt", &self.amount)
            .put("close", &self.close_remainder_to);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            receiver: map.take_or_default("rcv")?,
            amount: map.take_or_default("amt")?,
            close_remainder_to: map.take("close")?,
        })
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::Payment {
            header,
            fields: self,
        }
    }
}
