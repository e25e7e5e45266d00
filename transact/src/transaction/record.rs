//! The flat, consumer-facing transaction shape.
//!
//! [`TransactionRecord`] is what crosses language and process boundaries:
//! a type tag, the header fields inline, and one optional slot per field
//! group. It can express inconsistent states (a payment tag with asset
//! transfer fields, or two groups at once), so converting it into a
//! [`Transaction`] checks that exactly the tagged group is populated and
//! runs the validators.
//!
//! In JSON, byte fields are hex and addresses are their base32 text:
//!
//! ```json
//! {
//!   "transaction_type": "Payment",
//!   "sender": "AEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEA5RCDXMI",
//!   "first_valid": 1000,
//!   "last_valid": 2000,
//!   "payment": {
//!     "receiver": "AIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBAEAQCAIBMXPWWNQ",
//!     "amount": 5000000
//!   }
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::TransactError;

use super::app_call::AppCallTransactionFields;
use super::asset_config::AssetConfigTransactionFields;
use super::asset_freeze::AssetFreezeTransactionFields;
use super::asset_transfer::AssetTransferTransactionFields;
use super::builder::{Transaction, TransactionBuilder, TransactionFields};
use super::header::TransactionHeader;
use super::heartbeat::HeartbeatTransactionFields;
use super::key_registration::KeyRegistrationTransactionFields;
use super::payment::PaymentTransactionFields;
use super::state_proof::StateProofTransactionFields;
use super::types::TransactionType;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub transaction_type: TransactionType,

    #[serde(flatten)]
    pub header: TransactionHeader,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentTransactionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_transfer: Option<AssetTransferTransactionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_config: Option<AssetConfigTransactionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_freeze: Option<AssetFreezeTransactionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_call: Option<AppCallTransactionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_registration: Option<KeyRegistrationTransactionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat: Option<HeartbeatTransactionFields>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_proof: Option<StateProofTransactionFields>,
}

impl TransactionRecord {
    /// A record with the given tag and header and no field group.
    pub fn new(transaction_type: TransactionType, header: TransactionHeader) -> Self {
        Self {
            transaction_type,
            header,
            payment: None,
            asset_transfer: None,
            asset_config: None,
            asset_freeze: None,
            app_call: None,
            key_registration: None,
            heartbeat: None,
            state_proof: None,
        }
    }

    /// Tags of every field group that is set, in declaration order.
    fn populated_groups(&self) -> Vec<TransactionType> {
        [
            (TransactionType::Payment, self.payment.is_some()),
            (TransactionType::AssetTransfer, self.asset_transfer.is_some()),
            (TransactionType::AssetConfig, self.asset_config.is_some()),
            (TransactionType::AssetFreeze, self.asset_freeze.is_some()),
            (TransactionType::AppCall, self.app_call.is_some()),
            (TransactionType::KeyRegistration, self.key_registration.is_some()),
            (TransactionType::Heartbeat, self.heartbeat.is_some()),
            (TransactionType::StateProof, self.state_proof.is_some()),
        ]
        .into_iter()
        .filter_map(|(t, set)| set.then_some(t))
        .collect()
    }
}

fn build<F: TransactionFields>(
    header: TransactionHeader,
    fields: Option<F>,
) -> Result<Transaction, TransactError> {
    let fields = fields.ok_or_else(|| {
        TransactError::encoding(format!(
            "`{}` transaction has no field group",
            F::TRANSACTION_TYPE.wire_tag()
        ))
    })?;
    TransactionBuilder::from_header(header).build(fields)
}

impl TryFrom<TransactionRecord> for Transaction {
    type Error = TransactError;

    fn try_from(record: TransactionRecord) -> Result<Self, Self::Error> {
        let populated = record.populated_groups();
        let tag = record.transaction_type;
        match populated.as_slice() {
            [] | [_] => {}
            many => {
                let tags: Vec<&str> = many.iter().map(|t| t.wire_tag()).collect();
                return Err(TransactError::encoding(format!(
                    "`{}` transaction has multiple field groups: {}",
                    tag.wire_tag(),
                    tags.join(", ")
                )));
            }
        }
        if let Some(other) = populated.first().filter(|t| **t != tag) {
            return Err(TransactError::encoding(format!(
                "`{}` transaction carries `{}` fields",
                tag.wire_tag(),
                other.wire_tag()
            )));
        }

        let header = record.header;
        match tag {
            TransactionType::Payment => build(header, record.payment),
            TransactionType::AssetTransfer => build(header, record.asset_transfer),
            TransactionType::AssetConfig => build(header, record.asset_config),
            TransactionType::AssetFreeze => build(header, record.asset_freeze),
            TransactionType::AppCall => build(header, record.app_call),
            TransactionType::KeyRegistration => build(header, record.key_registration),
            TransactionType::Heartbeat => build(header, record.heartbeat),
            TransactionType::StateProof => build(header, record.state_proof),
        }
    }
}

impl From<Transaction> for TransactionRecord {
    fn from(tx: Transaction) -> Self {
        let mut record = TransactionRecord::new(tx.transaction_type(), tx.header().clone());
        match tx {
            Transaction::Payment { fields, .. } => record.payment = Some(fields),
            Transaction::AssetTransfer { fields, .. } => record.asset_transfer = Some(fields),
            Transaction::AssetConfig { fields, .. } => record.asset_config = Some(fields),
            Transaction::AssetFreeze { fields, .. } => record.asset_freeze = Some(fields),
            Transaction::AppCall { fields, .. } => record.app_call = Some(fields),
            Transaction::KeyRegistration { fields, .. } => record.key_registration = Some(fields),
            Transaction::Heartbeat { fields, .. } => record.heartbeat = Some(fields),
            Transaction::StateProof { fields, .. } => record.state_proof = Some(fields),
        }
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Address;

    fn header() -> TransactionHeader {
        TransactionHeader {
            sender: Address::new([1u8; 32]),
            first_valid: 10,
            last_valid: 20,
            ..Default::default()
        }
    }

    fn payment_fields() -> PaymentTransactionFields {
        PaymentTransactionFields {
            receiver: Address::new([2u8; 32]),
            amount: 3,
            close_remainder_to: None,
        }
    }

    #[test]
    fn record_converts_both_ways() {
        let record = TransactionRecord {
            payment: Some(payment_fields()),
            ..TransactionRecord::new(TransactionType::Payment, header())
        };
        let tx = Transaction::try_from(record.clone()).unwrap();
        assert_eq!(tx.transaction_type(), TransactionType::Payment);
        assert_eq!(TransactionRecord::from(tx), record);
    }

    #[test]
    fn missing_group_is_encoding_error() {
        let record = TransactionRecord::new(TransactionType::Payment, header());
        let err = Transaction::try_from(record).unwrap_err();
        assert_eq!(
            err,
            TransactError::encoding("`pay` transaction has no field group")
        );
    }

    #[test]
    fn wrong_group_is_encoding_error() {
        let record = TransactionRecord {
            payment: Some(payment_fields()),
            ..TransactionRecord::new(TransactionType::AssetTransfer, header())
        };
        let err = Transaction::try_from(record).unwrap_err();
        assert_eq!(
            err,
            TransactError::encoding("`axfer` transaction carries `pay` fields")
        );
    }

    #[test]
    fn two_groups_is_encoding_error() {
        let record = TransactionRecord {
            payment: Some(payment_fields()),
            key_registration: Some(KeyRegistrationTransactionFields::offline()),
            ..TransactionRecord::new(TransactionType::Payment, header())
        };
        assert!(Transaction::try_from(record).unwrap_err().is_encoding());
    }

    #[test]
    fn conversion_validates() {
        let mut bad = header();
        bad.last_valid = 1;
        let record = TransactionRecord {
            payment: Some(payment_fields()),
            ..TransactionRecord::new(TransactionType::Payment, bad)
        };
        assert!(Transaction::try_from(record).unwrap_err().is_validation());
    }

    #[test]
    fn json_shape_is_flat() {
        let json = serde_json::json!({
            "transaction_type": "Payment",
            "sender": Address::new([1u8; 32]).to_string(),
            "first_valid": 10,
            "last_valid": 20,
            "note": "6869",
            "payment": {
                "receiver": Address::new([2u8; 32]).to_string(),
                "amount": 3
            }
        });
        let tx: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(tx.header().note.as_deref(), Some(b"hi".as_slice()));

        let back = serde_json::to_value(&tx).unwrap();
        assert_eq!(back["transaction_type"], "Payment");
        assert_eq!(back["first_valid"], 10);
        assert_eq!(back["payment"]["amount"], 3);
        assert!(back.get("fee").is_none());
    }

    #[test]
    fn empty_json_values_normalise() {
        let json = serde_json::json!({
            "transaction_type": "Payment",
            "sender": Address::new([1u8; 32]).to_string(),
            "first_valid": 10,
            "last_valid": 20,
            "note": "",
            "fee": 0,
            "payment": { "receiver": Address::new([2u8; 32]).to_string(), "amount": 3 }
        });
        let tx: Transaction = serde_json::from_value(json).unwrap();
        assert_eq!(tx.header().note, None);
        assert_eq!(tx.header().fee, None);
    }

    #[test]
    fn zero_group_fields_normalise() {
        let record = TransactionRecord {
            key_registration: Some(KeyRegistrationTransactionFields {
                vote_key_dilution: Some(0),
                non_participation: Some(false),
                ..Default::default()
            }),
            ..TransactionRecord::new(TransactionType::KeyRegistration, header())
        };
        let tx = Transaction::try_from(record).unwrap();
        let Transaction::KeyRegistration { fields, .. } = &tx else {
            panic!("expected key registration");
        };
        assert!(fields.is_offline());
        assert_eq!(fields, &KeyRegistrationTransactionFields::offline());
        assert_eq!(
            TransactionRecord::from(tx).key_registration,
            Some(KeyRegistrationTransactionFields::offline())
        );
    }
}
