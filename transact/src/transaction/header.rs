//! Fields common to every transaction kind.

use serde::{Deserialize, Serialize};

use crate::config::HASH_LENGTH;
use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{CanonicalMap, MapReader};

use super::validation::Validate;

/// The common header shared by every transaction.
///
/// Only `sender` and the validity window are required. `fee` is normally
/// left unset at construction and filled in by
/// [`Transaction::assign_fee`](super::Transaction::assign_fee).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionHeader {
    /// Account that pays the fee and authorizes the transaction.
    pub sender: Address,

    /// Fee in microAlgos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<u64>,

    /// First round in which the transaction may be confirmed.
    pub first_valid: u64,

    /// Last round in which the transaction may be confirmed.
    pub last_valid: u64,

    /// Hash of the genesis block of the target network.
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub genesis_hash: Option<[u8; HASH_LENGTH]>,

    /// Human-readable network name, e.g. `mainnet-v1.0`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genesis_id: Option<String>,

    /// Arbitrary data, up to 1 KiB on the network.
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub note: Option<Vec<u8>>,

    /// Authorizes a new key for the sender once confirmed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rekey_to: Option<Address>,

    /// Mutual exclusion token: at most one transaction per (sender, lease)
    /// may be confirmed in overlapping validity windows.
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub lease: Option<[u8; HASH_LENGTH]>,

    /// Group id binding this transaction into an atomic group.
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub group: Option<[u8; HASH_LENGTH]>,
}

impl TransactionHeader {
    pub(crate) fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("snd", &self.sender)
            .put("fee", &self.fee)
            .put("fv", &self.first_valid)
            .put("lv", &self.last_valid)
            .put("gh", &self.genesis_hash)
            .put("gen", &self.genesis_id)
            .put("note", &self.note)
            .put("rekey", &self.rekey_to)
            .put("lx", &self.lease)
            .put("grp", &self.group);
    }

    pub(crate) fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            sender: map.take_or_default("snd")?,
            fee: map.take("fee")?,
            first_valid: map.take_or_default("fv")?,
            last_valid: map.take_or_default("lv")?,
            genesis_hash: map.take("gh")?,
            genesis_id: map.take("gen")?,
            note: map.take("note")?,
            rekey_to: map.take("rekey")?,
            lease: map.take("lx")?,
            group: map.take("grp")?,
        })
    }
}

impl Validate for TransactionHeader {
    fn validate(&self) -> Result<(), TransactError> {
        if self.first_valid > self.last_valid {
            return Err(TransactError::validation(
                "last_valid",
                format!(
                    "must not precede first_valid ({} > {})",
                    self.first_valid, self.last_valid
                ),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::Value;

    #[test]
    fn absent_and_empty_note_write_identically() {
        let absent = TransactionHeader {
            first_valid: 1,
            last_valid: 2,
            ..Default::default()
        };
        let empty = TransactionHeader {
            note: Some(Vec::new()),
            ..absent.clone()
        };

        let mut a = CanonicalMap::new();
        absent.write_fields(&mut a);
        let mut b = CanonicalMap::new();
        empty.write_fields(&mut b);
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    fn zero_sender_is_omitted() {
        let header = TransactionHeader::default();
        let mut map = CanonicalMap::new();
        header.write_fields(&mut map);
        assert_eq!(map.finish(), Value::Map(Vec::new()));
    }

    #[test]
    fn inverted_window_rejected() {
        let header = TransactionHeader {
            first_valid: 10,
            last_valid: 9,
            ..Default::default()
        };
        let err = header.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("last_valid"));
    }

    #[test]
    fn json_omits_unset_options() {
        let header = TransactionHeader {
            sender: Address::new([1u8; 32]),
            first_valid: 1,
            last_valid: 1000,
            genesis_hash: Some([0x41; 32]),
            ..Default::default()
        };
        let json = serde_json::to_value(&header).unwrap();
        assert_eq!(json["genesis_hash"], "41".repeat(32));
        assert!(json.get("note").is_none());
        assert!(json.get("fee").is_none());

        let back: TransactionHeader = serde_json::from_value(json).unwrap();
        assert_eq!(back, header);
    }
}
