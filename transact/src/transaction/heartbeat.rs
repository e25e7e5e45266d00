//! Heartbeat transactions.
//!
//! A heartbeat proves that a participating account's node is alive by
//! signing a recent seed with its participation key. All heartbeat fields
//! are nested under the single `hb` key rather than spread across the top
//! level.

use serde::{Deserialize, Serialize};

use crate::config::SIGNATURE_LENGTH;
use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{CanonicalMap, Decode, Encode, MapReader, Value};

use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::TransactionType;
use super::validation::Validate;

/// Two-level participation key signature over the heartbeat seed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatProof {
    #[serde(with = "crate::serde_hex")]
    pub sig: [u8; SIGNATURE_LENGTH],
    #[serde(with = "crate::serde_hex")]
    pub pk: [u8; 32],
    #[serde(with = "crate::serde_hex")]
    pub pk2: [u8; 32],
    #[serde(with = "crate::serde_hex")]
    pub pk1_sig: [u8; SIGNATURE_LENGTH],
    #[serde(with = "crate::serde_hex")]
    pub pk2_sig: [u8; SIGNATURE_LENGTH],
}

impl Default for HeartbeatProof {
    fn default() -> Self {
        Self {
            sig: [0u8; SIGNATURE_LENGTH],
            pk: [0u8; 32],
            pk2: [0u8; 32],
            pk1_sig: [0u8; SIGNATURE_LENGTH],
            pk2_sig: [0u8; SIGNATURE_LENGTH],
        }
    }
}

impl Encode for HeartbeatProof {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("s", &self.sig)
            .put("p", &self.pk)
            .put("p2", &self.pk2)
            .put("p1s", &self.pk1_sig)
            .put("p2s", &self.pk2_sig);
        map.finish()
    }
}

impl Decode for HeartbeatProof {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let proof = Self {
            sig: map.take("s")?.unwrap_or([0u8; SIGNATURE_LENGTH]),
            pk: map.take_or_default("p")?,
            pk2: map.take_or_default("p2")?,
            pk1_sig: map.take("p1s")?.unwrap_or([0u8; SIGNATURE_LENGTH]),
            pk2_sig: map.take("p2s")?.unwrap_or([0u8; SIGNATURE_LENGTH]),
        };
        map.finish()?;
        Ok(proof)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeartbeatTransactionFields {
    /// The account this heartbeat is for.
    pub address: Address,
    pub proof: HeartbeatProof,
    /// Block seed the proof signs.
    #[serde(with = "crate::serde_hex")]
    pub seed: Vec<u8>,
    /// Participation key id of the account.
    #[serde(with = "crate::serde_hex")]
    pub vote_id: [u8; 32],
    pub key_dilution: u64,
}

impl Encode for HeartbeatTransactionFields {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("a", &self.address)
            .put("prf", &self.proof)
            .put("sd", &self.seed)
            .put("vid", &self.vote_id)
            .put("kd", &self.key_dilution);
        map.finish()
    }
}

impl Decode for HeartbeatTransactionFields {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let fields = Self {
            address: map.take_or_default("a")?,
            proof: map.take_or_default("prf")?,
            seed: map.take_or_default("sd")?,
            vote_id: map.take_or_default("vid")?,
            key_dilution: map.take_or_default("kd")?,
        };
        map.finish()?;
        Ok(fields)
    }
}

impl Validate for HeartbeatTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        if self.address.is_zero() {
            return Err(TransactError::validation("address", "must not be the zero address"));
        }
        Ok(())
    }
}

impl TransactionFields for HeartbeatTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::Heartbeat;
    const WIRE_KEYS: &'static [&'static str] = &["hb"];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("hb", self);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        map.take_or_default("hb")
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::Heartbeat {
            header,
            fields: self,
        }
    }
}
