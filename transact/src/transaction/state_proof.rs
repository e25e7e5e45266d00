//! State proof transactions.
//!
//! State proofs are produced by the network itself, not by wallets, so this
//! module only has to carry them faithfully: every nested structure has a
//! fixed wire layout, and reveals are keyed by position with integer map
//! keys.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::TransactError;
use crate::msgpack::{unexpected, CanonicalMap, Decode, Encode, MapReader, Value};

use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::TransactionType;
use super::validation::Validate;

// ---------------------------------------------------------------------------
// Merkle proofs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashFactory {
    #[serde(default)]
    pub hash_type: u64,
}

impl Encode for HashFactory {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("t", &self.hash_type);
        map.finish()
    }
}

impl Decode for HashFactory {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let factory = Self {
            hash_type: map.take_or_default("t")?,
        };
        map.finish()?;
        Ok(factory)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleArrayProof {
    #[serde(default, with = "crate::serde_hex::list")]
    pub path: Vec<Vec<u8>>,
    #[serde(default)]
    pub hash_factory: HashFactory,
    #[serde(default)]
    pub tree_depth: u64,
}

impl Encode for MerkleArrayProof {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("pth", &self.path)
            .put("hsh", &self.hash_factory)
            .put("td", &self.tree_depth);
        map.finish()
    }
}

impl Decode for MerkleArrayProof {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let proof = Self {
            path: map.take_or_default("pth")?,
            hash_factory: map.take_or_default("hsh")?,
            tree_depth: map.take_or_default("td")?,
        };
        map.finish()?;
        Ok(proof)
    }
}

// ---------------------------------------------------------------------------
// Participants and signatures
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleSignatureVerifier {
    #[serde(with = "crate::serde_hex")]
    pub commitment: [u8; 64],
    #[serde(default)]
    pub key_lifetime: u64,
}

impl Default for MerkleSignatureVerifier {
    fn default() -> Self {
        Self {
            commitment: [0u8; 64],
            key_lifetime: 0,
        }
    }
}

impl Encode for MerkleSignatureVerifier {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("cmt", &self.commitment).put("lf", &self.key_lifetime);
        map.finish()
    }
}

impl Decode for MerkleSignatureVerifier {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let verifier = Self {
            commitment: map.take("cmt")?.unwrap_or([0u8; 64]),
            key_lifetime: map.take_or_default("lf")?,
        };
        map.finish()?;
        Ok(verifier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    pub verifier: MerkleSignatureVerifier,
    #[serde(default)]
    pub weight: u64,
}

impl Encode for Participant {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("p", &self.verifier).put("w", &self.weight);
        map.finish()
    }
}

impl Decode for Participant {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let participant = Self {
            verifier: map.take_or_default("p")?,
            weight: map.take_or_default("w")?,
        };
        map.finish()?;
        Ok(participant)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FalconVerifier {
    #[serde(default, with = "crate::serde_hex")]
    pub public_key: Vec<u8>,
}

impl Encode for FalconVerifier {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("k", &self.public_key);
        map.finish()
    }
}

impl Decode for FalconVerifier {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let verifier = Self {
            public_key: map.take_or_default("k")?,
        };
        map.finish()?;
        Ok(verifier)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FalconSignatureStruct {
    #[serde(default, with = "crate::serde_hex")]
    pub signature: Vec<u8>,
    #[serde(default)]
    pub vector_commitment_index: u64,
    #[serde(default)]
    pub proof: MerkleArrayProof,
    #[serde(default)]
    pub verifying_key: FalconVerifier,
}

impl Encode for FalconSignatureStruct {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("sig", &self.signature)
            .put("idx", &self.vector_commitment_index)
            .put("prf", &self.proof)
            .put("vkey", &self.verifying_key);
        map.finish()
    }
}

impl Decode for FalconSignatureStruct {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let sig = Self {
            signature: map.take_or_default("sig")?,
            vector_commitment_index: map.take_or_default("idx")?,
            proof: map.take_or_default("prf")?,
            verifying_key: map.take_or_default("vkey")?,
        };
        map.finish()?;
        Ok(sig)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigslotCommit {
    #[serde(default)]
    pub sig: FalconSignatureStruct,
    #[serde(default)]
    pub lower_sig_weight: u64,
}

impl Encode for SigslotCommit {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("s", &self.sig).put("l", &self.lower_sig_weight);
        map.finish()
    }
}

impl Decode for SigslotCommit {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let commit = Self {
            sig: map.take_or_default("s")?,
            lower_sig_weight: map.take_or_default("l")?,
        };
        map.finish()?;
        Ok(commit)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reveal {
    #[serde(default)]
    pub sigslot: SigslotCommit,
    #[serde(default)]
    pub participant: Participant,
}

impl Encode for Reveal {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("p", &self.participant).put("s", &self.sigslot);
        map.finish()
    }
}

impl Decode for Reveal {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let reveal = Self {
            sigslot: map.take_or_default("s")?,
            participant: map.take_or_default("p")?,
        };
        map.finish()?;
        Ok(reveal)
    }
}

/// Reveals keyed by position. The only integer-keyed map in the format.
fn reveals_to_value(reveals: &BTreeMap<u64, Reveal>) -> Value {
    Value::Map(
        reveals
            .iter()
            .map(|(position, reveal)| (Value::Uint(*position), reveal.to_value()))
            .collect(),
    )
}

fn reveals_from_value(value: Value, path: &str) -> Result<BTreeMap<u64, Reveal>, TransactError> {
    let entries = match value {
        Value::Map(entries) => entries,
        other => return Err(unexpected(path, "map", &other)),
    };
    let mut reveals = BTreeMap::new();
    for (key, value) in entries {
        let position = u64::from_value(key, path)?;
        let reveal = Reveal::from_value(value, &format!("{path}[{position}]"))?;
        reveals.insert(position, reveal);
    }
    Ok(reveals)
}

// ---------------------------------------------------------------------------
// StateProof / StateProofMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateProof {
    #[serde(default, with = "crate::serde_hex")]
    pub sig_commit: Vec<u8>,
    #[serde(default)]
    pub signed_weight: u64,
    #[serde(default)]
    pub sig_proofs: MerkleArrayProof,
    #[serde(default)]
    pub part_proofs: MerkleArrayProof,
    #[serde(default)]
    pub merkle_signature_salt_version: u64,
    #[serde(default)]
    pub reveals: BTreeMap<u64, Reveal>,
    #[serde(default)]
    pub positions_to_reveal: Vec<u64>,
}

impl Encode for StateProof {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("c", &self.sig_commit)
            .put("w", &self.signed_weight)
            .put("S", &self.sig_proofs)
            .put("P", &self.part_proofs)
            .put("v", &self.merkle_signature_salt_version)
            .put_value("r", reveals_to_value(&self.reveals))
            .put("pr", &self.positions_to_reveal);
        map.finish()
    }
}

impl Decode for StateProof {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let reveals = match map.take_value("r") {
            Some(value) => reveals_from_value(value, &map.child("r"))?,
            None => BTreeMap::new(),
        };
        let proof = Self {
            sig_commit: map.take_or_default("c")?,
            signed_weight: map.take_or_default("w")?,
            sig_proofs: map.take_or_default("S")?,
            part_proofs: map.take_or_default("P")?,
            merkle_signature_salt_version: map.take_or_default("v")?,
            reveals,
            positions_to_reveal: map.take_or_default("pr")?,
        };
        map.finish()?;
        Ok(proof)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateProofMessage {
    #[serde(default, with = "crate::serde_hex")]
    pub block_headers_commitment: Vec<u8>,
    #[serde(default, with = "crate::serde_hex")]
    pub voters_commitment: Vec<u8>,
    #[serde(default)]
    pub ln_proven_weight: u64,
    #[serde(default)]
    pub first_attested_round: u64,
    #[serde(default)]
    pub last_attested_round: u64,
}

impl Encode for StateProofMessage {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("b", &self.block_headers_commitment)
            .put("v", &self.voters_commitment)
            .put("P", &self.ln_proven_weight)
            .put("f", &self.first_attested_round)
            .put("l", &self.last_attested_round);
        map.finish()
    }
}

impl Decode for StateProofMessage {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let message = Self {
            block_headers_commitment: map.take_or_default("b")?,
            voters_commitment: map.take_or_default("v")?,
            ln_proven_weight: map.take_or_default("P")?,
            first_attested_round: map.take_or_default("f")?,
            last_attested_round: map.take_or_default("l")?,
        };
        map.finish()?;
        Ok(message)
    }
}

// ---------------------------------------------------------------------------
// StateProofTransactionFields
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateProofTransactionFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_proof_type: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_proof: Option<StateProof>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<StateProofMessage>,
}

impl Validate for StateProofTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        if let Some(message) = &self.message {
            if message.first_attested_round > message.last_attested_round {
                return Err(TransactError::validation(
                    "message.first_attested_round",
                    format!(
                        "must not exceed last_attested_round ({} > {})",
                        message.first_attested_round, message.last_attested_round
                    ),
                ));
            }
        }
        Ok(())
    }
}

impl TransactionFields for StateProofTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::StateProof;
    const WIRE_KEYS: &'static [&'static str] = &["sp", "spmsg", "sptype"];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("sptype", &self.state_proof_type)
            .put("sp", &self.state_proof)
            .put("spmsg", &self.message);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            state_proof_type: map.take("sptype")?,
            state_proof: map.take("sp")?,
            message: map.take("spmsg")?,
        })
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::StateProof {
            header,
            fields: self,
        }
    }
}
