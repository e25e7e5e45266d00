//! # Multisignature Accounts
//!
//! A multisig account is an ordered list of participant addresses plus a
//! threshold. Its address is derived, not generated:
//!
//! ```text
//! SHA-512/256("MultisigAddr" || version || threshold || pk_1 || ... || pk_n)
//! ```
//!
//! Participant order matters: the same keys in a different order form a
//! different account. The signature attached to a transaction carries every
//! participant, with a signature slot that is filled in as co-signers sign.

use serde::{Deserialize, Serialize};

use crate::config::{MULTISIG_DOMAIN_SEPARATOR, SIGNATURE_LENGTH};
use crate::crypto::hash_with_prefix;
use crate::error::TransactError;
use crate::msgpack::{msgpack_list, CanonicalMap, Decode, Encode, MapReader, Value};

use super::Address;

/// The only multisig version the network defines.
pub const MULTISIG_VERSION: u8 = 1;

/// One participant of a multisig account and, once collected, their
/// signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigSubsignature {
    pub address: Address,
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub signature: Option<[u8; SIGNATURE_LENGTH]>,
}

/// A multisig signature: the account definition plus per-participant
/// signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultisigSignature {
    pub version: u8,
    pub threshold: u8,
    pub subsignatures: Vec<MultisigSubsignature>,
}

impl MultisigSignature {
    /// Define a multisig account with no signatures collected yet.
    pub fn new(version: u8, threshold: u8, participants: Vec<Address>) -> Result<Self, TransactError> {
        if version != MULTISIG_VERSION {
            return Err(TransactError::validation(
                "version",
                format!("unsupported multisig version {version}"),
            ));
        }
        if participants.is_empty() {
            return Err(TransactError::validation(
                "subsignatures",
                "at least one participant is required",
            ));
        }
        if threshold == 0 || usize::from(threshold) > participants.len() {
            return Err(TransactError::validation(
                "threshold",
                format!(
                    "must be between 1 and {} participants, got {threshold}",
                    participants.len()
                ),
            ));
        }

        Ok(Self {
            version,
            threshold,
            subsignatures: participants
                .into_iter()
                .map(|address| MultisigSubsignature {
                    address,
                    signature: None,
                })
                .collect(),
        })
    }

    /// The account address this signature belongs to.
    pub fn address(&self) -> Address {
        let mut data = Vec::with_capacity(2 + 32 * self.subsignatures.len());
        data.push(self.version);
        data.push(self.threshold);
        for sub in &self.subsignatures {
            data.extend_from_slice(sub.address.as_bytes());
        }
        Address::new(hash_with_prefix(MULTISIG_DOMAIN_SEPARATOR, &data))
    }

    pub fn participants(&self) -> impl Iterator<Item = &Address> {
        self.subsignatures.iter().map(|s| &s.address)
    }

    /// Number of participants who have signed.
    pub fn signature_count(&self) -> usize {
        self.subsignatures
            .iter()
            .filter(|s| s.signature.is_some())
            .count()
    }

    pub fn is_complete(&self) -> bool {
        self.signature_count() >= usize::from(self.threshold)
    }

    /// Place `signature` in every slot belonging to `participant`.
    pub fn with_signature(
        mut self,
        participant: &Address,
        signature: [u8; SIGNATURE_LENGTH],
    ) -> Result<Self, TransactError> {
        let mut found = false;
        for sub in self.subsignatures.iter_mut().filter(|s| &s.address == participant) {
            sub.signature = Some(signature);
            found = true;
        }
        if !found {
            return Err(TransactError::Input(format!(
                "{participant} is not a participant of multisig {}",
                self.address()
            )));
        }
        Ok(self)
    }

    /// Combine signatures collected separately for the same account.
    pub fn merge(mut self, other: &MultisigSignature) -> Result<Self, TransactError> {
        if self.address() != other.address() {
            return Err(TransactError::Input(
                "cannot merge signatures for different multisig accounts".into(),
            ));
        }
        for (mine, theirs) in self.subsignatures.iter_mut().zip(&other.subsignatures) {
            match (&mine.signature, &theirs.signature) {
                (Some(a), Some(b)) if a != b => {
                    return Err(TransactError::Input(format!(
                        "conflicting signatures for participant {}",
                        mine.address
                    )));
                }
                (None, Some(b)) => mine.signature = Some(*b),
                _ => {}
            }
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// Wire Form
// ---------------------------------------------------------------------------

impl Encode for MultisigSubsignature {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("pk", &self.address).put("s", &self.signature);
        map.finish()
    }
}

impl Decode for MultisigSubsignature {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let sub = Self {
            address: map.take_or_default("pk")?,
            signature: map.take("s")?,
        };
        map.finish()?;
        Ok(sub)
    }
}

msgpack_list!(MultisigSubsignature);

impl Encode for MultisigSignature {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("subsig", &self.subsignatures)
            .put("thr", &self.threshold)
            .put("v", &self.version);
        map.finish()
    }
}

impl Decode for MultisigSignature {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let msig = Self {
            version: map.take_or_default("v")?,
            threshold: map.take_or_default("thr")?,
            subsignatures: map.take_or_default("subsig")?,
        };
        map.finish()?;
        Ok(msig)
    }
}
