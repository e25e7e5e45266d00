//! Key registration transactions.
//!
//! A key registration puts an account into one of three states:
//!
//! - **online**: all participation keys, the voting window, and the key
//!   dilution are set;
//! - **offline**: every key registration field is absent;
//! - **non-participating**: only `non_participation` is set. This is
//!   permanent and forfeits rewards for good.

use serde::{Deserialize, Serialize};

use crate::config::{SELECTION_KEY_LENGTH, STATE_PROOF_KEY_LENGTH, VOTE_KEY_LENGTH};
use crate::error::TransactError;
use crate::msgpack::{CanonicalMap, MapReader};

use super::builder::{non_zero, Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::TransactionType;
use super::validation::{fixed_length, Validate};

/// Participation key material and voting window.
///
/// Key lengths are enforced by the array types, so the only way to create
/// one from untrusted byte slices is through [`online`](Self::online),
/// which fails with a validation error instead of truncating or padding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyRegistrationTransactionFields {
    /// Root participation public key.
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub vote_key: Option<[u8; VOTE_KEY_LENGTH]>,

    /// VRF public key.
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub selection_key: Option<[u8; SELECTION_KEY_LENGTH]>,

    /// State proof public key.
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub state_proof_key: Option<[u8; STATE_PROOF_KEY_LENGTH]>,

    /// First round the participation key is valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_first: Option<u64>,

    /// Last round the participation key is valid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_last: Option<u64>,

    /// Dilution for the two-level participation key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_key_dilution: Option<u64>,

    /// Permanently opt out of participation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_participation: Option<bool>,
}

impl KeyRegistrationTransactionFields {
    /// Build an online registration from raw key bytes, checking every
    /// length and the voting window.
    ///
    /// A zero round or dilution cannot be told apart from an absent one on
    /// the wire, so it counts as missing and the registration is rejected.
    pub fn online(
        vote_key: &[u8],
        selection_key: &[u8],
        state_proof_key: &[u8],
        vote_first: u64,
        vote_last: u64,
        vote_key_dilution: u64,
    ) -> Result<Self, TransactError> {
        let fields = Self {
            vote_key: Some(fixed_length("vote_key", vote_key)?),
            selection_key: Some(fixed_length("selection_key", selection_key)?),
            state_proof_key: Some(fixed_length("state_proof_key", state_proof_key)?),
            vote_first: non_zero(vote_first),
            vote_last: non_zero(vote_last),
            vote_key_dilution: non_zero(vote_key_dilution),
            non_participation: None,
        };
        fields.validate()?;
        Ok(fields)
    }

    /// Take the account offline.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Permanently mark the account non-participating.
    pub fn non_participating() -> Self {
        Self {
            non_participation: Some(true),
            ..Self::default()
        }
    }

    fn has_participation_fields(&self) -> bool {
        self.vote_key.is_some()
            || self.selection_key.is_some()
            || self.state_proof_key.is_some()
            || self.vote_first.is_some()
            || self.vote_last.is_some()
            || self.vote_key_dilution.is_some()
    }

    pub fn is_online(&self) -> bool {
        self.has_participation_fields()
    }

    pub fn is_non_participating(&self) -> bool {
        self.non_participation == Some(true)
    }

    pub fn is_offline(&self) -> bool {
        !self.is_online() && !self.is_non_participating()
    }

    fn validate_window(&self) -> Result<(), TransactError> {
        if let (Some(first), Some(last)) = (self.vote_first, self.vote_last) {
            if first >= last {
                return Err(TransactError::validation(
                    "vote_first",
                    format!("vote_first must be less than vote_last ({first} >= {last})"),
                ));
            }
        }
        Ok(())
    }
}

impl Validate for KeyRegistrationTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        self.validate_window()?;

        if !self.has_participation_fields() {
            return Ok(());
        }

        let required = [
            ("vote_key", self.vote_key.is_some()),
            ("selection_key", self.selection_key.is_some()),
            ("state_proof_key", self.state_proof_key.is_some()),
            ("vote_first", self.vote_first.is_some()),
            ("vote_last", self.vote_last.is_some()),
            ("vote_key_dilution", self.vote_key_dilution.is_some()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, present)| !present) {
            return Err(TransactError::validation(
                *field,
                format!("{field} is required for online key registration"),
            ));
        }

        if self.is_non_participating() {
            return Err(TransactError::validation(
                "non_participation",
                "online key registration cannot have non_participation flag set",
            ));
        }

        Ok(())
    }
}

impl TransactionFields for KeyRegistrationTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::KeyRegistration;
    const WIRE_KEYS: &'static [&'static str] = &[
        "nonpart", "selkey", "sprfkey", "votefst", "votekd", "votekey", "votelst",
    ];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("votekey", &self.vote_key)
            .put("selkey", &self.selection_key)
            .put("sprfkey", &self.state_proof_key)
            .put("votefst", &self.vote_first)
            .put("votelst", &self.vote_last)
            .put("votekd", &self.vote_key_dilution)
            .put("nonpart", &self.non_participation);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            vote_key: map.take("votekey")?,
            selection_key: map.take("selkey")?,
            state_proof_key: map.take("sprfkey")?,
            vote_first: map.take("votefst")?,
            vote_last: map.take("votelst")?,
            vote_key_dilution: map.take("votekd")?,
            non_participation: map.take("nonpart")?,
        })
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::KeyRegistration {
            header,
            fields: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Address;
    use crate::msgpack::{encode_value, CanonicalMsgpack};
    use crate::transaction::{TransactionBuilder, TransactionId};

    #[test]
    fn online_accepts_exact_lengths() {
        let fields =
            KeyRegistrationTransactionFields::online(&[1; 32], &[2; 32], &[3; 64], 100, 1000, 1000)
                .unwrap();
        assert!(fields.is_online());
        assert!(!fields.is_offline());
        assert_eq!(fields.vote_key, Some([1; 32]));
    }

    #[test]
    fn short_vote_key_rejected_before_encoding() {
        let err =
            KeyRegistrationTransactionFields::online(&[1; 31], &[2; 32], &[3; 64], 100, 1000, 1000)
                .unwrap_err();
        assert_eq!(
            err,
            TransactError::validation("vote_key", "expected 32 bytes, got 31")
        );
    }

    #[test]
    fn long_state_proof_key_rejected() {
        let err =
            KeyRegistrationTransactionFields::online(&[1; 32], &[2; 32], &[3; 65], 100, 1000, 1000)
                .unwrap_err();
        assert_eq!(
            err,
            TransactError::validation("state_proof_key", "expected 64 bytes, got 65")
        );
    }

    #[test]
    fn vote_window_must_be_increasing() {
        for (first, last) in [(1000, 100), (500, 500)] {
            let err = KeyRegistrationTransactionFields::online(
                &[1; 32], &[2; 32], &[3; 64], first, last, 1000,
            )
            .unwrap_err();
            assert!(err.is_validation());
            assert!(err.to_string().contains("vote_first must be less than vote_last"));
        }
    }

    #[test]
    fn partial_online_registration_rejected() {
        let fields = KeyRegistrationTransactionFields {
            vote_key: Some([1; 32]),
            ..Default::default()
        };
        let err = fields.validate().unwrap_err();
        assert_eq!(
            err,
            TransactError::validation(
                "selection_key",
                "selection_key is required for online key registration"
            )
        );
    }

    #[test]
    fn online_rejects_zero_rounds_and_dilution() {
        for (first, last, dilution, field) in [
            (0, 1000, 1000, "vote_first"),
            (100, 1000, 0, "vote_key_dilution"),
        ] {
            let err = KeyRegistrationTransactionFields::online(
                &[1; 32], &[2; 32], &[3; 64], first, last, dilution,
            )
            .unwrap_err();
            assert_eq!(
                err,
                TransactError::validation(
                    field,
                    format!("{field} is required for online key registration")
                )
            );
        }
    }

    #[test]
    fn explicit_false_nonpart_builds_as_offline() {
        let fields = KeyRegistrationTransactionFields {
            non_participation: Some(false),
            ..Default::default()
        };
        let tx = TransactionBuilder::new(Address::new([1; 32]), 1, 2)
            .build(fields)
            .unwrap();
        let Transaction::KeyRegistration { fields, .. } = &tx else {
            panic!("expected key registration");
        };
        assert_eq!(fields, &KeyRegistrationTransactionFields::offline());
        assert_eq!(Transaction::decode(&tx.encode().unwrap()).unwrap(), tx);
    }

    #[test]
    fn hand_built_zero_option_refused_by_encoder() {
        let tx = Transaction::KeyRegistration {
            header: TransactionHeader {
                sender: Address::new([1; 32]),
                first_valid: 1,
                last_valid: 2,
                ..Default::default()
            },
            fields: KeyRegistrationTransactionFields {
                non_participation: Some(false),
                ..Default::default()
            },
        };
        assert!(tx.validate().is_ok());
        assert!(tx.encode().unwrap_err().is_encoding());
    }

    #[test]
    fn hand_built_inverted_window_refused_by_encoder() {
        let tx = Transaction::KeyRegistration {
            header: TransactionHeader {
                sender: Address::new([1; 32]),
                first_valid: 1,
                last_valid: 2,
                ..Default::default()
            },
            fields: KeyRegistrationTransactionFields {
                vote_first: Some(1000),
                vote_last: Some(100),
                ..Default::default()
            },
        };
        let err = tx.encode().unwrap_err();
        assert!(err.is_validation());
        assert!(tx.id().is_err());
    }

    #[test]
    fn decode_rejects_incomplete_online_registration() {
        let mut map = CanonicalMap::new();
        map.put("type", &TransactionType::KeyRegistration)
            .put("fv", &1u64)
            .put("lv", &2u64)
            .put("votekey", &[1u8; 32]);
        let bytes = encode_value(&map.finish()).unwrap();
        let err = Transaction::decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding(
                "txn",
                "invalid `selection_key`: selection_key is required for online key registration"
            )
        );
    }

    #[test]
    fn online_with_nonpart_rejected() {
        let mut fields =
            KeyRegistrationTransactionFields::online(&[1; 32], &[2; 32], &[3; 64], 100, 1000, 1000)
                .unwrap();
        fields.non_participation = Some(true);
        assert!(fields.validate().is_err());
    }

    #[test]
    fn offline_and_nonpart_states() {
        let offline = KeyRegistrationTransactionFields::offline();
        assert!(offline.is_offline());
        assert!(offline.validate().is_ok());

        let nonpart = KeyRegistrationTransactionFields::non_participating();
        assert!(nonpart.is_non_participating());
        assert!(!nonpart.is_offline());
        assert!(nonpart.validate().is_ok());
    }

    #[test]
    fn offline_writes_no_keyreg_keys() {
        let mut map = CanonicalMap::new();
        KeyRegistrationTransactionFields::offline().write_fields(&mut map);
        assert!(map.is_empty());
    }
}
