//! Transaction construction via the builder pattern.
//!
//! The [`TransactionBuilder`] enforces a disciplined construction flow:
//! set the header fields, hand the kind-specific fields to `.build()`, and
//! get back a validated, immutable [`Transaction`]. Nothing that fails
//! validation can come out of the builder, so the encoder never sees it.
//!
//! The builder does not sign; that happens in [`super::signing`]. This
//! separation keeps construction testable without key material.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::HASH_LENGTH;
use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{CanonicalMap, Encode, MapReader};

use super::app_call::AppCallTransactionFields;
use super::asset_config::AssetConfigTransactionFields;
use super::asset_freeze::AssetFreezeTransactionFields;
use super::asset_transfer::AssetTransferTransactionFields;
use super::header::TransactionHeader;
use super::heartbeat::HeartbeatTransactionFields;
use super::key_registration::KeyRegistrationTransactionFields;
use super::payment::PaymentTransactionFields;
use super::record::TransactionRecord;
use super::state_proof::StateProofTransactionFields;
use super::types::TransactionType;
use super::validation::Validate;

// ---------------------------------------------------------------------------
// TransactionFields
// ---------------------------------------------------------------------------

/// A kind-specific field group.
///
/// Each group knows its type tag, the top-level wire keys it owns, how to
/// write and read those keys, and which [`Transaction`] variant it becomes.
pub trait TransactionFields: Validate + Sized {
    const TRANSACTION_TYPE: TransactionType;

    /// Top-level keys this group may write, sorted.
    const WIRE_KEYS: &'static [&'static str];

    fn write_fields(&self, map: &mut CanonicalMap);

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError>;

    fn into_transaction(self, header: TransactionHeader) -> Transaction;
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// An unsigned transaction.
///
/// One variant per kind, each pairing the shared [`TransactionHeader`]
/// with exactly one kind-specific field group. The variant *is* the type
/// tag, so a tag that disagrees with its fields cannot be represented.
///
/// Serde uses the flat [`TransactionRecord`] shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "TransactionRecord", try_from = "TransactionRecord")]
pub enum Transaction {
    Payment {
        header: TransactionHeader,
        fields: PaymentTransactionFields,
    },
    AssetTransfer {
        header: TransactionHeader,
        fields: AssetTransferTransactionFields,
    },
    AssetConfig {
        header: TransactionHeader,
        fields: AssetConfigTransactionFields,
    },
    AssetFreeze {
        header: TransactionHeader,
        fields: AssetFreezeTransactionFields,
    },
    AppCall {
        header: TransactionHeader,
        fields: AppCallTransactionFields,
    },
    KeyRegistration {
        header: TransactionHeader,
        fields: KeyRegistrationTransactionFields,
    },
    Heartbeat {
        header: TransactionHeader,
        fields: HeartbeatTransactionFields,
    },
    StateProof {
        header: TransactionHeader,
        fields: StateProofTransactionFields,
    },
}

/// Runs `$body` with the header and field group of whichever variant
/// `$tx` holds. Works for shared and mutable borrows alike.
macro_rules! dispatch {
    ($tx:expr, $header:ident, $fields:ident => $body:expr) => {
        match $tx {
            Transaction::Payment { header: $header, fields: $fields } => $body,
            Transaction::AssetTransfer { header: $header, fields: $fields } => $body,
            Transaction::AssetConfig { header: $header, fields: $fields } => $body,
            Transaction::AssetFreeze { header: $header, fields: $fields } => $body,
            Transaction::AppCall { header: $header, fields: $fields } => $body,
            Transaction::KeyRegistration { header: $header, fields: $fields } => $body,
            Transaction::Heartbeat { header: $header, fields: $fields } => $body,
            Transaction::StateProof { header: $header, fields: $fields } => $body,
        }
    };
}

pub(crate) use dispatch;

impl Transaction {
    pub fn header(&self) -> &TransactionHeader {
        dispatch!(self, header, _fields => header)
    }

    pub(crate) fn header_mut(&mut self) -> &mut TransactionHeader {
        dispatch!(self, header, _fields => header)
    }

    pub fn transaction_type(&self) -> TransactionType {
        match self {
            Self::Payment { .. } => TransactionType::Payment,
            Self::AssetTransfer { .. } => TransactionType::AssetTransfer,
            Self::AssetConfig { .. } => TransactionType::AssetConfig,
            Self::AssetFreeze { .. } => TransactionType::AssetFreeze,
            Self::AppCall { .. } => TransactionType::AppCall,
            Self::KeyRegistration { .. } => TransactionType::KeyRegistration,
            Self::Heartbeat { .. } => TransactionType::Heartbeat,
            Self::StateProof { .. } => TransactionType::StateProof,
        }
    }

    pub fn sender(&self) -> &Address {
        &self.header().sender
    }

    /// The fee currently set, zero if unassigned.
    pub fn fee(&self) -> u64 {
        self.header().fee.unwrap_or(0)
    }

    /// Re-run every construction-time check.
    pub fn validate(&self) -> Result<(), TransactError> {
        dispatch!(self, header, fields => {
            header.validate()?;
            fields.validate()
        })
    }

    /// Returns a copy with the header replaced. The result is validated
    /// and its zero values normalised like the builder's.
    pub fn with_header(&self, header: TransactionHeader) -> Result<Self, TransactError> {
        let mut tx = self.clone();
        *tx.header_mut() = header;
        tx.normalized()
    }

    pub(crate) fn write_fields(&self, map: &mut CanonicalMap) {
        dispatch!(self, header, fields => {
            header.write_fields(map);
            fields.write_fields(map);
        })
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for constructing validated [`Transaction`] instances.
///
/// # Usage
///
/// ```
/// use algokit_transact::identity::Address;
/// use algokit_transact::transaction::{PaymentTransactionFields, TransactionBuilder};
///
/// let sender = Address::new([1u8; 32]);
/// let tx = TransactionBuilder::new(sender, 1_000, 2_000)
///     .genesis_id("testnet-v1.0")
///     .genesis_hash([0x48; 32])
///     .note(b"lunch".to_vec())
///     .build(PaymentTransactionFields {
///         receiver: Address::new([2u8; 32]),
///         amount: 5_000_000,
///         close_remainder_to: None,
///     })
///     .unwrap();
///
/// assert_eq!(tx.header().first_valid, 1_000);
/// ```
///
/// Setters normalise zero values (empty note, all-zero hash, zero fee) to
/// "unset", since the wire format cannot tell them apart. [`build`]
/// does the same for the kind-specific fields.
///
/// [`build`]: TransactionBuilder::build
#[derive(Debug, Clone)]
pub struct TransactionBuilder {
    header: TransactionHeader,
}

pub(crate) fn non_zero<T: Encode>(value: T) -> Option<T> {
    if value.is_zero() {
        None
    } else {
        Some(value)
    }
}

impl TransactionBuilder {
    pub fn new(sender: Address, first_valid: u64, last_valid: u64) -> Self {
        Self {
            header: TransactionHeader {
                sender,
                first_valid,
                last_valid,
                ..Default::default()
            },
        }
    }

    /// Start from an existing header, e.g. one shared across a group or
    /// read from JSON. Zero values in it are normalised by [`build`].
    ///
    /// [`build`]: TransactionBuilder::build
    pub fn from_header(header: TransactionHeader) -> Self {
        Self { header }
    }

    /// Sets the fee explicitly. Usually left unset and filled in by
    /// [`Transaction::assign_fee`].
    pub fn fee(mut self, fee: u64) -> Self {
        self.header.fee = non_zero(fee);
        self
    }

    pub fn genesis_hash(mut self, hash: [u8; HASH_LENGTH]) -> Self {
        self.header.genesis_hash = non_zero(hash);
        self
    }

    pub fn genesis_id(mut self, id: impl Into<String>) -> Self {
        self.header.genesis_id = non_zero(id.into());
        self
    }

    pub fn note(mut self, note: impl Into<Vec<u8>>) -> Self {
        self.header.note = non_zero(note.into());
        self
    }

    pub fn rekey_to(mut self, address: Address) -> Self {
        self.header.rekey_to = non_zero(address);
        self
    }

    pub fn lease(mut self, lease: [u8; HASH_LENGTH]) -> Self {
        self.header.lease = non_zero(lease);
        self
    }

    pub fn group(mut self, group: [u8; HASH_LENGTH]) -> Self {
        self.header.group = non_zero(group);
        self
    }

    /// Consumes the builder and produces a validated [`Transaction`].
    ///
    /// Zero values inside `fields` are normalised too: `Some(0)`,
    /// `Some(false)`, or an empty schema come back as `None`, which is what
    /// decoding the encoded bytes would give.
    pub fn build<F: TransactionFields>(self, fields: F) -> Result<Transaction, TransactError> {
        let tx = fields.into_transaction(self.header).normalized()?;
        debug!(
            transaction_type = %F::TRANSACTION_TYPE,
            sender = %tx.sender(),
            first_valid = tx.header().first_valid,
            last_valid = tx.header().last_valid,
            "built transaction"
        );
        Ok(tx)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
