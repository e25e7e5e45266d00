//! # Signed Transactions
//!
//! The envelope sent to the network: the transaction map under `txn` plus
//! whatever authorizes it.
//!
//! | key    | meaning                                               |
//! |--------|-------------------------------------------------------|
//! | `txn`  | the unsigned transaction map                          |
//! | `sig`  | single Ed25519 signature                              |
//! | `msig` | multisignature                                        |
//! | `sgnr` | authorizing address, only when it differs from sender |
//!
//! The envelope has no domain prefix. The `"TX"` prefix belongs to the
//! bytes that were signed, not to the bytes that are sent.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::config::SIGNATURE_LENGTH;
use crate::error::TransactError;
use crate::identity::{Address, MultisigSignature};
use crate::msgpack::{CanonicalMap, CanonicalMsgpack, MapReader, Value};

use super::builder::Transaction;
use super::codec::decode_at;
use super::id::TransactionId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub transaction: Transaction,

    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub signature: Option<[u8; SIGNATURE_LENGTH]>,

    /// Set when the sender has been rekeyed to another account.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_address: Option<Address>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multisignature: Option<MultisigSignature>,
}

impl SignedTransaction {
    /// An envelope with no authorization attached yet.
    pub fn unsigned(transaction: Transaction) -> Self {
        Self {
            transaction,
            signature: None,
            auth_address: None,
            multisignature: None,
        }
    }

    /// The id of the inner transaction. Authorization does not change it.
    pub fn id(&self) -> Result<String, TransactError> {
        self.transaction.id()
    }

    pub fn id_raw(&self) -> Result<[u8; 32], TransactError> {
        self.transaction.id_raw()
    }

    fn check_authorization(&self, path: &str) -> Result<(), TransactError> {
        if self.signature.is_some() && self.multisignature.is_some() {
            return Err(TransactError::decoding(
                path,
                "only one of `sig` and `msig` may be set",
            ));
        }
        Ok(())
    }
}

impl CanonicalMsgpack for SignedTransaction {
    const PREFIX: &'static [u8] = b"";

    fn to_msgpack(&self) -> Result<Value, TransactError> {
        if self.signature.is_some() && self.multisignature.is_some() {
            return Err(TransactError::encoding(
                "signed transaction carries both `sig` and `msig`",
            ));
        }
        let mut map = CanonicalMap::new();
        map.put_value("txn", self.transaction.to_msgpack()?)
            .put("sig", &self.signature)
            .put("sgnr", &self.auth_address)
            .put("msig", &self.multisignature);
        Ok(map.finish())
    }

    fn from_msgpack(value: Value) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, "stxn")?;
        let txn = map
            .take_value("txn")
            .ok_or_else(|| TransactError::decoding(map.child("txn"), "required field is missing"))?;
        let signed = Self {
            transaction: decode_at(txn, &map.child("txn"))?,
            signature: map.take("sig")?,
            auth_address: map.take("sgnr")?,
            multisignature: map.take("msig")?,
        };
        signed.check_authorization(map.path())?;
        map.finish()?;
        trace!(
            signed = signed.signature.is_some(),
            multisig = signed.multisignature.is_some(),
            rekeyed = signed.auth_address.is_some(),
            "decoded signed transaction"
        );
        Ok(signed)
    }
}

/// Concatenate envelopes, the form a node accepts for group submission.
pub fn encode_signed_transactions(signed: &[SignedTransaction]) -> Result<Vec<u8>, TransactError> {
    let mut out = Vec::new();
    for stxn in signed {
        out.extend(stxn.encode()?);
    }
    Ok(out)
}
