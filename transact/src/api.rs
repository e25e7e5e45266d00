//! # Consumer Surface
//!
//! Free functions over the flat [`TransactionRecord`], for callers that sit
//! behind a language boundary or a JSON pipe and do not want the typed
//! enum. Each call converts the record (checking that its tag and field
//! group agree and running the validators), does one thing, and converts
//! back.
//!
//! All functions are pure and re-entrant.

use crate::error::TransactError;
use crate::msgpack::CanonicalMsgpack;
use crate::transaction::{
    assign_group, sniff_transaction_type, FeeParams, SignedTransaction, Transaction, TransactionId,
    TransactionRecord, TransactionType,
};

/// `"TX"` followed by the canonical encoding: the bytes that are signed.
pub fn encode_transaction(record: &TransactionRecord) -> Result<Vec<u8>, TransactError> {
    Transaction::try_from(record.clone())?.encode()
}

/// The canonical encoding without the `"TX"` prefix.
pub fn encode_transaction_raw(record: &TransactionRecord) -> Result<Vec<u8>, TransactError> {
    Transaction::try_from(record.clone())?.encode_raw()
}

/// Parses canonical bytes, with or without the `"TX"` prefix.
pub fn decode_transaction(bytes: &[u8]) -> Result<TransactionRecord, TransactError> {
    Ok(Transaction::decode(bytes)?.into())
}

/// The envelope sent to the network. Never prefixed.
pub fn encode_signed_transaction(signed: &SignedTransaction) -> Result<Vec<u8>, TransactError> {
    signed.encode()
}

pub fn decode_signed_transaction(bytes: &[u8]) -> Result<SignedTransaction, TransactError> {
    SignedTransaction::decode(bytes)
}

/// The 52-character base32 transaction id.
pub fn get_transaction_id(record: &TransactionRecord) -> Result<String, TransactError> {
    Transaction::try_from(record.clone())?.id()
}

/// The 32-byte transaction id digest.
pub fn get_transaction_id_raw(record: &TransactionRecord) -> Result<[u8; 32], TransactError> {
    Transaction::try_from(record.clone())?.id_raw()
}

/// Kind of an encoded transaction, read from its keys without a full decode.
pub fn get_encoded_transaction_type(bytes: &[u8]) -> Result<TransactionType, TransactError> {
    sniff_transaction_type(bytes)
}

/// Returns `record` with its fee computed from `params`.
pub fn assign_fee(
    record: &TransactionRecord,
    params: &FeeParams,
) -> Result<TransactionRecord, TransactError> {
    Ok(Transaction::try_from(record.clone())?.assign_fee(params)?.into())
}

/// Returns `records` with a shared group id assigned.
pub fn group_transactions(
    records: &[TransactionRecord],
) -> Result<Vec<TransactionRecord>, TransactError> {
    let txs = records
        .iter()
        .cloned()
        .map(Transaction::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(assign_group(&txs)?.into_iter().map(Into::into).collect())
}
