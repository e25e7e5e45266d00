//! Atomic transaction groups.
//!
//! A group id commits to the ordered list of member transaction ids:
//!
//! ```text
//! SHA-512/256("TG" || msgpack({"txlist": [id_raw_1, ..., id_raw_n]}))
//! ```
//!
//! Every member then carries that id in its `grp` field. Members are hashed
//! ungrouped, so a transaction that already has a group is rejected rather
//! than silently regrouped.

use tracing::debug;

use crate::config::{HASH_LENGTH, MAX_TX_GROUP_SIZE, TRANSACTION_GROUP_DOMAIN_SEPARATOR};
use crate::crypto::sha512_256;
use crate::error::TransactError;
use crate::msgpack::{CanonicalMap, CanonicalMsgpack, MapReader, Value};

use super::builder::Transaction;
use super::id::TransactionId;

/// Hash input for a group id.
#[derive(Debug, Clone, PartialEq, Eq)]
struct GroupedTransactions {
    tx_hashes: Vec<[u8; HASH_LENGTH]>,
}

impl CanonicalMsgpack for GroupedTransactions {
    const PREFIX: &'static [u8] = TRANSACTION_GROUP_DOMAIN_SEPARATOR;

    fn to_msgpack(&self) -> Result<Value, TransactError> {
        let mut map = CanonicalMap::new();
        map.put("txlist", &self.tx_hashes);
        Ok(map.finish())
    }

    fn from_msgpack(value: Value) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, "group")?;
        let grouped = Self {
            tx_hashes: map.take_or_default("txlist")?,
        };
        map.finish()?;
        Ok(grouped)
    }
}

/// Compute the group id for `txs`, in order.
pub fn compute_group_id(txs: &[Transaction]) -> Result<[u8; HASH_LENGTH], TransactError> {
    if txs.is_empty() {
        return Err(TransactError::Input(
            "transaction group size cannot be 0".into(),
        ));
    }
    if txs.len() > MAX_TX_GROUP_SIZE {
        return Err(TransactError::Input(format!(
            "transaction group size {} exceeds the max limit of {MAX_TX_GROUP_SIZE}",
            txs.len()
        )));
    }

    let tx_hashes = txs
        .iter()
        .enumerate()
        .map(|(i, tx)| {
            if tx.header().group.is_some() {
                return Err(TransactError::Input(format!(
                    "transaction {i} is already grouped"
                )));
            }
            tx.id_raw()
        })
        .collect::<Result<Vec<_>, _>>()?;

    let encoded = GroupedTransactions { tx_hashes }.encode()?;
    Ok(sha512_256(&encoded))
}

/// Returns copies of `txs` with their group set to the computed group id.
pub fn assign_group(txs: &[Transaction]) -> Result<Vec<Transaction>, TransactError> {
    let group = compute_group_id(txs)?;
    debug!(size = txs.len(), group = %hex::encode(group), "assigned group");
    Ok(txs
        .iter()
        .map(|tx| {
            let mut tx = tx.clone();
            tx.header_mut().group = Some(group);
            tx
        })
        .collect())
}
