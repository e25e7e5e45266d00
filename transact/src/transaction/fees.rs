//! # Fee Assignment
//!
//! The network charges per byte of the *signed* transaction, with a floor:
//!
//! ```text
//! fee = max(fee_per_byte * (unsigned_size + 75), min_fee) + extra_fee
//! ```
//!
//! 75 bytes is the overhead of wrapping the transaction in a single-signature
//! envelope (`sig` key, 64-byte signature, `txn` key). The fee field itself
//! changes the size, so the estimate is taken with the fee unset.
//!
//! Everything uses checked arithmetic; overflow is an input error rather
//! than a wrapped fee.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::SIGNATURE_ENCODING_INCR;
use crate::error::TransactError;
use crate::msgpack::CanonicalMsgpack;

use super::builder::Transaction;

/// Network fee parameters, as reported by the node's suggested params.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeParams {
    /// microAlgos per byte. Zero when the network is not congested.
    pub fee_per_byte: u64,
    /// Floor for any transaction.
    pub min_fee: u64,
    /// Added on top, typically to cover inner transactions or pooled fees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_fee: Option<u64>,
    /// Ceiling the caller is willing to pay.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_fee: Option<u64>,
}

impl FeeParams {
    pub fn new(fee_per_byte: u64, min_fee: u64) -> Self {
        Self {
            fee_per_byte,
            min_fee,
            extra_fee: None,
            max_fee: None,
        }
    }

    pub fn with_extra_fee(mut self, extra_fee: u64) -> Self {
        self.extra_fee = Some(extra_fee);
        self
    }

    pub fn with_max_fee(mut self, max_fee: u64) -> Self {
        self.max_fee = Some(max_fee);
        self
    }
}

/// Estimated size in bytes of `tx` once signed.
pub fn estimate_size(tx: &Transaction) -> Result<u64, TransactError> {
    let mut unfunded = tx.clone();
    unfunded.header_mut().fee = None;
    let raw = unfunded.encode_raw()?;
    Ok((raw.len() + SIGNATURE_ENCODING_INCR) as u64)
}

/// Fee `tx` should carry under `params`. Does not modify `tx`.
pub fn calculate_fee(tx: &Transaction, params: &FeeParams) -> Result<u64, TransactError> {
    let size = estimate_size(tx)?;
    let by_size = params
        .fee_per_byte
        .checked_mul(size)
        .ok_or_else(|| TransactError::Input(format!("fee overflow: {} * {size}", params.fee_per_byte)))?;

    let fee = by_size
        .max(params.min_fee)
        .checked_add(params.extra_fee.unwrap_or(0))
        .ok_or_else(|| TransactError::Input("fee overflow adding extra fee".into()))?;

    if let Some(max_fee) = params.max_fee {
        if fee > max_fee {
            return Err(TransactError::Input(format!(
                "transaction fee {fee} exceeds max fee {max_fee}"
            )));
        }
    }

    debug!(size, fee, "calculated fee");
    Ok(fee)
}

impl Transaction {
    /// Returns a copy of this transaction with its fee set per `params`.
    ///
    /// ```
    /// use algokit_transact::identity::Address;
    /// use algokit_transact::transaction::{FeeParams, PaymentTransactionFields, TransactionBuilder};
    ///
    /// let tx = TransactionBuilder::new(Address::new([1u8; 32]), 1, 1000)
    ///     .build(PaymentTransactionFields {
    ///         receiver: Address::new([2u8; 32]),
    ///         amount: 1,
    ///         close_remainder_to: None,
    ///     })
    ///     .unwrap();
    ///
    /// let funded = tx.assign_fee(&FeeParams::new(0, 1000)).unwrap();
    /// assert_eq!(funded.fee(), 1000);
    /// assert_eq!(tx.fee(), 0);
    /// ```
    pub fn assign_fee(&self, params: &FeeParams) -> Result<Transaction, TransactError> {
        let fee = calculate_fee(self, params)?;
        let mut tx = self.clone();
        tx.header_mut().fee = (fee != 0).then_some(fee);
        Ok(tx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Address;
    use crate::transaction::{PaymentTransactionFields, TransactionBuilder};

    fn payment() -> Transaction {
        TransactionBuilder::new(Address::new([1u8; 32]), 1, 1000)
            .build(PaymentTransactionFields {
                receiver: Address::new([2u8; 32]),
                amount: 1,
                close_remainder_to: None,
            })
            .unwrap()
    }

    #[test]
    fn size_ignores_existing_fee() {
        let tx = payment();
        let funded = tx.assign_fee(&FeeParams::new(0, 123_456)).unwrap();
        assert_eq!(estimate_size(&tx).unwrap(), estimate_size(&funded).unwrap());
        assert_eq!(
            estimate_size(&tx).unwrap(),
            tx.encode_raw().unwrap().len() as u64 + 75
        );
    }

    #[test]
    fn per_byte_fee_above_floor() {
        let tx = payment();
        let size = estimate_size(&tx).unwrap();
        assert_eq!(calculate_fee(&tx, &FeeParams::new(10, 1000)).unwrap(), size * 10);
    }

    #[test]
    fn extra_fee_added_after_floor() {
        let tx = payment();
        let params = FeeParams::new(0, 1000).with_extra_fee(500);
        assert_eq!(calculate_fee(&tx, &params).unwrap(), 1500);
    }

    #[test]
    fn max_fee_enforced() {
        let tx = payment();
        let params = FeeParams::new(0, 2000).with_max_fee(1000);
        let err = calculate_fee(&tx, &params).unwrap_err();
        assert_eq!(
            err,
            TransactError::Input("transaction fee 2000 exceeds max fee 1000".into())
        );
    }

    #[test]
    fn overflow_is_an_error() {
        let tx = payment();
        assert!(calculate_fee(&tx, &FeeParams::new(u64::MAX, 0)).is_err());
        let params = FeeParams::new(0, u64::MAX).with_extra_fee(1);
        assert!(calculate_fee(&tx, &params).is_err());
    }

    #[test]
    fn zero_fee_stays_unset() {
        let tx = payment().assign_fee(&FeeParams::new(0, 0)).unwrap();
        assert_eq!(tx.header().fee, None);
    }
}
