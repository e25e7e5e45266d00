//! Field validation.
//!
//! Every kind-specific field group implements [`Validate`]. The checks run
//! when a transaction is built, when a consumer record is converted into a
//! typed transaction, and on decode, so a transaction that violates them
//! can neither be encoded nor come out of the decoder.
//!
//! Validation fails fast on the first violated rule and reports the field
//! name together with the expected and actual values. Nothing is ever
//! truncated or padded to fit.

use crate::error::TransactError;

/// Field-level consistency rules for a transaction component.
pub trait Validate {
    fn validate(&self) -> Result<(), TransactError>;
}

/// Copy `bytes` into a fixed-length array, failing if the length is wrong.
///
/// ```
/// use algokit_transact::transaction::validation::fixed_length;
///
/// let key: [u8; 4] = fixed_length("vote_key", &[1, 2, 3, 4]).unwrap();
/// assert_eq!(key, [1, 2, 3, 4]);
/// assert!(fixed_length::<4>("vote_key", &[1, 2, 3]).is_err());
/// ```
pub fn fixed_length<const N: usize>(field: &str, bytes: &[u8]) -> Result<[u8; N], TransactError> {
    bytes.try_into().map_err(|_| {
        TransactError::validation(
            field,
            format!("expected {N} bytes, got {}", bytes.len()),
        )
    })
}

/// Fail if `len` exceeds `max`.
pub fn max_length(field: &str, len: usize, max: usize) -> Result<(), TransactError> {
    if len > max {
        return Err(TransactError::validation(
            field,
            format!("must be at most {max} bytes, got {len}"),
        ));
    }
    Ok(())
}

/// Fail if an entity id is zero where a reference to an existing entity is
/// required.
pub fn non_zero_id(field: &str, id: u64) -> Result<(), TransactError> {
    if id == 0 {
        return Err(TransactError::validation(field, "must be non-zero"));
    }
    Ok(())
}
