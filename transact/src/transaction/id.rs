//! Transaction ids.
//!
//! The id is `SHA-512/256("TX" || canonical bytes)`, shown as unpadded
//! base32. External verifiers recompute it from the same bytes, so nothing
//! but the prefixed canonical encoding may be hashed here.

use crate::config::TRANSACTION_ID_LENGTH;
use crate::crypto::{base32_encode, sha512_256};
use crate::error::TransactError;
use crate::msgpack::CanonicalMsgpack;

use super::builder::Transaction;

/// Anything that can be identified by the hash of its prefixed canonical
/// encoding.
pub trait TransactionId: CanonicalMsgpack {
    /// The 32-byte digest.
    fn id_raw(&self) -> Result<[u8; 32], TransactError> {
        Ok(sha512_256(&self.encode()?))
    }

    /// The 52-character base32 form of [`id_raw`](Self::id_raw).
    fn id(&self) -> Result<String, TransactError> {
        let id = base32_encode(&self.id_raw()?);
        debug_assert_eq!(id.len(), TRANSACTION_ID_LENGTH);
        Ok(id)
    }
}

impl TransactionId for Transaction {}
