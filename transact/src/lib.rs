// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # algokit-transact
//!
//! Canonical, deterministic encoding of Algorand transactions. Two
//! implementations fed the same logical transaction must agree on every
//! byte, because those bytes are hashed into the transaction id and signed.
//! This crate is that encoding, plus the pieces that sit directly on it.
//!
//! ## Architecture
//!
//! - **msgpack**: the canonical msgpack dialect (sorted keys, minimal
//!   widths, zero values omitted) and the prefix layer.
//! - **identity**: addresses and multisignature accounts.
//! - **crypto**: SHA-512/256, base32, and the signer boundary.
//! - **transaction**: the typed model, validators, codec, ids, fees,
//!   groups, and the signed envelope.
//! - **api**: flat free functions over [`TransactionRecord`] for
//!   consumers behind a language or process boundary.
//! - **config**: protocol constants.
//!
//! ## Quick start
//!
//! ```
//! use algokit_transact::identity::Address;
//! use algokit_transact::msgpack::CanonicalMsgpack;
//! use algokit_transact::transaction::{
//!     FeeParams, PaymentTransactionFields, Transaction, TransactionBuilder, TransactionId,
//! };
//!
//! let tx = TransactionBuilder::new(Address::new([1u8; 32]), 1_000, 2_000)
//!     .genesis_id("testnet-v1.0")
//!     .build(PaymentTransactionFields {
//!         receiver: Address::new([2u8; 32]),
//!         amount: 1_000_000,
//!         close_remainder_to: None,
//!     })?
//!     .assign_fee(&FeeParams::new(0, 1_000))?;
//!
//! let bytes = tx.encode()?;
//! assert_eq!(&bytes[..2], b"TX");
//! assert_eq!(Transaction::decode(&bytes)?, tx);
//! assert_eq!(tx.id()?.len(), 52);
//! # Ok::<(), algokit_transact::TransactError>(())
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Bytes are the contract. Nothing is sorted, skipped, or widened by
//!    accident; the writer is explicit about all three.
//! 2. Invalid transactions cannot be built, so the encoder never sees one.
//! 3. Every operation is a pure function of its input.

pub mod api;
pub mod config;
pub mod crypto;
pub mod error;
pub mod identity;
pub mod msgpack;
mod serde_hex;
pub mod transaction;

pub use api::{
    assign_fee, decode_signed_transaction, decode_transaction, encode_signed_transaction,
    encode_transaction, encode_transaction_raw, get_encoded_transaction_type,
    get_transaction_id, get_transaction_id_raw, group_transactions,
};
pub use error::TransactError;
pub use identity::Address;
pub use transaction::{
    FeeParams, SignedTransaction, Transaction, TransactionBuilder, TransactionRecord,
    TransactionType,
};
