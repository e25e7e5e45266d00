//! # Transaction Module
//!
//! The typed transaction model and everything that turns it into bytes:
//! construction, validation, canonical encoding, ids, fees, groups, and the
//! signed envelope.
//!
//! ## Architecture
//!
//! ```text
//! types.rs        TransactionType, OnApplicationComplete
//! header.rs       fields shared by every kind
//! payment.rs ...  one field group per kind (8 in total)
//! validation.rs   the Validate trait and shared length checks
//! builder.rs      Transaction enum, TransactionFields, TransactionBuilder
//! codec.rs        canonical msgpack for Transaction, type sniffing
//! id.rs           transaction ids
//! fees.rs         fee estimation and assignment
//! group.rs        atomic group ids
//! signed.rs       SignedTransaction envelope
//! signing.rs      signing through a TransactionSigner
//! record.rs       flat TransactionRecord for JSON and FFI consumers
//! ```
//!
//! ## Transaction Lifecycle
//!
//! 1. **Build**: [`TransactionBuilder`] validates the header and field group.
//! 2. **Fee**: [`Transaction::assign_fee`] returns a copy with the fee set.
//! 3. **Group** (optional): [`assign_group`] binds transactions atomically.
//! 4. **Sign**: [`sign_transaction`] produces a [`SignedTransaction`].
//! 5. **Submit**: `SignedTransaction::encode` gives the wire bytes.
//!
//! Every step returns a new value; nothing is mutated in place.

pub mod app_call;
pub mod asset_config;
pub mod asset_freeze;
pub mod asset_transfer;
pub mod builder;
pub mod codec;
pub mod fees;
pub mod group;
pub mod header;
pub mod heartbeat;
pub mod id;
pub mod key_registration;
pub mod payment;
pub mod record;
pub mod signed;
pub mod signing;
pub mod state_proof;
pub mod types;
pub mod validation;

pub use app_call::{AppCallTransactionFields, BoxReference, StateSchema};
pub use asset_config::{AssetConfigTransactionFields, AssetParams};
pub use asset_freeze::AssetFreezeTransactionFields;
pub use asset_transfer::AssetTransferTransactionFields;
pub use builder::{Transaction, TransactionBuilder, TransactionFields};
pub use codec::sniff_transaction_type;
pub use fees::{calculate_fee, estimate_size, FeeParams};
pub use group::{assign_group, compute_group_id};
pub use header::TransactionHeader;
pub use heartbeat::{HeartbeatProof, HeartbeatTransactionFields};
pub use id::TransactionId;
pub use key_registration::KeyRegistrationTransactionFields;
pub use payment::PaymentTransactionFields;
pub use record::TransactionRecord;
pub use signed::{encode_signed_transactions, SignedTransaction};
pub use signing::{sign_multisig, sign_transaction};
pub use state_proof::{StateProof, StateProofMessage, StateProofTransactionFields};
pub use types::{OnApplicationComplete, TransactionType};
pub use validation::Validate;
