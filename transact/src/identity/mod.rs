//! # Identity Module
//!
//! Account addresses and the multisig accounts built from them.
//!
//! 1. **Address**: a 32-byte Ed25519 public key, shown to users as 58
//!    base32 characters with a 4-byte checksum.
//! 2. **Multisig**: an ordered set of addresses plus a threshold, whose
//!    own address is a domain-separated hash of the set.

pub mod address;
pub mod multisig;

pub use address::Address;
pub use multisig::{MultisigSignature, MultisigSubsignature, MULTISIG_VERSION};
