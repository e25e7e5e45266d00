//! # Cryptographic Primitives
//!
//! Hashing, base32, and Ed25519 signing. Everything here is a thin wrapper
//! around `sha2`, `base32`, and `ed25519-dalek`; nothing is hand-rolled.

pub mod hash;
pub mod keys;

pub use hash::{base32_decode, base32_encode, hash_with_prefix, sha512_256};
pub use keys::{verify_signature, Ed25519Signer, TransactionSigner};
