//! # Hashing and Text Encodings
//!
//! One hash function and one text encoding, both fixed by the network:
//!
//! - **SHA-512/256** for transaction ids, group ids, address checksums, and
//!   multisig addresses. It is SHA-512 with a distinct IV, truncated to 32
//!   bytes, and is *not* the same thing as truncating a SHA-512 digest.
//! - **Base32** (RFC 4648 alphabet, no padding) for the text form of
//!   addresses and transaction ids.

use base32::Alphabet;
use sha2::{Digest, Sha512_256};

use crate::config::HASH_LENGTH;

const BASE32: Alphabet = Alphabet::Rfc4648 { padding: false };

/// Compute the SHA-512/256 digest of `data`.
///
/// # Example
///
/// ```
/// use algokit_transact::crypto::sha512_256;
///
/// let digest = sha512_256(b"");
/// assert_eq!(
///     hex::encode(digest),
///     "c672b8d1ef56ed28ab87c3622c5114069bdd3ad7b8f9737498d0c01ecef0967a"
/// );
/// ```
pub fn sha512_256(data: &[u8]) -> [u8; HASH_LENGTH] {
    hash_with_prefix(&[], data)
}

/// Compute SHA-512/256 over `prefix || data` without concatenating first.
pub fn hash_with_prefix(prefix: &[u8], data: &[u8]) -> [u8; HASH_LENGTH] {
    let mut hasher = Sha512_256::new();
    hasher.update(prefix);
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; HASH_LENGTH];
    output.copy_from_slice(&result);
    output
}

/// Base32-encode with the RFC 4648 alphabet and no padding.
pub fn base32_encode(bytes: &[u8]) -> String {
    base32::encode(BASE32, bytes)
}

/// Decode unpadded RFC 4648 base32. Returns `None` on characters outside
/// the alphabet.
pub fn base32_decode(text: &str) -> Option<Vec<u8>> {
    base32::decode(BASE32, text)
}
