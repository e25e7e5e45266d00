//! # Protocol Constants
//!
//! Every fixed length, domain separator, and limit the codec relies on
//! lives here. These values are part of the wire contract: other
//! implementations recompute transaction ids and group ids from the same
//! bytes, so none of them can change without breaking interoperability.

// ---------------------------------------------------------------------------
// Domain Separators
// ---------------------------------------------------------------------------

/// Prepended to the canonical transaction encoding before hashing or
/// signing. Never part of the transmitted signed envelope.
pub const TRANSACTION_DOMAIN_SEPARATOR: &[u8] = b"TX";

/// Prepended to the encoded list of transaction ids when deriving a group id.
pub const TRANSACTION_GROUP_DOMAIN_SEPARATOR: &[u8] = b"TG";

/// Prepended to version, threshold, and participant keys when deriving a
/// multisignature address.
pub const MULTISIG_DOMAIN_SEPARATOR: &[u8] = b"MultisigAddr";

// ---------------------------------------------------------------------------
// Byte Lengths
// ---------------------------------------------------------------------------

/// Ed25519 public key length. Addresses carry exactly this many bytes.
pub const PUBLIC_KEY_LENGTH: usize = 32;

/// Trailing checksum bytes appended to the public key in the text form of an
/// address (last 4 bytes of SHA-512/256 of the key).
pub const CHECKSUM_LENGTH: usize = 4;

/// Length of the base32 text form of an address: 36 bytes, no padding.
pub const ADDRESS_LENGTH: usize = 58;

/// SHA-512/256 digest length. Used for transaction ids, group ids,
/// genesis hashes, and leases.
pub const HASH_LENGTH: usize = 32;

/// Length of the base32 text form of a transaction id.
pub const TRANSACTION_ID_LENGTH: usize = 52;

/// Ed25519 signature length.
pub const SIGNATURE_LENGTH: usize = 64;

/// Root participation key carried by online key registrations.
pub const VOTE_KEY_LENGTH: usize = 32;

/// VRF selection key carried by online key registrations.
pub const SELECTION_KEY_LENGTH: usize = 32;

/// State proof (Falcon Merkle root) key carried by online key registrations.
pub const STATE_PROOF_KEY_LENGTH: usize = 64;

/// Bytes a signature adds to an encoded transaction once wrapped in a
/// signed envelope: the `sig` key and its 64-byte value, the `txn` key, and
/// the wider map header. Used for fee estimation before signing.
pub const SIGNATURE_ENCODING_INCR: usize = 75;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum number of transactions in an atomic group.
pub const MAX_TX_GROUP_SIZE: usize = 16;

/// Deepest container nesting the msgpack reader accepts. The deepest
/// legitimate structure (state proofs) stays well below this.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Maximum number of application call arguments.
pub const MAX_APP_ARGS: usize = 16;

/// Maximum number of extra 2048-byte program pages an application may request.
pub const MAX_EXTRA_PROGRAM_PAGES: u64 = 3;

/// Maximum decimals an asset may declare.
pub const MAX_ASSET_DECIMALS: u32 = 19;

/// Maximum asset unit name length in bytes.
pub const MAX_UNIT_NAME_LENGTH: usize = 8;

/// Maximum asset name length in bytes.
pub const MAX_ASSET_NAME_LENGTH: usize = 32;

/// Maximum asset URL length in bytes.
pub const MAX_ASSET_URL_LENGTH: usize = 96;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_text_length_matches_base32_of_key_and_checksum() {
        // 36 bytes = 288 bits; ceil(288 / 5) = 58 base32 characters.
        let bits = (PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH) * 8;
        assert_eq!((bits + 4) / 5, ADDRESS_LENGTH);
    }

    #[test]
    fn transaction_id_length_matches_base32_of_digest() {
        let bits = HASH_LENGTH * 8;
        assert_eq!((bits + 4) / 5, TRANSACTION_ID_LENGTH);
    }

    #[test]
    fn signature_overhead_covers_signature_bytes() {
        assert!(SIGNATURE_ENCODING_INCR > SIGNATURE_LENGTH);
    }
}
