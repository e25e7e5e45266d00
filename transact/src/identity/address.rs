//! # Addresses
//!
//! An address is an Ed25519 public key. Its text form appends a short
//! checksum and base32-encodes the result:
//!
//! ```text
//! public_key (32 bytes)
//!     -> SHA-512/256(public_key)[28..32] -> checksum (4 bytes)
//!     -> base32(public_key || checksum)  -> 58 characters
//! ```
//!
//! On the wire an address is just the 32 key bytes. The all-zero address
//! is the zero value and is omitted from encoded maps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::{ADDRESS_LENGTH, CHECKSUM_LENGTH, HASH_LENGTH, PUBLIC_KEY_LENGTH};
use crate::crypto::{base32_decode, base32_encode, sha512_256};
use crate::error::TransactError;
use crate::msgpack::{msgpack_list, Decode, Encode, Value};

/// A 32-byte account address.
///
/// # Examples
///
/// ```
/// use algokit_transact::identity::Address;
///
/// let address = Address::new([0u8; 32]);
/// let text = address.to_string();
/// assert_eq!(text, "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAY5HFKQ");
/// assert_eq!(text.parse::<Address>().unwrap(), address);
/// ```
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; PUBLIC_KEY_LENGTH]);

impl Address {
    pub const fn new(public_key: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(public_key)
    }

    /// The all-zero address, which encodes as absent.
    pub const fn zero() -> Self {
        Self([0u8; PUBLIC_KEY_LENGTH])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.0
    }

    pub fn to_bytes(self) -> [u8; PUBLIC_KEY_LENGTH] {
        self.0
    }

    /// Last four bytes of SHA-512/256 of the public key.
    pub fn checksum(&self) -> [u8; CHECKSUM_LENGTH] {
        let digest = sha512_256(&self.0);
        let mut checksum = [0u8; CHECKSUM_LENGTH];
        checksum.copy_from_slice(&digest[HASH_LENGTH - CHECKSUM_LENGTH..]);
        checksum
    }
}

impl From<[u8; PUBLIC_KEY_LENGTH]> for Address {
    fn from(bytes: [u8; PUBLIC_KEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0u8; PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH];
        buf[..PUBLIC_KEY_LENGTH].copy_from_slice(&self.0);
        buf[PUBLIC_KEY_LENGTH..].copy_from_slice(&self.checksum());
        f.write_str(&base32_encode(&buf))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({self})")
    }
}

impl FromStr for Address {
    type Err = TransactError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != ADDRESS_LENGTH {
            return Err(TransactError::InvalidAddress(format!(
                "expected {ADDRESS_LENGTH} characters, got {}",
                s.len()
            )));
        }
        let decoded = base32_decode(s)
            .ok_or_else(|| TransactError::InvalidAddress("not valid base32".into()))?;
        if decoded.len() != PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH {
            return Err(TransactError::InvalidAddress(format!(
                "expected {} decoded bytes, got {}",
                PUBLIC_KEY_LENGTH + CHECKSUM_LENGTH,
                decoded.len()
            )));
        }

        let mut key = [0u8; PUBLIC_KEY_LENGTH];
        key.copy_from_slice(&decoded[..PUBLIC_KEY_LENGTH]);
        let address = Self(key);
        if decoded[PUBLIC_KEY_LENGTH..] != address.checksum() {
            return Err(TransactError::InvalidAddress("checksum mismatch".into()));
        }
        Ok(address)
    }
}

impl Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(&self.0)
        }
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            let s = String::deserialize(deserializer)?;
            s.parse().map_err(serde::de::Error::custom)
        } else {
            let bytes = <Vec<u8>>::deserialize(deserializer)?;
            let key: [u8; PUBLIC_KEY_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
                serde::de::Error::custom(format!(
                    "expected {PUBLIC_KEY_LENGTH}-byte address, got {}",
                    b.len()
                ))
            })?;
            Ok(Self(key))
        }
    }
}

impl Encode for Address {
    fn to_value(&self) -> Value {
        self.0.to_value()
    }

    fn is_zero(&self) -> bool {
        Address::is_zero(self)
    }
}

impl Decode for Address {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        <[u8; PUBLIC_KEY_LENGTH]>::from_value(value, path).map(Self)
    }
}

msgpack_list!(Address);
