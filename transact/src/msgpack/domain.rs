//! Domain-separated canonical encoding.
//!
//! Anything that is hashed or signed is serialized with a short ASCII
//! prefix ahead of its msgpack body, so bytes meant for one purpose can
//! never be replayed as another. A transaction signs `"TX" || body`, a
//! group id hashes `"TG" || body`. The prefix is never part of a map, and
//! since the first prefix byte is a positive fixint it can never be the
//! start of a valid top-level map either, which is what lets the decoder
//! accept input with or without it.

use tracing::trace;

use crate::error::TransactError;

use super::{decode_value, encode_value, Value};

/// A type with a canonical msgpack form and a domain-separation prefix.
pub trait CanonicalMsgpack: Sized {
    /// Prepended by [`encode`](Self::encode). Empty for types that are
    /// transmitted as-is rather than hashed.
    const PREFIX: &'static [u8];

    fn to_msgpack(&self) -> Result<Value, TransactError>;

    fn from_msgpack(value: Value) -> Result<Self, TransactError>;

    /// Canonical bytes without the prefix.
    fn encode_raw(&self) -> Result<Vec<u8>, TransactError> {
        encode_value(&self.to_msgpack()?)
    }

    /// Canonical bytes with the prefix: the exact input to hashing and
    /// signing.
    fn encode(&self) -> Result<Vec<u8>, TransactError> {
        let raw = self.encode_raw()?;
        let mut out = Vec::with_capacity(Self::PREFIX.len() + raw.len());
        out.extend_from_slice(Self::PREFIX);
        out.extend_from_slice(&raw);
        Ok(out)
    }

    /// Parses canonical bytes, with or without the prefix.
    fn decode(bytes: &[u8]) -> Result<Self, TransactError> {
        let body = strip_prefix(bytes, Self::PREFIX);
        trace!(
            len = bytes.len(),
            prefixed = body.len() != bytes.len(),
            "decoding canonical msgpack"
        );
        Self::from_msgpack(decode_value(body)?)
    }
}

/// Returns `bytes` with `prefix` removed if it is present.
pub fn strip_prefix<'a>(bytes: &'a [u8], prefix: &[u8]) -> &'a [u8] {
    if prefix.is_empty() {
        return bytes;
    }
    bytes.strip_prefix(prefix).unwrap_or(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::{CanonicalMap, MapReader};

    #[derive(Debug, PartialEq)]
    struct Counter {
        n: u64,
    }

    impl CanonicalMsgpack for Counter {
        const PREFIX: &'static [u8] = b"CT";

        fn to_msgpack(&self) -> Result<Value, TransactError> {
            let mut map = CanonicalMap::new();
            map.put("n", &self.n);
            Ok(map.finish())
        }

        fn from_msgpack(value: Value) -> Result<Self, TransactError> {
            let mut map = MapReader::new(value, "counter")?;
            let n = map.take_or_default("n")?;
            map.finish()?;
            Ok(Self { n })
        }
    }

    #[test]
    fn encode_prepends_prefix_to_raw() {
        let counter = Counter { n: 3 };
        let raw = counter.encode_raw().unwrap();
        let full = counter.encode().unwrap();
        assert_eq!(&full[..2], b"CT");
        assert_eq!(&full[2..], &raw[..]);
    }

    #[test]
    fn decode_accepts_both_forms() {
        let counter = Counter { n: 9 };
        assert_eq!(Counter::decode(&counter.encode().unwrap()).unwrap(), counter);
        assert_eq!(Counter::decode(&counter.encode_raw().unwrap()).unwrap(), counter);
    }

    #[test]
    fn strip_prefix_leaves_unprefixed_input() {
        assert_eq!(strip_prefix(b"TXabc", b"TX"), b"abc");
        assert_eq!(strip_prefix(b"abc", b"TX"), b"abc");
        assert_eq!(strip_prefix(b"TXabc", b""), b"TXabc");
    }
}
