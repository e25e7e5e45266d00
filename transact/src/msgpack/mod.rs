//! # Canonical MessagePack
//!
//! A deliberately small msgpack dialect: the subset of the format that
//! transactions use, written in exactly one way. Two encoders fed the same
//! logical transaction must produce identical bytes, because those bytes are
//! hashed into the transaction id and signed.
//!
//! ## Canonical Rules
//!
//! - Integers use the narrowest encoding that holds the value.
//! - Map keys are all strings (ordered by byte value) or all unsigned
//!   integers (ordered numerically).
//! - Zero values are omitted from maps entirely (see [`Value::is_zero`]).
//! - Strings and byte strings use the narrowest length header.
//!
//! The reader is strict about structure (truncation, trailing bytes,
//! duplicate keys, unsupported markers, invalid UTF-8, runaway nesting)
//! and lenient about width: a non-minimal integer header still decodes.
//!
//! ## Layers
//!
//! [`Value`] is the in-memory tree. [`writer`] and [`reader`] convert it to
//! and from bytes. [`Encode`] and [`Decode`] convert domain types to and
//! from the tree, with [`CanonicalMap`] and [`MapReader`] doing the per-field
//! bookkeeping. [`CanonicalMsgpack`] adds the domain-separation prefix used
//! for hashing and signing.

pub mod domain;
pub mod map;
pub mod reader;
pub mod writer;

use std::fmt;

use crate::error::TransactError;

pub use domain::CanonicalMsgpack;
pub use map::{CanonicalMap, MapReader};
pub use reader::decode_value;
pub use writer::encode_value;

// ---------------------------------------------------------------------------
// Value
// ---------------------------------------------------------------------------

/// A decoded msgpack value.
///
/// Only the types transactions use are represented. Signed integers, floats,
/// and extension types are rejected by the reader and never produced by the
/// writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Nil,
    Bool(bool),
    Uint(u64),
    Str(String),
    Bin(Vec<u8>),
    Array(Vec<Value>),
    /// Entries in insertion order. The writer sorts them; the reader keeps
    /// the order they appeared on the wire.
    Map(Vec<(Value, Value)>),
}

impl Value {
    /// Whether this value is the zero value for its type and must therefore
    /// be omitted when it appears as a map value.
    ///
    /// Fixed-length byte fields that are all zero bytes are also zero, but
    /// that is decided by the owning type's [`Encode::is_zero`] since a
    /// `Bin` on its own has no notion of a fixed length.
    pub fn is_zero(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Bool(b) => !b,
            Value::Uint(n) => *n == 0,
            Value::Str(s) => s.is_empty(),
            Value::Bin(b) => b.is_empty(),
            Value::Array(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
        }
    }

    /// Short type name used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Nil => "nil",
            Value::Bool(_) => "bool",
            Value::Uint(_) => "uint",
            Value::Str(_) => "str",
            Value::Bin(_) => "bin",
            Value::Array(_) => "array",
            Value::Map(_) => "map",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Bin(b) => write!(f, "0x{}", hex::encode(b)),
            Value::Array(items) => write!(f, "array({})", items.len()),
            Value::Map(entries) => write!(f, "map({})", entries.len()),
        }
    }
}

// ---------------------------------------------------------------------------
// Encode / Decode
// ---------------------------------------------------------------------------

/// Conversion of a domain value into its canonical msgpack tree.
pub trait Encode {
    fn to_value(&self) -> Value;

    /// Whether the value is omitted when written as a map field.
    fn is_zero(&self) -> bool {
        self.to_value().is_zero()
    }
}

/// Conversion of a msgpack tree back into a domain value.
///
/// `path` names the value's position in the enclosing document and is
/// threaded into every error so callers can locate the failure.
pub trait Decode: Sized {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError>;
}

pub(crate) fn unexpected(path: &str, expected: &str, found: &Value) -> TransactError {
    TransactError::decoding(path, format!("expected {expected}, found {}", found.kind()))
}

impl<T: Encode + ?Sized> Encode for &T {
    fn to_value(&self) -> Value {
        (**self).to_value()
    }

    fn is_zero(&self) -> bool {
        (**self).is_zero()
    }
}

impl<T: Encode> Encode for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(inner) => inner.to_value(),
            None => Value::Nil,
        }
    }

    fn is_zero(&self) -> bool {
        self.as_ref().map_or(true, Encode::is_zero)
    }
}

impl Encode for u64 {
    fn to_value(&self) -> Value {
        Value::Uint(*self)
    }

    fn is_zero(&self) -> bool {
        *self == 0
    }
}

impl Decode for u64 {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        match value {
            Value::Uint(n) => Ok(n),
            other => Err(unexpected(path, "uint", &other)),
        }
    }
}

macro_rules! impl_narrow_uint {
    ($($ty:ty),* $(,)?) => {$(
        impl Encode for $ty {
            fn to_value(&self) -> Value {
                Value::Uint(u64::from(*self))
            }

            fn is_zero(&self) -> bool {
                *self == 0
            }
        }

        impl Decode for $ty {
            fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
                let n = u64::from_value(value, path)?;
                <$ty>::try_from(n).map_err(|_| {
                    TransactError::decoding(
                        path,
                        format!("{n} does not fit in {}", stringify!($ty)),
                    )
                })
            }
        }
    )*};
}

impl_narrow_uint!(u8, u32);

impl Encode for bool {
    fn to_value(&self) -> Value {
        Value::Bool(*self)
    }

    fn is_zero(&self) -> bool {
        !*self
    }
}

impl Decode for bool {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(unexpected(path, "bool", &other)),
        }
    }
}

impl Encode for str {
    fn to_value(&self) -> Value {
        Value::Str(self.to_owned())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Encode for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Decode for String {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(unexpected(path, "str", &other)),
        }
    }
}

impl Encode for Vec<u8> {
    fn to_value(&self) -> Value {
        Value::Bin(self.clone())
    }

    fn is_zero(&self) -> bool {
        self.is_empty()
    }
}

impl Decode for Vec<u8> {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        match value {
            Value::Bin(b) => Ok(b),
            other => Err(unexpected(path, "bin", &other)),
        }
    }
}

/// Fixed-length byte fields. All-zero arrays count as zero and are omitted.
impl<const N: usize> Encode for [u8; N] {
    fn to_value(&self) -> Value {
        Value::Bin(self.to_vec())
    }

    fn is_zero(&self) -> bool {
        self.iter().all(|b| *b == 0)
    }
}

impl<const N: usize> Decode for [u8; N] {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let bytes = Vec::<u8>::from_value(value, path)?;
        let len = bytes.len();
        bytes.try_into().map_err(|_| {
            TransactError::decoding(path, format!("expected {N} bytes, found {len}"))
        })
    }
}

/// Implements [`Encode`] and [`Decode`] for `Vec<T>` as a msgpack array.
///
/// A blanket impl would overlap with `Vec<u8>`, which is a byte string, so
/// each list element type opts in explicitly.
macro_rules! msgpack_list {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::msgpack::Encode for Vec<$ty> {
            fn to_value(&self) -> $crate::msgpack::Value {
                $crate::msgpack::Value::Array(
                    self.iter().map($crate::msgpack::Encode::to_value).collect(),
                )
            }

            fn is_zero(&self) -> bool {
                self.is_empty()
            }
        }

        impl $crate::msgpack::Decode for Vec<$ty> {
            fn from_value(
                value: $crate::msgpack::Value,
                path: &str,
            ) -> Result<Self, $crate::error::TransactError> {
                match value {
                    $crate::msgpack::Value::Array(items) => items
                        .into_iter()
                        .enumerate()
                        .map(|(i, item)| {
                            <$ty as $crate::msgpack::Decode>::from_value(
                                item,
                                &format!("{path}[{i}]"),
                            )
                        })
                        .collect(),
                    other => Err($crate::msgpack::unexpected(path, "array", &other)),
                }
            }
        }
    )*};
}

pub(crate) use msgpack_list;

msgpack_list!(u64, Vec<u8>, [u8; 32]);
