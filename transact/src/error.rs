//! Error types for the transaction codec.
//!
//! Every fallible operation in this crate returns a [`TransactError`]. The
//! codec is a pure transform over in-memory bytes, so every variant is
//! terminal for the call that raised it: retrying with the same input
//! yields the same error.

use thiserror::Error;

/// Errors raised while constructing, encoding, decoding, or signing
/// transactions.
///
/// Each variant carries enough context (field name or path, expected versus
/// actual value) to diagnose the failure without re-parsing the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactError {
    /// A logical value violates a field constraint before any bytes are
    /// produced (wrong key length, inverted round range, oversized name).
    #[error("invalid `{field}`: {constraint}")]
    Validation {
        /// Name of the offending field.
        field: String,
        /// The constraint that was violated, including the actual value.
        constraint: String,
    },

    /// An internal invariant was violated while producing bytes, such as a
    /// transaction type tag that does not match its populated field group.
    #[error("encoding failed: {message}")]
    Encoding {
        /// What went wrong.
        message: String,
    },

    /// Input bytes are malformed or violate a field constraint.
    #[error("decoding failed at {path}: {reason}")]
    Decoding {
        /// Dotted path to the offending value, e.g. `txn.apar.am`.
        path: String,
        /// What went wrong.
        reason: String,
    },

    /// A base32 address string could not be parsed.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Caller-supplied parameters are unusable (fee limits, group sizes).
    #[error("{0}")]
    Input(String),

    /// The signer collaborator failed to produce a signature.
    #[error("signing failed: {0}")]
    Signing(String),
}

impl TransactError {
    pub(crate) fn validation(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            constraint: constraint.into(),
        }
    }

    pub(crate) fn encoding(message: impl Into<String>) -> Self {
        Self::Encoding {
            message: message.into(),
        }
    }

    pub(crate) fn decoding(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Decoding {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Returns `true` for [`TransactError::Validation`].
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Returns `true` for [`TransactError::Encoding`].
    pub fn is_encoding(&self) -> bool {
        matches!(self, Self::Encoding { .. })
    }

    /// Returns `true` for [`TransactError::Decoding`].
    pub fn is_decoding(&self) -> bool {
        matches!(self, Self::Decoding { .. })
    }
}
