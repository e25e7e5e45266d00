//! # Signers
//!
//! The codec never holds key material itself. Signing goes through the
//! [`TransactionSigner`] trait, so a hardware wallet, a remote KMS, or an
//! in-process key can all sit behind the same call. [`Ed25519Signer`] is
//! the in-process implementation.
//!
//! ## Security considerations
//!
//! - Key bytes are never logged, and `Debug` prints only the address.
//! - Generated keys come from the OS RNG (`OsRng`).

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey, SECRET_KEY_LENGTH};
use rand::rngs::OsRng;
use std::fmt;

use crate::config::SIGNATURE_LENGTH;
use crate::error::TransactError;
use crate::identity::Address;

/// Something that can produce Ed25519 signatures for an address.
pub trait TransactionSigner: Send + Sync {
    /// The address whose key produces the signatures.
    fn address(&self) -> Address;

    /// Sign `message` exactly as given. Callers are responsible for any
    /// domain-separation prefix.
    fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], TransactError>;
}

/// An in-process Ed25519 key.
///
/// # Examples
///
/// ```
/// use algokit_transact::crypto::{verify_signature, Ed25519Signer, TransactionSigner};
///
/// let signer = Ed25519Signer::from_seed(&[7u8; 32]);
/// let sig = signer.sign(b"TXpayload").unwrap();
/// assert!(verify_signature(&signer.address(), b"TXpayload", &sig));
/// ```
pub struct Ed25519Signer {
    signing_key: SigningKey,
}

impl Ed25519Signer {
    /// Generate a fresh key using the OS cryptographic RNG.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Constructs a signer deterministically from a 32-byte seed.
    pub fn from_seed(seed: &[u8; SECRET_KEY_LENGTH]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    /// Reconstruct a signer from a hex-encoded 32-byte seed.
    pub fn from_hex(hex_str: &str) -> Result<Self, TransactError> {
        let bytes = hex::decode(hex_str.trim())
            .map_err(|e| TransactError::Input(format!("seed is not valid hex: {e}")))?;
        let seed: [u8; SECRET_KEY_LENGTH] = bytes.try_into().map_err(|b: Vec<u8>| {
            TransactError::Input(format!(
                "seed must be {SECRET_KEY_LENGTH} bytes, got {}",
                b.len()
            ))
        })?;
        Ok(Self::from_seed(&seed))
    }

    pub fn public_key(&self) -> [u8; 32] {
        self.signing_key.verifying_key().to_bytes()
    }
}

impl TransactionSigner for Ed25519Signer {
    fn address(&self) -> Address {
        Address::new(self.public_key())
    }

    fn sign(&self, message: &[u8]) -> Result<[u8; SIGNATURE_LENGTH], TransactError> {
        Ok(self.signing_key.sign(message).to_bytes())
    }
}

impl fmt::Debug for Ed25519Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signer({})", self.address())
    }
}

/// Check an Ed25519 signature over `message` against the key behind
/// `address`. Returns `false` for malformed keys as well as bad signatures.
pub fn verify_signature(address: &Address, message: &[u8], signature: &[u8; SIGNATURE_LENGTH]) -> bool {
    let Ok(verifying_key) = VerifyingKey::from_bytes(address.as_bytes()) else {
        return false;
    };
    verifying_key
        .verify(message, &Signature::from_bytes(signature))
        .is_ok()
}
