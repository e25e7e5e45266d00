//! Transaction signing through a [`TransactionSigner`].
//!
//! Signing is a separate step from building because the key may not be
//! available at construction time (hardware wallet, remote signer). The
//! signed message is the prefixed canonical encoding, `"TX" || body`, the
//! same bytes the transaction id hashes.

use tracing::debug;

use crate::crypto::TransactionSigner;
use crate::error::TransactError;
use crate::identity::MultisigSignature;
use crate::msgpack::CanonicalMsgpack;

use super::builder::Transaction;
use super::signed::SignedTransaction;

/// Signs `tx` with `signer` and wraps it in a [`SignedTransaction`].
///
/// The procedure:
/// 1. Compute `tx.encode()`: the `"TX"` prefix and the canonical map.
/// 2. Ask the signer for an Ed25519 signature over those bytes.
/// 3. Record the signer's address as `auth_address` if, and only if, it is
///    not the sender. That is the rekeyed-account case.
///
/// # Example
///
/// ```
/// use algokit_transact::crypto::{Ed25519Signer, TransactionSigner};
/// use algokit_transact::identity::Address;
/// use algokit_transact::transaction::{sign_transaction, PaymentTransactionFields, TransactionBuilder};
///
/// let signer = Ed25519Signer::from_seed(&[3u8; 32]);
/// let tx = TransactionBuilder::new(signer.address(), 1, 100)
///     .build(PaymentTransactionFields {
///         receiver: Address::new([2u8; 32]),
///         amount: 10,
///         close_remainder_to: None,
///     })
///     .unwrap();
///
/// let signed = sign_transaction(&tx, &signer).unwrap();
/// assert!(signed.signature.is_some());
/// assert!(signed.auth_address.is_none());
/// ```
pub fn sign_transaction(
    tx: &Transaction,
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction, TransactError> {
    let message = tx.encode()?;
    let signature = signer.sign(&message)?;
    let signer_address = signer.address();
    let auth_address = (&signer_address != tx.sender()).then_some(signer_address);

    debug!(
        transaction_type = %tx.transaction_type(),
        sender = %tx.sender(),
        rekeyed = auth_address.is_some(),
        len = message.len(),
        "signed transaction"
    );

    Ok(SignedTransaction {
        signature: Some(signature),
        auth_address,
        ..SignedTransaction::unsigned(tx.clone())
    })
}

/// Adds one participant's signature to a multisig envelope for `tx`.
///
/// Start from `msig` with no signatures (see [`MultisigSignature::new`])
/// and call once per co-signer, or sign separately and combine with
/// [`MultisigSignature::merge`].
pub fn sign_multisig(
    tx: &Transaction,
    msig: MultisigSignature,
    signer: &dyn TransactionSigner,
) -> Result<SignedTransaction, TransactError> {
    let signature = signer.sign(&tx.encode()?)?;
    let msig = msig.with_signature(&signer.address(), signature)?;
    let msig_address = msig.address();
    let auth_address = (&msig_address != tx.sender()).then_some(msig_address);

    debug!(
        sender = %tx.sender(),
        collected = msig.signature_count(),
        threshold = msig.threshold,
        "added multisig signature"
    );

    Ok(SignedTransaction {
        auth_address,
        multisignature: Some(msig),
        ..SignedTransaction::unsigned(tx.clone())
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
