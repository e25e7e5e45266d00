//! # Transaction Codec
//!
//! Wires [`Transaction`] into the canonical msgpack layer. The unsigned
//! transaction is a single flat map: the `type` tag, the header keys, and
//! the keys of exactly one kind-specific field group.
//!
//! Decoding is driven by the `type` tag. Keys that belong to any other
//! field group are left untaken and rejected by [`MapReader::finish`], so a
//! payment carrying `xaid` fails rather than silently dropping it.
//!
//! Both directions hold the round-trip law `decode(encode(t)) == t`. The
//! encoder validates first and refuses any value the decoder would not give
//! back unchanged (an optional field holding a zero value, which the wire
//! cannot tell from an absent one). The decoder runs the same validators
//! over what it read.

use tracing::trace;

use crate::config::TRANSACTION_DOMAIN_SEPARATOR;
use crate::error::TransactError;
use crate::msgpack::domain::strip_prefix;
use crate::msgpack::{decode_value, CanonicalMap, CanonicalMsgpack, MapReader, Value};

use super::app_call::AppCallTransactionFields;
use super::asset_config::AssetConfigTransactionFields;
use super::asset_freeze::AssetFreezeTransactionFields;
use super::asset_transfer::AssetTransferTransactionFields;
use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::heartbeat::HeartbeatTransactionFields;
use super::key_registration::KeyRegistrationTransactionFields;
use super::payment::PaymentTransactionFields;
use super::state_proof::StateProofTransactionFields;
use super::types::TransactionType;

/// Top-level keys owned by each field group.
const FIELD_GROUP_KEYS: [(TransactionType, &[&str]); 8] = [
    (
        TransactionType::Payment,
        PaymentTransactionFields::WIRE_KEYS,
    ),
    (
        TransactionType::AssetTransfer,
        AssetTransferTransactionFields::WIRE_KEYS,
    ),
    (
        TransactionType::AssetConfig,
        AssetConfigTransactionFields::WIRE_KEYS,
    ),
    (
        TransactionType::AssetFreeze,
        AssetFreezeTransactionFields::WIRE_KEYS,
    ),
    (TransactionType::AppCall, AppCallTransactionFields::WIRE_KEYS),
    (
        TransactionType::KeyRegistration,
        KeyRegistrationTransactionFields::WIRE_KEYS,
    ),
    (
        TransactionType::Heartbeat,
        HeartbeatTransactionFields::WIRE_KEYS,
    ),
    (
        TransactionType::StateProof,
        StateProofTransactionFields::WIRE_KEYS,
    ),
];

impl CanonicalMsgpack for Transaction {
    const PREFIX: &'static [u8] = TRANSACTION_DOMAIN_SEPARATOR;

    fn to_msgpack(&self) -> Result<Value, TransactError> {
        self.validate()?;
        let value = self.to_map();
        if read_transaction(value.clone(), "txn")? != *self {
            return Err(TransactError::encoding(format!(
                "`{}` transaction has an optional field set to a zero value, which \
                 decodes as unset; build it through `TransactionBuilder`",
                self.transaction_type().wire_tag()
            )));
        }
        Ok(value)
    }

    fn from_msgpack(value: Value) -> Result<Self, TransactError> {
        decode_at(value, "txn")
    }
}

impl Transaction {
    fn to_map(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("type", &self.transaction_type());
        self.write_fields(&mut map);
        map.finish()
    }

    /// The form the decoder returns for this transaction: every optional
    /// field holding a zero value, at any depth, becomes `None`. The result
    /// is validated again, since dropping a zero can leave an online key
    /// registration incomplete.
    pub(crate) fn normalized(&self) -> Result<Transaction, TransactError> {
        let tx = read_transaction(self.to_map(), "txn")?;
        tx.validate()?;
        Ok(tx)
    }
}

/// Decode and validate a transaction map found at `path` (e.g. `stxn.txn`
/// inside a signed envelope).
pub(crate) fn decode_at(value: Value, path: &str) -> Result<Transaction, TransactError> {
    let tx = read_transaction(value, path)?;
    tx.validate().map_err(|err| match err {
        TransactError::Validation { field, constraint } => {
            TransactError::decoding(path, format!("invalid `{field}`: {constraint}"))
        }
        other => other,
    })?;
    Ok(tx)
}

fn read_transaction(value: Value, path: &str) -> Result<Transaction, TransactError> {
    let mut map = MapReader::new(value, path)?;
    let transaction_type: TransactionType = map.require("type")?;
    let header = TransactionHeader::read_fields(&mut map)?;

    let tx = match transaction_type {
        TransactionType::Payment => read_group::<PaymentTransactionFields>(&mut map, header)?,
        TransactionType::AssetTransfer => {
            read_group::<AssetTransferTransactionFields>(&mut map, header)?
        }
        TransactionType::AssetConfig => {
            read_group::<AssetConfigTransactionFields>(&mut map, header)?
        }
        TransactionType::AssetFreeze => {
            read_group::<AssetFreezeTransactionFields>(&mut map, header)?
        }
        TransactionType::AppCall => read_group::<AppCallTransactionFields>(&mut map, header)?,
        TransactionType::KeyRegistration => {
            read_group::<KeyRegistrationTransactionFields>(&mut map, header)?
        }
        TransactionType::Heartbeat => read_group::<HeartbeatTransactionFields>(&mut map, header)?,
        TransactionType::StateProof => {
            read_group::<StateProofTransactionFields>(&mut map, header)?
        }
    };

    if let Some(foreign) = map.keys().find_map(|key| owning_group(key)) {
        return Err(TransactError::decoding(
            map.path(),
            format!(
                "`{}` fields present in a `{}` transaction",
                foreign.wire_tag(),
                transaction_type.wire_tag()
            ),
        ));
    }
    map.finish()?;

    trace!(transaction_type = %transaction_type, "decoded transaction");
    Ok(tx)
}

fn read_group<F: TransactionFields>(
    map: &mut MapReader,
    header: TransactionHeader,
) -> Result<Transaction, TransactError> {
    Ok(F::read_fields(map)?.into_transaction(header))
}

fn owning_group(key: &str) -> Option<TransactionType> {
    FIELD_GROUP_KEYS
        .iter()
        .find(|(_, keys)| keys.contains(&key))
        .map(|(t, _)| *t)
}

// ---------------------------------------------------------------------------
// Sniffing
// ---------------------------------------------------------------------------

/// Determine the kind of an encoded transaction without decoding its
/// fields.
///
/// The answer comes from which field group's keys are present. The `type`
/// tag settles the one case where no group key appears: an offline key
/// registration carries no key registration keys at all. Keys of more than
/// one group, or a tag that contradicts the keys, are errors.
///
/// ```
/// use algokit_transact::identity::Address;
/// use algokit_transact::msgpack::CanonicalMsgpack;
/// use algokit_transact::transaction::{
///     sniff_transaction_type, AssetFreezeTransactionFields, TransactionBuilder, TransactionType,
/// };
///
/// let tx = TransactionBuilder::new(Address::new([1u8; 32]), 1, 2)
///     .build(AssetFreezeTransactionFields {
///         asset_id: 31,
///         freeze_target: Address::new([2u8; 32]),
///         frozen: true,
///     })
///     .unwrap();
/// let bytes = tx.encode().unwrap();
/// assert_eq!(sniff_transaction_type(&bytes).unwrap(), TransactionType::AssetFreeze);
/// ```
pub fn sniff_transaction_type(bytes: &[u8]) -> Result<TransactionType, TransactError> {
    let body = strip_prefix(bytes, TRANSACTION_DOMAIN_SEPARATOR);
    let mut map = MapReader::new(decode_value(body)?, "txn")?;
    let tag: Option<TransactionType> = map.take("type")?;

    let mut evidenced: Vec<TransactionType> = Vec::new();
    for t in map.keys().filter_map(owning_group) {
        if !evidenced.contains(&t) {
            evidenced.push(t);
        }
    }

    let resolved = match (evidenced.as_slice(), tag) {
        ([], Some(tag)) => tag,
        ([], None) => {
            return Err(TransactError::decoding(
                "txn",
                "no transaction type tag or field group keys present",
            ))
        }
        ([only], Some(tag)) if *only != tag => {
            return Err(TransactError::decoding(
                "txn.type",
                format!("type `{}` contradicts `{}` fields", tag.wire_tag(), only.wire_tag()),
            ))
        }
        ([only], _) => *only,
        (many, _) => {
            let tags: Vec<&str> = many.iter().map(|t| t.wire_tag()).collect();
            return Err(TransactError::decoding(
                "txn",
                format!("fields of multiple transaction types present: {}", tags.join(", ")),
            ));
        }
    };

    trace!(transaction_type = %resolved, "sniffed transaction type");
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::Address;
    use crate::msgpack::encode_value;
    use crate::transaction::TransactionBuilder;

    fn payment() -> Transaction {
        TransactionBuilder::new(Address::new([1u8; 32]), 100, 200)
            .genesis_id("testnet-v1.0")
            .build(PaymentTransactionFields {
                receiver: Address::new([2u8; 32]),
                amount: 42,
                close_remainder_to: None,
            })
            .unwrap()
    }

    fn with_entry(tx: &Transaction, key: &str, value: Value) -> Vec<u8> {
        let Value::Map(mut entries) = tx.to_msgpack().unwrap() else {
            panic!("expected map");
        };
        entries.push((Value::Str(key.into()), value));
        encode_value(&Value::Map(entries)).unwrap()
    }

    #[test]
    fn encode_prefixes_raw_bytes() {
        let tx = payment();
        let raw = tx.encode_raw().unwrap();
        let prefixed = tx.encode().unwrap();
        assert_eq!(&prefixed[..2], b"TX");
        assert_eq!(&prefixed[2..], raw.as_slice());
    }

    #[test]
    fn decode_accepts_prefixed_and_raw() {
        let tx = payment();
        assert_eq!(Transaction::decode(&tx.encode().unwrap()).unwrap(), tx);
        assert_eq!(Transaction::decode(&tx.encode_raw().unwrap()).unwrap(), tx);
    }

    #[test]
    fn foreign_group_key_rejected() {
        let bytes = with_entry(&payment(), "xaid", Value::Uint(7));
        let err = Transaction::decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding("txn", "`axfer` fields present in a `pay` transaction")
        );
    }

    #[test]
    fn unknown_key_rejected() {
        let bytes = with_entry(&payment(), "zzz", Value::Uint(7));
        let err = Transaction::decode(&bytes).unwrap_err();
        assert_eq!(err, TransactError::decoding("txn", "unknown field `zzz`"));
    }

    #[test]
    fn missing_type_rejected() {
        let mut map = CanonicalMap::new();
        map.put("amt", &5u64);
        let bytes = encode_value(&map.finish()).unwrap();
        let err = Transaction::decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding("txn.type", "required field is missing")
        );
    }

    #[test]
    fn decode_runs_validators() {
        let mut map = CanonicalMap::new();
        map.put("type", &TransactionType::Payment)
            .put("fv", &10u64)
            .put("lv", &5u64);
        let bytes = encode_value(&map.finish()).unwrap();
        let err = Transaction::decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding(
                "txn",
                "invalid `last_valid`: must not precede first_valid (10 > 5)"
            )
        );
    }

    #[test]
    fn encode_refuses_zero_option_in_group() {
        let Transaction::AppCall { header, mut fields } = TransactionBuilder::new(
            Address::new([1u8; 32]),
            1,
            2,
        )
        .build(AppCallTransactionFields {
            approval_program: Some(vec![1]),
            clear_state_program: Some(vec![1]),
            ..Default::default()
        })
        .unwrap() else {
            panic!("expected app call");
        };
        fields.extra_program_pages = Some(0);
        let tx = Transaction::AppCall { header, fields };
        assert!(tx.validate().is_ok());
        assert!(tx.encode().unwrap_err().is_encoding());
        assert!(tx.normalized().unwrap().encode().is_ok());
    }

    #[test]
    fn non_map_rejected() {
        let err = Transaction::decode(&[0x93, 0x01, 0x02, 0x03]).unwrap_err();
        assert!(err.is_decoding());
    }

    #[test]
    fn sniff_uses_field_keys() {
        let tx = payment();
        assert_eq!(
            sniff_transaction_type(&tx.encode().unwrap()).unwrap(),
            TransactionType::Payment
        );
    }

    #[test]
    fn sniff_offline_keyreg_falls_back_to_tag() {
        let tx = TransactionBuilder::new(Address::new([1u8; 32]), 1, 2)
            .build(KeyRegistrationTransactionFields::offline())
            .unwrap();
        assert_eq!(
            sniff_transaction_type(&tx.encode_raw().unwrap()).unwrap(),
            TransactionType::KeyRegistration
        );
    }

    #[test]
    fn sniff_rejects_mixed_groups() {
        let bytes = with_entry(&payment(), "faid", Value::Uint(3));
        let err = sniff_transaction_type(&bytes).unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding("txn", "fields of multiple transaction types present: pay, afrz")
        );
    }

    #[test]
    fn sniff_rejects_contradicting_tag() {
        let mut map = CanonicalMap::new();
        map.put("type", &TransactionType::AssetTransfer)
            .put("amt", &5u64);
        let bytes = encode_value(&map.finish()).unwrap();
        let err = sniff_transaction_type(&bytes).unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding("txn.type", "type `axfer` contradicts `pay` fields")
        );
    }

    #[test]
    fn sniff_without_tag_or_keys_fails() {
        let mut map = CanonicalMap::new();
        map.put("fv", &1u64);
        let bytes = encode_value(&map.finish()).unwrap();
        assert!(sniff_transaction_type(&bytes).unwrap_err().is_decoding());
    }
}
