//! Asset configuration transactions: create, reconfigure, destroy.

use serde::{Deserialize, Serialize};

use crate::config::{
    HASH_LENGTH, MAX_ASSET_DECIMALS, MAX_ASSET_NAME_LENGTH, MAX_ASSET_URL_LENGTH,
    MAX_UNIT_NAME_LENGTH,
};
use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{CanonicalMap, Decode, Encode, MapReader, Value};

use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::TransactionType;
use super::validation::{max_length, Validate};

/// The parameters of an asset, written under `apar`.
///
/// On creation every field may be set. On reconfiguration only the four
/// role addresses are meaningful; an omitted role address is cleared for
/// good.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetParams {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub default_frozen: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata_hash: Option<[u8; HASH_LENGTH]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manager: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserve: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub freeze: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clawback: Option<Address>,
}

impl Encode for AssetParams {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("t", &self.total)
            .put("dc", &self.decimals)
            .put("df", &self.default_frozen)
            .put("un", &self.unit_name)
            .put("an", &self.asset_name)
            .put("au", &self.url)
            .put("am", &self.metadata_hash)
            .put("m", &self.manager)
            .put("r", &self.reserve)
            .put("f", &self.freeze)
            .put("c", &self.clawback);
        map.finish()
    }
}

impl Decode for AssetParams {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let params = Self {
            total: map.take_or_default("t")?,
            decimals: map.take_or_default("dc")?,
            default_frozen: map.take_or_default("df")?,
            unit_name: map.take("un")?,
            asset_name: map.take("an")?,
            url: map.take("au")?,
            metadata_hash: map.take("am")?,
            manager: map.take("m")?,
            reserve: map.take("r")?,
            freeze: map.take("f")?,
            clawback: map.take("c")?,
        };
        map.finish()?;
        Ok(params)
    }
}

impl Validate for AssetParams {
    fn validate(&self) -> Result<(), TransactError> {
        if self.decimals > MAX_ASSET_DECIMALS {
            return Err(TransactError::validation(
                "decimals",
                format!("must be at most {MAX_ASSET_DECIMALS}, got {}", self.decimals),
            ));
        }
        if let Some(name) = &self.unit_name {
            max_length("unit_name", name.len(), MAX_UNIT_NAME_LENGTH)?;
        }
        if let Some(name) = &self.asset_name {
            max_length("asset_name", name.len(), MAX_ASSET_NAME_LENGTH)?;
        }
        if let Some(url) = &self.url {
            max_length("url", url.len(), MAX_ASSET_URL_LENGTH)?;
        }
        Ok(())
    }
}

/// Creates an asset (`asset_id == 0`), reconfigures one (`params` set), or
/// destroys one (`params` absent).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfigTransactionFields {
    #[serde(default)]
    pub asset_id: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<AssetParams>,
}

impl AssetConfigTransactionFields {
    pub fn create(params: AssetParams) -> Self {
        Self {
            asset_id: 0,
            params: Some(params),
        }
    }

    pub fn destroy(asset_id: u64) -> Self {
        Self {
            asset_id,
            params: None,
        }
    }

    pub fn is_create(&self) -> bool {
        self.asset_id == 0
    }

    pub fn is_destroy(&self) -> bool {
        self.asset_id != 0 && self.params.is_none()
    }
}

impl Validate for AssetConfigTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        match &self.params {
            Some(params) => params.validate(),
            None if self.is_create() => Err(TransactError::validation(
                "params",
                "required when creating an asset",
            )),
            None => Ok(()),
        }
    }
}

impl TransactionFields for AssetConfigTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::AssetConfig;
    const WIRE_KEYS: &'static [&'static str] = &["apar", "caid"];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("caid", &self.asset_id).put("apar", &self.params);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            asset_id: map.take_or_default("caid")?,
            params: map.take("apar")?,
        })
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::AssetConfig {
            header,
            fields: self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::CanonicalMsgpack;
    use crate::transaction::TransactionBuilder;

    fn creator() -> Address {
        Address::new([8u8; 32])
    }

    fn params() -> AssetParams {
        AssetParams {
            total: 1_000_000,
            decimals: 6,
            unit_name: Some("TKN".into()),
            asset_name: Some("Token".into()),
            url: Some("https://example.com/token.json".into()),
            metadata_hash: Some([0x11; 32]),
            manager: Some(creator()),
            reserve: Some(creator()),
            ..Default::default()
        }
    }

    #[test]
    fn create_round_trips() {
        let tx = TransactionBuilder::new(creator(), 1, 1000)
            .build(AssetConfigTransactionFields::create(params()))
            .unwrap();
        assert_eq!(Transaction::decode(&tx.encode().unwrap()).unwrap(), tx);
    }

    #[test]
    fn create_requires_params() {
        let err = AssetConfigTransactionFields::default().validate().unwrap_err();
        assert_eq!(
            err,
            TransactError::validation("params", "required when creating an asset")
        );
    }

    #[test]
    fn destroy_has_no_params() {
        let fields = AssetConfigTransactionFields::destroy(99);
        assert!(fields.is_destroy());
        assert!(fields.validate().is_ok());
    }

    #[test]
    fn limits_enforced() {
        let mut p = params();
        p.decimals = 20;
        assert!(p.validate().is_err());

        let mut p = params();
        p.unit_name = Some("TOOLONGNAME".into());
        let err = p.validate().unwrap_err();
        assert_eq!(
            err,
            TransactError::validation("unit_name", "must be at most 8 bytes, got 11")
        );

        let mut p = params();
        p.url = Some("x".repeat(97));
        assert!(p.validate().is_err());
    }

    #[test]
    fn unknown_param_key_reports_path() {
        let value = Value::Map(vec![(Value::Str("zz".into()), Value::Uint(1))]);
        let err = AssetParams::from_value(value, "txn.apar").unwrap_err();
        assert_eq!(err, TransactError::decoding("txn.apar", "unknown field `zz`"));
    }
}
