//! Application call transactions.

use serde::{Deserialize, Serialize};

use crate::config::{MAX_APP_ARGS, MAX_EXTRA_PROGRAM_PAGES};
use crate::error::TransactError;
use crate::identity::Address;
use crate::msgpack::{msgpack_list, CanonicalMap, Decode, Encode, MapReader, Value};

use super::builder::{Transaction, TransactionFields};
use super::header::TransactionHeader;
use super::types::{OnApplicationComplete, TransactionType};
use super::validation::Validate;

/// Storage an application reserves for global or per-account state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSchema {
    #[serde(default)]
    pub num_uints: u64,
    #[serde(default)]
    pub num_byte_slices: u64,
}

impl Encode for StateSchema {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("nbs", &self.num_byte_slices).put("nui", &self.num_uints);
        map.finish()
    }
}

impl Decode for StateSchema {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let schema = Self {
            num_uints: map.take_or_default("nui")?,
            num_byte_slices: map.take_or_default("nbs")?,
        };
        map.finish()?;
        Ok(schema)
    }
}

/// A box the call may touch.
///
/// `app_index` is a position, not an id: zero means the called app itself,
/// `n` means the n-th entry of `app_references`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoxReference {
    #[serde(default)]
    pub app_index: u64,
    #[serde(default, with = "crate::serde_hex")]
    pub name: Vec<u8>,
}

impl Encode for BoxReference {
    fn to_value(&self) -> Value {
        let mut map = CanonicalMap::new();
        map.put("i", &self.app_index).put("n", &self.name);
        map.finish()
    }
}

impl Decode for BoxReference {
    fn from_value(value: Value, path: &str) -> Result<Self, TransactError> {
        let mut map = MapReader::new(value, path)?;
        let reference = Self {
            app_index: map.take_or_default("i")?,
            name: map.take_or_default("n")?,
        };
        map.finish()?;
        Ok(reference)
    }
}

msgpack_list!(BoxReference);

/// Calls, creates (`app_id == 0`), updates, or deletes an application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCallTransactionFields {
    #[serde(default)]
    pub app_id: u64,
    #[serde(default)]
    pub on_complete: OnApplicationComplete,
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub approval_program: Option<Vec<u8>>,
    #[serde(
        default,
        with = "crate::serde_hex::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub clear_state_program: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub global_state_schema: Option<StateSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_state_schema: Option<StateSchema>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra_program_pages: Option<u64>,
    #[serde(default, with = "crate::serde_hex::list", skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub account_references: Vec<Address>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub app_references: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub asset_references: Vec<u64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub box_references: Vec<BoxReference>,
}

impl AppCallTransactionFields {
    pub fn is_create(&self) -> bool {
        self.app_id == 0
    }

    fn is_update(&self) -> bool {
        self.on_complete == OnApplicationComplete::UpdateApplication
    }
}

impl Validate for AppCallTransactionFields {
    fn validate(&self) -> Result<(), TransactError> {
        let has_approval = self.approval_program.as_ref().is_some_and(|p| !p.is_empty());
        let has_clear = self.clear_state_program.as_ref().is_some_and(|p| !p.is_empty());

        if self.is_create() || self.is_update() {
            let action = if self.is_create() { "creation" } else { "update" };
            if !has_approval {
                return Err(TransactError::validation(
                    "approval_program",
                    format!("required for application {action}"),
                ));
            }
            if !has_clear {
                return Err(TransactError::validation(
                    "clear_state_program",
                    format!("required for application {action}"),
                ));
            }
        } else if has_approval || has_clear {
            return Err(TransactError::validation(
                "approval_program",
                "programs may only be set on creation or update",
            ));
        }

        if !self.is_create() {
            if self.global_state_schema.is_some() || self.local_state_schema.is_some() {
                return Err(TransactError::validation(
                    "global_state_schema",
                    "state schemas are immutable after creation",
                ));
            }
            if self.extra_program_pages.is_some() {
                return Err(TransactError::validation(
                    "extra_program_pages",
                    "may only be set on creation",
                ));
            }
        }

        if let Some(pages) = self.extra_program_pages {
            if pages > MAX_EXTRA_PROGRAM_PAGES {
                return Err(TransactError::validation(
                    "extra_program_pages",
                    format!("must be at most {MAX_EXTRA_PROGRAM_PAGES}, got {pages}"),
                ));
            }
        }

        if self.args.len() > MAX_APP_ARGS {
            return Err(TransactError::validation(
                "args",
                format!("at most {MAX_APP_ARGS} arguments allowed, got {}", self.args.len()),
            ));
        }

        for (i, reference) in self.box_references.iter().enumerate() {
            if reference.app_index > self.app_references.len() as u64 {
                return Err(TransactError::validation(
                    format!("box_references[{i}]"),
                    format!(
                        "app_index {} is out of range for {} app references",
                        reference.app_index,
                        self.app_references.len()
                    ),
                ));
            }
        }

        Ok(())
    }
}

impl TransactionFields for AppCallTransactionFields {
    const TRANSACTION_TYPE: TransactionType = TransactionType::AppCall;
    const WIRE_KEYS: &'static [&'static str] = &[
        "apaa", "apan", "apap", "apas", "apat", "apbx", "apep", "apfa", "apgs", "apid", "apls",
        "apsu",
    ];

    fn write_fields(&self, map: &mut CanonicalMap) {
        map.put("apid", &self.app_id)
            .put("apan", &self.on_complete)
            .put("apap", &self.approval_program)
            .put("apsu", &self.clear_state_program)
            .put("apgs", &self.global_state_schema)
            .put("apls", &self.local_state_schema)
            .put("apep", &self.extra_program_pages)
            .put("apaa", &self.args)
            .put("apat", &self.account_references)
            .put("apfa", &self.app_references)
            .put("apas", &self.asset_references)
            .put("apbx", &self.box_references);
    }

    fn read_fields(map: &mut MapReader) -> Result<Self, TransactError> {
        Ok(Self {
            app_id: map.take_or_default("apid")?,
            on_complete: map.take_or_default("apan")?,
            approval_program: map.take("apap")?,
            clear_state_program: map.take("apsu")?,
            global_state_schema: map.take("apgs")?,
            local_state_schema: map.take("apls")?,
            extra_program_pages: map.take("apep")?,
            args: map.take_or_default("apaa")?,
            account_references: map.take_or_default("apat")?,
            app_references: map.take_or_default("apfa")?,
            asset_references: map.take_or_default("apas")?,
            box_references: map.take_or_default("apbx")?,
        })
    }

    fn into_transaction(self, header: TransactionHeader) -> Transaction {
        Transaction::AppCall {
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

    fn create_fields() -> AppCallTransactionFields {
        AppCallTransactionFields {
            approval_program: Some(vec![0x06, 0x81, 0x01]),
            clear_state_program: Some(vec![0x06, 0x81, 0x01]),
            global_state_schema: Some(StateSchema {
                num_uints: 1,
                num_byte_slices: 2,
            }),
            extra_program_pages: Some(1),
            ..Default::default()
        }
    }

    #[test]
    fn create_round_trips() {
        let tx = TransactionBuilder::new(Address::new([1u8; 32]), 1, 10)
            .build(create_fields())
            .unwrap();
        assert_eq!(Transaction::decode(&tx.encode().unwrap()).unwrap(), tx);
    }

    #[test]
    fn empty_schemas_and_zero_pages_build_as_unset() {
        let fields = AppCallTransactionFields {
            global_state_schema: Some(StateSchema::default()),
            local_state_schema: Some(StateSchema::default()),
            extra_program_pages: Some(0),
            ..create_fields()
        };
        let tx = TransactionBuilder::new(Address::new([1u8; 32]), 1, 10)
            .build(fields)
            .unwrap();
        let Transaction::AppCall { fields, .. } = &tx else {
            panic!("expected app call");
        };
        assert_eq!(fields.global_state_schema, None);
        assert_eq!(fields.local_state_schema, None);
        assert_eq!(fields.extra_program_pages, None);
        assert_eq!(fields.approval_program, create_fields().approval_program);
        assert_eq!(Transaction::decode(&tx.encode().unwrap()).unwrap(), tx);
    }

    #[test]
    fn call_with_references_round_trips() {
        let fields = AppCallTransactionFields {
            app_id: 1234,
            on_complete: OnApplicationComplete::OptIn,
            args: vec![b"hello".to_vec(), vec![0, 0, 0, 1]],
            account_references: vec![Address::new([2u8; 32])],
            app_references: vec![55],
            asset_references: vec![66, 77],
            box_references: vec![
                BoxReference {
                    app_index: 0,
                    name: b"box".to_vec(),
                },
                BoxReference {
                    app_index: 1,
                    name: b"other".to_vec(),
                },
            ],
            ..Default::default()
        };
        let tx = TransactionBuilder::new(Address::new([1u8; 32]), 1, 10)
            .build(fields)
            .unwrap();
        assert_eq!(Transaction::decode(&tx.encode().unwrap()).unwrap(), tx);
    }

    #[test]
    fn creation_requires_both_programs() {
        let mut fields = create_fields();
        fields.clear_state_program = None;
        let err = fields.validate().unwrap_err();
        assert_eq!(
            err,
            TransactError::validation("clear_state_program", "required for application creation")
        );
    }

    #[test]
    fn programs_rejected_on_plain_call() {
        let fields = AppCallTransactionFields {
            app_id: 9,
            approval_program: Some(vec![1]),
            ..Default::default()
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn update_requires_programs() {
        let fields = AppCallTransactionFields {
            app_id: 9,
            on_complete: OnApplicationComplete::UpdateApplication,
            ..Default::default()
        };
        let err = fields.validate().unwrap_err();
        assert_eq!(
            err,
            TransactError::validation("approval_program", "required for application update")
        );
    }

    #[test]
    fn too_many_args_rejected() {
        let fields = AppCallTransactionFields {
            app_id: 9,
            args: vec![vec![1]; MAX_APP_ARGS + 1],
            ..Default::default()
        };
        assert!(fields.validate().is_err());
    }

    #[test]
    fn box_index_must_reference_known_app() {
        let fields = AppCallTransactionFields {
            app_id: 9,
            box_references: vec![BoxReference {
                app_index: 2,
                name: b"b".to_vec(),
            }],
            app_references: vec![10],
            ..Default::default()
        };
        let err = fields.validate().unwrap_err();
        assert!(err.to_string().contains("box_references[0]"));
    }

    #[test]
    fn schema_keys_sorted() {
        let schema = StateSchema {
            num_uints: 3,
            num_byte_slices: 4,
        };
        let Value::Map(entries) = schema.to_value() else {
            panic!("expected map");
        };
        assert_eq!(entries[0].0, Value::Str("nbs".into()));
    }
}
