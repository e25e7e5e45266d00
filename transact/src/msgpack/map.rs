//! Field-level helpers for building and consuming string-keyed maps.

use std::collections::BTreeMap;

use crate::error::TransactError;

use super::{unexpected, Decode, Encode, Value};

/// Builder for a canonical string-keyed map.
///
/// Fields whose value is zero are skipped, which is what makes an absent
/// optional and a present-but-empty one encode to the same bytes.
#[derive(Debug, Default)]
pub struct CanonicalMap {
    entries: BTreeMap<&'static str, Value>,
}

impl CanonicalMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `key` unless `value` is zero. A later put of the same key
    /// replaces the earlier one.
    pub fn put<T: Encode + ?Sized>(&mut self, key: &'static str, value: &T) -> &mut Self {
        if !value.is_zero() {
            self.entries.insert(key, value.to_value());
        }
        self
    }

    /// Adds an already-built value, applying the same zero rule.
    pub fn put_value(&mut self, key: &'static str, value: Value) -> &mut Self {
        if !value.is_zero() {
            self.entries.insert(key, value);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn finish(self) -> Value {
        Value::Map(
            self.entries
                .into_iter()
                .map(|(k, v)| (Value::Str(k.to_owned()), v))
                .collect(),
        )
    }
}

/// Consumer for a decoded string-keyed map.
///
/// Each field is taken out exactly once; [`MapReader::finish`] then rejects
/// whatever is left, so keys the caller never asked about surface as errors
/// instead of being silently dropped.
#[derive(Debug)]
pub struct MapReader {
    path: String,
    entries: BTreeMap<String, Value>,
}

impl MapReader {
    pub fn new(value: Value, path: impl Into<String>) -> Result<Self, TransactError> {
        let path = path.into();
        let entries = match value {
            Value::Map(entries) => entries,
            other => return Err(unexpected(&path, "map", &other)),
        };

        let mut fields = BTreeMap::new();
        for (key, value) in entries {
            let key = match key {
                Value::Str(s) => s,
                other => {
                    return Err(TransactError::decoding(
                        &path,
                        format!("expected string key, found {}", other.kind()),
                    ))
                }
            };
            if fields.contains_key(&key) {
                return Err(TransactError::decoding(
                    &path,
                    format!("duplicate field `{key}`"),
                ));
            }
            fields.insert(key, value);
        }

        Ok(Self {
            path,
            entries: fields,
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of a child field, used for error context.
    pub fn child(&self, key: &str) -> String {
        format!("{}.{key}", self.path)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Removes and returns the raw value for `key`. Zero values read back as
    /// absent, mirroring the writer's omission rule.
    pub fn take_value(&mut self, key: &str) -> Option<Value> {
        self.entries.remove(key).filter(|v| !v.is_zero())
    }

    pub fn take<T: Decode>(&mut self, key: &str) -> Result<Option<T>, TransactError> {
        match self.take_value(key) {
            Some(value) => T::from_value(value, &self.child(key)).map(Some),
            None => Ok(None),
        }
    }

    pub fn take_or_default<T: Decode + Default>(&mut self, key: &str) -> Result<T, TransactError> {
        Ok(self.take(key)?.unwrap_or_default())
    }

    pub fn require<T: Decode>(&mut self, key: &str) -> Result<T, TransactError> {
        self.take(key)?.ok_or_else(|| {
            TransactError::decoding(self.child(key), "required field is missing")
        })
    }

    /// Fails if any field was never taken.
    pub fn finish(self) -> Result<(), TransactError> {
        match self.entries.keys().next() {
            Some(key) => Err(TransactError::decoding(
                self.path,
                format!("unknown field `{key}`"),
            )),
            None => Ok(()),
        }
    }
}
