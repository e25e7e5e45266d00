//! Hex encoding for byte fields in human-readable serde formats.
//!
//! Used with `#[serde(with = "...")]`. Works for `Vec<u8>` and any
//! fixed-length `[u8; N]`, which serde cannot derive past 32 elements.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S, T>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<[u8]>,
{
    serializer.serialize_str(&hex::encode(bytes))
}

pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<Vec<u8>>,
{
    let text = String::deserialize(deserializer)?;
    from_hex(&text).map_err(D::Error::custom)
}

fn from_hex<T: TryFrom<Vec<u8>>>(text: &str) -> Result<T, String> {
    let bytes = hex::decode(text).map_err(|e| format!("invalid hex: {e}"))?;
    let len = bytes.len();
    T::try_from(bytes).map_err(|_| format!("unexpected byte length {len}"))
}

pub mod option {
    use super::*;

    pub fn serialize<S, T>(bytes: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        match bytes {
            Some(b) => serializer.serialize_some(&hex::encode(b)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<Vec<u8>>,
    {
        match Option::<String>::deserialize(deserializer)? {
            Some(text) => from_hex(&text).map(Some).map_err(D::Error::custom),
            None => Ok(None),
        }
    }
}

pub mod list {
    use super::*;

    pub fn serialize<S, T>(items: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: AsRef<[u8]>,
    {
        serializer.collect_seq(items.iter().map(hex::encode))
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: TryFrom<Vec<u8>>,
    {
        Vec::<String>::deserialize(deserializer)?
            .iter()
            .map(|text| from_hex(text))
            .collect::<Result<_, _>>()
            .map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Sample {
        #[serde(with = "super")]
        key: [u8; 64],
        #[serde(default, with = "super::option", skip_serializing_if = "Option::is_none")]
        lease: Option<[u8; 32]>,
        #[serde(with = "super::list")]
        args: Vec<Vec<u8>>,
    }

    #[test]
    fn round_trips_fixed_and_variable_bytes() {
        let sample = Sample {
            key: [0xab; 64],
            lease: None,
            args: vec![vec![1, 2], vec![]],
        };
        let json = serde_json::to_string(&sample).unwrap();
        assert!(json.contains(&"ab".repeat(64)));
        assert!(!json.contains("lease"));
        assert!(json.contains(r#""args":["0102",""]"#));
        assert_eq!(serde_json::from_str::<Sample>(&json).unwrap(), sample);
    }

    #[test]
    fn wrong_length_rejected() {
        let json = r#"{"key":"abcd","args":[]}"#;
        let err = serde_json::from_str::<Sample>(json).unwrap_err();
        assert!(err.to_string().contains("unexpected byte length 2"));
    }
}
