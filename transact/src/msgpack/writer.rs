//! Canonical msgpack writer.

use crate::error::TransactError;

use super::Value;

pub(crate) mod marker {
    pub const NIL: u8 = 0xc0;
    pub const FALSE: u8 = 0xc2;
    pub const TRUE: u8 = 0xc3;
    pub const BIN8: u8 = 0xc4;
    pub const BIN16: u8 = 0xc5;
    pub const BIN32: u8 = 0xc6;
    pub const UINT8: u8 = 0xcc;
    pub const UINT16: u8 = 0xcd;
    pub const UINT32: u8 = 0xce;
    pub const UINT64: u8 = 0xcf;
    pub const STR8: u8 = 0xd9;
    pub const STR16: u8 = 0xda;
    pub const STR32: u8 = 0xdb;
    pub const ARRAY16: u8 = 0xdc;
    pub const ARRAY32: u8 = 0xdd;
    pub const MAP16: u8 = 0xde;
    pub const MAP32: u8 = 0xdf;

    pub const FIXMAP: u8 = 0x80;
    pub const FIXARRAY: u8 = 0x90;
    pub const FIXSTR: u8 = 0xa0;
}

/// Serializes a value tree into canonical msgpack bytes.
///
/// Map entries are sorted before writing. Fails if a map mixes key types,
/// uses a key that is neither a string nor an unsigned integer, repeats a
/// key, or if any length exceeds the 32-bit limit of the format.
pub fn encode_value(value: &Value) -> Result<Vec<u8>, TransactError> {
    let mut buf = Vec::with_capacity(256);
    write_value(&mut buf, value)?;
    Ok(buf)
}

fn write_value(buf: &mut Vec<u8>, value: &Value) -> Result<(), TransactError> {
    match value {
        Value::Nil => buf.push(marker::NIL),
        Value::Bool(false) => buf.push(marker::FALSE),
        Value::Bool(true) => buf.push(marker::TRUE),
        Value::Uint(n) => write_uint(buf, *n),
        Value::Str(s) => {
            write_str_header(buf, s.len())?;
            buf.extend_from_slice(s.as_bytes());
        }
        Value::Bin(bytes) => {
            write_bin_header(buf, bytes.len())?;
            buf.extend_from_slice(bytes);
        }
        Value::Array(items) => {
            write_container_header(buf, items.len(), marker::FIXARRAY, marker::ARRAY16, marker::ARRAY32)?;
            for item in items {
                write_value(buf, item)?;
            }
        }
        Value::Map(entries) => {
            let sorted = sorted_entries(entries)?;
            write_container_header(buf, sorted.len(), marker::FIXMAP, marker::MAP16, marker::MAP32)?;
            for (key, value) in sorted {
                write_value(buf, key)?;
                write_value(buf, value)?;
            }
        }
    }
    Ok(())
}

fn write_uint(buf: &mut Vec<u8>, n: u64) {
    if n < 0x80 {
        buf.push(n as u8);
    } else if n <= u64::from(u8::MAX) {
        buf.push(marker::UINT8);
        buf.push(n as u8);
    } else if n <= u64::from(u16::MAX) {
        buf.push(marker::UINT16);
        buf.extend_from_slice(&(n as u16).to_be_bytes());
    } else if n <= u64::from(u32::MAX) {
        buf.push(marker::UINT32);
        buf.extend_from_slice(&(n as u32).to_be_bytes());
    } else {
        buf.push(marker::UINT64);
        buf.extend_from_slice(&n.to_be_bytes());
    }
}

fn length_u32(len: usize) -> Result<u32, TransactError> {
    u32::try_from(len)
        .map_err(|_| TransactError::encoding(format!("length {len} exceeds msgpack limit")))
}

fn write_str_header(buf: &mut Vec<u8>, len: usize) -> Result<(), TransactError> {
    let len = length_u32(len)?;
    if len < 32 {
        buf.push(marker::FIXSTR | len as u8);
    } else if len <= u32::from(u8::MAX) {
        buf.push(marker::STR8);
        buf.push(len as u8);
    } else if len <= u32::from(u16::MAX) {
        buf.push(marker::STR16);
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(marker::STR32);
        buf.extend_from_slice(&len.to_be_bytes());
    }
    Ok(())
}

fn write_bin_header(buf: &mut Vec<u8>, len: usize) -> Result<(), TransactError> {
    let len = length_u32(len)?;
    if len <= u32::from(u8::MAX) {
        buf.push(marker::BIN8);
        buf.push(len as u8);
    } else if len <= u32::from(u16::MAX) {
        buf.push(marker::BIN16);
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(marker::BIN32);
        buf.extend_from_slice(&len.to_be_bytes());
    }
    Ok(())
}

fn write_container_header(
    buf: &mut Vec<u8>,
    len: usize,
    fix: u8,
    wide16: u8,
    wide32: u8,
) -> Result<(), TransactError> {
    let len = length_u32(len)?;
    if len < 16 {
        buf.push(fix | len as u8);
    } else if len <= u32::from(u16::MAX) {
        buf.push(wide16);
        buf.extend_from_slice(&(len as u16).to_be_bytes());
    } else {
        buf.push(wide32);
        buf.extend_from_slice(&len.to_be_bytes());
    }
    Ok(())
}

/// Orders map entries canonically: string keys by byte value, integer keys
/// numerically.
fn sorted_entries(entries: &[(Value, Value)]) -> Result<Vec<&(Value, Value)>, TransactError> {
    let mut sorted: Vec<&(Value, Value)> = entries.iter().collect();
    let all_str = entries.iter().all(|(k, _)| matches!(k, Value::Str(_)));
    let all_uint = entries.iter().all(|(k, _)| matches!(k, Value::Uint(_)));

    if all_str {
        sorted.sort_by(|(a, _), (b, _)| match (a, b) {
            (Value::Str(a), Value::Str(b)) => a.as_bytes().cmp(b.as_bytes()),
            _ => std::cmp::Ordering::Equal,
        });
    } else if all_uint {
        sorted.sort_by(|(a, _), (b, _)| match (a, b) {
            (Value::Uint(a), Value::Uint(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        });
    } else {
        return Err(TransactError::encoding(
            "map keys must be all strings or all unsigned integers",
        ));
    }

    if let Some(pair) = sorted.windows(2).find(|pair| pair[0].0 == pair[1].0) {
        return Err(TransactError::encoding(format!(
            "duplicate map key {}",
            pair[0].0
        )));
    }

    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(value: Value) -> Vec<u8> {
        encode_value(&value).unwrap()
    }

    #[test]
    fn integers_use_narrowest_width() {
        assert_eq!(encode(Value::Uint(0)), vec![0x00]);
        assert_eq!(encode(Value::Uint(127)), vec![0x7f]);
        assert_eq!(encode(Value::Uint(128)), vec![0xcc, 0x80]);
        assert_eq!(encode(Value::Uint(255)), vec![0xcc, 0xff]);
        assert_eq!(encode(Value::Uint(256)), vec![0xcd, 0x01, 0x00]);
        assert_eq!(encode(Value::Uint(65_535)), vec![0xcd, 0xff, 0xff]);
        assert_eq!(encode(Value::Uint(65_536)), vec![0xce, 0x00, 0x01, 0x00, 0x00]);
        assert_eq!(
            encode(Value::Uint(u64::from(u32::MAX) + 1)),
            vec![0xcf, 0, 0, 0, 1, 0, 0, 0, 0]
        );
    }

    #[test]
    fn strings_and_bytes_use_narrowest_header() {
        assert_eq!(encode(Value::Str("pay".into())), vec![0xa3, b'p', b'a', b'y']);

        let long = "x".repeat(32);
        let bytes = encode(Value::Str(long));
        assert_eq!(&bytes[..2], &[0xd9, 32]);

        // Byte strings have no fix form.
        assert_eq!(encode(Value::Bin(vec![0xab])), vec![0xc4, 0x01, 0xab]);
        let bytes = encode(Value::Bin(vec![0; 300]));
        assert_eq!(&bytes[..3], &[0xc5, 0x01, 0x2c]);
    }

    #[test]
    fn map_keys_sorted_bytewise() {
        let map = Value::Map(vec![
            (Value::Str("type".into()), Value::Str("pay".into())),
            (Value::Str("amt".into()), Value::Uint(5)),
            (Value::Str("fee".into()), Value::Uint(1000)),
        ]);
        let bytes = encode(map);
        let expected: Vec<u8> = [
            &[0x83][..],
            &[0xa3, b'a', b'm', b't', 0x05],
            &[0xa3, b'f', b'e', b'e', 0xcd, 0x03, 0xe8],
            &[0xa4, b't', b'y', b'p', b'e', 0xa3, b'p', b'a', b'y'],
        ]
        .concat();
        assert_eq!(bytes, expected);
    }

    #[test]
    fn uppercase_keys_sort_before_lowercase() {
        // State proof messages use `P` alongside lowercase keys.
        let map = Value::Map(vec![
            (Value::Str("b".into()), Value::Uint(1)),
            (Value::Str("P".into()), Value::Uint(2)),
        ]);
        let bytes = encode(map);
        assert_eq!(&bytes[1..3], &[0xa1, b'P']);
    }

    #[test]
    fn integer_keys_sorted_numerically() {
        let map = Value::Map(vec![
            (Value::Uint(10), Value::Bool(true)),
            (Value::Uint(2), Value::Bool(true)),
        ]);
        assert_eq!(encode(map), vec![0x82, 0x02, 0xc3, 0x0a, 0xc3]);
    }

    #[test]
    fn mixed_key_types_rejected() {
        let map = Value::Map(vec![
            (Value::Str("a".into()), Value::Uint(1)),
            (Value::Uint(1), Value::Uint(1)),
        ]);
        assert!(encode_value(&map).unwrap_err().is_encoding());
    }

    #[test]
    fn duplicate_keys_rejected() {
        let map = Value::Map(vec![
            (Value::Str("amt".into()), Value::Uint(1)),
            (Value::Str("amt".into()), Value::Uint(2)),
        ]);
        let err = encode_value(&map).unwrap_err();
        assert_eq!(err, TransactError::encoding("duplicate map key \"amt\""));
    }

    #[test]
    fn sixteen_entry_array_uses_array16() {
        let array = Value::Array(vec![Value::Uint(1); 16]);
        let bytes = encode(array);
        assert_eq!(&bytes[..3], &[0xdc, 0x00, 0x10]);
        assert_eq!(bytes.len(), 3 + 16);
    }
}
