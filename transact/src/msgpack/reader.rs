//! Strict msgpack reader.

use std::collections::BTreeSet;

use crate::config::MAX_NESTING_DEPTH;
use crate::error::TransactError;

use super::writer::marker;
use super::Value;

/// Path reported for structural errors, which occur before any field
/// context is known.
const ROOT: &str = "msgpack";

/// Parses exactly one msgpack value from `bytes`.
///
/// Trailing bytes after the value are an error, as are truncated input,
/// unsupported markers (signed integers, floats, extensions), invalid
/// UTF-8 in strings, map keys that are not strings or unsigned integers,
/// duplicate map keys, and nesting deeper than [`MAX_NESTING_DEPTH`].
pub fn decode_value(bytes: &[u8]) -> Result<Value, TransactError> {
    let mut reader = Reader { bytes, pos: 0 };
    let value = reader.read_value(0)?;
    let trailing = bytes.len() - reader.pos;
    if trailing > 0 {
        return Err(TransactError::decoding(
            ROOT,
            format!("{trailing} trailing bytes after value"),
        ));
    }
    Ok(value)
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

#[derive(PartialEq, Eq, PartialOrd, Ord)]
enum KeyRef<'v> {
    Str(&'v str),
    Uint(u64),
}

impl<'a> Reader<'a> {
    fn remaining(&self) -> usize {
        self.bytes.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], TransactError> {
        if n > self.remaining() {
            return Err(TransactError::decoding(
                ROOT,
                format!(
                    "unexpected end of input at offset {}: needed {n} bytes, {} remain",
                    self.pos,
                    self.remaining()
                ),
            ));
        }
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn read_u8(&mut self) -> Result<u8, TransactError> {
        Ok(self.take(1)?[0])
    }

    fn read_u16(&mut self) -> Result<u16, TransactError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn read_u32(&mut self) -> Result<u32, TransactError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_u64(&mut self) -> Result<u64, TransactError> {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(self.take(8)?);
        Ok(u64::from_be_bytes(buf))
    }

    fn read_value(&mut self, depth: usize) -> Result<Value, TransactError> {
        let offset = self.pos;
        let m = self.read_u8()?;
        match m {
            0x00..=0x7f => Ok(Value::Uint(u64::from(m))),
            0x80..=0x8f => self.read_map(usize::from(m & 0x0f), depth),
            0x90..=0x9f => self.read_array(usize::from(m & 0x0f), depth),
            0xa0..=0xbf => self.read_str(usize::from(m & 0x1f)),
            marker::NIL => Ok(Value::Nil),
            marker::FALSE => Ok(Value::Bool(false)),
            marker::TRUE => Ok(Value::Bool(true)),
            marker::BIN8 => {
                let len = usize::from(self.read_u8()?);
                self.read_bin(len)
            }
            marker::BIN16 => {
                let len = usize::from(self.read_u16()?);
                self.read_bin(len)
            }
            marker::BIN32 => {
                let len = self.read_u32()? as usize;
                self.read_bin(len)
            }
            marker::UINT8 => Ok(Value::Uint(u64::from(self.read_u8()?))),
            marker::UINT16 => Ok(Value::Uint(u64::from(self.read_u16()?))),
            marker::UINT32 => Ok(Value::Uint(u64::from(self.read_u32()?))),
            marker::UINT64 => Ok(Value::Uint(self.read_u64()?)),
            marker::STR8 => {
                let len = usize::from(self.read_u8()?);
                self.read_str(len)
            }
            marker::STR16 => {
                let len = usize::from(self.read_u16()?);
                self.read_str(len)
            }
            marker::STR32 => {
                let len = self.read_u32()? as usize;
                self.read_str(len)
            }
            marker::ARRAY16 => {
                let len = usize::from(self.read_u16()?);
                self.read_array(len, depth)
            }
            marker::ARRAY32 => {
                let len = self.read_u32()? as usize;
                self.read_array(len, depth)
            }
            marker::MAP16 => {
                let len = usize::from(self.read_u16()?);
                self.read_map(len, depth)
            }
            marker::MAP32 => {
                let len = self.read_u32()? as usize;
                self.read_map(len, depth)
            }
            other => Err(TransactError::decoding(
                ROOT,
                format!("unsupported marker 0x{other:02x} at offset {offset}"),
            )),
        }
    }

    fn read_bin(&mut self, len: usize) -> Result<Value, TransactError> {
        Ok(Value::Bin(self.take(len)?.to_vec()))
    }

    fn read_str(&mut self, len: usize) -> Result<Value, TransactError> {
        let offset = self.pos;
        let bytes = self.take(len)?;
        let s = std::str::from_utf8(bytes).map_err(|e| {
            TransactError::decoding(ROOT, format!("invalid UTF-8 in string at offset {offset}: {e}"))
        })?;
        Ok(Value::Str(s.to_owned()))
    }

    fn enter(&self, depth: usize) -> Result<usize, TransactError> {
        let next = depth + 1;
        if next > MAX_NESTING_DEPTH {
            return Err(TransactError::decoding(
                ROOT,
                format!("nesting exceeds maximum depth of {MAX_NESTING_DEPTH}"),
            ));
        }
        Ok(next)
    }

    /// Rejects element counts that cannot possibly fit in the remaining
    /// input, before allocating for them.
    fn check_count(&self, count: usize, min_bytes_each: usize) -> Result<(), TransactError> {
        if count.saturating_mul(min_bytes_each) > self.remaining() {
            return Err(TransactError::decoding(
                ROOT,
                format!(
                    "declared {count} elements at offset {} but only {} bytes remain",
                    self.pos,
                    self.remaining()
                ),
            ));
        }
        Ok(())
    }

    fn read_array(&mut self, count: usize, depth: usize) -> Result<Value, TransactError> {
        let depth = self.enter(depth)?;
        self.check_count(count, 1)?;
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.read_value(depth)?);
        }
        Ok(Value::Array(items))
    }

    fn read_map(&mut self, count: usize, depth: usize) -> Result<Value, TransactError> {
        let depth = self.enter(depth)?;
        self.check_count(count, 2)?;
        let mut entries = Vec::with_capacity(count);
        for _ in 0..count {
            let offset = self.pos;
            let key = self.read_value(depth)?;
            if !matches!(key, Value::Str(_) | Value::Uint(_)) {
                return Err(TransactError::decoding(
                    ROOT,
                    format!("unsupported {} map key at offset {offset}", key.kind()),
                ));
            }
            let value = self.read_value(depth)?;
            entries.push((key, value));
        }

        let mut seen = BTreeSet::new();
        for (key, _) in &entries {
            let key_ref = match key {
                Value::Str(s) => KeyRef::Str(s),
                Value::Uint(n) => KeyRef::Uint(*n),
                _ => continue,
            };
            if !seen.insert(key_ref) {
                return Err(TransactError::decoding(ROOT, format!("duplicate map key {key}")));
            }
        }

        Ok(Value::Map(entries))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::msgpack::encode_value;

    #[test]
    fn decodes_what_the_writer_produces() {
        let value = Value::Map(vec![
            (Value::Str("amt".into()), Value::Uint(1_000_000)),
            (Value::Str("note".into()), Value::Bin(b"hello".to_vec())),
            (
                Value::Str("apaa".into()),
                Value::Array(vec![Value::Bin(vec![1, 2]), Value::Bin(vec![3])]),
            ),
            (Value::Str("nonpart".into()), Value::Bool(true)),
        ]);
        let bytes = encode_value(&value).unwrap();
        let decoded = decode_value(&bytes).unwrap();

        // The writer sorts; compare against the sorted form.
        let Value::Map(entries) = decoded else {
            panic!("expected map");
        };
        let keys: Vec<_> = entries.iter().map(|(k, _)| k.as_str().unwrap()).collect();
        assert_eq!(keys, vec!["amt", "apaa", "nonpart", "note"]);
    }

    #[test]
    fn accepts_non_minimal_integer_width() {
        assert_eq!(decode_value(&[0xcd, 0x00, 0x05]).unwrap(), Value::Uint(5));
        assert_eq!(
            decode_value(&[0xcf, 0, 0, 0, 0, 0, 0, 0, 7]).unwrap(),
            Value::Uint(7)
        );
    }

    #[test]
    fn rejects_truncated_input() {
        let err = decode_value(&[0xcd, 0x01]).unwrap_err();
        assert!(err.is_decoding());
        assert!(err.to_string().contains("unexpected end of input"));

        // Map header promising an entry that never arrives.
        assert!(decode_value(&[0x81, 0xa3, b'a', b'm', b't']).is_err());
        assert!(decode_value(&[]).is_err());
    }

    #[test]
    fn rejects_trailing_bytes() {
        let err = decode_value(&[0x05, 0x06]).unwrap_err();
        assert_eq!(
            err,
            TransactError::decoding("msgpack", "1 trailing bytes after value")
        );
    }

    #[test]
    fn rejects_unsupported_markers() {
        // Negative fixint, float64, fixext1.
        let cases: [&[u8]; 3] = [&[0xff], &[0xcb, 0, 0, 0, 0, 0, 0, 0, 0], &[0xd4, 0, 0]];
        for bytes in cases {
            let err = decode_value(bytes).unwrap_err();
            assert!(err.to_string().contains("unsupported marker"), "{err}");
        }
    }

    #[test]
    fn rejects_duplicate_keys() {
        let bytes = [0x82, 0xa1, b'a', 0x01, 0xa1, b'a', 0x02];
        let err = decode_value(&bytes).unwrap_err();
        assert!(err.to_string().contains("duplicate map key"));
    }

    #[test]
    fn rejects_invalid_utf8() {
        let err = decode_value(&[0xa2, 0xc3, 0x28]).unwrap_err();
        assert!(err.to_string().contains("invalid UTF-8"));
    }

    #[test]
    fn rejects_binary_map_keys() {
        let bytes = [0x81, 0xc4, 0x01, 0x00, 0x01];
        assert!(decode_value(&bytes).is_err());
    }

    #[test]
    fn rejects_excessive_nesting() {
        let mut bytes = vec![0x91; MAX_NESTING_DEPTH + 1];
        bytes.push(0x00);
        let err = decode_value(&bytes).unwrap_err();
        assert!(err.to_string().contains("maximum depth"));

        let mut ok = vec![0x91; MAX_NESTING_DEPTH];
        ok.push(0x00);
        assert!(decode_value(&ok).is_ok());
    }

    #[test]
    fn rejects_oversized_declared_count_without_allocating() {
        let bytes = [0xdd, 0xff, 0xff, 0xff, 0xff];
        assert!(decode_value(&bytes).unwrap_err().is_decoding());
    }
}
