//! Order-preserving byte encodings
//!
//! The long and time encodings bias the sign bit so negative values map to
//! strictly smaller unsigned byte patterns than non-negative ones. The
//! compact long encoding prepends a magnitude-length marker byte so values
//! of differing encoded length still compare correctly; the time encoding
//! is a fixed nine bytes. None of the encodings emit trailing padding.

use crate::core::error::SerialisationError;
use crate::core::types::{Value, ValueKind};
use crate::serialisation::serialiser::{out_of_domain, Serialiser, ValueSerialiser};

const SIGN_BIT: u64 = 1 << 63;

/// Compact order-preserving encoding for `i64`.
///
/// The value is sign-flipped into an unsigned magnitude, leading zero bytes
/// are stripped, and a marker byte holding the significant-byte count is
/// prepended: 2 to 9 bytes total. A larger magnitude always has an equal or
/// longer encoding, and the marker sorts shorter encodings first, so
/// unsigned byte order equals numeric order.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedLongSerialiser;

/// Fixed-width order-preserving encoding for epoch-millisecond times.
///
/// Always nine bytes: the marker `0x08` followed by the eight big-endian
/// bytes of the sign-flipped magnitude. Epoch time 0 and all later times
/// sort strictly after every negative time.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedTimeSerialiser;

/// Order-preserving encoding for `f64` using the IEEE-754 total-order
/// trick: negative values have all bits flipped, non-negative values have
/// only the sign bit flipped. Always eight bytes.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedDoubleSerialiser;

/// Raw UTF-8 string encoding. Unsigned byte order of UTF-8 equals code
/// point order, so this is order-preserving as-is; prefix-freeness inside
/// composite keys is the key codec's responsibility.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderedStringSerialiser;

/// Single-byte boolean encoding, `false < true`
#[derive(Debug, Default, Clone, Copy)]
pub struct BooleanSerialiser;

/// Passthrough encoding for raw bytes
#[derive(Debug, Default, Clone, Copy)]
pub struct BytesSerialiser;

/// Zero-byte encoding for null
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSerialiser;

fn check_len(bytes: &[u8], expected: usize) -> Result<(), SerialisationError> {
    if bytes.len() != expected {
        return Err(SerialisationError::Truncated {
            expected,
            actual: bytes.len(),
        });
    }
    Ok(())
}

impl Serialiser<i64> for OrderedLongSerialiser {
    fn serialise(&self, value: &i64) -> Result<Vec<u8>, SerialisationError> {
        let biased = (*value as u64) ^ SIGN_BIT;
        let significant = ((64 - biased.leading_zeros() as usize) + 7) / 8;
        let significant = significant.max(1);
        let mut out = Vec::with_capacity(1 + significant);
        out.push(significant as u8);
        out.extend_from_slice(&biased.to_be_bytes()[8 - significant..]);
        Ok(out)
    }

    fn deserialise(&self, bytes: &[u8]) -> Result<i64, SerialisationError> {
        let (&marker, payload) = bytes
            .split_first()
            .ok_or(SerialisationError::Truncated { expected: 2, actual: bytes.len() })?;
        if !(1..=8).contains(&marker) || payload.len() != marker as usize {
            return Err(SerialisationError::InvalidMarker {
                marker,
                remaining: payload.len(),
            });
        }
        let mut magnitude = [0u8; 8];
        magnitude[8 - payload.len()..].copy_from_slice(payload);
        Ok((u64::from_be_bytes(magnitude) ^ SIGN_BIT) as i64)
    }

    fn preserves_order(&self) -> bool {
        true
    }
}

impl Serialiser<i64> for OrderedTimeSerialiser {
    fn serialise(&self, millis: &i64) -> Result<Vec<u8>, SerialisationError> {
        let biased = (*millis as u64) ^ SIGN_BIT;
        let mut out = Vec::with_capacity(9);
        out.push(8);
        out.extend_from_slice(&biased.to_be_bytes());
        Ok(out)
    }

    fn deserialise(&self, bytes: &[u8]) -> Result<i64, SerialisationError> {
        check_len(bytes, 9)?;
        if bytes[0] != 8 {
            return Err(SerialisationError::InvalidMarker {
                marker: bytes[0],
                remaining: bytes.len() - 1,
            });
        }
        let mut magnitude = [0u8; 8];
        magnitude.copy_from_slice(&bytes[1..]);
        Ok((u64::from_be_bytes(magnitude) ^ SIGN_BIT) as i64)
    }

    fn preserves_order(&self) -> bool {
        true
    }
}

impl Serialiser<f64> for OrderedDoubleSerialiser {
    fn serialise(&self, value: &f64) -> Result<Vec<u8>, SerialisationError> {
        let bits = value.to_bits();
        let ordered = if bits & SIGN_BIT != 0 { !bits } else { bits | SIGN_BIT };
        Ok(ordered.to_be_bytes().to_vec())
    }

    fn deserialise(&self, bytes: &[u8]) -> Result<f64, SerialisationError> {
        check_len(bytes, 8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(bytes);
        let ordered = u64::from_be_bytes(raw);
        let bits = if ordered & SIGN_BIT != 0 { ordered ^ SIGN_BIT } else { !ordered };
        Ok(f64::from_bits(bits))
    }

    fn preserves_order(&self) -> bool {
        true
    }
}

impl Serialiser<String> for OrderedStringSerialiser {
    fn serialise(&self, value: &String) -> Result<Vec<u8>, SerialisationError> {
        Ok(value.as_bytes().to_vec())
    }

    fn deserialise(&self, bytes: &[u8]) -> Result<String, SerialisationError> {
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    fn preserves_order(&self) -> bool {
        true
    }
}

impl Serialiser<bool> for BooleanSerialiser {
    fn serialise(&self, value: &bool) -> Result<Vec<u8>, SerialisationError> {
        Ok(vec![u8::from(*value)])
    }

    fn deserialise(&self, bytes: &[u8]) -> Result<bool, SerialisationError> {
        check_len(bytes, 1)?;
        match bytes[0] {
            0 => Ok(false),
            1 => Ok(true),
            marker => Err(SerialisationError::InvalidMarker { marker, remaining: 0 }),
        }
    }

    fn preserves_order(&self) -> bool {
        true
    }
}

impl Serialiser<Vec<u8>> for BytesSerialiser {
    fn serialise(&self, value: &Vec<u8>) -> Result<Vec<u8>, SerialisationError> {
        Ok(value.clone())
    }

    fn deserialise(&self, bytes: &[u8]) -> Result<Vec<u8>, SerialisationError> {
        Ok(bytes.to_vec())
    }

    fn preserves_order(&self) -> bool {
        true
    }
}

macro_rules! value_serialiser {
    ($type:ty, $domain:ty, $name:literal, $kind:path, $variant:path, $accessor:ident) => {
        impl ValueSerialiser for $type {
            fn name(&self) -> &'static str {
                $name
            }

            fn can_handle(&self, kind: ValueKind) -> bool {
                kind == $kind
            }

            fn preserves_order(&self) -> bool {
                Serialiser::<$domain>::preserves_order(self)
            }

            fn serialise_value(&self, value: &Value) -> Result<Vec<u8>, SerialisationError> {
                match value.$accessor() {
                    Some(v) => Serialiser::<$domain>::serialise(self, &v),
                    None => Err(out_of_domain($name, value)),
                }
            }

            fn deserialise_value(&self, bytes: &[u8]) -> Result<Value, SerialisationError> {
                Ok($variant(Serialiser::<$domain>::deserialise(self, bytes)?))
            }
        }
    };
}

value_serialiser!(OrderedLongSerialiser, i64, "ordered_long", ValueKind::Long, Value::Long, as_long);
value_serialiser!(OrderedTimeSerialiser, i64, "ordered_time", ValueKind::Time, Value::Time, as_time);
value_serialiser!(OrderedDoubleSerialiser, f64, "ordered_double", ValueKind::Double, Value::Double, as_double);
value_serialiser!(BooleanSerialiser, bool, "boolean", ValueKind::Bool, Value::Bool, as_bool);

impl ValueSerialiser for OrderedStringSerialiser {
    fn name(&self) -> &'static str {
        "ordered_string"
    }

    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::String
    }

    fn preserves_order(&self) -> bool {
        true
    }

    fn serialise_value(&self, value: &Value) -> Result<Vec<u8>, SerialisationError> {
        match value.as_str() {
            Some(s) => Ok(s.as_bytes().to_vec()),
            None => Err(out_of_domain("ordered_string", value)),
        }
    }

    fn deserialise_value(&self, bytes: &[u8]) -> Result<Value, SerialisationError> {
        Ok(Value::String(std::str::from_utf8(bytes)?.to_owned()))
    }
}

impl ValueSerialiser for BytesSerialiser {
    fn name(&self) -> &'static str {
        "bytes"
    }

    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Bytes
    }

    fn preserves_order(&self) -> bool {
        true
    }

    fn serialise_value(&self, value: &Value) -> Result<Vec<u8>, SerialisationError> {
        match value.as_bytes() {
            Some(b) => Ok(b.to_vec()),
            None => Err(out_of_domain("bytes", value)),
        }
    }

    fn deserialise_value(&self, bytes: &[u8]) -> Result<Value, SerialisationError> {
        Ok(Value::Bytes(bytes.to_vec()))
    }
}

impl ValueSerialiser for NullSerialiser {
    fn name(&self) -> &'static str {
        "null"
    }

    fn can_handle(&self, kind: ValueKind) -> bool {
        kind == ValueKind::Null
    }

    fn preserves_order(&self) -> bool {
        true
    }

    fn serialise_value(&self, value: &Value) -> Result<Vec<u8>, SerialisationError> {
        if value.is_null() {
            Ok(Vec::new())
        } else {
            Err(out_of_domain("null", value))
        }
    }

    fn deserialise_value(&self, bytes: &[u8]) -> Result<Value, SerialisationError> {
        if bytes.is_empty() {
            Ok(Value::Null)
        } else {
            Err(SerialisationError::Malformed(format!(
                "null encoding must be empty, got {} bytes",
                bytes.len()
            )))
        }
    }
}
