//! Byte escaping and varint framing for composite keys
//!
//! Composite keys join variable-length field encodings with a `0x00`
//! delimiter. So the delimiter can never appear inside a field, field
//! bytes are escaped: `0x00` becomes `0x01 0x01` and `0x01` becomes
//! `0x01 0x02`. Escaping keeps unsigned byte order intact and makes
//! every field encoding prefix-free with respect to the delimiter, which
//! is what the no-field-is-a-prefix invariant requires.

use crate::core::error::SerialisationError;

/// Field delimiter inside composite keys
pub const DELIMITER: u8 = 0x00;

const ESCAPE: u8 = 0x01;
const ESCAPED_DELIMITER: u8 = 0x01;
const ESCAPED_ESCAPE: u8 = 0x02;

/// Escape a field so it contains no raw delimiter bytes
pub fn escape(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            DELIMITER => out.extend_from_slice(&[ESCAPE, ESCAPED_DELIMITER]),
            ESCAPE => out.extend_from_slice(&[ESCAPE, ESCAPED_ESCAPE]),
            _ => out.push(b),
        }
    }
    out
}

/// Reverse `escape`; fails on a dangling or unknown escape sequence
pub fn unescape(bytes: &[u8]) -> Result<Vec<u8>, SerialisationError> {
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter();
    while let Some(&b) = iter.next() {
        if b != ESCAPE {
            out.push(b);
            continue;
        }
        match iter.next() {
            Some(&ESCAPED_DELIMITER) => out.push(DELIMITER),
            Some(&ESCAPED_ESCAPE) => out.push(ESCAPE),
            Some(&other) => {
                return Err(SerialisationError::Malformed(format!(
                    "invalid escape sequence 0x01 {other:#04x}"
                )))
            }
            None => {
                return Err(SerialisationError::Malformed(
                    "dangling escape byte at end of field".into(),
                ))
            }
        }
    }
    Ok(out)
}

/// Append a LEB128 varint length/count
pub fn encode_varint(mut value: u32, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7F) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Decode a LEB128 varint, returning the value and the bytes consumed
pub fn decode_varint(bytes: &[u8]) -> Result<(u32, usize), SerialisationError> {
    let mut value = 0u32;
    let mut shift = 0;
    for (i, &byte) in bytes.iter().enumerate() {
        if i >= 5 {
            break;
        }
        value |= ((byte & 0x7F) as u32) << shift;
        if byte & 0x80 == 0 {
            return Ok((value, i + 1));
        }
        shift += 7;
    }
    Err(SerialisationError::Malformed(
        "unterminated varint".into(),
    ))
}
