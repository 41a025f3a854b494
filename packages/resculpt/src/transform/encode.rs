//! Ad-hoc JSON value encoding for rule payloads.
//!
//! Scalars are formatted directly (string escaping by hand, numbers through
//! their shortest round-trip form) so the hot path never touches a
//! reflection-style serialiser. Composite payloads fall back to
//! `serde_json`.

use serde_json::Value;

/// Encode a payload value into JSON bytes.
pub(crate) fn value_to_vec(value: &Value) -> Vec<u8> {
    let mut buf = Vec::with_capacity(16);
    write_value(&mut buf, value);
    buf
}

pub(crate) fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.extend_from_slice(b"null"),
        Value::Bool(true) => buf.extend_from_slice(b"true"),
        Value::Bool(false) => buf.extend_from_slice(b"false"),
        Value::Number(number) => buf.extend_from_slice(number.to_string().as_bytes()),
        Value::String(string) => write_escaped_str(buf, string),
        composite => match serde_json::to_vec(composite) {
            Ok(bytes) => buf.extend_from_slice(&bytes),
            Err(_) => buf.extend_from_slice(b"null"),
        },
    }
}

/// Write `s` as a JSON string literal, quotes included. Escapes `"`, `\`,
/// `\n`, `\r`, `\t`, and all other control bytes as `\u00xx`.
pub(crate) fn write_escaped_str(buf: &mut Vec<u8>, s: &str) {
    buf.push(b'"');
    for &byte in s.as_bytes() {
        match byte {
            b'"' => buf.extend_from_slice(b"\\\""),
            b'\\' => buf.extend_from_slice(b"\\\\"),
            b'\n' => buf.extend_from_slice(b"\\n"),
            b'\r' => buf.extend_from_slice(b"\\r"),
            b'\t' => buf.extend_from_slice(b"\\t"),
            byte if byte < 0x20 => {
                buf.extend_from_slice(&[
                    b'\\',
                    b'u',
                    b'0',
                    b'0',
                    hex_digit(byte >> 4),
                    hex_digit(byte & 0xf),
                ]);
            }
            byte => buf.push(byte),
        }
    }
    buf.push(b'"');
}

#[inline]
fn hex_digit(nibble: u8) -> u8 {
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'a' + nibble - 10
    }
}
