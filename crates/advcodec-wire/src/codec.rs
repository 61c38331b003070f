use std::collections::BTreeMap;

use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::error::{CodecError, Result};
use crate::format::{Format, IDENTIFIER_LEN};
use crate::wire_type::{ByteOrder, ScalarKind, WireType};

/// Sensor name → physical value.
pub type DecodedValues = BTreeMap<String, f64>;

/// Read the leading little-endian identifier without decoding anything else.
pub fn peek_identifier(buf: &[u8]) -> Option<u16> {
    let mut header = buf.get(..IDENTIFIER_LEN)?;
    Some(header.get_u16_le())
}

/// Decode a buffer against a format.
///
/// Identified formats fail with [`CodecError::FormatMismatch`] when the
/// leading identifier differs, and with [`CodecError::TooShort`] when the
/// buffer cannot hold the identifier plus `total_length` bytes. Raw formats
/// only need `total_length` bytes.
///
/// Fields whose byte range lies past the end of the payload are skipped;
/// every other field is still decoded. Bytes beyond the declared length are
/// ignored.
pub fn decode(buf: &[u8], format: &Format) -> Result<DecodedValues> {
    let payload = match format.identifier() {
        Some(expected) => {
            let found = peek_identifier(buf).ok_or(CodecError::TooShort {
                len: buf.len(),
                required: IDENTIFIER_LEN,
            })?;
            if found != expected {
                return Err(CodecError::FormatMismatch { expected, found });
            }
            &buf[IDENTIFIER_LEN..]
        }
        None => buf,
    };

    if payload.len() < format.total_length() {
        return Err(CodecError::TooShort {
            len: buf.len(),
            required: format.wire_len(),
        });
    }

    let mut values = DecodedValues::new();
    for field in format.fields() {
        let Some(bytes) = payload.get(field.offset..field.end()) else {
            debug!(
                field = %field.name,
                offset = field.offset,
                end = field.end(),
                available = payload.len(),
                "field outside payload, skipping"
            );
            continue;
        };
        let value = read_scalar(field.wire_type, bytes) * field.scale;
        values.insert(field.name.clone(), value);
    }

    Ok(values)
}

/// Encode values into a new buffer of exactly [`Format::wire_len`] bytes.
///
/// Missing values leave their bytes zeroed. Integer fields are rounded to
/// the nearest wire value and saturate at the bounds of their width.
pub fn encode(values: &DecodedValues, format: &Format) -> Bytes {
    let mut dst = BytesMut::with_capacity(format.wire_len());
    encode_into(values, format, &mut dst);
    dst.freeze()
}

/// Append an encoded payload to `dst`.
///
/// ```text
/// ┌──────────────────┬──────────────────────────────────┐
/// │ Identifier (2B)  │ Payload (total_length bytes)     │
/// │ LE, if any       │ zero-filled, then fields written │
/// └──────────────────┴──────────────────────────────────┘
/// ```
pub fn encode_into(values: &DecodedValues, format: &Format, dst: &mut BytesMut) {
    let start = dst.len();
    dst.resize(start + format.wire_len(), 0);
    let buf = &mut dst[start..];

    if let Some(identifier) = format.identifier() {
        (&mut buf[..IDENTIFIER_LEN]).put_u16_le(identifier);
    }

    let payload = &mut buf[format.header_len()..];
    for field in format.fields() {
        let Some(&value) = values.get(&field.name) else {
            trace!(field = %field.name, "no value supplied, leaving zero bytes");
            continue;
        };
        let Some(bytes) = payload.get_mut(field.offset..field.end()) else {
            debug!(
                field = %field.name,
                offset = field.offset,
                end = field.end(),
                "field outside payload, not written"
            );
            continue;
        };
        let raw = value / field.scale;
        if let Some((min, max)) = field.wire_type.kind.bounds() {
            let rounded = raw.round();
            if !(min..=max).contains(&rounded) {
                debug!(
                    field = %field.name,
                    value,
                    min = min * field.scale,
                    max = max * field.scale,
                    "value outside wire range, saturating"
                );
            }
        }
        write_scalar(field.wire_type, raw, bytes);
    }
}

fn read_scalar(wire: WireType, mut src: &[u8]) -> f64 {
    match (wire.kind, wire.order) {
        (ScalarKind::U8, _) => f64::from(src.get_u8()),
        (ScalarKind::I8, _) => f64::from(src.get_i8()),
        (ScalarKind::U16, ByteOrder::Little) => f64::from(src.get_u16_le()),
        (ScalarKind::U16, ByteOrder::Big) => f64::from(src.get_u16()),
        (ScalarKind::I16, ByteOrder::Little) => f64::from(src.get_i16_le()),
        (ScalarKind::I16, ByteOrder::Big) => f64::from(src.get_i16()),
        (ScalarKind::U32, ByteOrder::Little) => f64::from(src.get_u32_le()),
        (ScalarKind::U32, ByteOrder::Big) => f64::from(src.get_u32()),
        (ScalarKind::I32, ByteOrder::Little) => f64::from(src.get_i32_le()),
        (ScalarKind::I32, ByteOrder::Big) => f64::from(src.get_i32()),
        (ScalarKind::F32, ByteOrder::Little) => f64::from(src.get_f32_le()),
        (ScalarKind::F32, ByteOrder::Big) => f64::from(src.get_f32()),
    }
}

// `as` from float to integer saturates and maps NaN to zero.
fn write_scalar(wire: WireType, raw: f64, mut dst: &mut [u8]) {
    let value = if wire.kind.is_float() { raw } else { raw.round() };
    match (wire.kind, wire.order) {
        (ScalarKind::U8, _) => dst.put_u8(value as u8),
        (ScalarKind::I8, _) => dst.put_i8(value as i8),
        (ScalarKind::U16, ByteOrder::Little) => dst.put_u16_le(value as u16),
        (ScalarKind::U16, ByteOrder::Big) => dst.put_u16(value as u16),
        (ScalarKind::I16, ByteOrder::Little) => dst.put_i16_le(value as i16),
        (ScalarKind::I16, ByteOrder::Big) => dst.put_i16(value as i16),
        (ScalarKind::U32, ByteOrder::Little) => dst.put_u32_le(value as u32),
        (ScalarKind::U32, ByteOrder::Big) => dst.put_u32(value as u32),
        (ScalarKind::I32, ByteOrder::Little) => dst.put_i32_le(value as i32),
        (ScalarKind::I32, ByteOrder::Big) => dst.put_i32(value as i32),
        (ScalarKind::F32, ByteOrder::Little) => dst.put_f32_le(value as f32),
        (ScalarKind::F32, ByteOrder::Big) => dst.put_f32(value as f32),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDescriptor;

    fn battery_temperature() -> Format {
        Format::identified(0x1001, 3)
            .with_field(FieldDescriptor::new("battery", 0, WireType::U8))
            .with_field(FieldDescriptor::new("temperature", 1, WireType::I16_BE).with_scale(0.01))
    }

    fn values(pairs: &[(&str, f64)]) -> DecodedValues {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), *value))
            .collect()
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_encode_known_layout() {
        let buf = encode(
            &values(&[("battery", 87.0), ("temperature", 23.45)]),
            &battery_temperature(),
        );
        assert_eq!(buf.as_ref(), &[0x01, 0x10, 0x57, 0x09, 0x29]);
    }

    #[test]
    fn test_decode_known_layout() {
        let decoded = decode(&[0x01, 0x10, 0x57, 0x09, 0x29], &battery_temperature()).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_close(decoded["battery"], 87.0);
        assert_close(decoded["temperature"], 23.45);
    }

    #[test]
    fn test_decode_identifier_mismatch() {
        let result = decode(&[0x02, 0x10, 0x57, 0x09, 0x29], &battery_temperature());
        assert_eq!(
            result,
            Err(CodecError::FormatMismatch {
                expected: 0x1001,
                found: 0x1002
            })
        );
    }

    #[test]
    fn test_decode_mismatch_wins_over_short_payload() {
        let result = decode(&[0xFF, 0xFF], &battery_temperature());
        assert!(matches!(result, Err(CodecError::FormatMismatch { .. })));
    }

    #[test]
    fn test_decode_too_short_for_identifier() {
        assert_eq!(
            decode(&[0x01], &battery_temperature()),
            Err(CodecError::TooShort {
                len: 1,
                required: 2
            })
        );
        assert!(matches!(
            decode(&[], &battery_temperature()),
            Err(CodecError::TooShort { len: 0, .. })
        ));
    }

    #[test]
    fn test_decode_too_short_for_payload() {
        assert_eq!(
            decode(&[0x01, 0x10, 0x57, 0x09], &battery_temperature()),
            Err(CodecError::TooShort {
                len: 4,
                required: 5
            })
        );
    }

    #[test]
    fn test_raw_too_short() {
        let format = Format::raw(4).with_field(FieldDescriptor::new("x", 0, WireType::U32_LE));
        assert_eq!(
            decode(&[1, 2, 3], &format),
            Err(CodecError::TooShort {
                len: 3,
                required: 4
            })
        );
    }

    #[test]
    fn test_trailing_bytes_ignored() {
        let decoded = decode(
            &[0x01, 0x10, 0x57, 0x09, 0x29, 0xAA, 0xBB],
            &battery_temperature(),
        )
        .unwrap();
        assert_close(decoded["temperature"], 23.45);
    }

    #[test]
    fn test_empty_format_is_success_not_failure() {
        let format = Format::identified(0x0042, 0);
        let decoded = decode(&[0x42, 0x00], &format).unwrap();
        assert!(decoded.is_empty());
    }

    #[test]
    fn test_truncated_payload_drops_only_last_field() {
        let full = Format::raw(4)
            .with_field(FieldDescriptor::new("a", 0, WireType::U8))
            .with_field(FieldDescriptor::new("b", 1, WireType::U8))
            .with_field(FieldDescriptor::new("c", 2, WireType::U16_BE));
        let buf = encode(&values(&[("a", 1.0), ("b", 2.0), ("c", 300.0)]), &full);

        // An older peer that only promises three bytes.
        let short = Format::raw(3).with_fields(full.fields().iter().cloned());
        let decoded = decode(&buf[..3], &short).unwrap();

        assert_eq!(decoded.len(), 2);
        assert_close(decoded["a"], 1.0);
        assert_close(decoded["b"], 2.0);
        assert!(!decoded.contains_key("c"));
    }

    #[test]
    fn test_missing_values_leave_zero_bytes() {
        let buf = encode(&values(&[("temperature", -1.0)]), &battery_temperature());
        assert_eq!(buf.as_ref(), &[0x01, 0x10, 0x00, 0xFF, 0x9C]);

        let empty = encode(&DecodedValues::new(), &battery_temperature());
        assert_eq!(empty.as_ref(), &[0x01, 0x10, 0x00, 0x00, 0x00]);
    }

    #[test]
    fn test_unknown_values_ignored() {
        let buf = encode(
            &values(&[("battery", 5.0), ("humidity", 40.0)]),
            &battery_temperature(),
        );
        assert_eq!(buf.len(), 5);
        assert_eq!(buf[2], 5);
    }

    #[test]
    fn test_byte_orders() {
        let format = Format::raw(12)
            .with_field(FieldDescriptor::new("le16", 0, WireType::U16_LE))
            .with_field(FieldDescriptor::new("be16", 2, WireType::U16_BE))
            .with_field(FieldDescriptor::new("le32", 4, WireType::I32_LE))
            .with_field(FieldDescriptor::new("be32", 8, WireType::I32_BE));
        let buf = encode(
            &values(&[
                ("le16", 258.0),
                ("be16", 258.0),
                ("le32", -2.0),
                ("be32", 16_909_060.0),
            ]),
            &format,
        );
        assert_eq!(
            buf.as_ref(),
            &[0x02, 0x01, 0x01, 0x02, 0xFE, 0xFF, 0xFF, 0xFF, 0x01, 0x02, 0x03, 0x04]
        );
    }

    #[test]
    fn test_signed_decoding_is_twos_complement() {
        let format = Format::raw(3)
            .with_field(FieldDescriptor::new("i8", 0, WireType::I8))
            .with_field(FieldDescriptor::new("i16", 1, WireType::I16_BE));
        let decoded = decode(&[0xFF, 0x80, 0x00], &format).unwrap();
        assert_close(decoded["i8"], -1.0);
        assert_close(decoded["i16"], -32768.0);
    }

    #[test]
    fn test_float_byte_orders() {
        let format = Format::raw(8)
            .with_field(FieldDescriptor::new("le", 0, WireType::F32_LE))
            .with_field(FieldDescriptor::new("be", 4, WireType::F32_BE));
        let buf = encode(&values(&[("le", 1.5), ("be", 1.5)]), &format);
        assert_eq!(&buf[..4], &1.5f32.to_le_bytes());
        assert_eq!(&buf[4..], &1.5f32.to_be_bytes());

        let decoded = decode(&buf, &format).unwrap();
        assert_eq!(decoded["le"], 1.5);
        assert_eq!(decoded["be"], 1.5);
    }

    #[test]
    fn test_encode_rounds_to_nearest() {
        // 0.29 / 0.01 is slightly below 29 in binary floating point.
        let format = Format::raw(2)
            .with_field(FieldDescriptor::new("humidity", 0, WireType::U16_BE).with_scale(0.01));
        let buf = encode(&values(&[("humidity", 0.29)]), &format);
        assert_eq!(buf.as_ref(), &[0x00, 0x1D]);
    }

    #[test]
    fn test_out_of_range_values_saturate() {
        let format = Format::raw(3)
            .with_field(FieldDescriptor::new("u8", 0, WireType::U8))
            .with_field(FieldDescriptor::new("i16", 1, WireType::I16_LE));
        let buf = encode(&values(&[("u8", 300.0), ("i16", -40_000.0)]), &format);
        assert_eq!(buf.as_ref(), &[0xFF, 0x00, 0x80]);

        let negative = encode(&values(&[("u8", -5.0)]), &format);
        assert_eq!(negative[0], 0);
    }

    #[test]
    fn test_encode_into_appends() {
        let mut dst = BytesMut::from(&b"xx"[..]);
        encode_into(&values(&[("battery", 1.0)]), &battery_temperature(), &mut dst);
        assert_eq!(dst.as_ref(), &[b'x', b'x', 0x01, 0x10, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_encode_skips_field_outside_payload() {
        let format = Format::raw(2).with_field(FieldDescriptor::new("wide", 0, WireType::U32_BE));
        let buf = encode(&values(&[("wide", 7.0)]), &format);
        assert_eq!(buf.as_ref(), &[0, 0]);
    }

    #[test]
    fn test_peek_identifier() {
        assert_eq!(peek_identifier(&[0x01, 0x10, 0xAA]), Some(0x1001));
        assert_eq!(peek_identifier(&[0x01]), None);
    }
}
