//! Compact-length-prefixed UTF-8 strings.

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::compact;
use crate::errors::{DecodeError, DecodeReason, EncodeError, ValueReason};
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Same hint as the length prefix alone.
pub(crate) const STATIC_SIZE: usize = compact::STATIC_SIZE;

/// String codec: compact `u32` byte length, then the UTF-8 bytes.
pub fn str() -> AnyCodec {
    AnyCodec::from_kind(Kind::Str)
}

pub(crate) fn check(value: &Value) -> Result<(), ValueReason> {
    match value {
        Value::Str(_) => Ok(()),
        other => Err(other.wrong_shape("str")),
    }
}

pub(crate) fn encode(buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError> {
    let Value::Str(s) = value else {
        return Err(EncodeError::new(value, value.wrong_shape("str")));
    };

    let bytes = s.as_bytes();
    let max = buf.max_container_len().min(u32::MAX as usize);
    if bytes.len() > max {
        let reason = ValueReason::OverflowContainer {
            len: bytes.len(),
            max,
        };
        return Err(EncodeError::new(value, reason));
    }

    compact::encode_u32(buf, bytes.len() as u32);
    buf.insert_array(bytes);
    Ok(())
}

pub(crate) fn decode(buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
    let len = compact::decode_u32(buf)?;
    let len = buf.check_container_len(len as u64)?;
    let start = buf.position();
    let bytes = buf.read_slice(len)?;
    let s = std::str::from_utf8(bytes)
        .map_err(|_| DecodeError::new(start, buf.len(), DecodeReason::InvalidUtf8))?;
    Ok(Value::Str(s.to_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CodecConfig;

    #[test]
    fn test_wire_format() {
        let enc = str().encode(&Value::from("hi")).unwrap();
        assert_eq!(enc, vec![2 << 2, b'h', b'i']);

        let long = "x".repeat(100);
        let enc = str().encode(&Value::from(long.as_str())).unwrap();
        assert_eq!(&enc[..2], &[0x91, 0x01]);
        assert_eq!(enc.len(), 102);
        assert_eq!(str().decode(&enc).unwrap(), Value::Str(long));
    }

    #[test]
    fn test_multibyte() {
        let v = Value::from("héllo ✓");
        let enc = str().encode(&v).unwrap();
        assert_eq!(enc[0] >> 2, "héllo ✓".len() as u8);
        assert_eq!(str().decode(&enc).unwrap(), v);
    }

    #[test]
    fn test_short_buffer() {
        // Declares 5 bytes but only has 2.
        let err = str().decode(&[5 << 2, b'a', b'b']).unwrap_err();
        assert_eq!(
            err.reason(),
            &DecodeReason::OverrunInput {
                wanted: 5,
                remaining: 2,
            }
        );
        assert_eq!(err.codec().map(AnyCodec::name), Some("$.str"));
    }

    #[test]
    fn test_invalid_utf8() {
        let err = str().decode(&[2 << 2, 0xff, 0xfe]).unwrap_err();
        assert_eq!(err.reason(), &DecodeReason::InvalidUtf8);
        assert_eq!(err.offset(), 1);
    }

    #[test]
    fn test_container_limit() {
        let config = CodecConfig::new().with_max_container_len(3);
        let v = Value::from("abcd");
        let err = str().encode_with(&v, &config).unwrap_err();
        assert_eq!(
            err.reason(),
            &ValueReason::OverflowContainer { len: 4, max: 3 }
        );

        let enc = str().encode(&v).unwrap();
        let err = str().decode_with(&enc, &config).unwrap_err();
        assert!(matches!(
            err.reason(),
            DecodeReason::OverflowContainer { len: 4, max: 3 }
        ));
    }
}
