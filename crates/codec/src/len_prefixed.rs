//! Byte-length-prefixed payloads.
//!
//! The prefix is a fixed 4-byte little-endian length, so it can be written as
//! a placeholder and patched once the payload is encoded.  Decoding hands the
//! inner codec exactly that many bytes and requires it to use all of them,
//! which lets a reader skip payloads it doesn't understand.

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::errors::{DecodeError, DecodeReason, EncodeError, ValueReason};
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Width of the length prefix.
pub(crate) const PREFIX_LEN: usize = 4;

/// Wraps a codec in a `u32` byte length prefix.
pub fn len_prefixed(inner: AnyCodec) -> AnyCodec {
    AnyCodec::from_kind(Kind::LenPrefixed(inner))
}

pub(crate) fn encode(
    inner: &AnyCodec,
    buf: &mut EncodeBuffer,
    value: &Value,
) -> Result<(), EncodeError> {
    let start = buf.position();
    buf.insert_array(&[0; PREFIX_LEN]);
    inner.encode_into(buf, value)?;

    let len = buf.position() - start - PREFIX_LEN;
    let max = buf.max_container_len().min(u32::MAX as usize);
    if len > max {
        return Err(EncodeError::new(value, ValueReason::OverflowContainer { len, max }));
    }
    buf.patch(start, &(len as u32).to_le_bytes());
    Ok(())
}

pub(crate) fn decode(inner: &AnyCodec, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
    let len = u32::from_le_bytes(buf.read_arr()?);
    let len = buf.check_container_len(len as u64)?;
    let start = buf.position();
    let body = buf.read_slice(len)?;

    let mut sub = buf.sub(body);
    let value = inner
        .decode_from(&mut sub)
        .map_err(|e| e.rebased(start, buf.len()))?;
    if sub.remaining() > 0 {
        let at = start + sub.position();
        return Err(DecodeError::new(
            at,
            buf.len(),
            DecodeReason::ExtraInput(sub.remaining()),
        ));
    }
    Ok(value)
}
