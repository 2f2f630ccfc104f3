//! Homogeneous sequences with a compact element count.

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::compact;
use crate::errors::{AssertError, DecodeError, DecodeReason, EncodeError, PathSegment, ValueReason};
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Same hint as the count prefix alone.
pub(crate) const STATIC_SIZE: usize = compact::STATIC_SIZE;

/// Array codec: compact `u32` element count, then each element.
pub fn array(inner: AnyCodec) -> AnyCodec {
    AnyCodec::from_kind(Kind::Array(inner))
}

fn expect_elems(value: &Value, max: usize) -> Result<&[Value], ValueReason> {
    let elems = value.as_seq().ok_or_else(|| value.wrong_shape("seq"))?;
    let max = max.min(u32::MAX as usize);
    if elems.len() > max {
        return Err(ValueReason::OverflowContainer {
            len: elems.len(),
            max,
        });
    }
    Ok(elems)
}

pub(crate) fn encode(
    inner: &AnyCodec,
    buf: &mut EncodeBuffer,
    value: &Value,
) -> Result<(), EncodeError> {
    let elems =
        expect_elems(value, buf.max_container_len()).map_err(|r| EncodeError::new(value, r))?;
    compact::encode_u32(buf, elems.len() as u32);
    for (i, v) in elems.iter().enumerate() {
        inner
            .encode_into(buf, v)
            .map_err(|e| e.within(PathSegment::Index(i)))?;
    }
    Ok(())
}

pub(crate) fn decode(inner: &AnyCodec, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
    let count_at = buf.position();
    let count = compact::decode_u32(buf)?;
    let count = buf.check_container_len(count as u64)?;

    // Don't trust the count for preallocation, every element takes at least a
    // byte unless it's zero-sized.
    let mut elems = Vec::with_capacity(count.min(buf.remaining()));
    for i in 0..count {
        let before = buf.position();
        let v = inner
            .decode_from(buf)
            .map_err(|e| e.within(PathSegment::Index(i)))?;

        // Zero-sized elements don't consume input, so the count alone would
        // decide how much we build.
        let budget = zero_size_budget(count_at, buf.len());
        if buf.position() == before && count > budget {
            return Err(DecodeError::new(
                count_at,
                buf.len(),
                DecodeReason::OverflowContainer {
                    len: count as u64,
                    max: budget,
                },
            ));
        }
        elems.push(v);
    }
    Ok(Value::Seq(elems))
}

/// Most elements that consume no input an array may hold.  Bounded by the
/// input size, with a floor so small unit arrays still decode standalone.
fn zero_size_budget(count_at: usize, input_len: usize) -> usize {
    (input_len - count_at).max(MIN_ZERO_SIZE_BUDGET)
}

/// Floor for [`zero_size_budget`].
const MIN_ZERO_SIZE_BUDGET: usize = 1024;

pub(crate) fn assert(inner: &AnyCodec, value: &Value) -> Result<(), AssertError> {
    let elems = value
        .as_seq()
        .ok_or_else(|| AssertError::new(value, value.wrong_shape("seq")))?;
    for (i, v) in elems.iter().enumerate() {
        inner.assert(v).map_err(|e| e.within(PathSegment::Index(i)))?;
    }
    Ok(())
}
