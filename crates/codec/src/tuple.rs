//! Tuples: positional fields encoded back to back.

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::errors::{AssertError, DecodeError, EncodeError, PathSegment, ValueReason};
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Tuple codec over members in declaration order.
pub fn tuple(items: impl IntoIterator<Item = AnyCodec>) -> AnyCodec {
    AnyCodec::from_kind(Kind::Tuple(items.into_iter().collect()))
}

fn expect_elems<'v>(items: &[AnyCodec], value: &'v Value) -> Result<&'v [Value], ValueReason> {
    let elems = value.as_seq().ok_or_else(|| value.wrong_shape("seq"))?;
    if elems.len() != items.len() {
        return Err(ValueReason::WrongLength {
            expected: items.len(),
            found: elems.len(),
        });
    }
    Ok(elems)
}

pub(crate) fn encode(
    items: &[AnyCodec],
    buf: &mut EncodeBuffer,
    value: &Value,
) -> Result<(), EncodeError> {
    let elems = expect_elems(items, value).map_err(|r| EncodeError::new(value, r))?;
    for (i, (codec, v)) in items.iter().zip(elems).enumerate() {
        codec
            .encode_into(buf, v)
            .map_err(|e| e.within(PathSegment::Index(i)))?;
    }
    Ok(())
}

pub(crate) fn decode(items: &[AnyCodec], buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
    let mut elems = Vec::with_capacity(items.len());
    for (i, codec) in items.iter().enumerate() {
        let v = codec
            .decode_from(buf)
            .map_err(|e| e.within(PathSegment::Index(i)))?;
        elems.push(v);
    }
    Ok(Value::Seq(elems))
}

pub(crate) fn assert(items: &[AnyCodec], value: &Value) -> Result<(), AssertError> {
    let elems = expect_elems(items, value).map_err(|r| AssertError::new(value, r))?;
    for (i, (codec, v)) in items.iter().zip(elems).enumerate() {
        codec.assert(v).map_err(|e| e.within(PathSegment::Index(i)))?;
    }
    Ok(())
}
