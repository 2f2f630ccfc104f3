//! High-level util functions.

use crate::buf_decoder::DecodeBuffer;
use crate::errors::{DecodeError, DecodeReason, EncodeError};
use crate::types::AnyCodec;
use crate::value::{FromValue, IntoValue, Value};

/// Encodes the value into a newly allocated vec.
pub fn encode_to_vec<T: IntoValue + ?Sized>(
    codec: &AnyCodec,
    v: &T,
) -> Result<Vec<u8>, EncodeError> {
    codec.encode(&v.to_value())
}

/// Decodes a value from a buffer, throwing an error if there's leftover bytes
/// or the value doesn't convert into `T`.
pub fn decode_buf_exact<T: FromValue>(codec: &AnyCodec, buf: &[u8]) -> Result<T, DecodeError> {
    let v = codec.decode(buf)?;
    T::from_value(v).map_err(|reason| {
        DecodeError::new(buf.len(), buf.len(), DecodeReason::Shape(reason)).attributed_to(codec)
    })
}

/// Decodes a value from the front of a buffer, returning it along with the
/// number of bytes it took up.
pub fn decode_buf_prefix(codec: &AnyCodec, buf: &[u8]) -> Result<(Value, usize), DecodeError> {
    let mut dec = DecodeBuffer::new(buf);
    let v = codec.decode_from(&mut dec)?;
    Ok((v, dec.position()))
}
