//! Compact variable-length unsigned integers.
//!
//! The low 2 bits of the first byte select the mode.  Multi-byte units are
//! little-endian, so the tag always lands in the first byte on the wire.
//!
//! ```txt
//! mode 0: bbbbbb00                                   0..=0x3f
//! mode 1: bbbbbb01 bbbbbbbb                          0..=0x3fff
//! mode 2: bbbbbb10 bbbbbbbb bbbbbbbb bbbbbbbb        0..=0x3fff_ffff
//! mode 3: nnnnnn11 [4 byte u32] [n extra bytes]      anything else
//! ```
//!
//! In mode 3 `n` is zero for any value that fits in 32 bits, so the tag byte
//! is exactly `0b11`.  Wider values store the minimal number of extra bytes
//! needed to hold everything above bit 32.  Machine-integer codecs only ever
//! produce or accept the `n == 0` form.

use primitive_types::U256;

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::errors::{DecodeError, DecodeReason, EncodeError};
use crate::primitive::Primitive;
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Largest value encoded in a single byte.
pub const MAX_U6: u32 = 0x3f;

/// Largest value encoded in two bytes.
pub const MAX_U14: u32 = 0x3fff;

/// Largest value encoded in four bytes.
pub const MAX_U30: u32 = 0x3fff_ffff;

/// Allocation hint: enough for any 32-bit value.
pub(crate) const STATIC_SIZE: usize = 5;

/// The wire layout a value will be encoded with.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum CompactMode {
    /// 1 byte
    Single,

    /// 2 bytes
    Two,

    /// 4 bytes
    Four,

    /// Tag byte, 4 bytes, then this many extra bytes.
    Big(u8),
}

impl CompactMode {
    /// Picks the smallest mode that holds the value.
    pub fn of(value: U256) -> Self {
        if value <= U256::from(MAX_U6) {
            CompactMode::Single
        } else if value <= U256::from(MAX_U14) {
            CompactMode::Two
        } else if value <= U256::from(MAX_U30) {
            CompactMode::Four
        } else {
            CompactMode::Big(extra_bytes(value))
        }
    }

    /// Returns the number of bytes to encode the value.
    pub fn byte_len(&self) -> usize {
        match self {
            CompactMode::Single => 1,
            CompactMode::Two => 2,
            CompactMode::Four => 4,
            CompactMode::Big(n) => 5 + *n as usize,
        }
    }
}

/// Number of bytes needed above the low 32 bits.
fn extra_bytes(value: U256) -> u8 {
    let high = value >> 32usize;
    // At most 224 bits remain, so this is at most 28.
    high.bits().div_ceil(8) as u8
}

/// Derives the compact form of an integer primitive.  Non-integer primitives
/// are returned as-is.
pub(crate) fn compact_of(base: Primitive) -> AnyCodec {
    if !base.is_int() {
        return AnyCodec::from_kind(Kind::Primitive(base));
    }
    AnyCodec::from_kind(Kind::Compact(base))
}

/// Writes a 32-bit value, as used for lengths and machine integers.
pub(crate) fn encode_u32(buf: &mut EncodeBuffer, v: u32) {
    if v <= MAX_U6 {
        buf.write_u8((v as u8) << 2);
    } else if v <= MAX_U14 {
        buf.insert_array(&(((v as u16) << 2) | 0b01).to_le_bytes());
    } else if v <= MAX_U30 {
        buf.insert_array(&((v << 2) | 0b10).to_le_bytes());
    } else {
        buf.write_u8(0b11);
        buf.insert_array(&v.to_le_bytes());
    }
}

/// Reads a 32-bit value, rejecting the extended mode 3 form.
pub(crate) fn decode_u32(buf: &mut DecodeBuffer<'_>) -> Result<u32, DecodeError> {
    let first = buf.peek_u8()?;
    match first & 0b11 {
        0 => Ok((buf.read_u8()? >> 2) as u32),
        1 => Ok((u16::from_le_bytes(buf.read_arr()?) >> 2) as u32),
        2 => Ok(u32::from_le_bytes(buf.read_arr()?) >> 2),
        _ => {
            if first != 0b11 {
                return Err(buf.error(DecodeReason::OutOfRange("u32")));
            }
            buf.read_u8()?;
            Ok(u32::from_le_bytes(buf.read_arr()?))
        }
    }
}

/// Writes an arbitrary-precision value.
pub(crate) fn encode_big(buf: &mut EncodeBuffer, v: U256) {
    if v <= U256::from(u32::MAX) {
        encode_u32(buf, v.low_u32());
        return;
    }

    let extra = extra_bytes(v);
    buf.write_u8((extra << 2) | 0b11);
    buf.insert_array(&v.low_u32().to_le_bytes());

    let high = v >> 32usize;
    let mut res = buf.reserve(extra as usize);
    for i in 0..extra as usize {
        res.write_u8(high.byte(i));
    }
    res.finish();
}

/// Reads an arbitrary-precision value.
pub(crate) fn decode_big(buf: &mut DecodeBuffer<'_>) -> Result<U256, DecodeError> {
    let first = buf.peek_u8()?;
    if first & 0b11 != 0b11 || first == 0b11 {
        return decode_u32(buf).map(U256::from);
    }

    let extra = (first >> 2) as usize;
    buf.read_u8()?;
    let mut value = U256::from(u32::from_le_bytes(buf.read_arr()?));
    let start = buf.position();
    for (i, b) in buf.read_slice(extra)?.iter().enumerate() {
        if *b == 0 {
            continue;
        }
        let shift = 32 + 8 * i;
        if shift >= 256 {
            let err = DecodeError::new(start + i, buf.len(), DecodeReason::OutOfRange("u256"));
            return Err(err);
        }
        value |= U256::from(*b) << shift;
    }
    Ok(value)
}

pub(crate) fn encode(
    base: Primitive,
    buf: &mut EncodeBuffer,
    value: &Value,
) -> Result<(), EncodeError> {
    match (base, value) {
        (Primitive::U8, Value::U8(v)) => encode_u32(buf, *v as u32),
        (Primitive::U16, Value::U16(v)) => encode_u32(buf, *v as u32),
        (Primitive::U32, Value::U32(v)) => encode_u32(buf, *v),
        (Primitive::U64, Value::U64(v)) => encode_big(buf, U256::from(*v)),
        (Primitive::U128, Value::U128(v)) => encode_big(buf, U256::from(*v)),
        (Primitive::U256, Value::U256(v)) => encode_big(buf, *v),
        _ => return Err(EncodeError::new(value, value.wrong_shape(base.type_name()))),
    }
    Ok(())
}

pub(crate) fn decode(base: Primitive, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
    let at = buf.position();
    let len = buf.len();
    let narrow_err = |target| DecodeError::new(at, len, DecodeReason::OutOfRange(target));

    match base {
        Primitive::U8 => {
            let v = decode_u32(buf)?;
            u8::try_from(v).map(Value::U8).map_err(|_| narrow_err("u8"))
        }
        Primitive::U16 => {
            let v = decode_u32(buf)?;
            u16::try_from(v).map(Value::U16).map_err(|_| narrow_err("u16"))
        }
        Primitive::U32 => decode_u32(buf).map(Value::U32),
        Primitive::U64 => {
            let v = decode_big(buf)?;
            if v > U256::from(u64::MAX) {
                return Err(narrow_err("u64"));
            }
            Ok(Value::U64(v.low_u64()))
        }
        Primitive::U128 => {
            let v = decode_big(buf)?;
            if v > U256::from(u128::MAX) {
                return Err(narrow_err("u128"));
            }
            Ok(Value::U128(v.low_u128()))
        }
        Primitive::U256 => decode_big(buf).map(Value::U256),
        Primitive::F64 => Err(narrow_err("compact")),
    }
}
