//! Fixed-width little-endian number codecs.

use primitive_types::U256;

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::errors::{DecodeError, EncodeError, ValueReason};
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Fixed-width numeric types.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Primitive {
    /// 1 byte
    U8,

    /// 2 bytes
    U16,

    /// 4 bytes
    U32,

    /// 8 bytes
    U64,

    /// 16 bytes
    U128,

    /// 32 bytes
    U256,

    /// 8 bytes, IEEE 754
    F64,
}

impl Primitive {
    /// Returns the exact number of bytes this encodes to.
    pub const fn byte_len(self) -> usize {
        match self {
            Primitive::U8 => 1,
            Primitive::U16 => 2,
            Primitive::U32 => 4,
            Primitive::U64 | Primitive::F64 => 8,
            Primitive::U128 => 16,
            Primitive::U256 => 32,
        }
    }

    /// Returns if this is an unsigned integer type.
    pub const fn is_int(self) -> bool {
        !matches!(self, Primitive::F64)
    }

    /// Gets the constructor name.
    pub fn name(self) -> &'static str {
        match self {
            Primitive::U8 => "$.u8",
            Primitive::U16 => "$.u16",
            Primitive::U32 => "$.u32",
            Primitive::U64 => "$.u64",
            Primitive::U128 => "$.u128",
            Primitive::U256 => "$.u256",
            Primitive::F64 => "$.f64",
        }
    }

    /// Name of the value variant this accepts.
    pub(crate) fn type_name(self) -> &'static str {
        match self {
            Primitive::U8 => "u8",
            Primitive::U16 => "u16",
            Primitive::U32 => "u32",
            Primitive::U64 => "u64",
            Primitive::U128 => "u128",
            Primitive::U256 => "u256",
            Primitive::F64 => "f64",
        }
    }

    /// Checks that the value is the variant this type decodes to.
    pub(crate) fn check(self, value: &Value) -> Result<(), ValueReason> {
        let ok = matches!(
            (self, value),
            (Primitive::U8, Value::U8(_))
                | (Primitive::U16, Value::U16(_))
                | (Primitive::U32, Value::U32(_))
                | (Primitive::U64, Value::U64(_))
                | (Primitive::U128, Value::U128(_))
                | (Primitive::U256, Value::U256(_))
                | (Primitive::F64, Value::F64(_))
        );
        if !ok {
            return Err(value.wrong_shape(self.type_name()));
        }
        Ok(())
    }

    pub(crate) fn encode(self, buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError> {
        match value {
            Value::U8(v) if self == Primitive::U8 => buf.write_u8(*v),
            Value::U16(v) if self == Primitive::U16 => buf.insert_array(&v.to_le_bytes()),
            Value::U32(v) if self == Primitive::U32 => buf.insert_array(&v.to_le_bytes()),
            Value::U64(v) if self == Primitive::U64 => buf.insert_array(&v.to_le_bytes()),
            Value::U128(v) if self == Primitive::U128 => buf.insert_array(&v.to_le_bytes()),
            Value::U256(v) if self == Primitive::U256 => buf.insert_array(&u256_to_le(v)),
            Value::F64(v) if self == Primitive::F64 => buf.insert_array(&v.to_le_bytes()),
            other => return Err(EncodeError::new(other, other.wrong_shape(self.type_name()))),
        }
        Ok(())
    }

    pub(crate) fn decode(self, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
        Ok(match self {
            Primitive::U8 => Value::U8(buf.read_u8()?),
            Primitive::U16 => Value::U16(u16::from_le_bytes(buf.read_arr()?)),
            Primitive::U32 => Value::U32(u32::from_le_bytes(buf.read_arr()?)),
            Primitive::U64 => Value::U64(u64::from_le_bytes(buf.read_arr()?)),
            Primitive::U128 => Value::U128(u128::from_le_bytes(buf.read_arr()?)),
            Primitive::U256 => Value::U256(U256::from_little_endian(&buf.read_arr::<32>()?)),
            Primitive::F64 => Value::F64(f64::from_le_bytes(buf.read_arr()?)),
        })
    }
}

pub(crate) fn u256_to_le(v: &U256) -> [u8; 32] {
    let mut out = [0; 32];
    for (i, b) in out.iter_mut().enumerate() {
        *b = v.byte(i);
    }
    out
}

/// Generates the constructor fns for each primitive.
macro_rules! primitive_ctor {
    ( $( $fname:ident => $variant:ident ),* $(,)? ) => {
        $(
            #[doc = concat!("Fixed-width `", stringify!($fname), "` codec.")]
            pub fn $fname() -> AnyCodec {
                AnyCodec::from_kind(Kind::Primitive(Primitive::$variant))
            }
        )*
    };
}

primitive_ctor! {
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    u128 => U128,
    u256 => U256,
    f64 => F64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian() {
        assert_eq!(u16().encode(&Value::U16(0x0102)).unwrap(), vec![2, 1]);
        assert_eq!(
            u32().encode(&Value::U32(0x01020304)).unwrap(),
            vec![4, 3, 2, 1]
        );
        let big = U256::from(0x0102u32) << 240;
        let enc = u256().encode(&Value::U256(big)).unwrap();
        assert_eq!(enc.len(), 32);
        assert_eq!(&enc[30..], &[2, 1]);
        assert_eq!(u256().decode(&enc).unwrap(), Value::U256(big));
    }

    #[test]
    fn test_static_size_is_width() {
        for (codec, width) in [
            (u8(), 1),
            (u16(), 2),
            (u32(), 4),
            (u64(), 8),
            (u128(), 16),
            (u256(), 32),
            (f64(), 8),
        ] {
            assert_eq!(codec.static_size(), width);
        }
    }

    #[test]
    fn test_f64_special_values() {
        for v in [0.0, -1.0, 1.2345, 1e23, 4e-56, f64::MAX, f64::NEG_INFINITY] {
            let enc = f64().encode(&Value::F64(v)).unwrap();
            assert_eq!(f64().decode(&enc).unwrap(), Value::F64(v));
        }

        let enc = f64().encode(&Value::F64(f64::NAN)).unwrap();
        match f64().decode(&enc).unwrap() {
            Value::F64(v) => assert!(v.is_nan()),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_wrong_shape() {
        for bad in [Value::Str("0".into()), Value::Unit, Value::U64(1)] {
            assert!(f64().assert(&bad).is_err());
            let err = f64().encode(&bad).unwrap_err();
            assert_eq!(err.codec().map(AnyCodec::name), Some("$.f64"));
        }
    }

    #[test]
    fn test_truncated() {
        let err = u64().decode(&[1, 2, 3]).unwrap_err();
        assert_eq!(err.offset(), 0);
        assert_eq!(err.codec().map(AnyCodec::name), Some("$.u64"));
    }
}
