//! Zero-size marker codecs.

use crate::errors::ValueReason;
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Writes nothing and always decodes to `value`.  Encoding or validating
/// anything other than `value` fails.
pub fn constant(value: impl Into<Value>) -> AnyCodec {
    AnyCodec::from_kind(Kind::Constant(value.into()))
}

/// Codec for values that must never occur on the wire.  Every operation
/// fails.
pub fn never() -> AnyCodec {
    AnyCodec::from_kind(Kind::Never)
}

pub(crate) fn check(expected: &Value, value: &Value) -> Result<(), ValueReason> {
    if expected != value {
        return Err(ValueReason::ConstantMismatch(expected.clone()));
    }
    Ok(())
}
