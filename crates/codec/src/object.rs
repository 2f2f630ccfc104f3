//! Objects: named fields encoded back to back.
//!
//! There's no framing between fields, each field codec is responsible for
//! delimiting itself.  Reordering fields changes the wire format.

use std::collections::HashSet;

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::errors::{AssertError, ConfigError, DecodeError, EncodeError, PathSegment, ValueReason};
use crate::types::{AnyCodec, Kind};
use crate::value::{Object, Value};

/// A named member of an object codec.
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    codec: AnyCodec,
}

impl Field {
    /// Gets the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Gets the field's codec.
    pub fn codec(&self) -> &AnyCodec {
        &self.codec
    }
}

/// Constructs a field.
pub fn field(name: impl Into<String>, codec: AnyCodec) -> Field {
    Field {
        name: name.into(),
        codec,
    }
}

/// Object codec over fields in declaration order.
pub fn object(fields: impl IntoIterator<Item = Field>) -> Result<AnyCodec, ConfigError> {
    let fields: Vec<Field> = fields.into_iter().collect();
    let mut seen = HashSet::new();
    for f in &fields {
        if !seen.insert(f.name.as_str()) {
            return Err(ConfigError::DuplicateField(f.name.clone()));
        }
    }
    Ok(AnyCodec::from_kind(Kind::Object(fields)))
}

fn expect_object(value: &Value) -> Result<&Object, ValueReason> {
    value.as_object().ok_or_else(|| value.wrong_shape("object"))
}

fn get_field<'v>(obj: &'v Object, name: &str) -> Result<&'v Value, ValueReason> {
    obj.get(name)
        .ok_or_else(|| ValueReason::MissingField(name.to_owned()))
}

pub(crate) fn encode(
    fields: &[Field],
    buf: &mut EncodeBuffer,
    value: &Value,
) -> Result<(), EncodeError> {
    let obj = expect_object(value).map_err(|r| EncodeError::new(value, r))?;
    for f in fields {
        let v = get_field(obj, &f.name).map_err(|r| EncodeError::new(value, r))?;
        f.codec
            .encode_into(buf, v)
            .map_err(|e| e.within(PathSegment::Field(f.name.clone())))?;
    }
    Ok(())
}

pub(crate) fn decode(fields: &[Field], buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
    let mut obj = Object::new();
    for f in fields {
        let v = f
            .codec
            .decode_from(buf)
            .map_err(|e| e.within(PathSegment::Field(f.name.clone())))?;
        obj.insert(f.name.clone(), v);
    }
    Ok(Value::Object(obj))
}

pub(crate) fn assert(fields: &[Field], value: &Value) -> Result<(), AssertError> {
    let obj = expect_object(value).map_err(|r| AssertError::new(value, r))?;
    for f in fields {
        let v = get_field(obj, &f.name).map_err(|r| AssertError::new(value, r))?;
        f.codec
            .assert(v)
            .map_err(|e| e.within(PathSegment::Field(f.name.clone())))?;
    }
    Ok(())
}
