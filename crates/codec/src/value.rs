//! Dynamic values that type-erased codecs encode and decode.

use primitive_types::U256;

use crate::errors::ValueReason;

/// A decoded value.
///
/// `U8`, `U16` and `U32` are the machine-integer domain; `U64`, `U128` and
/// `U256` the big-integer domain.  Compact codecs keep whichever variant their
/// base integer codec uses.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// No payload.
    Unit,

    /// 8-bit unsigned integer.
    U8(u8),

    /// 16-bit unsigned integer.
    U16(u16),

    /// 32-bit unsigned integer.
    U32(u32),

    /// 64-bit unsigned integer.
    U64(u64),

    /// 128-bit unsigned integer.
    U128(u128),

    /// 256-bit unsigned integer.
    U256(U256),

    /// 64-bit float.
    F64(f64),

    /// UTF-8 string.
    Str(String),

    /// Tuple or array elements.
    Seq(Vec<Value>),

    /// Named fields.
    Object(Object),
}

impl Value {
    /// Short name of the variant, used in diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Unit => "unit",
            Value::U8(_) => "u8",
            Value::U16(_) => "u16",
            Value::U32(_) => "u32",
            Value::U64(_) => "u64",
            Value::U128(_) => "u128",
            Value::U256(_) => "u256",
            Value::F64(_) => "f64",
            Value::Str(_) => "str",
            Value::Seq(_) => "seq",
            Value::Object(_) => "object",
        }
    }

    /// Returns the string payload, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the fields, if this is an object.
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Returns the elements, if this is a sequence.
    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub(crate) fn wrong_shape(&self, expected: &'static str) -> ValueReason {
        ValueReason::WrongShape {
            expected,
            found: self.type_name(),
        }
    }
}

/// Ordered name/value pairs.
///
/// Iteration follows insertion order, but equality doesn't: two objects are
/// equal if they hold the same names with equal values, in any order.  Codecs
/// fix the wire order, so a value built out of order still round-trips.
#[derive(Clone, Debug, Default)]
pub struct Object(Vec<(String, Value)>);

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(n, v)| other.get(n) == Some(v))
    }
}

impl Object {
    /// Constructs an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets a field, replacing any existing value under that name in place.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    /// Gets a field by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Removes a field by name.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let pos = self.0.iter().position(|(n, _)| n == name)?;
        Some(self.0.remove(pos).1)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut obj = Object::new();
        for (k, v) in iter {
            obj.insert(k, v);
        }
        obj
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}

/// Types that can be turned into a [`Value`] for encoding.
pub trait IntoValue {
    /// Builds the dynamic representation.
    fn to_value(&self) -> Value;
}

/// Types that can be rebuilt from a decoded [`Value`].
pub trait FromValue: Sized {
    /// Converts out of the dynamic representation.
    fn from_value(value: Value) -> Result<Self, ValueReason>;
}

impl IntoValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FromValue for Value {
    fn from_value(value: Value) -> Result<Self, ValueReason> {
        Ok(value)
    }
}

/// Wires a scalar type to its value variant.
macro_rules! impl_scalar_value {
    ( $ty:ty => $variant:ident ) => {
        impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::$variant(v)
            }
        }

        impl IntoValue for $ty {
            fn to_value(&self) -> Value {
                Value::$variant(*self)
            }
        }

        impl FromValue for $ty {
            fn from_value(value: Value) -> Result<Self, ValueReason> {
                match value {
                    Value::$variant(v) => Ok(v),
                    other => Err(other.wrong_shape(stringify!($ty))),
                }
            }
        }
    };
}

impl_scalar_value!(u8 => U8);
impl_scalar_value!(u16 => U16);
impl_scalar_value!(u32 => U32);
impl_scalar_value!(u64 => U64);
impl_scalar_value!(u128 => U128);
impl_scalar_value!(U256 => U256);
impl_scalar_value!(f64 => F64);

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Unit
    }
}

impl IntoValue for () {
    fn to_value(&self) -> Value {
        Value::Unit
    }
}

impl FromValue for () {
    fn from_value(value: Value) -> Result<Self, ValueReason> {
        match value {
            Value::Unit => Ok(()),
            other => Err(other.wrong_shape("unit")),
        }
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_owned())
    }
}

impl IntoValue for String {
    fn to_value(&self) -> Value {
        Value::Str(self.clone())
    }
}

impl FromValue for String {
    fn from_value(value: Value) -> Result<Self, ValueReason> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(other.wrong_shape("str")),
        }
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Value::Seq(v.into_iter().map(Into::into).collect())
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn to_value(&self) -> Value {
        Value::Seq(self.iter().map(IntoValue::to_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn from_value(value: Value) -> Result<Self, ValueReason> {
        match value {
            Value::Seq(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(other.wrong_shape("seq")),
        }
    }
}

/// Pulls a named field out of an object for [`FromValue`] impls.
pub fn take_field<T: FromValue>(obj: &mut Object, name: &str) -> Result<T, ValueReason> {
    let v = obj
        .remove(name)
        .ok_or_else(|| ValueReason::MissingField(name.to_owned()))?;
    T::from_value(v)
}
