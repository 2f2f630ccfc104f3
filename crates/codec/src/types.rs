use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::config::CodecConfig;
use crate::errors::{AssertError, DecodeError, DecodeReason, EncodeError, ValueReason};
use crate::object::Field;
use crate::primitive::Primitive;
use crate::union::{StringUnion, TaggedUnion, Union};
use crate::util::{decode_buf_exact, encode_to_vec};
use crate::value::{FromValue, IntoValue, Value};
use crate::{array, compact, constant, len_prefixed, object, string, tuple};

/// Extension point for codecs defined outside this crate.
///
/// Implementations only get the public buffer primitives, the same ones the
/// built-in codecs use.
pub trait CustomCodec: Send + Sync + fmt::Debug + 'static {
    /// Identity used in diagnostics and for derivation dispatch.
    fn name(&self) -> &'static str;

    /// Allocation hint, see [`AnyCodec::static_size`].
    fn static_size(&self) -> usize;

    /// Writes the value at the cursor.
    fn encode(&self, buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError>;

    /// Reads a value at the cursor.
    fn decode(&self, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError>;

    /// Validates a value without encoding it.
    fn assert(&self, value: &Value) -> Result<(), AssertError>;
}

/// Constructor identity plus the arguments a codec was built from.
///
/// This is the codec's metadata record.  It's only used to recognise codecs
/// (derivation, diagnostics); the wire behavior of each kind lives in its own
/// module.
#[derive(Clone, Debug)]
pub enum Kind {
    /// Fixed-width little-endian number.
    Primitive(Primitive),

    /// Compact form of an integer primitive.
    Compact(Primitive),

    /// Compact-length-prefixed UTF-8 string.
    Str,

    /// Uninhabited marker.
    Never,

    /// Zero-size marker decoding to a fixed value.
    Constant(Value),

    /// Named fields in declaration order.
    Object(Vec<Field>),

    /// Positional fields in declaration order.
    Tuple(Vec<AnyCodec>),

    /// Discriminant byte plus member.
    Union(Union),

    /// Union of objects keyed by a tag field.
    TaggedUnion(TaggedUnion),

    /// Single discriminant byte naming a string.
    StringUnion(StringUnion),

    /// Compact element count plus elements.
    Array(AnyCodec),

    /// Byte length prefix plus payload.
    LenPrefixed(AnyCodec),

    /// Defined outside this crate.
    Custom(Arc<dyn CustomCodec>),
}

/// Argument-free identity of a [`Kind`], used as the derivation registry key.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CodecId {
    /// See [`Kind::Primitive`].
    Primitive(Primitive),
    /// See [`Kind::Compact`].
    Compact,
    /// See [`Kind::Str`].
    Str,
    /// See [`Kind::Never`].
    Never,
    /// See [`Kind::Constant`].
    Constant,
    /// See [`Kind::Object`].
    Object,
    /// See [`Kind::Tuple`].
    Tuple,
    /// See [`Kind::Union`].
    Union,
    /// See [`Kind::TaggedUnion`].
    TaggedUnion,
    /// See [`Kind::StringUnion`].
    StringUnion,
    /// See [`Kind::Array`].
    Array,
    /// See [`Kind::LenPrefixed`].
    LenPrefixed,
    /// See [`Kind::Custom`], keyed by [`CustomCodec::name`].
    Custom(&'static str),
}

impl Kind {
    /// Gets the registry key for this kind.
    pub fn id(&self) -> CodecId {
        match self {
            Kind::Primitive(p) => CodecId::Primitive(*p),
            Kind::Compact(_) => CodecId::Compact,
            Kind::Str => CodecId::Str,
            Kind::Never => CodecId::Never,
            Kind::Constant(_) => CodecId::Constant,
            Kind::Object(_) => CodecId::Object,
            Kind::Tuple(_) => CodecId::Tuple,
            Kind::Union(_) => CodecId::Union,
            Kind::TaggedUnion(_) => CodecId::TaggedUnion,
            Kind::StringUnion(_) => CodecId::StringUnion,
            Kind::Array(_) => CodecId::Array,
            Kind::LenPrefixed(_) => CodecId::LenPrefixed,
            Kind::Custom(c) => CodecId::Custom(c.name()),
        }
    }

    fn static_size(&self) -> usize {
        match self {
            Kind::Primitive(p) => p.byte_len(),
            Kind::Compact(_) => compact::STATIC_SIZE,
            Kind::Str => string::STATIC_SIZE,
            Kind::Never | Kind::Constant(_) => 0,
            Kind::Object(fields) => fields.iter().map(|f| f.codec().static_size()).sum(),
            Kind::Tuple(items) => items.iter().map(AnyCodec::static_size).sum(),
            Kind::Union(u) => u.static_size(),
            Kind::TaggedUnion(t) => t.static_size(),
            Kind::StringUnion(_) => 1,
            Kind::Array(_) => array::STATIC_SIZE,
            Kind::LenPrefixed(inner) => len_prefixed::PREFIX_LEN + inner.static_size(),
            Kind::Custom(c) => c.static_size(),
        }
    }
}

struct Node {
    kind: Kind,
    static_size: usize,
}

/// Type-erased, immutable, cheaply cloneable codec handle.
#[derive(Clone)]
pub struct AnyCodec(Arc<Node>);

impl AnyCodec {
    pub(crate) fn from_kind(kind: Kind) -> Self {
        let static_size = kind.static_size();
        Self(Arc::new(Node { kind, static_size }))
    }

    /// Wraps a custom codec implementation.
    pub fn custom(codec: impl CustomCodec) -> Self {
        Self::from_kind(Kind::Custom(Arc::new(codec)))
    }

    /// Gets the metadata record.
    pub fn kind(&self) -> &Kind {
        &self.0.kind
    }

    /// Gets the registry key.
    pub fn id(&self) -> CodecId {
        self.0.kind.id()
    }

    /// Gets the constructor name, like `$.object`.
    pub fn name(&self) -> &'static str {
        match &self.0.kind {
            Kind::Primitive(p) => p.name(),
            Kind::Compact(_) => "$.compact",
            Kind::Str => "$.str",
            Kind::Never => "$.never",
            Kind::Constant(_) => "$.constant",
            Kind::Object(_) => "$.object",
            Kind::Tuple(_) => "$.tuple",
            Kind::Union(_) => "$.union",
            Kind::TaggedUnion(_) => "$.taggedUnion",
            Kind::StringUnion(_) => "$.stringUnion",
            Kind::Array(_) => "$.array",
            Kind::LenPrefixed(_) => "$.lenPrefixed",
            Kind::Custom(c) => c.name(),
        }
    }

    /// Estimated encoded length, for sizing buffers.  Exact for fixed-width
    /// codecs, a lower bound or guess for everything else.
    pub fn static_size(&self) -> usize {
        self.0.static_size
    }

    /// Attaches a static type to this codec.
    pub fn typed<T>(self) -> Codec<T> {
        Codec {
            inner: self,
            _t: PhantomData,
        }
    }

    /// Encodes a value into a new buffer.
    pub fn encode(&self, value: &Value) -> Result<Vec<u8>, EncodeError> {
        self.encode_with(value, &CodecConfig::default())
    }

    /// Encodes a value into a new buffer, with explicit settings.
    pub fn encode_with(&self, value: &Value, config: &CodecConfig) -> Result<Vec<u8>, EncodeError> {
        let mut buf = EncodeBuffer::with_config(self.static_size(), config);
        self.encode_into(&mut buf, value)?;
        Ok(buf.into_vec())
    }

    /// Decodes a value, failing on leftover bytes.
    pub fn decode(&self, bytes: &[u8]) -> Result<Value, DecodeError> {
        self.decode_with(bytes, &CodecConfig::default())
    }

    /// Decodes a value, with explicit settings.
    pub fn decode_with(&self, bytes: &[u8], config: &CodecConfig) -> Result<Value, DecodeError> {
        let mut buf = DecodeBuffer::with_config(bytes, config);
        let value = self.decode_from(&mut buf)?;
        if config.reject_trailing() && buf.remaining() > 0 {
            let err = buf.error(DecodeReason::ExtraInput(buf.remaining()));
            return Err(err.attributed_to(self));
        }
        Ok(value)
    }

    /// Writes a value at the buffer's cursor.
    pub fn encode_into(&self, buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError> {
        let res = match &self.0.kind {
            Kind::Primitive(p) => p.encode(buf, value),
            Kind::Compact(p) => compact::encode(*p, buf, value),
            Kind::Str => string::encode(buf, value),
            Kind::Never => Err(EncodeError::new(value, ValueReason::Never)),
            Kind::Constant(c) => constant::check(c, value).map_err(|r| EncodeError::new(value, r)),
            Kind::Object(fields) => object::encode(fields, buf, value),
            Kind::Tuple(items) => tuple::encode(items, buf, value),
            Kind::Union(u) => u.encode(buf, value),
            Kind::TaggedUnion(t) => t.encode(buf, value),
            Kind::StringUnion(s) => s.encode(buf, value),
            Kind::Array(inner) => array::encode(inner, buf, value),
            Kind::LenPrefixed(inner) => len_prefixed::encode(inner, buf, value),
            Kind::Custom(c) => c.encode(buf, value),
        };
        res.map_err(|e| e.attributed_to(self))
    }

    /// Reads a value at the buffer's cursor.
    pub fn decode_from(&self, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
        let res = match &self.0.kind {
            Kind::Primitive(p) => p.decode(buf),
            Kind::Compact(p) => compact::decode(*p, buf),
            Kind::Str => string::decode(buf),
            Kind::Never => Err(buf.error(DecodeReason::Never)),
            Kind::Constant(c) => Ok(c.clone()),
            Kind::Object(fields) => object::decode(fields, buf),
            Kind::Tuple(items) => tuple::decode(items, buf),
            Kind::Union(u) => u.decode(buf),
            Kind::TaggedUnion(t) => t.decode(buf),
            Kind::StringUnion(s) => s.decode(buf),
            Kind::Array(inner) => array::decode(inner, buf),
            Kind::LenPrefixed(inner) => len_prefixed::decode(inner, buf),
            Kind::Custom(c) => c.decode(buf),
        };
        res.map_err(|e| e.attributed_to(self))
    }

    /// Validates a value without encoding it.
    pub fn assert(&self, value: &Value) -> Result<(), AssertError> {
        let res = match &self.0.kind {
            Kind::Primitive(p) => p.check(value).map_err(|r| AssertError::new(value, r)),
            Kind::Compact(p) => p.check(value).map_err(|r| AssertError::new(value, r)),
            Kind::Str => string::check(value).map_err(|r| AssertError::new(value, r)),
            Kind::Never => Err(AssertError::new(value, ValueReason::Never)),
            Kind::Constant(c) => constant::check(c, value).map_err(|r| AssertError::new(value, r)),
            Kind::Object(fields) => object::assert(fields, value),
            Kind::Tuple(items) => tuple::assert(items, value),
            Kind::Union(u) => u.assert(value),
            Kind::TaggedUnion(t) => t.assert(value),
            Kind::StringUnion(s) => s.assert(value),
            Kind::Array(inner) => array::assert(inner, value),
            Kind::LenPrefixed(inner) => inner.assert(value),
            Kind::Custom(c) => c.assert(value),
        };
        res.map_err(|e| e.attributed_to(self))
    }
}

impl fmt::Debug for AnyCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("AnyCodec").field(&self.0.kind).finish()
    }
}

impl fmt::Display for AnyCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Typed view over an [`AnyCodec`], converting at the boundary.
pub struct Codec<T> {
    inner: AnyCodec,
    _t: PhantomData<fn(T) -> T>,
}

impl<T> Codec<T> {
    /// Gets the underlying type-erased codec.
    pub fn inner(&self) -> &AnyCodec {
        &self.inner
    }

    /// Takes out the underlying type-erased codec.
    pub fn into_inner(self) -> AnyCodec {
        self.inner
    }

    /// See [`AnyCodec::static_size`].
    pub fn static_size(&self) -> usize {
        self.inner.static_size()
    }
}

impl<T: IntoValue + FromValue> Codec<T> {
    /// Encodes a value into a new buffer.
    pub fn encode(&self, value: &T) -> Result<Vec<u8>, EncodeError> {
        encode_to_vec(&self.inner, value)
    }

    /// Decodes a value, failing on leftover bytes or if the decoded value
    /// doesn't convert.
    pub fn decode(&self, bytes: &[u8]) -> Result<T, DecodeError> {
        decode_buf_exact(&self.inner, bytes)
    }

    /// Validates a value without encoding it.
    pub fn assert(&self, value: &T) -> Result<(), AssertError> {
        self.inner.assert(&value.to_value())
    }
}

impl<T> Clone for Codec<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            _t: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Codec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Codec")
            .field("inner", &self.inner)
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
