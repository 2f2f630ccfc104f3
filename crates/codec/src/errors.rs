//! Error taxonomy for strata-scale.
//!
//! Encode, decode and assert failures each record the codec that raised them,
//! the offending value or cursor state, and the path from the outermost value
//! down to where the failure happened.  Configuration errors are raised while
//! building codecs, never while data flows through them.

use std::fmt;

use thiserror::Error;

use crate::types::AnyCodec;
use crate::value::Value;

/// One step from a composite value into one of its members.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PathSegment {
    /// Named object field.
    Field(String),

    /// Tuple or array position.
    Index(usize),

    /// Union member selected by discriminant.
    Variant(u8),
}

/// Location of a sub-value, outermost segment first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// Returns the segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    /// Returns if this is the root path.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    fn prepend(&mut self, seg: PathSegment) {
        self.0.insert(0, seg);
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("value")?;
        for seg in &self.0 {
            match seg {
                PathSegment::Field(name) => write!(f, ".{name}")?,
                PathSegment::Index(i) => write!(f, "[{i}]")?,
                PathSegment::Variant(d) => write!(f, "#{d}")?,
            }
        }
        Ok(())
    }
}

/// Why a value was rejected by encode or assert.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ValueReason {
    /// The value is of the wrong kind for the codec.
    #[error("expected {expected}, found {found}")]
    WrongShape {
        /// What the codec accepts.
        expected: &'static str,
        /// What it was given.
        found: &'static str,
    },

    /// The value doesn't fit the wire representation.
    #[error("value {value} out of range for {target}")]
    OutOfRange {
        /// Rendering of the value.
        value: String,
        /// Target representation.
        target: &'static str,
    },

    /// An object is missing one of the codec's fields.
    #[error("missing field `{0}`")]
    MissingField(String),

    /// A tuple had the wrong number of elements.
    #[error("expected {expected} elements, found {found}")]
    WrongLength {
        /// Number of tuple members.
        expected: usize,
        /// Number of elements supplied.
        found: usize,
    },

    /// The discriminant function didn't select a member.
    #[error("no discriminant for value")]
    NoDiscriminant,

    /// The discriminant function selected a member that isn't registered.
    #[error("no member codec matching discriminant {0}")]
    UnknownDiscriminant(u8),

    /// A tag or string union member that isn't declared.
    #[error("no member named `{0}`")]
    UnknownMember(String),

    /// A constant codec was given some other value.
    #[error("expected constant {0:?}")]
    ConstantMismatch(Value),

    /// A container is longer than the configured limit.
    #[error("container length {len} exceeds limit {max}")]
    OverflowContainer {
        /// Length of the container.
        len: usize,
        /// Configured maximum.
        max: usize,
    },

    /// The never codec accepts nothing.
    #[error("cannot encode or validate $.never")]
    Never,

    /// Raised by a custom codec.
    #[error("{0}")]
    Custom(String),
}

/// Why bytes failed to decode.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum DecodeReason {
    /// If we tried to read past the end of the underlying buffer.
    #[error("would overrun end of input (wanted {wanted}, {remaining} remaining)")]
    OverrunInput {
        /// Bytes the read needed.
        wanted: usize,
        /// Bytes left in the buffer.
        remaining: usize,
    },

    /// If there was extra data in a buffer that we didn't consume reading a
    /// value.
    #[error("extra unnecessary input leftover ({0} bytes)")]
    ExtraInput(usize),

    /// If we read a container length that was longer than allowed.
    #[error("container length {len} exceeds limit {max}")]
    OverflowContainer {
        /// Declared length.
        len: u64,
        /// Configured maximum.
        max: usize,
    },

    /// Discriminant byte with no registered member.
    #[error("no member codec matching discriminant {0}")]
    UnknownDiscriminant(u8),

    /// Decoded integer doesn't fit the target type.
    #[error("out of range for {0}")]
    OutOfRange(&'static str),

    /// String payload wasn't valid UTF-8.
    #[error("invalid utf-8 in string")]
    InvalidUtf8,

    /// The never codec has no wire representation.
    #[error("cannot decode $.never")]
    Never,

    /// Decoded value couldn't be converted into the requested type.
    #[error("unexpected shape: {0}")]
    Shape(ValueReason),

    /// Raised by a custom codec.
    #[error("{0}")]
    Custom(String),
}

fn codec_label(codec: &Option<AnyCodec>) -> &'static str {
    codec.as_ref().map(AnyCodec::name).unwrap_or("<codec>")
}

/// A value couldn't be represented on the wire.
#[derive(Clone, Debug, Error)]
#[error("{}: cannot encode {path}: {reason}", codec_label(.codec))]
pub struct EncodeError {
    codec: Option<AnyCodec>,
    value: Value,
    path: Path,
    reason: ValueReason,
}

impl EncodeError {
    /// Constructs a new error for a rejected value.  The codec is attached
    /// when the error leaves the codec that raised it.
    pub fn new(value: &Value, reason: ValueReason) -> Self {
        Self {
            codec: None,
            value: value.clone(),
            path: Path::default(),
            reason,
        }
    }

    /// Gets the codec that raised the error.
    pub fn codec(&self) -> Option<&AnyCodec> {
        self.codec.as_ref()
    }

    /// Gets the rejected value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Gets the path to the rejected value.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets why the value was rejected.
    pub fn reason(&self) -> &ValueReason {
        &self.reason
    }

    pub(crate) fn attributed_to(mut self, codec: &AnyCodec) -> Self {
        if self.codec.is_none() {
            self.codec = Some(codec.clone());
        }
        self
    }

    pub(crate) fn within(mut self, seg: PathSegment) -> Self {
        self.path.prepend(seg);
        self
    }
}

/// A value failed validation.
#[derive(Clone, Debug, Error)]
#[error("{}: {path}: {reason}", codec_label(.codec))]
pub struct AssertError {
    codec: Option<AnyCodec>,
    value: Value,
    path: Path,
    reason: ValueReason,
}

impl AssertError {
    /// Constructs a new error for an invalid value.
    pub fn new(value: &Value, reason: ValueReason) -> Self {
        Self {
            codec: None,
            value: value.clone(),
            path: Path::default(),
            reason,
        }
    }

    /// Gets the codec that raised the error.
    pub fn codec(&self) -> Option<&AnyCodec> {
        self.codec.as_ref()
    }

    /// Gets the invalid value.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Gets the path to the invalid value.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets why the value is invalid.
    pub fn reason(&self) -> &ValueReason {
        &self.reason
    }

    pub(crate) fn attributed_to(mut self, codec: &AnyCodec) -> Self {
        if self.codec.is_none() {
            self.codec = Some(codec.clone());
        }
        self
    }

    pub(crate) fn within(mut self, seg: PathSegment) -> Self {
        self.path.prepend(seg);
        self
    }
}

/// Bytes couldn't be decoded.
#[derive(Clone, Debug, Error)]
#[error("{}: {reason} at offset {at} of {len} (in {path})", codec_label(.codec))]
pub struct DecodeError {
    codec: Option<AnyCodec>,
    at: usize,
    len: usize,
    path: Path,
    reason: DecodeReason,
}

impl DecodeError {
    /// Constructs a new error for the given cursor state.  Usually built
    /// through [`crate::DecodeBuffer::error`].
    pub fn new(at: usize, len: usize, reason: DecodeReason) -> Self {
        Self {
            codec: None,
            at,
            len,
            path: Path::default(),
            reason,
        }
    }

    /// Gets the codec that raised the error.
    pub fn codec(&self) -> Option<&AnyCodec> {
        self.codec.as_ref()
    }

    /// Gets the cursor offset where decoding failed.
    pub fn offset(&self) -> usize {
        self.at
    }

    /// Gets the length of the input.
    pub fn input_len(&self) -> usize {
        self.len
    }

    /// Gets the path of the value being decoded.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets why decoding failed.
    pub fn reason(&self) -> &DecodeReason {
        &self.reason
    }

    pub(crate) fn attributed_to(mut self, codec: &AnyCodec) -> Self {
        if self.codec.is_none() {
            self.codec = Some(codec.clone());
        }
        self
    }

    pub(crate) fn within(mut self, seg: PathSegment) -> Self {
        self.path.prepend(seg);
        self
    }

    /// Translates an error from a sub-span decoder into the enclosing
    /// buffer's coordinates.
    pub(crate) fn rebased(mut self, base: usize, len: usize) -> Self {
        self.at += base;
        self.len = len;
        self
    }
}

/// A codec composition with no valid representation.
#[derive(Clone, Debug, Error)]
pub enum ConfigError {
    /// Compact derivation of an object or tuple with several fields.
    #[error("cannot derive compact codec for {} with {fields} fields", .codec.name())]
    MultiFieldCompact {
        /// The object or tuple codec.
        codec: AnyCodec,
        /// Its field count.
        fields: usize,
    },

    /// A visitor has no rule and no fallback for the codec.
    #[error("no derivation rule for {}", .codec.name())]
    NoRule {
        /// The unrecognised codec.
        codec: AnyCodec,
    },

    /// Two object fields share a name.
    #[error("duplicate field `{0}`")]
    DuplicateField(String),

    /// Two union members share a discriminant.
    #[error("duplicate discriminant {0}")]
    DuplicateDiscriminant(u8),

    /// Two union members share a tag or name.
    #[error("duplicate member `{0}`")]
    DuplicateMember(String),

    /// More members than a discriminant byte can address.
    #[error("too many union members ({0}, at most 256)")]
    TooManyMembers(usize),
}

/// Any error from strata-scale.
#[derive(Clone, Debug, Error)]
pub enum CodecError {
    /// Encoding failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// Decoding failed.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Validation failed.
    #[error(transparent)]
    Assert(#[from] AssertError),

    /// Building a codec failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_display() {
        let mut path = Path::default();
        assert!(path.is_root());
        path.prepend(PathSegment::Index(2));
        path.prepend(PathSegment::Variant(1));
        path.prepend(PathSegment::Field("inner".to_owned()));
        assert_eq!(path.to_string(), "value.inner#1[2]");
    }

    #[test]
    fn test_within_prepends() {
        let err = EncodeError::new(&Value::U8(1), ValueReason::Never)
            .within(PathSegment::Field("b".to_owned()))
            .within(PathSegment::Field("a".to_owned()));
        assert_eq!(err.path().to_string(), "value.a.b");
        assert!(err.codec().is_none());
    }
}
