//! Discriminated unions.
//!
//! Every union writes one discriminant byte.  Plain unions follow it with the
//! selected member's encoding, tagged unions with an object whose tag field is
//! recovered from the discriminant, string unions with nothing at all.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use crate::buf_decoder::DecodeBuffer;
use crate::buf_encoder::EncodeBuffer;
use crate::constant::constant;
use crate::errors::{
    AssertError, ConfigError, DecodeError, DecodeReason, EncodeError, PathSegment, ValueReason,
};
use crate::object::{Field, field, object};
use crate::types::{AnyCodec, Kind};
use crate::value::Value;

/// Maps a value to the discriminant of the member that encodes it.
pub type Discriminate = Arc<dyn Fn(&Value) -> Option<u8> + Send + Sync>;

/// Discriminant table plus the function that picks from it.
#[derive(Clone)]
pub struct Union {
    discriminate: Discriminate,
    members: BTreeMap<u8, AnyCodec>,
}

impl Union {
    fn new(
        discriminate: Discriminate,
        members: impl IntoIterator<Item = (u8, AnyCodec)>,
    ) -> Result<Self, ConfigError> {
        let mut table = BTreeMap::new();
        for (d, codec) in members {
            if table.insert(d, codec).is_some() {
                return Err(ConfigError::DuplicateDiscriminant(d));
            }
        }
        Ok(Self {
            discriminate,
            members: table,
        })
    }

    /// Gets the member registered for a discriminant.
    pub fn member(&self, discriminant: u8) -> Option<&AnyCodec> {
        self.members.get(&discriminant)
    }

    /// Iterates over the discriminant table in discriminant order.
    pub fn members(&self) -> impl Iterator<Item = (u8, &AnyCodec)> {
        self.members.iter().map(|(d, c)| (*d, c))
    }

    pub(crate) fn static_size(&self) -> usize {
        1 + self
            .members
            .values()
            .map(AnyCodec::static_size)
            .max()
            .unwrap_or(0)
    }

    fn select(&self, value: &Value) -> Result<(u8, &AnyCodec), ValueReason> {
        let d = (self.discriminate)(value).ok_or(ValueReason::NoDiscriminant)?;
        let member = self
            .members
            .get(&d)
            .ok_or(ValueReason::UnknownDiscriminant(d))?;
        Ok((d, member))
    }

    pub(crate) fn encode(&self, buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError> {
        let (d, member) = self.select(value).map_err(|r| EncodeError::new(value, r))?;
        buf.write_u8(d);
        member
            .encode_into(buf, value)
            .map_err(|e| e.within(PathSegment::Variant(d)))
    }

    pub(crate) fn decode(&self, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
        let d = buf.peek_u8()?;
        let Some(member) = self.members.get(&d) else {
            return Err(buf.error(DecodeReason::UnknownDiscriminant(d)));
        };
        buf.read_u8()?;
        member
            .decode_from(buf)
            .map_err(|e| e.within(PathSegment::Variant(d)))
    }

    pub(crate) fn assert(&self, value: &Value) -> Result<(), AssertError> {
        let (d, member) = self.select(value).map_err(|r| AssertError::new(value, r))?;
        member
            .assert(value)
            .map_err(|e| e.within(PathSegment::Variant(d)))
    }
}

impl fmt::Debug for Union {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Union")
            .field("members", &self.members)
            .finish_non_exhaustive()
    }
}

/// Union codec.  `discriminate` picks the member for a value; decoding picks
/// it from the discriminant byte.
pub fn union<F>(
    discriminate: F,
    members: impl IntoIterator<Item = (u8, AnyCodec)>,
) -> Result<AnyCodec, ConfigError>
where
    F: Fn(&Value) -> Option<u8> + Send + Sync + 'static,
{
    let u = Union::new(Arc::new(discriminate), members)?;
    Ok(AnyCodec::from_kind(Kind::Union(u)))
}

/// A tagged union member: its tag plus the fields that go with it.
#[derive(Clone, Debug)]
pub struct Variant {
    tag: String,
    fields: Vec<Field>,
}

impl Variant {
    /// Constructs a member with no fields.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fields: Vec::new(),
        }
    }

    /// Builder-style field append.
    pub fn field(mut self, name: impl Into<String>, codec: AnyCodec) -> Self {
        self.fields.push(field(name, codec));
        self
    }

    /// Gets the tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Gets the fields, excluding the tag.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }
}

/// Union of objects, keyed by a string tag field.
#[derive(Clone, Debug)]
pub struct TaggedUnion {
    tag_key: String,
    variants: Vec<Variant>,
    tags: HashMap<String, u8>,
    inner: Union,
}

impl TaggedUnion {
    /// Gets the name of the tag field.
    pub fn tag_key(&self) -> &str {
        &self.tag_key
    }

    /// Gets the members, in discriminant order.
    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub(crate) fn static_size(&self) -> usize {
        self.inner.static_size()
    }

    fn tag_of<'v>(&self, value: &'v Value) -> Result<&'v str, ValueReason> {
        let obj = value.as_object().ok_or_else(|| value.wrong_shape("object"))?;
        let tag = obj
            .get(&self.tag_key)
            .ok_or_else(|| ValueReason::MissingField(self.tag_key.clone()))?;
        let tag = tag.as_str().ok_or_else(|| tag.wrong_shape("str"))?;
        if !self.tags.contains_key(tag) {
            return Err(ValueReason::UnknownMember(tag.to_owned()));
        }
        Ok(tag)
    }

    pub(crate) fn encode(&self, buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError> {
        self.tag_of(value).map_err(|r| EncodeError::new(value, r))?;
        self.inner.encode(buf, value)
    }

    pub(crate) fn decode(&self, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
        self.inner.decode(buf)
    }

    pub(crate) fn assert(&self, value: &Value) -> Result<(), AssertError> {
        self.tag_of(value).map_err(|r| AssertError::new(value, r))?;
        self.inner.assert(value)
    }
}

/// Tagged union codec.  Each member becomes an object holding the tag under
/// `tag_key` followed by its own fields; its discriminant is its position.
pub fn tagged_union(
    tag_key: impl Into<String>,
    variants: impl IntoIterator<Item = Variant>,
) -> Result<AnyCodec, ConfigError> {
    let tag_key = tag_key.into();
    let variants: Vec<Variant> = variants.into_iter().collect();
    if variants.len() > 256 {
        return Err(ConfigError::TooManyMembers(variants.len()));
    }

    let mut tags = HashMap::new();
    let mut members = Vec::with_capacity(variants.len());
    for (i, v) in variants.iter().enumerate() {
        let d = i as u8;
        if tags.insert(v.tag.clone(), d).is_some() {
            return Err(ConfigError::DuplicateMember(v.tag.clone()));
        }
        let tag_field = field(tag_key.clone(), constant(v.tag.as_str()));
        let member = object(std::iter::once(tag_field).chain(v.fields.iter().cloned()))?;
        members.push((d, member));
    }

    let key = tag_key.clone();
    let lookup = tags.clone();
    let discriminate = move |value: &Value| {
        let tag = value.as_object()?.get(&key)?.as_str()?;
        lookup.get(tag).copied()
    };
    let inner = Union::new(Arc::new(discriminate), members)?;

    Ok(AnyCodec::from_kind(Kind::TaggedUnion(TaggedUnion {
        tag_key,
        variants,
        tags,
        inner,
    })))
}

/// Enumeration of strings, each written as a single discriminant byte.
#[derive(Clone, Debug)]
pub struct StringUnion {
    by_discriminant: BTreeMap<u8, String>,
    by_name: HashMap<String, u8>,
}

impl StringUnion {
    /// Iterates over the members in discriminant order.
    pub fn members(&self) -> impl Iterator<Item = (u8, &str)> {
        self.by_discriminant.iter().map(|(d, s)| (*d, s.as_str()))
    }

    fn discriminant(&self, value: &Value) -> Result<u8, ValueReason> {
        let s = value.as_str().ok_or_else(|| value.wrong_shape("str"))?;
        self.by_name
            .get(s)
            .copied()
            .ok_or_else(|| ValueReason::UnknownMember(s.to_owned()))
    }

    pub(crate) fn encode(&self, buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError> {
        let d = self
            .discriminant(value)
            .map_err(|r| EncodeError::new(value, r))?;
        buf.write_u8(d);
        Ok(())
    }

    pub(crate) fn decode(&self, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
        let d = buf.peek_u8()?;
        let Some(s) = self.by_discriminant.get(&d) else {
            return Err(buf.error(DecodeReason::UnknownDiscriminant(d)));
        };
        buf.read_u8()?;
        Ok(Value::Str(s.clone()))
    }

    pub(crate) fn assert(&self, value: &Value) -> Result<(), AssertError> {
        self.discriminant(value)
            .map(|_| ())
            .map_err(|r| AssertError::new(value, r))
    }
}

/// String union codec over a discriminant table.
pub fn string_union<S: Into<String>>(
    members: impl IntoIterator<Item = (u8, S)>,
) -> Result<AnyCodec, ConfigError> {
    let mut by_discriminant = BTreeMap::new();
    let mut by_name = HashMap::new();
    for (d, s) in members {
        let s = s.into();
        if by_name.insert(s.clone(), d).is_some() {
            return Err(ConfigError::DuplicateMember(s));
        }
        if by_discriminant.insert(d, s).is_some() {
            return Err(ConfigError::DuplicateDiscriminant(d));
        }
    }
    Ok(AnyCodec::from_kind(Kind::StringUnion(StringUnion {
        by_discriminant,
        by_name,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::{u8, u32};
    use crate::string::str;
    use crate::value::Object;

    fn int_or_str() -> AnyCodec {
        union(
            |v: &Value| match v {
                Value::U8(_) => Some(0),
                Value::Str(_) => Some(3),
                _ => None,
            },
            [(0, u8()), (3, str())],
        )
        .unwrap()
    }

    #[test]
    fn test_union_wire_format() {
        let u = int_or_str();
        assert_eq!(u.encode(&Value::U8(9)).unwrap(), vec![0, 9]);
        assert_eq!(u.encode(&Value::from("a")).unwrap(), vec![3, 1 << 2, b'a']);
        assert_eq!(u.decode(&[3, 1 << 2, b'a']).unwrap(), Value::from("a"));
        assert_eq!(u.static_size(), 1 + 5);
    }

    #[test]
    fn test_union_unknown_discriminant() {
        let err = int_or_str().decode(&[1, 0]).unwrap_err();
        assert_eq!(err.reason(), &DecodeReason::UnknownDiscriminant(1));
        assert_eq!(err.offset(), 0);
        assert_eq!(err.codec().map(AnyCodec::name), Some("$.union"));
        assert!(err.to_string().contains("discriminant 1"));
    }

    #[test]
    fn test_union_no_discriminant() {
        let err = int_or_str().encode(&Value::U32(1)).unwrap_err();
        assert_eq!(err.reason(), &ValueReason::NoDiscriminant);
        assert!(int_or_str().assert(&Value::Unit).is_err());
    }

    #[test]
    fn test_union_member_error_path() {
        let bad = union(|_: &Value| Some(2), [(2, u32())]).unwrap();
        let err = bad.encode(&Value::U8(1)).unwrap_err();
        assert_eq!(err.path().to_string(), "value#2");
        assert_eq!(err.codec().map(AnyCodec::name), Some("$.u32"));
    }

    #[test]
    fn test_union_duplicate_discriminant() {
        let err = union(|_: &Value| None, [(1, u8()), (1, str())]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateDiscriminant(1)));
    }

    fn shapes() -> AnyCodec {
        tagged_union(
            "type",
            [
                Variant::new("circle").field("r", u8()),
                Variant::new("rect").field("w", u8()).field("h", u8()),
                Variant::new("empty"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_tagged_union_roundtrip() {
        let rect = Value::from(
            Object::new()
                .with("type", "rect")
                .with("w", 2u8)
                .with("h", 3u8),
        );
        let enc = shapes().encode(&rect).unwrap();
        assert_eq!(enc, vec![1, 2, 3]);

        let decoded = shapes().decode(&enc).unwrap();
        let obj = decoded.as_object().unwrap();
        assert_eq!(obj.get("type"), Some(&Value::from("rect")));
        assert_eq!(decoded, rect);

        let empty = Value::from(Object::new().with("type", "empty"));
        assert_eq!(shapes().encode(&empty).unwrap(), vec![2]);
        assert_eq!(shapes().decode(&[2]).unwrap(), empty);
    }

    #[test]
    fn test_tagged_union_bad_tags() {
        let unknown = Value::from(Object::new().with("type", "hexagon"));
        let err = shapes().encode(&unknown).unwrap_err();
        assert_eq!(err.reason(), &ValueReason::UnknownMember("hexagon".to_owned()));

        let missing = Value::from(Object::new().with("r", 1u8));
        let err = shapes().assert(&missing).unwrap_err();
        assert_eq!(err.reason(), &ValueReason::MissingField("type".to_owned()));

        let err = shapes().decode(&[7]).unwrap_err();
        assert_eq!(err.reason(), &DecodeReason::UnknownDiscriminant(7));
        assert_eq!(err.codec().map(AnyCodec::name), Some("$.taggedUnion"));
    }

    #[test]
    fn test_tagged_union_config_errors() {
        let err = tagged_union("t", [Variant::new("a"), Variant::new("a")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateMember(ref t) if t == "a"));

        let err = tagged_union("t", [Variant::new("a").field("t", u8())]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateField(ref f) if f == "t"));

        let too_many = (0..257).map(|i| Variant::new(i.to_string()));
        let err = tagged_union("t", too_many).unwrap_err();
        assert!(matches!(err, ConfigError::TooManyMembers(257)));
    }

    #[test]
    fn test_string_union() {
        let colors = string_union([(0, "red"), (1, "green"), (5, "blue")]).unwrap();
        assert_eq!(colors.static_size(), 1);
        assert_eq!(colors.encode(&Value::from("blue")).unwrap(), vec![5]);
        assert_eq!(colors.decode(&[1]).unwrap(), Value::from("green"));

        let err = colors.decode(&[2]).unwrap_err();
        assert_eq!(err.reason(), &DecodeReason::UnknownDiscriminant(2));

        let err = colors.encode(&Value::from("mauve")).unwrap_err();
        assert_eq!(err.reason(), &ValueReason::UnknownMember("mauve".to_owned()));
    }

    #[test]
    fn test_string_union_duplicates() {
        let err = string_union([(0, "a"), (1, "a")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateMember(_)));
        let err = string_union([(0, "a"), (0, "b")]).unwrap_err();
        assert!(matches!(err, ConfigError::DuplicateDiscriminant(0)));
    }
}
