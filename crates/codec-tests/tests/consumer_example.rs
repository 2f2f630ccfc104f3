//! Example of how consumers would plug their own codec in and use the
//! generate_codec_tests! macro on it.

#![expect(unused_crate_dependencies, reason = "macro hacks")]

use strata_scale_tests::{
    generate_codec_tests,
    proptest::prelude::*,
    strata_scale::{
        AnyCodec, AssertError, CodecId, CodecVisitor, CustomCodec, DecodeBuffer, DecodeError,
        DecodeReason, EncodeBuffer, EncodeError, Object, Value, ValueReason, compact, field,
        object, u64,
    },
};

/// Consumer-defined codec: a 32 byte digest, handled as lowercase hex.
#[derive(Debug)]
pub struct HexDigest;

impl HexDigest {
    fn parse(value: &Value) -> Result<[u8; 32], ValueReason> {
        let s = value.as_str().ok_or_else(|| {
            ValueReason::Custom(format!("expected hex str, found {}", value.type_name()))
        })?;
        if s.len() != 64 {
            let msg = format!("expected 64 hex chars, found {}", s.len());
            return Err(ValueReason::Custom(msg));
        }

        let mut out = [0; 32];
        for (b, pair) in out.iter_mut().zip(s.as_bytes().chunks_exact(2)) {
            *b = (nibble(pair[0])? << 4) | nibble(pair[1])?;
        }
        Ok(out)
    }
}

fn nibble(c: u8) -> Result<u8, ValueReason> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        _ => Err(ValueReason::Custom(format!("invalid hex byte {c:#04x}"))),
    }
}

impl CustomCodec for HexDigest {
    fn name(&self) -> &'static str {
        "consumer.hexDigest"
    }

    fn static_size(&self) -> usize {
        32
    }

    fn encode(&self, buf: &mut EncodeBuffer, value: &Value) -> Result<(), EncodeError> {
        let bytes = Self::parse(value).map_err(|r| EncodeError::new(value, r))?;
        buf.insert_array(&bytes);
        Ok(())
    }

    fn decode(&self, buf: &mut DecodeBuffer<'_>) -> Result<Value, DecodeError> {
        let bytes = buf.read_arr::<32>()?;
        if bytes == [0; 32] {
            return Err(buf.error(DecodeReason::Custom("null digest".to_owned())));
        }
        let s: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Ok(Value::Str(s))
    }

    fn assert(&self, value: &Value) -> Result<(), AssertError> {
        Self::parse(value)
            .map(|_| ())
            .map_err(|r| AssertError::new(value, r))
    }
}

fn digest() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}".prop_filter("null digest", |s| s.bytes().any(|b| b != b'0'))
}

fn block_ref_codec() -> AnyCodec {
    object([field("height", u64()), field("hash", AnyCodec::custom(HexDigest))]).unwrap()
}

fn block_ref() -> impl Strategy<Value = Value> {
    (any::<u64>(), digest()).prop_map(|(height, hash)| {
        Value::from(Object::new().with("height", height).with("hash", hash))
    })
}

// Consumer uses the macro to generate property tests
generate_codec_tests!("hex_digest", AnyCodec::custom(HexDigest), digest());
generate_codec_tests!("block_ref", block_ref_codec(), block_ref());

#[test]
fn test_custom_errors_are_attributed() {
    let v = Value::from(Object::new().with("height", 1u64).with("hash", "abcd"));
    let err = block_ref_codec().encode(&v).unwrap_err();
    assert_eq!(err.path().to_string(), "value.hash");
    assert_eq!(err.codec().map(AnyCodec::name), Some("consumer.hexDigest"));

    let mut bytes = vec![0; 8];
    bytes.extend([0; 32]);
    let err = block_ref_codec().decode(&bytes).unwrap_err();
    assert_eq!(err.reason(), &DecodeReason::Custom("null digest".to_owned()));
    assert_eq!(err.offset(), 40);
}

#[test]
fn test_custom_codec_in_derivation() {
    // Unknown to the stock deriver, so it's left alone.
    let single = object([field("hash", AnyCodec::custom(HexDigest))]).unwrap();
    assert!(compact(&single).is_ok());

    // A consumer rule can teach the deriver about it.
    let visitor = CodecVisitor::compact()
        .with_rule(CodecId::Custom("consumer.hexDigest"), |_, _| compact(&u64()));
    let derived = visitor.visit(&single).unwrap();
    let v = Value::from(Object::new().with("hash", 1u64));
    assert_eq!(derived.encode(&v).unwrap(), vec![1 << 2]);
}

#[test]
fn test_non_hex_digest_rejected() {
    let digest = AnyCodec::custom(HexDigest);

    // 64 bytes, but multi-byte chars straddle the hex pairs.
    let wide = format!("a{}", "é".repeat(31)) + "b";
    assert_eq!(wide.len(), 64);
    for bad in [wide, "G".repeat(64), "AB".repeat(32)] {
        let err = digest.encode(&Value::from(bad.as_str())).unwrap_err();
        assert!(matches!(err.reason(), ValueReason::Custom(_)));
        assert!(digest.assert(&Value::from(bad)).is_err());
    }
}
