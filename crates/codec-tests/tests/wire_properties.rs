//! End-to-end checks of the wire format's guarantees.

#![expect(unused_crate_dependencies, reason = "macro hacks")]

use strata_scale_tests::{
    proptest::prelude::*,
    strata_scale::{
        CodecConfig, CodecError, CompactMode, ConfigError, DecodeReason, Object, U256, Value,
        ValueReason, Variant, compact, field, never, object, str, tagged_union, tuple, u8, u32,
        u256, union,
    },
};

fn compact_len(v: U256) -> usize {
    compact(&u256())
        .unwrap()
        .encode(&Value::U256(v))
        .unwrap()
        .len()
}

#[test]
fn test_compact_boundaries() {
    for (v, len) in [
        (63u64, 1),
        (64, 2),
        (16383, 2),
        (16384, 4),
        (0x3fff_ffff, 4),
        (0x4000_0000, 5),
        (u32::MAX as u64, 5),
        (1 << 32, 6),
        (u64::MAX, 9),
    ] {
        assert_eq!(compact_len(U256::from(v)), len, "value {v:#x}");
    }

    let c = compact(&u32()).unwrap();
    let enc = c.encode(&Value::U32(0x4000_0000)).unwrap();
    assert_eq!(enc, vec![0b11, 0, 0, 0, 0x40]);
    assert_eq!(compact_len(U256::MAX), 1 + 4 + 28);
}

#[test]
fn test_union_unknown_discriminant_is_decode_error() {
    let u = union(|_: &Value| Some(0), [(0, u8())]).unwrap();
    let err: CodecError = u.decode(&[4, 0]).unwrap_err().into();
    match err {
        CodecError::Decode(e) => {
            assert_eq!(e.reason(), &DecodeReason::UnknownDiscriminant(4));
            assert!(e.to_string().contains('4'));
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn test_tagged_union_idempotence() {
    let codec = tagged_union(
        "type",
        [
            Variant::new("a").field("x", u32()).field("y", str()),
            Variant::new("b").field("z", u8()),
        ],
    )
    .unwrap();

    let a = Object::new()
        .with("type", "a")
        .with("x", 7u32)
        .with("y", "seven");
    let decoded = codec.decode(&codec.encode(&Value::from(a.clone())).unwrap()).unwrap();
    let obj = decoded.as_object().unwrap();
    assert_eq!(obj.get("type"), Some(&Value::from("a")));
    assert_eq!(obj.get("x"), a.get("x"));
    assert_eq!(obj.get("y"), a.get("y"));
}

#[test]
fn test_multi_field_compact_fails_at_build() {
    let codec = object([field("a", u32()), field("b", u32())]).unwrap();
    let err: CodecError = compact(&codec).unwrap_err().into();
    assert!(matches!(
        err,
        CodecError::Config(ConfigError::MultiFieldCompact { fields: 2, .. })
    ));
    assert!(compact(&tuple([u8(), u8()])).is_err());
}

#[test]
fn test_string_bounds() {
    // Declares 10 bytes but only has 3.
    let err = str().decode(&[10 << 2, b'a', b'b', b'c']).unwrap_err();
    assert_eq!(
        err.reason(),
        &DecodeReason::OverrunInput {
            wanted: 10,
            remaining: 3,
        }
    );
}

#[test]
fn test_trailing_bytes() {
    let err = u8().decode(&[1, 2]).unwrap_err();
    assert_eq!(err.reason(), &DecodeReason::ExtraInput(1));

    let lenient = CodecConfig::new().with_reject_trailing(false);
    assert_eq!(u8().decode_with(&[1, 2], &lenient).unwrap(), Value::U8(1));
}

proptest! {
    #[test]
    fn test_never_rejects_all_bytes(bytes in prop::collection::vec(any::<u8>(), 0..16)) {
        prop_assert!(never().decode(&bytes).is_err());
    }

    #[test]
    fn test_never_rejects_all_values(v in any::<u32>(), s in ".*") {
        for value in [Value::U32(v), Value::from(s), Value::Unit] {
            let err = never().encode(&value).unwrap_err();
            prop_assert_eq!(err.reason(), &ValueReason::Never);
            prop_assert!(never().assert(&value).is_err());
        }
    }

    #[test]
    fn test_compact_mode_matches_length(bytes in any::<[u8; 32]>()) {
        let v = U256::from_little_endian(&bytes);
        let expected = match CompactMode::of(v) {
            CompactMode::Single => 1,
            CompactMode::Two => 2,
            CompactMode::Four => 4,
            CompactMode::Big(n) => 5 + n as usize,
        };
        prop_assert_eq!(compact_len(v), expected);
        prop_assert_eq!(CompactMode::of(v).byte_len(), expected);
    }
}
