//! Property testing macros and utilities for strata-scale.
//!
//! The main export is the `generate_codec_tests!` macro, which generates
//! property tests for a codec given a strategy producing values it accepts.

// Re-export dependencies for macro usage
pub use paste;
pub use proptest;
pub use strata_scale;

/// Generates property tests for a codec using proptest.
///
/// This macro creates property-based tests to verify that:
/// 1. Every generated value passes the codec's `assert`
/// 2. Encoding then decoding produces the original value (round-trip property)
/// 3. The encoding is deterministic (same input always produces same output)
/// 4. Different inputs produce different encodings
///
/// # Requirements
///
/// - The codec expression must evaluate to a `strata_scale::AnyCodec`.  It's
///   evaluated once per test case, so keep it cheap.
/// - The strategy must produce values implementing `strata_scale::IntoValue`
///   that the codec accepts.  Avoid NaN floats, which never compare equal.
///
/// # Example
/// ```rust,no_run
/// use strata_scale_tests::generate_codec_tests;
/// use strata_scale_tests::strata_scale::{field, object, u32, str, Object, Value};
/// use proptest::prelude::*;
///
/// fn entry_strategy() -> impl Strategy<Value = Value> {
///     (any::<u32>(), ".*").prop_map(|(id, name): (u32, String)| {
///         Value::from(Object::new().with("id", id).with("name", name))
///     })
/// }
///
/// generate_codec_tests!(
///     "entry",
///     object([field("id", u32()), field("name", str())]).unwrap(),
///     entry_strategy()
/// );
/// # fn main() {}
/// ```
#[macro_export]
macro_rules! generate_codec_tests {
    ($name:expr, $codec:expr, $strategy:expr) => {
        $crate::paste::paste! {
            mod [<proptest_ $name _codec>] {
                use super::*;
                use $crate::proptest::prelude::{prop_assert, prop_assert_eq, prop_assert_ne, prop_assume};
                use $crate::strata_scale::{AnyCodec, IntoValue};

                fn codec() -> AnyCodec {
                    $codec
                }

                $crate::proptest::proptest! {
                    #[test]
                    fn [<test_codec_accepts>](value in $strategy) {
                        let value = IntoValue::to_value(&value);
                        prop_assert!(codec().assert(&value).is_ok(), "test: assert rejected {:?}", value);
                    }

                    #[test]
                    fn [<test_codec_roundtrip>](value in $strategy) {
                        let value = IntoValue::to_value(&value);
                        let encoded = codec().encode(&value).expect("test: encoding should succeed");
                        let decoded = codec().decode(&encoded).expect("test: decoding should succeed");
                        prop_assert_eq!(value, decoded);
                    }

                    #[test]
                    fn [<test_codec_deterministic>](value in $strategy) {
                        let value = IntoValue::to_value(&value);
                        let encoded1 = codec().encode(&value).expect("encoding should succeed");
                        let encoded2 = codec().encode(&value).expect("encoding should succeed");
                        prop_assert_eq!(encoded1, encoded2, "test: unexpected inequality");
                    }

                    #[test]
                    fn [<test_codec_different_inputs>](
                        value1 in $strategy,
                        value2 in $strategy
                    ) {
                        let value1 = IntoValue::to_value(&value1);
                        let value2 = IntoValue::to_value(&value2);
                        prop_assume!(value1 != value2);
                        let encoded1 = codec().encode(&value1).expect("test: encoding should succeed");
                        let encoded2 = codec().encode(&value2).expect("test: encoding should succeed");
                        prop_assert_ne!(encoded1, encoded2, "test: unexpected equality");
                    }
                }
            }
        }
    };
}
