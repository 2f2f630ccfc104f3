//! Simple macros for plumbing Rust types through [`crate::Value`].

/// Generates a struct with `IntoValue`/`FromValue` impls, mapping each field
/// to the object field of the same name.
// TODO also generate the matching object codec, needs a codec expr per field
#[macro_export]
macro_rules! impl_value_struct {
    {
        $( #[ $sattr:meta ] )*
        $v:vis struct $name:ident {
            $(
                $( #[ $fattr:meta ] )*
                $fname:ident : $fty:ty,
            )*
        }
    } => {
        $( #[ $sattr ] )*
        $v struct $name {
            $(
                $( #[ $fattr ] )*
                $fname : $fty,
            )*
        }

        impl $name {
            $v fn new($( $fname : $fty ),*) -> Self {
                Self { $( $fname ),* }
            }

            $(
                $v fn $fname(&self) -> &$fty {
                    &self.$fname
                }
            )*
        }

        impl $crate::IntoValue for $name {
            fn to_value(&self) -> $crate::Value {
                let obj = $crate::Object::new()
                    $( .with(stringify!($fname), $crate::IntoValue::to_value(&self.$fname)) )*;
                $crate::Value::Object(obj)
            }
        }

        impl $crate::FromValue for $name {
            fn from_value(value: $crate::Value) -> Result<Self, $crate::ValueReason> {
                #[allow(unused_mut)]
                let mut obj = match value {
                    $crate::Value::Object(obj) => obj,
                    other => return Err($crate::ValueReason::WrongShape {
                        expected: "object",
                        found: other.type_name(),
                    }),
                };
                $(
                    let $fname = $crate::take_field::<$fty>(&mut obj, stringify!($fname))?;
                )*
                Ok(Self::new($($fname),*))
            }
        }
    }
}
