//! Composable binary codec framework for a SCALE-style wire format.
//!
//! Codecs are immutable values built out of smaller codecs (objects, tuples,
//! unions, arrays) and shared freely between threads.  Every codec encodes
//! and decodes a dynamic [`Value`]; [`Codec`] layers a static type over that
//! for types implementing [`IntoValue`] and [`FromValue`].
//!
//! Integers can be written fixed-width or in the variable-length compact
//! form.  [`compact`] derives the compact counterpart of a whole codec tree,
//! and [`CodecVisitor`] generalizes that to arbitrary rewrites.

mod array;
pub use array::array;

mod buf_decoder;
pub use buf_decoder::DecodeBuffer;

mod buf_encoder;
pub use buf_encoder::{EncodeBuffer, Reservation};

mod compact;
pub use compact::{CompactMode, MAX_U6, MAX_U14, MAX_U30};

mod config;
pub use config::{CodecConfig, DEFAULT_MAX_CONTAINER_LEN};

mod constant;
pub use constant::{constant, never};

mod errors;
pub use errors::{
    AssertError, CodecError, ConfigError, DecodeError, DecodeReason, EncodeError, Path,
    PathSegment, ValueReason,
};

mod len_prefixed;
pub use len_prefixed::len_prefixed;

mod macros;

mod object;
pub use object::{Field, field, object};

mod primitive;
pub use primitive::{Primitive, f64, u8, u16, u32, u64, u128, u256};

mod string;
pub use string::str;

mod tuple;
pub use tuple::tuple;

mod types;
pub use types::{AnyCodec, Codec, CodecId, CustomCodec, Kind};

mod union;
pub use union::{
    Discriminate, StringUnion, TaggedUnion, Union, Variant, string_union, tagged_union, union,
};

mod util;
pub use util::{decode_buf_exact, decode_buf_prefix, encode_to_vec};

mod value;
pub use value::{FromValue, IntoValue, Object, Value, take_field};

mod visitor;
pub use visitor::{CodecVisitor, Rule, compact};

pub use primitive_types::U256;
