use core::fmt;

use crate::types::{Numeric, TypeTag};

/// A numeric value whose type is only known at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int8(i8),
    Int16(i16),
    Int32(i32),
    Int64(i64),
    UInt8(u8),
    UInt16(u16),
    UInt32(u32),
    UInt64(u64),
    Float32(f32),
    Float64(f64),
}

/// Expands `$body` once with `$T` bound to the Rust type behind `$tag`.
///
/// `Void` takes the `$void` branch.
#[macro_export]
#[doc(hidden)]
macro_rules! with_numeric_type {
    ($tag:expr, $T:ident => $body:expr, void => $void:expr) => {
        match $tag {
            $crate::types::TypeTag::Int8 => { type $T = i8; $body }
            $crate::types::TypeTag::Int16 => { type $T = i16; $body }
            $crate::types::TypeTag::Int32 => { type $T = i32; $body }
            $crate::types::TypeTag::Int64 => { type $T = i64; $body }
            $crate::types::TypeTag::UInt8 => { type $T = u8; $body }
            $crate::types::TypeTag::UInt16 => { type $T = u16; $body }
            $crate::types::TypeTag::UInt32 => { type $T = u32; $body }
            $crate::types::TypeTag::UInt64 => { type $T = u64; $body }
            $crate::types::TypeTag::Float32 => { type $T = f32; $body }
            $crate::types::TypeTag::Float64 => { type $T = f64; $body }
            $crate::types::TypeTag::Void => $void,
        }
    };
}

impl Value {
    pub fn type_tag(&self) -> TypeTag {
        match self {
            Value::Int8(_) => TypeTag::Int8,
            Value::Int16(_) => TypeTag::Int16,
            Value::Int32(_) => TypeTag::Int32,
            Value::Int64(_) => TypeTag::Int64,
            Value::UInt8(_) => TypeTag::UInt8,
            Value::UInt16(_) => TypeTag::UInt16,
            Value::UInt32(_) => TypeTag::UInt32,
            Value::UInt64(_) => TypeTag::UInt64,
            Value::Float32(_) => TypeTag::Float32,
            Value::Float64(_) => TypeTag::Float64,
        }
    }

    /// Parses `text` as a literal of type `tag`.
    ///
    /// Returns `None` for `Void`, malformed text, or a value outside the
    /// range of the type.
    pub fn parse(tag: TypeTag, text: &str) -> Option<Value> {
        with_numeric_type!(tag, T => T::parse_literal(text).map(Numeric::into_value), void => None)
    }

    /// Decodes the first `tag.word_size()` words worth of `bytes`.
    pub fn from_bytes(tag: TypeTag, bytes: [u8; 8]) -> Option<Value> {
        with_numeric_type!(tag, T => Some(T::from_bytes(bytes).into_value()), void => None)
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        match *self {
            Value::Int8(v) => v.to_bytes(),
            Value::Int16(v) => v.to_bytes(),
            Value::Int32(v) => v.to_bytes(),
            Value::Int64(v) => v.to_bytes(),
            Value::UInt8(v) => v.to_bytes(),
            Value::UInt16(v) => v.to_bytes(),
            Value::UInt32(v) => v.to_bytes(),
            Value::UInt64(v) => v.to_bytes(),
            Value::Float32(v) => v.to_bytes(),
            Value::Float64(v) => v.to_bytes(),
        }
    }

    /// Lossy view as `f64`, convenient for assertions and printing.
    pub fn as_f64(&self) -> f64 {
        match *self {
            Value::Int8(v) => v as f64,
            Value::Int16(v) => v as f64,
            Value::Int32(v) => v as f64,
            Value::Int64(v) => v as f64,
            Value::UInt8(v) => v as f64,
            Value::UInt16(v) => v as f64,
            Value::UInt32(v) => v as f64,
            Value::UInt64(v) => v as f64,
            Value::Float32(v) => v as f64,
            Value::Float64(v) => v,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int8(v) => write!(f, "{}", v),
            Value::Int16(v) => write!(f, "{}", v),
            Value::Int32(v) => write!(f, "{}", v),
            Value::Int64(v) => write!(f, "{}", v),
            Value::UInt8(v) => write!(f, "{}", v),
            Value::UInt16(v) => write!(f, "{}", v),
            Value::UInt32(v) => write!(f, "{}", v),
            Value::UInt64(v) => write!(f, "{}", v),
            Value::Float32(v) => write!(f, "{}", v),
            Value::Float64(v) => write!(f, "{}", v),
        }
    }
}
