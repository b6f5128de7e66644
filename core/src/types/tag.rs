use core::fmt;

use crate::memory::{WORD_BYTES, words_for_bytes};

/// Compile-time descriptor of a numeric type.
///
/// `Void` marks a variable whose type has not been resolved yet; it is never
/// a valid operand type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TypeTag {
    #[default]
    Void,
    Int8,
    Int16,
    Int32,
    Int64,
    UInt8,
    UInt16,
    UInt32,
    UInt64,
    Float32,
    Float64,
}

impl TypeTag {
    /// All numeric tags, in the order used by the operator tables.
    pub const NUMERIC: [TypeTag; 10] = [
        TypeTag::Float64,
        TypeTag::Float32,
        TypeTag::UInt64,
        TypeTag::Int64,
        TypeTag::UInt32,
        TypeTag::Int32,
        TypeTag::UInt16,
        TypeTag::Int16,
        TypeTag::UInt8,
        TypeTag::Int8,
    ];

    /// Resolves a canonical type name (`float64`, `int32`, `uint8`, ...).
    pub fn from_name(name: &str) -> Option<TypeTag> {
        let tag = match name {
            "void" => TypeTag::Void,
            "int8" => TypeTag::Int8,
            "int16" => TypeTag::Int16,
            "int32" => TypeTag::Int32,
            "int64" => TypeTag::Int64,
            "uint8" => TypeTag::UInt8,
            "uint16" => TypeTag::UInt16,
            "uint32" => TypeTag::UInt32,
            "uint64" => TypeTag::UInt64,
            "float32" => TypeTag::Float32,
            "float64" => TypeTag::Float64,
            _ => return None,
        };
        Some(tag)
    }

    /// Canonical name, the inverse of [`TypeTag::from_name`].
    pub fn name(self) -> &'static str {
        match self {
            TypeTag::Void => "void",
            TypeTag::Int8 => "int8",
            TypeTag::Int16 => "int16",
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::UInt8 => "uint8",
            TypeTag::UInt16 => "uint16",
            TypeTag::UInt32 => "uint32",
            TypeTag::UInt64 => "uint64",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
        }
    }

    pub fn is_numeric(self) -> bool {
        self != TypeTag::Void
    }

    pub fn is_float(self) -> bool {
        matches!(self, TypeTag::Float32 | TypeTag::Float64)
    }

    pub fn is_signed(self) -> bool {
        matches!(
            self,
            TypeTag::Int8
                | TypeTag::Int16
                | TypeTag::Int32
                | TypeTag::Int64
                | TypeTag::Float32
                | TypeTag::Float64
        )
    }

    /// Storage size in bytes (0 for `Void`).
    pub fn byte_size(self) -> usize {
        match self {
            TypeTag::Void => 0,
            TypeTag::Int8 | TypeTag::UInt8 => 1,
            TypeTag::Int16 | TypeTag::UInt16 => 2,
            TypeTag::Int32 | TypeTag::UInt32 | TypeTag::Float32 => 4,
            TypeTag::Int64 | TypeTag::UInt64 | TypeTag::Float64 => 8,
        }
    }

    /// Storage size in whole memory words.
    ///
    /// A value narrower than a word still takes a full word.
    pub fn word_size(self) -> usize {
        words_for_bytes(self.byte_size())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static_assertions::const_assert!(WORD_BYTES == 4);
