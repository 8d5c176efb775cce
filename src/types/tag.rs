//! The fixed region type tag enumeration (§3, §6).

use crate::core::error::AllocatorError;
use serde::{Deserialize, Serialize};

/// The type a region is declared as at `allocate` time. Selects the encoding
/// used by typed read/write and by diagnostic rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    /// 4-byte signed integer, host byte order.
    Int32,
    /// 4-byte unsigned integer, host byte order.
    Uint32,
    /// 4-byte IEEE-754 float, host endianness.
    Float32,
    /// 8-byte IEEE-754 float, host endianness.
    Float64,
    /// Variable-length UTF-8 text, bounded by the region's byte size.
    String,
}

impl TypeTag {
    /// Parses the case-sensitive wire value for a type tag (§6).
    pub fn from_wire(s: &str) -> Result<Self, AllocatorError> {
        match s {
            "int" => Ok(TypeTag::Int32),
            "uint32_t" => Ok(TypeTag::Uint32),
            "float" => Ok(TypeTag::Float32),
            "double" => Ok(TypeTag::Float64),
            "string" => Ok(TypeTag::String),
            _ => Err(AllocatorError::UnknownType),
        }
    }

    /// The wire value clients use to name this tag.
    pub fn as_wire(self) -> &'static str {
        match self {
            TypeTag::Int32 => "int",
            TypeTag::Uint32 => "uint32_t",
            TypeTag::Float32 => "float",
            TypeTag::Float64 => "double",
            TypeTag::String => "string",
        }
    }

    /// The fixed encoded byte width of this type, or `None` for `String`,
    /// whose encoded length is the region's declared `size` rather than a
    /// fixed width (§4.4: "the entire region for `string`").
    pub fn fixed_size(self) -> Option<usize> {
        match self {
            TypeTag::Int32 | TypeTag::Uint32 | TypeTag::Float32 => Some(4),
            TypeTag::Float64 => Some(8),
            TypeTag::String => None,
        }
    }
}
