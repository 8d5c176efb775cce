//! Typed encode/decode between the external string form clients send over
//! RPC and the raw bytes stored in a region (§4.4, §6).

use crate::core::error::AllocatorError;
use crate::types::TypeTag;

/// Parses `value` under `tag` and writes it into `region`.
///
/// Returns the number of meaningful bytes written — always `tag.fixed_size()`
/// for numeric tags, and the length of the encoded string for `TypeTag::String`
/// (this becomes the region's `written_len`, §9). Bytes in `region` beyond the
/// returned length are left untouched.
pub fn encode(tag: TypeTag, value: &str, region: &mut [u8]) -> Result<usize, AllocatorError> {
    match tag {
        TypeTag::Int32 => {
            let v: i32 = value.parse().map_err(|_| AllocatorError::BadEncoding)?;
            region[..4].copy_from_slice(&v.to_ne_bytes());
            Ok(4)
        }
        TypeTag::Uint32 => {
            let v: u32 = value.parse().map_err(|_| AllocatorError::BadEncoding)?;
            region[..4].copy_from_slice(&v.to_ne_bytes());
            Ok(4)
        }
        TypeTag::Float32 => {
            let v: f32 = value.parse().map_err(|_| AllocatorError::BadEncoding)?;
            region[..4].copy_from_slice(&v.to_ne_bytes());
            Ok(4)
        }
        TypeTag::Float64 => {
            let v: f64 = value.parse().map_err(|_| AllocatorError::BadEncoding)?;
            region[..8].copy_from_slice(&v.to_ne_bytes());
            Ok(8)
        }
        TypeTag::String => {
            let bytes = value.as_bytes();
            if bytes.len() > region.len() {
                return Err(AllocatorError::TooLarge);
            }
            region[..bytes.len()].copy_from_slice(bytes);
            Ok(bytes.len())
        }
    }
}

/// Renders the bytes of a region back into the external string form clients
/// expect from `Get` (§6): decimal for integers, decimal/scientific for
/// floats, raw characters for strings.
///
/// `written_len` is the number of meaningful bytes to decode — `tag.fixed_size()`
/// for numeric tags, the string's recorded length for `TypeTag::String`.
pub fn decode(tag: TypeTag, region: &[u8], written_len: usize) -> String {
    match tag {
        TypeTag::Int32 => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&region[..written_len.min(4)]);
            i32::from_ne_bytes(buf).to_string()
        }
        TypeTag::Uint32 => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&region[..written_len.min(4)]);
            u32::from_ne_bytes(buf).to_string()
        }
        TypeTag::Float32 => {
            let mut buf = [0u8; 4];
            buf.copy_from_slice(&region[..written_len.min(4)]);
            f32::from_ne_bytes(buf).to_string()
        }
        TypeTag::Float64 => {
            let mut buf = [0u8; 8];
            buf.copy_from_slice(&region[..written_len.min(8)]);
            f64::from_ne_bytes(buf).to_string()
        }
        TypeTag::String => String::from_utf8_lossy(&region[..written_len]).into_owned(),
    }
}
