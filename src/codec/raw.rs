//! Raw codec - pass-through for binary data.
//!
//! Used when the payload is already serialized, e.g. encoded image bytes
//! straight from a capture device.

use bytes::Bytes;

/// Raw codec that passes bytes through without transformation.
pub struct RawCodec;

impl RawCodec {
    /// Serialize raw bytes (copies data into `Bytes`).
    #[inline]
    pub fn serialize(data: &[u8]) -> Bytes {
        Bytes::copy_from_slice(data)
    }

    /// Serialize `Bytes` (zero-copy, just returns the input).
    #[inline]
    pub fn serialize_bytes(data: Bytes) -> Bytes {
        data
    }

    /// Deserialize - returns a reference to the input (zero-copy).
    #[inline]
    pub fn deserialize(data: &[u8]) -> &[u8] {
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let original = b"image bytes";
        let serialized = RawCodec::serialize(original);
        assert_eq!(RawCodec::deserialize(&serialized), original);
    }

    #[test]
    fn test_serialize_bytes_zero_copy() {
        let original = Bytes::from_static(b"static data");
        let passed = RawCodec::serialize_bytes(original.clone());
        assert_eq!(passed.as_ptr(), original.as_ptr());
    }

    #[test]
    fn test_all_byte_values_preserved() {
        let all_bytes: Vec<u8> = (0..=255).collect();
        let serialized = RawCodec::serialize(&all_bytes);
        assert_eq!(RawCodec::deserialize(&serialized), &all_bytes[..]);
    }
}
