//! MsgPack codec using `rmp-serde`.
//!
//! Uses `to_vec_named` so structs serialize as maps with field names rather
//! than positional arrays; capture clients written in other languages can
//! then decode payloads without sharing field ordering.

use crate::error::Result;

/// MessagePack codec for structured data.
pub struct MsgPackCodec;

impl MsgPackCodec {
    /// Encode a value to MsgPack bytes (struct-as-map format).
    ///
    /// # Errors
    ///
    /// Returns error if the value cannot be serialized.
    #[inline]
    pub fn encode<T: serde::Serialize>(value: &T) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(value)?)
    }

    /// Decode MsgPack bytes to a value.
    ///
    /// # Errors
    ///
    /// Returns error if the bytes cannot be deserialized to type T.
    #[inline]
    pub fn decode<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Capture {
        sequence: u32,
        camera: String,
        #[serde(with = "serde_bytes")]
        pixels: Vec<u8>,
    }

    #[test]
    fn test_encode_decode_struct() {
        let original = Capture {
            sequence: 7,
            camera: "booth-1".to_string(),
            pixels: vec![0x01, 0x02, 0x03],
        };

        let encoded = MsgPackCodec::encode(&original).unwrap();
        let decoded: Capture = MsgPackCodec::decode(&encoded).unwrap();

        assert_eq!(decoded, original);
    }

    #[test]
    fn test_structs_encode_as_maps() {
        let capture = Capture {
            sequence: 1,
            camera: "c".to_string(),
            pixels: vec![],
        };
        let encoded = MsgPackCodec::encode(&capture).unwrap();

        // fixmap marker (0x8X), not fixarray (0x9X)
        assert_eq!(
            encoded[0] & 0xF0,
            0x80,
            "expected map format, got {:02X}",
            encoded[0]
        );
    }

    #[test]
    fn test_encode_decode_primitives() {
        let s = "hello";
        let encoded = MsgPackCodec::encode(&s).unwrap();
        let decoded: String = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, s);

        let n: i64 = -12345;
        let encoded = MsgPackCodec::encode(&n).unwrap();
        let decoded: i64 = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded, n);
    }

    #[test]
    fn test_decode_error_on_invalid_data() {
        let invalid = b"not valid msgpack";
        let result: Result<Capture> = MsgPackCodec::decode(invalid);
        assert!(result.is_err());
    }

    #[test]
    fn test_binary_payload_uses_bin_format() {
        let data: Vec<u8> = vec![0x01, 0x02, 0x03, 0x04, 0x05];
        let encoded = MsgPackCodec::encode(&serde_bytes::Bytes::new(&data)).unwrap();

        // bin8 marker
        assert_eq!(encoded[0], 0xc4);

        let decoded: serde_bytes::ByteBuf = MsgPackCodec::decode(&encoded).unwrap();
        assert_eq!(decoded.as_ref(), &data);
    }
}
