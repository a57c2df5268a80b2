//! Wire format encoding and decoding.
//!
//! Implements the length-prefixed frame format:
//! ```text
//! ┌────────────┬──────────────────┐
//! │ Length     │ Payload          │
//! │ 4 bytes    │ Length bytes     │
//! │ uint32 LE  │                  │
//! └────────────┴──────────────────┘
//! ```
//!
//! The length prefix is Little Endian on both ends of the wire. Frames carry
//! no type tag, sequence number, or checksum; a connection is a sequence of
//! zero or more frames followed by peer-initiated close.

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{Result, SnapwireError};

/// Length prefix size in bytes (fixed, exactly 4).
pub const LEN_PREFIX_SIZE: usize = 4;

/// Default maximum frame size (64 MiB).
///
/// The length field is peer-controlled; decoding rejects anything above this
/// ceiling before allocating, so a hostile or corrupted prefix cannot drive
/// memory exhaustion.
pub const DEFAULT_MAX_FRAME_SIZE: u32 = 64 * 1024 * 1024;

/// Encode a payload as a complete frame.
///
/// Returns the 4-byte Little Endian length prefix followed by the payload.
///
/// # Errors
///
/// Returns [`SnapwireError::Encoding`] if the payload length does not fit in
/// the 32-bit length field.
///
/// # Example
///
/// ```
/// use snapwire::protocol::encode_frame;
///
/// let frame = encode_frame(b"hello").unwrap();
/// assert_eq!(&frame[..4], &5u32.to_le_bytes());
/// assert_eq!(&frame[4..], b"hello");
/// ```
pub fn encode_frame(payload: &[u8]) -> Result<Vec<u8>> {
    let length = u32::try_from(payload.len()).map_err(|_| {
        SnapwireError::Encoding(format!(
            "payload of {} bytes exceeds the 32-bit length field",
            payload.len()
        ))
    })?;

    let mut buf = Vec::with_capacity(LEN_PREFIX_SIZE + payload.len());
    buf.extend_from_slice(&length.to_le_bytes());
    buf.extend_from_slice(payload);
    Ok(buf)
}

/// Read one complete frame from the reader.
///
/// Reads the 4-byte length prefix, then exactly that many payload bytes.
/// Blocks the calling task until both reads complete or fail.
///
/// # Returns
///
/// - `Ok(Some(payload))` for a complete frame
/// - `Ok(None)` if the peer closed the stream cleanly between frames
///
/// # Errors
///
/// - [`SnapwireError::Framing`] if the stream closes or resets mid-prefix or
///   mid-payload
/// - [`SnapwireError::Protocol`] if the declared length exceeds
///   `max_frame_size` (checked before any allocation)
pub async fn read_frame<R>(reader: &mut R, max_frame_size: u32) -> Result<Option<Bytes>>
where
    R: AsyncRead + Unpin,
{
    let mut prefix = [0u8; LEN_PREFIX_SIZE];

    // The first prefix byte distinguishes a clean close (normal end of the
    // frame sequence) from a connection torn down mid-frame.
    match reader.read(&mut prefix[..1]).await {
        Ok(0) => return Ok(None),
        Ok(_) => {}
        Err(e) => return Err(SnapwireError::Framing(e)),
    }

    reader
        .read_exact(&mut prefix[1..])
        .await
        .map_err(SnapwireError::Framing)?;

    let length = u32::from_le_bytes(prefix);
    if length > max_frame_size {
        return Err(SnapwireError::Protocol(format!(
            "declared frame length {} exceeds maximum {}",
            length, max_frame_size
        )));
    }

    let mut payload = vec![0u8; length as usize];
    reader
        .read_exact(&mut payload)
        .await
        .map_err(SnapwireError::Framing)?;

    Ok(Some(Bytes::from(payload)))
}
