//! Codec module - object-to-bytes serialization for frame payloads.
//!
//! The transport moves opaque bytes; these codecs are the external
//! collaborator that turns structured values into those bytes for the
//! sender's object overload:
//!
//! - [`RawCodec`] - pass-through for already-serialized or raw binary data
//! - [`MsgPackCodec`] - MessagePack via `rmp-serde` for structured values

mod msgpack;
mod raw;

pub use msgpack::MsgPackCodec;
pub use raw::RawCodec;
