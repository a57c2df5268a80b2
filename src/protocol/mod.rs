//! Frame protocol - the on-wire unit of data exchange.

mod wire_format;

pub use wire_format::{encode_frame, read_frame, DEFAULT_MAX_FRAME_SIZE, LEN_PREFIX_SIZE};
