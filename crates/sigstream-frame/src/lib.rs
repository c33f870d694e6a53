//! Fixed-header, length-delimited frame reading for the sigstream protocol.
//!
//! Every frame on the wire is:
//! - A 28-byte little-endian header ([`FrameHeader`])
//! - Exactly `data_length` payload bytes, interpreted per `message_type`
//!
//! The protocol has no resync token, so the reader consumes every payload in
//! full, recognised or not, and treats a short stream as fatal.

pub mod codec;
pub mod cursor;
pub mod error;
pub mod header;
pub mod payload;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_reader;

#[cfg(feature = "async")]
pub use async_reader::AsyncFrameReader;
pub use codec::{encode_frame, encode_header, FrameConfig, RawFrame, DEFAULT_MAX_PAYLOAD};
pub use cursor::ByteCursor;
pub use error::{FrameError, ReadStage, Result};
pub use header::{decode_header, FrameHeader, MessageType, DEFAULT_MAGIC, HEADER_SIZE};
pub use payload::{
    align4, descriptor_stride, CalibrationBuilder, SignalDataBuilder, DESCRIPTOR_PREFIX_SIZE,
    DESCRIPTOR_TRAILER_SIZE, SAMPLE_WIDTH, SCALE_FACTOR_DESCRIPTOR, SIGNAL_DATA_PREFIX_SIZE,
};
pub use reader::FrameReader;
pub use writer::FrameWriter;
