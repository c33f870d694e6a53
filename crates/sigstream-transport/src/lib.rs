//! Connected byte-stream abstraction for the sigstream decoder.
//!
//! The decoder never opens sockets itself; it consumes an already-connected,
//! reliable, ordered byte stream. This crate provides that stream:
//! - [`SignalStream`] over TCP (the producer's streaming port)
//! - [`connect`] with a bounded connect wait
//!
//! Anything implementing [`std::io::Read`] works with the frame reader, so
//! in-memory buffers and captured dumps plug in the same way.

pub mod error;
pub mod tcp;
pub mod traits;

pub use error::{Result, TransportError};
pub use tcp::connect;
#[cfg(feature = "async")]
pub use tcp::connect_async;
pub use traits::SignalStream;
