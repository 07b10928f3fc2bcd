//! Fixed-capacity byte ring buffer for the WHAD framed serial transport.
//!
//! The WHAD wire protocol shuttles protobuf blobs over a UART-class byte
//! stream. Both directions are buffered through a bounded FIFO that supports:
//! - single-byte `push` / `pop`
//! - non-destructive bulk reads (`copy_to`) so a parser can inspect bytes
//!   before committing to them
//! - `skip` to consume bytes already inspected
//!
//! Storage is an inline array; there is no heap allocation and every
//! operation is non-blocking and bounded-time.

pub mod buffer;
pub mod error;

pub use buffer::{RingBuffer, DEFAULT_CAPACITY};
pub use error::{Result, RingError};
