//! Magic-delimited, length-prefixed framing for the WHAD wire protocol.
//!
//! WHAD adapters exchange protobuf blobs over a UART-class byte stream.
//! Every message is framed with:
//! - A 2-byte magic number (`0xAC 0xBE`) for stream synchronization
//! - A 2-byte little-endian payload length (frames cap at 65535 bytes)
//!
//! [`FramedTransport`] buffers both directions through fixed-capacity ring
//! buffers: received bytes are ingested as they arrive and complete frames
//! are pulled out on demand, while outbound frames are staged and drained
//! into an injected [`ByteSink`] in bounded chunks with at most one
//! transmission in flight. Corrupted input is handled by a small
//! resynchronization heuristic rather than an error, so the upper layer
//! only ever sees complete, correctly-framed payloads.

pub mod codec;
pub mod error;
pub mod sink;
pub mod transport;

pub use codec::{encode_header, scan_header, Frame, HeaderScan, HEADER_SIZE, MAGIC, MAX_PAYLOAD};
pub use error::{Result, TransportError};
pub use sink::ByteSink;
pub use transport::{FramedTransport, Pump, TransportConfig, TransportStats, DEFAULT_MAX_CHUNK};
