/// Errors that can occur while framing or deframing the byte stream.
///
/// Every variant is recoverable: overflow is backpressure to be handled by
/// the caller, and a too-small output buffer leaves the frame queued for a
/// retry. A corrupted header is never surfaced as an error; the transport
/// resynchronizes internally.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The RX ring buffer overflowed during ingest and bytes were lost.
    #[error("rx buffer overflow, {dropped} received bytes dropped")]
    RxOverflow { dropped: usize },

    /// The caller's output buffer cannot hold the next queued frame.
    ///
    /// Nothing was consumed; retry with a buffer of at least `required`
    /// bytes.
    #[error("output buffer too small ({capacity} bytes, next frame needs {required})")]
    BufferTooSmall { required: usize, capacity: usize },

    /// The payload exceeds the 16-bit length field of the wire format.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The TX ring buffer lacks room for the whole frame.
    ///
    /// Nothing was staged; drain the transport and retry.
    #[error("tx buffer full (frame needs {required} bytes, {free} free)")]
    TxFull { required: usize, free: usize },
}

pub type Result<T> = std::result::Result<T, TransportError>;
