use std::time::{Duration, Instant};

use bytes::BytesMut;
use tracing::{debug, trace, warn};
use whad_ring::{RingBuffer, DEFAULT_CAPACITY};

use crate::codec::{encode_header, scan_header, Frame, HeaderScan, HEADER_SIZE, MAX_PAYLOAD};
use crate::error::{Result, TransportError};
use crate::sink::ByteSink;

/// Default upper bound on the chunk size handed to the sink per pump.
pub const DEFAULT_MAX_CHUNK: usize = 64;

/// Configuration for a [`FramedTransport`].
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Maximum number of bytes handed to the sink per [`FramedTransport::pump`].
    pub max_chunk: usize,
    /// Deadline for the sink to confirm a transmission via
    /// [`FramedTransport::notify_sent`]. When set, an expired transmission
    /// is abandoned on the next pump instead of wedging the TX path
    /// forever. `None` (the default) trusts the sink to always complete.
    pub send_timeout: Option<Duration>,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            max_chunk: DEFAULT_MAX_CHUNK,
            send_timeout: None,
        }
    }
}

/// Counters exposed for diagnostics.
///
/// `rx_dropped` is the only silent-data-loss path of the wire protocol, so
/// it is always counted even though the transport cannot recover the bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    /// Received bytes dropped because the RX ring was full.
    pub rx_dropped: u64,
    /// Resynchronization skips performed while scanning for a header.
    pub resyncs: u64,
    /// Complete frames extracted from the RX stream.
    pub frames_in: u64,
    /// Frames staged into the TX ring.
    pub frames_out: u64,
    /// Transmissions abandoned because the sink never confirmed them.
    pub tx_timeouts: u64,
}

/// Outcome of a [`FramedTransport::pump`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pump {
    /// This many bytes were handed to the sink.
    Sent(usize),
    /// A previous transmission is still outstanding; retry after
    /// [`FramedTransport::notify_sent`].
    Busy,
    /// Nothing is queued for transmission.
    Idle,
}

#[derive(Debug, Clone, Copy)]
enum TxState {
    Idle,
    Sending { since: Instant },
}

/// Frames a byte stream in both directions over two fixed-capacity ring
/// buffers.
///
/// Inbound: [`ingest`] raw bytes as they arrive (interrupt or polling
/// context), then poll [`try_extract`] for complete frames. Outbound:
/// [`enqueue`] whole payloads, then [`pump`] to drain the staged bytes
/// into the sink in bounded chunks, one transmission in flight at a time.
///
/// All operations are synchronous, non-blocking and bounded-time; the
/// intended scheduling model is a single-threaded cooperative event loop.
/// If ingestion and pumping run on different threads, wrap the transport in
/// a mutex — each method must execute as one critical section.
///
/// `N` sizes both ring buffers; frames longer than `N - 1 - 4` bytes can
/// never be staged nor reassembled, so pick a capacity larger than the
/// biggest message the surrounding application exchanges.
///
/// [`ingest`]: FramedTransport::ingest
/// [`try_extract`]: FramedTransport::try_extract
/// [`enqueue`]: FramedTransport::enqueue
/// [`pump`]: FramedTransport::pump
pub struct FramedTransport<S, const N: usize = DEFAULT_CAPACITY> {
    rx: RingBuffer<N>,
    tx: RingBuffer<N>,
    state: TxState,
    sink: S,
    config: TransportConfig,
    stats: TransportStats,
}

impl<S: ByteSink, const N: usize> FramedTransport<S, N> {
    /// Create a transport with default configuration.
    pub fn new(sink: S) -> Self {
        Self::with_config(sink, TransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    pub fn with_config(sink: S, config: TransportConfig) -> Self {
        Self {
            rx: RingBuffer::new(),
            tx: RingBuffer::new(),
            state: TxState::Idle,
            sink,
            config,
            stats: TransportStats::default(),
        }
    }

    /// Feed raw received bytes into the RX ring.
    ///
    /// On overflow the remaining bytes are dropped, counted in
    /// [`TransportStats::rx_dropped`] and reported as
    /// [`TransportError::RxOverflow`]. Bytes accepted before the overflow
    /// stay buffered.
    pub fn ingest(&mut self, data: &[u8]) -> Result<()> {
        for (index, &byte) in data.iter().enumerate() {
            if self.rx.push(byte).is_err() {
                let dropped = data.len() - index;
                self.stats.rx_dropped += dropped as u64;
                warn!(
                    dropped,
                    buffered = self.rx.len(),
                    "rx ring full, dropping received bytes"
                );
                return Err(TransportError::RxOverflow { dropped });
            }
        }
        Ok(())
    }

    /// Try to pull one complete frame into `out`.
    ///
    /// Returns:
    /// - `Ok(Some(len))` — a frame arrived; its `len` payload bytes were
    ///   written to `out[..len]`.
    /// - `Ok(None)` — no complete frame yet; retry once more bytes have
    ///   been ingested. Nothing was consumed that could belong to a frame.
    /// - `Err(BufferTooSmall { required, .. })` — the next frame does not
    ///   fit in `out`; it stays queued for a retry with a larger buffer.
    ///
    /// Noise in front of a frame is consumed by the resynchronization
    /// heuristic (see [`scan_header`]); every scan step consumes at least
    /// one byte, so the parser cannot livelock on corrupted input.
    pub fn try_extract(&mut self, out: &mut [u8]) -> Result<Option<usize>> {
        let Some(length) = self.scan_front() else {
            return Ok(None);
        };

        if out.len() < length {
            return Err(TransportError::BufferTooSmall {
                required: length,
                capacity: out.len(),
            });
        }
        if self.rx.len() < HEADER_SIZE + length {
            // Header is valid but the payload has not fully arrived;
            // leave it buffered and re-peek on the next call.
            return Ok(None);
        }

        self.consume_frame(&mut out[..length]);
        Ok(Some(length))
    }

    /// Owned-allocation variant of [`try_extract`].
    ///
    /// Allocates the payload buffer itself, so it never reports
    /// `BufferTooSmall`.
    ///
    /// [`try_extract`]: FramedTransport::try_extract
    pub fn try_extract_frame(&mut self) -> Result<Option<Frame>> {
        let Some(length) = self.scan_front() else {
            return Ok(None);
        };
        if self.rx.len() < HEADER_SIZE + length {
            return Ok(None);
        }

        let mut payload = BytesMut::zeroed(length);
        self.consume_frame(&mut payload);
        Ok(Some(Frame {
            payload: payload.freeze(),
        }))
    }

    /// Stage one payload for transmission, all-or-nothing.
    ///
    /// The frame header and payload are staged together or not at all, so
    /// a rejected enqueue never leaves a partial frame on the wire.
    pub fn enqueue(&mut self, payload: &[u8]) -> Result<()> {
        if payload.len() > MAX_PAYLOAD {
            return Err(TransportError::PayloadTooLarge {
                size: payload.len(),
                max: MAX_PAYLOAD,
            });
        }
        let required = HEADER_SIZE + payload.len();
        let free = self.tx.free();
        if required > free {
            return Err(TransportError::TxFull { required, free });
        }

        let header = encode_header(payload.len() as u16);
        // Cannot fail: free space was checked above.
        self.tx
            .extend(&header)
            .and_then(|()| self.tx.extend(payload))
            .expect("tx free space checked above");

        self.stats.frames_out += 1;
        debug!(
            length = payload.len(),
            pending = self.tx.len(),
            "frame staged for transmission"
        );
        Ok(())
    }

    /// Drain pending TX bytes into the sink, respecting the one-in-flight
    /// rule and the configured chunk size.
    ///
    /// The staged bytes are considered handed off once the sink accepts
    /// them; physical transmission completes asynchronously and is
    /// acknowledged through [`notify_sent`].
    ///
    /// [`notify_sent`]: FramedTransport::notify_sent
    pub fn pump(&mut self) -> Pump {
        if let TxState::Sending { since } = self.state {
            match self.config.send_timeout {
                Some(timeout) if since.elapsed() >= timeout => {
                    self.stats.tx_timeouts += 1;
                    warn!(
                        ?timeout,
                        "sink never confirmed transmission, resetting to idle"
                    );
                    self.state = TxState::Idle;
                }
                _ => return Pump::Busy,
            }
        }

        let n = self.tx.len().min(self.config.max_chunk);
        if n == 0 {
            return Pump::Idle;
        }

        let mut chunk = vec![0u8; n];
        self.tx
            .copy_to(&mut chunk)
            .expect("chunk length bounded by tx.len()");

        self.state = TxState::Sending {
            since: Instant::now(),
        };
        self.sink.send(&chunk);
        self.tx.skip(n).expect("chunk length bounded by tx.len()");

        trace!(n, remaining = self.tx.len(), "chunk handed to sink");
        Pump::Sent(n)
    }

    /// Acknowledge completion of the outstanding transmission.
    ///
    /// Must be called exactly once per accepted [`pump`] by whoever owns
    /// the sink. Calling it while idle is a protocol violation by the sink
    /// owner and is logged but otherwise ignored.
    ///
    /// [`pump`]: FramedTransport::pump
    pub fn notify_sent(&mut self) {
        match self.state {
            TxState::Sending { .. } => self.state = TxState::Idle,
            TxState::Idle => warn!("notify_sent called with no transmission outstanding"),
        }
    }

    /// Diagnostic counters.
    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    /// True while a transmission is outstanding.
    pub fn is_sending(&self) -> bool {
        matches!(self.state, TxState::Sending { .. })
    }

    /// Bytes staged for transmission but not yet handed to the sink.
    pub fn pending_tx(&self) -> usize {
        self.tx.len()
    }

    /// Received bytes buffered but not yet extracted as frames.
    pub fn buffered_rx(&self) -> usize {
        self.rx.len()
    }

    /// Current transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Mutably borrow the sink.
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Consume the transport and return the sink.
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Resynchronize until a valid header heads the RX ring, then return
    /// its payload length without consuming anything.
    ///
    /// Returns `None` once fewer than `HEADER_SIZE` bytes remain. Each
    /// iteration either returns or consumes one or two bytes, so progress
    /// through noise is monotonic.
    fn scan_front(&mut self) -> Option<usize> {
        loop {
            if self.rx.len() < HEADER_SIZE {
                return None;
            }
            let mut header = [0u8; HEADER_SIZE];
            self.rx
                .copy_to(&mut header)
                .expect("header length checked above");

            match scan_header(&header) {
                HeaderScan::Frame(length) => return Some(length),
                HeaderScan::Resync(stride) => {
                    self.stats.resyncs += 1;
                    trace!(stride, "no frame magic, resynchronizing");
                    self.rx.skip(stride).expect("stride below header size");
                }
            }
        }
    }

    /// Consume one complete frame whose header and payload are known to be
    /// fully buffered, copying the payload into `out`.
    fn consume_frame(&mut self, out: &mut [u8]) {
        let length = out.len();
        // Cannot fail: availability was checked by the caller.
        self.rx
            .skip(HEADER_SIZE)
            .and_then(|()| self.rx.copy_to(out))
            .and_then(|()| self.rx.skip(length))
            .expect("frame availability checked by caller");

        self.stats.frames_in += 1;
        debug!(length, buffered = self.rx.len(), "frame extracted");
    }
}
