use bytes::Bytes;

/// Frame header: magic (2) + length (2) = 4 bytes.
pub const HEADER_SIZE: usize = 4;

/// Magic bytes: 0xAC 0xBE.
pub const MAGIC: [u8; 2] = [0xAC, 0xBE];

/// Maximum payload size imposed by the 16-bit length field.
pub const MAX_PAYLOAD: usize = u16::MAX as usize;

/// A complete extracted frame.
///
/// The transport never interprets the payload; it is handed upward as an
/// opaque blob (in practice a serialized protobuf message).
#[derive(Debug, Clone)]
pub struct Frame {
    /// The frame payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// Encode a frame header for a payload of `len` bytes.
///
/// Wire format:
/// ```text
/// ┌──────────────┬────────────┬──────────────────┐
/// │ Magic (2B)   │ Length     │ Payload          │
/// │ 0xAC 0xBE    │ (2B LE)    │ (Length bytes)   │
/// └──────────────┴────────────┴──────────────────┘
/// ```
pub fn encode_header(len: u16) -> [u8; HEADER_SIZE] {
    let length = len.to_le_bytes();
    [MAGIC[0], MAGIC[1], length[0], length[1]]
}

/// Outcome of inspecting a peeked 4-byte header window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderScan {
    /// A valid header; the payload is `len` bytes long.
    Frame(usize),
    /// No valid header at the front; consume this many bytes and rescan.
    Resync(usize),
}

/// Classify a 4-byte header window peeked from the RX stream.
///
/// On a full magic match the little-endian payload length is decoded. When
/// the magic appears shifted by one position (a single stray byte precedes
/// it), a 1-byte skip realigns the stream. Otherwise two bytes are skipped
/// at a time; the 2-byte stride is a deliberate throughput trade-off
/// inherited from the wire protocol and must not be changed.
pub fn scan_header(header: &[u8; HEADER_SIZE]) -> HeaderScan {
    if header[0] == MAGIC[0] && header[1] == MAGIC[1] {
        HeaderScan::Frame(u16::from_le_bytes([header[2], header[3]]) as usize)
    } else if header[1] == MAGIC[0] {
        HeaderScan::Resync(1)
    } else {
        HeaderScan::Resync(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_layout_is_bit_exact() {
        assert_eq!(encode_header(3), [0xAC, 0xBE, 0x03, 0x00]);
        assert_eq!(encode_header(0), [0xAC, 0xBE, 0x00, 0x00]);
        assert_eq!(encode_header(0x1234), [0xAC, 0xBE, 0x34, 0x12]);
        assert_eq!(encode_header(u16::MAX), [0xAC, 0xBE, 0xFF, 0xFF]);
    }

    #[test]
    fn scan_accepts_valid_magic() {
        assert_eq!(
            scan_header(&[0xAC, 0xBE, 0x05, 0x00]),
            HeaderScan::Frame(5)
        );
        assert_eq!(
            scan_header(&[0xAC, 0xBE, 0x00, 0x01]),
            HeaderScan::Frame(256)
        );
    }

    #[test]
    fn scan_realigns_shifted_magic_by_one() {
        // A single stray byte precedes the magic sequence.
        assert_eq!(
            scan_header(&[0x00, 0xAC, 0xBE, 0x05]),
            HeaderScan::Resync(1)
        );
    }

    #[test]
    fn scan_skips_two_bytes_through_noise() {
        assert_eq!(
            scan_header(&[0x00, 0x00, 0x00, 0x00]),
            HeaderScan::Resync(2)
        );
        // First magic byte alone is not enough to hold position.
        assert_eq!(
            scan_header(&[0xAC, 0x00, 0x00, 0x00]),
            HeaderScan::Resync(2)
        );
        assert_eq!(
            scan_header(&[0xBE, 0xBE, 0xAC, 0xBE]),
            HeaderScan::Resync(2)
        );
    }

    #[test]
    fn frame_wire_size() {
        let frame = Frame::new(Bytes::from_static(b"test"));
        assert_eq!(frame.wire_size(), HEADER_SIZE + 4);
    }
}
