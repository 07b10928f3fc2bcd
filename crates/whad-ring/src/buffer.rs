use crate::error::{Result, RingError};

/// Capacity used by the transport layer when none is specified.
pub const DEFAULT_CAPACITY: usize = 4096;

/// A fixed-capacity byte FIFO with wrap-around.
///
/// `head` is the next write index and `tail` the next read index; the buffer
/// is empty when they coincide. Because fullness is derived from the same
/// `(N + head - tail) % N` formula, `head` must never advance onto `tail`,
/// so the usable capacity is `N - 1` bytes. `push` enforces that bound
/// explicitly rather than relying on the size formula alone.
///
/// `copy_to` peeks without consuming; `skip` consumes without copying. The
/// split lets a frame parser inspect a header, decide whether the rest of
/// the frame has arrived, and leave everything buffered if it has not.
#[derive(Debug, Clone)]
pub struct RingBuffer<const N: usize = DEFAULT_CAPACITY> {
    data: [u8; N],
    head: usize,
    tail: usize,
}

impl<const N: usize> RingBuffer<N> {
    /// Create an empty ring buffer.
    pub const fn new() -> Self {
        // A zero or one byte array would leave zero usable capacity.
        assert!(N >= 2, "ring buffer capacity must be at least 2");
        Self {
            data: [0u8; N],
            head: 0,
            tail: 0,
        }
    }

    /// Number of bytes currently buffered.
    pub fn len(&self) -> usize {
        (N + self.head - self.tail) % N
    }

    /// True when no data is buffered.
    pub fn is_empty(&self) -> bool {
        self.head == self.tail
    }

    /// Number of bytes that can still be pushed.
    pub fn free(&self) -> usize {
        self.capacity() - self.len()
    }

    /// Usable capacity (one byte less than the storage size).
    pub const fn capacity(&self) -> usize {
        N - 1
    }

    /// Drop all buffered data.
    pub fn clear(&mut self) {
        self.head = 0;
        self.tail = 0;
    }

    /// Append one byte.
    ///
    /// Fails with [`RingError::Full`] when the usable capacity is exhausted;
    /// the buffer is left unchanged in that case.
    pub fn push(&mut self, byte: u8) -> Result<()> {
        if self.len() == self.capacity() {
            return Err(RingError::Full);
        }
        self.data[self.head] = byte;
        self.head = (self.head + 1) % N;
        Ok(())
    }

    /// Remove and return the oldest byte.
    pub fn pop(&mut self) -> Result<u8> {
        if self.is_empty() {
            return Err(RingError::Empty);
        }
        let byte = self.data[self.tail];
        self.tail = (self.tail + 1) % N;
        Ok(byte)
    }

    /// Append a whole slice, all-or-nothing.
    ///
    /// Checks free space up front so a failed call never leaves a partial
    /// write behind.
    pub fn extend(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.len() > self.free() {
            return Err(RingError::Full);
        }
        for &byte in bytes {
            // Cannot fail: free space was checked above.
            self.data[self.head] = byte;
            self.head = (self.head + 1) % N;
        }
        Ok(())
    }

    /// Copy `dst.len()` bytes starting at the read position into `dst`
    /// without consuming them.
    ///
    /// Repeated calls return identical bytes until a `skip` or `pop`
    /// advances the read position.
    pub fn copy_to(&self, dst: &mut [u8]) -> Result<()> {
        let requested = dst.len();
        let available = self.len();
        if requested > available {
            return Err(RingError::Insufficient {
                requested,
                available,
            });
        }

        // First run reaches at most the physical end of the array, the
        // remainder wraps to index 0.
        let first = requested.min(N - self.tail);
        dst[..first].copy_from_slice(&self.data[self.tail..self.tail + first]);
        if first < requested {
            dst[first..].copy_from_slice(&self.data[..requested - first]);
        }
        Ok(())
    }

    /// Consume `n` bytes without copying them anywhere.
    pub fn skip(&mut self, n: usize) -> Result<()> {
        let available = self.len();
        if n > available {
            return Err(RingError::Insufficient {
                requested: n,
                available,
            });
        }
        self.tail = (self.tail + n) % N;
        Ok(())
    }
}

impl<const N: usize> Default for RingBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
