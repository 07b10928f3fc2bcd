/// Errors that can occur on ring buffer operations.
///
/// All variants are local, recoverable conditions: `Full` is backpressure
/// for the producer, `Empty` and `Insufficient` mean "try again once more
/// data has arrived".
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RingError {
    /// No usable capacity remains.
    #[error("ring buffer full")]
    Full,

    /// The buffer holds no data.
    #[error("ring buffer empty")]
    Empty,

    /// A bulk read or skip asked for more bytes than are buffered.
    #[error("not enough buffered data ({requested} requested, {available} available)")]
    Insufficient { requested: usize, available: usize },
}

pub type Result<T> = std::result::Result<T, RingError>;
