/// The injected transmit primitive — typically a UART driver.
///
/// `send` must accept the chunk without blocking (fire-and-forget); the
/// sink owner signals completion of the physical transmission later by
/// calling [`FramedTransport::notify_sent`]. The transport considers the
/// bytes handed off once `send` returns, so a sink that can fail mid-flight
/// must buffer internally — there is no re-delivery.
///
/// [`FramedTransport::notify_sent`]: crate::transport::FramedTransport::notify_sent
pub trait ByteSink {
    /// Hand a chunk of wire bytes to the underlying driver.
    fn send(&mut self, chunk: &[u8]);
}

impl<F: FnMut(&[u8])> ByteSink for F {
    fn send(&mut self, chunk: &[u8]) {
        self(chunk)
    }
}
