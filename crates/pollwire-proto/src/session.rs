//! The session boundary: one connected, authenticated terminal client.

use std::io;

use async_trait::async_trait;

/// One connected, authenticated remote terminal client.
///
/// Implementations wrap whatever transport carried the connection and expose
/// the pieces the protocol layer needs: a bidirectional byte stream, the
/// authenticated username, and - when a pseudo-terminal is attached - the
/// terminal window size.
///
/// Reads have no timeout. An idle client blocks its session task until bytes
/// arrive or the stream errors/closes; closing the stream is the only
/// cancellation signal.
#[async_trait]
pub trait Session: Send {
    /// Username the client authenticated as, fixed for the connection.
    fn username(&self) -> &str;

    /// Terminal window size `(width, height)` if a PTY is attached.
    fn window_size(&self) -> Option<(u16, u16)>;

    /// Read up to `buf.len()` bytes from the client.
    ///
    /// Returns the number of bytes read; `Ok(0)` means the stream closed.
    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;

    /// Write all of `data` to the client.
    async fn write_all(&mut self, data: &[u8]) -> io::Result<()>;

    /// Close the session's stream. Best effort; errors are discarded.
    async fn close(&mut self);
}
