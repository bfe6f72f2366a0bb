//! TCP session transport.
//!
//! Production [`Session`] implementation over a plain TCP stream. The
//! authenticating remote-shell layer the protocol was designed for is out of
//! scope here; this adapter stands in behind the same trait with a one-line
//! login prompt. Raw TCP has no pseudo-terminal, so `window_size` is `None`
//! and screen paging falls back to the form-feed substitute.

use std::io;

use async_trait::async_trait;
use pollwire_proto::{Session, SessionError, read_line};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

/// A [`Session`] over a TCP connection.
#[derive(Debug)]
pub struct TcpSession {
    stream: TcpStream,
    username: String,
}

impl TcpSession {
    /// Perform the login prompt on a fresh connection.
    ///
    /// Prompts `"login: "` and reads the username with the protocol line
    /// editor (so backspace works even here). Re-prompts on an empty line;
    /// a stream failure aborts the connection before any handler runs.
    pub async fn login(stream: TcpStream) -> Result<Self, SessionError> {
        let mut session = Self { stream, username: String::new() };

        loop {
            session.write_all(b"login: ").await.map_err(SessionError::Write)?;
            let username = read_line(&mut session).await?;
            if !username.is_empty() {
                session.username = username;
                return Ok(session);
            }
        }
    }
}

#[async_trait]
impl Session for TcpSession {
    fn username(&self) -> &str {
        &self.username
    }

    fn window_size(&self) -> Option<(u16, u16)> {
        // No PTY on raw TCP; paging uses the form-feed fallback.
        None
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf).await
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        self.stream.write_all(data).await
    }

    async fn close(&mut self) {
        let _ = self.stream.shutdown().await;
    }
}
