//! Raw key reads, line editing, and screen paging over a [`Session`].
//!
//! The protocol is byte-oriented: the client's terminal runs in raw mode, so
//! every keystroke arrives as a single byte and nothing is echoed unless we
//! echo it. `read_line` therefore implements the line editor itself:
//! printable bytes are echoed back as typed, backspace (127) erases the last
//! buffered byte with a `"\b \b"` sequence, and carriage return (13) ends
//! the line.

use std::io;

use crate::session::Session;

/// Backspace as sent by a raw-mode terminal.
pub const BACKSPACE: u8 = 127;

/// Carriage return; ends a line read.
pub const ENTER: u8 = 13;

/// Form feed, written as the paging substitute when no window size is known.
pub const FORM_FEED: u8 = 0x0c;

/// Errors from session protocol operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The session's stream failed or closed while reading.
    #[error("could not read from session: {0}")]
    Read(#[source] io::Error),

    /// The session's stream failed while writing.
    #[error("could not write to session: {0}")]
    Write(#[source] io::Error),
}

/// Read exactly one raw byte. No echo, no interpretation.
pub async fn read_key<S: Session + ?Sized>(session: &mut S) -> Result<u8, SessionError> {
    let mut buf = [0u8; 1];
    match session.read(&mut buf).await {
        Ok(0) => Err(SessionError::Read(io::ErrorKind::UnexpectedEof.into())),
        Ok(_) => Ok(buf[0]),
        Err(err) => Err(SessionError::Read(err)),
    }
}

/// Read a line with echo and backspace editing.
///
/// Bytes are read one at a time. Backspace erases the previous buffered byte
/// and emits `"\b \b"` to the terminal, but only when the buffer is
/// non-empty (no negative echo). Carriage return emits `"\n"` and returns
/// the accumulated line. Every other byte is appended and echoed verbatim.
///
/// Blocks until enter or a stream error; there is no timeout. Input is
/// treated as UTF-8; invalid sequences are lossily replaced at line end.
pub async fn read_line<S: Session + ?Sized>(session: &mut S) -> Result<String, SessionError> {
    let mut line: Vec<u8> = Vec::new();

    loop {
        let byte = read_key(session).await?;
        match byte {
            BACKSPACE => {
                if line.pop().is_some() {
                    session.write_all(b"\x08 \x08").await.map_err(SessionError::Write)?;
                }
            },
            ENTER => {
                session.write_all(b"\n").await.map_err(SessionError::Write)?;
                return Ok(String::from_utf8_lossy(&line).into_owned());
            },
            _ => {
                session.write_all(&[byte]).await.map_err(SessionError::Write)?;
                line.push(byte);
            },
        }
    }
}

/// Force old terminal content out of view before redrawing a screen.
///
/// With a known window size this writes `height` lines of `width` spaces so
/// the terminal scrolls everything old away. Without one (no PTY attached)
/// it writes a single form feed instead.
pub async fn new_page<S: Session + ?Sized>(session: &mut S) -> Result<(), SessionError> {
    let page = match session.window_size() {
        Some((width, height)) => {
            let mut line = " ".repeat(width as usize);
            line.push('\n');
            line.repeat(height as usize).into_bytes()
        },
        None => vec![FORM_FEED],
    };
    session.write_all(&page).await.map_err(SessionError::Write)
}
