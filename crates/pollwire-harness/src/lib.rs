//! Test infrastructure for pollwire.
//!
//! Provides [`ScriptedSession`], a [`Session`] implementation driven by a
//! pre-recorded input script with captured output. Handler tests feed it the
//! exact keystrokes a client would type and assert on the bytes the server
//! would render, with no transport involved.

use std::{collections::VecDeque, io};

use async_trait::async_trait;
use pollwire_proto::Session;

/// A session whose input is a pre-recorded byte script.
///
/// Reads hand out the script one byte at a time, matching the raw-mode
/// keystroke arrival the real transport produces. When the script runs dry,
/// reads report a closed stream - for a handler under test that is
/// indistinguishable from a client disconnect, which conveniently ends any
/// flow at the point the script stops.
#[derive(Debug)]
pub struct ScriptedSession {
    username: String,
    window: Option<(u16, u16)>,
    input: VecDeque<u8>,
    output: Vec<u8>,
    closed: bool,
}

impl ScriptedSession {
    /// Create a session for `username` that will type `script`.
    pub fn new(username: impl Into<String>, script: &[u8]) -> Self {
        Self {
            username: username.into(),
            window: None,
            input: script.iter().copied().collect(),
            output: Vec::new(),
            closed: false,
        }
    }

    /// Attach a terminal window size, enabling blank-line paging.
    #[must_use]
    pub fn with_window(mut self, width: u16, height: u16) -> Self {
        self.window = Some((width, height));
        self
    }

    /// Everything the server wrote so far, as raw bytes.
    pub fn output(&self) -> &[u8] {
        &self.output
    }

    /// Everything the server wrote so far, lossily decoded for assertions.
    pub fn output_text(&self) -> String {
        String::from_utf8_lossy(&self.output).into_owned()
    }

    /// Whether the handler closed the session.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Bytes of script not yet consumed.
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }
}

#[async_trait]
impl Session for ScriptedSession {
    fn username(&self) -> &str {
        &self.username
    }

    fn window_size(&self) -> Option<(u16, u16)> {
        self.window
    }

    async fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.closed {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        match self.input.pop_front() {
            Some(byte) => {
                buf[0] = byte;
                Ok(1)
            },
            None => Ok(0),
        }
    }

    async fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        if self.closed {
            return Err(io::ErrorKind::BrokenPipe.into());
        }
        self.output.extend_from_slice(data);
        Ok(())
    }

    async fn close(&mut self) {
        self.closed = true;
    }
}
