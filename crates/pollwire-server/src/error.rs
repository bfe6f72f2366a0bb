//! Server runtime error types.

use pollwire_proto::SessionError;

/// Errors from the server runtime.
///
/// Session-level failures (a voter's stream breaking mid-flow) never become
/// a `ServerError`: they end that session's task and are logged there. These
/// variants cover the listener and startup path.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration error (invalid bind address, etc.). Fatal at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Listener/socket error while binding or accepting.
    #[error("transport error: {0}")]
    Transport(#[from] std::io::Error),

    /// A session's stream failed during login, before a handler ran.
    #[error("login failed: {0}")]
    Login(#[from] SessionError),
}
