//! Pollwire production server.
//!
//! Accepts TCP connections, runs the one-line login prompt, and then drives
//! each session through the poll flows in [`handler`]. One tokio task per
//! session; sessions share only the [`PollStore`] (and, through it, the
//! per-poll vote state). All poll state is in memory and dies with the
//! process - persistence is an explicit non-goal.
//!
//! # Components
//!
//! - [`handle`]: the per-session flow state machine (menu, create, open)
//! - [`TcpSession`]: production session transport over TCP
//! - [`Server`]: bind/accept runtime wiring the two together

#![forbid(unsafe_code)]

mod error;
mod handler;
mod transport;

use std::sync::Arc;

pub use error::ServerError;
pub use handler::handle;
use pollwire_core::{IdSource, PollStore, UuidSource};
use pollwire_proto::Session;
use tokio::net::TcpListener;
pub use transport::TcpSession;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to (e.g. "0.0.0.0:2222").
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind_address: "0.0.0.0:2222".to_string() }
    }
}

/// Production poll server.
///
/// Owns the poll store and the id source; both are threaded into every
/// session handler rather than living in global state.
pub struct Server {
    listener: TcpListener,
    store: Arc<PollStore>,
    ids: Arc<dyn IdSource>,
}

impl Server {
    /// Create and bind a new server.
    pub async fn bind(config: &ServerConfig) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(&config.bind_address).await.map_err(|err| {
            ServerError::Config(format!("cannot bind '{}': {err}", config.bind_address))
        })?;

        Ok(Self {
            listener,
            store: Arc::new(PollStore::new()),
            ids: Arc::new(UuidSource::new()),
        })
    }

    /// Local address the server is bound to.
    pub fn local_addr(&self) -> Result<std::net::SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accept connections and handle sessions until the process ends.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            match self.listener.accept().await {
                Ok((stream, peer)) => {
                    tracing::debug!(%peer, "connection accepted");
                    let store = Arc::clone(&self.store);
                    let ids = Arc::clone(&self.ids);

                    tokio::spawn(async move {
                        match TcpSession::login(stream).await {
                            Ok(mut session) => {
                                tracing::info!(
                                    username = session.username(),
                                    %peer,
                                    "session started"
                                );
                                handle(&store, ids.as_ref(), &mut session).await;
                                tracing::info!(username = session.username(), "session ended");
                            },
                            Err(err) => {
                                tracing::debug!(%peer, %err, "login aborted");
                            },
                        }
                    });
                },
                Err(err) => {
                    tracing::error!(%err, "accept error");
                },
            }
        }
    }
}
