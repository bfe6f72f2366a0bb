//! Poll registry shared by all sessions.
//!
//! Append-only: polls are added once, fully formed, and live for the process
//! lifetime. Lookup is a linear scan by GUID - the store is small and scan
//! cost is dominated by terminal round-trips. Readers-writer discipline:
//! concurrent lookups run in parallel, insertion excludes everything.
//!
//! The store is owned by one server instance and threaded into each session
//! handler as an argument; there is deliberately no global registry.

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::poll::Poll;

/// Registry of all polls, keyed by GUID.
#[derive(Debug, Default)]
pub struct PollStore {
    polls: RwLock<Vec<Arc<Poll>>>,
}

impl PollStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a fully-constructed poll and return the shared handle.
    ///
    /// No duplicate-GUID check: uniqueness is assumed from the injected id
    /// source. The poll is visible to `get` calls from any session as soon
    /// as this returns.
    pub async fn add(&self, poll: Poll) -> Arc<Poll> {
        let poll = Arc::new(poll);
        let mut polls = self.polls.write().await;
        polls.push(Arc::clone(&poll));
        tracing::info!(poll = %poll.id(), title = %poll.title(), "poll added");
        poll
    }

    /// Look up a poll by GUID.
    ///
    /// `None` is a normal outcome (unknown or mistyped GUID), not an error.
    /// The returned handle shares state with every other holder; votes cast
    /// through it are visible to all.
    pub async fn get(&self, guid: &str) -> Option<Arc<Poll>> {
        let polls = self.polls.read().await;
        polls.iter().find(|p| p.id() == guid).cloned()
    }

    /// Number of polls in the store.
    pub async fn len(&self) -> usize {
        self.polls.read().await.len()
    }

    /// Whether the store holds no polls.
    pub async fn is_empty(&self) -> bool {
        self.polls.read().await.is_empty()
    }
}
