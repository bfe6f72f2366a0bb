//! In-memory poll registry and vote state machine.
//!
//! This crate holds the server-side poll state: the [`PollStore`] registry,
//! the [`Poll`] aggregate (answers, voters, counts), and vote input parsing.
//! Everything lives in process memory for the process lifetime - there is no
//! persistence layer by design.
//!
//! # Concurrency
//!
//! The store uses a readers-writer lock: lookups run concurrently, insertion
//! excludes everything else. Each poll guards its mutable vote state (counts
//! and voter list) with its own lock, so operations on different polls never
//! contend. Voter creation and count mutation for one vote happen inside a
//! single critical section ([`Poll::cast_vote`]), which keeps the core
//! invariant linearizable: every answer's count equals the number of
//! selections currently pointing at it.
//!
//! # Components
//!
//! - [`PollStore`]: append-only registry, GUID lookup
//! - [`Poll`]: one poll's answers, voters, and counts
//! - [`parse_selection`]: all-or-nothing vote input validation
//! - [`IdSource`]: injected GUID generation ([`UuidSource`] in production)

mod ids;
mod poll;
mod store;
mod vote;

pub use ids::{IdSource, UuidSource};
pub use poll::{Answer, AnswerTally, Poll, PollResults, VoteStatus};
pub use store::PollStore;
pub use vote::{VoteError, parse_selection};
