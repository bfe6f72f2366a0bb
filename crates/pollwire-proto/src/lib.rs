//! Session boundary trait and line-oriented terminal protocol.
//!
//! The transport that authenticates a user and carries bytes (SSH, TCP, a
//! test script) lives outside this workspace's core; it plugs in behind the
//! [`Session`] trait. On top of that seam this crate implements the three
//! terminal operations the poll flows need:
//!
//! - [`read_key`]: one raw byte, no echo
//! - [`read_line`]: byte-at-a-time line editing with echo and backspace
//! - [`new_page`]: scroll old content out of view before redrawing a screen
//!
//! All failures surface as [`SessionError`] with the stream error attached;
//! a broken stream is fatal to its session and nothing here retries.

mod session;
mod term;

pub use session::Session;
pub use term::{BACKSPACE, ENTER, FORM_FEED, SessionError, new_page, read_key, read_line};
