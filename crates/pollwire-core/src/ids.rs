//! Injected identifier generation.
//!
//! Polls and answers are keyed by GUIDs handed out by an [`IdSource`]. The
//! trait keeps id generation at the seam: production uses [`UuidSource`],
//! tests can substitute a deterministic source. Uniqueness is assumed from
//! the source, not re-checked by the store.

/// Source of globally unique identifiers.
pub trait IdSource: Send + Sync {
    /// Produce the next unique id.
    fn next_id(&self) -> String;
}

/// Production id source backed by random (v4) UUIDs.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidSource;

impl UuidSource {
    /// Create a new UUID source.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl IdSource for UuidSource {
    fn next_id(&self) -> String {
        uuid::Uuid::new_v4().to_string()
    }
}
