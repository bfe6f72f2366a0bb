//! Poll aggregate: answers, voters, and vote counts.
//!
//! A [`Poll`] is created fully formed (title plus final answer list) and then
//! never changes shape: answers are fixed in number, text, and order, so a
//! voter's selection is stored as indices into that sequence. Only the vote
//! counts and the voter list mutate, and both sit behind one per-poll lock.
//!
//! Voter lookup/creation and count mutation for a single vote run inside the
//! same critical section ([`Poll::cast_vote`]). Exposing them as separately
//! locked steps would let two voters interleave their decrement/increment
//! sequences and corrupt the counts.

use tokio::sync::Mutex;

use crate::vote::VoteError;

/// One answer of a poll: immutable identity only.
///
/// The mutable vote count lives in the poll's ledger, keyed by this answer's
/// position in the poll's answer sequence.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Globally unique answer id.
    pub id: String,
    /// Answer text as entered at creation.
    pub text: String,
}

impl Answer {
    /// Create an answer.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into() }
    }
}

/// Whether a voter has cast a vote on a poll yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteStatus {
    /// No selection recorded for this voter.
    Unvoted,
    /// A selection is recorded; the voter sees results instead of a prompt.
    Voted,
}

/// One voter's record within a poll.
///
/// Created lazily on the voter's first check-in and never removed. The
/// username is unique within the poll, not globally.
#[derive(Debug)]
struct Voter {
    username: String,
    /// `None` until the first vote; indices into the poll's answer sequence.
    selection: Option<Vec<usize>>,
}

/// Mutable vote state of a poll, guarded as one unit.
#[derive(Debug)]
struct Ledger {
    /// Vote count per answer, parallel to the answer sequence.
    counts: Vec<u64>,
    /// Append-only, in order of first check-in.
    voters: Vec<Voter>,
}

impl Ledger {
    /// Position of a voter by name, if already present.
    fn find(&self, username: &str) -> Option<usize> {
        self.voters.iter().position(|v| v.username == username)
    }

    /// Find or append a voter, returning its position.
    fn find_or_create(&mut self, username: &str) -> usize {
        if let Some(pos) = self.find(username) {
            return pos;
        }
        self.voters.push(Voter { username: username.to_string(), selection: None });
        self.voters.len() - 1
    }
}

/// Snapshot of one answer for rendering: text plus current count.
#[derive(Debug, Clone)]
pub struct AnswerTally {
    /// Answer text.
    pub text: String,
    /// Votes currently pointing at this answer.
    pub votes: u64,
}

/// Consistent read of a poll's displayable state.
///
/// Taken under the poll lock so counts and voter list agree with each other.
#[derive(Debug, Clone)]
pub struct PollResults {
    /// Poll title.
    pub title: String,
    /// Username of the creator.
    pub created_by: String,
    /// Answers in display order with their counts.
    pub answers: Vec<AnswerTally>,
    /// Usernames of everyone who has opened the poll, in check-in order.
    pub voters: Vec<String>,
}

/// A poll: immutable identity and answers, plus locked vote state.
#[derive(Debug)]
pub struct Poll {
    id: String,
    title: String,
    multiselect: bool,
    created_by: String,
    answers: Vec<Answer>,
    ledger: Mutex<Ledger>,
}

impl Poll {
    /// Create a poll fully formed. The answer list is final.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        multiselect: bool,
        created_by: impl Into<String>,
        answers: Vec<Answer>,
    ) -> Self {
        let counts = vec![0; answers.len()];
        Self {
            id: id.into(),
            title: title.into(),
            multiselect,
            created_by: created_by.into(),
            answers,
            ledger: Mutex::new(Ledger { counts, voters: Vec::new() }),
        }
    }

    /// Globally unique poll id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Poll title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Whether voters may select more than one answer.
    pub fn multiselect(&self) -> bool {
        self.multiselect
    }

    /// Username of the creator.
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    /// Number of answers; valid vote indices are `[0, answer_count)`.
    pub fn answer_count(&self) -> usize {
        self.answers.len()
    }

    /// Record that `username` opened this poll and report their vote status.
    ///
    /// Finds or lazily creates the voter under the poll lock, so concurrent
    /// check-ins with the same username still create exactly one voter.
    pub async fn checkin(&self, username: &str) -> VoteStatus {
        let mut ledger = self.ledger.lock().await;
        let pos = ledger.find_or_create(username);
        if ledger.voters[pos].selection.is_some() {
            VoteStatus::Voted
        } else {
            VoteStatus::Unvoted
        }
    }

    /// Replace `username`'s selection with `selection` and update counts.
    ///
    /// One critical section covers voter lookup/creation, the decrement of
    /// any previous selection, and the increment of the new one, so votes on
    /// one poll are linearizable. The update is general enough for revotes:
    /// casting `{0}` then `{1}` nets out to having only ever selected `{1}`.
    ///
    /// Indices are range-checked before anything mutates; an out-of-range
    /// index rejects the whole vote (all-or-nothing).
    pub async fn cast_vote(&self, username: &str, selection: Vec<usize>) -> Result<(), VoteError> {
        let mut ledger = self.ledger.lock().await;

        for &index in &selection {
            if index >= self.answers.len() {
                return Err(VoteError::OutOfBounds { token: index.to_string() });
            }
        }

        let pos = ledger.find_or_create(username);

        if let Some(previous) = ledger.voters[pos].selection.take() {
            for index in previous {
                ledger.counts[index] -= 1;
            }
        }
        for &index in &selection {
            ledger.counts[index] += 1;
        }
        ledger.voters[pos].selection = Some(selection);

        tracing::debug!(poll = %self.id, voter = username, "vote recorded");
        Ok(())
    }

    /// Take a consistent snapshot of the poll for rendering.
    pub async fn results(&self) -> PollResults {
        let ledger = self.ledger.lock().await;
        PollResults {
            title: self.title.clone(),
            created_by: self.created_by.clone(),
            answers: self
                .answers
                .iter()
                .zip(&ledger.counts)
                .map(|(answer, &votes)| AnswerTally { text: answer.text.clone(), votes })
                .collect(),
            voters: ledger.voters.iter().map(|v| v.username.clone()).collect(),
        }
    }
}
