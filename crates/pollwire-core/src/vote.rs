//! Vote input validation.
//!
//! Turns the raw line a voter typed into a validated selection of answer
//! indices. Validation is all-or-nothing: every token is parsed and
//! range-checked before the caller applies anything, so a bad token rejects
//! the whole attempt without touching any count.

/// Errors from vote input validation and vote application.
///
/// Rendered verbatim to the voter's terminal, so the messages are plain
/// user-facing text rather than developer diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum VoteError {
    /// A token was not a base-10 integer.
    #[error("{token} is no valid number: {source}")]
    InvalidNumber {
        /// The offending input token.
        token: String,
        /// The underlying parse failure.
        source: std::num::ParseIntError,
    },

    /// A token parsed but named an answer index outside the poll.
    #[error("{token} is out of bounds")]
    OutOfBounds {
        /// The offending input token.
        token: String,
    },
}

/// Parse a vote input line into a selection of answer indices.
///
/// Single-select polls accept exactly one token; multiselect polls accept a
/// comma-separated list. Tokens are not trimmed, and duplicates in a
/// multiselect list are kept: a repeated index counts once per occurrence.
///
/// Every token must be a base-10 integer in `[0, answer_count)`; the first
/// failure rejects the entire input.
pub fn parse_selection(
    input: &str,
    multiselect: bool,
    answer_count: usize,
) -> Result<Vec<usize>, VoteError> {
    if multiselect {
        input.split(',').map(|token| parse_index(token, answer_count)).collect()
    } else {
        Ok(vec![parse_index(input, answer_count)?])
    }
}

/// Parse one token into an in-range answer index.
fn parse_index(token: &str, answer_count: usize) -> Result<usize, VoteError> {
    let index: i64 = token
        .parse()
        .map_err(|source| VoteError::InvalidNumber { token: token.to_string(), source })?;

    if index < 0 || index as usize >= answer_count {
        return Err(VoteError::OutOfBounds { token: token.to_string() });
    }

    Ok(index as usize)
}
