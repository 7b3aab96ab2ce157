//! Error types for studynote-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the editing and generation helpers.
///
/// Decoding stored documents never fails; malformed content is recovered
/// by wrapping it as plain text instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("selection point is outside the document: block {block}, item {item:?}")]
    InvalidSelection { block: usize, item: Option<usize> },

    #[error("offset {offset} is past the end of block {block}, item {item:?}")]
    InvalidOffset {
        block: usize,
        item: Option<usize>,
        offset: usize,
    },

    #[error("invalid difficulty level {0}, expected 0, 1 or 2")]
    InvalidDifficulty(u8),
}
