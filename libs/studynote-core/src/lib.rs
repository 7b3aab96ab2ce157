//! Core note-taking and study library shared by the studynote application.
//!
//! Provides:
//! - Rich-text document model and its JSON storage codec
//! - Pure mark and block toggles over a selection
//! - Plain-text previews for note lists
//! - Topic and language heuristics
//! - Prompt construction and response parsing for flash cards and tests
//! - Shared record types (Note, Group, FlashCardSet, TestSet, etc.)

pub mod codec;
pub mod document;
pub mod error;
pub mod heuristics;
pub mod snippet;
pub mod study;
pub mod toggle;
pub mod types;

pub use codec::{decode, decode_str, encode};
pub use document::{
    Block, Document, HeadingLevel, HighlightColor, ListItem, ListKind, Mark, TextRun,
};
pub use error::{CoreError, Result};
pub use heuristics::{detect_language, detect_topic, Language, Topic};
pub use snippet::{snippet, DEFAULT_SNIPPET_LEN};
pub use toggle::{
    is_block_active, is_mark_active, toggle_block, toggle_mark, BlockFormat, MarkFormat, Point,
    Selection,
};
pub use types::{
    Difficulty, FlashCard, FlashCardSet, FlashCardStats, Group, Note, TestQuestion, TestScore,
    TestSet, UNTITLED_NOTE,
};
