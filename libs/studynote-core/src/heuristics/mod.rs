//! Keyword and character-class heuristics for classifying note text.
//!
//! These are cheap guesses used to steer generation prompts, not real
//! language or topic detection.

pub mod language;
pub mod topic;

pub use language::{detect_language, Language};
pub use topic::{detect_topic, Topic};
