//! Study material generation helpers: prompts, response parsers and the
//! sets built from them.
//!
//! Nothing here performs I/O. The application layer sends the prompt,
//! hands the reply to a parser and persists whichever set comes back.

pub mod cards;
pub mod prompt;
pub mod questions;

pub use cards::{parse_flash_cards, CardStrategy, ParsedCards};
pub use prompt::{extract_plain_text, flash_card_prompt, test_prompt, Prefixes};
pub use questions::parse_test_questions;

use crate::heuristics::{Language, Topic};
use crate::types::{FlashCard, FlashCardSet, TestQuestion, TestSet};
use chrono::{DateTime, Utc};

/// Set title used when the source note has none.
pub const UNTITLED_SET: &str = "Untitled Note";

/// Where a generated set came from and what it was classified as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetOrigin<'a> {
    pub note_id: &'a str,
    pub title: &'a str,
    pub topic: Topic,
    pub language: Language,
    pub created_at: DateTime<Utc>,
}

impl SetOrigin<'_> {
    /// `note-<note id>-<unix millis>`.
    pub fn set_id(&self) -> String {
        format!("note-{}-{}", self.note_id, self.created_at.timestamp_millis())
    }

    pub fn set_title(&self) -> String {
        if self.title.trim().is_empty() {
            UNTITLED_SET.to_string()
        } else {
            self.title.to_string()
        }
    }

    fn error_title(&self) -> String {
        format!("{} (Error)", self.set_title())
    }

    pub fn flash_card_set(&self, cards: Vec<FlashCard>) -> FlashCardSet {
        FlashCardSet {
            id: self.set_id(),
            title: self.set_title(),
            cards,
            source: Some(self.note_id.to_string()),
            topic: Some(self.topic),
            language: Some(self.language),
        }
    }

    pub fn test_set(&self, questions: Vec<TestQuestion>) -> TestSet {
        TestSet {
            id: self.set_id(),
            title: self.set_title(),
            questions,
            source: Some(self.note_id.to_string()),
            topic: Some(self.topic),
            language: Some(self.language),
        }
    }

    /// Single-card set standing in for a failed generation. Topic and
    /// language are reset to `General` and `English`.
    pub fn flash_card_error_set(&self, message: &str) -> FlashCardSet {
        FlashCardSet {
            id: self.set_id(),
            title: self.error_title(),
            cards: vec![FlashCard::new(
                1,
                "Error generating flash cards",
                format!("There was an error: {message}. Please try again later."),
            )],
            source: Some(self.note_id.to_string()),
            topic: Some(Topic::General),
            language: Some(Language::English),
        }
    }

    /// Single-question set standing in for a failed generation.
    pub fn test_error_set(&self, message: &str) -> TestSet {
        TestSet {
            id: self.set_id(),
            title: self.error_title(),
            questions: vec![TestQuestion {
                id: 1,
                question: "Error generating test questions".to_string(),
                options: vec![
                    format!("There was an error: {message}"),
                    "Please try again later".to_string(),
                    "Check your note content".to_string(),
                    "Contact support if the issue persists".to_string(),
                ],
                correct_answer: 0,
            }],
            source: Some(self.note_id.to_string()),
            topic: Some(Topic::General),
            language: Some(Language::English),
        }
    }
}
