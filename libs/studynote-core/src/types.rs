//! Persisted records shared by the store and the generation pipeline.
//!
//! Field names serialise in camelCase so existing browser storage dumps load
//! unchanged.

use crate::codec::{decode_str, encode};
use crate::document::Document;
use crate::error::{CoreError, Result};
use crate::heuristics::{Language, Topic};
use crate::snippet::{snippet, DEFAULT_SNIPPET_LEN};
use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

/// Title given to notes saved without one.
pub const UNTITLED_NOTE: &str = "(No title)";

/// A user note. `content` holds the encoded [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub last_modified: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub groups: Vec<String>,
}

impl Note {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            content: encode(&Document::empty()),
            last_modified: Utc::now().trunc_subsecs(3),
            tags: Vec::new(),
            groups: Vec::new(),
        }
    }

    pub fn document(&self) -> Document {
        decode_str(&self.content)
    }

    pub fn set_document(&mut self, doc: &Document) {
        self.content = encode(doc);
    }

    pub fn snippet(&self) -> String {
        snippet(&self.content, DEFAULT_SNIPPET_LEN)
    }

    /// Normalise the title and stamp the modification time.
    ///
    /// Stored timestamps carry millisecond precision, so `now` is truncated
    /// to whole milliseconds.
    pub fn prepare_for_save(&mut self, now: DateTime<Utc>) {
        let trimmed = self.title.trim();
        self.title = if trimmed.is_empty() {
            UNTITLED_NOTE.to_string()
        } else {
            trimmed.to_string()
        };
        self.last_modified = now.trunc_subsecs(3);
    }

    /// Case-insensitive match against the title, preview text and tags.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.title.to_lowercase().contains(&query)
            || self.snippet().to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }

    pub fn in_group(&self, group_id: &str) -> bool {
        self.groups.iter().any(|g| g == group_id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: Self::id_for(&name),
            name,
            color: None,
        }
    }

    /// Lowercased name with every whitespace run replaced by one `-`.
    pub fn id_for(name: &str) -> String {
        let mut id = String::with_capacity(name.len());
        let mut in_space = false;
        for c in name.to_lowercase().chars() {
            if c.is_whitespace() {
                if !in_space {
                    id.push('-');
                }
                in_space = true;
            } else {
                id.push(c);
                in_space = false;
            }
        }
        id
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCard {
    pub id: u32,
    pub front: String,
    pub back: String,
}

impl FlashCard {
    pub fn new(id: u32, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id,
            front: front.into(),
            back: back.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashCardSet {
    pub id: String,
    pub title: String,
    pub cards: Vec<FlashCard>,
    /// Id of the note the set was generated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestQuestion {
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`.
    pub correct_answer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestSet {
    pub id: String,
    pub title: String,
    pub questions: Vec<TestQuestion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Topic>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

/// Result of grading one pass through a test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestScore {
    pub correct: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

impl TestSet {
    /// Grade `answers`, where `answers[i]` is the option picked for question `i`.
    /// Missing or unanswered entries count as wrong.
    pub fn score(&self, answers: &[Option<usize>]) -> TestScore {
        let total = self.questions.len();
        let correct = self
            .questions
            .iter()
            .zip(answers)
            .filter(|(question, answer)| **answer == Some(question.correct_answer))
            .count();
        let percentage = if total == 0 {
            0
        } else {
            (correct as f64 * 100.0 / total as f64).round() as u32
        };
        TestScore {
            correct,
            total,
            percentage,
        }
    }
}

/// Per-set review outcome. A card id is in at most one of the two lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashCardStats {
    #[serde(default)]
    pub remembered: Vec<u32>,
    #[serde(default)]
    pub not_remembered: Vec<u32>,
}

impl FlashCardStats {
    pub fn mark_remembered(&mut self, card_id: u32) {
        if !self.remembered.contains(&card_id) {
            self.remembered.push(card_id);
        }
        self.not_remembered.retain(|&id| id != card_id);
    }

    pub fn mark_not_remembered(&mut self, card_id: u32) {
        if !self.not_remembered.contains(&card_id) {
            self.not_remembered.push(card_id);
        }
        self.remembered.retain(|&id| id != card_id);
    }

    pub fn remembered_count(&self) -> usize {
        self.remembered.len()
    }

    pub fn not_remembered_count(&self) -> usize {
        self.not_remembered.len()
    }
}

/// Requested question difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

impl Difficulty {
    /// Map the slider level (0, 1, 2) to a difficulty.
    pub fn from_level(level: u8) -> Result<Self> {
        match level {
            0 => Ok(Self::Easy),
            1 => Ok(Self::Medium),
            2 => Ok(Self::Hard),
            other => Err(CoreError::InvalidDifficulty(other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }
}
