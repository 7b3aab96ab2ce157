//! Shared fixtures for integration tests.
//!
//! - `ScriptedGenerator` replays canned replies and records every prompt
//! - Note builders and sample generator replies

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use studynote::generation::{GenerationError, TextGenerator};
use studynote_core::{Block, Document, Note};

/// Generator double returning queued replies in order.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, GenerationError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn replying(reply: &str) -> Self {
        Self::default().then(Ok(reply.to_string()))
    }

    pub fn failing(err: GenerationError) -> Self {
        Self::default().then(Err(err))
    }

    pub fn then(self, reply: Result<String, GenerationError>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GenerationError::MissingText))
    }
}

/// Note whose document has one paragraph per entry of `paragraphs`.
pub fn note(id: &str, title: &str, paragraphs: &[&str]) -> Note {
    let mut note = Note::new(id);
    note.title = title.to_string();
    note.set_document(&Document::new(
        paragraphs.iter().map(|text| Block::paragraph(*text)).collect(),
    ));
    note
}

/// Note stamped with a fixed modification time in seconds.
pub fn note_at(id: &str, title: &str, seconds: i64) -> Note {
    let mut note = note(id, title, &["body"]);
    note.last_modified = Utc.timestamp_opt(seconds, 0).unwrap();
    note
}

pub const BIOLOGY_TEXT: &str =
    "The mitochondria is the powerhouse of the cell, and DNA carries genes";

pub const CARD_REPLY: &str = "Q: What is the powerhouse of the cell?\n\
A: The mitochondria\n\
\n\
Q: What carries genes?\n\
A: DNA";

pub const TEST_REPLY: &str = "Q: What is 2+2?\n\
A: 3\n\
B: 4\n\
C: 5\n\
D: 6\n\
Correct: B\n\
\n\
Q: What is 3+3?\n\
A: 6\n\
B: 7\n\
C: 8\n\
D: 9\n\
Correct: A";
