//! Note-to-study-set pipeline.
//!
//! Extract text, classify it, prompt the generator, parse the reply and
//! persist the resulting set. Every failure along the way is turned into an
//! error set that is persisted and returned like a real one; only a failed
//! write reaches the caller.

use crate::db::{DbError, FlashCardRepository, KeyValueStore, NoteRepository, TestRepository};
use crate::generation::client::TextGenerator;
use crate::generation::error::GenerationError;
use chrono::{DateTime, Utc};
use studynote_core::study::{
    extract_plain_text, flash_card_prompt, parse_flash_cards, parse_test_questions, test_prompt,
    CardStrategy, Prefixes, SetOrigin,
};
use studynote_core::{
    detect_language, detect_topic, Difficulty, FlashCardSet, Language, Note, TestSet, Topic,
};
use tracing::{error, info, warn};

/// What to generate from which note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub note_id: String,
    pub title: String,
    /// Stored note content.
    pub content: String,
    pub count: u32,
    pub difficulty: Difficulty,
}

impl GenerationRequest {
    pub fn from_note(note: &Note, count: u32, difficulty: Difficulty) -> Self {
        Self {
            note_id: note.id.clone(),
            title: note.title.clone(),
            content: note.content.clone(),
            count,
            difficulty,
        }
    }

    fn origin(
        &self,
        topic: Topic,
        language: Language,
        created_at: DateTime<Utc>,
    ) -> SetOrigin<'_> {
        SetOrigin {
            note_id: &self.note_id,
            title: &self.title,
            topic,
            language,
            created_at,
        }
    }

    fn error_origin(&self, created_at: DateTime<Utc>) -> SetOrigin<'_> {
        self.origin(Topic::General, Language::English, created_at)
    }
}

/// Classified prompt text ready to send.
struct Source {
    text: String,
    topic: Topic,
    language: Language,
}

impl Source {
    fn extract(request: &GenerationRequest, kind: &'static str) -> Result<Self, GenerationError> {
        let text = extract_plain_text(&request.content);
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyContent(kind));
        }
        let topic = detect_topic(&text);
        let language = detect_language(&text);
        info!(note_id = %request.note_id, %topic, %language, "generating {kind}");
        Ok(Self {
            text,
            topic,
            language,
        })
    }
}

fn save_before_generating<S>(store: &S, note: &mut Note) -> Result<(), DbError>
where
    S: KeyValueStore + ?Sized,
{
    note.prepare_for_save(Utc::now());
    store.save_note(note)
}

pub struct StudyGenerator<G> {
    generator: G,
}

impl<G: TextGenerator> StudyGenerator<G> {
    pub fn new(generator: G) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &G {
        &self.generator
    }

    /// Save `note` (normalised title, fresh timestamp), then generate flash
    /// cards from the saved copy.
    pub async fn flash_cards_for_note<S>(
        &self,
        store: &S,
        note: &mut Note,
        count: u32,
        difficulty: Difficulty,
    ) -> Result<FlashCardSet, DbError>
    where
        S: KeyValueStore + ?Sized,
    {
        save_before_generating(store, note)?;
        let request = GenerationRequest::from_note(note, count, difficulty);
        self.flash_cards(store, &request).await
    }

    /// Save `note`, then generate a test from the saved copy.
    pub async fn test_for_note<S>(
        &self,
        store: &S,
        note: &mut Note,
        count: u32,
        difficulty: Difficulty,
    ) -> Result<TestSet, DbError>
    where
        S: KeyValueStore + ?Sized,
    {
        save_before_generating(store, note)?;
        let request = GenerationRequest::from_note(note, count, difficulty);
        self.test_questions(store, &request).await
    }

    /// Generate, persist and return a flash-card set for the request.
    pub async fn flash_cards<S>(
        &self,
        store: &S,
        request: &GenerationRequest,
    ) -> Result<FlashCardSet, DbError>
    where
        S: KeyValueStore + ?Sized,
    {
        let now = Utc::now();
        let set = match self.draft_flash_cards(request, now).await {
            Ok(set) => {
                info!(set_id = %set.id, cards = set.cards.len(), "flash cards generated");
                set
            }
            Err(err) => {
                error!(note_id = %request.note_id, error = %err, "flash card generation failed");
                request.error_origin(now).flash_card_error_set(&err.to_string())
            }
        };
        store.append_flash_card_set(&set)?;
        Ok(set)
    }

    /// Generate, persist and return a multiple-choice test for the request.
    pub async fn test_questions<S>(
        &self,
        store: &S,
        request: &GenerationRequest,
    ) -> Result<TestSet, DbError>
    where
        S: KeyValueStore + ?Sized,
    {
        let now = Utc::now();
        let set = match self.draft_test(request, now).await {
            Ok(set) => {
                info!(set_id = %set.id, questions = set.questions.len(), "test generated");
                set
            }
            Err(err) => {
                error!(note_id = %request.note_id, error = %err, "test generation failed");
                request.error_origin(now).test_error_set(&err.to_string())
            }
        };
        store.append_test_set(&set)?;
        Ok(set)
    }

    async fn draft_flash_cards(
        &self,
        request: &GenerationRequest,
        now: DateTime<Utc>,
    ) -> Result<FlashCardSet, GenerationError> {
        let source = Source::extract(request, "flash cards")?;
        let prompt = flash_card_prompt(
            &source.text,
            request.count,
            request.difficulty,
            source.language,
        );
        let reply = self.generator.generate(&prompt).await?;

        let parsed = parse_flash_cards(&reply, Prefixes::for_language(source.language));
        if parsed.strategy != CardStrategy::Prefixed {
            warn!(strategy = ?parsed.strategy, "no marked question/answer pairs, used fallback");
        }
        if parsed.cards.is_empty() {
            return Err(GenerationError::NoCards);
        }

        Ok(request
            .origin(source.topic, source.language, now)
            .flash_card_set(parsed.cards))
    }

    async fn draft_test(
        &self,
        request: &GenerationRequest,
        now: DateTime<Utc>,
    ) -> Result<TestSet, GenerationError> {
        let source = Source::extract(request, "test questions")?;
        let prompt = test_prompt(
            &source.text,
            request.count,
            request.difficulty,
            source.language,
        );
        let reply = self.generator.generate(&prompt).await?;

        let questions = parse_test_questions(&reply);
        if questions.is_empty() {
            return Err(GenerationError::NoQuestions);
        }

        Ok(request
            .origin(source.topic, source.language, now)
            .test_set(questions))
    }
}
