//! Prompt construction for the text-generation service.

use crate::codec::decode_str;
use crate::heuristics::Language;
use crate::types::Difficulty;

/// Question and answer line markers, without the trailing colon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prefixes {
    pub question: &'static str,
    pub answer: &'static str,
}

impl Prefixes {
    pub fn for_language(language: Language) -> Self {
        let (question, answer) = match language {
            Language::Estonian => ("K", "V"),
            Language::Spanish => ("P", "R"),
            Language::French => ("Q", "R"),
            Language::German => ("F", "A"),
            Language::Russian => ("В", "О"),
            Language::Chinese => ("问", "答"),
            Language::Japanese => ("質", "答"),
            _ => ("Q", "A"),
        };
        Self { question, answer }
    }
}

/// Flatten stored note content into prompt text.
///
/// Each text node contributes its non-empty run texts, each followed by a
/// space, and ends with a newline. Content that is not a stored document is
/// used as is.
pub fn extract_plain_text(content: &str) -> String {
    let doc = decode_str(content);
    let mut text = String::new();
    for runs in doc.text_nodes() {
        for run in runs.iter().filter(|run| !run.is_empty()) {
            text.push_str(&run.text);
            text.push(' ');
        }
        text.push('\n');
    }
    text
}

fn language_directive(kind: &str, language: Language) -> String {
    format!(
        "VERY IMPORTANT: You MUST generate the {kind} in EXACTLY THE SAME LANGUAGE as the original text.\n\
         The original text appears to be in {language}.\n\
         DO NOT translate to English or any other language. Keep the original language.\n"
    )
}

pub fn flash_card_prompt(
    text: &str,
    count: u32,
    difficulty: Difficulty,
    language: Language,
) -> String {
    let Prefixes { question, answer } = Prefixes::for_language(language);
    format!(
        "Create {count} flash cards based on the following text.\n\
         Each flash card should have a question on the front and the answer on the back.\n\
         Make the questions {difficulty} difficulty.\n\
         \n\
         {directive}\
         \n\
         Format each card as \"{question}: [question]\" on one line followed by \"{answer}: [answer]\" on the next line.\n\
         Leave a blank line between each card.\n\
         \n\
         Text: {text}",
        difficulty = difficulty.as_str(),
        directive = language_directive("flash cards", language),
    )
}

pub fn test_prompt(text: &str, count: u32, difficulty: Difficulty, language: Language) -> String {
    format!(
        "Create {count} multiple-choice questions based on the following text.\n\
         Each question should have 4 options with only one correct answer.\n\
         Make the questions {difficulty} difficulty.\n\
         \n\
         {directive}\
         \n\
         Format each question as:\n\
         Q: [question]\n\
         A: [option 1]\n\
         B: [option 2]\n\
         C: [option 3]\n\
         D: [option 4]\n\
         Correct: [A, B, C, or D]\n\
         \n\
         Leave a blank line between each question.\n\
         \n\
         Text: {text}",
        difficulty = difficulty.as_str(),
        directive = language_directive("questions", language),
    )
}
