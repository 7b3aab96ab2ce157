//! Generation error types.
//!
//! The display text of each variant is what an error set shows the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("No content to generate {0} from")]
    EmptyContent(&'static str),

    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API request failed: {status}")]
    Backend { status: u16, message: String },

    #[error("No text generated from API")]
    MissingText,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Failed to generate cards from the response")]
    NoCards,

    #[error("Failed to parse questions from the response")]
    NoQuestions,
}
