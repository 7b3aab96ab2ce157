//! Flash-card and test generation through an external text generator.

pub mod client;
pub mod error;
pub mod pipeline;

pub use client::{GeminiClient, TextGenerator};
pub use error::GenerationError;
pub use pipeline::{GenerationRequest, StudyGenerator};
