//! studynote application layer.
//!
//! Provides:
//! - Environment configuration and logging setup
//! - SQLite-backed storage with typed repositories per collection
//! - A Gemini text-generation client
//! - The pipeline turning notes into flash-card sets and tests

pub mod config;
pub mod db;
pub mod generation;
pub mod telemetry;

use anyhow::Context;
use config::AppConfig;
use db::SqliteStore;
use generation::{GeminiClient, StudyGenerator};
use studynote_core::Note;
use tracing::info;
use uuid::Uuid;

/// A new, unsaved note with a random id.
pub fn new_note() -> Note {
    Note::new(Uuid::new_v4().to_string())
}

/// Everything an application front end needs, wired from the environment.
pub struct Studio {
    pub config: AppConfig,
    pub store: SqliteStore,
    pub generator: StudyGenerator<GeminiClient>,
}

impl Studio {
    pub fn from_env() -> anyhow::Result<Self> {
        telemetry::init_tracing();

        let config = AppConfig::from_env().context("failed to load configuration")?;
        if let Some(parent) = config.db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let store = SqliteStore::open(&config.db_path)
            .with_context(|| format!("failed to open database {}", config.db_path.display()))?;
        let generator = StudyGenerator::new(GeminiClient::new(&config.gemini));

        if config.gemini.api_key.is_none() {
            info!("GEMINI_API_KEY not set, generation will produce error sets");
        }
        info!(db = %config.db_path.display(), "studio ready");

        Ok(Self {
            config,
            store,
            generator,
        })
    }
}
