//! Typed repositories over any [`KeyValueStore`].
//!
//! Each method loads the whole namespace, changes it in memory and writes it
//! back. Concurrent writers race and the last write wins.

use crate::db::error::DbError;
use crate::db::store::{namespace, KeyValueStore};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use studynote_core::{FlashCardSet, FlashCardStats, Group, Note, TestSet};
use tracing::debug;

type Result<T> = std::result::Result<T, DbError>;

fn load<S, T>(store: &S, namespace: &str) -> Result<T>
where
    S: KeyValueStore + ?Sized,
    T: DeserializeOwned + Default,
{
    match store.get(namespace)? {
        Some(raw) => serde_json::from_str(&raw).map_err(|source| DbError::InvalidData {
            namespace: namespace.to_string(),
            source,
        }),
        None => Ok(T::default()),
    }
}

fn save<S, T>(store: &S, namespace: &str, value: &T) -> Result<()>
where
    S: KeyValueStore + ?Sized,
    T: Serialize + ?Sized,
{
    let raw = serde_json::to_string(value).map_err(|source| DbError::InvalidData {
        namespace: namespace.to_string(),
        source,
    })?;
    store.set(namespace, &raw)?;
    debug!(namespace, bytes = raw.len(), "saved namespace");
    Ok(())
}

/// Repository for note operations.
pub trait NoteRepository {
    fn load_notes(&self) -> Result<Vec<Note>>;
    fn save_notes(&self, notes: &[Note]) -> Result<()>;
    fn get_note(&self, id: &str) -> Result<Option<Note>>;
    /// Replace the note with the same id in place, or insert it first.
    fn save_note(&self, note: &Note) -> Result<()>;
    fn delete_note(&self, id: &str) -> Result<()>;
    fn delete_notes(&self, ids: &[String]) -> Result<()>;
    /// Most recently modified first.
    fn recent_notes(&self, count: usize) -> Result<Vec<Note>>;
    fn search_notes(&self, query: &str) -> Result<Vec<Note>>;
}

impl<S: KeyValueStore + ?Sized> NoteRepository for S {
    fn load_notes(&self) -> Result<Vec<Note>> {
        load(self, namespace::NOTES)
    }

    fn save_notes(&self, notes: &[Note]) -> Result<()> {
        save(self, namespace::NOTES, notes)
    }

    fn get_note(&self, id: &str) -> Result<Option<Note>> {
        Ok(self.load_notes()?.into_iter().find(|note| note.id == id))
    }

    fn save_note(&self, note: &Note) -> Result<()> {
        let mut notes = self.load_notes()?;
        match notes.iter_mut().find(|existing| existing.id == note.id) {
            Some(existing) => *existing = note.clone(),
            None => notes.insert(0, note.clone()),
        }
        self.save_notes(&notes)
    }

    fn delete_note(&self, id: &str) -> Result<()> {
        let mut notes = self.load_notes()?;
        notes.retain(|note| note.id != id);
        self.save_notes(&notes)
    }

    fn delete_notes(&self, ids: &[String]) -> Result<()> {
        let mut notes = self.load_notes()?;
        notes.retain(|note| !ids.contains(&note.id));
        self.save_notes(&notes)
    }

    fn recent_notes(&self, count: usize) -> Result<Vec<Note>> {
        Ok(most_recent(self.load_notes()?, count))
    }

    fn search_notes(&self, query: &str) -> Result<Vec<Note>> {
        let mut notes = self.load_notes()?;
        notes.retain(|note| note.matches_query(query));
        Ok(notes)
    }
}

fn most_recent(mut notes: Vec<Note>, count: usize) -> Vec<Note> {
    notes.sort_by(|a, b| b.last_modified.cmp(&a.last_modified));
    notes.truncate(count);
    notes
}

/// Repository for group operations.
pub trait GroupRepository {
    fn load_groups(&self) -> Result<Vec<Group>>;
    fn save_groups(&self, groups: &[Group]) -> Result<()>;
    /// Create a group, or return the existing one with the same derived id.
    fn add_group(&self, name: &str) -> Result<Group>;
    /// Remove the group and its id from every note.
    fn delete_group(&self, id: &str) -> Result<()>;
    fn notes_for_group(&self, id: &str) -> Result<Vec<Note>>;
    fn recent_notes_for_group(&self, id: &str, count: usize) -> Result<Vec<Note>>;
}

impl<S: KeyValueStore + ?Sized> GroupRepository for S {
    fn load_groups(&self) -> Result<Vec<Group>> {
        load(self, namespace::GROUPS)
    }

    fn save_groups(&self, groups: &[Group]) -> Result<()> {
        save(self, namespace::GROUPS, groups)
    }

    fn add_group(&self, name: &str) -> Result<Group> {
        let mut groups = self.load_groups()?;
        let id = Group::id_for(name);
        if let Some(existing) = groups.iter().find(|group| group.id == id) {
            return Ok(existing.clone());
        }
        let group = Group::new(name);
        groups.push(group.clone());
        self.save_groups(&groups)?;
        Ok(group)
    }

    fn delete_group(&self, id: &str) -> Result<()> {
        let mut groups = self.load_groups()?;
        groups.retain(|group| group.id != id);
        self.save_groups(&groups)?;

        let mut notes = self.load_notes()?;
        for note in &mut notes {
            note.groups.retain(|group| group != id);
        }
        self.save_notes(&notes)
    }

    fn notes_for_group(&self, id: &str) -> Result<Vec<Note>> {
        let mut notes = self.load_notes()?;
        notes.retain(|note| note.in_group(id));
        Ok(notes)
    }

    fn recent_notes_for_group(&self, id: &str, count: usize) -> Result<Vec<Note>> {
        Ok(most_recent(self.notes_for_group(id)?, count))
    }
}

/// Repository for generated flash-card sets.
pub trait FlashCardRepository {
    fn load_flash_card_sets(&self) -> Result<Vec<FlashCardSet>>;
    fn save_flash_card_sets(&self, sets: &[FlashCardSet]) -> Result<()>;
    fn append_flash_card_set(&self, set: &FlashCardSet) -> Result<()>;
    fn get_flash_card_set(&self, id: &str) -> Result<Option<FlashCardSet>>;
    fn search_flash_card_sets(&self, query: &str) -> Result<Vec<FlashCardSet>>;
}

impl<S: KeyValueStore + ?Sized> FlashCardRepository for S {
    fn load_flash_card_sets(&self) -> Result<Vec<FlashCardSet>> {
        load(self, namespace::FLASH_CARD_SETS)
    }

    fn save_flash_card_sets(&self, sets: &[FlashCardSet]) -> Result<()> {
        save(self, namespace::FLASH_CARD_SETS, sets)
    }

    fn append_flash_card_set(&self, set: &FlashCardSet) -> Result<()> {
        let mut sets = self.load_flash_card_sets()?;
        sets.push(set.clone());
        self.save_flash_card_sets(&sets)
    }

    fn get_flash_card_set(&self, id: &str) -> Result<Option<FlashCardSet>> {
        Ok(self.load_flash_card_sets()?.into_iter().find(|set| set.id == id))
    }

    fn search_flash_card_sets(&self, query: &str) -> Result<Vec<FlashCardSet>> {
        let query = query.to_lowercase();
        let mut sets = self.load_flash_card_sets()?;
        sets.retain(|set| set.title.to_lowercase().contains(&query));
        Ok(sets)
    }
}

/// Repository for generated test sets.
pub trait TestRepository {
    fn load_test_sets(&self) -> Result<Vec<TestSet>>;
    fn save_test_sets(&self, sets: &[TestSet]) -> Result<()>;
    fn append_test_set(&self, set: &TestSet) -> Result<()>;
    fn get_test_set(&self, id: &str) -> Result<Option<TestSet>>;
    fn search_test_sets(&self, query: &str) -> Result<Vec<TestSet>>;
}

impl<S: KeyValueStore + ?Sized> TestRepository for S {
    fn load_test_sets(&self) -> Result<Vec<TestSet>> {
        load(self, namespace::TEST_SETS)
    }

    fn save_test_sets(&self, sets: &[TestSet]) -> Result<()> {
        save(self, namespace::TEST_SETS, sets)
    }

    fn append_test_set(&self, set: &TestSet) -> Result<()> {
        let mut sets = self.load_test_sets()?;
        sets.push(set.clone());
        self.save_test_sets(&sets)
    }

    fn get_test_set(&self, id: &str) -> Result<Option<TestSet>> {
        Ok(self.load_test_sets()?.into_iter().find(|set| set.id == id))
    }

    fn search_test_sets(&self, query: &str) -> Result<Vec<TestSet>> {
        let query = query.to_lowercase();
        let mut sets = self.load_test_sets()?;
        sets.retain(|set| set.title.to_lowercase().contains(&query));
        Ok(sets)
    }
}

/// Repository for per-set review outcomes, keyed by set id.
pub trait StatsRepository {
    fn load_flash_card_stats(&self) -> Result<BTreeMap<String, FlashCardStats>>;
    fn save_flash_card_stats(&self, stats: &BTreeMap<String, FlashCardStats>) -> Result<()>;
    /// Record one swipe and return the updated stats for the set.
    fn record_card_review(&self, set_id: &str, card_id: u32, remembered: bool)
        -> Result<FlashCardStats>;
}

impl<S: KeyValueStore + ?Sized> StatsRepository for S {
    fn load_flash_card_stats(&self) -> Result<BTreeMap<String, FlashCardStats>> {
        load(self, namespace::FLASH_CARD_STATS)
    }

    fn save_flash_card_stats(&self, stats: &BTreeMap<String, FlashCardStats>) -> Result<()> {
        save(self, namespace::FLASH_CARD_STATS, stats)
    }

    fn record_card_review(
        &self,
        set_id: &str,
        card_id: u32,
        remembered: bool,
    ) -> Result<FlashCardStats> {
        let mut all = self.load_flash_card_stats()?;
        let stats = all.entry(set_id.to_string()).or_default();
        if remembered {
            stats.mark_remembered(card_id);
        } else {
            stats.mark_not_remembered(card_id);
        }
        let updated = stats.clone();
        self.save_flash_card_stats(&all)?;
        Ok(updated)
    }
}

/// Background gradient preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub color1: String,
    pub color2: String,
    #[serde(rename = "useBW")]
    pub use_bw: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            color1: "#ffffff".to_string(),
            color2: "#ffffff".to_string(),
            use_bw: true,
        }
    }
}

/// Repository for application settings.
pub trait SettingsRepository {
    fn load_settings(&self) -> Result<AppSettings>;
    fn save_settings(&self, settings: &AppSettings) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> SettingsRepository for S {
    fn load_settings(&self) -> Result<AppSettings> {
        load(self, namespace::SETTINGS)
    }

    fn save_settings(&self, settings: &AppSettings) -> Result<()> {
        save(self, namespace::SETTINGS, settings)
    }
}
