//! Repository behaviour over the in-memory and SQLite stores.

mod common;

use common::{note, note_at};
use pretty_assertions::assert_eq;
use studynote::db::{
    namespace, AppSettings, DbError, FlashCardRepository, GroupRepository, KeyValueStore,
    MemoryStore, NoteRepository, SettingsRepository, SqliteStore, StatsRepository,
    TestRepository,
};
use studynote_core::{FlashCard, FlashCardSet, TestQuestion, TestSet};
use tempfile::TempDir;

fn card_set(id: &str, title: &str) -> FlashCardSet {
    FlashCardSet {
        id: id.to_string(),
        title: title.to_string(),
        cards: vec![FlashCard::new(1, "front", "back")],
        source: None,
        topic: None,
        language: None,
    }
}

fn test_set(id: &str, title: &str) -> TestSet {
    TestSet {
        id: id.to_string(),
        title: title.to_string(),
        questions: vec![TestQuestion {
            id: 1,
            question: "q".to_string(),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer: 3,
        }],
        source: None,
        topic: None,
        language: None,
    }
}

fn ids(notes: &[studynote_core::Note]) -> Vec<&str> {
    notes.iter().map(|n| n.id.as_str()).collect()
}

#[test]
fn empty_store_loads_empty_collections() {
    let store = MemoryStore::new();
    assert!(store.load_notes().unwrap().is_empty());
    assert!(store.load_groups().unwrap().is_empty());
    assert!(store.load_flash_card_sets().unwrap().is_empty());
    assert!(store.load_test_sets().unwrap().is_empty());
    assert!(store.load_flash_card_stats().unwrap().is_empty());
    assert_eq!(store.load_settings().unwrap(), AppSettings::default());
}

#[test]
fn save_note_inserts_new_notes_first_and_replaces_in_place() {
    let store = MemoryStore::new();
    store.save_note(&note("a", "A", &["one"])).unwrap();
    store.save_note(&note("b", "B", &["two"])).unwrap();
    assert_eq!(ids(&store.load_notes().unwrap()), vec!["b", "a"]);

    let mut edited = note("a", "A2", &["changed"]);
    edited.tags.push("bio".to_string());
    store.save_note(&edited).unwrap();

    let notes = store.load_notes().unwrap();
    assert_eq!(ids(&notes), vec!["b", "a"]);
    assert_eq!(store.get_note("a").unwrap(), Some(edited));
}

#[test]
fn delete_notes_single_and_bulk() {
    let store = MemoryStore::new();
    for id in ["a", "b", "c", "d"] {
        store.save_note(&note(id, id, &["x"])).unwrap();
    }
    store.delete_note("c").unwrap();
    store.delete_notes(&["a".to_string(), "d".to_string()]).unwrap();
    assert_eq!(ids(&store.load_notes().unwrap()), vec!["b"]);
    assert_eq!(store.get_note("c").unwrap(), None);
}

#[test]
fn recent_notes_are_newest_first() {
    let store = MemoryStore::new();
    store
        .save_notes(&[
            note_at("old", "Old", 10),
            note_at("new", "New", 30),
            note_at("mid", "Mid", 20),
        ])
        .unwrap();
    assert_eq!(ids(&store.recent_notes(2).unwrap()), vec!["new", "mid"]);
    assert_eq!(store.recent_notes(10).unwrap().len(), 3);
}

#[test]
fn search_matches_title_body_and_tags() {
    let store = MemoryStore::new();
    let mut tagged = note("t", "Untitled", &["nothing"]);
    tagged.tags.push("Genetics".to_string());
    store
        .save_notes(&[
            note("title", "Photosynthesis", &["x"]),
            note("body", "Plants", &["chlorophyll absorbs light"]),
            tagged,
        ])
        .unwrap();

    assert_eq!(ids(&store.search_notes("PHOTO").unwrap()), vec!["title"]);
    assert_eq!(ids(&store.search_notes("chlorophyll").unwrap()), vec!["body"]);
    assert_eq!(ids(&store.search_notes("genetic").unwrap()), vec!["t"]);
    assert_eq!(store.search_notes("").unwrap().len(), 3);
}

#[test]
fn add_group_is_idempotent() {
    let store = MemoryStore::new();
    let first = store.add_group("My Group").unwrap();
    let second = store.add_group("My Group").unwrap();

    assert_eq!(first.id, "my-group");
    assert_eq!(first.id, second.id);
    let groups = store.load_groups().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].name, "My Group");
}

#[test]
fn delete_group_strips_membership_from_notes() {
    let store = MemoryStore::new();
    let bio = store.add_group("Biology").unwrap();
    let chem = store.add_group("Chemistry").unwrap();

    let mut both = note("n1", "Both", &["x"]);
    both.groups = vec![bio.id.clone(), chem.id.clone()];
    let mut only_bio = note("n2", "Bio", &["x"]);
    only_bio.groups = vec![bio.id.clone()];
    store.save_notes(&[both, only_bio]).unwrap();

    store.delete_group(&bio.id).unwrap();

    assert_eq!(store.load_groups().unwrap(), vec![chem.clone()]);
    let notes = store.load_notes().unwrap();
    assert_eq!(notes[0].groups, vec![chem.id.clone()]);
    assert!(notes[1].groups.is_empty());
    assert!(store.notes_for_group(&bio.id).unwrap().is_empty());
}

#[test]
fn recent_notes_for_group_filters_then_sorts() {
    let store = MemoryStore::new();
    let mut notes = vec![
        note_at("a", "A", 1),
        note_at("b", "B", 4),
        note_at("c", "C", 3),
        note_at("d", "D", 2),
        note_at("outside", "O", 9),
    ];
    for n in notes.iter_mut().take(4) {
        n.groups.push("g".to_string());
    }
    store.save_notes(&notes).unwrap();

    assert_eq!(ids(&store.recent_notes_for_group("g", 3).unwrap()), vec!["b", "c", "d"]);
    assert_eq!(store.notes_for_group("g").unwrap().len(), 4);
}

#[test]
fn flash_card_sets_append_get_and_search() {
    let store = MemoryStore::new();
    store.append_flash_card_set(&card_set("s1", "Cell Biology")).unwrap();
    store.append_flash_card_set(&card_set("s2", "World History")).unwrap();

    assert_eq!(store.load_flash_card_sets().unwrap().len(), 2);
    assert_eq!(
        store.get_flash_card_set("s2").unwrap().map(|s| s.title),
        Some("World History".to_string())
    );
    let found = store.search_flash_card_sets("biology").unwrap();
    assert_eq!(found, vec![card_set("s1", "Cell Biology")]);
}

#[test]
fn test_sets_append_get_and_search() {
    let store = MemoryStore::new();
    store.append_test_set(&test_set("t1", "Algebra")).unwrap();
    store.append_test_set(&test_set("t2", "Geometry")).unwrap();

    assert_eq!(store.get_test_set("t1").unwrap(), Some(test_set("t1", "Algebra")));
    assert_eq!(store.get_test_set("missing").unwrap(), None);
    assert_eq!(store.search_test_sets("GEO").unwrap().len(), 1);
}

#[test]
fn card_reviews_keep_lists_exclusive() {
    let store = MemoryStore::new();
    store.record_card_review("s1", 1, true).unwrap();
    store.record_card_review("s1", 2, false).unwrap();
    let stats = store.record_card_review("s1", 1, false).unwrap();

    assert!(stats.remembered.is_empty());
    assert_eq!(stats.not_remembered, vec![2, 1]);
    let all = store.load_flash_card_stats().unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all["s1"], stats);
}

#[test]
fn settings_round_trip_with_browser_keys() {
    let store = MemoryStore::new();
    let settings = AppSettings {
        color1: "#000000".to_string(),
        color2: "#ff0000".to_string(),
        use_bw: false,
    };
    store.save_settings(&settings).unwrap();

    let raw = store.get(namespace::SETTINGS).unwrap().unwrap();
    assert!(raw.contains("\"useBW\":false"));
    assert_eq!(store.load_settings().unwrap(), settings);
}

#[test]
fn browser_storage_dump_loads_verbatim() {
    let store = MemoryStore::new();
    store
        .set(
            namespace::NOTES,
            r#"[{"id":"1","title":"Old","content":"plain text","lastModified":1700000000000,"tags":[]}]"#,
        )
        .unwrap();
    store
        .set(
            namespace::TEST_SETS,
            r#"[{"id":"t","title":"T","questions":[{"id":1,"question":"q","options":["a","b","c","d"],"correctAnswer":2}],"topic":"Computer Science","language":"English"}]"#,
        )
        .unwrap();

    let notes = store.load_notes().unwrap();
    assert_eq!(notes[0].snippet(), "plain text");
    assert!(notes[0].groups.is_empty());
    let sets = store.load_test_sets().unwrap();
    assert_eq!(sets[0].questions[0].correct_answer, 2);
}

#[test]
fn corrupt_namespace_reports_invalid_data() {
    let store = MemoryStore::new();
    store.set(namespace::GROUPS, "{not json").unwrap();
    let err = store.load_groups().unwrap_err();
    assert!(matches!(err, DbError::InvalidData { namespace: ref ns, .. } if ns == "groups"));
}

#[test]
fn sqlite_store_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("studynote.db");

    {
        let store = SqliteStore::open(&path).unwrap();
        store.save_note(&note("a", "Persisted", &["body"])).unwrap();
        store.add_group("Exams").unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(store.get_note("a").unwrap().map(|n| n.title), Some("Persisted".to_string()));
    assert_eq!(store.load_groups().unwrap()[0].id, "exams");
}

#[test]
fn sqlite_in_memory_behaves_like_memory_store() {
    let store = SqliteStore::open_in_memory().unwrap();
    store.add_group("My Group").unwrap();
    store.add_group("My Group").unwrap();
    assert_eq!(store.load_groups().unwrap().len(), 1);
}
