//! Draft Manager
//!
//! Stores the last draft written for each origin. All origins share one
//! JSON object under `LAST_SAVED_DRAFT`; it is reloaded on every call and
//! rewritten after every mutation, with no cache in between.
//!
//! Persistence is best effort. An unreadable table reads as empty and a
//! failed write is dropped, so none of the draft operations return errors.

use std::collections::BTreeMap;

use quill_storage::{Database, KeyValueStore};

use crate::config::Config;
use crate::keys::StorageKey;
use crate::Result;

/// origin -> draft
pub type DraftTable = BTreeMap<String, String>;

const EMPTY_TABLE: &str = "{}";

pub struct DraftManager<S> {
    store: S,
}

impl DraftManager<Database> {
    /// Open the SQLite-backed store described by `config`.
    pub fn open(config: &Config) -> Result<Self> {
        config.validate()?;

        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::new(db))
    }
}

impl<S: KeyValueStore> DraftManager<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Replace the draft for `origin`. An empty `draft` is stored as is.
    pub fn save_draft(&self, draft: &str, origin: &str) {
        let mut table = self.load_table();
        table.insert(origin.to_string(), draft.to_string());
        self.persist_table(&table);
    }

    /// The saved draft for `origin`, or `""` when there is none.
    pub fn get_draft(&self, origin: &str) -> String {
        self.load_table()
            .remove(origin)
            .filter(|draft| !draft.is_empty())
            .unwrap_or_default()
    }

    /// Empty drafts count as no draft.
    pub fn has_draft(&self, origin: &str) -> bool {
        self.load_table()
            .get(origin)
            .is_some_and(|draft| !draft.is_empty())
    }

    /// Drop `origin` from the table. The table is rewritten even if the
    /// origin had nothing saved.
    pub fn clear_draft(&self, origin: &str) {
        let mut table = self.load_table();
        table.remove(origin);
        self.persist_table(&table);
    }

    /// Origins holding a non-empty draft, sorted.
    pub fn origins(&self) -> Vec<String> {
        self.load_table()
            .into_iter()
            .filter(|(_, draft)| !draft.is_empty())
            .map(|(origin, _)| origin)
            .collect()
    }

    fn load_table(&self) -> DraftTable {
        let key = StorageKey::LastSavedDraft;

        let serialized = match self.store.get(key.as_str()) {
            Ok(value) => value.unwrap_or_else(|| EMPTY_TABLE.to_string()),
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Failed to read drafts");
                return DraftTable::new();
            }
        };

        serde_json::from_str(&serialized).unwrap_or_else(|e| {
            tracing::debug!(key = %key, error = %e, "Discarding unreadable drafts");
            DraftTable::new()
        })
    }

    fn persist_table(&self, table: &DraftTable) {
        let key = StorageKey::LastSavedDraft;

        let serialized = match serde_json::to_string(table) {
            Ok(json) => json,
            Err(e) => {
                tracing::debug!(key = %key, error = %e, "Failed to serialize drafts");
                return;
            }
        };

        if let Err(e) = self.store.set(key.as_str(), &serialized) {
            tracing::debug!(key = %key, error = %e, "Failed to persist drafts");
        }
    }
}

impl<S: Clone> Clone for DraftManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_storage::MemoryStore;

    const MAIL: &str = "https://mail.example.com";
    const OTHER: &str = "https://other.example.com";

    fn manager() -> (DraftManager<MemoryStore>, MemoryStore) {
        let store = MemoryStore::new();
        (DraftManager::new(store.clone()), store)
    }

    fn raw(store: &MemoryStore) -> Option<String> {
        store.get("LAST_SAVED_DRAFT").unwrap()
    }

    #[test]
    fn test_save_and_get() {
        let (drafts, _) = manager();

        drafts.save_draft("hello", MAIL);
        assert_eq!(drafts.get_draft(MAIL), "hello");
        assert!(drafts.has_draft(MAIL));
        assert!(!drafts.has_draft(OTHER));

        drafts.clear_draft(MAIL);
        assert_eq!(drafts.get_draft(MAIL), "");
        assert!(!drafts.has_draft(MAIL));
    }

    #[test]
    fn test_origins_are_isolated() {
        let (drafts, _) = manager();

        drafts.save_draft("first", MAIL);
        drafts.save_draft("second", OTHER);
        assert_eq!(drafts.get_draft(MAIL), "first");
        assert_eq!(drafts.get_draft(OTHER), "second");

        drafts.clear_draft(OTHER);
        assert_eq!(drafts.get_draft(MAIL), "first");
    }

    #[test]
    fn test_overwrite() {
        let (drafts, _) = manager();

        drafts.save_draft("one", MAIL);
        drafts.save_draft("two", MAIL);
        assert_eq!(drafts.get_draft(MAIL), "two");
    }

    #[test]
    fn test_empty_draft_reads_as_missing() {
        let (drafts, store) = manager();

        drafts.save_draft("something", MAIL);
        drafts.save_draft("", MAIL);
        assert!(!drafts.has_draft(MAIL));
        assert_eq!(drafts.get_draft(MAIL), "");
        assert!(drafts.origins().is_empty());

        // Still stored, unlike a cleared origin
        assert_eq!(raw(&store).as_deref(), Some(r#"{"https://mail.example.com":""}"#));
    }

    #[test]
    fn test_missing_table() {
        let (drafts, store) = manager();

        assert_eq!(drafts.get_draft(MAIL), "");
        assert!(!drafts.has_draft(MAIL));
        assert!(raw(&store).is_none());
    }

    #[test]
    fn test_clear_leaves_empty_table() {
        let (drafts, store) = manager();

        drafts.save_draft("hello", MAIL);
        drafts.clear_draft(MAIL);
        assert_eq!(raw(&store).as_deref(), Some("{}"));
    }

    #[test]
    fn test_clear_unknown_origin_rewrites_table() {
        let (drafts, store) = manager();

        drafts.clear_draft(MAIL);
        assert_eq!(raw(&store).as_deref(), Some("{}"));

        drafts.save_draft("kept", OTHER);
        drafts.clear_draft(MAIL);
        assert_eq!(drafts.get_draft(OTHER), "kept");
    }

    #[test]
    fn test_corrupt_table_reads_as_empty() {
        for corrupt in ["not json", "", "null", "[]", r#"{"a": 1}"#, r#"{"a": {"b": "c"}}"#] {
            let (drafts, store) = manager();
            store.set("LAST_SAVED_DRAFT", corrupt).unwrap();

            assert_eq!(drafts.get_draft("a"), "", "raw value {corrupt:?}");
            assert!(!drafts.has_draft("a"));
            assert!(drafts.origins().is_empty());
        }
    }

    #[test]
    fn test_save_replaces_corrupt_table() {
        let (drafts, store) = manager();
        store.set("LAST_SAVED_DRAFT", "{broken").unwrap();

        drafts.save_draft("fresh", MAIL);
        assert_eq!(drafts.get_draft(MAIL), "fresh");
        assert_eq!(raw(&store).as_deref(), Some(r#"{"https://mail.example.com":"fresh"}"#));
    }

    #[test]
    fn test_reads_table_written_elsewhere() {
        let (drafts, store) = manager();
        store
            .set("LAST_SAVED_DRAFT", r#"{"https://a.example":"x","https://b.example":"y"}"#)
            .unwrap();

        assert_eq!(drafts.get_draft("https://b.example"), "y");
        assert_eq!(drafts.origins(), vec!["https://a.example", "https://b.example"]);
    }

    #[test]
    fn test_no_cache_between_calls() {
        let (drafts, store) = manager();

        drafts.save_draft("hello", MAIL);
        store.remove("LAST_SAVED_DRAFT");
        assert_eq!(drafts.get_draft(MAIL), "");
    }

    #[test]
    fn test_unavailable_store_is_silent() {
        let drafts = DraftManager::new(MemoryStore::unavailable());

        drafts.save_draft("lost", MAIL);
        drafts.clear_draft(MAIL);
        assert_eq!(drafts.get_draft(MAIL), "");
        assert!(!drafts.has_draft(MAIL));
        assert!(drafts.origins().is_empty());
    }

    #[test]
    fn test_quota_exceeded_keeps_previous_table() {
        let store = MemoryStore::with_quota(64);
        let drafts = DraftManager::new(store.clone());

        drafts.save_draft("short", MAIL);
        drafts.save_draft(&"x".repeat(100), MAIL);

        assert_eq!(drafts.get_draft(MAIL), "short");
    }

    #[test]
    fn test_origins_sorted() {
        let (drafts, _) = manager();

        drafts.save_draft("z", "https://z.example");
        drafts.save_draft("a", "https://a.example");
        drafts.save_draft("", "https://m.example");
        assert_eq!(drafts.origins(), vec!["https://a.example", "https://z.example"]);
    }

    #[test]
    fn test_database_backend() {
        let drafts = DraftManager::new(Database::open_in_memory().unwrap());

        drafts.save_draft("hello", MAIL);
        assert_eq!(drafts.get_draft(MAIL), "hello");
        assert_eq!(
            drafts.store().get_item("LAST_SAVED_DRAFT").unwrap().as_deref(),
            Some(r#"{"https://mail.example.com":"hello"}"#)
        );
    }

    #[test]
    fn test_shared_store_sees_other_writer() {
        let store = MemoryStore::new();
        let first = DraftManager::new(&store);
        let second = DraftManager::new(&store);

        first.save_draft("from first", MAIL);
        assert_eq!(second.get_draft(MAIL), "from first");

        second.clear_draft(MAIL);
        assert!(!first.has_draft(MAIL));
    }
}
