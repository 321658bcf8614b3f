//! Persisted search history: the eight most recent explicit city searches.
//!
//! Every mutation is a full replace of the bounded list, so the store needs
//! no transactionality beyond writing the whole file.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use std::{fs, path::PathBuf};

use crate::model::SearchHistoryEntry;

/// Most recent entries kept; older ones fall off the end.
pub const HISTORY_CAP: usize = 8;

/// Prepend `entry`, dropping any stale entry for the same
/// `(name, country_code)` first, and truncate to [`HISTORY_CAP`].
pub fn push_entry(history: &mut Vec<SearchHistoryEntry>, entry: SearchHistoryEntry) {
    history.retain(|e| e.name != entry.name || e.country_code != entry.country_code);
    history.insert(0, entry);
    history.truncate(HISTORY_CAP);
}

/// Durable key-value style persistence for the history list.
pub trait HistoryStore {
    fn load(&self) -> Result<Vec<SearchHistoryEntry>>;
    fn save(&self, entries: &[SearchHistoryEntry]) -> Result<()>;
}

/// JSON file in the platform data directory. A missing file loads as an
/// empty history (first run).
#[derive(Debug, Clone)]
pub struct FileHistoryStore {
    path: PathBuf,
}

impl FileHistoryStore {
    /// Store at the platform default location.
    pub fn open_default() -> Result<Self> {
        let dirs = ProjectDirs::from("dev", "skycast", "skycast")
            .ok_or_else(|| anyhow!("Could not determine platform data directory"))?;

        Ok(Self {
            path: dirs.data_dir().join("history.json"),
        })
    }

    /// Store at an explicit path.
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl HistoryStore for FileHistoryStore {
    fn load(&self) -> Result<Vec<SearchHistoryEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read history file: {}", self.path.display()))?;

        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse history file: {}", self.path.display()))
    }

    fn save(&self, entries: &[SearchHistoryEntry]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create history directory: {}", parent.display())
            })?;
        }

        let json =
            serde_json::to_string_pretty(entries).context("Failed to serialize search history")?;

        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write history file: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, country: &str) -> SearchHistoryEntry {
        SearchHistoryEntry::new(name.to_string(), country.to_string(), 0.0, 0.0)
    }

    #[test]
    fn newest_entry_goes_first() {
        let mut history = Vec::new();
        push_entry(&mut history, entry("Lisbon", "PT"));
        push_entry(&mut history, entry("Oslo", "NO"));

        assert_eq!(history[0].name, "Oslo");
        assert_eq!(history[1].name, "Lisbon");
    }

    #[test]
    fn duplicate_search_replaces_the_stale_entry() {
        let mut history = Vec::new();
        push_entry(&mut history, entry("Lisbon", "PT"));
        push_entry(&mut history, entry("Oslo", "NO"));
        push_entry(&mut history, entry("Lisbon", "PT"));

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].name, "Lisbon");
        assert_eq!(history[1].name, "Oslo");
    }

    #[test]
    fn same_name_different_country_is_a_distinct_entry() {
        let mut history = Vec::new();
        push_entry(&mut history, entry("Springfield", "US"));
        push_entry(&mut history, entry("Springfield", "CA"));

        assert_eq!(history.len(), 2);
    }

    #[test]
    fn history_is_bounded_to_eight_entries() {
        let mut history = Vec::new();
        for i in 0..12 {
            push_entry(&mut history, entry(&format!("City{i}"), "XX"));
        }

        assert_eq!(history.len(), HISTORY_CAP);
        assert_eq!(history[0].name, "City11");
        // the oldest entries fell off
        assert!(history.iter().all(|e| e.name != "City0"));
    }

    #[test]
    fn file_store_roundtrips_and_replaces_whole_list() {
        let path = std::env::temp_dir().join(format!(
            "skycast-history-test-{}.json",
            std::process::id()
        ));
        let store = FileHistoryStore::at(path.clone());

        let mut history = Vec::new();
        push_entry(&mut history, entry("Lisbon", "PT"));
        push_entry(&mut history, entry("Oslo", "NO"));
        store.save(&history).expect("save should succeed");

        let loaded = store.load().expect("load should succeed");
        assert_eq!(loaded, history);

        store.save(&[]).expect("save should succeed");
        assert!(store.load().expect("load should succeed").is_empty());

        let _ = fs::remove_file(path);
    }

    #[test]
    fn missing_file_loads_as_empty_history() {
        let store = FileHistoryStore::at(std::env::temp_dir().join("skycast-history-nonexistent.json"));
        assert!(store.load().expect("load should succeed").is_empty());
    }
}
