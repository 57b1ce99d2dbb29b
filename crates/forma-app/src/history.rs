use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use forma_core::Model;
use log::warn;
use serde::{Deserialize, Serialize};

/// One saved model. Flattened so the file stays a flat JSON array of
/// model objects that older history files parse into directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub model: Model,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

/// Persisted list of saved models, unique by URL. Every mutation is
/// written straight back to disk; a load-time parse failure degrades to an
/// empty list rather than surfacing to the user.
pub struct HistoryStore {
    path: PathBuf,
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn load(path: PathBuf) -> Self {
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!("history file {} is unreadable: {err}", path.display());
                    Vec::new()
                }
            },
            Err(_) => Vec::new(),
        };
        Self { path, entries }
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.entries.iter().any(|e| e.model.url == url)
    }

    /// Add a model. Bundled local assets and duplicates are skipped.
    pub fn save(&mut self, model: &Model) -> bool {
        if model.local || self.contains(&model.url) {
            return false;
        }
        self.entries.push(HistoryEntry {
            model: model.clone(),
            saved_at: Utc::now(),
        });
        self.persist();
        true
    }

    /// Remove by URL; absent URLs are a no-op.
    pub fn remove(&mut self, url: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.model.url != url);
        let removed = self.entries.len() != before;
        if removed {
            self.persist();
        }
        removed
    }

    /// Write-to-temp-then-rename. A persist failure is logged and the
    /// in-memory list stays authoritative for the session.
    fn persist(&self) {
        if let Err(err) = self.try_persist() {
            warn!("failed to persist history to {}: {err}", self.path.display());
        }
    }

    fn try_persist(&self) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        let temp = self.path.with_extension("tmp");
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("forma-history-{}", Uuid::new_v4()))
            .join("history.json")
    }

    fn cleanup(path: &PathBuf) {
        if let Some(parent) = path.parent() {
            let _ = fs::remove_dir_all(parent);
        }
    }

    #[test]
    fn test_save_dedupes_by_url() {
        let path = temp_path();
        let mut store = HistoryStore::load(path.clone());
        let model = Model::new("https://x/bear.glb");

        assert!(store.save(&model));
        assert!(!store.save(&model));
        assert_eq!(store.len(), 1);
        cleanup(&path);
    }

    #[test]
    fn test_local_models_are_not_saved() {
        let path = temp_path();
        let mut store = HistoryStore::load(path.clone());
        let bundled = Model::bundled_defaults().remove(0);

        assert!(!store.save(&bundled));
        assert!(store.is_empty());
        cleanup(&path);
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let path = temp_path();
        let mut store = HistoryStore::load(path.clone());
        store.save(&Model::new("https://x/bear.glb"));

        assert!(!store.remove("https://x/other.glb"));
        assert_eq!(store.len(), 1);
        assert!(store.remove("https://x/bear.glb"));
        assert!(store.is_empty());
        cleanup(&path);
    }

    #[test]
    fn test_round_trips_to_disk() {
        let path = temp_path();
        let mut store = HistoryStore::load(path.clone());
        store.save(&Model::new("https://x/bear.glb").with_poster("https://x/bear.png"));
        drop(store);

        let reloaded = HistoryStore::load(path.clone());
        assert_eq!(reloaded.len(), 1);
        assert_eq!(reloaded.entries()[0].model.url, "https://x/bear.glb");
        assert_eq!(
            reloaded.entries()[0].model.poster.as_deref(),
            Some("https://x/bear.png")
        );
        cleanup(&path);
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json at all").unwrap();

        let store = HistoryStore::load(path.clone());
        assert!(store.is_empty());
        cleanup(&path);
    }

    #[test]
    fn test_parses_bare_model_array() {
        // History written before savedAt existed
        let path = temp_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, r#"[{"url":"https://x/bear.glb"}]"#).unwrap();

        let store = HistoryStore::load(path.clone());
        assert_eq!(store.len(), 1);
        assert!(store.contains("https://x/bear.glb"));
        cleanup(&path);
    }
}
