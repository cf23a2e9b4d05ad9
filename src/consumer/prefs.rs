//! Durable per-user preference storage behind a small trait seam.
//!
//! The stores write their last-applied value through so a fresh page load
//! restores state even with nothing pending in the channel.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::types::Domain;

/// Persistence seam for a domain's last-known value token.
///
/// `save` is deliberately infallible from the caller's point of view:
/// persistence problems are logged, never raised into the dispatch path.
pub trait PreferenceStore: Send + Sync {
    fn load(&self, domain: Domain) -> Option<String>;
    fn save(&self, domain: Domain, value: &str);
}

/// In-memory preference store, for tests and ephemeral deployments.
#[derive(Debug, Default)]
pub struct MemoryPrefs {
    values: Mutex<HashMap<Domain, String>>,
}

impl MemoryPrefs {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPrefs {
    fn load(&self, domain: Domain) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(&domain).cloned())
    }

    fn save(&self, domain: Domain, value: &str) {
        if let Ok(mut values) = self.values.lock() {
            values.insert(domain, value.to_string());
        }
    }
}

/// Preference store backed by a single JSON document on disk.
///
/// The file maps domain wire names to value tokens. It is read once at
/// open and rewritten in full on every save; concurrent writers are not a
/// concern in the single-threaded model.
pub struct JsonFilePrefs {
    path: PathBuf,
    values: Mutex<HashMap<Domain, String>>,
}

impl JsonFilePrefs {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<HashMap<Domain, String>>(&raw) {
                Ok(parsed) => parsed,
                Err(error) => {
                    tracing::warn!(path = %path.display(), %error, "unreadable preference file, starting empty");
                    HashMap::new()
                }
            },
            Err(_) => HashMap::new(),
        };
        Self { path, values: Mutex::new(values) }
    }
}

impl PreferenceStore for JsonFilePrefs {
    fn load(&self, domain: Domain) -> Option<String> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(&domain).cloned())
    }

    fn save(&self, domain: Domain, value: &str) {
        let Ok(mut values) = self.values.lock() else {
            return;
        };
        values.insert(domain, value.to_string());
        match serde_json::to_string_pretty(&*values) {
            Ok(serialized) => {
                if let Err(error) = std::fs::write(&self.path, serialized) {
                    tracing::warn!(path = %self.path.display(), %error, "failed to persist preferences");
                }
            }
            Err(error) => {
                tracing::warn!(%error, "failed to serialize preferences");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_prefs_round_trip() {
        let prefs = MemoryPrefs::new();
        assert_eq!(prefs.load(Domain::Navigation), None);

        prefs.save(Domain::Navigation, "statistics");
        prefs.save(Domain::DisplayMode, "r");
        assert_eq!(prefs.load(Domain::Navigation), Some("statistics".to_string()));
        assert_eq!(prefs.load(Domain::DisplayMode), Some("r".to_string()));
        assert_eq!(prefs.load(Domain::DateRange), None);
    }

    #[test]
    fn json_file_prefs_persist_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = JsonFilePrefs::open(&path);
        prefs.save(Domain::DateRange, "lastMonth");
        prefs.save(Domain::Navigation, "trades");
        drop(prefs);

        let reopened = JsonFilePrefs::open(&path);
        assert_eq!(reopened.load(Domain::DateRange), Some("lastMonth".to_string()));
        assert_eq!(reopened.load(Domain::Navigation), Some("trades".to_string()));
    }

    #[test]
    fn missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = JsonFilePrefs::open(dir.path().join("absent.json"));
        assert_eq!(prefs.load(Domain::Navigation), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        std::fs::write(&path, "not json at all").unwrap();

        let prefs = JsonFilePrefs::open(&path);
        assert_eq!(prefs.load(Domain::DateRange), None);
    }
}
