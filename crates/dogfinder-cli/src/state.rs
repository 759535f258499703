//! JSON state file standing in for the browser's two storage scopes.
//!
//! The file holds a `local` map (durable: filters, view mode, last total) and
//! a `session` map (favorites, auth flags, auth cookie). Every access
//! re-reads the file so several handles over the same path stay coherent.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dogfinder_core::storage::{KeyValueStore, StorageError, StorageHandle};
use dogfinder_core::view::ViewMode;
use serde::{Deserialize, Serialize};

/// Session-scope key holding the cookie pair returned by login.
pub(crate) const AUTH_COOKIE_KEY: &str = "authCookie";
/// Local-scope key holding the active view mode.
pub(crate) const VIEW_MODE_KEY: &str = "viewMode";
/// Local-scope key holding the match count of the latest remote search.
pub(crate) const LAST_TOTAL_KEY: &str = "lastTotal";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StateDocument {
    #[serde(default)]
    local: BTreeMap<String, String>,
    #[serde(default)]
    session: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Scope {
    Local,
    Session,
}

impl Scope {
    const fn entries(self, document: &StateDocument) -> &BTreeMap<String, String> {
        match self {
            Self::Local => &document.local,
            Self::Session => &document.session,
        }
    }

    const fn entries_mut(self, document: &mut StateDocument) -> &mut BTreeMap<String, String> {
        match self {
            Self::Local => &mut document.local,
            Self::Session => &mut document.session,
        }
    }
}

/// One scope of the state file.
#[derive(Debug, Clone)]
pub(crate) struct FileStore {
    path: PathBuf,
    scope: Scope,
}

impl FileStore {
    pub(crate) fn new(path: impl Into<PathBuf>, scope: Scope) -> Self {
        Self {
            path: path.into(),
            scope,
        }
    }

    fn load(&self) -> StateDocument {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "state file is unreadable; starting from empty state"
                );
                StateDocument::default()
            }),
            Err(_) => StateDocument::default(),
        }
    }

    fn save(&self, document: &StateDocument) -> Result<(), String> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| err.to_string())?;
        }
        let text = serde_json::to_string_pretty(document).map_err(|err| err.to_string())?;
        fs::write(&self.path, text).map_err(|err| err.to_string())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.scope.entries(&self.load()).get(key).cloned()
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut document = self.load();
        self.scope
            .entries_mut(&mut document)
            .insert(key.to_string(), value.to_string());
        self.save(&document).map_err(|detail| StorageError::Write {
            key: key.to_string(),
            detail,
        })
    }

    fn remove(&self, key: &str) {
        let mut document = self.load();
        if self.scope.entries_mut(&mut document).remove(key).is_none() {
            return;
        }
        if let Err(err) = self.save(&document) {
            tracing::warn!(key, error = %err, "failed to remove state entry");
        }
    }
}

/// Handles over both scopes of one state file.
#[derive(Clone)]
pub(crate) struct StateFiles {
    pub(crate) local: StorageHandle,
    pub(crate) session: StorageHandle,
}

impl StateFiles {
    pub(crate) fn open(path: &Path) -> Self {
        Self {
            local: StorageHandle::new(FileStore::new(path, Scope::Local)),
            session: StorageHandle::new(FileStore::new(path, Scope::Session)),
        }
    }
}

/// View mode left by the previous invocation.
pub(crate) fn view_mode(local: &StorageHandle) -> ViewMode {
    local
        .read(VIEW_MODE_KEY)
        .and_then(|name| ViewMode::from_name(&name))
        .unwrap_or_default()
}

pub(crate) fn save_view_mode(local: &StorageHandle, mode: ViewMode) {
    local.persist_raw(VIEW_MODE_KEY, mode.as_str());
}

/// Match count recorded by the latest remote search.
pub(crate) fn last_total(local: &StorageHandle) -> Option<u64> {
    local
        .read(LAST_TOTAL_KEY)
        .and_then(|raw| raw.trim().parse().ok())
}

pub(crate) fn save_last_total(local: &StorageHandle, total: u64) {
    local.persist_raw(LAST_TOTAL_KEY, &total.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn scopes_share_one_file_without_mixing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("state.json");
        let files = StateFiles::open(&path);

        files.local.write("search_filters", "{}")?;
        files.session.write("isAuthenticated", "true")?;
        assert_eq!(files.local.read("search_filters").as_deref(), Some("{}"));
        assert!(files.local.read("isAuthenticated").is_none());
        assert_eq!(files.session.read("isAuthenticated").as_deref(), Some("true"));

        let reopened = StateFiles::open(&path);
        assert_eq!(reopened.session.read("isAuthenticated").as_deref(), Some("true"));
        reopened.session.remove("isAuthenticated");
        assert!(files.session.read("isAuthenticated").is_none());
        Ok(())
    }

    #[test]
    fn missing_or_corrupt_file_reads_as_empty() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("state.json");
        let store = FileStore::new(&path, Scope::Local);
        assert!(store.read("anything").is_none());

        fs::write(&path, "not json")?;
        assert!(store.read("anything").is_none());
        store.write("viewMode", "favorites")?;
        assert_eq!(store.read("viewMode").as_deref(), Some("favorites"));
        Ok(())
    }

    #[test]
    fn mode_and_total_round_through_local_scope() -> Result<()> {
        let dir = tempdir()?;
        let files = StateFiles::open(&dir.path().join("state.json"));
        assert_eq!(view_mode(&files.local), ViewMode::Search);
        assert!(last_total(&files.local).is_none());

        save_view_mode(&files.local, ViewMode::Favorites);
        save_last_total(&files.local, 42);
        assert_eq!(view_mode(&files.local), ViewMode::Favorites);
        assert_eq!(last_total(&files.local), Some(42));
        Ok(())
    }

    #[test]
    fn unwritable_path_reports_write_error() -> Result<()> {
        let dir = tempdir()?;
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x")?;
        let store = FileStore::new(blocker.join("state.json"), Scope::Session);
        let err = store.write("k", "v").unwrap_err();
        assert!(matches!(err, StorageError::Write { .. }));
        Ok(())
    }
}
