//! Session token storage
//!
//! The client persists exactly one value: the opaque session token, stored
//! under [`TOKEN_KEY`]. Absence of the key means "not signed in".

use crate::error::{ApiError, ApiResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{info, warn};

/// Well-known key the token is stored under
pub const TOKEN_KEY: &str = "token";

/// Durable storage for the session token
pub trait TokenStore: Send + Sync {
    /// Read the stored token
    fn get(&self) -> Option<String>;

    /// Store a token, replacing any previous one
    fn set(&self, token: &str) -> ApiResult<()>;

    /// Remove the stored token
    fn remove(&self) -> ApiResult<()>;
}

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, token: &str) -> ApiResult<()> {
        *self
            .token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> ApiResult<()> {
        self.token
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        Ok(())
    }
}

/// Token store backed by a small JSON file
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        info!("Token store initialized at: {}", path.display());
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A missing file reads as empty. Any other read failure is an error.
    fn read_entries(&self) -> ApiResult<BTreeMap<String, String>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                return Err(storage_error(&self.path, e));
            }
        };

        Ok(serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring unreadable token file {}: {}", self.path.display(), e);
            BTreeMap::new()
        }))
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> ApiResult<()> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(storage_error(&self.path, e)),
            };
        }

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| storage_error(parent, e))?;
        }

        let raw = serde_json::to_string_pretty(entries)
            .map_err(|e| storage_error(&self.path, e))?;
        fs::write(&self.path, raw).map_err(|e| storage_error(&self.path, e))
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self) -> Option<String> {
        self.read_entries().ok()?.remove(TOKEN_KEY)
    }

    fn set(&self, token: &str) -> ApiResult<()> {
        let mut entries = self.read_entries()?;
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        self.write_entries(&entries)
    }

    fn remove(&self) -> ApiResult<()> {
        let mut entries = self.read_entries()?;
        if entries.remove(TOKEN_KEY).is_none() {
            return Ok(());
        }
        self.write_entries(&entries)
    }
}

fn storage_error(path: &Path, err: impl std::fmt::Display) -> ApiError {
    ApiError::Storage(format!(
        "Failed to access token file {}: {}",
        path.display(),
        err
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_remove() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);

        store.set("abc").unwrap();
        assert_eq!(store.get(), Some("abc".to_string()));

        store.remove().unwrap();
        assert_eq!(store.get(), None);
        store.remove().unwrap();
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");
        let store = FileTokenStore::new(&path);

        assert_eq!(store.get(), None);
        store.set("token-1").unwrap();
        assert!(path.exists());

        // A second handle on the same file sees the token
        let reopened = FileTokenStore::new(&path);
        assert_eq!(reopened.get(), Some("token-1".to_string()));

        reopened.remove().unwrap();
        assert_eq!(store.get(), None);
        assert!(!path.exists());
    }

    #[test]
    fn test_file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileTokenStore::new(&path);
        store.set("token-2").unwrap();
        store.remove().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("dark"));
        assert!(!raw.contains("token-2"));
    }

    #[test]
    fn test_file_store_treats_garbage_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_file_store_does_not_overwrite_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the token path cannot be read as a file
        let path = dir.path().join("session.json");
        fs::create_dir(&path).unwrap();

        let store = FileTokenStore::new(&path);
        assert_eq!(store.get(), None);

        let err = store.set("token-3").unwrap_err();
        assert!(matches!(err, ApiError::Storage(_)));
        assert!(store.remove().is_err());
        assert!(path.is_dir());
    }
}
