//! Bearer token persistence

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use log::warn;
use serde_json::json;

/// Key under which the token is persisted, matching the web client
const TOKEN_KEY: &str = "authToken";

/// Storage for the session's bearer token.
///
/// Load/save/clear are infallible from the caller's point of view: a store
/// that cannot persist degrades to in-memory behavior and logs a warning.
pub trait TokenStore: Send + Sync {
    /// Load the persisted token, if any
    fn load(&self) -> Option<String>;

    /// Persist the token
    fn save(&self, token: &str);

    /// Remove the persisted token
    fn clear(&self);
}

/// In-memory token store, the default for tests and ephemeral clients
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self {
            token: RwLock::new(None),
        }
    }

    /// Create a store pre-loaded with a token
    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl Default for MemoryTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn save(&self, token: &str) {
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token.to_string());
        }
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
    }
}

/// Token store backed by a JSON file, keyed `authToken`
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let contents = fs::read_to_string(&self.path).ok()?;
        let value: serde_json::Value = serde_json::from_str(&contents).ok()?;
        value
            .get(TOKEN_KEY)
            .and_then(|t| t.as_str())
            .map(|t| t.to_string())
    }

    fn save(&self, token: &str) {
        let body = json!({ TOKEN_KEY: token }).to_string();
        if let Err(err) = fs::write(&self.path, body) {
            warn!("failed to persist auth token to {}: {}", self.path.display(), err);
        }
    }

    fn clear(&self) {
        if self.path.exists() {
            if let Err(err) = fs::remove_file(&self.path) {
                warn!("failed to clear auth token at {}: {}", self.path.display(), err);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.load(), None);
        store.save("tok1");
        assert_eq!(store.load(), Some("tok1".to_string()));
        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn file_store_uses_auth_token_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let store = FileTokenStore::new(&path);

        store.save("tok1");
        let raw = std::fs::read_to_string(&path).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["authToken"], "tok1");

        assert_eq!(store.load(), Some("tok1".to_string()));
        store.clear();
        assert_eq!(store.load(), None);
        assert!(!path.exists());
    }
}
