//! Persistent local session storage
//!
//! Mirrors browser local storage: string values under fixed keys. The
//! [`SessionStore`] is the only code that reads or clears these keys.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use shared::{Session, User};

use crate::error::{ClientError, ClientResult};

/// Key holding the bearer token
pub const TOKEN_KEY: &str = "token";

/// Key holding the JSON user record
pub const USER_KEY: &str = "user";

/// Key/value persistence backing the session store
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> ClientResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> ClientResult<()>;
    fn remove(&self, key: &str) -> ClientResult<()>;
    /// Drop every key, including ones the store does not know about
    fn clear(&self) -> ClientResult<()>;
}

/// Volatile storage, scoped to the process
#[derive(Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory storage lock poisoned".into()))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory storage lock poisoned".into()))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory storage lock poisoned".into()))?;
        entries.remove(key);
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| ClientError::Storage("memory storage lock poisoned".into()))?;
        entries.clear();
        Ok(())
    }
}

/// Storage persisted as a JSON object in a single file
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> ClientResult<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        if raw.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&raw)?)
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> ClientResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    fn modify(&self, f: impl FnOnce(&mut HashMap<String, String>)) -> ClientResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::Storage("file storage lock poisoned".into()))?;
        // An unreadable file is replaced rather than left blocking writes
        let mut entries = self.read_all().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable session file {}: {}", self.path.display(), e);
            HashMap::new()
        });
        f(&mut entries);
        self.write_all(&entries)
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> ClientResult<Option<String>> {
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> ClientResult<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> ClientResult<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> ClientResult<()> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| ClientError::Storage("file storage lock poisoned".into()))?;
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Single owner of the persisted session
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::new())
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileStorage::new(path))
    }

    /// The stored session, only if both token and a readable user record exist
    pub fn load(&self) -> Option<Session> {
        let token = self.read(TOKEN_KEY).filter(|t| !t.trim().is_empty())?;
        let raw_user = self.read(USER_KEY)?;
        match serde_json::from_str::<User>(&raw_user) {
            Ok(user) => Some(Session::new(token, user)),
            Err(e) => {
                tracing::warn!("Stored user record is unreadable: {}", e);
                None
            }
        }
    }

    /// The stored token, regardless of the user record
    pub fn token(&self) -> Option<String> {
        self.read(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    /// Persist a session created by a login
    pub fn save(&self, session: &Session) -> ClientResult<()> {
        self.storage.set(USER_KEY, &serde_json::to_string(&session.user)?)?;
        self.storage.set(TOKEN_KEY, &session.token)?;
        Ok(())
    }

    /// Refresh the stored user record after a profile fetch
    pub fn update_user(&self, user: &User) -> ClientResult<()> {
        self.storage.set(USER_KEY, &serde_json::to_string(user)?)
    }

    /// Clear the session. Used by both verification failure and logout.
    pub fn invalidate(&self) {
        if let Err(e) = self.storage.clear() {
            tracing::warn!("Failed to clear session storage, removing keys: {}", e);
            for key in [TOKEN_KEY, USER_KEY] {
                if let Err(e) = self.storage.remove(key) {
                    tracing::error!("Failed to clear {} from session storage: {}", key, e);
                }
            }
        }
        tracing::info!("Local session cleared");
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read {} from session storage: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new("tok-123", User::new("Asha", "asha@farm.in"))
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let store = SessionStore::in_memory();
        store.save(&session()).unwrap();
        assert_eq!(store.load(), Some(session()));
    }

    #[test]
    fn test_partial_session_is_absent() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok-123").unwrap();
        let store = SessionStore::new(storage);
        assert!(store.load().is_none());
        assert_eq!(store.token().as_deref(), Some("tok-123"));
    }

    #[test]
    fn test_unreadable_user_is_absent() {
        let storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "tok-123").unwrap();
        storage.set(USER_KEY, "{not json").unwrap();
        assert!(SessionStore::new(storage).load().is_none());
    }

    #[test]
    fn test_invalidate_clears_both_keys() {
        let store = SessionStore::in_memory();
        store.save(&session()).unwrap();
        store.invalidate();
        assert!(store.load().is_none());
        assert!(store.token().is_none());
    }

    #[test]
    fn test_file_storage_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("session.json");

        SessionStore::file(&path).save(&session()).unwrap();
        assert_eq!(SessionStore::file(&path).load(), Some(session()));

        SessionStore::file(&path).invalidate();
        assert!(SessionStore::file(&path).load().is_none());
        assert!(!path.exists());
    }

    #[test]
    fn test_invalidate_removes_token_from_unreadable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(
            &path,
            r#"{"token":"tok-123","user":{"name":"Asha","email":"asha@farm.in"}}"#,
        )
        .unwrap();

        let store = SessionStore::file(&path);
        store.invalidate();

        assert!(store.token().is_none());
        assert!(!fs::read_to_string(&path).unwrap_or_default().contains("tok-123"));
    }

    #[test]
    fn test_save_recovers_from_corrupt_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::file(&path);
        store.save(&session()).unwrap();

        assert_eq!(store.load(), Some(session()));
    }
}
