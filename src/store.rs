//! Session persistence over a pluggable key-value store

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::auth::User;
use crate::error::Error;

/// Storage key for the serialized user record
const USER_KEY: &str = "user";

/// Storage key for the raw bearer token
const TOKEN_KEY: &str = "token";

/// Key-value storage the session is persisted to.
///
/// Keeping this a trait means the medium (in-memory map, file on disk, a
/// platform keychain) is swappable without touching the auth gateway.
pub trait KvStore: Send + Sync {
    /// Return the value stored under `key`, if any
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str);

    /// Remove the value stored under `key`, if any
    fn remove(&self, key: &str);
}

/// In-memory store; contents are lost when the client is dropped
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl KvStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
    }
}

/// File-backed store, persisted as a single JSON object.
///
/// An unreadable or malformed file is treated as an empty store; a failed
/// write is logged and the in-memory contents stay authoritative for the
/// rest of the process.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, loading whatever it currently holds
    pub fn open<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = std::fs::read_to_string(&path)
            .ok()
            .and_then(|text| serde_json::from_str(&text).ok())
            .unwrap_or_default();

        Self {
            path,
            entries: Mutex::new(entries),
        }
    }

    fn persist(&self, entries: &HashMap<String, String>) {
        match serde_json::to_string(entries) {
            Ok(text) => {
                if let Err(err) = std::fs::write(&self.path, text) {
                    log::warn!("failed to persist store to {}: {}", self.path.display(), err);
                }
            }
            Err(err) => log::warn!("failed to serialize store: {}", err),
        }
    }
}

impl KvStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.lock().unwrap();
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value.to_string());
        self.persist(&entries);
    }

    fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap();
        entries.remove(key);
        self.persist(&entries);
    }
}

/// Persistent session state: the serialized current user plus the raw bearer
/// token under its own key, so it can be attached to requests without
/// deserializing the whole user.
pub struct SessionStore {
    store: Box<dyn KvStore>,
}

impl SessionStore {
    /// Create a session store over the given key-value store
    pub fn new(store: Box<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Persist the full user record and its token
    pub fn save(&self, user: &User) -> Result<(), Error> {
        let json = serde_json::to_string(user)?;
        self.store.set(USER_KEY, &json);
        self.store.set(TOKEN_KEY, &user.token);
        Ok(())
    }

    /// Load the stored user, if any.
    ///
    /// A malformed entry is discarded and reported as "no session"; a parse
    /// error never reaches the caller.
    pub fn load(&self) -> Option<User> {
        let json = self.store.get(USER_KEY)?;
        match serde_json::from_str(&json) {
            Ok(user) => Some(user),
            Err(err) => {
                log::warn!("discarding malformed stored session: {}", err);
                self.clear();
                None
            }
        }
    }

    /// Return the stored bearer token, if any
    pub fn token(&self) -> Option<String> {
        self.store.get(TOKEN_KEY)
    }

    /// Remove both the user record and the token
    pub fn clear(&self) {
        self.store.remove(USER_KEY);
        self.store.remove(TOKEN_KEY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 7,
            name: "Maria Souza".to_string(),
            email: "maria@example.com".to_string(),
            company_name: "Acme".to_string(),
            creation_date: "2020-01-01".to_string(),
            profile_picture_path: String::new(),
            preferences: String::new(),
            token: "tok-123".to_string(),
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let store = SessionStore::new(Box::new(MemoryStore::new()));
        let user = sample_user();

        store.save(&user).unwrap();

        assert_eq!(store.load(), Some(user));
        assert_eq!(store.token().as_deref(), Some("tok-123"));
    }

    #[test]
    fn malformed_entry_is_discarded() {
        let kv = MemoryStore::new();
        kv.set(USER_KEY, "{not json");
        kv.set(TOKEN_KEY, "tok-123");

        let store = SessionStore::new(Box::new(kv));

        assert_eq!(store.load(), None);
        // The corrupt entry is removed, not kept around
        assert_eq!(store.token(), None);
    }

    #[test]
    fn clear_removes_both_keys() {
        let store = SessionStore::new(Box::new(MemoryStore::new()));
        store.save(&sample_user()).unwrap();

        store.clear();

        assert_eq!(store.load(), None);
        assert_eq!(store.token(), None);
    }

    #[test]
    fn file_store_round_trips_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let user = sample_user();

        {
            let store = SessionStore::new(Box::new(FileStore::open(&path)));
            store.save(&user).unwrap();
        }

        let store = SessionStore::new(Box::new(FileStore::open(&path)));
        assert_eq!(store.load(), Some(user));
    }

    #[test]
    fn file_store_tolerates_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::open(dir.path().join("absent.json"));

        assert_eq!(store.get(USER_KEY), None);
    }
}
