use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::storage::{DurableStore, MemoryStore};

/// Durable key holding the raw bearer token
pub const TOKEN_KEY: &str = "authToken";

/// Durable key holding the JSON-encoded signed-in user
pub const USER_KEY: &str = "currentUser";

/// Identity of the signed-in actor, as returned by login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

/// The `{token, user}` pair. `user` is only ever set alongside a token.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    token: Option<String>,
    user: Option<SessionUser>,
}

impl Session {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn user(&self) -> Option<&SessionUser> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Holder of the current session, mirrored into a durable store.
///
/// Every mutation replaces the whole pair under one write lock, so readers
/// never see a token from one session next to the user of another. Durable
/// writes happen after that lock is released, under a separate writer lock
/// that keeps storage in the same order as memory. Storage failures are
/// logged and otherwise ignored; the in-memory state is authoritative for
/// the life of the process.
pub struct SessionStore {
    storage: Arc<dyn DurableStore>,
    state: RwLock<Session>,
    writer: Mutex<()>,
    initialized: AtomicBool,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn DurableStore>) -> Self {
        Self {
            storage,
            state: RwLock::new(Session::default()),
            writer: Mutex::new(()),
            initialized: AtomicBool::new(false),
        }
    }

    /// A store that forgets everything when the process exits.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::default()))
    }

    /// Load the persisted session into memory.
    ///
    /// Only the first call reads storage; later calls are no-ops. An empty,
    /// unreadable or corrupted store leaves the session logged out.
    pub fn init_auth(&self) {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return;
        }
        let _writer = self.writer.lock();

        let token = match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read stored auth token");
                return;
            }
        };

        let user = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<SessionUser>(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored user is corrupted, starting logged out");
                    return;
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read stored user");
                return;
            }
        };

        if token.is_none() {
            if user.is_some() {
                warn!("Stored user has no token, ignoring it");
            }
            debug!("No stored session");
            return;
        }

        info!(has_user = user.is_some(), "Session restored from storage");
        *self.state.write() = Session { token, user };
    }

    /// Set or clear the token. Clearing it also drops the user.
    pub fn set_token(&self, token: Option<String>) {
        let _writer = self.writer.lock();
        match token {
            Some(token) => {
                self.state.write().token = Some(token.clone());
                self.persist(TOKEN_KEY, Some(&token));
            }
            None => {
                *self.state.write() = Session::default();
                self.persist(TOKEN_KEY, None);
                self.persist(USER_KEY, None);
            }
        }
    }

    /// Set or clear the signed-in user. A user without a token is refused.
    pub fn set_current_user(&self, user: Option<SessionUser>) {
        let _writer = self.writer.lock();
        match user {
            Some(user) => {
                let raw = {
                    let mut state = self.state.write();
                    if state.token.is_none() {
                        warn!(user_id = %user.id, "Refusing to store a user without a token");
                        return;
                    }
                    let raw = encode_user(&user);
                    state.user = Some(user);
                    raw
                };
                if let Some(raw) = raw {
                    self.persist(USER_KEY, Some(&raw));
                }
            }
            None => {
                self.state.write().user = None;
                self.persist(USER_KEY, None);
            }
        }
    }

    /// Replace the session with a freshly authenticated one.
    pub fn establish(&self, token: String, user: SessionUser) {
        let _writer = self.writer.lock();
        let raw = encode_user(&user);
        info!(user_id = %user.id, "Session established");
        *self.state.write() = Session {
            token: Some(token.clone()),
            user: Some(user),
        };

        self.persist(TOKEN_KEY, Some(&token));
        if let Some(raw) = raw {
            self.persist(USER_KEY, Some(&raw));
        }
    }

    /// Drop the session from memory and durable storage.
    pub fn clear(&self) {
        let _writer = self.writer.lock();
        let previous = std::mem::take(&mut *self.state.write());
        if previous.is_authenticated() {
            info!("Session cleared");
        }
        self.persist(TOKEN_KEY, None);
        self.persist(USER_KEY, None);
    }

    pub fn token(&self) -> Option<String> {
        self.state.read().token.clone()
    }

    pub fn current_user(&self) -> Option<SessionUser> {
        self.state.read().user.clone()
    }

    /// Both halves of the session, read together.
    pub fn snapshot(&self) -> Session {
        self.state.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().is_authenticated()
    }

    fn persist(&self, key: &str, value: Option<&str>) {
        let result = match value {
            Some(value) => self.storage.set(key, value),
            None => self.storage.remove(key),
        };
        if let Err(e) = result {
            warn!(key, error = %e, "Failed to persist session entry");
        }
    }
}

fn encode_user(user: &SessionUser) -> Option<String> {
    serde_json::to_string(user)
        .map_err(|e| warn!(error = %e, "Failed to encode user for storage"))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::storage::StorageError;
    use std::sync::{OnceLock, Weak};

    /// A store whose every access fails, like a locked-down profile directory.
    struct UnavailableStore;

    impl DurableStore for UnavailableStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other("storage disabled")))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("storage disabled")))
        }
        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("storage disabled")))
        }
    }

    /// Records, for every durable write, whether the session was readable.
    #[derive(Default)]
    struct ObservingStore {
        session: OnceLock<Weak<SessionStore>>,
        inner: MemoryStore,
        readable: Mutex<Vec<bool>>,
    }

    impl ObservingStore {
        fn observe(&self) {
            if let Some(session) = self.session.get().and_then(Weak::upgrade) {
                self.readable.lock().push(session.state.try_read().is_some());
            }
        }
    }

    impl DurableStore for ObservingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }
        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.observe();
            self.inner.set(key, value)
        }
        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.observe();
            self.inner.remove(key)
        }
    }

    fn admin() -> SessionUser {
        SessionUser {
            id: "u-1".to_string(),
            email: "admin@shelter.org".to_string(),
            role: "admin".to_string(),
        }
    }

    #[test]
    fn test_set_token_none_clears_memory_and_storage() {
        let storage = Arc::new(MemoryStore::default());
        let store = SessionStore::new(storage.clone());

        store.establish("tok".to_string(), admin());
        assert!(storage.contains(TOKEN_KEY));
        assert!(storage.contains(USER_KEY));

        store.set_token(None);
        assert_eq!(store.token(), None);
        assert_eq!(store.current_user(), None);
        assert!(!storage.contains(TOKEN_KEY));
        assert!(!storage.contains(USER_KEY));
    }

    #[test]
    fn test_init_auth_restores_stored_session() {
        let raw_user = serde_json::to_string(&admin()).expect("encode");
        let storage = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "stored-token".to_string()),
            (USER_KEY, raw_user),
        ]));
        let store = SessionStore::new(storage);

        store.init_auth();
        assert_eq!(store.token().as_deref(), Some("stored-token"));
        assert_eq!(store.current_user(), Some(admin()));
    }

    #[test]
    fn test_init_auth_with_empty_store_stays_logged_out() {
        let store = SessionStore::in_memory();
        store.init_auth();
        assert_eq!(store.token(), None);
        assert_eq!(store.current_user(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_init_auth_with_corrupted_user_stays_logged_out() {
        let storage = Arc::new(MemoryStore::with_entries([
            (TOKEN_KEY, "stored-token"),
            (USER_KEY, "{broken"),
        ]));
        let store = SessionStore::new(storage);
        store.init_auth();
        assert_eq!(store.snapshot(), Session::default());
    }

    #[test]
    fn test_init_auth_tolerates_unavailable_storage() {
        let store = SessionStore::new(Arc::new(UnavailableStore));
        store.init_auth();
        assert!(!store.is_authenticated());

        // Mutations still work in memory even though nothing is persisted
        store.establish("tok".to_string(), admin());
        assert_eq!(store.token().as_deref(), Some("tok"));
        store.clear();
        assert_eq!(store.token(), None);
    }

    #[test]
    fn test_init_auth_reads_storage_once() {
        let storage = Arc::new(MemoryStore::with_entries([(TOKEN_KEY, "first")]));
        let store = SessionStore::new(storage.clone());

        store.init_auth();
        storage.set(TOKEN_KEY, "second").expect("set");
        store.init_auth();

        assert_eq!(store.token().as_deref(), Some("first"));
    }

    #[test]
    fn test_stored_user_without_token_is_ignored() {
        let raw_user = serde_json::to_string(&admin()).expect("encode");
        let storage = Arc::new(MemoryStore::with_entries([(USER_KEY, raw_user)]));
        let store = SessionStore::new(storage);
        store.init_auth();
        assert_eq!(store.current_user(), None);
    }

    #[test]
    fn test_set_current_user_requires_token() {
        let storage = Arc::new(MemoryStore::default());
        let store = SessionStore::new(storage.clone());

        store.set_current_user(Some(admin()));
        assert_eq!(store.current_user(), None);
        assert!(!storage.contains(USER_KEY));

        store.set_token(Some("tok".to_string()));
        store.set_current_user(Some(admin()));
        assert_eq!(store.current_user(), Some(admin()));
        assert!(storage.contains(USER_KEY));

        store.set_current_user(None);
        assert_eq!(store.current_user(), None);
        assert_eq!(store.token().as_deref(), Some("tok"));
    }

    #[test]
    fn test_snapshot_pairs_token_and_user() {
        let store = SessionStore::in_memory();
        store.establish("tok".to_string(), admin());

        let snapshot = store.snapshot();
        assert_eq!(snapshot.token(), Some("tok"));
        assert_eq!(snapshot.user(), Some(&admin()));
        assert!(snapshot.is_authenticated());
    }

    #[test]
    fn test_readers_are_not_blocked_by_durable_writes() {
        let storage = Arc::new(ObservingStore::default());
        let store = Arc::new(SessionStore::new(storage.clone()));
        storage
            .session
            .set(Arc::downgrade(&store))
            .expect("session registered once");

        store.establish("tok".to_string(), admin());
        assert!(storage.inner.contains(TOKEN_KEY));
        assert!(storage.inner.contains(USER_KEY));

        store.set_current_user(None);
        store.set_token(None);
        store.clear();
        assert!(!storage.inner.contains(TOKEN_KEY));

        let readable = storage.readable.lock();
        assert_eq!(readable.len(), 7);
        assert!(readable.iter().all(|r| *r));
    }
}
