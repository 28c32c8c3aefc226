//! Persistent session store.
//!
//! A key/value store with change notification for one reserved key, the
//! session key. Every writer in the process (login module, dispatcher,
//! profile edit, logout) goes through the same [`PersistentStore`], so a
//! write to the session key always reaches the registered
//! [`SessionObserver`]s, whichever code path issued it.
//!
//! Observers run synchronously, after the backend write completes, and only
//! see a read-only snapshot of the new identity. A session write issued while
//! observers are running is stored but not re-announced.

pub mod backend;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use farmaweb_core::SessionIdentity;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

pub use backend::{FileBackend, KeyValueBackend, MemoryBackend};

/// Errors from the key/value layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value or the backing file is not valid JSON.
    #[error("storage JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A writer panicked while holding the backend lock.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// Receives the new session identity after every write or delete of the
/// session key.
pub trait SessionObserver: Send + Sync {
    /// Called with the identity now stored, or `None` after logout.
    fn session_changed(&self, identity: Option<&SessionIdentity>);
}

/// Key/value store with session-key change notification.
pub struct PersistentStore {
    backend: Box<dyn KeyValueBackend>,
    session_key: String,
    observers: RwLock<Vec<Arc<dyn SessionObserver>>>,
    reconciling: AtomicBool,
}

impl std::fmt::Debug for PersistentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistentStore")
            .field("session_key", &self.session_key)
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}

impl PersistentStore {
    /// Wrap `backend`, treating `session_key` as the reserved session key.
    #[must_use]
    pub fn new(backend: Box<dyn KeyValueBackend>, session_key: impl Into<String>) -> Self {
        Self {
            backend,
            session_key: session_key.into(),
            observers: RwLock::new(Vec::new()),
            reconciling: AtomicBool::new(false),
        }
    }

    /// The reserved session key.
    #[must_use]
    pub fn session_key(&self) -> &str {
        &self.session_key
    }

    /// Register an observer for session-key changes.
    pub fn subscribe(&self, observer: Arc<dyn SessionObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
        tracing::debug!(session_key = %self.session_key, "Session observer registered");
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Read the raw value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    pub fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.get(key)
    }

    /// Store `value` under `key`. Notifies observers when `key` is the
    /// session key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails; observers are not
    /// notified in that case.
    pub fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.set(key, value)?;
        if key == self.session_key {
            tracing::info!("Session updated, reconciling");
            self.reconcile();
        }
        Ok(())
    }

    /// Delete `key`. Notifies observers when `key` is the session key.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails; observers are not
    /// notified in that case.
    pub fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.remove(key)?;
        if key == self.session_key {
            tracing::info!("Session cleared, reconciling");
            self.reconcile();
        }
        Ok(())
    }

    /// Read and deserialize the JSON value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the value does not
    /// deserialize into `T`.
    pub fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        self.get(key)?
            .map(|raw| serde_json::from_str(&raw))
            .transpose()
            .map_err(StoreError::from)
    }

    /// Serialize `value` as JSON and store it under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend write fails.
    pub fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }

    /// The current session identity.
    ///
    /// An unreadable or malformed record is logged and treated as no session.
    #[must_use]
    pub fn session(&self) -> Option<SessionIdentity> {
        match self.get_json::<SessionIdentity>(&self.session_key) {
            Ok(identity) => identity,
            Err(e) => {
                tracing::warn!(error = %e, "Stored session is unreadable; treating as anonymous");
                None
            }
        }
    }

    /// Store `identity` as the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend write fails.
    pub fn set_session(&self, identity: &SessionIdentity) -> Result<(), StoreError> {
        self.set_json(&self.session_key, identity)
    }

    /// Remove the current session.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend delete fails.
    pub fn clear_session(&self) -> Result<(), StoreError> {
        self.remove(&self.session_key)
    }

    /// Notify every observer of the session currently stored, without
    /// writing. Used once at start-up.
    pub fn refresh(&self) {
        self.reconcile();
    }

    fn reconcile(&self) {
        if self.reconciling.swap(true, Ordering::SeqCst) {
            tracing::warn!("Session written during reconciliation; not re-notifying observers");
            return;
        }
        let _guard = ReconcileGuard(&self.reconciling);

        let identity = self.session();
        // Snapshot the list so observers never run under the lock.
        let observers: Vec<Arc<dyn SessionObserver>> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for observer in &observers {
            observer.session_changed(identity.as_ref());
        }
    }
}

/// Clears the reconciling flag even if an observer panics.
struct ReconcileGuard<'a>(&'a AtomicBool);

impl Drop for ReconcileGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    const SESSION: &str = "currentUser";

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<Option<String>>>,
    }

    impl SessionObserver for Recorder {
        fn session_changed(&self, identity: Option<&SessionIdentity>) {
            self.seen
                .lock()
                .unwrap()
                .push(identity.and_then(|i| i.username.clone()));
        }
    }

    fn store_with_recorder() -> (PersistentStore, Arc<Recorder>) {
        let store = PersistentStore::new(Box::new(MemoryBackend::new()), SESSION);
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());
        (store, recorder)
    }

    #[test]
    fn test_raw_session_write_notifies() {
        let (store, recorder) = store_with_recorder();

        store.set(SESSION, r#"{"username":"bob"}"#).unwrap();

        assert_eq!(*recorder.seen.lock().unwrap(), vec![Some("bob".to_string())]);
    }

    #[test]
    fn test_session_remove_notifies_with_none() {
        let (store, recorder) = store_with_recorder();

        store.set_session(&SessionIdentity::new("bob")).unwrap();
        store.clear_session().unwrap();

        assert_eq!(
            *recorder.seen.lock().unwrap(),
            vec![Some("bob".to_string()), None]
        );
        assert!(store.session().is_none());
    }

    #[test]
    fn test_other_keys_do_not_notify() {
        let (store, recorder) = store_with_recorder();

        store.set("cart", "[]").unwrap();
        store.remove("pending_category").unwrap();

        assert!(recorder.seen.lock().unwrap().is_empty());
        assert_eq!(store.get("cart").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn test_malformed_session_reads_as_anonymous() {
        let (store, recorder) = store_with_recorder();

        store.set(SESSION, "{not json").unwrap();

        assert!(store.session().is_none());
        assert_eq!(*recorder.seen.lock().unwrap(), vec![None]);
    }

    #[test]
    fn test_observer_write_does_not_loop() {
        struct Rewriter {
            store: Mutex<Option<Arc<PersistentStore>>>,
            calls: Mutex<usize>,
        }

        impl SessionObserver for Rewriter {
            fn session_changed(&self, _identity: Option<&SessionIdentity>) {
                *self.calls.lock().unwrap() += 1;
                if let Some(store) = self.store.lock().unwrap().as_ref() {
                    store.set(SESSION, r#"{"username":"loop"}"#).unwrap();
                }
            }
        }

        let store = Arc::new(PersistentStore::new(Box::new(MemoryBackend::new()), SESSION));
        let rewriter = Arc::new(Rewriter {
            store: Mutex::new(Some(store.clone())),
            calls: Mutex::new(0),
        });
        store.subscribe(rewriter.clone());

        store.set(SESSION, r#"{"username":"bob"}"#).unwrap();

        assert_eq!(*rewriter.calls.lock().unwrap(), 1);
        assert_eq!(store.session().unwrap().username.as_deref(), Some("loop"));

        // Break the Arc cycle.
        rewriter.store.lock().unwrap().take();
    }

    #[test]
    fn test_failed_session_write_is_not_visible() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path().join("missing-dir").join("store.json")).unwrap();
        let store = PersistentStore::new(Box::new(backend), SESSION);
        let recorder = Arc::new(Recorder::default());
        store.subscribe(recorder.clone());

        assert!(store.set(SESSION, r#"{"username":"superadmin"}"#).is_err());

        assert!(recorder.seen.lock().unwrap().is_empty());
        assert!(store.session().is_none());
    }

    #[test]
    fn test_refresh_notifies_with_stored_session() {
        let store = PersistentStore::new(
            Box::new(MemoryBackend::with_entries([(SESSION, r#"{"username":"ana"}"#)])),
            SESSION,
        );
        let first = Arc::new(Recorder::default());
        let second = Arc::new(Recorder::default());
        store.subscribe(first.clone());
        store.subscribe(second.clone());

        store.refresh();

        assert_eq!(*first.seen.lock().unwrap(), vec![Some("ana".to_string())]);
        assert_eq!(*second.seen.lock().unwrap(), vec![Some("ana".to_string())]);
    }

    #[test]
    fn test_json_helpers() {
        let store = PersistentStore::new(Box::new(MemoryBackend::new()), SESSION);

        store.set_json("numbers", &[1, 2, 3]).unwrap();
        let numbers: Option<Vec<u32>> = store.get_json("numbers").unwrap();
        assert_eq!(numbers, Some(vec![1, 2, 3]));

        let missing: Option<Vec<u32>> = store.get_json("absent").unwrap();
        assert!(missing.is_none());

        store.set("bad", "[").unwrap();
        assert!(store.get_json::<Vec<u32>>("bad").is_err());
    }
}
