//! Session state.
//!
//! The session record lives in browser storage under one key. [`SessionStore`]
//! is the only code that touches that key and [`AuthContext`] is the only code
//! that calls [`SessionStore`]; views receive the context and go through its
//! `on_login` / `on_profile_updated` / `logout` methods.

use crate::web::storage::{KeyValueStore, LocalStorage};
use std::rc::Rc;
use gogreen_shared::{SESSION_STORAGE_KEY, SessionUser};
use leptos::prelude::*;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    #[error("Unable to encode session: {0}")]
    Encode(String),
    #[error("Unable to save your session in this browser")]
    StorageUnavailable,
}

/// Persistence for the single session record.
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionStore<S = LocalStorage> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The last persisted record; absent or corrupt data reads as no session.
    pub fn load(&self) -> Option<SessionUser> {
        let raw = self.storage.get(SESSION_STORAGE_KEY)?;
        match serde_json::from_str::<SessionUser>(&raw) {
            Ok(user) => Some(user),
            Err(e) => {
                log::warn!("Ignoring corrupt session data: {e}");
                None
            }
        }
    }

    /// Replaces the stored record as a whole; fields are never merged.
    pub fn persist(&self, user: &SessionUser) -> Result<(), SessionError> {
        let raw = serde_json::to_string(user).map_err(|e| SessionError::Encode(e.to_string()))?;
        if self.storage.set(SESSION_STORAGE_KEY, &raw) {
            Ok(())
        } else {
            Err(SessionError::StorageUnavailable)
        }
    }

    pub fn clear(&self) {
        self.storage.delete(SESSION_STORAGE_KEY);
    }
}

/// In-memory session state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub user: Option<SessionUser>,
    /// Email handed from registration to OTP verification. Memory only.
    pub pending_email: Option<String>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

type SharedSessionStore = SessionStore<Rc<dyn KeyValueStore>>;

/// Session context.
///
/// Shared through Leptos context; the signals are the read side, the methods
/// the only write side.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub state: ReadSignal<AuthState>,
    set_state: WriteSignal<AuthState>,
    authenticated: Memo<bool>,
    email: Memo<String>,
    store: StoredValue<SharedSessionStore, leptos::reactive::owner::LocalStorage>,
}

impl AuthContext {
    /// Creates the context over browser storage.
    pub fn new() -> Self {
        Self::with_store(LocalStorage)
    }

    /// Creates the context, seeded from whatever `storage` holds.
    pub fn with_store(storage: impl KeyValueStore + 'static) -> Self {
        let storage: Rc<dyn KeyValueStore> = Rc::new(storage);
        let store = SessionStore::new(storage);
        let (state, set_state) = signal(AuthState {
            user: store.load(),
            pending_email: None,
        });
        // Memos, so profile refreshes that keep the same user don't re-run
        // the router guard or the per-email fetches.
        let authenticated = Memo::new(move |_| state.with(AuthState::is_authenticated));
        let email = Memo::new(move |_| {
            state.with(|s| {
                s.user
                    .as_ref()
                    .map(|u| u.email.clone())
                    .unwrap_or_default()
            })
        });
        Self {
            state,
            set_state,
            authenticated,
            email,
            store: StoredValue::new_local(store),
        }
    }

    /// Auth flag injected into the router guard.
    pub fn is_authenticated_signal(&self) -> Signal<bool> {
        self.authenticated.into()
    }

    pub fn user(&self) -> Signal<Option<SessionUser>> {
        let state = self.state;
        Signal::derive(move || state.with(|s| s.user.clone()))
    }

    /// Session email, empty when logged out.
    pub fn email(&self) -> Memo<String> {
        self.email
    }

    pub fn pending_email(&self) -> Option<String> {
        self.state.with_untracked(|s| s.pending_email.clone())
    }

    pub fn set_pending_email(&self, email: String) {
        self.set_state.update(|s| s.pending_email = Some(email));
    }

    /// Successful login or OTP verification.
    pub fn on_login(&self, user: SessionUser) -> Result<(), SessionError> {
        log::info!("Session started for {}", user.email);
        self.persist(user)
    }

    /// Profile sync or save returned a fresh user record.
    pub fn on_profile_updated(&self, user: SessionUser) -> Result<(), SessionError> {
        log::info!("Session refreshed for {}", user.email);
        self.persist(user)
    }

    /// Storage first, then memory; a failed write leaves both untouched.
    fn persist(&self, user: SessionUser) -> Result<(), SessionError> {
        self.store.with_value(|store| store.persist(&user))?;
        self.set_state.update(|s| {
            s.user = Some(user);
            s.pending_email = None;
        });
        Ok(())
    }

    /// Clears storage and memory.
    ///
    /// The router's auth watcher moves the user off protected pages.
    pub fn logout(&self) {
        self.store.with_value(|store| store.clear());
        self.set_state.set(AuthState::default());
        log::info!("Session cleared");
    }
}

/// The session context provided by `App`.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>().expect("AuthContext should be provided")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::web::storage::tests::MemoryStore;

    fn user(name: &str, email: &str) -> SessionUser {
        SessionUser {
            id: Some(1),
            full_name: name.into(),
            email: email.into(),
            phone: "9845012345".into(),
            avatar: Some("https://cdn.example/a.png".into()),
            is_verified: Some(true),
        }
    }

    #[test]
    fn test_persist_then_load_is_identity() {
        let store = SessionStore::new(MemoryStore::new());
        let asha = user("Asha", "asha@example.com");

        store.persist(&asha).unwrap();
        assert_eq!(store.load(), Some(asha));
    }

    #[test]
    fn test_minimal_record_roundtrip() {
        let store = SessionStore::new(MemoryStore::new());
        let minimal = SessionUser {
            id: None,
            full_name: "R".into(),
            email: "r@example.com".into(),
            phone: String::new(),
            avatar: None,
            is_verified: None,
        };

        store.persist(&minimal).unwrap();
        assert_eq!(store.load(), Some(minimal));
    }

    #[test]
    fn test_absent_session() {
        let store = SessionStore::new(MemoryStore::new());
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_corrupt_session_reads_as_none() {
        let memory = MemoryStore::new();
        memory.set(SESSION_STORAGE_KEY, "{not json");
        let store = SessionStore::new(memory.clone());
        assert_eq!(store.load(), None);

        memory.set(SESSION_STORAGE_KEY, r#"{"phone": "1"}"#);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_persist_replaces_without_merge() {
        let memory = MemoryStore::new();
        let store = SessionStore::new(memory.clone());
        store.persist(&user("Asha", "asha@example.com")).unwrap();

        let replacement = SessionUser {
            avatar: None,
            ..user("Ravi", "ravi@example.com")
        };
        store.persist(&replacement).unwrap();

        assert_eq!(store.load(), Some(replacement));
        assert_eq!(memory.len(), 1);
    }

    #[test]
    fn test_clear_removes_record() {
        let store = SessionStore::new(MemoryStore::new());
        store.persist(&user("Asha", "asha@example.com")).unwrap();
        store.clear();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_rejected_write_is_reported() {
        let store = SessionStore::new(MemoryStore::read_only());
        assert_eq!(
            store.persist(&user("Asha", "asha@example.com")),
            Err(SessionError::StorageUnavailable)
        );
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_context_restores_stored_session() {
        Owner::new().with(|| {
            let memory = MemoryStore::new();
            SessionStore::new(memory.clone())
                .persist(&user("Asha", "asha@example.com"))
                .unwrap();

            let auth = AuthContext::with_store(memory);
            assert!(auth.is_authenticated_signal().get_untracked());
            assert_eq!(auth.email().get_untracked(), "asha@example.com");
        });
    }

    #[test]
    fn test_login_persists_and_drops_pending_email() {
        Owner::new().with(|| {
            let memory = MemoryStore::new();
            let auth = AuthContext::with_store(memory.clone());
            auth.set_pending_email("asha@example.com".into());

            let asha = user("Asha", "asha@example.com");
            auth.on_login(asha.clone()).unwrap();

            assert_eq!(SessionStore::new(memory).load(), Some(asha.clone()));
            assert_eq!(
                auth.state.get_untracked(),
                AuthState {
                    user: Some(asha),
                    pending_email: None,
                }
            );
        });
    }

    #[test]
    fn test_login_on_read_only_storage_keeps_memory() {
        Owner::new().with(|| {
            let auth = AuthContext::with_store(MemoryStore::read_only());
            auth.set_pending_email("asha@example.com".into());

            let result = auth.on_login(user("Asha", "asha@example.com"));

            assert_eq!(result, Err(SessionError::StorageUnavailable));
            assert!(!auth.is_authenticated_signal().get_untracked());
            assert_eq!(auth.pending_email().as_deref(), Some("asha@example.com"));
        });
    }

    #[test]
    fn test_profile_update_replaces_whole_user() {
        Owner::new().with(|| {
            let memory = MemoryStore::new();
            let auth = AuthContext::with_store(memory.clone());
            auth.on_login(user("Asha", "asha@example.com")).unwrap();

            let renamed = SessionUser {
                avatar: None,
                is_verified: None,
                ..user("Asha Rao", "asha@example.com")
            };
            auth.on_profile_updated(renamed.clone()).unwrap();

            assert_eq!(auth.user().get_untracked(), Some(renamed.clone()));
            assert_eq!(SessionStore::new(memory).load(), Some(renamed));
        });
    }

    #[test]
    fn test_logout_clears_storage_and_memory() {
        Owner::new().with(|| {
            let memory = MemoryStore::new();
            let auth = AuthContext::with_store(memory.clone());
            auth.on_login(user("Asha", "asha@example.com")).unwrap();

            auth.logout();

            assert_eq!(memory.len(), 0);
            assert_eq!(auth.state.get_untracked(), AuthState::default());
            assert_eq!(auth.email().get_untracked(), "");
        });
    }
}
