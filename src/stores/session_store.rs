// ============================================================================
// SESSION STORE - Authentication flag + user, over two storage scopes
// ============================================================================
// Durable scope = localStorage, volatile scope = sessionStorage. Either scope
// holding the flag is enough to count as logged in.
// ============================================================================

use std::rc::Rc;

use crate::error::StorageError;
use crate::models::{Session, StorageScope, User};
use crate::utils::constants::{STORAGE_KEY_CLIENT_ID, STORAGE_KEY_IS_LOGGED_IN, STORAGE_KEY_USER};
use crate::utils::storage::{load_json, save_json, KeyValueStore};

#[derive(Clone)]
pub struct SessionStore {
    durable: Rc<dyn KeyValueStore>,
    volatile: Rc<dyn KeyValueStore>,
}

impl SessionStore {
    pub fn new(durable: Rc<dyn KeyValueStore>, volatile: Rc<dyn KeyValueStore>) -> Self {
        Self { durable, volatile }
    }

    /// localStorage + sessionStorage of the current window.
    #[cfg(target_arch = "wasm32")]
    pub fn browser() -> Self {
        use crate::utils::BrowserStorage;
        Self::new(
            Rc::new(BrowserStorage::local()),
            Rc::new(BrowserStorage::session()),
        )
    }

    fn scope(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Durable => self.durable.as_ref(),
            StorageScope::Volatile => self.volatile.as_ref(),
        }
    }

    fn scopes(&self) -> [(StorageScope, &dyn KeyValueStore); 2] {
        [
            (StorageScope::Durable, self.durable.as_ref()),
            (StorageScope::Volatile, self.volatile.as_ref()),
        ]
    }

    /// True iff either scope holds `isLoggedIn == "true"`.
    pub fn is_authenticated(&self) -> bool {
        self.scopes().iter().any(|(scope, store)| {
            match store.get_item(STORAGE_KEY_IS_LOGGED_IN) {
                Ok(value) => value.as_deref() == Some("true"),
                Err(e) => {
                    log::warn!("⚠️ Could not read login flag from {:?} storage: {}", scope, e);
                    false
                }
            }
        })
    }

    /// Logs in to the durable scope.
    pub fn login(&self, user: &User) -> Result<(), StorageError> {
        self.login_in(StorageScope::Durable, user)
    }

    /// User record first, flag last: a failed write never leaves the flag set.
    pub fn login_in(&self, scope: StorageScope, user: &User) -> Result<(), StorageError> {
        let store = self.scope(scope);
        let written = save_json(store, STORAGE_KEY_USER, user)
            .and_then(|()| store.set_item(STORAGE_KEY_IS_LOGGED_IN, "true"));
        if let Err(e) = written {
            log::error!("❌ Could not store session ({:?}): {}", scope, e);
            for key in [STORAGE_KEY_IS_LOGGED_IN, STORAGE_KEY_USER] {
                let _ = store.remove_item(key);
            }
            return Err(e);
        }
        log::info!("✅ Session stored ({:?})", scope);
        Ok(())
    }

    /// Removes the flag and user from both scopes. Never fails.
    pub fn logout(&self) {
        for (scope, store) in self.scopes() {
            for key in [STORAGE_KEY_IS_LOGGED_IN, STORAGE_KEY_USER] {
                if let Err(e) = store.remove_item(key) {
                    log::warn!("⚠️ Could not clear '{}' from {:?} storage: {}", key, scope, e);
                }
            }
        }
        log::info!("👋 Session cleared");
    }

    /// User record of the first scope that is logged in.
    pub fn current_user(&self) -> Option<User> {
        self.scopes().iter().find_map(|(_, store)| {
            let logged_in = store
                .get_item(STORAGE_KEY_IS_LOGGED_IN)
                .ok()
                .flatten()
                .as_deref()
                == Some("true");
            if logged_in {
                load_json::<User>(*store, STORAGE_KEY_USER)
            } else {
                None
            }
        })
    }

    pub fn client_id(&self) -> Option<String> {
        self.durable
            .get_item(STORAGE_KEY_CLIENT_ID)
            .ok()
            .flatten()
            .filter(|id| !id.is_empty())
    }

    pub fn set_client_id(&self, client_id: &str) -> Result<(), StorageError> {
        self.durable.set_item(STORAGE_KEY_CLIENT_ID, client_id)
    }

    pub fn clear_client_id(&self) {
        if let Err(e) = self.durable.remove_item(STORAGE_KEY_CLIENT_ID) {
            log::warn!("⚠️ Could not clear clientID: {}", e);
        }
    }

    pub fn session(&self) -> Session {
        Session {
            is_logged_in: self.is_authenticated(),
            user: self.current_user(),
            correlation_token: self.client_id(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MemoryStorage;

    fn store() -> (SessionStore, MemoryStorage, MemoryStorage) {
        let durable = MemoryStorage::new();
        let volatile = MemoryStorage::new();
        let session = SessionStore::new(Rc::new(durable.clone()), Rc::new(volatile.clone()));
        (session, durable, volatile)
    }

    #[test]
    fn anonymous_by_default() {
        let (session, _, _) = store();
        assert!(!session.is_authenticated());
        assert_eq!(session.session(), Session::default());
    }

    #[test]
    fn login_then_logout_round_trip_in_either_scope() {
        for scope in [StorageScope::Durable, StorageScope::Volatile] {
            let (session, durable, volatile) = store();
            session.login_in(scope, &User::new("0712345678")).unwrap();
            assert!(session.is_authenticated(), "{scope:?}");
            assert_eq!(session.current_user(), Some(User::new("0712345678")));

            session.logout();
            assert!(!session.is_authenticated(), "{scope:?}");
            assert!(durable.is_empty());
            assert!(volatile.is_empty());
        }
    }

    #[test]
    fn default_login_writes_durable_scope() {
        let (session, durable, volatile) = store();
        session.login(&User::new("0712345678")).unwrap();
        assert_eq!(
            durable.get_item(STORAGE_KEY_IS_LOGGED_IN).unwrap().as_deref(),
            Some("true")
        );
        assert!(volatile.is_empty());
    }

    #[test]
    fn only_literal_true_counts() {
        let (session, durable, volatile) = store();
        durable.set_item(STORAGE_KEY_IS_LOGGED_IN, "false").unwrap();
        volatile.set_item(STORAGE_KEY_IS_LOGGED_IN, "1").unwrap();
        assert!(!session.is_authenticated());

        volatile.set_item(STORAGE_KEY_IS_LOGGED_IN, "true").unwrap();
        assert!(session.is_authenticated());
    }

    /// Refuses writes to one key.
    struct FailingOn {
        key: &'static str,
        inner: MemoryStorage,
    }

    impl KeyValueStore for FailingOn {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.key {
                return Err(StorageError::Write(key.to_string()));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    #[test]
    fn failed_login_write_leaves_user_anonymous() {
        for key in [STORAGE_KEY_USER, STORAGE_KEY_IS_LOGGED_IN] {
            let durable = MemoryStorage::new();
            let failing = FailingOn {
                key,
                inner: durable.clone(),
            };
            let session = SessionStore::new(Rc::new(failing), Rc::new(MemoryStorage::new()));

            let result = session.login(&User::new("0712345678"));

            assert_eq!(result, Err(StorageError::Write(key.to_string())));
            assert!(!session.is_authenticated(), "{key}");
            assert_eq!(session.current_user(), None);
            assert!(durable.is_empty(), "{key}");
        }
    }

    #[test]
    fn logout_is_idempotent_and_keeps_client_id() {
        let (session, _, _) = store();
        session.set_client_id("client-1").unwrap();
        session.logout();
        session.logout();
        assert_eq!(session.client_id().as_deref(), Some("client-1"));
        assert_eq!(session.session().correlation_token.as_deref(), Some("client-1"));

        session.clear_client_id();
        assert_eq!(session.client_id(), None);
    }
}
