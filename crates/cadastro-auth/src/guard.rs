//! Session guard for protected views.
//!
//! A [`SessionGuard`] lets a caller in iff the session store holds a non-empty
//! value under the configured flag key. Nothing else is checked: the flag has
//! no expiry and no signature, so anything able to write the store can
//! authorize itself.

use cadastro_core::settings::SessionSettings;

use crate::backends::AuthError;
use crate::session::SessionStore;

/// Gate in front of a protected view.
///
/// # Examples
///
/// ```
/// use cadastro_auth::guard::SessionGuard;
/// use cadastro_auth::session::{InMemorySessionStore, SessionStore};
///
/// let store = InMemorySessionStore::new();
/// let guard = SessionGuard::new(&store, "authenticated");
/// assert!(!guard.is_authorized());
///
/// store.set("authenticated", "true");
/// assert!(guard.is_authorized());
/// ```
#[derive(Debug, Clone)]
pub struct SessionGuard<S> {
    store: S,
    flag_key: String,
}

impl<S: SessionStore> SessionGuard<S> {
    /// Creates a guard reading `flag_key` from `store`.
    pub fn new(store: S, flag_key: impl Into<String>) -> Self {
        Self {
            store,
            flag_key: flag_key.into(),
        }
    }

    /// Creates a guard using the key from the `[session]` settings section.
    pub fn from_settings(store: S, settings: &SessionSettings) -> Self {
        Self::new(store, settings.flag_key.clone())
    }

    /// The key this guard reads.
    pub fn flag_key(&self) -> &str {
        &self.flag_key
    }

    /// Returns `true` iff the flag is present and non-empty.
    pub fn is_authorized(&self) -> bool {
        let authorized = self
            .store
            .get(&self.flag_key)
            .is_some_and(|value| !value.is_empty());
        tracing::debug!(flag_key = %self.flag_key, authorized, "session guard checked");
        authorized
    }

    /// Like [`is_authorized`](Self::is_authorized), but as a `Result` for `?`.
    pub fn require(&self) -> Result<(), AuthError> {
        if self.is_authorized() {
            Ok(())
        } else {
            Err(AuthError::Unauthorized {
                flag_key: self.flag_key.clone(),
            })
        }
    }
}
