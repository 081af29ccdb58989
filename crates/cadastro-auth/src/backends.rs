//! Credential check and session login/logout.
//!
//! The accepted username and password come from
//! [`AuthSettings`](cadastro_core::settings::AuthSettings). A successful
//! [`login`] writes the session flag that [`SessionGuard`](crate::guard::SessionGuard)
//! reads; [`logout`] removes it.

use std::fmt;

use thiserror::Error;

use cadastro_core::settings::{AuthSettings, Settings};
use cadastro_core::CadastroError;

use crate::session::SessionStore;

/// Value written under the flag key on login.
pub const AUTHENTICATED_FLAG_VALUE: &str = "true";

/// Authentication failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The username/password pair was not accepted.
    #[error("invalid username or password")]
    InvalidCredentials,

    /// The session flag is missing or empty.
    #[error("session flag '{flag_key}' is not set")]
    Unauthorized {
        /// The key that was checked.
        flag_key: String,
    },
}

impl From<AuthError> for CadastroError {
    fn from(err: AuthError) -> Self {
        Self::Unauthorized(err.to_string())
    }
}

/// A username/password pair submitted at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// The submitted username.
    pub username: String,
    /// The submitted password.
    pub password: String,
}

impl Credentials {
    /// Creates a credentials pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// Checks `credentials` against the configured pair.
///
/// Both comparisons always run and are constant-time in the value length.
pub fn authenticate(settings: &AuthSettings, credentials: &Credentials) -> Result<(), AuthError> {
    let user_ok = constant_time_eq(
        credentials.username.as_bytes(),
        settings.username.as_bytes(),
    );
    let pass_ok = constant_time_eq(
        credentials.password.as_bytes(),
        settings.password.as_bytes(),
    );
    if user_ok & pass_ok {
        Ok(())
    } else {
        Err(AuthError::InvalidCredentials)
    }
}

/// Authenticates and, on success, sets the session flag.
pub fn login<S: SessionStore + ?Sized>(
    store: &S,
    settings: &Settings,
    credentials: &Credentials,
) -> Result<(), AuthError> {
    match authenticate(&settings.auth, credentials) {
        Ok(()) => {
            store.set(&settings.session.flag_key, AUTHENTICATED_FLAG_VALUE);
            tracing::info!(username = %credentials.username, "login succeeded");
            Ok(())
        }
        Err(err) => {
            tracing::warn!(username = %credentials.username, "login rejected");
            Err(err)
        }
    }
}

/// Clears the session flag. Returns `true` if it was set.
pub fn logout<S: SessionStore + ?Sized>(store: &S, settings: &Settings) -> bool {
    let was_set = store.remove(&settings.session.flag_key).is_some();
    tracing::info!(was_set, "logout");
    was_set
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
