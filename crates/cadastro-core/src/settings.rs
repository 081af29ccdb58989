//! Settings for cadastro-rs.
//!
//! [`Settings`] groups everything that the original front-end hard-coded: the
//! CPF validation messages, the session flag key and the demo login. It can be
//! passed around explicitly or stored once in the global [`SETTINGS`].

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// CPF field configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpfSettings {
    /// Message reported when the value does not hold exactly 11 digits.
    pub required_message: String,
    /// Message reported when the verification digits do not match.
    pub invalid_checksum_message: String,
    /// Whether to verify the two trailing check digits. Off by default.
    pub verify_check_digits: bool,
}

impl Default for CpfSettings {
    fn default() -> Self {
        Self {
            required_message: "CPF é obrigatório".to_string(),
            invalid_checksum_message: "CPF inválido".to_string(),
            verify_check_digits: false,
        }
    }
}

/// Session flag configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// The key under which the "logged in" flag is stored.
    pub flag_key: String,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            flag_key: "authenticated".to_string(),
        }
    }
}

/// Login credentials accepted by the credential check.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSettings {
    /// The accepted username.
    pub username: String,
    /// The accepted password.
    pub password: String,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "admin".to_string(),
        }
    }
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("username", &self.username)
            .field("password", &"********")
            .finish()
    }
}

/// The complete set of settings.
///
/// # Examples
///
/// ```
/// use cadastro_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.cpf.required_message, "CPF é obrigatório");
/// assert_eq!(settings.session.flag_key, "authenticated");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled. Selects the pretty log format.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level or filter directive (e.g. "info", "cadastro_auth=debug").
    pub log_level: String,

    // ── Domain ───────────────────────────────────────────────────────

    /// CPF field configuration.
    pub cpf: CpfSettings,
    /// Session flag configuration.
    pub session: SessionSettings,
    /// Accepted login credentials.
    pub auth: AuthSettings,

    // ── Escape hatch ─────────────────────────────────────────────────

    /// Custom settings that don't fit into the above categories.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            cpf: CpfSettings::default(),
            session: SessionSettings::default(),
            auth: AuthSettings::default(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup, then use
/// [`get`](LazySettings::get) to access the settings.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns the configured settings, or `None` before `configure`.
    pub fn try_get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let s = Settings::default();
        assert!(s.debug);
        assert_eq!(s.log_level, "info");
        assert_eq!(s.cpf.required_message, "CPF é obrigatório");
        assert_eq!(s.cpf.invalid_checksum_message, "CPF inválido");
        assert!(!s.cpf.verify_check_digits);
        assert_eq!(s.session.flag_key, "authenticated");
        assert_eq!(s.auth.username, "admin");
        assert!(s.extra.is_empty());
    }

    #[test]
    fn test_auth_settings_debug_hides_password() {
        let auth = AuthSettings {
            username: "ana".into(),
            password: "hunter2".into(),
        };
        let out = format!("{auth:?}");
        assert!(out.contains("ana"));
        assert!(!out.contains("hunter2"));
    }

    #[test]
    fn test_lazy_settings_configure_and_get() {
        let lazy = LazySettings::new();
        assert!(!lazy.is_configured());
        assert!(lazy.try_get().is_none());

        let mut settings = Settings::default();
        settings.debug = false;
        settings.session.flag_key = "logged".to_string();

        lazy.configure(settings);
        assert!(lazy.is_configured());
        assert!(!lazy.get().debug);
        assert_eq!(lazy.get().session.flag_key, "logged");
    }

    #[test]
    #[should_panic(expected = "already been configured")]
    fn test_lazy_settings_double_configure_panics() {
        let lazy = LazySettings::new();
        lazy.configure(Settings::default());
        lazy.configure(Settings::default());
    }

    #[test]
    #[should_panic(expected = "not been configured")]
    fn test_lazy_settings_get_before_configure_panics() {
        let lazy = LazySettings::new();
        let _ = lazy.get();
    }
}
