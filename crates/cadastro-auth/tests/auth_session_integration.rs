//! Integration tests for the login form + session store + guard pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use cadastro_auth::backends::{login, logout, AuthError, Credentials};
use cadastro_auth::forms::{AuthenticationForm, INVALID_LOGIN_MESSAGE};
use cadastro_auth::guard::SessionGuard;
use cadastro_auth::session::{InMemorySessionStore, SessionStore};
use cadastro_core::settings::Settings;
use cadastro_core::settings_loader;
use cadastro_core::CadastroError;
use cadastro_forms::form::Form;

// ── Helpers ──────────────────────────────────────────────────────────

fn settings() -> Settings {
    settings_loader::from_toml_str(
        r#"
        [session]
        flag_key = "logado"

        [auth]
        username = "rh"
        password = "s3nha"
        "#,
    )
    .unwrap()
}

fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

/// A protected view: returns the employee list only when the guard admits.
fn employee_list<S: SessionStore>(guard: &SessionGuard<S>) -> Result<Vec<&'static str>, CadastroError> {
    guard.require()?;
    Ok(vec!["Ana", "Bruno"])
}

// ═══════════════════════════════════════════════════════════════════════
// LOGIN FLOW
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn login_form_then_guard_admits() {
    let settings = settings();
    let store = InMemorySessionStore::new();
    let guard = SessionGuard::from_settings(&store, &settings.session);
    assert!(!guard.is_authorized());

    let mut form = AuthenticationForm::new(&settings.auth);
    form.bind(&data(&[("username", "rh"), ("password", "s3nha")]));
    assert!(form.is_valid());

    let credentials = form.credentials().unwrap();
    login(&store, &settings, &credentials).unwrap();

    assert!(guard.is_authorized());
    assert_eq!(employee_list(&guard).unwrap(), vec!["Ana", "Bruno"]);
}

#[test]
fn rejected_login_keeps_guard_closed() {
    let settings = settings();
    let store = InMemorySessionStore::new();
    let guard = SessionGuard::from_settings(&store, &settings.session);

    let mut form = AuthenticationForm::new(&settings.auth);
    form.bind(&data(&[("username", "rh"), ("password", "errada")]));
    assert!(!form.is_valid());
    assert_eq!(form.non_field_errors(), [INVALID_LOGIN_MESSAGE.to_string()]);

    assert_eq!(
        login(&store, &settings, &Credentials::new("rh", "errada")),
        Err(AuthError::InvalidCredentials)
    );
    assert!(!guard.is_authorized());

    let err = employee_list(&guard).unwrap_err();
    assert!(matches!(err, CadastroError::Unauthorized(_)));
    assert!(err.to_string().contains("logado"));
}

#[test]
fn logout_closes_guard() {
    let settings = settings();
    let store = Arc::new(InMemorySessionStore::new());
    let guard = SessionGuard::from_settings(Arc::clone(&store), &settings.session);

    login(store.as_ref(), &settings, &Credentials::new("rh", "s3nha")).unwrap();
    assert!(guard.is_authorized());

    assert!(logout(store.as_ref(), &settings));
    assert!(!guard.is_authorized());
}

// ═══════════════════════════════════════════════════════════════════════
// FLAG SEMANTICS
// ═══════════════════════════════════════════════════════════════════════

#[test]
fn flag_written_by_anyone_authorizes() {
    // No integrity check: a value written outside login() is trusted.
    let settings = settings();
    let store = InMemorySessionStore::new();
    store.set("logado", "forged");
    let guard = SessionGuard::from_settings(&store, &settings.session);
    assert!(guard.is_authorized());
}

#[test]
fn explicit_empty_flag_denies() {
    let settings = settings();
    let store = InMemorySessionStore::with_entries([("logado", "")]);
    let guard = SessionGuard::from_settings(&store, &settings.session);
    assert!(!guard.is_authorized());
}

#[test]
fn guard_over_custom_store() {
    struct FixedStore(Option<&'static str>);

    impl SessionStore for FixedStore {
        fn get(&self, _key: &str) -> Option<String> {
            self.0.map(String::from)
        }
        fn set(&self, _key: &str, _value: &str) {}
        fn remove(&self, _key: &str) -> Option<String> {
            None
        }
    }

    assert!(SessionGuard::new(FixedStore(Some("1")), "k").is_authorized());
    assert!(!SessionGuard::new(FixedStore(Some("")), "k").is_authorized());
    assert!(!SessionGuard::new(FixedStore(None), "k").is_authorized());
}
