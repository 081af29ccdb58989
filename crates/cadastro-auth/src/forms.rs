//! The login form.
//!
//! [`AuthenticationForm`] wraps a [`BaseForm`] with `username` and `password`
//! fields and, once both are present, checks them against the configured
//! credentials. A rejected pair is reported as a non-field error.

use std::collections::HashMap;

use cadastro_core::settings::AuthSettings;
use cadastro_forms::fields::{CleanedValue, FormFieldDef, FormFieldType};
use cadastro_forms::form::{BaseForm, Form};
use cadastro_forms::widgets::WidgetType;

use crate::backends::{authenticate, Credentials};

/// Message reported when the credential check fails.
pub const INVALID_LOGIN_MESSAGE: &str = "Usuário ou senha inválidos";

/// Login form with a credential check as its form-level validation.
pub struct AuthenticationForm {
    inner: BaseForm,
}

impl AuthenticationForm {
    /// Creates a login form accepting the credentials in `auth`.
    pub fn new(auth: &AuthSettings) -> Self {
        let auth = auth.clone();
        let inner = BaseForm::new(vec![
            FormFieldDef::new("username", FormFieldType::text()).label("Usuário"),
            FormFieldDef::new(
                "password",
                FormFieldType::Char {
                    min_length: None,
                    max_length: None,
                    strip: false,
                },
            )
            .label("Senha")
            .widget(WidgetType::PasswordInput),
        ])
        .with_clean(move |cleaned| {
            let Some(credentials) = credentials_from(cleaned) else {
                return Ok(());
            };
            authenticate(&auth, &credentials)
                .map_err(|_| vec![INVALID_LOGIN_MESSAGE.to_string()])
        });
        Self { inner }
    }

    /// Returns the submitted credentials once the form validated.
    pub fn credentials(&self) -> Option<Credentials> {
        credentials_from(self.inner.cleaned_data())
    }

    /// Returns the non-field (credential) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.inner.non_field_errors()
    }

    /// Describes the form for a renderer. The password is never included.
    pub fn as_context(&self) -> serde_json::Value {
        self.inner.as_context()
    }
}

fn credentials_from(cleaned: &HashMap<String, CleanedValue>) -> Option<Credentials> {
    let username = cleaned.get("username")?.as_text()?;
    let password = cleaned.get("password")?.as_text()?;
    Some(Credentials::new(username, password))
}

impl Form for AuthenticationForm {
    fn fields(&self) -> &[FormFieldDef] {
        self.inner.fields()
    }

    fn prefix(&self) -> Option<&str> {
        self.inner.prefix()
    }

    fn bind(&mut self, data: &HashMap<String, String>) {
        self.inner.bind(data);
    }

    fn is_bound(&self) -> bool {
        self.inner.is_bound()
    }

    fn is_valid(&mut self) -> bool {
        self.inner.is_valid()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        self.inner.errors()
    }

    fn cleaned_data(&self) -> &HashMap<String, CleanedValue> {
        self.inner.cleaned_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth() -> AuthSettings {
        AuthSettings {
            username: "rh".into(),
            password: "s3nha".into(),
        }
    }

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_valid_login() {
        let mut form = AuthenticationForm::new(&auth());
        form.bind(&data(&[("username", " rh "), ("password", "s3nha")]));
        assert!(form.is_valid());
        assert_eq!(form.credentials(), Some(Credentials::new("rh", "s3nha")));
    }

    #[test]
    fn test_wrong_password() {
        let mut form = AuthenticationForm::new(&auth());
        form.bind(&data(&[("username", "rh"), ("password", "s3nha ")]));
        assert!(!form.is_valid());
        assert_eq!(form.non_field_errors(), [INVALID_LOGIN_MESSAGE.to_string()]);
    }

    #[test]
    fn test_missing_fields() {
        let mut form = AuthenticationForm::new(&auth());
        form.bind(&data(&[("username", "rh")]));
        assert!(!form.is_valid());
        assert!(form.errors().contains_key("password"));
        assert!(form.non_field_errors().is_empty());
        assert_eq!(form.credentials(), None);
    }

    #[test]
    fn test_context_hides_password() {
        let mut form = AuthenticationForm::new(&auth());
        form.bind(&data(&[("username", "rh"), ("password", "s3nha")]));
        form.is_valid();
        let ctx = form.as_context();
        assert_eq!(ctx["fields"][0]["value"], "rh");
        assert!(ctx["fields"][1]["value"].is_null());
        assert_eq!(ctx["fields"][1]["widget"], "PasswordInput");
    }
}
