//! Controlled CPF field state.
//!
//! [`MaskedField`] is the "current value holder" an embedding form owns for a
//! masked CPF input. Every edit event hands it the full text of the control;
//! it reformats, stores the result and notifies the owner through an optional
//! change callback. The formatting itself stays in the pure
//! [`format_masked`](crate::cpf::format_masked).

use std::fmt;

use cadastro_core::logging::field_span;
use cadastro_core::ValidationError;

use crate::cpf::{self, format_masked, Cpf, CpfValidator};

type ChangeCallback = Box<dyn FnMut(&str) + Send>;

/// Holds the latest formatted value of a CPF input.
///
/// # Examples
///
/// ```
/// use cadastro_forms::masked::MaskedField;
///
/// let mut field = MaskedField::new("cpf");
/// field.on_input("529");
/// field.on_input("5299822");
/// assert_eq!(field.value(), "529.982.2");
/// assert_eq!(field.on_input("52998224725xyz"), "529.982.247-25");
/// ```
pub struct MaskedField {
    name: String,
    value: String,
    on_change: Option<ChangeCallback>,
}

impl MaskedField {
    /// Creates an empty field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            on_change: None,
        }
    }

    /// Sets the callback invoked with the new value after every edit.
    #[must_use]
    pub fn with_on_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.on_change = Some(Box::new(callback));
        self
    }

    /// Seeds the field with an initial value, formatted but without notifying.
    #[must_use]
    pub fn with_initial(mut self, raw: &str) -> Self {
        self.value = format_masked(raw);
        self
    }

    /// Handles an edit event carrying the control's full current text.
    ///
    /// Returns the value now held by the field.
    pub fn on_input(&mut self, raw: &str) -> &str {
        let span = field_span(&self.name);
        let _guard = span.enter();

        self.value = format_masked(raw);
        tracing::trace!(value = %self.value, "field reformatted");
        if let Some(callback) = self.on_change.as_mut() {
            callback(&self.value);
        }
        &self.value
    }

    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The current formatted value.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The digits of the current value.
    pub fn digits(&self) -> String {
        cpf::digits(&self.value)
    }

    /// Returns `true` once all 11 digits have been entered.
    pub fn is_complete(&self) -> bool {
        cpf::is_formatted(&self.value)
    }

    /// Empties the field and notifies the callback.
    pub fn clear(&mut self) {
        self.on_input("");
    }

    /// Validates the current value (the submit path).
    pub fn validate(&self, validator: &CpfValidator) -> Result<Cpf, ValidationError> {
        let span = field_span(&self.name);
        let _guard = span.enter();
        validator.validate(&self.value)
    }
}

impl fmt::Debug for MaskedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaskedField")
            .field("name", &self.name)
            .field("value", &self.value)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
