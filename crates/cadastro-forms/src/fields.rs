//! Form field definitions and type-level validation.
//!
//! Each [`FormFieldDef`] describes a single form field: its type, widget and
//! messages. [`clean_field_value`] turns the raw submitted string into a
//! [`CleanedValue`] or a list of error messages.

use std::collections::HashMap;

use crate::cpf::{Cpf, CpfValidator};
use crate::widgets::WidgetType;

/// Defines the type of a form field, including type-specific parameters.
#[derive(Debug, Clone)]
pub enum FormFieldType {
    /// A character (string) field.
    Char {
        /// Minimum length (characters).
        min_length: Option<usize>,
        /// Maximum length (characters).
        max_length: Option<usize>,
        /// Whether to strip leading/trailing whitespace.
        strip: bool,
    },
    /// A CPF field, checked by the carried validator.
    Cpf {
        /// The validator (and its messages) applied to the value.
        validator: CpfValidator,
    },
}

impl FormFieldType {
    /// A CPF field with the default validator.
    pub fn cpf() -> Self {
        Self::Cpf {
            validator: CpfValidator::default(),
        }
    }

    /// A stripped char field without length limits.
    pub const fn text() -> Self {
        Self::Char {
            min_length: None,
            max_length: None,
            strip: true,
        }
    }
}

/// The value of a field after cleaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanedValue {
    /// No value (optional field left empty).
    Null,
    /// A string value.
    Text(String),
    /// A validated CPF.
    Cpf(Cpf),
}

impl CleanedValue {
    /// Returns the string value, if this is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the CPF, if this is one.
    pub const fn as_cpf(&self) -> Option<&Cpf> {
        match self {
            Self::Cpf(cpf) => Some(cpf),
            _ => None,
        }
    }
}

/// Complete definition of a form field.
#[derive(Debug, Clone)]
pub struct FormFieldDef {
    /// The field name (key in submitted data).
    pub name: String,
    /// The field type, controlling cleaning.
    pub field_type: FormFieldType,
    /// Whether this field is required.
    pub required: bool,
    /// Help text displayed alongside the field.
    pub help_text: String,
    /// Human-readable label.
    pub label: String,
    /// The widget type used for input.
    pub widget: WidgetType,
    /// Custom error messages keyed by error code.
    pub error_messages: HashMap<String, String>,
}

impl FormFieldDef {
    /// Creates a new required `FormFieldDef` using the default widget for its type.
    pub fn new(name: impl Into<String>, field_type: FormFieldType) -> Self {
        let name = name.into();
        let widget = default_widget_for_field_type(&field_type);
        let label = name.replace('_', " ");
        Self {
            name,
            field_type,
            required: true,
            help_text: String::new(),
            label,
            widget,
            error_messages: HashMap::new(),
        }
    }

    /// Sets whether this field is required.
    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Sets the help text.
    #[must_use]
    pub fn help_text(mut self, text: impl Into<String>) -> Self {
        self.help_text = text.into();
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Sets the widget type.
    #[must_use]
    pub fn widget(mut self, widget: WidgetType) -> Self {
        self.widget = widget;
        self
    }

    /// Sets a custom error message for a given code.
    #[must_use]
    pub fn error_message(mut self, code: impl Into<String>, msg: impl Into<String>) -> Self {
        self.error_messages.insert(code.into(), msg.into());
        self
    }

    fn required_message(&self) -> String {
        if let Some(msg) = self.error_messages.get("required") {
            return msg.clone();
        }
        match &self.field_type {
            FormFieldType::Cpf { validator } => validator.required_message().to_string(),
            FormFieldType::Char { .. } => "This field is required.".to_string(),
        }
    }
}

/// Returns the default widget type for a given form field type.
pub const fn default_widget_for_field_type(field_type: &FormFieldType) -> WidgetType {
    match field_type {
        FormFieldType::Char { .. } => WidgetType::TextInput,
        FormFieldType::Cpf { .. } => WidgetType::CpfInput,
    }
}

/// Cleans (validates and coerces) a raw form input string.
///
/// 1. Required check (if `required` and the value is missing or empty)
/// 2. Optional and empty: [`CleanedValue::Null`]
/// 3. Type-specific validation
///
/// Returns the cleaned value or the list of error messages.
pub fn clean_field_value(
    field: &FormFieldDef,
    raw: Option<&str>,
) -> Result<CleanedValue, Vec<String>> {
    let raw_str = raw.unwrap_or("");

    if raw_str.is_empty() {
        if field.required {
            return Err(vec![field.required_message()]);
        }
        return Ok(CleanedValue::Null);
    }

    match &field.field_type {
        FormFieldType::Char {
            min_length,
            max_length,
            strip,
        } => {
            let s = if *strip { raw_str.trim() } else { raw_str };
            if s.is_empty() && field.required {
                return Err(vec![field.required_message()]);
            }
            let len = s.chars().count();
            let mut errors = Vec::new();
            if let Some(min) = min_length {
                if len < *min {
                    errors.push(format!(
                        "Ensure this value has at least {min} characters (it has {len})."
                    ));
                }
            }
            if let Some(max) = max_length {
                if len > *max {
                    errors.push(format!(
                        "Ensure this value has at most {max} characters (it has {len})."
                    ));
                }
            }
            if errors.is_empty() {
                Ok(CleanedValue::Text(s.to_string()))
            } else {
                Err(errors)
            }
        }

        FormFieldType::Cpf { validator } => match validator.check(raw_str) {
            Ok(cpf) => Ok(CleanedValue::Cpf(cpf)),
            Err(err) => {
                let message = field
                    .error_messages
                    .get(err.code())
                    .cloned()
                    .unwrap_or_else(|| validator.to_validation_error(&err).message);
                Err(vec![message])
            }
        },
    }
}
