//! Input widgets.
//!
//! A widget is the input side of a form field: it pulls the raw value out of
//! submitted data, normalizes it the way the live control would (a masked
//! input reformats on every keystroke), and declares the attributes a renderer
//! needs to build the control. Producing markup is left to the embedding UI.

use std::collections::HashMap;
use std::fmt;

use crate::cpf::{format, format_masked, CPF_MAX_LENGTH};

/// Enumerates the built-in widget types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetType {
    /// A plain single-line text input.
    TextInput,
    /// A text input whose value is never echoed back.
    PasswordInput,
    /// A text input that masks its value as a CPF while typing.
    CpfInput,
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextInput => "TextInput",
            Self::PasswordInput => "PasswordInput",
            Self::CpfInput => "CpfInput",
        };
        write!(f, "{name}")
    }
}

/// The input behavior of a form control.
pub trait Widget: Send + Sync + fmt::Debug {
    /// Returns the widget type enum variant.
    fn widget_type(&self) -> WidgetType;

    /// Attributes the rendered control should carry (e.g. `maxlength`).
    fn attrs(&self) -> HashMap<String, String> {
        HashMap::new()
    }

    /// Normalizes a raw value the way the live control would.
    fn normalize(&self, raw: &str) -> String {
        raw.to_string()
    }

    /// The value to show when the form is redisplayed, if any.
    fn display_value(&self, value: Option<&str>) -> Option<String> {
        value.map(|v| self.normalize(v))
    }

    /// Extracts the raw value submitted for `name`.
    ///
    /// Returns `None` if nothing was submitted for this field.
    fn value_from_data(&self, data: &HashMap<String, String>, name: &str) -> Option<String> {
        data.get(name).cloned()
    }

    /// Returns the `id` a label targeting this widget should reference.
    fn id_for_label(&self, id: &str) -> String {
        id.to_string()
    }
}

/// A plain text input.
#[derive(Debug, Clone, Default)]
pub struct TextInput;

impl Widget for TextInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::TextInput
    }
}

/// A password input. Its value is never redisplayed.
#[derive(Debug, Clone, Default)]
pub struct PasswordInput;

impl Widget for PasswordInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::PasswordInput
    }

    fn attrs(&self) -> HashMap<String, String> {
        HashMap::from([("autocomplete".to_string(), "current-password".to_string())])
    }

    fn display_value(&self, _value: Option<&str>) -> Option<String> {
        None
    }
}

/// A CPF input that reformats on every edit and caps the value at 14 characters.
///
/// Submitted values are punctuated but not capped, so the validator still
/// sees every digit that was sent.
#[derive(Debug, Clone, Default)]
pub struct CpfInput;

impl Widget for CpfInput {
    fn widget_type(&self) -> WidgetType {
        WidgetType::CpfInput
    }

    fn attrs(&self) -> HashMap<String, String> {
        HashMap::from([
            ("maxlength".to_string(), CPF_MAX_LENGTH.to_string()),
            ("inputmode".to_string(), "numeric".to_string()),
            ("placeholder".to_string(), "000.000.000-00".to_string()),
        ])
    }

    fn normalize(&self, raw: &str) -> String {
        format_masked(raw)
    }

    fn value_from_data(&self, data: &HashMap<String, String>, name: &str) -> Option<String> {
        data.get(name).map(|v| format(v))
    }
}

/// Returns the built-in widget for a widget type.
pub fn widget_for(widget_type: WidgetType) -> Box<dyn Widget> {
    match widget_type {
        WidgetType::TextInput => Box::new(TextInput),
        WidgetType::PasswordInput => Box::new(PasswordInput),
        WidgetType::CpfInput => Box::new(CpfInput),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_widget_type_display() {
        assert_eq!(WidgetType::CpfInput.to_string(), "CpfInput");
        assert_eq!(WidgetType::TextInput.to_string(), "TextInput");
    }

    #[test]
    fn test_text_input_passthrough() {
        let w = TextInput;
        let d = data(&[("name", " Maria ")]);
        assert_eq!(w.value_from_data(&d, "name"), Some(" Maria ".to_string()));
        assert_eq!(w.value_from_data(&d, "missing"), None);
        assert!(w.attrs().is_empty());
        assert_eq!(w.id_for_label("id_name"), "id_name");
    }

    #[test]
    fn test_password_input_never_redisplayed() {
        let w = PasswordInput;
        assert_eq!(w.display_value(Some("secret")), None);
        assert_eq!(
            w.attrs().get("autocomplete").map(String::as_str),
            Some("current-password")
        );
    }

    #[test]
    fn test_cpf_input_punctuates_submitted_value() {
        let w = CpfInput;
        let d = data(&[("cpf", "12345678901")]);
        assert_eq!(
            w.value_from_data(&d, "cpf"),
            Some("123.456.789-01".to_string())
        );
    }

    #[test]
    fn test_cpf_input_keeps_submitted_digits_past_eleven() {
        let w = CpfInput;
        let d = data(&[("cpf", "12345678901999")]);
        assert_eq!(
            w.value_from_data(&d, "cpf"),
            Some("123.456.789-01999".to_string())
        );
        assert_eq!(
            w.display_value(Some("12345678901999")),
            Some("123.456.789-01".to_string())
        );
    }

    #[test]
    fn test_cpf_input_attrs() {
        let attrs = CpfInput.attrs();
        assert_eq!(attrs.get("maxlength").map(String::as_str), Some("14"));
        assert_eq!(attrs.get("inputmode").map(String::as_str), Some("numeric"));
    }

    #[test]
    fn test_cpf_input_display_value() {
        assert_eq!(
            CpfInput.display_value(Some("1234567")),
            Some("123.456.7".to_string())
        );
        assert_eq!(CpfInput.display_value(None), None);
    }

    #[test]
    fn test_widget_for() {
        for wt in [
            WidgetType::TextInput,
            WidgetType::PasswordInput,
            WidgetType::CpfInput,
        ] {
            assert_eq!(widget_for(wt).widget_type(), wt);
        }
    }
}
