//! Form trait and `BaseForm` implementation.
//!
//! The [`Form`] trait binds submitted data, validates it and exposes errors and
//! cleaned data. [`BaseForm`] is the general-purpose implementation built from
//! a list of field definitions. Everything here is synchronous: cleaning is
//! pure string work.

use std::collections::HashMap;

use serde_json::json;

use crate::fields::{CleanedValue, FormFieldDef};
use crate::validation;
use crate::widgets::widget_for;

/// Key under which form-level (non-field) errors are stored.
pub const NON_FIELD_ERRORS: &str = "__all__";

/// The core form trait.
pub trait Form: Send + Sync {
    /// Returns the form's field definitions.
    fn fields(&self) -> &[FormFieldDef];

    /// Returns the form prefix (for namespacing multiple forms on one page).
    fn prefix(&self) -> Option<&str>;

    /// Binds submitted data to this form.
    fn bind(&mut self, data: &HashMap<String, String>);

    /// Returns `true` if this form has been bound to data.
    fn is_bound(&self) -> bool;

    /// Validates the form. Returns `true` if valid.
    ///
    /// After calling this, `errors()` and `cleaned_data()` are populated.
    fn is_valid(&mut self) -> bool;

    /// Returns per-field validation errors keyed by field name.
    fn errors(&self) -> &HashMap<String, Vec<String>>;

    /// Returns the cleaned data. Complete only after a successful `is_valid()`.
    fn cleaned_data(&self) -> &HashMap<String, CleanedValue>;

    /// Cross-field validation hook. The default accepts everything.
    fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        Ok(())
    }
}

/// A general-purpose form implementation.
pub struct BaseForm {
    field_defs: Vec<FormFieldDef>,
    prefix: Option<String>,
    bound: bool,
    raw_data: HashMap<String, Option<String>>,
    errors: HashMap<String, Vec<String>>,
    cleaned_data: HashMap<String, CleanedValue>,
    clean_hook: Option<CleanHook>,
}

type CleanHook =
    Box<dyn Fn(&HashMap<String, CleanedValue>) -> Result<(), Vec<String>> + Send + Sync>;

impl BaseForm {
    /// Creates a new `BaseForm` with the given field definitions.
    pub fn new(fields: Vec<FormFieldDef>) -> Self {
        Self {
            field_defs: fields,
            prefix: None,
            bound: false,
            raw_data: HashMap::new(),
            errors: HashMap::new(),
            cleaned_data: HashMap::new(),
            clean_hook: None,
        }
    }

    /// Sets the form prefix. Submitted keys are then `"{prefix}-{name}"`.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Installs a form-level check run after field cleaning. Its messages are
    /// reported under [`NON_FIELD_ERRORS`].
    #[must_use]
    pub fn with_clean<F>(mut self, hook: F) -> Self
    where
        F: Fn(&HashMap<String, CleanedValue>) -> Result<(), Vec<String>> + Send + Sync + 'static,
    {
        self.clean_hook = Some(Box::new(hook));
        self
    }

    /// Returns the non-field (form-level) errors.
    pub fn non_field_errors(&self) -> &[String] {
        self.errors
            .get(NON_FIELD_ERRORS)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Returns the bound value of a field as the widget would redisplay it.
    pub fn display_value(&self, name: &str) -> Option<String> {
        let field = self.field_defs.iter().find(|f| f.name == name)?;
        let raw = self.raw_data.get(name).cloned().flatten();
        widget_for(field.widget).display_value(raw.as_deref())
    }

    /// Describes the form for whatever layer renders it.
    ///
    /// Contains, per field, its name, label, help text, widget, widget
    /// attributes, redisplay value, required flag and errors, plus the
    /// non-field errors and the bound flag.
    pub fn as_context(&self) -> serde_json::Value {
        let fields: Vec<serde_json::Value> = self
            .field_defs
            .iter()
            .map(|field| {
                let widget = widget_for(field.widget);
                json!({
                    "name": self.html_name(&field.name),
                    "label": field.label,
                    "help_text": field.help_text,
                    "widget": field.widget.to_string(),
                    "attrs": widget.attrs(),
                    "value": self.display_value(&field.name),
                    "required": field.required,
                    "errors": self.errors.get(&field.name).cloned().unwrap_or_default(),
                })
            })
            .collect();

        json!({
            "fields": fields,
            "non_field_errors": self.non_field_errors(),
            "is_bound": self.bound,
        })
    }

    fn html_name(&self, name: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}-{name}"),
            None => name.to_string(),
        }
    }
}

impl std::fmt::Debug for BaseForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BaseForm")
            .field("fields", &self.field_defs.len())
            .field("prefix", &self.prefix)
            .field("bound", &self.bound)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl Form for BaseForm {
    fn fields(&self) -> &[FormFieldDef] {
        &self.field_defs
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn bind(&mut self, data: &HashMap<String, String>) {
        self.bound = true;
        self.raw_data.clear();
        self.errors.clear();
        self.cleaned_data.clear();

        for field in &self.field_defs {
            let html_name = self.html_name(&field.name);
            let value = widget_for(field.widget).value_from_data(data, &html_name);
            self.raw_data.insert(field.name.clone(), value);
        }
    }

    fn is_bound(&self) -> bool {
        self.bound
    }

    fn is_valid(&mut self) -> bool {
        if !self.bound {
            return false;
        }

        self.errors.clear();
        self.cleaned_data.clear();

        validation::clean_fields(
            &self.field_defs,
            &self.raw_data,
            &mut self.cleaned_data,
            &mut self.errors,
        );

        if let Err(form_errors) = self.clean() {
            for (key, msgs) in form_errors {
                self.errors.entry(key).or_default().extend(msgs);
            }
        }

        self.errors.is_empty()
    }

    fn errors(&self) -> &HashMap<String, Vec<String>> {
        &self.errors
    }

    fn cleaned_data(&self) -> &HashMap<String, CleanedValue> {
        &self.cleaned_data
    }

    fn clean(&self) -> Result<(), HashMap<String, Vec<String>>> {
        // Cross-field checks only make sense once every field cleaned.
        if !self.errors.is_empty() {
            return Ok(());
        }
        match &self.clean_hook {
            Some(hook) => hook(&self.cleaned_data)
                .map_err(|msgs| HashMap::from([(NON_FIELD_ERRORS.to_string(), msgs)])),
            None => Ok(()),
        }
    }
}
