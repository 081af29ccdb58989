//! Validation pipeline for form processing.
//!
//! 1. Field-level validation (per-field cleaning)
//! 2. Form-level cross-field validation ([`Form::clean`])
//!
//! Errors accumulate rather than short-circuiting, so all validation issues
//! are reported at once.

use std::collections::HashMap;

use crate::fields::{clean_field_value, CleanedValue, FormFieldDef};
use crate::form::Form;

/// Performs field-level validation for all fields.
///
/// Populates `cleaned_data` for fields that pass and `errors` for those that
/// don't. Every field is visited regardless of earlier failures.
pub fn clean_fields(
    field_defs: &[FormFieldDef],
    raw_data: &HashMap<String, Option<String>>,
    cleaned_data: &mut HashMap<String, CleanedValue>,
    errors: &mut HashMap<String, Vec<String>>,
) {
    for field in field_defs {
        let raw = raw_data.get(&field.name).and_then(|v| v.as_deref());

        match clean_field_value(field, raw) {
            Ok(value) => {
                cleaned_data.insert(field.name.clone(), value);
            }
            Err(field_errors) => {
                tracing::debug!(field = %field.name, errors = ?field_errors, "field rejected");
                errors.insert(field.name.clone(), field_errors);
            }
        }
    }
}

/// Runs the full pipeline and returns the errors as `(field, messages)` pairs,
/// sorted by field name.
pub fn full_clean(form: &mut dyn Form) -> Result<(), Vec<(String, Vec<String>)>> {
    if form.is_valid() {
        Ok(())
    } else {
        let mut errors: Vec<(String, Vec<String>)> = form
            .errors()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        errors.sort_by(|a, b| a.0.cmp(&b.0));
        Err(errors)
    }
}
