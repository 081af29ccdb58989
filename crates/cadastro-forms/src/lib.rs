//! # cadastro-forms
//!
//! CPF masking and validation plus the small forms layer that carries them:
//! field definitions, input widgets, a validation pipeline and `BaseForm`.
//!
//! - [`cpf`] - formatter, validator and the [`Cpf`] type
//! - [`masked`] - controlled-field holder for a masked CPF input
//! - [`fields`], [`widgets`], [`validation`], [`form`] - the forms layer

pub mod cpf;
pub mod fields;
pub mod form;
pub mod masked;
pub mod validation;
pub mod widgets;

pub use cpf::{format, format_masked, validate, Cpf, CpfError, CpfValidator};
pub use fields::{CleanedValue, FormFieldDef, FormFieldType};
pub use form::{BaseForm, Form};
pub use masked::MaskedField;
pub use widgets::{Widget, WidgetType};
