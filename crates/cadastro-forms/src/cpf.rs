//! CPF masking and validation.
//!
//! A CPF is the 11-digit Brazilian taxpayer identifier, displayed as
//! `XXX.XXX.XXX-XX`. This module provides:
//!
//! - [`digits`] - the digit-only subsequence of arbitrary input
//! - [`format`] - progressive punctuation of whatever digits are present
//! - [`format_masked`] - [`format`] capped at the field's 14-character limit
//! - [`CpfValidator`] - the schema check producing a [`Cpf`] or an error
//!
//! Validation only counts digits unless [`CpfValidator::with_check_digits`]
//! is enabled. Without it, `111.111.111-11` and `123.456.789-01` are accepted
//! even though neither carries valid verification digits.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use cadastro_core::settings::CpfSettings;
use cadastro_core::{CadastroError, ValidationError};

/// Number of digits in a complete CPF.
pub const CPF_DIGITS: usize = 11;

/// Maximum rendered length of a CPF field: 11 digits plus `.`, `.` and `-`.
pub const CPF_MAX_LENGTH: usize = 14;

static FORMATTED_CPF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("valid CPF regex"));

/// Returns the ASCII decimal digits of `raw`, in order.
///
/// ```
/// use cadastro_forms::cpf::digits;
///
/// assert_eq!(digits("abc123.45-6"), "123456");
/// assert_eq!(digits("٣"), ""); // only ASCII digits count
/// ```
pub fn digits(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Progressively punctuates the digits of `raw`.
///
/// Non-digits are dropped, then `.` is inserted after the 3rd and 6th digit
/// and `-` after the 9th, but only once a digit follows that position:
///
/// | digits | output |
/// |---|---|
/// | `123` | `123` |
/// | `123456` | `123.456` |
/// | `12345678` | `123.456.78` |
/// | `12345678901` | `123.456.789-01` |
///
/// Digits past the 11th are kept after the dash; the field length limit
/// (see [`format_masked`]) is what cuts them off. Total and pure.
///
/// ```
/// use cadastro_forms::cpf::format;
///
/// assert_eq!(format(""), "");
/// assert_eq!(format("abc123def456"), "123.456");
/// assert_eq!(format("12345678901"), "123.456.789-01");
/// ```
pub fn format(raw: &str) -> String {
    let d = digits(raw);
    // `d` is pure ASCII, so byte offsets are character offsets.
    let mut out = String::with_capacity(d.len() + 3);
    match d.len() {
        0..=3 => out.push_str(&d),
        4..=6 => {
            out.push_str(&d[..3]);
            out.push('.');
            out.push_str(&d[3..]);
        }
        7..=9 => {
            out.push_str(&d[..3]);
            out.push('.');
            out.push_str(&d[3..6]);
            out.push('.');
            out.push_str(&d[6..]);
        }
        _ => {
            out.push_str(&d[..3]);
            out.push('.');
            out.push_str(&d[3..6]);
            out.push('.');
            out.push_str(&d[6..9]);
            out.push('-');
            out.push_str(&d[9..]);
        }
    }
    out
}

/// Formats `raw` and truncates the result to [`CPF_MAX_LENGTH`] characters.
///
/// This is the value a masked CPF input actually holds after an edit.
///
/// ```
/// use cadastro_forms::cpf::format_masked;
///
/// assert_eq!(format_masked("1234567890123"), "123.456.789-01");
/// ```
pub fn format_masked(raw: &str) -> String {
    let mut out = format(raw);
    out.truncate(CPF_MAX_LENGTH);
    out
}

/// Returns `true` if `value` has exactly the shape `XXX.XXX.XXX-XX`.
pub fn is_formatted(value: &str) -> bool {
    FORMATTED_CPF.is_match(value)
}

/// Returns `true` if the two trailing digits match the mod-11 verification
/// digits computed from the first nine.
///
/// Sequences of a single repeated digit are rejected, as they satisfy the
/// arithmetic but are not issued.
fn check_digits_match(d: &[u8]) -> bool {
    if d.len() != CPF_DIGITS || d.iter().all(|&b| b == d[0]) {
        return false;
    }
    let nums: Vec<u32> = d.iter().map(|b| u32::from(b - b'0')).collect();
    verification_digit(&nums[..9]) == nums[9] && verification_digit(&nums[..10]) == nums[10]
}

fn verification_digit(prefix: &[u32]) -> u32 {
    let top = u32::try_from(prefix.len()).unwrap_or(u32::MAX) + 1;
    let sum: u32 = prefix
        .iter()
        .zip((2..=top).rev())
        .map(|(n, weight)| n * weight)
        .sum();
    match (sum * 10) % 11 {
        10 => 0,
        r => r,
    }
}

/// Why a value is not a CPF.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CpfError {
    /// The value does not hold exactly 11 digits.
    #[error("expected 11 digits, found {found}")]
    InvalidLength {
        /// How many digits were found.
        found: usize,
    },

    /// The verification digits do not match (only with check digits enabled).
    #[error("verification digits do not match")]
    InvalidChecksum,
}

impl CpfError {
    /// The [`ValidationError`] code for this failure.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidLength { .. } => "invalid_length",
            Self::InvalidChecksum => "invalid_checksum",
        }
    }
}

/// Uses the default messages. To report a configured message, convert through
/// [`CpfValidator::validate`] or [`CpfValidator::to_validation_error`] instead.
impl From<CpfError> for CadastroError {
    fn from(err: CpfError) -> Self {
        CpfValidator::default().to_validation_error(&err).into()
    }
}

/// A validated CPF.
///
/// Holds the 11 digits; [`Display`](fmt::Display) renders the punctuated form.
/// Only obtainable through validation, so holding one means the digit count
/// (and, if enabled, the checksum) has been checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cpf(String);

impl Cpf {
    /// Parses `raw` with the default (length-only) rules.
    ///
    /// ```
    /// use cadastro_forms::cpf::Cpf;
    ///
    /// assert_eq!(Cpf::parse("123.456.789-01").unwrap().digits(), "12345678901");
    /// assert!(Cpf::parse("123").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, CpfError> {
        raw.parse()
    }

    /// Returns the 11 digits without punctuation.
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Returns the `XXX.XXX.XXX-XX` form.
    pub fn formatted(&self) -> String {
        format(&self.0)
    }

    /// Returns `true` if the verification digits are valid.
    pub fn has_valid_check_digits(&self) -> bool {
        check_digits_match(self.0.as_bytes())
    }
}

impl fmt::Display for Cpf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for Cpf {
    type Err = CpfError;

    /// Parses with the default (length-only) rules.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CpfValidator::default().check(s)
    }
}

impl TryFrom<String> for Cpf {
    type Error = CpfError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Cpf> for String {
    fn from(cpf: Cpf) -> Self {
        cpf.formatted()
    }
}

/// The CPF schema check.
///
/// Strips non-digits and accepts the value iff exactly 11 digits remain.
/// Failures carry a configurable message rather than a fixed string.
///
/// # Examples
///
/// ```
/// use cadastro_forms::cpf::CpfValidator;
///
/// let validator = CpfValidator::default();
/// let cpf = validator.validate("123.456.789-01").unwrap();
/// assert_eq!(cpf.digits(), "12345678901");
///
/// let err = validator.validate("123.456.789").unwrap_err();
/// assert_eq!(err.message, "CPF é obrigatório");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpfValidator {
    required_message: String,
    invalid_checksum_message: String,
    verify_check_digits: bool,
}

impl Default for CpfValidator {
    fn default() -> Self {
        Self::from_settings(&CpfSettings::default())
    }
}

impl CpfValidator {
    /// Builds a validator from the `[cpf]` settings section.
    pub fn from_settings(settings: &CpfSettings) -> Self {
        Self {
            required_message: settings.required_message.clone(),
            invalid_checksum_message: settings.invalid_checksum_message.clone(),
            verify_check_digits: settings.verify_check_digits,
        }
    }

    /// Sets the message reported for a wrong digit count.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.required_message = message.into();
        self
    }

    /// Sets the message reported for wrong verification digits.
    #[must_use]
    pub fn with_checksum_message(mut self, message: impl Into<String>) -> Self {
        self.invalid_checksum_message = message.into();
        self
    }

    /// Enables or disables verification-digit checking.
    #[must_use]
    pub fn with_check_digits(mut self, enabled: bool) -> Self {
        self.verify_check_digits = enabled;
        self
    }

    /// The message reported for a wrong digit count.
    pub fn required_message(&self) -> &str {
        &self.required_message
    }

    /// Whether verification digits are checked.
    pub const fn verifies_check_digits(&self) -> bool {
        self.verify_check_digits
    }

    /// Checks `raw`, reporting the failure kind.
    pub fn check(&self, raw: &str) -> Result<Cpf, CpfError> {
        let d = digits(raw);
        if d.len() != CPF_DIGITS {
            return Err(CpfError::InvalidLength { found: d.len() });
        }
        if self.verify_check_digits && !check_digits_match(d.as_bytes()) {
            return Err(CpfError::InvalidChecksum);
        }
        Ok(Cpf(d))
    }

    /// Checks `raw`, reporting failures as a user-facing [`ValidationError`].
    pub fn validate(&self, raw: &str) -> Result<Cpf, ValidationError> {
        self.check(raw).map_err(|err| {
            tracing::debug!(error = %err, "CPF rejected");
            self.to_validation_error(&err)
        })
    }

    /// Converts a failure kind into a [`ValidationError`] with the configured message.
    pub fn to_validation_error(&self, err: &CpfError) -> ValidationError {
        match err {
            CpfError::InvalidLength { found } => {
                ValidationError::new(self.required_message.clone(), err.code())
                    .with_param("found", found.to_string())
            }
            CpfError::InvalidChecksum => {
                ValidationError::new(self.invalid_checksum_message.clone(), err.code())
            }
        }
    }
}

/// Validates `raw` with the default validator.
pub fn validate(raw: &str) -> Result<Cpf, ValidationError> {
    CpfValidator::default().validate(raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── digits ──────────────────────────────────────────────────────

    #[test]
    fn test_digits_strips_everything_else() {
        assert_eq!(digits(""), "");
        assert_eq!(digits("no digits here"), "");
        assert_eq!(digits(" 1a2b3 "), "123");
        assert_eq!(digits("123.456.789-01"), "12345678901");
    }

    // ── format ──────────────────────────────────────────────────────

    #[test]
    fn test_format_empty() {
        assert_eq!(format(""), "");
        assert_eq!(format("abc"), "");
    }

    #[test]
    fn test_format_mixed_input() {
        assert_eq!(format("abc123def456"), "123.456");
    }

    #[test]
    fn test_format_full() {
        assert_eq!(format("12345678901"), "123.456.789-01");
    }

    #[test]
    fn test_format_branch_boundaries() {
        assert_eq!(format("123"), "123");
        assert_eq!(format("1234"), "123.4");
        assert_eq!(format("123456"), "123.456");
        assert_eq!(format("1234567"), "123.456.7");
        assert_eq!(format("123456789"), "123.456.789");
        assert_eq!(format("1234567890"), "123.456.789-0");
    }

    #[test]
    fn test_format_keeps_digits_past_eleven() {
        assert_eq!(format("1234567890123"), "123.456.789-0123");
    }

    #[test]
    fn test_format_reformats_already_formatted() {
        assert_eq!(format("123.456.789-01"), "123.456.789-01");
        assert_eq!(format("123.45"), "123.45");
    }

    #[test]
    fn test_format_deleting_punctuation_shifts_nothing() {
        // Backspacing over the dash leaves the digits in place.
        assert_eq!(format("123.456.78901"), "123.456.789-01");
    }

    #[test]
    fn test_format_masked_truncates() {
        assert_eq!(format_masked("123456789012"), "123.456.789-01");
        assert_eq!(format_masked("12345"), "123.45");
        assert_eq!(format_masked("12345678901").len(), CPF_MAX_LENGTH);
    }

    #[test]
    fn test_is_formatted() {
        assert!(is_formatted("123.456.789-01"));
        assert!(!is_formatted("12345678901"));
        assert!(!is_formatted("123.456.789"));
        assert!(!is_formatted("123.456.789-012"));
    }

    // ── validation ──────────────────────────────────────────────────

    #[test]
    fn test_validate_formatted_value() {
        let cpf = validate("123.456.789-01").unwrap();
        assert_eq!(cpf.digits(), "12345678901");
        assert_eq!(cpf.to_string(), "123.456.789-01");
    }

    #[test]
    fn test_validate_too_few_digits() {
        let err = validate("123.456.789").unwrap_err();
        assert_eq!(err.message, "CPF é obrigatório");
        assert_eq!(err.code, "invalid_length");
        assert_eq!(err.params.get("found").map(String::as_str), Some("9"));
    }

    #[test]
    fn test_validate_no_digits() {
        let err = validate("not a number").unwrap_err();
        assert_eq!(err.message, "CPF é obrigatório");
        assert_eq!(err.params.get("found").map(String::as_str), Some("0"));
    }

    #[test]
    fn test_validate_too_many_digits() {
        assert!(validate("123.456.789-012").is_err());
    }

    #[test]
    fn test_validate_custom_message() {
        let validator = CpfValidator::default().with_message("CPF is required");
        let err = validator.validate("").unwrap_err();
        assert_eq!(err.to_string(), "CPF is required");
    }

    #[test]
    fn test_validate_from_settings() {
        let settings = CpfSettings {
            required_message: "informe o CPF".into(),
            ..CpfSettings::default()
        };
        let validator = CpfValidator::from_settings(&settings);
        assert_eq!(validator.required_message(), "informe o CPF");
        assert!(!validator.verifies_check_digits());
    }

    #[test]
    fn test_length_only_accepts_bad_check_digits() {
        assert!(validate("111.111.111-11").is_ok());
        assert!(validate("123.456.789-01").is_ok());
    }

    #[test]
    fn test_check_digits_opt_in() {
        let validator = CpfValidator::default().with_check_digits(true);
        assert!(validator.validate("529.982.247-25").is_ok());
        assert!(validator.validate("123.456.789-09").is_ok());

        let err = validator.validate("123.456.789-01").unwrap_err();
        assert_eq!(err.code, "invalid_checksum");
        assert_eq!(err.message, "CPF inválido");

        assert_eq!(
            validator.check("111.111.111-11"),
            Err(CpfError::InvalidChecksum)
        );
    }

    #[test]
    fn test_check_digits_length_reported_first() {
        let validator = CpfValidator::default().with_check_digits(true);
        assert_eq!(
            validator.check("529.982"),
            Err(CpfError::InvalidLength { found: 6 })
        );
    }

    #[test]
    fn test_has_valid_check_digits() {
        let good: Cpf = "52998224725".parse().unwrap();
        let bad: Cpf = "12345678901".parse().unwrap();
        assert!(good.has_valid_check_digits());
        assert!(!bad.has_valid_check_digits());
    }

    #[test]
    fn test_cpf_error_display() {
        assert_eq!(
            CpfError::InvalidLength { found: 3 }.to_string(),
            "expected 11 digits, found 3"
        );
    }

    #[test]
    fn test_cpf_serde() {
        let cpf: Cpf = "52998224725".parse().unwrap();
        let json = serde_json::to_string(&cpf).unwrap();
        assert_eq!(json, r#""529.982.247-25""#);

        let back: Cpf = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cpf);

        assert!(serde_json::from_str::<Cpf>(r#""123""#).is_err());
    }

    #[test]
    fn test_cpf_error_into_cadastro_error() {
        let err: CadastroError = CpfError::InvalidLength { found: 9 }.into();
        match err {
            CadastroError::Validation(v) => {
                assert_eq!(v.message, "CPF é obrigatório");
                assert_eq!(v.code, "invalid_length");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_configured_message_reaches_cadastro_error_via_validate() {
        fn submit(validator: &CpfValidator, raw: &str) -> Result<Cpf, CadastroError> {
            Ok(validator.validate(raw)?)
        }
        let validator = CpfValidator::default().with_message("Informe o CPF");
        let err = submit(&validator, "123").unwrap_err();
        assert_eq!(err.to_string(), "Validation error: Informe o CPF");

        let err: CadastroError = validator.check("123").unwrap_err().into();
        assert_eq!(err.to_string(), "Validation error: CPF é obrigatório");
    }
}
