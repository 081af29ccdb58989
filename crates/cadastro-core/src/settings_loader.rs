//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! Files may be partial: anything they leave out, including individual keys
//! inside `[cpf]`, `[session]` or `[auth]`, keeps its default.
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `CADASTRO_DEBUG` | `debug` |
//! | `CADASTRO_LOG_LEVEL` | `log_level` |
//! | `CADASTRO_CPF_REQUIRED_MESSAGE` | `cpf.required_message` |
//! | `CADASTRO_CPF_INVALID_CHECKSUM_MESSAGE` | `cpf.invalid_checksum_message` |
//! | `CADASTRO_CPF_VERIFY_CHECK_DIGITS` | `cpf.verify_check_digits` |
//! | `CADASTRO_SESSION_FLAG_KEY` | `session.flag_key` |
//! | `CADASTRO_AUTH_USERNAME` | `auth.username` |
//! | `CADASTRO_AUTH_PASSWORD` | `auth.password` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use cadastro_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("config/cadastro.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::CadastroError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or cannot be deserialized.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, CadastroError> {
    // Go through serde_json so the partial document can be deep-merged over
    // the serialized defaults.
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| CadastroError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, CadastroError> {
    let content = read_config_file(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the TOML is malformed.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CadastroError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
///
/// # Errors
///
/// Returns an error if the JSON is malformed or cannot be deserialized.
pub fn from_json_str(json_str: &str) -> Result<Settings, CadastroError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| CadastroError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, CadastroError> {
    let content = read_config_file(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the JSON is malformed.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CadastroError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `CADASTRO_*` environment variable overrides to a settings struct.
///
/// Boolean variables accept "true"/"1"/"yes" (case-insensitive) as true and
/// anything else as false.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("CADASTRO_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("CADASTRO_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("CADASTRO_CPF_REQUIRED_MESSAGE") {
        settings.cpf.required_message = val;
    }

    if let Ok(val) = std::env::var("CADASTRO_CPF_INVALID_CHECKSUM_MESSAGE") {
        settings.cpf.invalid_checksum_message = val;
    }

    if let Ok(val) = std::env::var("CADASTRO_CPF_VERIFY_CHECK_DIGITS") {
        settings.cpf.verify_check_digits = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("CADASTRO_SESSION_FLAG_KEY") {
        settings.session.flag_key = val;
    }

    if let Ok(val) = std::env::var("CADASTRO_AUTH_USERNAME") {
        settings.auth.username = val;
    }

    if let Ok(val) = std::env::var("CADASTRO_AUTH_PASSWORD") {
        settings.auth.password = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

fn read_config_file(path: &Path, kind: &str) -> Result<String, CadastroError> {
    std::fs::read_to_string(path).map_err(|e| {
        CadastroError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(
    overrides: serde_json::Value,
    kind: &str,
) -> Result<Settings, CadastroError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        CadastroError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, overrides);
    serde_json::from_value(merged).map_err(|e| {
        CadastroError::ConfigurationError(format!("Failed to deserialize settings from {kind}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
