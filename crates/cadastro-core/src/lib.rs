//! # cadastro-core
//!
//! Core types shared by the cadastro-rs crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Settings and the global settings instance
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{CadastroError, CadastroResult, ValidationError};
pub use settings::{Settings, SETTINGS};
