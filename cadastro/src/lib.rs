//! # cadastro
//!
//! CPF masking, validation and session guarding for registration front-ends.
//!
//! This is the meta-crate that re-exports the sub-crates. Depend on it to get
//! everything, or on the individual crates for finer-grained control.
//!
//! ```
//! use cadastro::forms::cpf;
//!
//! assert_eq!(cpf::format("52998224725"), "529.982.247-25");
//! assert!(cpf::validate("529.982.247").is_err());
//! ```

/// Errors, settings, settings loading and logging.
pub use cadastro_core as core;

/// CPF formatter/validator, masked field, form fields and widgets.
#[cfg(feature = "forms")]
pub use cadastro_forms as forms;

/// Session store, session guard and credential check.
#[cfg(feature = "auth")]
pub use cadastro_auth as auth;

// Third-party re-exports
pub use serde;
pub use serde_json;
pub use tracing;
pub use tracing_subscriber;
