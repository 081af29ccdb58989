//! # cadastro-auth
//!
//! Gatekeeping for protected views:
//!
//! - **Session store** capability with an in-memory implementation (`session`)
//! - **Session guard** that admits callers whose session carries the login flag (`guard`)
//! - **Credential check** and login/logout of the flag (`backends`)
//! - **Login form** running the credential check as form validation (`forms`)
//!
//! The guard trusts the flag's presence alone; there is no expiry or signature.

pub mod backends;
pub mod forms;
pub mod guard;
pub mod session;

// Re-exports for convenience
pub use backends::{authenticate, login, logout, AuthError, Credentials};
pub use forms::AuthenticationForm;
pub use guard::SessionGuard;
pub use session::{InMemorySessionStore, SessionStore};
