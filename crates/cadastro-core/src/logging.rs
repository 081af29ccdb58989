//! Logging integration for cadastro-rs.
//!
//! Configures a [`tracing`] subscriber from [`Settings`](crate::settings::Settings)
//! and provides the span used around field edits.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`; an unparsable directive falls
/// back to "info". Debug mode uses a pretty, human-readable format; otherwise
/// output is structured JSON. Installing a second subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span for edits and validation of a single form field.
///
/// # Examples
///
/// ```
/// use cadastro_core::logging::field_span;
///
/// let span = field_span("cpf");
/// let _guard = span.enter();
/// tracing::debug!("reformatting");
/// ```
pub fn field_span(field_name: &str) -> tracing::Span {
    tracing::debug_span!("field", name = field_name)
}
