//! Shared logging utilities for consistent tracing across the workspace

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Filter directive used when `RUST_LOG` is not set
pub fn default_filter(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");
    format!("drafter={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize the stdout tracing subscriber
///
/// `RUST_LOG` wins over the level passed in, so operators can widen logging
/// without touching the command line.
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    // try_init: tests and embedding callers may already have a subscriber
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for request-scoped info logging
#[macro_export]
macro_rules! request_info {
    ($request_id:expr, $($arg:tt)*) => {
        tracing::info!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for request-scoped warning logging
#[macro_export]
macro_rules! request_warn {
    ($request_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for request-scoped error logging
#[macro_export]
macro_rules! request_error {
    ($request_id:expr, $($arg:tt)*) => {
        tracing::error!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for request-scoped debug logging
#[macro_export]
macro_rules! request_debug {
    ($request_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            request = %$request_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for startup messages
pub fn log_startup(component: &str, details: &str) {
    info!(
        component = component,
        timestamp = format_timestamp(),
        "🚀 Starting {}",
        details
    );
}

/// Contextual logging helper for error conditions
pub fn log_error(component: &str, context: &str, error: &dyn std::fmt::Display) {
    error!(
        component = component,
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_levels() {
        assert_eq!(
            default_filter(None),
            "drafter=info,shared=info,reqwest=warn,hyper=warn"
        );
        assert!(default_filter(Some("debug")).starts_with("drafter=debug,shared=debug"));
    }

    #[test]
    fn test_timestamp_format() {
        let stamp = format_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(stamp.len(), 12);
        assert_eq!(&stamp[2..3], ":");
    }
}
