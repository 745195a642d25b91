//! CLI command implementations

pub mod clear;
pub mod history;
pub mod login;
pub mod logout;
pub mod logs;
pub mod new;
pub mod show;
pub mod signup;
pub mod status;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bazar_core::services::{LogEvent, LoggingService};
use bazar_core::{BazarContext, Error};
use indicatif::ProgressBar;

/// Get the bazar directory from environment or default
pub fn get_bazar_dir() -> PathBuf {
    if let Ok(dir) = std::env::var("BAZAR_DIR") {
        PathBuf::from(dir)
    } else {
        dirs::home_dir()
            .expect("Could not find home directory")
            .join(".bazar")
    }
}

/// Get or create the bazar context
pub fn get_context() -> Result<BazarContext> {
    let bazar_dir = get_bazar_dir();

    // Create directory if it doesn't exist
    std::fs::create_dir_all(&bazar_dir)
        .with_context(|| format!("Failed to create bazar directory: {:?}", bazar_dir))?;

    BazarContext::new(&bazar_dir).context("Failed to initialize bazar context")
}

/// Get the logging service for CLI operations
///
/// Returns None if logging fails to initialize (shouldn't block operations)
pub fn get_logger() -> Option<LoggingService> {
    let bazar_dir = get_bazar_dir();
    std::fs::create_dir_all(&bazar_dir).ok()?;
    LoggingService::new(&bazar_dir, env!("CARGO_PKG_VERSION")).ok()
}

/// Log an event, ignoring any errors (logging should never break the app)
pub fn log_event(logger: &Option<LoggingService>, event: LogEvent) {
    if let Some(l) = logger {
        let _ = l.log(event);
    }
}

/// User-facing message for a core error. Classified session and store
/// failures carry their own wording; everything else uses Display.
pub fn friendly_message(err: &Error) -> String {
    match err {
        Error::Session(e) => e.user_message(),
        Error::Store(e) => e.user_message(),
        other => other.to_string(),
    }
}

/// Short reason code for logging (never raw user input)
pub fn reason_code(err: &Error) -> String {
    match err {
        Error::Session(e) => e.to_string(),
        Error::Store(e) => e.to_string(),
        Error::Validation(_) => "validation".to_string(),
        Error::NotFound(_) => "not-found".to_string(),
        Error::Database(_) => "database".to_string(),
        Error::Config(_) => "config".to_string(),
        Error::Io(_) => "io".to_string(),
        Error::Json(_) => "json".to_string(),
        Error::Other(_) => "other".to_string(),
    }
}

/// Spinner shown around store and identity calls
pub fn spinner(message: &str) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    bar.set_message(message.to_string());
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}
