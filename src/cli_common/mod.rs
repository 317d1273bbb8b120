//! Shared CLI functionality
//!
//! Used by the `indent-analyzer` binary:
//! - Logging initialisation
//! - Colored status messages
//! - Output formatting

use anyhow::Result;
use colored::Colorize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub mod args;
pub mod output;

pub use args::{CommonArgs, ConfigArgs};
pub use output::{OutputFormat, OutputWriter};

/// Initialises logging to stderr; `RUST_LOG` refines the default level
pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise logging: {}", e))?;

    Ok(())
}

/// Prints a successful outcome
pub fn print_success(message: &str) {
    println!("{} {}", "✓".green(), message.green());
}

/// Prints a warning
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "!".yellow(), message.yellow());
}

/// Prints an error
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.red());
}

/// Checks that a file or directory exists
pub fn validate_path(path: &Path, description: &str) -> Result<()> {
    if !path.exists() {
        return Err(anyhow::anyhow!(
            "{} does not exist: {}",
            description,
            path.display()
        ));
    }
    Ok(())
}

/// Formats a duration for humans
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs == 0 {
        format!("{}ms", millis)
    } else if secs < 60 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}m {}s", secs / 60, secs % 60)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_duration() {
        use std::time::Duration;

        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(1)), "1.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }

    #[test]
    fn test_validate_path() {
        let dir = tempfile::tempdir().unwrap();
        assert!(validate_path(dir.path(), "Source directory").is_ok());
        let missing = dir.path().join("missing.js");
        let err = validate_path(&missing, "Source file").unwrap_err();
        assert!(err.to_string().starts_with("Source file does not exist"));
    }
}
