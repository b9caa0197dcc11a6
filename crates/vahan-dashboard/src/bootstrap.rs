use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Ensure the `~/.vahan-dashboard/` directory hierarchy exists.
///
/// Creates `~/.vahan-dashboard/` and `~/.vahan-dashboard/logs/` if absent.
pub fn ensure_directories() -> anyhow::Result<PathBuf> {
    let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
    ensure_directories_in(&home)
}

/// Same as [`ensure_directories`] rooted at `base_dir`.
pub fn ensure_directories_in(base_dir: &Path) -> anyhow::Result<PathBuf> {
    let app_dir = base_dir.join(".vahan-dashboard");
    std::fs::create_dir_all(app_dir.join("logs"))?;
    Ok(app_dir)
}

/// Default log file inside the app directory returned by
/// [`ensure_directories`].
pub fn default_log_file(app_dir: &Path) -> PathBuf {
    app_dir.join("logs").join("vahan-dashboard.log")
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a Python-style level name to a `tracing` filter directive.
///
/// Unrecognised names are passed through so that full `EnvFilter` directives
/// such as `"vahan_data=debug"` still work.
pub fn level_directive(log_level: &str) -> String {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug".to_string(),
        "INFO" => "info".to_string(),
        "WARNING" | "WARN" => "warn".to_string(),
        "ERROR" | "CRITICAL" => "error".to_string(),
        _ => log_level.to_string(),
    }
}

/// Initialise the global `tracing` subscriber.
///
/// Events go to stderr, keeping stdout free for report output. When
/// `log_file` is given, events are also appended to that file without ANSI
/// colouring. Falls back to `"info"` if the level is not a valid directive.
pub fn setup_logging(log_level: &str, log_file: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_new(level_directive(log_level)).unwrap_or_else(|_| EnvFilter::new("info"));

    let stderr_layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_writer(std::io::stderr);

    let file_layer = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(true)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_directories_in() {
        let tmp = TempDir::new().expect("tempdir");

        let app_dir = ensure_directories_in(tmp.path()).expect("create dirs");

        assert_eq!(app_dir, tmp.path().join(".vahan-dashboard"));
        assert!(app_dir.is_dir(), ".vahan-dashboard dir must exist");
        assert!(app_dir.join("logs").is_dir(), "logs subdir must exist");
    }

    #[test]
    fn test_ensure_directories_in_is_repeatable() {
        let tmp = TempDir::new().expect("tempdir");
        ensure_directories_in(tmp.path()).expect("first");
        ensure_directories_in(tmp.path()).expect("second");
    }

    #[test]
    fn test_default_log_file_lives_in_logs_dir() {
        let tmp = TempDir::new().expect("tempdir");
        let app_dir = ensure_directories_in(tmp.path()).expect("create dirs");

        let log_file = default_log_file(&app_dir);

        assert_eq!(log_file.parent(), Some(app_dir.join("logs").as_path()));
        assert!(log_file.parent().is_some_and(Path::is_dir));
    }

    #[test]
    fn test_level_directive_python_names() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("CRITICAL"), "error");
    }

    #[test]
    fn test_level_directive_passthrough() {
        assert_eq!(level_directive("vahan_data=trace"), "vahan_data=trace");
    }
}
