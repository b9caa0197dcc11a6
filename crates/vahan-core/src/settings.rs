use chrono::NaiveDate;
use clap::{CommandFactory, Parser};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{Result, VahanError};
use crate::models::Category;
use crate::time_utils::parse_date;

/// Default location of the bundled CSV snapshot.
pub const DEFAULT_CSV_PATH: &str = "data/sample_registrations.csv";

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Vehicle registration trends (YoY / QoQ) from Vahan data
#[derive(Parser, Debug, Clone)]
#[command(
    name = "vahan-dashboard",
    about = "Vehicle registration trends (YoY / QoQ) from Vahan data",
    version
)]
pub struct Settings {
    /// Data source
    #[arg(long, default_value = "local", value_parser = ["local", "live"])]
    pub source: String,

    /// Path to the local CSV snapshot (also the fallback for the live source)
    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    pub csv_path: PathBuf,

    /// Run the live-source browser without a window
    #[arg(long)]
    pub headless: bool,

    /// First month to include (inclusive)
    #[arg(long, value_parser = parse_cli_date)]
    pub start_date: Option<NaiveDate>,

    /// Last month to include (inclusive)
    #[arg(long, value_parser = parse_cli_date)]
    pub end_date: Option<NaiveDate>,

    /// Vehicle categories to include (2W, 3W, 4W); repeat or comma-separate
    #[arg(long = "category", value_parser = parse_cli_category, value_delimiter = ',')]
    pub categories: Vec<Category>,

    /// Manufacturers to include; repeat or comma-separate
    #[arg(long = "manufacturer", value_delimiter = ',')]
    pub manufacturers: Vec<String>,

    /// Report view
    #[arg(long, default_value = "overview", value_parser = ["overview", "category", "manufacturer", "all"])]
    pub view: String,

    /// Output format
    #[arg(long, default_value = "table", value_parser = ["table", "json"])]
    pub format: String,

    /// Months shown per category table (1-120)
    #[arg(long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..=120))]
    pub recent_months: u32,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR", "CRITICAL"])]
    pub log_level: String,

    /// Log file path (defaults to ~/.vahan-dashboard/logs/vahan-dashboard.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// Clear saved configuration
    #[arg(long)]
    pub clear: bool,
}

fn parse_cli_date(s: &str) -> std::result::Result<NaiveDate, String> {
    parse_date(s).map_err(|e| e.to_string())
}

fn parse_cli_category(s: &str) -> std::result::Result<Category, String> {
    s.parse::<Category>().map_err(|e| e.to_string())
}

// ── LastUsedParams ─────────────────────────────────────────────────────────────

/// Persisted last-used parameters saved to `~/.vahan-dashboard/last_used.json`.
///
/// Filters are deliberately absent: every run states its own selection.
#[derive(Debug, Serialize, Deserialize, Default, Clone)]
pub struct LastUsedParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csv_path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recent_months: Option<u32>,
}

impl LastUsedParams {
    /// Return the default path to the persisted config file.
    pub fn config_path() -> PathBuf {
        Self::config_path_in(&dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
    }

    /// Return the config path rooted at `base_dir` (used for testing).
    pub fn config_path_in(base_dir: &std::path::Path) -> PathBuf {
        base_dir.join(".vahan-dashboard").join("last_used.json")
    }

    /// Load persisted params from the default path.
    /// Returns `Default` when the file is absent or cannot be parsed.
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load persisted params from an explicit path.
    pub fn load_from(path: &std::path::Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return Self::default();
        };
        serde_json::from_str(&content).unwrap_or_default()
    }

    /// Atomically write params to an explicit path, creating parent
    /// directories if needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(self)?;

        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, path)?;

        Ok(())
    }

    /// Delete the config file at an explicit path if it exists.
    pub fn clear_at(path: &std::path::Path) -> Result<()> {
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

// ── Settings impl ──────────────────────────────────────────────────────────────

impl Settings {
    /// Parse CLI arguments and merge with last-used params where no explicit
    /// CLI value was provided.
    ///
    /// Nothing is written here; call [`Settings::store_last_used`] once
    /// logging is up.
    pub fn load_with_last_used() -> Self {
        Self::load_with_last_used_impl(
            std::env::args_os().collect(),
            &LastUsedParams::config_path(),
        )
    }

    /// Full implementation; accepts args and an explicit config path so that
    /// tests can redirect to a temporary directory.
    pub fn load_with_last_used_impl(
        args: Vec<std::ffi::OsString>,
        config_path: &std::path::Path,
    ) -> Self {
        let matches = Settings::command().get_matches_from(args.clone());
        let mut settings = Settings::parse_from(args);

        // `--clear` starts from defaults; the file is removed on store.
        if settings.clear {
            return Self::apply_debug_flag(settings);
        }

        let last = LastUsedParams::load_from(config_path);

        // CLI always wins over persisted values.
        if !is_arg_explicitly_set(&matches, "source") {
            if let Some(v) = last.source {
                settings.source = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "csv_path") {
            if let Some(v) = last.csv_path {
                settings.csv_path = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "view") {
            if let Some(v) = last.view {
                settings.view = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "format") {
            if let Some(v) = last.format {
                settings.format = v;
            }
        }
        if !is_arg_explicitly_set(&matches, "recent_months") {
            if let Some(v) = last.recent_months {
                settings.recent_months = v;
            }
        }

        Self::apply_debug_flag(settings)
    }

    /// Persist this run's parameters to the default config path, or delete
    /// the file when `--clear` was given.
    pub fn store_last_used(&self) -> Result<()> {
        self.store_last_used_at(&LastUsedParams::config_path())
    }

    /// Same as [`Settings::store_last_used`] with an explicit config path.
    pub fn store_last_used_at(&self, config_path: &std::path::Path) -> Result<()> {
        if self.clear {
            return LastUsedParams::clear_at(config_path);
        }
        LastUsedParams::from(self).save_to(config_path)
    }

    /// Check cross-field constraints that clap cannot express.
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if end < start {
                return Err(VahanError::Config(format!(
                    "end date {} is before start date {}",
                    end, start
                )));
            }
        }
        Ok(())
    }

    /// `--debug` overrides the log level.
    fn apply_debug_flag(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        settings
    }
}

// ── Conversion ─────────────────────────────────────────────────────────────────

impl From<&Settings> for LastUsedParams {
    fn from(s: &Settings) -> Self {
        LastUsedParams {
            source: Some(s.source.clone()),
            csv_path: Some(s.csv_path.clone()),
            view: Some(s.view.clone()),
            format: Some(s.format.clone()),
            recent_months: Some(s.recent_months),
        }
    }
}

// ── Helper: check if an arg was explicitly set on the command line ─────────────

/// Returns `true` when `name` was supplied explicitly on the command line
/// (not via default value or environment variable).
fn is_arg_explicitly_set(matches: &clap::ArgMatches, name: &str) -> bool {
    matches.value_source(name) == Some(clap::parser::ValueSource::CommandLine)
}

// ── Tests ──────────────────────────────────────────────────────────────────────
