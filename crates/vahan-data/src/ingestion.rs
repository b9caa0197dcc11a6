//! Data-source selection.
//!
//! Two pathways feed the engine: the local CSV snapshot, and the public Vahan
//! analytics portal. The portal gates its data behind a human-solved CAPTCHA
//! and has no automated harvesting path, so the live source always resolves
//! to the CSV snapshot after logging why.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::{info, warn};
use vahan_core::error::{Result, VahanError};
use vahan_core::models::RegistrationRecord;
use vahan_core::settings::DEFAULT_CSV_PATH;

use crate::reader::load_local_csv;

/// Public dashboard the live source points at.
pub const LIVE_DASHBOARD_URL: &str =
    "https://analytics.parivahan.gov.in/analytics/publicdashboard/vahan?lang=en";

/// Where registration records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    /// Local CSV snapshot.
    Local,
    /// Live portal, falling back to the snapshot.
    Live,
}

impl FromStr for DataSource {
    type Err = VahanError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(DataSource::Local),
            "live" | "selenium" => Ok(DataSource::Live),
            _ => Err(VahanError::InvalidSource(s.to_string())),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Local => f.write_str("local"),
            DataSource::Live => f.write_str("live"),
        }
    }
}

/// Options shared by both sources.
#[derive(Debug, Clone)]
pub struct SourceOptions {
    /// CSV snapshot path; also the live source's fallback.
    pub csv_path: PathBuf,
    /// Whether a live browser session would run without a window.
    pub headless: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            csv_path: PathBuf::from(DEFAULT_CSV_PATH),
            headless: false,
        }
    }
}

/// Load registration records from `source`.
pub fn get_data(source: DataSource, options: &SourceOptions) -> Result<Vec<RegistrationRecord>> {
    match source {
        DataSource::Local => {
            info!("Loading local snapshot {}", options.csv_path.display());
            load_local_csv(&options.csv_path)
        }
        DataSource::Live => {
            warn!(
                url = LIVE_DASHBOARD_URL,
                headless = options.headless,
                "live scraping requires a manually solved CAPTCHA and is not available; \
                 falling back to local CSV"
            );
            load_local_csv(&options.csv_path)
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
