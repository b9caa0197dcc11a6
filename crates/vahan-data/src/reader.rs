//! CSV loading for registration snapshots.
//!
//! Expected columns: `date`, `category`, `manufacturer`, `registrations`.
//! Extra columns are ignored; `manufacturer` may be blank or absent.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;
use vahan_core::error::{Result, VahanError};
use vahan_core::models::{Category, RegistrationRecord, MAX_REGISTRATIONS};
use vahan_core::time_utils::parse_date;

/// A raw CSV row before type conversion.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    category: String,
    #[serde(default)]
    manufacturer: Option<String>,
    registrations: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load registration records from a CSV file on disk.
pub fn load_local_csv(path: &Path) -> Result<Vec<RegistrationRecord>> {
    let file = std::fs::File::open(path).map_err(|source| VahanError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let records = load_registrations(file)?;
    debug!(
        "Loaded {} registration records from {}",
        records.len(),
        path.display()
    );
    Ok(records)
}

/// Load registration records from any CSV reader with a header row.
///
/// Fails on the first malformed row, naming its line number.
pub fn load_registrations<R: Read>(reader: R) -> Result<Vec<RegistrationRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let mut records = Vec::new();
    for result in csv_reader.records() {
        let raw = result?;
        // Physical line where the row starts; blank lines and quoted
        // newlines are counted.
        let line = raw.position().map_or(0, |p| p.line());
        let row: CsvRow = raw
            .deserialize(Some(&headers))
            .map_err(|e| VahanError::InvalidRecord {
                line,
                reason: e.to_string(),
            })?;
        records.push(map_row(row, line)?);
    }

    Ok(records)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn map_row(row: CsvRow, line: u64) -> Result<RegistrationRecord> {
    let invalid = |reason: String| VahanError::InvalidRecord { line, reason };

    let date = parse_date(&row.date).map_err(|e| invalid(e.to_string()))?;
    let category = row
        .category
        .parse::<Category>()
        .map_err(|e| invalid(e.to_string()))?;
    let registrations = parse_registrations(&row.registrations).map_err(invalid)?;
    let manufacturer = row
        .manufacturer
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());

    Ok(RegistrationRecord {
        date,
        category,
        manufacturer,
        registrations,
    })
}

/// Parse a non-negative count no larger than [`MAX_REGISTRATIONS`].
/// Whole-valued decimals such as `"120.0"` (as written by spreadsheet
/// exports) are accepted.
fn parse_registrations(s: &str) -> std::result::Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("missing registrations".to_string());
    }
    let value = match s.parse::<u64>() {
        Ok(n) => n,
        Err(_) => match s.parse::<f64>() {
            Ok(v) if v < 0.0 => return Err(format!("negative registrations: {s}")),
            Ok(v) if v.fract() == 0.0 && v <= MAX_REGISTRATIONS as f64 => v as u64,
            Ok(v) if v.fract() == 0.0 => u64::MAX,
            _ => return Err(format!("registrations must be a whole number: {s}")),
        },
    };
    if value > MAX_REGISTRATIONS {
        return Err(format!(
            "registrations {s} exceed the per-row limit of {MAX_REGISTRATIONS}"
        ));
    }
    Ok(value)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
