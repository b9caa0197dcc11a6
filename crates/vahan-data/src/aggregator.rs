//! Registration totals per (month, category) and (month, manufacturer,
//! category).

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;
use vahan_core::models::{Category, CategoryPoint, ManufacturerPoint, RegistrationRecord};
use vahan_core::time_utils::month_start;

// ── RegistrationAggregator ────────────────────────────────────────────────────

/// Stateless helper that collapses registration records into monthly series.
///
/// Totals saturate at `u64::MAX` instead of overflowing.
pub struct RegistrationAggregator;

impl RegistrationAggregator {
    /// Sum registrations per (month, category).
    ///
    /// Returns points sorted by month, then category.
    pub fn aggregate_by_category(records: &[RegistrationRecord]) -> Vec<CategoryPoint> {
        let mut map: BTreeMap<(NaiveDate, Category), u64> = BTreeMap::new();

        for record in records {
            let total = map
                .entry((month_start(record.date), record.category))
                .or_default();
            *total = total.saturating_add(record.registrations);
        }

        map.into_iter()
            .map(|((date, category), registrations)| CategoryPoint {
                date,
                category,
                registrations,
            })
            .collect()
    }

    /// Sum registrations per (month, manufacturer, category).
    ///
    /// Records without a manufacturer form no group here. Returns points
    /// sorted by month, manufacturer, then category.
    pub fn aggregate_by_manufacturer(records: &[RegistrationRecord]) -> Vec<ManufacturerPoint> {
        let mut map: BTreeMap<(NaiveDate, String, Category), u64> = BTreeMap::new();
        let mut unattributed = 0usize;

        for record in records {
            let Some(manufacturer) = &record.manufacturer else {
                unattributed += 1;
                continue;
            };
            let total = map
                .entry((month_start(record.date), manufacturer.clone(), record.category))
                .or_default();
            *total = total.saturating_add(record.registrations);
        }

        if unattributed > 0 {
            debug!(
                "{} records without a manufacturer left out of the manufacturer series",
                unattributed
            );
        }

        map.into_iter()
            .map(
                |((date, manufacturer, category), registrations)| ManufacturerPoint {
                    date,
                    manufacturer,
                    category,
                    registrations,
                },
            )
            .collect()
    }

    /// Sum of registrations across a category series.
    pub fn total_registrations(series: &[CategoryPoint]) -> u64 {
        series
            .iter()
            .fold(0u64, |acc, p| acc.saturating_add(p.registrations))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
