//! Query operations over the raw registration table.
//!
//! Every query is a pure function of the records and an explicit
//! [`RegistrationFilter`]: dates are snapped to month starts, the filter is
//! applied, the series is aggregated and growth rates are attached. Nothing
//! is cached between calls.

use serde::Serialize;
use tracing::debug;
use vahan_core::models::{
    CategoryGrowthRow, CategoryPoint, ManufacturerGrowthRow, RegistrationRecord,
};
use vahan_core::time_utils::Quarter;

use crate::aggregator::RegistrationAggregator;
use crate::filter::RegistrationFilter;
use crate::growth::add_growth_rates;
use crate::normalizer::ensure_month_start;
use crate::summary::{
    available_manufacturers, category_headlines, latest_per_manufacturer, latest_quarter,
    summarize_latest, LatestSnapshot,
};

// ── Single queries ────────────────────────────────────────────────────────────

/// Month-normalised records that pass `filter`.
pub fn prepare_records(
    records: &[RegistrationRecord],
    filter: &RegistrationFilter,
) -> Vec<RegistrationRecord> {
    filter.apply(&ensure_month_start(records))
}

/// Category series with YoY / QoQ columns.
pub fn category_trends(
    records: &[RegistrationRecord],
    filter: &RegistrationFilter,
) -> Vec<CategoryGrowthRow> {
    let prepared = prepare_records(records, filter);
    add_growth_rates(&RegistrationAggregator::aggregate_by_category(&prepared))
}

/// Manufacturer series with YoY / QoQ columns.
pub fn manufacturer_trends(
    records: &[RegistrationRecord],
    filter: &RegistrationFilter,
) -> Vec<ManufacturerGrowthRow> {
    let prepared = prepare_records(records, filter);
    add_growth_rates(&RegistrationAggregator::aggregate_by_manufacturer(&prepared))
}

/// Latest month of the category series, largest category first.
pub fn latest_category_snapshot(
    records: &[RegistrationRecord],
    filter: &RegistrationFilter,
) -> Option<LatestSnapshot<CategoryPoint>> {
    summarize_latest(&category_trends(records, filter))
}

/// Each manufacturer's own latest month, largest first.
pub fn latest_manufacturer_snapshot(
    records: &[RegistrationRecord],
    filter: &RegistrationFilter,
) -> Vec<ManufacturerGrowthRow> {
    latest_per_manufacturer(&manufacturer_trends(records, filter))
}

// ── Full report ───────────────────────────────────────────────────────────────

/// Counts describing one report run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Records handed to the engine.
    pub records_loaded: usize,
    /// Records left after filtering.
    pub records_selected: usize,
    /// Registrations summed over the selection.
    pub total_registrations: u64,
    /// Most recent calendar quarter in the selection.
    pub latest_quarter: Option<Quarter>,
}

/// Every view the dashboard shows, computed from one filtered table.
#[derive(Debug, Clone, Serialize)]
pub struct TrendReport {
    pub metadata: ReportMetadata,
    pub filter: RegistrationFilter,
    /// Manufacturer names available in the unfiltered data.
    pub manufacturers: Vec<String>,
    pub category_series: Vec<CategoryGrowthRow>,
    pub manufacturer_series: Vec<ManufacturerGrowthRow>,
    /// Latest month across categories.
    pub latest_category: Option<LatestSnapshot<CategoryPoint>>,
    /// Each manufacturer's latest month.
    pub latest_by_manufacturer: Vec<ManufacturerGrowthRow>,
    /// Each category's latest row.
    pub headlines: Vec<CategoryGrowthRow>,
}

/// Run all queries at once, sharing the prepared table between them.
///
/// Equivalent to calling the four single queries with the same arguments.
pub fn analyze_registrations(
    records: &[RegistrationRecord],
    filter: &RegistrationFilter,
) -> TrendReport {
    let normalised = ensure_month_start(records);
    let manufacturers = available_manufacturers(&normalised);
    let prepared = filter.apply(&normalised);

    let category_points = RegistrationAggregator::aggregate_by_category(&prepared);
    let total_registrations = RegistrationAggregator::total_registrations(&category_points);
    let category_series = add_growth_rates(&category_points);
    let manufacturer_series =
        add_growth_rates(&RegistrationAggregator::aggregate_by_manufacturer(&prepared));

    let latest_category = summarize_latest(&category_series);
    let latest_by_manufacturer = latest_per_manufacturer(&manufacturer_series);
    let headlines = category_headlines(&category_series);

    let metadata = ReportMetadata {
        records_loaded: records.len(),
        records_selected: prepared.len(),
        total_registrations,
        latest_quarter: latest_quarter(&prepared),
    };

    debug!(
        loaded = metadata.records_loaded,
        selected = metadata.records_selected,
        category_rows = category_series.len(),
        manufacturer_rows = manufacturer_series.len(),
        "trend report built"
    );

    TrendReport {
        metadata,
        filter: filter.clone(),
        manufacturers,
        category_series,
        manufacturer_series,
        latest_category,
        latest_by_manufacturer,
        headlines,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
