//! Year-over-year and quarter-over-quarter growth per group.
//!
//! Comparisons are resolved through explicit indexes keyed by
//! `(group key, period)`, so row order and gaps in the data can never pair a
//! value with the wrong period or with another group.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::debug;
use vahan_core::calculations::pct_change_from;
use vahan_core::models::{GrowthRow, SeriesPoint};
use vahan_core::time_utils::{month_start, months_back, Quarter};

/// Calendar months between a value and its YoY comparison.
pub const YOY_LAG_MONTHS: u32 = 12;

/// Annotate `series` with `yoy_pct` and `qoq_pct`.
///
/// The output is sorted by month, then group key. For each row:
///
/// * `yoy_pct` compares the row against the same group exactly
///   [`YOY_LAG_MONTHS`] calendar months earlier.
/// * `qoq_pct` compares the group's total for the row's calendar quarter
///   against its total for the preceding calendar quarter, so every row of a
///   (group, quarter) carries the same value.
///
/// Either rate is `None` when the comparison period has no rows for the group
/// or sums to zero.
pub fn add_growth_rates<P>(series: &[P]) -> Vec<GrowthRow<P>>
where
    P: SeriesPoint + Clone,
{
    let mut sorted: Vec<P> = series.to_vec();
    sorted.sort_by(|a, b| {
        a.date()
            .cmp(&b.date())
            .then_with(|| a.group_key().cmp(&b.group_key()))
    });

    let index = PeriodIndex::build(&sorted);

    let rows: Vec<GrowthRow<P>> = sorted
        .into_iter()
        .map(|point| {
            let key = point.group_key();
            let month = month_start(point.date());
            let quarter = Quarter::from_date(month);

            let yoy_pct = months_back(month, YOY_LAG_MONTHS).and_then(|prior| {
                pct_change_from(point.registrations(), index.month_total(&key, prior))
            });

            let qoq_pct = index.quarter_total(&key, quarter).and_then(|total| {
                pct_change_from(total, index.quarter_total(&key, quarter.previous()))
            });

            GrowthRow {
                point,
                yoy_pct,
                qoq_pct,
            }
        })
        .collect();

    debug!(
        "Growth rates computed for {} rows across {} groups",
        rows.len(),
        index.group_count()
    );

    rows
}

// ── PeriodIndex ───────────────────────────────────────────────────────────────

/// Per-group monthly and quarterly totals.
struct PeriodIndex<K> {
    monthly: BTreeMap<(K, NaiveDate), u64>,
    quarterly: BTreeMap<(K, Quarter), u64>,
}

impl<K: Ord + Clone> PeriodIndex<K> {
    fn build<P: SeriesPoint<Key = K>>(points: &[P]) -> Self {
        let mut monthly = BTreeMap::new();
        let mut quarterly = BTreeMap::new();

        for point in points {
            let key = point.group_key();
            let month = month_start(point.date());
            let month_total = monthly.entry((key.clone(), month)).or_insert(0u64);
            *month_total = month_total.saturating_add(point.registrations());
            let quarter_total = quarterly
                .entry((key, Quarter::from_date(month)))
                .or_insert(0u64);
            *quarter_total = quarter_total.saturating_add(point.registrations());
        }

        Self { monthly, quarterly }
    }

    fn month_total(&self, key: &K, month: NaiveDate) -> Option<u64> {
        self.monthly.get(&(key.clone(), month)).copied()
    }

    fn quarter_total(&self, key: &K, quarter: Quarter) -> Option<u64> {
        self.quarterly.get(&(key.clone(), quarter)).copied()
    }

    fn group_count(&self) -> usize {
        let mut count = 0;
        let mut last: Option<&K> = None;
        for (key, _) in self.quarterly.keys() {
            if last != Some(key) {
                count += 1;
                last = Some(key);
            }
        }
        count
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
