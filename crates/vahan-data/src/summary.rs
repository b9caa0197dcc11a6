//! Latest-period snapshots and other summary views over growth series.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;
use vahan_core::models::{
    Category, CategoryGrowthRow, GrowthRow, ManufacturerGrowthRow, RegistrationRecord, SeriesPoint,
};
use vahan_core::time_utils::Quarter;

/// Rows of the most recent month in a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LatestSnapshot<P> {
    /// The most recent month present.
    pub date: NaiveDate,
    /// Rows at `date`, largest registrations first.
    pub rows: Vec<GrowthRow<P>>,
}

/// The most recent month in `series` and its rows sorted by registrations,
/// descending. Returns `None` for an empty series.
///
/// Ties keep their series order.
pub fn summarize_latest<P>(series: &[GrowthRow<P>]) -> Option<LatestSnapshot<P>>
where
    P: SeriesPoint + Clone,
{
    let date = series.iter().map(|r| r.date()).max()?;
    let mut rows: Vec<GrowthRow<P>> = series
        .iter()
        .filter(|r| r.date() == date)
        .cloned()
        .collect();
    sort_by_registrations_desc(&mut rows);
    Some(LatestSnapshot { date, rows })
}

/// For each manufacturer, the rows at that manufacturer's own latest month
/// (one per category it sold in that month). The result is sorted by
/// registrations, descending.
///
/// A manufacturer absent from the globally latest month still appears, with
/// its older rows.
pub fn latest_per_manufacturer(series: &[ManufacturerGrowthRow]) -> Vec<ManufacturerGrowthRow> {
    let mut latest: BTreeMap<&str, NaiveDate> = BTreeMap::new();
    for row in series {
        let entry = latest
            .entry(row.point.manufacturer.as_str())
            .or_insert(row.point.date);
        if row.point.date > *entry {
            *entry = row.point.date;
        }
    }

    let mut rows: Vec<ManufacturerGrowthRow> = series
        .iter()
        .filter(|r| latest.get(r.point.manufacturer.as_str()) == Some(&r.point.date))
        .cloned()
        .collect();
    rows.sort_by(|a, b| {
        b.point
            .registrations
            .cmp(&a.point.registrations)
            .then_with(|| a.point.manufacturer.cmp(&b.point.manufacturer))
            .then_with(|| a.point.category.cmp(&b.point.category))
    });
    rows
}

/// Each category's most recent row, in category display order. Categories
/// with no rows are omitted.
pub fn category_headlines(series: &[CategoryGrowthRow]) -> Vec<CategoryGrowthRow> {
    Category::ALL
        .iter()
        .filter_map(|category| {
            series
                .iter()
                .filter(|r| r.point.category == *category)
                .max_by_key(|r| r.point.date)
                .cloned()
        })
        .collect()
}

/// The last `months` rows of one category, oldest first.
pub fn recent_rows(
    series: &[CategoryGrowthRow],
    category: Category,
    months: usize,
) -> Vec<CategoryGrowthRow> {
    let mut rows: Vec<CategoryGrowthRow> = series
        .iter()
        .filter(|r| r.point.category == category)
        .cloned()
        .collect();
    rows.sort_by_key(|r| r.point.date);
    let skip = rows.len().saturating_sub(months);
    rows.split_off(skip)
}

/// The most recent calendar quarter with any record.
pub fn latest_quarter(records: &[RegistrationRecord]) -> Option<Quarter> {
    records.iter().map(|r| Quarter::from_date(r.date)).max()
}

/// Distinct manufacturer names, sorted.
pub fn available_manufacturers(records: &[RegistrationRecord]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.manufacturer.clone())
        .collect::<BTreeSet<String>>()
        .into_iter()
        .collect()
}

fn sort_by_registrations_desc<P: SeriesPoint>(rows: &mut [GrowthRow<P>]) {
    rows.sort_by_key(|r| std::cmp::Reverse(r.registrations()));
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use vahan_core::models::{CategoryPoint, ManufacturerPoint};

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn cat_row(y: i32, m: u32, category: Category, n: u64) -> CategoryGrowthRow {
        GrowthRow {
            point: CategoryPoint {
                date: ymd(y, m),
                category,
                registrations: n,
            },
            yoy_pct: None,
            qoq_pct: None,
        }
    }

    fn maker_row(y: i32, m: u32, name: &str, category: Category, n: u64) -> ManufacturerGrowthRow {
        GrowthRow {
            point: ManufacturerPoint {
                date: ymd(y, m),
                manufacturer: name.to_string(),
                category,
                registrations: n,
            },
            yoy_pct: None,
            qoq_pct: None,
        }
    }

    // ── summarize_latest ──────────────────────────────────────────────────────

    #[test]
    fn test_latest_rows_sorted_descending() {
        let series = vec![
            cat_row(2023, 1, Category::TwoWheeler, 999),
            cat_row(2023, 2, Category::TwoWheeler, 50),
            cat_row(2023, 2, Category::ThreeWheeler, 200),
            cat_row(2023, 2, Category::FourWheeler, 10),
        ];
        let snap = summarize_latest(&series).unwrap();
        assert_eq!(snap.date, ymd(2023, 2));
        let values: Vec<u64> = snap.rows.iter().map(|r| r.point.registrations).collect();
        assert_eq!(values, vec![200, 50, 10]);
    }

    #[test]
    fn test_latest_empty_series() {
        assert!(summarize_latest::<CategoryPoint>(&[]).is_none());
    }

    #[test]
    fn test_latest_ties_keep_series_order() {
        let series = vec![
            cat_row(2023, 2, Category::TwoWheeler, 5),
            cat_row(2023, 2, Category::ThreeWheeler, 5),
        ];
        let snap = summarize_latest(&series).unwrap();
        assert_eq!(snap.rows[0].point.category, Category::TwoWheeler);
        assert_eq!(snap.rows[1].point.category, Category::ThreeWheeler);
    }

    // ── latest_per_manufacturer ───────────────────────────────────────────────

    #[test]
    fn test_manufacturer_uses_own_latest_month() {
        let series = vec![
            maker_row(2023, 1, "Acme", Category::TwoWheeler, 500),
            maker_row(2023, 2, "Acme", Category::TwoWheeler, 40),
            maker_row(2022, 11, "Zeta", Category::FourWheeler, 70),
            maker_row(2022, 12, "Zeta", Category::FourWheeler, 60),
        ];
        let latest = latest_per_manufacturer(&series);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].point.manufacturer, "Zeta");
        assert_eq!(latest[0].point.date, ymd(2022, 12));
        assert_eq!(latest[1].point.manufacturer, "Acme");
        assert_eq!(latest[1].point.date, ymd(2023, 2));
    }

    #[test]
    fn test_manufacturer_keeps_every_category_of_latest_month() {
        let series = vec![
            maker_row(2023, 2, "Bajaj", Category::TwoWheeler, 10),
            maker_row(2023, 2, "Bajaj", Category::ThreeWheeler, 30),
            maker_row(2023, 1, "Bajaj", Category::ThreeWheeler, 99),
        ];
        let latest = latest_per_manufacturer(&series);
        let values: Vec<u64> = latest.iter().map(|r| r.point.registrations).collect();
        assert_eq!(values, vec![30, 10]);
    }

    #[test]
    fn test_manufacturer_empty() {
        assert!(latest_per_manufacturer(&[]).is_empty());
    }

    // ── category_headlines / recent_rows ──────────────────────────────────────

    #[test]
    fn test_category_headlines_latest_per_category() {
        let series = vec![
            cat_row(2023, 1, Category::FourWheeler, 1),
            cat_row(2023, 3, Category::TwoWheeler, 2),
            cat_row(2023, 2, Category::TwoWheeler, 3),
        ];
        let heads = category_headlines(&series);
        assert_eq!(heads.len(), 2);
        assert_eq!(heads[0].point.category, Category::TwoWheeler);
        assert_eq!(heads[0].point.date, ymd(2023, 3));
        assert_eq!(heads[1].point.category, Category::FourWheeler);
    }

    #[test]
    fn test_recent_rows_takes_tail() {
        let series: Vec<CategoryGrowthRow> = (1..=6)
            .map(|m| cat_row(2023, m, Category::TwoWheeler, u64::from(m)))
            .chain(std::iter::once(cat_row(2023, 6, Category::ThreeWheeler, 100)))
            .collect();
        let rows = recent_rows(&series, Category::TwoWheeler, 3);
        let months: Vec<NaiveDate> = rows.iter().map(|r| r.point.date).collect();
        assert_eq!(months, vec![ymd(2023, 4), ymd(2023, 5), ymd(2023, 6)]);

        assert_eq!(recent_rows(&series, Category::TwoWheeler, 50).len(), 6);
        assert!(recent_rows(&series, Category::FourWheeler, 3).is_empty());
    }

    // ── latest_quarter / available_manufacturers ──────────────────────────────

    #[test]
    fn test_latest_quarter() {
        let records = vec![
            RegistrationRecord::new(ymd(2022, 11), Category::TwoWheeler, None, 1),
            RegistrationRecord::new(ymd(2023, 2), Category::TwoWheeler, None, 1),
        ];
        assert_eq!(
            latest_quarter(&records),
            Some(Quarter {
                year: 2023,
                quarter: 1
            })
        );
        assert_eq!(latest_quarter(&[]), None);
    }

    #[test]
    fn test_available_manufacturers_sorted_distinct() {
        let records = vec![
            RegistrationRecord::new(ymd(2023, 1), Category::TwoWheeler, Some("TVS"), 1),
            RegistrationRecord::new(ymd(2023, 1), Category::TwoWheeler, None, 1),
            RegistrationRecord::new(ymd(2023, 2), Category::TwoWheeler, Some("Bajaj"), 1),
            RegistrationRecord::new(ymd(2023, 3), Category::ThreeWheeler, Some("TVS"), 1),
        ];
        assert_eq!(
            available_manufacturers(&records),
            vec!["Bajaj".to_string(), "TVS".to_string()]
        );
    }
}
