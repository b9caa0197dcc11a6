//! Plain-text rendering of a [`TrendReport`].
//!
//! Three views mirror the dashboard tabs: an overview with per-category
//! headlines and the monthly totals by category, a per-category table of the
//! most recent months, and a latest-month table per manufacturer.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use chrono::NaiveDate;
use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Style};
use tabled::{Table, Tabled};
use vahan_core::formatting::{format_count, format_month, format_pct};
use vahan_core::models::Category;
use vahan_data::analysis::TrendReport;
use vahan_data::summary::recent_rows;

/// Which part of the report to print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Category,
    Manufacturer,
    All,
}

impl View {
    /// Parse a `--view` value; unknown names fall back to the overview.
    pub fn from_name(name: &str) -> Self {
        match name {
            "category" => View::Category,
            "manufacturer" => View::Manufacturer,
            "all" => View::All,
            "overview" => View::Overview,
            other => {
                tracing::warn!("Unknown view mode {other:?}; showing overview");
                View::Overview
            }
        }
    }
}

/// Render `report` for `view`. `recent_months` bounds each category table.
pub fn render(report: &TrendReport, view: View, recent_months: usize) -> String {
    let sections = match view {
        View::Overview => vec![render_overview(report)],
        View::Category => vec![render_categories(report, recent_months)],
        View::Manufacturer => vec![render_manufacturers(report)],
        View::All => vec![
            render_overview(report),
            render_categories(report, recent_months),
            render_manufacturers(report),
        ],
    };
    sections.join("\n")
}

// ── Table rows ────────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct HeadlineRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Registrations")]
    registrations: String,
    #[tabled(rename = "YoY %")]
    yoy: String,
    #[tabled(rename = "QoQ %")]
    qoq: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Registrations")]
    registrations: String,
    #[tabled(rename = "YoY %")]
    yoy: String,
    #[tabled(rename = "QoQ %")]
    qoq: String,
}

#[derive(Tabled)]
struct ManufacturerRow {
    #[tabled(rename = "Manufacturer")]
    manufacturer: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Registrations")]
    registrations: String,
    #[tabled(rename = "YoY %")]
    yoy: String,
    #[tabled(rename = "QoQ %")]
    qoq: String,
}

// ── Views ─────────────────────────────────────────────────────────────────────

fn render_overview(report: &TrendReport) -> String {
    let mut out = String::new();
    let Some(latest) = &report.latest_category else {
        out.push_str("No data for selection.\n");
        return out;
    };

    let _ = writeln!(
        out,
        "Headline Snapshot (latest month: {})",
        format_month(latest.date)
    );
    let _ = writeln!(
        out,
        "Selected registrations: {}",
        format_count(report.metadata.total_registrations)
    );
    if let Some(quarter) = report.metadata.latest_quarter {
        let _ = match quarter.start_date() {
            Some(start) => writeln!(
                out,
                "Latest quarter: {} (from {})",
                quarter,
                format_month(start)
            ),
            None => writeln!(out, "Latest quarter: {}", quarter),
        };
    }
    out.push('\n');

    let rows = report.headlines.iter().map(|r| HeadlineRow {
        category: r.point.category.to_string(),
        month: format_month(r.point.date),
        registrations: format_count(r.point.registrations),
        yoy: format_pct(r.yoy_pct),
        qoq: format_pct(r.qoq_pct),
    });
    out.push_str(&layout(Table::new(rows), 2));

    out.push_str("\nTrend - Total Registrations (by Category)\n");
    out.push_str(&render_category_pivot(report));
    out
}

fn render_categories(report: &TrendReport, recent_months: usize) -> String {
    let mut out = String::from("Category Trends & Growth\n");
    for category in Category::ALL {
        let _ = writeln!(out, "\n### {}", category);
        let rows = recent_rows(&report.category_series, category, recent_months);
        if rows.is_empty() {
            out.push_str("No data for selection.\n");
            continue;
        }
        let rows = rows.iter().map(|r| CategoryRow {
            date: r.point.date.to_string(),
            registrations: format_count(r.point.registrations),
            yoy: format_pct(r.yoy_pct),
            qoq: format_pct(r.qoq_pct),
        });
        out.push_str(&layout(Table::new(rows), 1));
    }
    out
}

fn render_manufacturers(report: &TrendReport) -> String {
    let mut out = String::from("Manufacturer Trends & Growth (latest month per manufacturer)\n");
    if report.latest_by_manufacturer.is_empty() {
        out.push_str("No data for selection.\n");
        return out;
    }
    let rows = report.latest_by_manufacturer.iter().map(|r| ManufacturerRow {
        manufacturer: r.point.manufacturer.clone(),
        category: r.point.category.to_string(),
        date: r.point.date.to_string(),
        registrations: format_count(r.point.registrations),
        yoy: format_pct(r.yoy_pct),
        qoq: format_pct(r.qoq_pct),
    });
    out.push_str(&layout(Table::new(rows), 3));
    out
}

/// Month × category registrations, blank where a category has no row.
fn render_category_pivot(report: &TrendReport) -> String {
    let mut pivot: BTreeMap<NaiveDate, BTreeMap<Category, u64>> = BTreeMap::new();
    for row in &report.category_series {
        pivot
            .entry(row.point.date)
            .or_default()
            .insert(row.point.category, row.point.registrations);
    }

    let mut builder = Builder::default();
    builder.push_record(
        std::iter::once("Date")
            .chain(Category::ALL.iter().map(|c| c.as_str()))
            .map(String::from),
    );
    for (date, by_cat) in pivot {
        let mut cells = vec![date.to_string()];
        cells.extend(
            Category::ALL
                .iter()
                .map(|c| by_cat.get(c).map(|n| format_count(*n)).unwrap_or_default()),
        );
        builder.push_record(cells);
    }

    layout(builder.build(), 1)
}

/// Markdown layout with every column from `numeric_from` onward
/// right-aligned.
fn layout(mut table: Table, numeric_from: usize) -> String {
    table
        .with(Style::markdown())
        .modify(Columns::new(numeric_from..), Alignment::right());
    let mut out = table.to_string();
    out.push('\n');
    out
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use vahan_core::models::RegistrationRecord;
    use vahan_data::analysis::analyze_registrations;
    use vahan_data::filter::RegistrationFilter;

    fn ymd(y: i32, m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, 1).unwrap()
    }

    fn sample_report() -> TrendReport {
        let records = vec![
            RegistrationRecord::new(ymd(2022, 1), Category::TwoWheeler, Some("Hero"), 1_000),
            RegistrationRecord::new(ymd(2023, 1), Category::TwoWheeler, Some("Hero"), 1_500),
            RegistrationRecord::new(ymd(2023, 1), Category::FourWheeler, Some("Tata"), 400),
            RegistrationRecord::new(ymd(2022, 12), Category::ThreeWheeler, Some("Bajaj"), 80),
        ];
        analyze_registrations(&records, &RegistrationFilter::new())
    }

    #[test]
    fn test_view_from_name() {
        assert_eq!(View::from_name("overview"), View::Overview);
        assert_eq!(View::from_name("category"), View::Category);
        assert_eq!(View::from_name("manufacturer"), View::Manufacturer);
        assert_eq!(View::from_name("all"), View::All);
        assert_eq!(View::from_name("charts"), View::Overview);
    }

    #[test]
    fn test_overview_headlines() {
        let text = render(&sample_report(), View::Overview, 12);
        assert!(text.contains("latest month: Jan 2023"));
        assert!(text.contains("1,500"));
        assert!(text.contains("+50.0%"));
        assert!(text.contains("n/a"));
    }

    #[test]
    fn test_category_view_lists_every_category() {
        let text = render(&sample_report(), View::Category, 12);
        assert!(text.contains("### 2W"));
        assert!(text.contains("### 3W"));
        assert!(text.contains("### 4W"));
        assert!(text.contains("2022-12-01"));
    }

    #[test]
    fn test_category_view_respects_recent_months() {
        let text = render(&sample_report(), View::Category, 1);
        assert!(!text.contains("2022-01-01"));
        assert!(text.contains("2023-01-01"));
    }

    #[test]
    fn test_manufacturer_view_orders_by_registrations() {
        let text = render(&sample_report(), View::Manufacturer, 12);
        let hero = text.find("Hero").unwrap();
        let tata = text.find("Tata").unwrap();
        let bajaj = text.find("Bajaj").unwrap();
        assert!(hero < tata && tata < bajaj);
    }

    #[test]
    fn test_empty_report() {
        let report = analyze_registrations(&[], &RegistrationFilter::new());
        let text = render(&report, View::All, 12);
        assert!(text.contains("No data for selection."));
    }

    fn cells(line: &str) -> Vec<&str> {
        let inner = line.trim().trim_start_matches('|').trim_end_matches('|');
        inner.split('|').collect()
    }

    #[test]
    fn test_overview_pivot_leaves_missing_categories_blank() {
        let text = render(&sample_report(), View::Overview, 12);
        let line = text.lines().find(|l| l.contains("2022-12-01")).unwrap();
        let trimmed: Vec<&str> = cells(line).iter().map(|c| c.trim()).collect();
        assert_eq!(trimmed, vec!["2022-12-01", "", "80", ""]);
    }

    #[test]
    fn test_overview_reports_selection_totals() {
        let text = render(&sample_report(), View::Overview, 12);
        assert!(text.contains("Selected registrations: 2,980"));
        assert!(text.contains("Latest quarter: 2023Q1 (from Jan 2023)"));
    }

    #[test]
    fn test_counts_are_right_aligned() {
        let text = render(&sample_report(), View::Manufacturer, 12);
        let line = text.lines().find(|l| l.contains("Bajaj")).unwrap();
        let count = cells(line)[3];
        assert!(count.trim_end().ends_with("80"), "cell {count:?}");
        assert!(count.starts_with("  "), "cell {count:?}");
        let name = cells(line)[0];
        assert!(name.trim_start().starts_with("Bajaj"));
        assert!(name.starts_with(" Bajaj"), "cell {name:?}");
    }
}
