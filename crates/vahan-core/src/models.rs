use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::VahanError;

/// Vehicle category as published by the Vahan portal.
///
/// Variant order is the display order used across the dashboard
/// (two-wheelers first).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "2W")]
    TwoWheeler,
    #[serde(rename = "3W")]
    ThreeWheeler,
    #[serde(rename = "4W")]
    FourWheeler,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 3] = [
        Category::TwoWheeler,
        Category::ThreeWheeler,
        Category::FourWheeler,
    ];

    /// Short label, e.g. `"2W"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::TwoWheeler => "2W",
            Category::ThreeWheeler => "3W",
            Category::FourWheeler => "4W",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = VahanError;

    /// Case-insensitive parse accepting the short labels and the long
    /// "TWO WHEELER" style aliases used by the portal exports.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        match upper.as_str() {
            "2W" | "TWO WHEELER" => Ok(Category::TwoWheeler),
            "3W" | "THREE WHEELER" => Ok(Category::ThreeWheeler),
            "4W" | "FOUR WHEELER" => Ok(Category::FourWheeler),
            _ => Err(VahanError::UnknownCategory(s.trim().to_string())),
        }
    }
}

/// Largest registration count accepted for a single input row.
///
/// Summing `u32::MAX`-bounded rows cannot overflow a `u64` total until well
/// past four billion rows.
pub const MAX_REGISTRATIONS: u64 = u32::MAX as u64;

/// One row of the input table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRecord {
    /// Registration date; truncated to the month start before aggregation.
    pub date: NaiveDate,
    /// Vehicle category.
    pub category: Category,
    /// Maker name, `None` when the source left it blank.
    #[serde(default)]
    pub manufacturer: Option<String>,
    /// Number of vehicles registered.
    pub registrations: u64,
}

impl RegistrationRecord {
    pub fn new(
        date: NaiveDate,
        category: Category,
        manufacturer: Option<&str>,
        registrations: u64,
    ) -> Self {
        Self {
            date,
            category,
            manufacturer: manufacturer.map(str::to_string),
            registrations,
        }
    }
}

// ── Time series points ────────────────────────────────────────────────────────

/// A row of a monthly series that belongs to a comparison group.
///
/// Growth rates are only ever computed between points that share the same
/// [`SeriesPoint::group_key`].
pub trait SeriesPoint {
    /// Fields that identify the group, e.g. the category alone.
    type Key: Ord + Clone;
    /// Group identity of this point.
    fn group_key(&self) -> Self::Key;
    /// Month start this point belongs to.
    fn date(&self) -> NaiveDate;
    /// Summed registrations for the period.
    fn registrations(&self) -> u64;
}

/// Registrations summed per (month, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryPoint {
    pub date: NaiveDate,
    pub category: Category,
    pub registrations: u64,
}

impl SeriesPoint for CategoryPoint {
    type Key = Category;

    fn group_key(&self) -> Category {
        self.category
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn registrations(&self) -> u64 {
        self.registrations
    }
}

/// Registrations summed per (month, manufacturer, category).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufacturerPoint {
    pub date: NaiveDate,
    pub manufacturer: String,
    pub category: Category,
    pub registrations: u64,
}

impl SeriesPoint for ManufacturerPoint {
    type Key = (String, Category);

    fn group_key(&self) -> (String, Category) {
        (self.manufacturer.clone(), self.category)
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn registrations(&self) -> u64 {
        self.registrations
    }
}

/// A series point annotated with its growth rates.
///
/// Both rates are fractions (`0.5` means +50 %). `None` marks a missing or
/// zero comparison period and serialises as `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrowthRow<P> {
    #[serde(flatten)]
    pub point: P,
    pub yoy_pct: Option<f64>,
    pub qoq_pct: Option<f64>,
}

impl<P: SeriesPoint> GrowthRow<P> {
    pub fn date(&self) -> NaiveDate {
        self.point.date()
    }

    pub fn registrations(&self) -> u64 {
        self.point.registrations()
    }
}

pub type CategoryGrowthRow = GrowthRow<CategoryPoint>;
pub type ManufacturerGrowthRow = GrowthRow<ManufacturerPoint>;

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_short_labels() {
        assert_eq!("2W".parse::<Category>().unwrap(), Category::TwoWheeler);
        assert_eq!("3w".parse::<Category>().unwrap(), Category::ThreeWheeler);
        assert_eq!(" 4W ".parse::<Category>().unwrap(), Category::FourWheeler);
    }

    #[test]
    fn test_category_from_long_aliases() {
        assert_eq!(
            "Two Wheeler".parse::<Category>().unwrap(),
            Category::TwoWheeler
        );
        assert_eq!(
            "THREE   WHEELER".parse::<Category>().unwrap(),
            Category::ThreeWheeler
        );
        assert_eq!(
            "four wheeler".parse::<Category>().unwrap(),
            Category::FourWheeler
        );
    }

    #[test]
    fn test_category_unknown_label() {
        let err = "LMV".parse::<Category>().unwrap_err();
        assert!(matches!(err, VahanError::UnknownCategory(ref s) if s == "LMV"));
    }

    #[test]
    fn test_category_display_and_order() {
        assert_eq!(Category::ThreeWheeler.to_string(), "3W");
        let mut cats = vec![
            Category::FourWheeler,
            Category::TwoWheeler,
            Category::ThreeWheeler,
        ];
        cats.sort();
        assert_eq!(cats, Category::ALL.to_vec());
    }

    #[test]
    fn test_category_serde_uses_short_label() {
        let json = serde_json::to_string(&Category::TwoWheeler).unwrap();
        assert_eq!(json, "\"2W\"");
        let back: Category = serde_json::from_str("\"4W\"").unwrap();
        assert_eq!(back, Category::FourWheeler);
    }

    #[test]
    fn test_manufacturer_point_group_key() {
        let p = ManufacturerPoint {
            date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            manufacturer: "Acme".to_string(),
            category: Category::TwoWheeler,
            registrations: 10,
        };
        assert_eq!(p.group_key(), ("Acme".to_string(), Category::TwoWheeler));
    }

    #[test]
    fn test_growth_row_serialises_flat_columns() {
        let row = GrowthRow {
            point: CategoryPoint {
                date: NaiveDate::from_ymd_opt(2023, 2, 1).unwrap(),
                category: Category::TwoWheeler,
                registrations: 110,
            },
            yoy_pct: None,
            qoq_pct: Some(0.5),
        };
        let value = serde_json::to_value(&row).unwrap();
        assert_eq!(value["date"], "2023-02-01");
        assert_eq!(value["category"], "2W");
        assert_eq!(value["registrations"], 110);
        assert!(value["yoy_pct"].is_null());
        assert_eq!(value["qoq_pct"], 0.5);
    }
}
