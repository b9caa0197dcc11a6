//! Date-range, category and manufacturer selection.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Serialize;
use vahan_core::models::{Category, RegistrationRecord};

/// Row selection applied before aggregation.
///
/// Every constraint is optional: `None` bounds and empty sets match
/// everything. Bounds are inclusive and compared against the record date as
/// given, so callers normalise to month starts first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrationFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub categories: BTreeSet<Category>,
    pub manufacturers: BTreeSet<String>,
}

impl RegistrationFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn with_end_date(mut self, date: NaiveDate) -> Self {
        self.end_date = Some(date);
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = Category>) -> Self {
        self.categories.extend(categories);
        self
    }

    pub fn with_manufacturers<S: Into<String>>(
        mut self,
        manufacturers: impl IntoIterator<Item = S>,
    ) -> Self {
        self.manufacturers
            .extend(manufacturers.into_iter().map(Into::into));
        self
    }

    /// Whether `record` passes every constraint.
    ///
    /// A record without a manufacturer never matches a non-empty
    /// manufacturer set.
    pub fn matches(&self, record: &RegistrationRecord) -> bool {
        if self.start_date.is_some_and(|start| record.date < start) {
            return false;
        }
        if self.end_date.is_some_and(|end| record.date > end) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&record.category) {
            return false;
        }
        if !self.manufacturers.is_empty() {
            match &record.manufacturer {
                Some(m) if self.manufacturers.contains(m) => {}
                _ => return false,
            }
        }
        true
    }

    /// Records passing the filter, in input order.
    pub fn apply(&self, records: &[RegistrationRecord]) -> Vec<RegistrationRecord> {
        records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect()
    }
}
