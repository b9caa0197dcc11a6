//! Month-start normalisation of registration dates.

use vahan_core::models::RegistrationRecord;
use vahan_core::time_utils::month_start;

/// Return a copy of `records` with every date moved to the first day of its
/// month. Order and all other fields are preserved.
pub fn ensure_month_start(records: &[RegistrationRecord]) -> Vec<RegistrationRecord> {
    records
        .iter()
        .map(|r| RegistrationRecord {
            date: month_start(r.date),
            ..r.clone()
        })
        .collect()
}
