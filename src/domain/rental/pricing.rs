//! Rental price computation
//!
//! The total for a rental is `(days + 1) * daily_rate` where `days` is the
//! calendar-day difference between the two dates: both endpoints are billed,
//! so a same-day rental costs one day. Dates are pure calendar dates; time
//! of day and time zones never enter the computation. Rates are integers in
//! the smallest currency unit, so the product is exact.

use chrono::NaiveDate;

use crate::shared::{DomainError, DomainResult};

/// Compute the total price for an inclusive date range.
pub fn rental_price(start: NaiveDate, end: NaiveDate, daily_rate: i64) -> DomainResult<i64> {
    if end < start {
        return Err(DomainError::InvalidRange { start, end });
    }

    let days = (end - start).num_days() + 1;
    Ok(days * daily_rate)
}

// ── Tests ──────────────────────────────────────────────────────
