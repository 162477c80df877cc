//! Calendar-day keys.
//!
//! The ledger is keyed by calendar day, not by instant. Engine entry points
//! take the day as a parameter so domain logic stays deterministic; only the
//! CLI asks the wall clock.

use chrono::{Local, NaiveDate};

/// Format used when rendering a day key (ISO date, `2026-08-08`).
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Returns the current calendar day in the local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Renders a date as a ledger day key.
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}
