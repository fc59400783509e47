//! Domain models for the clinic desk.

mod bill;
mod patient;
mod prescription;
mod token;
mod user;

pub use bill::*;
pub use patient::*;
pub use prescription::*;
pub use token::*;
pub use user::*;

use chrono::{SecondsFormat, Utc};

/// Current instant as RFC3339 UTC with fixed-width microseconds.
///
/// The fixed width keeps lexicographic order identical to chronological
/// order, which the storage layer relies on for `created_at` range scans.
pub fn now_ts() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Today's queue day in the clinic's local time zone, as `YYYY-MM-DD`.
///
/// Token numbers restart from 1 at local midnight, so the queue day is
/// always reckoned in wall-clock time, not UTC.
pub fn local_day() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

/// UTC bounds `[start, end)` of a local queue day, in the same RFC3339
/// format as [`now_ts`]. Returns `None` when `day` is not `YYYY-MM-DD`
/// or falls in a gap the local time zone skips.
pub fn local_day_bounds(day: &str) -> Option<(String, String)> {
    use chrono::{Local, NaiveDate, TimeZone};

    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    let start = Local
        .from_local_datetime(&date.and_hms_opt(0, 0, 0)?)
        .earliest()?;
    let end = Local
        .from_local_datetime(&date.succ_opt()?.and_hms_opt(0, 0, 0)?)
        .earliest()?;

    Some((
        start
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Micros, true),
        end.with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Micros, true),
    ))
}
