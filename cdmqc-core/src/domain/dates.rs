// cdmqc-core/src/domain/dates.rs
//
// Date windows for the time-bounded checks. Every windowed check anchors at
// "N years before a reference date"; the persistence checks always use ten
// years before the operator-chosen cutoff, applied identically to both
// snapshots so the comparison windows line up.

use chrono::{Datelike, NaiveDate};

/// Default lookback applied to the operator's cutoff date.
pub const LOOKBACK_YEARS: i32 = 10;

/// `date` minus `years`, clamping Feb 29 to Feb 28 on non-leap targets.
pub fn years_before(date: NaiveDate, years: i32) -> NaiveDate {
    match NaiveDate::from_ymd_opt(date.year() - years, date.month(), date.day()) {
        Some(d) => d,
        // Only Feb 29 can fail here.
        None => NaiveDate::from_ymd_opt(date.year() - years, 2, 28)
            .unwrap_or(date),
    }
}

/// Time-bucket granularity for trend queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Yearly,
    Monthly,
    Daily,
}

impl Granularity {
    /// strftime format producing the bucket key, lexicographically ordered.
    pub fn bucket_format(&self) -> &'static str {
        match self {
            Granularity::Yearly => "%Y",
            Granularity::Monthly => "%Y-%m",
            Granularity::Daily => "%Y-%m-%d",
        }
    }
}
