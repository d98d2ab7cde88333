// Date resolution for --to / --from and due-date helpers

use chrono::{DateTime, Datelike, Duration, FixedOffset, Local, NaiveDate};
use crate::error::MoverError;

/// Resolved source and destination days for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeTargets {
    pub to: NaiveDate,
    pub from: NaiveDate,
}

impl TimeTargets {
    /// Resolve both inputs against the local current date
    pub fn resolve(to: &str, from: &str) -> Result<Self, MoverError> {
        Self::resolve_on(to, from, Local::now().date_naive())
    }

    /// Resolve both inputs relative to `today`
    ///
    /// The two values are independent: `to` may precede `from`.
    pub fn resolve_on(to: &str, from: &str, today: NaiveDate) -> Result<Self, MoverError> {
        Ok(Self {
            to: resolve_date(to, "to", today)?,
            from: resolve_date(from, "from", today)?,
        })
    }
}

/// Turn `today`, `tomorrow`, `yesterday` (case-sensitive) or a YYYY-MM-DD
/// string into a calendar date. `field` names the flag in the error.
pub fn resolve_date(input: &str, field: &'static str, today: NaiveDate) -> Result<NaiveDate, MoverError> {
    match input {
        "today" => Ok(today),
        "tomorrow" => Ok(today + Duration::days(1)),
        "yesterday" => Ok(today - Duration::days(1)),
        _ => {
            let invalid = || MoverError::InvalidDate {
                field,
                input: input.to_string(),
            };
            if !is_iso_date_shape(input) {
                return Err(invalid());
            }
            NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| invalid())
        }
    }
}

/// Exactly four-digit year, two-digit month and day: `DDDD-DD-DD`
fn is_iso_date_shape(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

/// Format a date as the timestamp string the Tasks API stores in `due`.
/// The API keeps only the date portion.
pub fn format_due(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// Parse a `due` timestamp as returned by the API
pub fn parse_due(due: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(due).ok()
}

/// Whether a due timestamp falls on the same day-of-year as `day`.
///
/// Only the ordinal is compared, in whatever year each value carries, so
/// 2022-04-05 and 2023-04-05 match.
pub fn same_day_of_year(due: &DateTime<FixedOffset>, day: NaiveDate) -> bool {
    due.ordinal() == day.ordinal()
}
