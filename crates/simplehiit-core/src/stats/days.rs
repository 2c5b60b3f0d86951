//! Calendar-day comparison of two timestamps.

use chrono::{Local, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsecutiveDaysOrCloser {
    SameDay,
    ConsecutiveDays,
    NonConsecutiveDays,
}

/// Compare two epoch-millisecond timestamps by calendar day in the local
/// zone, as configured when the call is made.
pub fn compare_days(a_ms: i64, b_ms: i64) -> ConsecutiveDaysOrCloser {
    compare_days_in(&Local, a_ms, b_ms)
}

/// [`compare_days`] in an explicit zone.
pub fn compare_days_in<Tz: TimeZone>(tz: &Tz, a_ms: i64, b_ms: i64) -> ConsecutiveDaysOrCloser {
    let days = (calendar_day(tz, a_ms) - calendar_day(tz, b_ms)).num_days().abs();
    match days {
        0 => ConsecutiveDaysOrCloser::SameDay,
        1 => ConsecutiveDaysOrCloser::ConsecutiveDays,
        _ => ConsecutiveDaysOrCloser::NonConsecutiveDays,
    }
}

fn calendar_day<Tz: TimeZone>(tz: &Tz, ms: i64) -> NaiveDate {
    tz.timestamp_millis_opt(ms)
        .earliest()
        .map(|dt| dt.date_naive())
        .unwrap_or(NaiveDate::MIN)
}
