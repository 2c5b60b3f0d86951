//! Streaks and weekly averages over session timestamps.
//!
//! All inputs are epoch milliseconds. Empty inputs give zero results.

use chrono::{Local, TimeZone};

use super::days::{compare_days_in, ConsecutiveDaysOrCloser};

const WEEK_MS: f64 = 7.0 * 24.0 * 3600.0 * 1000.0;

/// Number of day-to-day steps in the most recent unbroken run of sessions.
pub fn current_streak(timestamps: &[i64]) -> u32 {
    current_streak_in(&Local, timestamps)
}

pub fn current_streak_in<Tz: TimeZone>(tz: &Tz, timestamps: &[i64]) -> u32 {
    let sorted = sorted_descending(timestamps.iter().copied());
    let mut streak = 0;
    for pair in sorted.windows(2) {
        match compare_days_in(tz, pair[0], pair[1]) {
            ConsecutiveDaysOrCloser::SameDay => {}
            ConsecutiveDaysOrCloser::ConsecutiveDays => streak += 1,
            ConsecutiveDaysOrCloser::NonConsecutiveDays => break,
        }
    }
    streak
}

/// Longest run of consecutive days, `now` included so that a session
/// today or yesterday keeps the latest run open.
pub fn longest_streak(timestamps: &[i64], now_ms: i64) -> u32 {
    longest_streak_in(&Local, timestamps, now_ms)
}

pub fn longest_streak_in<Tz: TimeZone>(tz: &Tz, timestamps: &[i64], now_ms: i64) -> u32 {
    if timestamps.is_empty() {
        return 0;
    }
    let sorted = sorted_descending(timestamps.iter().copied().chain(std::iter::once(now_ms)));
    let mut best = 0;
    let mut rolling = 0;
    for pair in sorted.windows(2) {
        match compare_days_in(tz, pair[0], pair[1]) {
            ConsecutiveDaysOrCloser::SameDay => {}
            ConsecutiveDaysOrCloser::ConsecutiveDays => rolling += 1,
            ConsecutiveDaysOrCloser::NonConsecutiveDays => {
                best = best.max(rolling);
                rolling = 0;
            }
        }
    }
    best.max(rolling)
}

/// Sessions per rolling 7-day period between the oldest session and `now`,
/// rounded to 2 decimals.
pub fn average_sessions_per_week(timestamps: &[i64], now_ms: i64) -> f64 {
    let Some(&oldest) = timestamps.iter().min() else {
        return 0.0;
    };
    let count = timestamps.len() as f64;
    let span_ms = now_ms - oldest;
    if span_ms <= 0 {
        return count;
    }
    let weeks = span_ms as f64 / WEEK_MS;
    round_2(count / weeks)
}

fn sorted_descending(timestamps: impl Iterator<Item = i64>) -> Vec<i64> {
    let mut sorted: Vec<i64> = timestamps.collect();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    sorted
}

fn round_2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
