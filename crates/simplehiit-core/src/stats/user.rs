//! Per-user statistics summary.

use chrono::{Local, TimeZone};
use serde::{Deserialize, Serialize};

use super::streak::{average_sessions_per_week, current_streak_in, longest_streak_in};
use crate::format::DurationFormatter;
use crate::session::{SessionRecord, User};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStatistics {
    pub user: User,
    pub total_number_of_sessions: usize,
    pub cumulated_time_of_exercise_ms: u64,
    pub cumulated_time_of_exercise_formatted: String,
    pub average_session_length_ms: u64,
    pub average_session_length_formatted: String,
    pub longest_streak_days: u32,
    pub current_streak_days: u32,
    pub average_number_of_sessions_per_week: f64,
}

impl UserStatistics {
    /// Summarise the records `user` took part in. Records without the
    /// user's id are ignored.
    pub fn compute(user: User, records: &[SessionRecord], now_ms: i64) -> Self {
        Self::compute_in(&Local, user, records, now_ms)
    }

    pub fn compute_in<Tz: TimeZone>(
        tz: &Tz,
        user: User,
        records: &[SessionRecord],
        now_ms: i64,
    ) -> Self {
        let own: Vec<&SessionRecord> = records
            .iter()
            .filter(|r| r.users_ids.contains(&user.id))
            .collect();
        let timestamps: Vec<i64> = own.iter().map(|r| r.timestamp_ms).collect();
        let total = own.len();
        let cumulated: u64 = own.iter().map(|r| r.duration_ms).sum();
        let average = if total == 0 { 0 } else { cumulated / total as u64 };
        let formatter = DurationFormatter::words();

        Self {
            user,
            total_number_of_sessions: total,
            cumulated_time_of_exercise_ms: cumulated,
            cumulated_time_of_exercise_formatted: formatter.format(cumulated),
            average_session_length_ms: average,
            average_session_length_formatted: formatter.format(average),
            longest_streak_days: longest_streak_in(tz, &timestamps, now_ms),
            current_streak_days: current_streak_in(tz, &timestamps),
            average_number_of_sessions_per_week: average_sessions_per_week(&timestamps, now_ms),
        }
    }
}
