//! Statistics over recorded sessions.
//!
//! Pure functions: no storage access, no errors.

mod days;
mod streak;
mod user;

pub use days::{compare_days, compare_days_in, ConsecutiveDaysOrCloser};
pub use streak::{
    average_sessions_per_week, current_streak, current_streak_in, longest_streak,
    longest_streak_in,
};
pub use user::UserStatistics;
