//! Integration tests for per-user statistics over stored sessions.

use chrono::{TimeZone, Utc};
use simplehiit_core::{Database, SessionRecord, UserStatistics};

fn ms(y: i32, m: u32, d: u32, h: u32) -> i64 {
    Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap().timestamp_millis()
}

fn record(timestamp_ms: i64, duration_ms: u64, users_ids: Vec<i64>) -> SessionRecord {
    SessionRecord {
        id: None,
        timestamp_ms,
        duration_ms,
        users_ids,
    }
}

#[test]
fn test_statistics_from_stored_sessions() {
    let db = Database::open_memory().unwrap();
    let ann = db.insert_user("Ann").unwrap();
    let bob = db.insert_user("Bob").unwrap();

    // Ann: Oct 1, 2, 3 (twice), then Oct 7 and 8. Bob joins Oct 3 and 8.
    db.insert_session(&record(ms(2022, 10, 1, 8), 240_000, vec![ann.id])).unwrap();
    db.insert_session(&record(ms(2022, 10, 2, 8), 240_000, vec![ann.id])).unwrap();
    db.insert_session(&record(ms(2022, 10, 3, 8), 240_000, vec![ann.id, bob.id])).unwrap();
    db.insert_session(&record(ms(2022, 10, 3, 18), 120_000, vec![ann.id])).unwrap();
    db.insert_session(&record(ms(2022, 10, 7, 8), 240_000, vec![ann.id])).unwrap();
    db.insert_session(&record(ms(2022, 10, 8, 8), 360_000, vec![ann.id, bob.id])).unwrap();

    let now = ms(2022, 10, 8, 15);

    let ann_records = db.sessions_for_user(ann.id).unwrap();
    let ann_stats = UserStatistics::compute_in(&Utc, ann.clone(), &ann_records, now);
    assert_eq!(ann_stats.total_number_of_sessions, 6);
    assert_eq!(ann_stats.cumulated_time_of_exercise_ms, 1_440_000);
    assert_eq!(ann_stats.cumulated_time_of_exercise_formatted, "24min");
    assert_eq!(ann_stats.average_session_length_formatted, "4min");
    assert_eq!(ann_stats.current_streak_days, 1);
    assert_eq!(ann_stats.longest_streak_days, 2);

    // Computing from every record filters by user id.
    let bob_stats = UserStatistics::compute_in(&Utc, bob.clone(), &db.sessions().unwrap(), now);
    assert_eq!(bob_stats.total_number_of_sessions, 2);
    assert_eq!(bob_stats.cumulated_time_of_exercise_ms, 600_000);
    assert_eq!(bob_stats.current_streak_days, 0);
    assert_eq!(bob_stats.longest_streak_days, 0);
}

#[test]
fn test_statistics_serialize_for_the_cli() {
    let db = Database::open_memory().unwrap();
    let ann = db.insert_user("Ann").unwrap();
    db.insert_session(&record(ms(2022, 10, 8, 8), 90_000, vec![ann.id])).unwrap();

    let stats = UserStatistics::compute_in(&Utc, ann, &db.sessions().unwrap(), ms(2022, 10, 8, 9));
    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["user"]["name"], "Ann");
    assert_eq!(json["cumulated_time_of_exercise_formatted"], "1min 30s");
}
