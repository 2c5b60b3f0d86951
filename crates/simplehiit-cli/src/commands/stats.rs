use simplehiit_core::{Database, UserStatistics};

pub fn run(user_id: i64) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let user = db.user(user_id)?;
    let records = db.sessions_for_user(user_id)?;
    let now_ms = chrono::Utc::now().timestamp_millis();

    let stats = UserStatistics::compute(user, &records, now_ms);
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}
