use chrono::{DateTime, Duration, Local, Utc};

/// `now + mins` minutes
pub fn minutes_from_now(now: DateTime<Utc>, mins: u32) -> DateTime<Utc> {
    now + Duration::minutes(i64::from(mins))
}

/// Absent expiry never expires; otherwise expired once `now` reaches it
pub fn is_expired(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    expires_at.is_some_and(|at| at <= now)
}

/// Local wall-clock rendering for display, `-` when absent
pub fn fmt_date(at: Option<DateTime<Utc>>) -> String {
    match at {
        Some(at) => at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "-".to_string(),
    }
}
