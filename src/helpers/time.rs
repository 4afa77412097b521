use chrono::Utc;
use std::time::Duration;
use tokio::time::Instant;

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Absolute expiry for a ttl, `None` when the entry never expires (ttl == 0).
pub fn expires_at_millis(ttl: Duration) -> Option<i64> {
    if ttl.is_zero() {
        return None;
    }
    let ttl_millis = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
    Some(now_millis().saturating_add(ttl_millis))
}

pub fn get_instant() -> Instant {
    Instant::now()
}
