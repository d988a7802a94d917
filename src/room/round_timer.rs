use chrono::{DateTime, Utc};

/// Whether a round that started at `started_at` has run out of time at `now`.
///
/// Evaluated lazily whenever a room is touched; nothing ticks in the background.
pub fn round_expired(started_at: DateTime<Utc>, now: DateTime<Utc>, duration_seconds: u64) -> bool {
    let elapsed_ms = (now - started_at).num_milliseconds();
    let duration_ms = i64::try_from(duration_seconds)
        .unwrap_or(i64::MAX / 1000)
        .saturating_mul(1000);
    elapsed_ms >= duration_ms
}
