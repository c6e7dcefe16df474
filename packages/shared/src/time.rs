//! Time helpers. Timestamps are Unix milliseconds, rendered in JST.

use chrono::{DateTime, FixedOffset, Utc};

fn jst() -> FixedOffset {
    FixedOffset::east_opt(9 * 3600).unwrap() // JST is UTC+9
}

/// Get current Unix timestamp in JST (milliseconds)
pub fn get_jst_timestamp() -> i64 {
    let now_jst: DateTime<FixedOffset> = Utc::now().with_timezone(&jst());
    now_jst.timestamp_millis()
}

/// Render a millisecond timestamp as RFC 3339 in JST.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn timestamp_to_jst_rfc3339(timestamp_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .unwrap_or_default()
        .with_timezone(&jst())
        .to_rfc3339()
}
