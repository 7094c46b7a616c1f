//! `Retry-After` header parsing.

use std::time::Duration;

use chrono::{DateTime, Utc};

pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(10);

/// Delay requested by a `Retry-After` header.
///
/// Accepts decimal seconds (`"1.5"`) or an HTTP date, which is measured from
/// `now` and clamped at zero. Anything else, including no header or a value
/// too large for a [`Duration`], gives [`DEFAULT_RETRY_AFTER`].
pub fn parse_retry_after(header: Option<&str>, now: DateTime<Utc>) -> Duration {
    let Some(raw) = header.map(str::trim).filter(|h| !h.is_empty()) else {
        return DEFAULT_RETRY_AFTER;
    };
    if let Ok(seconds) = raw.parse::<f64>() {
        return if seconds.is_finite() && seconds >= 0.0 {
            Duration::try_from_secs_f64(seconds).unwrap_or(DEFAULT_RETRY_AFTER)
        } else if seconds.is_finite() {
            Duration::ZERO
        } else {
            DEFAULT_RETRY_AFTER
        };
    }
    match DateTime::parse_from_rfc2822(raw) {
        Ok(date) => (date.with_timezone(&Utc) - now)
            .to_std()
            .unwrap_or(Duration::ZERO),
        Err(_) => DEFAULT_RETRY_AFTER,
    }
}
