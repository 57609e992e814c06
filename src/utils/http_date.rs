//! HTTP-date rendering for the `Expires` header.

use chrono::{DateTime, TimeDelta, Utc};

use crate::utils::DurationSpan;

const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Returns `now + span`, or `None` when the result is not representable.
pub fn expires_at(now: DateTime<Utc>, span: DurationSpan) -> Option<DateTime<Utc>> {
    let secs = i64::try_from(span.as_secs()).ok()?;
    let delta = TimeDelta::try_seconds(secs)?;
    now.checked_add_signed(delta)
}

/// Formats a timestamp as an RFC 1123 HTTP-date, always in GMT.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(HTTP_DATE_FORMAT).to_string()
}
