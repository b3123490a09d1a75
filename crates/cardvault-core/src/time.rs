use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serializer;

/// RFC 3339 in UTC with exactly three fractional digits, e.g. `2025-03-20T09:30:00.000Z`.
pub fn rfc3339_ms(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `serialize_with` adapter for [`rfc3339_ms`].
pub fn serialize_rfc3339_ms<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&rfc3339_ms(dt))
}
