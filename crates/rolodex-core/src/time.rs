use chrono::{DateTime, SecondsFormat, Utc};

/// Current time as an RFC 3339 UTC timestamp, the format stamped on records.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}
