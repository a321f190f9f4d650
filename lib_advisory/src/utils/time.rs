//! Time formatting helpers shared by the loggers.

use chrono::{SecondsFormat, Utc};

/// Current UTC time as an RFC 9557 string, e.g.
/// `2026-08-07T09:15:00.000Z[Etc/UTC]`.
pub fn current_datetime_rfc9557() -> String {
    format!(
        "{}[Etc/UTC]",
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfc9557_timestamp_carries_zone_suffix() {
        let ts = current_datetime_rfc9557();
        assert!(ts.ends_with("Z[Etc/UTC]"));
        assert!(ts.contains('T'));
    }
}
