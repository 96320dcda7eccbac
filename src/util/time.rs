//! Clock helpers and timestamp localization

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use chrono::{Datelike, FixedOffset, NaiveDateTime, TimeZone, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Get current Unix timestamp in milliseconds
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_millis() as u64
}

/// Server start time for uptime tracking
static SERVER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize server start time (call once at startup)
pub fn init_server_time() {
    SERVER_START.get_or_init(Instant::now);
}

/// Get server uptime in seconds
pub fn uptime_secs() -> u64 {
    SERVER_START
        .get()
        .map(|start| start.elapsed().as_secs())
        .unwrap_or(0)
}

/// Display style for localized timestamps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeStyle {
    /// `3/20, 16:36`
    Compact,
    /// `3/20, 4:36 PM`
    #[default]
    Short,
}

/// Seconds are optional, as in `datetime-local` input values
const UTC_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a naive timestamp as UTC. A trailing `Z` is accepted.
pub fn parse_utc(raw: &str) -> Option<chrono::DateTime<Utc>> {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('Z').unwrap_or(trimmed);
    UTC_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Render a UTC timestamp in the viewer's offset.
///
/// Returns `None` for unparseable input or an out-of-range offset; callers
/// leave the original text in place.
pub fn localize(raw: &str, utc_offset_minutes: i32, style: TimeStyle) -> Option<String> {
    let offset = FixedOffset::east_opt(utc_offset_minutes.checked_mul(60)?)?;
    let local = parse_utc(raw)?.with_timezone(&offset);

    let formatted = match style {
        TimeStyle::Compact => format!(
            "{}/{}, {:02}:{:02}",
            local.month(),
            local.day(),
            local.hour(),
            local.minute()
        ),
        TimeStyle::Short => {
            let (pm, hour) = local.hour12();
            format!(
                "{}/{}, {}:{:02} {}",
                local.month(),
                local.day(),
                hour,
                local.minute(),
                if pm { "PM" } else { "AM" }
            )
        }
    };
    Some(formatted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_variants() {
        assert!(parse_utc("2024-03-20T16:36:00").is_some());
        assert!(parse_utc("2024-03-20 16:36:00.123456").is_some());
        assert!(parse_utc("2024-03-20T16:36:00Z").is_some());
        assert!(parse_utc("yesterday").is_none());
        assert!(parse_utc("").is_none());
    }

    #[test]
    fn test_minute_precision_input() {
        assert_eq!(
            localize("2024-03-20T16:36", 0, TimeStyle::Short).as_deref(),
            Some("3/20, 4:36 PM")
        );
        assert_eq!(
            localize("2024-03-20 16:36", 60, TimeStyle::Compact).as_deref(),
            Some("3/20, 17:36")
        );
        assert!(parse_utc("2024-03-20T16").is_none());
    }

    #[test]
    fn test_compact_style() {
        assert_eq!(
            localize("2024-03-20T16:36:00", 0, TimeStyle::Compact).as_deref(),
            Some("3/20, 16:36")
        );
        assert_eq!(
            localize("2024-03-20T08:05:00", 0, TimeStyle::Compact).as_deref(),
            Some("3/20, 08:05")
        );
    }

    #[test]
    fn test_short_style() {
        assert_eq!(
            localize("2024-03-20T16:36:00", 0, TimeStyle::Short).as_deref(),
            Some("3/20, 4:36 PM")
        );
        assert_eq!(
            localize("2024-03-20T00:07:00", 0, TimeStyle::Short).as_deref(),
            Some("3/20, 12:07 AM")
        );
    }

    #[test]
    fn test_offset_crosses_day() {
        // UTC-7 pushes early morning back to the previous day
        assert_eq!(
            localize("2024-03-20T03:15:00", -420, TimeStyle::Compact).as_deref(),
            Some("3/19, 20:15")
        );
        assert_eq!(
            localize("2024-12-31T23:30:00", 90, TimeStyle::Short).as_deref(),
            Some("1/1, 1:00 AM")
        );
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(localize("not a date", 0, TimeStyle::Short), None);
        assert_eq!(localize("2024-03-20T16:36:00", 24 * 60, TimeStyle::Short), None);
    }

    #[test]
    fn test_uptime_after_init() {
        init_server_time();
        assert!(uptime_secs() < 60);
        assert!(unix_millis() > 0);
    }
}
