use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::warn;

// ── System timezone detection ─────────────────────────────────────────────────

/// Detect the IANA timezone name of the running system.
///
/// Falls back to `"UTC"` if detection fails.
pub fn get_system_timezone() -> String {
    iana_time_zone::get_timezone().unwrap_or_else(|_| "UTC".to_string())
}

/// Resolve the `"auto"` sentinel to the system timezone; other values pass
/// through unchanged.
pub fn resolve_timezone(name: &str) -> String {
    if name.eq_ignore_ascii_case("auto") {
        get_system_timezone()
    } else {
        name.to_string()
    }
}

// ── TimezoneHandler ───────────────────────────────────────────────────────────

/// Converts UTC timestamps into the display timezone.
///
/// All stored timestamps are UTC; this type only exists at the presentation
/// edge.
#[derive(Debug, Clone)]
pub struct TimezoneHandler {
    display_tz: Tz,
}

impl TimezoneHandler {
    /// Create a handler for the given IANA timezone name.
    ///
    /// Unrecognised names fall back to UTC with a warning.
    pub fn new(tz_name: &str) -> Self {
        let tz = tz_name.parse::<Tz>().unwrap_or_else(|_| {
            warn!(
                "TimezoneHandler: unrecognised timezone \"{}\", falling back to UTC",
                tz_name
            );
            Tz::UTC
        });
        Self { display_tz: tz }
    }

    /// Validate that `tz_name` is a recognised IANA timezone identifier.
    pub fn validate_timezone(tz_name: &str) -> bool {
        tz_name.parse::<Tz>().is_ok()
    }

    /// Convert a UTC timestamp into the display timezone.
    pub fn to_local(&self, dt: DateTime<Utc>) -> DateTime<Tz> {
        dt.with_timezone(&self.display_tz)
    }

    /// Format an optional timestamp as `YYYY-MM-DD HH:MM` in the display
    /// timezone, or `"n/a"` for a null timestamp.
    pub fn format_datetime(&self, dt: Option<DateTime<Utc>>) -> String {
        match dt {
            Some(dt) => self.to_local(dt).format("%Y-%m-%d %H:%M").to_string(),
            None => "n/a".to_string(),
        }
    }

    /// Format an optional timestamp as a calendar date in the display
    /// timezone.
    pub fn format_date(&self, dt: Option<DateTime<Utc>>) -> String {
        match dt {
            Some(dt) => self.to_local(dt).format("%Y-%m-%d").to_string(),
            None => "n/a".to_string(),
        }
    }

    /// Expose the configured display timezone.
    pub fn display_tz(&self) -> Tz {
        self.display_tz
    }
}

impl Default for TimezoneHandler {
    fn default() -> Self {
        Self { display_tz: Tz::UTC }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    #[test]
    fn test_resolve_timezone_passthrough() {
        assert_eq!(resolve_timezone("Europe/Berlin"), "Europe/Berlin");
    }

    #[test]
    fn test_resolve_timezone_auto_is_not_auto() {
        let tz = resolve_timezone("auto");
        assert!(!tz.is_empty());
        assert_ne!(tz, "auto");
    }

    #[test]
    fn test_unknown_timezone_falls_back_to_utc() {
        let handler = TimezoneHandler::new("Mars/Olympus_Mons");
        assert_eq!(handler.display_tz(), Tz::UTC);
    }

    #[test]
    fn test_validate_timezone() {
        assert!(TimezoneHandler::validate_timezone("America/New_York"));
        assert!(!TimezoneHandler::validate_timezone("Nowhere/Special"));
    }

    #[test]
    fn test_format_datetime_in_display_zone() {
        let handler = TimezoneHandler::new("Europe/Helsinki");
        let formatted = handler.format_datetime(Some(utc("2024-01-15T10:00:00Z")));
        assert_eq!(formatted, "2024-01-15 12:00");
    }

    #[test]
    fn test_format_null_timestamp() {
        let handler = TimezoneHandler::default();
        assert_eq!(handler.format_datetime(None), "n/a");
        assert_eq!(handler.format_date(None), "n/a");
    }

    #[test]
    fn test_format_date_crosses_midnight() {
        let handler = TimezoneHandler::new("Asia/Tokyo");
        let formatted = handler.format_date(Some(utc("2024-01-15T20:00:00Z")));
        assert_eq!(formatted, "2024-01-16");
    }
}
