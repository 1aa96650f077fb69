use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use tracing::debug;

// ── TimestampProcessor ────────────────────────────────────────────────────────

/// Unix timestamps above this magnitude are taken to be milliseconds.
const MILLIS_THRESHOLD: i64 = 100_000_000_000;

/// Parses timestamps from the variety of formats found in the exports.
pub struct TimestampProcessor;

impl TimestampProcessor {
    /// Attempt to parse a [`serde_json::Value`] into a UTC [`DateTime`].
    ///
    /// Handles:
    /// * `null`       → `None`
    /// * JSON string  → ISO 8601 / RFC 3339 (including `Z`-suffix) or common
    ///   date-time patterns; naive values are taken as UTC.
    /// * JSON number  → Unix timestamp in seconds, or milliseconds when the
    ///   magnitude only makes sense as such.
    ///
    /// Anything else, or a string that matches no format, yields `None`.
    pub fn parse(value: &Value) -> Option<DateTime<Utc>> {
        match value {
            Value::Null => None,
            Value::String(s) => Self::parse_str(s.trim()),
            Value::Number(n) => {
                if let Some(secs) = n.as_i64() {
                    if secs.abs() >= MILLIS_THRESHOLD {
                        DateTime::from_timestamp_millis(secs)
                    } else {
                        DateTime::from_timestamp(secs, 0)
                    }
                } else if let Some(f) = n.as_f64() {
                    if !f.is_finite() {
                        return None;
                    }
                    let whole = f.floor();
                    let secs = whole as i64;
                    let nanos = ((f - whole) * 1_000_000_000.0).round() as u32;
                    DateTime::from_timestamp(secs, nanos.min(999_999_999))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn parse_str(s: &str) -> Option<DateTime<Utc>> {
        if s.is_empty() {
            return None;
        }

        // Replace trailing 'Z' with '+00:00' for RFC 3339 compatibility.
        let normalised = if let Some(stripped) = s.strip_suffix('Z') {
            format!("{}+00:00", stripped)
        } else {
            s.to_string()
        };

        if let Ok(dt) = DateTime::parse_from_rfc3339(&normalised) {
            return Some(dt.with_timezone(&Utc));
        }

        // Space-separated date and time with an explicit offset.
        const OFFSET_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f%:z", "%Y-%m-%d %H:%M:%S%:z"];
        for fmt in OFFSET_FORMATS {
            if let Ok(dt) = DateTime::parse_from_str(&normalised, fmt) {
                return Some(dt.with_timezone(&Utc));
            }
        }

        const FORMATS: &[&str] = &[
            "%Y-%m-%dT%H:%M:%S%.f",
            "%Y-%m-%dT%H:%M:%S",
            "%Y-%m-%d %H:%M:%S%.f",
            "%Y-%m-%d %H:%M:%S",
            "%Y-%m-%d",
        ];

        for fmt in FORMATS {
            if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Utc.from_utc_datetime(&naive));
            }
            if let Ok(date) = chrono::NaiveDate::parse_from_str(s, fmt) {
                let naive = date.and_hms_opt(0, 0, 0)?;
                return Some(Utc.from_utc_datetime(&naive));
            }
        }

        debug!("unparsable timestamp \"{}\" coerced to null", s);
        None
    }
}

// ── ValueCoercer ──────────────────────────────────────────────────────────────

/// Lenient conversions from loosely-typed JSON values.
///
/// None of these fail: values that cannot be converted become the documented
/// default for the target type.
pub struct ValueCoercer;

impl ValueCoercer {
    /// Coerce to a non-negative integer.
    ///
    /// Integers pass through, floats are truncated, numeric strings are
    /// parsed, negatives clamp to `0`. Anything else (including `null`,
    /// booleans and non-numeric strings) is `0`.
    pub fn non_negative_int(value: Option<&Value>) -> u64 {
        let Some(value) = value else { return 0 };
        match value {
            Value::Number(n) => {
                if let Some(u) = n.as_u64() {
                    u
                } else if let Some(f) = n.as_f64() {
                    Self::float_to_u64(f)
                } else {
                    0
                }
            }
            Value::String(s) => {
                let trimmed = s.trim();
                if let Ok(u) = trimmed.parse::<u64>() {
                    u
                } else if let Ok(f) = trimmed.parse::<f64>() {
                    Self::float_to_u64(f)
                } else {
                    0
                }
            }
            _ => 0,
        }
    }

    /// Coerce to a float, or `None` when the value is not numeric.
    pub fn float(value: Option<&Value>) -> Option<f64> {
        match value? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
            _ => None,
        }
    }

    /// Render a scalar as an identifier string.
    ///
    /// Strings pass through; numbers use their JSON representation so that
    /// `7` and `"7"` resolve to the same id. `null` and compound values are
    /// `None`.
    pub fn identifier(value: Option<&Value>) -> Option<String> {
        match value? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }

    /// A string field, or `None` when absent, `null` or not a string.
    pub fn string(value: Option<&Value>) -> Option<String> {
        value.and_then(|v| v.as_str()).map(str::to_string)
    }

    fn float_to_u64(f: f64) -> u64 {
        if f.is_finite() && f > 0.0 {
            f.trunc() as u64
        } else {
            0
        }
    }
}

// ── FieldExtractor ────────────────────────────────────────────────────────────

/// Lookup helpers for records whose field names vary between producers.
pub struct FieldExtractor;

impl FieldExtractor {
    /// Return the first value among `keys` that is a string or a number,
    /// rendered as a string. Keys are checked in the given order.
    pub fn first_text(data: &Value, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match data.get(*key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
    }

    /// Return the first string value among `keys`.
    pub fn first_str<'a>(data: &'a Value, keys: &[&str]) -> Option<&'a str> {
        keys.iter().find_map(|key| data.get(*key).and_then(|v| v.as_str()))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
