//! Display formatting for dashboard cells.

/// Format a floating-point number with thousands separators and a fixed number
/// of decimal places.
///
/// # Examples
///
/// ```
/// use practice_core::formatting::format_number;
///
/// assert_eq!(format_number(1234.5, 1), "1,234.5");
/// assert_eq!(format_number(0.0, 2), "0.00");
/// assert_eq!(format_number(-9876.5, 1), "-9,876.5");
/// ```
pub fn format_number(value: f64, decimals: u32) -> String {
    let negative = value < 0.0;
    let abs_value = value.abs();

    // Nudge by a relative epsilon so exact decimal midpoints round up.
    let factor = 10_f64.powi(decimals as i32);
    let epsilon = f64::EPSILON * abs_value * factor;
    let rounded = ((abs_value * factor) + epsilon).round() / factor;

    let grouped = group_thousands(&(rounded.trunc() as u64).to_string());

    let result = if decimals == 0 {
        grouped
    } else {
        let frac_str = format!("{:.prec$}", rounded.fract(), prec = decimals as usize);
        // "0.50" → ".50"
        format!("{}{}", grouped, &frac_str[1..])
    };

    if negative && rounded != 0.0 {
        format!("-{}", result)
    } else {
        result
    }
}

/// Minutes with one decimal place, the precision every minutes column uses.
///
/// ```
/// use practice_core::formatting::format_minutes;
///
/// assert_eq!(format_minutes(2.0), "2.0");
/// assert_eq!(format_minutes(1234.56), "1,234.6");
/// ```
pub fn format_minutes(minutes: f64) -> String {
    format_number(minutes, 1)
}

/// Format a duration in minutes as `"45m"`, `"3h"` or `"3h 45m"`.
///
/// ```
/// use practice_core::formatting::format_duration;
///
/// assert_eq!(format_duration(45.0), "45m");
/// assert_eq!(format_duration(225.0), "3h 45m");
/// ```
pub fn format_duration(minutes: f64) -> String {
    let total_mins = minutes.round().max(0.0) as i64;
    if total_mins < 60 {
        format!("{}m", total_mins)
    } else {
        let hours = total_mins / 60;
        let mins = total_mins % 60;
        if mins == 0 {
            format!("{}h", hours)
        } else {
            format!("{}h {}m", hours, mins)
        }
    }
}

/// A completion ratio in `[0, 1]` as a whole percentage, e.g. `0.5` → `"50%"`.
pub fn format_ratio(ratio: f64) -> String {
    format!("{}%", format_number(ratio * 100.0, 0))
}

/// Capitalise the first letter of every word: `"bass guitar"` → `"Bass Guitar"`.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let remainder = s.len() % 3;
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, c) in s.chars().enumerate() {
        if i != 0 && i % 3 == remainder {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────
