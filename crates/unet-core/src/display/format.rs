// Number, timestamp, and placeholder formatting.

use std::fmt::Display;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

/// Placeholder for a value the server did not send.
pub const MISSING: &str = "--";

const TIMESTAMP_FORMAT: &str = "%Y/%-m/%-d %H:%M:%S";

/// The value, or `--` when absent or empty.
pub fn dash(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => MISSING,
    }
}

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Thousands-grouped integer: `1234567` → `1,234,567`.
pub fn grouped_int(value: i64) -> String {
    let digits = group_digits(&value.unsigned_abs().to_string());
    if value < 0 { format!("-{digits}") } else { digits }
}

/// Thousands-grouped number with at most three fraction digits and no
/// trailing zeros: `1280.5` → `1,280.5`, `42.0` → `42`.
pub fn grouped(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let fixed = format!("{:.3}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let mut out = group_digits(int_part);
    if !frac.is_empty() {
        out.push('.');
        out.push_str(frac);
    }
    if value < 0.0 && out.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.insert(0, '-');
    }
    out
}

/// One decimal place.
pub fn fixed1(value: f64) -> String {
    format!("{value:.1}")
}

pub fn opt_fixed1(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_owned(), fixed1)
}

/// `72` → `72%`.
pub fn percent(value: Option<i64>) -> String {
    value.map_or_else(|| MISSING.to_owned(), |v| format!("{v}%"))
}

/// Server timestamp in local time as `YYYY/M/D HH:MM:SS`.
///
/// Missing or empty values render as `--`; values that do not parse are
/// shown unchanged.
pub fn timestamp(value: Option<&str>) -> String {
    match value {
        Some(v) if !v.is_empty() => timestamp_in(v, &Local),
        _ => MISSING.to_owned(),
    }
}

/// [`timestamp`] against an explicit zone.
pub fn timestamp_in<Tz>(value: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return dt.with_timezone(tz).format(TIMESTAMP_FORMAT).to_string();
    }
    // Offset-less timestamps are wall-clock time in the viewer's zone.
    if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
            return dt.format(TIMESTAMP_FORMAT).to_string();
        }
    }
    value.to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{FixedOffset, Utc};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn grouping_of_large_counters() {
        assert_eq!(grouped_int(1_234_567), "1,234,567");
        assert_eq!(grouped_int(999), "999");
        assert_eq!(grouped_int(1000), "1,000");
        assert_eq!(grouped_int(0), "0");
        assert_eq!(grouped_int(-45_000), "-45,000");
    }

    #[test]
    fn grouping_of_fractional_values() {
        assert_eq!(grouped(1_234_567.0), "1,234,567");
        assert_eq!(grouped(1280.5), "1,280.5");
        assert_eq!(grouped(342.7), "342.7");
        assert_eq!(grouped(0.12345), "0.123");
        assert_eq!(grouped(-0.0001), "0");
        assert_eq!(grouped(-2500.25), "-2,500.25");
    }

    #[test]
    fn missing_values_are_dashes() {
        assert_eq!(dash(None), "--");
        assert_eq!(dash(Some("")), "--");
        assert_eq!(dash(Some("PA66")), "PA66");
        assert_eq!(opt_fixed1(None), "--");
        assert_eq!(percent(None), "--");
    }

    #[test]
    fn fixed_decimals() {
        assert_eq!(fixed1(78.26), "78.3");
        assert_eq!(fixed1(0.0), "0.0");
        assert_eq!(percent(Some(64)), "64%");
    }

    #[test]
    fn rfc3339_is_shown_in_the_given_zone() {
        let shanghai = FixedOffset::east_opt(8 * 3600).unwrap();
        assert_eq!(
            timestamp_in("2024-06-15T10:30:00Z", &shanghai),
            "2024/6/15 18:30:00"
        );
        assert_eq!(
            timestamp_in("2024-06-15T10:30:00+00:00", &Utc),
            "2024/6/15 10:30:00"
        );
    }

    #[test]
    fn naive_timestamps_are_local_wall_clock() {
        assert_eq!(
            timestamp_in("2024-01-05T07:08:09.123456", &Utc),
            "2024/1/5 07:08:09"
        );
    }

    #[test]
    fn unparseable_timestamps_pass_through() {
        assert_eq!(timestamp_in("yesterday", &Utc), "yesterday");
        assert_eq!(timestamp(None), "--");
        assert_eq!(timestamp(Some("")), "--");
    }
}
