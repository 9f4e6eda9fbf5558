// File: src/scalar.rs
// Scalar cell values and the coercion rules shared by both parsers, plus the
// day-truncated date helpers every check uses for comparisons.
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;
use std::collections::HashMap;

/// One cell of a parsed table row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Str(String),
    Num(f64),
    Date(NaiveDateTime),
    Null,
}

pub type Row = HashMap<String, Scalar>;

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Numeric view. Strings that look like numbers are parsed on the fly so
    /// callers don't depend on the coercion options the parser ran with.
    pub fn as_num(&self) -> Option<f64> {
        match self {
            Scalar::Num(n) => Some(*n),
            Scalar::Str(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Integer id view (task_id, proj_id, clndr_id...).
    pub fn as_id(&self) -> Option<i64> {
        self.as_num().map(|n| n as i64)
    }

    /// Date view, parsing string cells with the export date formats.
    pub fn as_date(&self) -> Option<NaiveDateTime> {
        match self {
            Scalar::Date(d) => Some(*d),
            Scalar::Str(s) => parse_date(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CoerceOptions {
    /// Empty cells become `Null` instead of `Str("")`.
    pub keep_empty_as_null: bool,
    pub parse_numbers: bool,
    pub parse_dates: bool,
}

impl Default for CoerceOptions {
    fn default() -> Self {
        Self {
            keep_empty_as_null: true,
            parse_numbers: true,
            parse_dates: true,
        }
    }
}

/// `^-?\d+(\.\d+)?$` without pulling in a regex engine for one pattern.
fn looks_numeric(s: &str) -> bool {
    let rest = s.strip_prefix('-').unwrap_or(s);
    if rest.is_empty() {
        return false;
    }
    match rest.split_once('.') {
        None => rest.bytes().all(|b| b.is_ascii_digit()),
        Some((int, frac)) => {
            !int.is_empty()
                && !frac.is_empty()
                && int.bytes().all(|b| b.is_ascii_digit())
                && frac.bytes().all(|b| b.is_ascii_digit())
        }
    }
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM[:SS]` and the ISO `T` separator
/// P6 XML exporters emit. Trailing timezone offsets are ignored (all export
/// timestamps are treated as wall-clock local to the schedule).
pub fn parse_date(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.len() < 10 {
        return None;
    }
    // Strip a timezone suffix if one is present ("...+05:00", "...Z").
    let s = s.strip_suffix('Z').unwrap_or(s);
    let s = match s.len() {
        n if n > 19 && (s.as_bytes()[19] == b'+' || s.as_bytes()[19] == b'-') => &s[..19],
        _ => s,
    };
    for fmt in [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

/// Turns one trimmed cell into a `Scalar` per the coercion options.
pub fn coerce(raw: &str, opts: &CoerceOptions) -> Scalar {
    let s = raw.trim();
    if s.is_empty() {
        return if opts.keep_empty_as_null {
            Scalar::Null
        } else {
            Scalar::Str(String::new())
        };
    }
    if opts.parse_numbers && looks_numeric(s) {
        if let Ok(n) = s.parse::<f64>() {
            return Scalar::Num(n);
        }
    }
    if opts.parse_dates
        && s.len() >= 10
        && s.as_bytes()[4] == b'-'
        && let Some(dt) = parse_date(s)
    {
        return Scalar::Date(dt);
    }
    Scalar::Str(s.to_string())
}

// --- DAY-TRUNCATED DATE HELPERS ---
//
// All check comparisons happen on calendar-day boundaries so that
// time-of-day noise and DST shifts in the export cannot flip a verdict.

pub fn day_of(dt: NaiveDateTime) -> NaiveDate {
    dt.date()
}

/// Whole days from `a` to `b` on day boundaries (positive when b is later).
pub fn days_between(a: NaiveDateTime, b: NaiveDateTime) -> i64 {
    (day_of(b) - day_of(a)).num_days()
}

/// Rounds a percentage to two decimals, half away from zero.
pub fn round_pct(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// `part / whole * 100`, rounded; zero denominator yields 0.0.
pub fn percent_of(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        round_pct(part as f64 * 100.0 / whole as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coerce_classifies_cells() {
        let opts = CoerceOptions::default();
        assert_eq!(coerce("  A1000 ", &opts), Scalar::Str("A1000".into()));
        assert_eq!(coerce("-12.5", &opts), Scalar::Num(-12.5));
        assert_eq!(coerce("", &opts), Scalar::Null);
        assert!(matches!(coerce("2024-01-10 08:00", &opts), Scalar::Date(_)));
        // Not numeric: trailing dot, double sign.
        assert_eq!(coerce("12.", &opts), Scalar::Str("12.".into()));
        assert_eq!(coerce("--3", &opts), Scalar::Str("--3".into()));
    }

    #[test]
    fn empty_keeps_string_when_configured() {
        let opts = CoerceOptions {
            keep_empty_as_null: false,
            ..Default::default()
        };
        assert_eq!(coerce("", &opts), Scalar::Str(String::new()));
    }

    #[test]
    fn date_formats() {
        assert!(parse_date("2024-01-10").is_some());
        assert!(parse_date("2024-01-10 17:30").is_some());
        assert!(parse_date("2024-01-10T17:30:00").is_some());
        assert!(parse_date("2024-01-10T17:30:00+05:00").is_some());
        assert!(parse_date("10/01/2024").is_none());
    }

    #[test]
    fn day_math() {
        let a = parse_date("2024-01-10 23:59").unwrap();
        let b = parse_date("2024-01-11 00:01").unwrap();
        assert_eq!(days_between(a, b), 1);
        assert_eq!(percent_of(3, 100), 3.00);
        assert_eq!(percent_of(1, 3), 33.33);
        assert_eq!(percent_of(0, 0), 0.0);
    }
}
