//! Relative and absolute date expressions.
//!
//! Date and datetime rules are written as expressions rather than fixed
//! timestamps so generated data stays anchored to the time of the run:
//!
//! - Keywords (case-insensitive): `NOW`, `NOW_DATETIME`, `TODAY`,
//!   `CURRENT_YEAR` (January 1st of the current year, midnight)
//! - Absolute ISO 8601 dates and datetimes: `2023-01-01`, `2023-01-01T10:30:00`,
//!   `2023-01-01T10:30:00Z`
//! - Relative offsets: `[base]<+|-><n><Y|M|D|H>`, where `base` is a keyword or
//!   an absolute date and defaults to now: `-2Y`, `NOW-6M`, `2023-01-01+3M`
//!
//! A trailing `_DATE` or `_DATETIME` suffix is ignored (`-3Y_DATETIME` is `-3Y`).
//!
//! Month arithmetic clamps the day to the last day of the resulting month.
//! Year arithmetic that lands on February 29th of a non-leap year is an
//! error; [`DateResolver::resolve`] turns every error into "now" with a
//! warning so generation is never interrupted by a malformed expression.

use chrono::{Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use tracing::warn;

/// Error type for date expression parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DateExprError {
    /// The expression matches no supported form
    #[error("Unrecognized date expression: '{0}'")]
    Unrecognized(String),

    /// The base of a relative expression could not be parsed
    #[error("Invalid base '{base}' in relative date expression '{expr}'")]
    InvalidBase { expr: String, base: String },

    /// The offset produces a date that does not exist or overflows
    #[error("Date expression '{expr}' is out of range from base {base}")]
    OutOfRange { expr: String, base: NaiveDateTime },
}

/// A resolved point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Temporal {
    /// Day granularity
    Date(NaiveDate),
    /// Full date and time
    DateTime(NaiveDateTime),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Day,
    Hour,
}

impl Unit {
    fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_uppercase() {
            'Y' => Some(Unit::Year),
            'M' => Some(Unit::Month),
            'D' => Some(Unit::Day),
            'H' => Some(Unit::Hour),
            _ => None,
        }
    }
}

/// A parsed `[base]<sign><n><unit>` expression.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RelativeExpr<'a> {
    base: Option<&'a str>,
    amount: i64,
    unit: Unit,
}

/// Resolves date expressions against a reference instant.
///
/// The reference instant is the wall clock (UTC) unless pinned with
/// [`DateResolver::pinned`], which makes resolution reproducible.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateResolver {
    pinned_now: Option<NaiveDateTime>,
}

impl DateResolver {
    /// Create a resolver that reads the local wall clock.
    ///
    /// `NOW` and `TODAY` are local time, so `TODAY` follows the machine's
    /// calendar day rather than the UTC one.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a resolver whose "now" is fixed.
    pub fn pinned(now: NaiveDateTime) -> Self {
        Self {
            pinned_now: Some(now),
        }
    }

    /// The reference instant.
    pub fn now(&self) -> NaiveDateTime {
        self.pinned_now.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Resolve an expression, never failing.
    ///
    /// Unparseable expressions resolve to the current date or datetime and log
    /// a warning. A relative expression with an unparseable base is applied to
    /// the current instant instead.
    pub fn resolve(&self, expr: &str, want_datetime: bool) -> Temporal {
        let now = self.now();
        let resolved = match self.resolve_at(expr, now, true) {
            Ok(dt) => dt,
            Err(e) => {
                warn!(
                    "{}. Returning current {}.",
                    e,
                    if want_datetime { "datetime" } else { "date" }
                );
                now
            }
        };
        if want_datetime {
            Temporal::DateTime(resolved)
        } else {
            Temporal::Date(resolved.date())
        }
    }

    /// Resolve an expression to a date, never failing.
    pub fn resolve_date(&self, expr: &str) -> NaiveDate {
        match self.resolve(expr, false) {
            Temporal::Date(d) => d,
            Temporal::DateTime(dt) => dt.date(),
        }
    }

    /// Resolve an expression to a datetime, never failing.
    pub fn resolve_datetime(&self, expr: &str) -> NaiveDateTime {
        match self.resolve(expr, true) {
            Temporal::DateTime(dt) => dt,
            Temporal::Date(d) => d.and_time(NaiveTime::MIN),
        }
    }

    /// Resolve an expression, reporting every failure.
    pub fn try_resolve(&self, expr: &str) -> Result<NaiveDateTime, DateExprError> {
        self.resolve_at(expr, self.now(), false)
    }

    fn resolve_at(
        &self,
        expr: &str,
        now: NaiveDateTime,
        lenient_base: bool,
    ) -> Result<NaiveDateTime, DateExprError> {
        let cleaned = strip_type_suffix(expr.trim());

        if let Some(dt) = resolve_keyword(cleaned, now) {
            return Ok(dt);
        }

        if let Some(relative) = parse_relative(cleaned) {
            let base = match relative.base {
                None => now,
                Some(base_expr) => match self.resolve_at(base_expr, now, false) {
                    Ok(base) => base,
                    Err(_) if lenient_base => {
                        warn!(
                            "Could not parse base '{}' in relative date '{}'. Using current datetime as base.",
                            base_expr, cleaned
                        );
                        now
                    }
                    Err(_) => {
                        return Err(DateExprError::InvalidBase {
                            expr: expr.to_string(),
                            base: base_expr.to_string(),
                        })
                    }
                },
            };
            return apply_offset(base, relative.amount, relative.unit).ok_or_else(|| {
                DateExprError::OutOfRange {
                    expr: expr.to_string(),
                    base,
                }
            });
        }

        parse_iso(cleaned).ok_or_else(|| DateExprError::Unrecognized(expr.to_string()))
    }
}

/// Strip a trailing `_DATETIME` or `_DATE` suffix (case-insensitive).
fn strip_type_suffix(s: &str) -> &str {
    for suffix in ["_DATETIME", "_DATE"] {
        if s.len() >= suffix.len() {
            let split = s.len() - suffix.len();
            if s.is_char_boundary(split) && s[split..].eq_ignore_ascii_case(suffix) {
                return &s[..split];
            }
        }
    }
    s
}

fn resolve_keyword(s: &str, now: NaiveDateTime) -> Option<NaiveDateTime> {
    match s.to_ascii_uppercase().as_str() {
        "NOW" | "NOW_DATETIME" | "TODAY" => Some(now),
        "CURRENT_YEAR" => {
            NaiveDate::from_ymd_opt(now.year(), 1, 1).map(|d| d.and_time(NaiveTime::MIN))
        }
        _ => None,
    }
}

/// Split `[base]<sign><digits><unit>` from the right.
fn parse_relative(s: &str) -> Option<RelativeExpr<'_>> {
    let s = s.trim_end();
    let unit_char = s.chars().last()?;
    let unit = Unit::from_char(unit_char)?;

    let rest = s[..s.len() - unit_char.len_utf8()].trim_end();
    let digits_start = rest
        .char_indices()
        .rev()
        .find(|(_, c)| !c.is_ascii_digit())
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let digits = &rest[digits_start..];
    if digits.is_empty() {
        return None;
    }
    let magnitude: i64 = digits.parse().ok()?;

    let before = rest[..digits_start].trim_end();
    let sign = before.chars().last()?;
    let amount = match sign {
        '+' => magnitude,
        '-' => -magnitude,
        _ => return None,
    };

    let base = before[..before.len() - sign.len_utf8()].trim();
    Some(RelativeExpr {
        base: if base.is_empty() { None } else { Some(base) },
        amount,
        unit,
    })
}

fn apply_offset(base: NaiveDateTime, amount: i64, unit: Unit) -> Option<NaiveDateTime> {
    match unit {
        Unit::Year => {
            let year = i32::try_from(i64::from(base.year()).checked_add(amount)?).ok()?;
            base.with_year(year)
        }
        Unit::Month => add_months(base, amount),
        Unit::Day => base.checked_add_signed(TimeDelta::try_days(amount)?),
        Unit::Hour => base.checked_add_signed(TimeDelta::try_hours(amount)?),
    }
}

/// Add calendar months, clamping the day to the end of the target month.
fn add_months(base: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    let total = i64::from(base.year())
        .checked_mul(12)?
        .checked_add(i64::from(base.month0()))?
        .checked_add(months)?;
    let year = i32::try_from(total.div_euclid(12)).ok()?;
    let month = u32::try_from(total.rem_euclid(12)).ok()? + 1;
    let day = base.day().min(days_in_month(year, month)?);
    NaiveDate::from_ymd_opt(year, month, day).map(|d| d.and_time(base.time()))
}

fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|d| d.day())
}

/// Parse an absolute ISO 8601 date or datetime.
fn parse_iso(s: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }

    let naive = s.strip_suffix(['Z', 'z']).unwrap_or(s);
    for format in [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(dt);
        }
    }

    NaiveDate::parse_from_str(naive, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn pinned() -> DateResolver {
        DateResolver::pinned(date(2024, 3, 15).and_hms_opt(10, 30, 0).unwrap())
    }

    #[test]
    fn test_now_as_date_is_today() {
        let resolver = pinned();
        assert_eq!(resolver.resolve_date("NOW"), date(2024, 3, 15));
        assert_eq!(resolver.resolve_date("today"), date(2024, 3, 15));

        let wall_clock = DateResolver::new();
        let today = Local::now().date_naive();
        let resolved = wall_clock.resolve_date("NOW");
        // Allow for the run crossing midnight.
        assert!(resolved == today || resolved == today.succ_opt().unwrap());
    }

    #[test]
    fn test_wall_clock_is_local_time() {
        let before = Local::now().naive_local();
        let now = DateResolver::new().now();
        let after = Local::now().naive_local();
        assert!(before <= now && now <= after);
    }

    #[test]
    fn test_keywords_as_datetime() {
        let resolver = pinned();
        assert_eq!(
            resolver.resolve_datetime("NOW_DATETIME"),
            date(2024, 3, 15).and_hms_opt(10, 30, 0).unwrap()
        );
        assert_eq!(
            resolver.resolve_datetime("current_year"),
            date(2024, 1, 1).and_hms_opt(0, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_relative_year_against_pinned_base() {
        let resolver = pinned();
        assert_eq!(resolver.resolve_date("-1Y"), date(2023, 3, 15));
        assert_eq!(resolver.resolve_date("NOW-2Y"), date(2022, 3, 15));
        assert_eq!(resolver.resolve_date("2024-03-15-1Y"), date(2023, 3, 15));
    }

    #[test]
    fn test_month_arithmetic_clamps_to_month_end() {
        let resolver = pinned();
        assert_eq!(resolver.resolve_date("2024-01-31+1M"), date(2024, 2, 29));
        assert_eq!(resolver.resolve_date("2023-01-31+1M"), date(2023, 2, 28));
        assert_eq!(resolver.resolve_date("2024-03-31-1M"), date(2024, 2, 29));
        assert_eq!(resolver.resolve_date("2023-01-01+3M"), date(2023, 4, 1));
        assert_eq!(resolver.resolve_date("2023-11-15+14M"), date(2025, 1, 15));
        assert_eq!(resolver.resolve_date("2023-02-15-14M"), date(2021, 12, 15));
    }

    #[test]
    fn test_day_and_hour_offsets() {
        let resolver = pinned();
        assert_eq!(resolver.resolve_date("+10D"), date(2024, 3, 25));
        assert_eq!(
            resolver.resolve_datetime("2024-03-15T22:00:00+5H"),
            date(2024, 3, 16).and_hms_opt(3, 0, 0).unwrap()
        );
        assert_eq!(resolver.resolve_date("TODAY - 15 d"), date(2024, 2, 29));
    }

    #[test]
    fn test_suffix_is_stripped() {
        let resolver = pinned();
        assert_eq!(resolver.resolve_date("-3Y_DATETIME"), date(2021, 3, 15));
        assert_eq!(resolver.resolve_date("2020-06-01_date"), date(2020, 6, 1));
        assert_eq!(resolver.resolve_date("NOW_DATE"), date(2024, 3, 15));
    }

    #[test]
    fn test_absolute_iso_forms() {
        let resolver = pinned();
        assert_eq!(
            resolver.resolve_datetime("2023-07-04T08:15:30"),
            date(2023, 7, 4).and_hms_opt(8, 15, 30).unwrap()
        );
        assert_eq!(
            resolver.resolve_datetime("2023-07-04T08:15:30Z"),
            date(2023, 7, 4).and_hms_opt(8, 15, 30).unwrap()
        );
        assert_eq!(resolver.resolve_date("2023-07-04T23:59:00"), date(2023, 7, 4));
    }

    #[test]
    fn test_leap_day_year_offset_falls_back_to_now() {
        let resolver = pinned();
        assert!(matches!(
            resolver.try_resolve("2024-02-29+1Y"),
            Err(DateExprError::OutOfRange { .. })
        ));
        assert_eq!(resolver.resolve_date("2024-02-29+1Y"), date(2024, 3, 15));
        assert_eq!(resolver.resolve_date("2024-02-29+4Y"), date(2028, 2, 29));
    }

    #[test]
    fn test_unparseable_expression_falls_back_to_now() {
        let resolver = pinned();
        assert!(matches!(
            resolver.try_resolve("next tuesday"),
            Err(DateExprError::Unrecognized(_))
        ));
        assert_eq!(resolver.resolve_date("next tuesday"), date(2024, 3, 15));
        assert_eq!(
            resolver.resolve("garbage", true),
            Temporal::DateTime(date(2024, 3, 15).and_hms_opt(10, 30, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_base_is_lenient_only_in_resolve() {
        let resolver = pinned();
        assert!(matches!(
            resolver.try_resolve("2023-13-45+1D"),
            Err(DateExprError::InvalidBase { .. })
        ));
        assert_eq!(resolver.resolve_date("2023-13-45+1D"), date(2024, 3, 16));
    }

    #[test]
    fn test_parse_relative_shapes() {
        assert_eq!(
            parse_relative("2023-01-01+3M"),
            Some(RelativeExpr {
                base: Some("2023-01-01"),
                amount: 3,
                unit: Unit::Month
            })
        );
        assert_eq!(
            parse_relative("-2y"),
            Some(RelativeExpr {
                base: None,
                amount: -2,
                unit: Unit::Year
            })
        );
        assert_eq!(parse_relative("2023-01-01"), None);
        assert_eq!(parse_relative("3D"), None);
        assert_eq!(parse_relative("D"), None);
    }
}
