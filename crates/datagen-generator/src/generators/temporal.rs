//! Date and datetime value generators.

use chrono::{Days, NaiveDate, NaiveDateTime, TimeDelta};
use rand::Rng;

/// Generate a random date in the given window (inclusive, day granularity).
///
/// Inverted windows are swapped.
pub fn generate_date_between<R: Rng>(rng: &mut R, start: NaiveDate, end: NaiveDate) -> NaiveDate {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let span = u64::try_from((end - start).num_days()).unwrap_or(0);
    let offset = rng.gen_range(0..=span);
    start.checked_add_days(Days::new(offset)).unwrap_or(end)
}

/// Generate a random datetime in the given window (inclusive).
///
/// Offsets are drawn uniformly at microsecond granularity; windows too long
/// to count in microseconds fall back to whole seconds.
pub fn generate_datetime_between<R: Rng>(
    rng: &mut R,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> NaiveDateTime {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    let span = end - start;

    let offset = match span.num_microseconds() {
        Some(micros) => TimeDelta::microseconds(rng.gen_range(0..=micros)),
        None => TimeDelta::try_seconds(rng.gen_range(0..=span.num_seconds()))
            .unwrap_or(TimeDelta::zero()),
    };
    start.checked_add_signed(offset).unwrap_or(end)
}
