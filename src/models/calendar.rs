//! Working-day calendar.
//!
//! Site work happens Monday through Friday. Dates that land on a weekend
//! roll forward to the following Monday.
//!
//! # Precedence
//! A dependent task is scheduled on the first working day strictly after
//! the date of the scheduling unit before it.

use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Whether `date` falls on a working day.
#[inline]
pub fn is_workday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Rolls a weekend date forward to Monday; weekdays are returned unchanged.
///
/// A weekend too close to the end of the range is returned as is.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use u_sequence::models::next_workday;
///
/// let saturday = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// assert_eq!(next_workday(saturday), NaiveDate::from_ymd_opt(2024, 3, 11).unwrap());
/// ```
pub fn next_workday(date: NaiveDate) -> NaiveDate {
    let skip = match date.weekday() {
        Weekday::Sat => 2,
        Weekday::Sun => 1,
        _ => 0,
    };
    date.checked_add_days(Days::new(skip)).unwrap_or(date)
}

/// First working day strictly after `date`.
///
/// At the end of the representable range the date is returned unchanged
/// and a warning is logged.
pub fn following_workday(date: NaiveDate) -> NaiveDate {
    match date.succ_opt() {
        Some(next) => next_workday(next),
        None => {
            tracing::warn!(%date, "no working day after date, keeping it");
            date
        }
    }
}
