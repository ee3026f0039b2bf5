//! Month-end calendar helpers.
//!
//! Month ends are normalized so that the 31st becomes the 30th. February keeps
//! its real last day (28th or 29th).

use chrono::{Datelike, Months};

use crate::Date;

/// Last day of the month containing `date`, with the 31st rounded down to the 30th.
#[must_use]
pub fn month_end(date: Date) -> Date {
    let last = last_day_of_month(date);
    if last.day() == 31 { last.pred_opt().unwrap_or(last) } else { last }
}

/// Normalized month end of the calendar month before `date`.
///
/// Subtraction clamps the day, so `2024-03-30` maps to `2024-02-29`. Returns
/// `None` when the previous month is before the first representable date.
#[must_use]
pub fn previous_month_end(date: Date) -> Option<Date> {
    date.checked_sub_months(Months::new(1)).map(month_end)
}

/// Date range a change log must cover to rewind `n_months` from `end_date`.
///
/// Returns `(start, end)` with `start = month_end(end_date - (n_months + 1) months)`,
/// or `None` if `start` falls outside the calendar.
#[must_use]
pub fn fetch_window(end_date: Date, n_months: u32) -> Option<(Date, Date)> {
    let back = Months::new(n_months.checked_add(1)?);
    let start = end_date.checked_sub_months(back)?;
    Some((month_end(start), end_date))
}

fn last_day_of_month(date: Date) -> Date {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(Date::MAX)
}
