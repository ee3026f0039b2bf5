//! Conversions between polars frames and membership types.

use chrono::Datelike;
use polars::prelude::*;
use rewind_primitives::{ChangeEvent, ChangeKind, Date, MembershipSnapshot, Timeline};
use tracing::debug;

use crate::UtilsError;

/// Change-log date column.
pub const DATE_COL: &str = "Date";
/// Change-log direction column (`Joiner` / `Leaver`).
pub const CHANGE_COL: &str = "Change";
/// Instrument column in constituent and change-log frames.
pub const CONSTITUENT_COL: &str = "Constituent RIC";

/// Days from 0001-01-01 to 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Collect the non-null instrument ids of `column` into a snapshot.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if the column is absent, or a polars
/// error if it is not a string column.
pub fn snapshot_from_frame(df: &DataFrame, column: &str) -> Result<MembershipSnapshot, UtilsError> {
    require_columns(df, &[column])?;
    let ids = df.column(column)?.str()?;
    Ok(ids.into_iter().flatten().map(Into::into).collect())
}

/// Parse a change-log frame into events.
///
/// Rows with a null instrument are skipped. The date column may be a polars
/// `Date` or an ISO-8601 string.
///
/// # Errors
/// Returns `UtilsError::MissingColumn` if a required column is absent,
/// `UtilsError::NullValue` for a null date or change label, and
/// `UtilsError::InvalidEventKind` for a label other than `Joiner`/`Leaver`.
pub fn events_from_frame(df: &DataFrame) -> Result<Vec<ChangeEvent>, UtilsError> {
    require_columns(df, &[DATE_COL, CHANGE_COL, CONSTITUENT_COL])?;

    let days = df.column(DATE_COL)?.cast(&DataType::Date)?.cast(&DataType::Int32)?;
    let days = days.i32()?;
    let kinds = df.column(CHANGE_COL)?.str()?;
    let ids = df.column(CONSTITUENT_COL)?.str()?;

    let mut events = Vec::with_capacity(df.height());
    let mut skipped = 0usize;
    for (row, ((day, kind), id)) in days.into_iter().zip(kinds).zip(ids).enumerate() {
        let Some(id) = id else {
            skipped += 1;
            continue;
        };
        let day = day.ok_or_else(|| null_value(DATE_COL, row))?;
        let kind = kind.ok_or_else(|| null_value(CHANGE_COL, row))?;
        events.push(ChangeEvent::new(date_from_epoch_days(day)?, id, kind.parse::<ChangeKind>()?));
    }

    if skipped > 0 {
        debug!(skipped, "skipped change rows without an instrument");
    }
    Ok(events)
}

/// Render a timeline as `| date | num_companies | constituents |`, most recent first.
///
/// # Errors
/// Returns a polars error if the frame cannot be assembled.
pub fn timeline_to_frame(timeline: &Timeline) -> Result<DataFrame, UtilsError> {
    let days: Vec<i32> = timeline.iter().map(|s| epoch_days(s.as_of_date)).collect();
    let counts: Vec<u64> = timeline.iter().map(|s| s.len() as u64).collect();
    let constituents: Vec<Series> = timeline
        .iter()
        .map(|s| {
            let ids: Vec<&str> = s.members.iter().map(|m| m.as_str()).collect();
            Series::new("".into(), ids)
        })
        .collect();

    let constituents = if constituents.is_empty() {
        Series::new_empty("constituents".into(), &DataType::List(Box::new(DataType::String)))
            .into_column()
    } else {
        Column::new("constituents".into(), constituents)
    };

    let df = DataFrame::new(vec![
        Column::new("date".into(), days).cast(&DataType::Date)?,
        Column::new("num_companies".into(), counts),
        constituents,
    ])?;
    Ok(df)
}

fn require_columns(df: &DataFrame, columns: &[&str]) -> Result<(), UtilsError> {
    match columns.iter().find(|&&c| df.get_column_index(c).is_none()) {
        Some(missing) => Err(UtilsError::MissingColumn((*missing).to_string())),
        None => Ok(()),
    }
}

fn null_value(column: &str, row: usize) -> UtilsError {
    UtilsError::NullValue { column: column.to_string(), row }
}

fn date_from_epoch_days(days: i32) -> Result<Date, UtilsError> {
    days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)
        .and_then(Date::from_num_days_from_ce_opt)
        .ok_or(UtilsError::InvalidDate(days))
}

fn epoch_days(date: Date) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}
