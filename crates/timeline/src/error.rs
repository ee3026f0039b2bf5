//! Error types for timeline reconstruction.

use rewind_primitives::{Date, InstrumentId, InvalidEventKind};
use rewind_traits::SourceError;

/// Errors that can occur while reconstructing a membership timeline.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// Fewer than one month requested.
    #[error("invalid month count: {0} (must be at least 1)")]
    InvalidMonths(u32),

    /// Requested history reaches before the first representable date.
    #[error("{n_months} months before {end_date} is outside the supported calendar")]
    DateOutOfRange {
        /// Most recent date of the request.
        end_date: Date,
        /// Requested month count.
        n_months: u32,
    },

    /// No current members but history was requested.
    #[error("empty membership snapshot with {n_months} months of history requested")]
    EmptySnapshot {
        /// Requested month count.
        n_months: u32,
    },

    /// An event kind that is neither joiner nor leaver.
    #[error(transparent)]
    InvalidEventKind(#[from] InvalidEventKind),

    /// A joiner was reversed for an instrument that was not a member.
    #[error(
        "inconsistent membership in window ({window_start}, {window_end}]: joiner {instrument} is not a member"
    )]
    InconsistentMembership {
        /// Exclusive lower bound of the window.
        window_start: Date,
        /// Inclusive upper bound of the window.
        window_end: Date,
        /// Instrument whose joiner could not be reversed.
        instrument: InstrumentId,
    },

    /// Data source failure.
    #[error("source error: {0}")]
    Source(SourceError),
}

impl From<SourceError> for TimelineError {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::InvalidEventKind(kind) => Self::InvalidEventKind(kind),
            other => Self::Source(other),
        }
    }
}

impl TimelineError {
    /// Returns whether this error is recoverable.
    ///
    /// Only transient source failures are; every other variant is a data problem.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Source(err) if err.is_transient())
    }
}
