//! Membership source trait definitions.

use std::fmt;

use rewind_primitives::{ChangeEvent, Date, IndexCode, InvalidEventKind, MembershipSnapshot};
use serde::{Deserialize, Serialize};

/// Errors raised by a membership data source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// The vendor did not answer in time.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// A change log was requested for only one change direction.
    #[error("change log must include both joiners and leavers, got {0}")]
    PartialChangeLog(ChangeTypeFilter),

    /// Request range is inverted.
    #[error("invalid date range: start {start} is after end {end}")]
    InvalidRange {
        /// Requested start.
        start: Date,
        /// Requested end.
        end: Date,
    },

    /// The index is not known to the source.
    #[error("unknown index: {0}")]
    UnknownIndex(String),

    /// A change record carried an unrecognised label.
    #[error(transparent)]
    InvalidEventKind(#[from] InvalidEventKind),

    /// Any other backend failure.
    #[error("backend error: {0}")]
    Backend(String),
}

impl SourceError {
    /// Returns whether retrying the same request may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_))
    }
}

/// Which change directions a change-log request covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeTypeFilter {
    /// Joiners and leavers.
    #[default]
    Both,
    /// Joiners only.
    JoinersOnly,
    /// Leavers only.
    LeaversOnly,
}

impl ChangeTypeFilter {
    /// Vendor code for this filter.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Both => "B",
            Self::JoinersOnly => "J",
            Self::LeaversOnly => "L",
        }
    }
}

impl fmt::Display for ChangeTypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parameters of a change-log request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRequest {
    /// First date to include.
    pub start: Date,
    /// Last date to include.
    pub end: Date,
    /// Directions to include.
    pub change_type: ChangeTypeFilter,
}

impl ChangeRequest {
    /// Request both joiners and leavers in `[start, end]`.
    #[must_use]
    pub const fn both(start: Date, end: Date) -> Self {
        Self { start, end, change_type: ChangeTypeFilter::Both }
    }

    /// Check the request before it reaches the vendor.
    ///
    /// # Errors
    /// Returns `SourceError::PartialChangeLog` unless both directions are
    /// requested, and `SourceError::InvalidRange` if `start > end`.
    pub fn validate(&self) -> Result<(), SourceError> {
        if self.change_type != ChangeTypeFilter::Both {
            return Err(SourceError::PartialChangeLog(self.change_type));
        }
        if self.start > self.end {
            return Err(SourceError::InvalidRange { start: self.start, end: self.end });
        }
        Ok(())
    }

    /// Check whether `date` falls inside the request range (inclusive).
    #[must_use]
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Provider of current membership and membership change history.
pub trait MembershipSource {
    /// Current constituents of `index`.
    ///
    /// # Errors
    /// Returns `SourceError` if the vendor call fails.
    fn current_membership(&self, index: &IndexCode) -> Result<MembershipSnapshot, SourceError>;

    /// Joiner and leaver events for `index` within the request range.
    ///
    /// Implementations must call [`ChangeRequest::validate`] and reject
    /// one-directional requests.
    ///
    /// # Errors
    /// Returns `SourceError` if the request is invalid or the vendor call fails.
    fn membership_changes(
        &self,
        index: &IndexCode,
        request: &ChangeRequest,
    ) -> Result<Vec<ChangeEvent>, SourceError>;
}

impl<S: MembershipSource + ?Sized> MembershipSource for &S {
    fn current_membership(&self, index: &IndexCode) -> Result<MembershipSnapshot, SourceError> {
        (**self).current_membership(index)
    }

    fn membership_changes(
        &self,
        index: &IndexCode,
        request: &ChangeRequest,
    ) -> Result<Vec<ChangeEvent>, SourceError> {
        (**self).membership_changes(index, request)
    }
}
