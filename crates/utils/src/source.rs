//! Membership source backed by loaded frames.

use polars::prelude::DataFrame;
use rewind_primitives::{ChangeEvent, IndexCode, MembershipSnapshot};
use rewind_traits::{ChangeRequest, MembershipSource, SourceError};

use crate::{UtilsError, events_from_frame, snapshot_from_frame};

/// Serves one index's constituents and change log from memory.
#[derive(Debug, Clone)]
pub struct FrameSource {
    index: IndexCode,
    snapshot: MembershipSnapshot,
    events: Vec<ChangeEvent>,
}

impl FrameSource {
    /// Create a source from already parsed data.
    #[must_use]
    pub const fn new(
        index: IndexCode,
        snapshot: MembershipSnapshot,
        events: Vec<ChangeEvent>,
    ) -> Self {
        Self { index, snapshot, events }
    }

    /// Create a source from a constituent frame and a change-log frame.
    ///
    /// # Arguments
    /// * `index` - Index the frames describe
    /// * `constituents` - Frame with one instrument per row in `column`
    /// * `column` - Instrument column of `constituents`
    /// * `changes` - Change-log frame, see [`events_from_frame`]
    ///
    /// # Errors
    /// Returns `UtilsError` if either frame cannot be parsed.
    pub fn from_frames(
        index: IndexCode,
        constituents: &DataFrame,
        column: &str,
        changes: &DataFrame,
    ) -> Result<Self, UtilsError> {
        let snapshot = snapshot_from_frame(constituents, column)?;
        Ok(Self::new(index, snapshot, events_from_frame(changes)?))
    }

    /// Index served by this source.
    #[must_use]
    pub const fn index(&self) -> &IndexCode {
        &self.index
    }

    fn check_index(&self, index: &IndexCode) -> Result<(), SourceError> {
        if index.change_log_code() == self.index.change_log_code() {
            Ok(())
        } else {
            Err(SourceError::UnknownIndex(index.to_string()))
        }
    }
}

impl MembershipSource for FrameSource {
    fn current_membership(&self, index: &IndexCode) -> Result<MembershipSnapshot, SourceError> {
        self.check_index(index)?;
        Ok(self.snapshot.clone())
    }

    fn membership_changes(
        &self,
        index: &IndexCode,
        request: &ChangeRequest,
    ) -> Result<Vec<ChangeEvent>, SourceError> {
        request.validate()?;
        self.check_index(index)?;
        Ok(self.events.iter().filter(|e| request.contains(e.date)).cloned().collect())
    }
}
