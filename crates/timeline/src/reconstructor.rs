//! Configured reconstruction entry point.

use rewind_primitives::{ChangeEvent, Date, IndexCode, MembershipSnapshot, Timeline};
use rewind_traits::{ChangeRequest, MembershipSource};
use tracing::{info, instrument};

use crate::{
    ReconstructionConfig, TimelineError,
    rewind::{history_window, rewind, validate_inputs},
};

/// Reconstructs membership timelines with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct Reconstructor {
    config: ReconstructionConfig,
}

impl Reconstructor {
    /// Create a reconstructor with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a reconstructor with the given configuration.
    #[must_use]
    pub const fn with_config(config: ReconstructionConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &ReconstructionConfig {
        &self.config
    }

    /// Reconstruct from an already loaded snapshot and change log.
    ///
    /// # Errors
    /// See [`crate::reconstruct`]. With `MissingJoinerPolicy::Skip`, joiners that
    /// cannot be reversed are logged instead of failing.
    pub fn reconstruct(
        &self,
        current: &MembershipSnapshot,
        events: &[ChangeEvent],
        end_date: Date,
    ) -> Result<Timeline, TimelineError> {
        rewind(current, events, end_date, self.config.months, self.config.missing_joiner)
    }

    /// Fetch membership and changes for `index` from `source`, then reconstruct.
    ///
    /// The change log is requested for both joiners and leavers over
    /// [`rewind_primitives::fetch_window`] of `end_date` and the configured month count.
    ///
    /// # Errors
    /// Returns `TimelineError::Source` if either fetch fails, otherwise as
    /// [`Self::reconstruct`].
    #[instrument(skip(self, source, index), fields(index = %index, months = self.config.months))]
    pub fn reconstruct_from_source<S: MembershipSource>(
        &self,
        source: &S,
        index: &IndexCode,
        end_date: Date,
    ) -> Result<Timeline, TimelineError> {
        let (start, end) = history_window(end_date, self.config.months)?;

        let current = source.current_membership(index)?;
        validate_inputs(&current, end_date, self.config.months)?;

        let events = source.membership_changes(index, &ChangeRequest::both(start, end))?;
        info!(members = current.len(), events = events.len(), %start, %end, "loaded index history");

        let timeline = self.reconstruct(&current, &events, end_date)?;
        info!(states = timeline.len(), "reconstructed timeline");
        Ok(timeline)
    }
}
