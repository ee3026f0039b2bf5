//! Reconstruction configuration.

use serde::{Deserialize, Serialize};

/// What to do when a joiner is reversed for an instrument that is not a member.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingJoinerPolicy {
    /// Fail with `TimelineError::InconsistentMembership`.
    #[default]
    Error,
    /// Log a warning and continue. Only for sources that guarantee consistency.
    Skip,
}

/// Configuration for [`crate::Reconstructor`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconstructionConfig {
    /// Months to reconstruct, counting the end month. Yields `months - 1` states.
    pub months: u32,
    /// Handling of joiners that cannot be reversed.
    pub missing_joiner: MissingJoinerPolicy,
}

impl Default for ReconstructionConfig {
    fn default() -> Self {
        Self {
            months: 12 * 40, // 40 years
            missing_joiner: MissingJoinerPolicy::Error,
        }
    }
}
