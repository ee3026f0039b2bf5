//! Point-in-time membership states.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{Date, InstrumentId};

/// Set of instruments in an index at one point in time.
pub type MembershipSnapshot = BTreeSet<InstrumentId>;

/// Index membership as of a normalized month end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyState {
    /// Normalized month-end date.
    pub as_of_date: Date,
    /// Members at that date.
    pub members: MembershipSnapshot,
}

impl MonthlyState {
    /// Create a new monthly state.
    #[must_use]
    pub const fn new(as_of_date: Date, members: MembershipSnapshot) -> Self {
        Self { as_of_date, members }
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Check membership of a single instrument.
    #[must_use]
    pub fn contains(&self, instrument: &str) -> bool {
        self.members.contains(instrument)
    }
}

/// Net membership change across one half-open window `(window_start, window_end]`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowChanges {
    /// Exclusive lower bound.
    pub window_start: Date,
    /// Inclusive upper bound.
    pub window_end: Date,
    /// Present at `window_end` but not at `window_start`.
    pub joined: BTreeSet<InstrumentId>,
    /// Present at `window_start` but not at `window_end`.
    pub left: BTreeSet<InstrumentId>,
}

impl WindowChanges {
    /// Diff two membership sets across a window.
    #[must_use]
    pub fn between(
        window_start: Date,
        window_end: Date,
        before: &MembershipSnapshot,
        after: &MembershipSnapshot,
    ) -> Self {
        Self {
            window_start,
            window_end,
            joined: after.difference(before).cloned().collect(),
            left: before.difference(after).cloned().collect(),
        }
    }

    /// Check if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.joined.is_empty() && self.left.is_empty()
    }

    /// Apply this window forward: add joiners, drop leavers.
    #[must_use]
    pub fn apply_forward(&self, before: &MembershipSnapshot) -> MembershipSnapshot {
        before.difference(&self.left).chain(self.joined.iter()).cloned().collect()
    }
}

/// Monthly membership history, most recent state first.
///
/// `changes()[i]` is the window ending at `states()[i].as_of_date`, i.e. the
/// transition from the next older month end into state `i`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeline {
    states: Vec<MonthlyState>,
    changes: Vec<WindowChanges>,
}

impl Timeline {
    /// Create a timeline from states and their windows.
    #[must_use]
    pub fn new(states: Vec<MonthlyState>, changes: Vec<WindowChanges>) -> Self {
        debug_assert_eq!(states.len(), changes.len());
        Self { states, changes }
    }

    /// Number of monthly states.
    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// All states, most recent first.
    #[must_use]
    pub fn states(&self) -> &[MonthlyState] {
        &self.states
    }

    /// Net change per window, aligned with [`Self::states`].
    #[must_use]
    pub fn changes(&self) -> &[WindowChanges] {
        &self.changes
    }

    /// Iterate states, most recent first.
    pub fn iter(&self) -> std::slice::Iter<'_, MonthlyState> {
        self.states.iter()
    }

    /// Most recent state.
    #[must_use]
    pub fn latest(&self) -> Option<&MonthlyState> {
        self.states.first()
    }

    /// Oldest state.
    #[must_use]
    pub fn oldest(&self) -> Option<&MonthlyState> {
        self.states.last()
    }

    /// State at an exact month-end date.
    #[must_use]
    pub fn get(&self, as_of_date: Date) -> Option<&MonthlyState> {
        self.states.iter().find(|s| s.as_of_date == as_of_date)
    }

    /// `(as_of_date, member count)` pairs, most recent first.
    #[must_use]
    pub fn member_counts(&self) -> Vec<(Date, usize)> {
        self.states.iter().map(|s| (s.as_of_date, s.len())).collect()
    }

    /// Replay the recorded windows forward from the oldest state.
    ///
    /// Returns the membership reproduced for the most recent state, or `None`
    /// for an empty timeline or one whose windows do not line up with its states.
    #[must_use]
    pub fn replay_forward(&self) -> Option<MembershipSnapshot> {
        if self.changes.len() != self.states.len() {
            return None;
        }
        let oldest = self.oldest()?;
        let (_, newer_windows) = self.changes.split_last()?;
        Some(
            newer_windows
                .iter()
                .rev()
                .fold(oldest.members.clone(), |members, window| window.apply_forward(&members)),
        )
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a MonthlyState;
    type IntoIter = std::slice::Iter<'a, MonthlyState>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
