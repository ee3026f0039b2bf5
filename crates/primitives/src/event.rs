//! Membership change events.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{Date, InstrumentId};

/// Direction of an index membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChangeKind {
    /// The instrument entered the index.
    Joiner,
    /// The instrument left the index.
    Leaver,
}

impl ChangeKind {
    /// Vendor label for this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Joiner => "Joiner",
            Self::Leaver => "Leaver",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A change label that is neither a joiner nor a leaver.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid event kind: {kind:?} (expected Joiner or Leaver)")]
pub struct InvalidEventKind {
    /// The label as received.
    pub kind: String,
}

impl FromStr for ChangeKind {
    type Err = InvalidEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("joiner") {
            Ok(Self::Joiner)
        } else if trimmed.eq_ignore_ascii_case("leaver") {
            Ok(Self::Leaver)
        } else {
            Err(InvalidEventKind { kind: s.to_string() })
        }
    }
}

/// One index membership mutation observed on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeEvent {
    /// Effective date of the change.
    pub date: Date,
    /// Instrument that joined or left.
    pub instrument: InstrumentId,
    /// Joiner or leaver.
    pub kind: ChangeKind,
}

impl ChangeEvent {
    /// Create a new change event.
    #[must_use]
    pub fn new(date: Date, instrument: impl Into<InstrumentId>, kind: ChangeKind) -> Self {
        Self { date, instrument: instrument.into(), kind }
    }

    /// Shorthand for a joiner event.
    #[must_use]
    pub fn joiner(date: Date, instrument: impl Into<InstrumentId>) -> Self {
        Self::new(date, instrument, ChangeKind::Joiner)
    }

    /// Shorthand for a leaver event.
    #[must_use]
    pub fn leaver(date: Date, instrument: impl Into<InstrumentId>) -> Self {
        Self::new(date, instrument, ChangeKind::Leaver)
    }
}
