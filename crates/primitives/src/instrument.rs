//! Instrument and index identifiers.

use std::borrow::Borrow;

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Vendor instrument identifier (a RIC), treated as an opaque string.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[serde(transparent)]
pub struct InstrumentId(pub String);

impl InstrumentId {
    /// Create a new instrument ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for InstrumentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Borrow<str> for InstrumentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// Identifier of an index, usually its constituent chain RIC (e.g. `0#.SPX`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndexCode(pub String);

impl IndexCode {
    /// Prefix marking a constituent chain.
    pub const CHAIN_PREFIX: &'static str = "0#";

    /// Create a new index code.
    #[must_use]
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Code used when requesting joiner/leaver history.
    ///
    /// Change logs are keyed by the bare index code, so the chain prefix is dropped.
    #[must_use]
    pub fn change_log_code(&self) -> &str {
        self.0.strip_prefix(Self::CHAIN_PREFIX).unwrap_or(&self.0)
    }
}

impl From<&str> for IndexCode {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn instrument_from_str() {
        let id: InstrumentId = "AAPL.OQ".into();
        assert_eq!(id.as_str(), "AAPL.OQ");
        assert_eq!(id.to_string(), "AAPL.OQ");
    }

    #[test]
    fn instrument_ordering_is_lexicographic() {
        let mut ids = vec![InstrumentId::new("MSFT.OQ"), InstrumentId::new("AAPL.OQ")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "AAPL.OQ");
    }

    #[rstest]
    #[case("0#.SPX", ".SPX")]
    #[case(".SPX", ".SPX")]
    #[case("0#.STOXX50E", ".STOXX50E")]
    #[case(".FTSE0", ".FTSE0")]
    fn change_log_code_strips_chain_prefix(#[case] code: &str, #[case] expected: &str) {
        assert_eq!(IndexCode::new(code).change_log_code(), expected);
    }
}
