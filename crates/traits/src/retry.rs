//! Retry decorator for membership sources.

use rewind_primitives::{ChangeEvent, IndexCode, MembershipSnapshot};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{ChangeRequest, MembershipSource, SourceError};

/// Retry policy for transient source failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first timeout.
    pub max_retries: u32,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self { max_retries: 1 }
    }
}

/// Wraps a [`MembershipSource`] and retries calls that time out.
///
/// Only [`SourceError::Timeout`] is retried; every other error is returned as-is.
#[derive(Debug, Clone)]
pub struct RetryOnTimeout<S> {
    inner: S,
    config: RetryConfig,
}

impl<S> RetryOnTimeout<S> {
    /// Wrap `inner` with the default policy (one retry).
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self::with_config(inner, RetryConfig::default())
    }

    /// Wrap `inner` with an explicit policy.
    #[must_use]
    pub const fn with_config(inner: S, config: RetryConfig) -> Self {
        Self { inner, config }
    }

    /// Borrow the wrapped source.
    #[must_use]
    pub const fn inner(&self) -> &S {
        &self.inner
    }

    /// Unwrap the source.
    #[must_use]
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn call<T>(
        &self,
        operation: &str,
        mut f: impl FnMut() -> Result<T, SourceError>,
    ) -> Result<T, SourceError> {
        let mut attempt = 0;
        loop {
            match f() {
                Err(err) if err.is_transient() && attempt < self.config.max_retries => {
                    attempt += 1;
                    warn!(operation, attempt, error = %err, "source call timed out, retrying");
                }
                result => return result,
            }
        }
    }
}

impl<S: MembershipSource> MembershipSource for RetryOnTimeout<S> {
    fn current_membership(&self, index: &IndexCode) -> Result<MembershipSnapshot, SourceError> {
        self.call("current_membership", || self.inner.current_membership(index))
    }

    fn membership_changes(
        &self,
        index: &IndexCode,
        request: &ChangeRequest,
    ) -> Result<Vec<ChangeEvent>, SourceError> {
        request.validate()?;
        self.call("membership_changes", || self.inner.membership_changes(index, request))
    }
}
