//! Error taxonomy with dispatch provenance.
//!
//! Two kinds of failure flow through a resolution, and they must never be
//! confused:
//!
//! - [`OperationError`]: the underlying asynchronous work failed. Reported
//!   to the pipeline via a failure lifecycle action, re-raised on the
//!   internal chain so nested resolutions observe it, and swallowed at the
//!   outermost boundary (it has already been communicated).
//! - [`DispatchError`]: the dispatch capability itself failed while a
//!   lifecycle action was being emitted. Propagated unchanged, never
//!   re-reported as an operation failure, never silenced: it signals a bug
//!   in a downstream listener, not in the operation.
//!
//! [`ResolveError`] is the closed union of the two; the variant *is* the
//! provenance tag.

use std::sync::Arc;
use thiserror::Error;

/// A failure of the underlying asynchronous operation.
///
/// Wraps the opaque error behind an `Arc` so the same value can appear both
/// as the payload of the failure lifecycle action and as the rejection of
/// the returned chain.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct OperationError(Arc<anyhow::Error>);

impl OperationError {
    /// The underlying error.
    #[must_use]
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl From<anyhow::Error> for OperationError {
    fn from(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }
}

/// A failure raised by the dispatch capability while emitting a lifecycle
/// action.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct DispatchError(Arc<anyhow::Error>);

impl DispatchError {
    /// The underlying error.
    #[must_use]
    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl From<anyhow::Error> for DispatchError {
    fn from(error: anyhow::Error) -> Self {
        Self(Arc::new(error))
    }
}

/// Rejection of a resolution chain, tagged with its provenance.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// The asynchronous operation failed.
    #[error("async operation failed: {0}")]
    Operation(#[from] OperationError),

    /// Dispatching a lifecycle action failed.
    #[error("lifecycle dispatch failed: {0}")]
    Dispatch(#[from] DispatchError),
}

impl ResolveError {
    /// Whether this rejection originated in the dispatch pipeline rather
    /// than in the operation itself.
    #[must_use]
    pub const fn is_pipeline_fault(&self) -> bool {
        matches!(self, Self::Dispatch(_))
    }
}
