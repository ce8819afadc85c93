//! The pipeline entry point.
//!
//! [`AsyncActionMiddleware`] sits in a synchronous dispatch chain: actions it
//! does not recognize as async actions are handed to the `next` continuation
//! untouched; async actions are intercepted, resolved, and settled on a
//! spawned task.
//!
//! From the pipeline's perspective an async action is fire-and-forget. The
//! boundary guard ([`settle`]) discriminates the chain's final outcome by
//! provenance: an operation failure is swallowed here (it has already been
//! communicated to the pipeline via the failure lifecycle action) while a
//! dispatch fault is surfaced, because it signals a bug in a downstream
//! listener that no lifecycle action reports.

use crate::resolve::{ActionChain, resolve};
use async_actions_core::{Action, AsyncAction, DispatchError, Dispatcher, ResolveError};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// An action entering the pipeline: either a plain action for the rest of
/// the chain, or an async action for this layer to expand.
pub enum PipelineAction<V> {
    /// A plain action, passed to the `next` continuation unchanged.
    Plain(Action<V>),
    /// An async action descriptor, intercepted and resolved.
    Async(AsyncAction<V>),
}

impl<V> From<AsyncAction<V>> for PipelineAction<V> {
    fn from(action: AsyncAction<V>) -> Self {
        Self::Async(action)
    }
}

impl<V> From<Action<V>> for PipelineAction<V> {
    fn from(action: Action<V>) -> Self {
        Self::Plain(action)
    }
}

/// Middleware that expands async actions into lifecycle action sequences.
pub struct AsyncActionMiddleware<V> {
    dispatcher: Arc<dyn Dispatcher<V>>,
}

impl<V> AsyncActionMiddleware<V>
where
    V: Clone + Send + 'static,
{
    /// Create the middleware around the pipeline's dispatch capability.
    pub fn new(dispatcher: Arc<dyn Dispatcher<V>>) -> Self {
        Self { dispatcher }
    }

    /// Handle one incoming action.
    ///
    /// Plain actions go to `next` and `None` is returned. Async actions are
    /// resolved (their start actions dispatch synchronously inside this
    /// call) and settled on a spawned task whose handle is returned; the
    /// handle yields `Err` only for pipeline faults.
    ///
    /// Retry handles are not synthesized here: descriptors are one-shot, so
    /// a caller that wants `meta.retry_action` on the emitted start and
    /// failure actions must attach a rebuild handle via
    /// [`AsyncAction::with_retry`] before dispatching.
    pub fn handle<N>(
        &self,
        action: PipelineAction<V>,
        next: N,
    ) -> Option<JoinHandle<Result<(), DispatchError>>>
    where
        N: FnOnce(Action<V>),
    {
        match action {
            PipelineAction::Plain(action) => {
                next(action);
                None
            }
            PipelineAction::Async(action) => {
                let chain = resolve(action, &self.dispatcher);
                Some(tokio::spawn(settle(chain)))
            }
        }
    }
}

/// Observe a chain's final outcome at the pipeline boundary.
///
/// Discards the resolved value. Operation failures are swallowed (already
/// reported via the failure lifecycle action); dispatch faults are logged at
/// error level and returned.
///
/// # Errors
///
/// Returns the [`DispatchError`] if the chain was rejected by a failing
/// dispatch call.
pub async fn settle<V>(chain: ActionChain<V>) -> Result<(), DispatchError> {
    match chain.await {
        Ok(_) => Ok(()),
        Err(ResolveError::Operation(error)) => {
            tracing::debug!(error = %error, "async operation failed; reported via failure action");
            Ok(())
        }
        Err(ResolveError::Dispatch(fault)) => {
            tracing::error!(error = %fault, "lifecycle dispatch failed in downstream handler");
            Err(fault)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_actions_core::OperationError;
    use anyhow::anyhow;
    use futures::FutureExt;
    use futures::future;

    #[tokio::test]
    async fn test_settle_swallows_operation_failure() {
        let error = OperationError::from(anyhow!("boom"));
        let chain: ActionChain<u32> =
            future::ready(Err(ResolveError::Operation(error))).boxed();
        assert!(settle(chain).await.is_ok());
    }

    #[tokio::test]
    async fn test_settle_surfaces_pipeline_fault() {
        let fault = DispatchError::from(anyhow!("listener broke"));
        let chain: ActionChain<u32> =
            future::ready(Err(ResolveError::Dispatch(fault))).boxed();
        assert!(settle(chain).await.is_err());
    }

    #[tokio::test]
    async fn test_settle_discards_value() {
        let chain: ActionChain<u32> = future::ready(Ok(Some(9))).boxed();
        assert!(settle(chain).await.is_ok());
    }
}
