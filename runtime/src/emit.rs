//! Lifecycle emission: instrumenting a chain with start and terminal
//! actions.
//!
//! [`instrument`] is a pass-through with instrumentation, not a
//! transformation: the returned chain settles with exactly the value or
//! error of the input chain, while dispatching the start action before the
//! work begins and exactly one terminal action when it settles.
//!
//! Both dispatch calls are guarded for provenance: if the dispatch
//! capability itself fails, the resulting [`DispatchError`] supersedes the
//! operation's outcome on the returned chain. A rejection that is *already*
//! a dispatch fault (raised by a nested resolution's emitter) passes through
//! untouched: no failure action is dispatched for it, which is what keeps a
//! broken downstream listener from being re-reported as a failed operation
//! at every nesting level.

use crate::resolve::ActionChain;
use async_actions_core::{Action, DispatchError, Dispatcher, LifecycleTypes, ResolveError, RetryHandle};
use futures::FutureExt;
use futures::future;
use std::sync::Arc;

/// Instrument a resolution chain with lifecycle actions for one descriptor.
///
/// Dispatches the start action synchronously, before returning. The start
/// carries `meta.async_start = true` and the retry handle; the terminal
/// carries `meta.resolves` equal to the start identifier, and failure
/// actions additionally carry the error payload and the retry handle.
///
/// If the start dispatch fails, the underlying chain is dropped unpolled and
/// the returned chain rejects immediately with the dispatch fault.
pub fn instrument<V>(
    chain: ActionChain<V>,
    types: LifecycleTypes,
    dispatcher: Arc<dyn Dispatcher<V>>,
    retry: Option<RetryHandle<V>>,
) -> ActionChain<V>
where
    V: Clone + Send + 'static,
{
    if let Err(error) = dispatcher.dispatch(Action::started(&types, retry.clone())) {
        let fault = DispatchError::from(error);
        tracing::error!(start = %types.start, error = %fault, "start dispatch failed");
        return future::ready(Err(ResolveError::Dispatch(fault))).boxed();
    }
    tracing::debug!(start = %types.start, "async operation started");

    Box::pin(async move {
        match chain.await {
            Ok(value) => {
                dispatcher
                    .dispatch(Action::succeeded(&types, value.clone()))
                    .map_err(|error| ResolveError::Dispatch(DispatchError::from(error)))?;
                tracing::debug!(success = %types.success, "async operation succeeded");
                Ok(value)
            }
            Err(ResolveError::Operation(error)) => {
                dispatcher
                    .dispatch(Action::failed(&types, error.clone(), retry))
                    .map_err(|error| ResolveError::Dispatch(DispatchError::from(error)))?;
                tracing::debug!(failure = %types.failure, error = %error, "async operation failed");
                Err(ResolveError::Operation(error))
            }
            // Already pipeline-caused: re-raise unchanged, emit nothing.
            Err(fault @ ResolveError::Dispatch(_)) => Err(fault),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_actions_core::OperationError;
    use anyhow::anyhow;
    use std::sync::Mutex;

    fn triple() -> LifecycleTypes {
        LifecycleTypes::new("E_START", "E_OK", "E_FAIL")
    }

    fn recorder() -> Arc<dyn Dispatcher<u32>> {
        Arc::new(|_: Action<u32>| -> anyhow::Result<()> { Ok(()) })
    }

    #[tokio::test]
    async fn test_pass_through_value() {
        let chain: ActionChain<u32> = future::ready(Ok(Some(5))).boxed();
        let result = instrument(chain, triple(), recorder(), None).await;
        assert_eq!(result.ok().flatten(), Some(5));
    }

    #[tokio::test]
    async fn test_start_dispatched_before_work_polled() {
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(Vec::new()));
        let dispatch_order = Arc::clone(&order);
        let dispatcher: Arc<dyn Dispatcher<u32>> =
            Arc::new(move |action: Action<u32>| -> anyhow::Result<()> {
                if action.is_start() {
                    if let Ok(mut order) = dispatch_order.lock() {
                        order.push("start");
                    }
                }
                Ok(())
            });

        let work_order = Arc::clone(&order);
        let chain: ActionChain<u32> = Box::pin(async move {
            if let Ok(mut order) = work_order.lock() {
                order.push("work");
            }
            Ok(Some(1))
        });

        let chain = instrument(chain, triple(), dispatcher, None);
        {
            let seen = order.lock().ok().map(|order| order.clone());
            assert_eq!(seen, Some(vec!["start"]));
        }
        let _ = chain.await;
        let seen = order.lock().ok().map(|order| order.clone());
        assert_eq!(seen, Some(vec!["start", "work"]));
    }

    #[tokio::test]
    async fn test_dispatch_fault_passes_through_unreported() {
        let dispatched = Arc::new(Mutex::new(0_usize));
        let count = Arc::clone(&dispatched);
        let dispatcher: Arc<dyn Dispatcher<u32>> =
            Arc::new(move |_: Action<u32>| -> anyhow::Result<()> {
                if let Ok(mut count) = count.lock() {
                    *count += 1;
                }
                Ok(())
            });

        let fault = ResolveError::Dispatch(DispatchError::from(anyhow!("listener broke")));
        let chain: ActionChain<u32> = future::ready(Err(fault)).boxed();
        let result = instrument(chain, triple(), dispatcher, None).await;

        assert!(matches!(result, Err(error) if error.is_pipeline_fault()));
        // Only the start action was dispatched; no terminal for the fault.
        assert_eq!(dispatched.lock().ok().as_deref().copied(), Some(1));
    }

    #[tokio::test]
    async fn test_operation_failure_reraised_after_emission() {
        let error = OperationError::from(anyhow!("boom"));
        let chain: ActionChain<u32> =
            future::ready(Err(ResolveError::Operation(error))).boxed();
        let result = instrument(chain, triple(), recorder(), None).await;
        assert!(matches!(result, Err(error) if !error.is_pipeline_fault()));
    }
}
