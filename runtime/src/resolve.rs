//! The resolution engine: reducing an async action to one eventual value.
//!
//! [`resolve`] recursively reduces a descriptor's payload to a single
//! deferred final value, emitting lifecycle actions at each async boundary
//! through the emitter:
//!
//! - an immediate value short-circuits: no lifecycle actions at all;
//! - a deferred computation is instrumented directly;
//! - a nested descriptor is resolved recursively (driving its own,
//!   independent lifecycle) and the inner chain is instrumented under the
//!   *outer* triple;
//! - a step sequence is folded left to right into one chain, then
//!   instrumented.
//!
//! The returned chain settles with the same outcome as the innermost real
//! asynchronous work; instrumentation never changes the resolved value or
//! error.

use crate::emit::instrument;
use async_actions_core::{
    AsyncAction, Dispatcher, EffectivePayload, OperationError, ResolveError, Step, StepValue,
};
use futures::FutureExt;
use futures::future::{self, BoxFuture};
use std::sync::Arc;

/// A resolution chain: the eventual outcome of one async action.
///
/// Settles with `Some(value)` for resolutions that produced a value, `None`
/// for empty ones (an empty step sequence), or a provenance-tagged error.
pub type ActionChain<V> = BoxFuture<'static, Result<Option<V>, ResolveError>>;

/// Resolve one async action into a chain, dispatching its lifecycle actions.
///
/// The descriptor's retry handle (if any) rides on the start and failure
/// actions emitted for *this* descriptor; nested descriptors never inherit
/// it: a retry re-submits the whole original request, so only the outermost
/// lifecycle advertises it.
///
/// The start action for this descriptor is dispatched synchronously, before
/// `resolve` returns (except for the immediate-value case, which emits
/// nothing).
pub fn resolve<V>(mut action: AsyncAction<V>, dispatcher: &Arc<dyn Dispatcher<V>>) -> ActionChain<V>
where
    V: Clone + Send + 'static,
{
    let retry = action.retry.take();
    let types = action.types;
    let payload = action.payload.evaluate();
    tracing::trace!(start = %types.start, shape = %payload.shape(), "resolving async action");

    match payload {
        EffectivePayload::Immediate(value) => future::ready(Ok(Some(value))).boxed(),
        EffectivePayload::Deferred(deferred) => {
            let chain = deferred
                .map(|outcome| {
                    outcome
                        .map(Some)
                        .map_err(|error| ResolveError::Operation(OperationError::from(error)))
                })
                .boxed();
            instrument(chain, types, Arc::clone(dispatcher), retry)
        }
        EffectivePayload::Action(inner) => {
            let mut inner = *inner;
            inner.retry = None;
            let chain = resolve(inner, dispatcher);
            instrument(chain, types, Arc::clone(dispatcher), retry)
        }
        EffectivePayload::Steps(steps) => {
            let chain = fold_steps(steps, Arc::clone(dispatcher));
            instrument(chain, types, Arc::clone(dispatcher), retry)
        }
    }
}

/// Fold an ordered step sequence into a single chain.
///
/// Starts from no value; each step observes the previous step's resolved
/// value. Step *i + 1* never begins before step *i* has settled: deferred
/// computations are awaited in place and nested descriptors are resolved in
/// place, with their own lifecycles. The first failing step rejects the
/// whole chain and later steps never run.
fn fold_steps<V>(steps: Vec<Step<V>>, dispatcher: Arc<dyn Dispatcher<V>>) -> ActionChain<V>
where
    V: Clone + Send + 'static,
{
    Box::pin(async move {
        let mut previous: Option<V> = None;
        for step in steps {
            let value = match step {
                Step::Value(value) => StepValue::Value(value),
                Step::Then(then) => then(previous.take()),
                Step::Deferred(deferred) => StepValue::Deferred(deferred),
                Step::Action(action) => StepValue::Action(action),
            };
            previous = match value {
                StepValue::Value(value) => Some(value),
                StepValue::Deferred(deferred) => Some(
                    deferred
                        .await
                        .map_err(|error| ResolveError::Operation(OperationError::from(error)))?,
                ),
                StepValue::Action(mut action) => {
                    action.retry = None;
                    resolve(action, &dispatcher).await?
                }
            };
        }
        Ok(previous)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_actions_core::{Action, LifecycleTypes, Payload};
    use anyhow::anyhow;

    fn quiet() -> Arc<dyn Dispatcher<i64>> {
        Arc::new(|_: Action<i64>| -> anyhow::Result<()> { Ok(()) })
    }

    fn triple(prefix: &str) -> LifecycleTypes {
        LifecycleTypes::new(
            format!("{prefix}_START"),
            format!("{prefix}_OK"),
            format!("{prefix}_FAIL"),
        )
    }

    #[tokio::test]
    async fn test_immediate_short_circuits() {
        let action = AsyncAction::new(triple("A"), Payload::Value(42));
        let result = resolve(action, &quiet()).await;
        assert_eq!(result.ok().flatten(), Some(42));
    }

    #[tokio::test]
    async fn test_producer_of_deferred() {
        let action = AsyncAction::new(
            triple("A"),
            Payload::Produce(Box::new(|| Payload::Deferred(async { Ok(7) }.boxed()))),
        );
        let result = resolve(action, &quiet()).await;
        assert_eq!(result.ok().flatten(), Some(7));
    }

    #[tokio::test]
    async fn test_step_fold_threads_previous_value() {
        let action = AsyncAction::new(
            triple("A"),
            Payload::Steps(vec![
                Step::Value(1),
                Step::Then(Box::new(|previous| {
                    StepValue::Value(previous.unwrap_or(0) * 10)
                })),
                Step::Then(Box::new(|previous| {
                    let base = previous.unwrap_or(0);
                    StepValue::Deferred(async move { Ok(base + 5) }.boxed())
                })),
            ]),
        );
        let result = resolve(action, &quiet()).await;
        assert_eq!(result.ok().flatten(), Some(15));
    }

    #[tokio::test]
    async fn test_failing_step_stops_the_fold() {
        let action = AsyncAction::new(
            triple("A"),
            Payload::Steps(vec![
                Step::Deferred(async { Err(anyhow!("step one broke")) }.boxed()),
                Step::Then(Box::new(|_| StepValue::Value(99))),
            ]),
        );
        let result = resolve(action, &quiet()).await;
        assert!(matches!(result, Err(error) if !error.is_pipeline_fault()));
    }

    #[tokio::test]
    async fn test_empty_steps_resolve_to_no_value() {
        let action = AsyncAction::new(triple("A"), Payload::Steps(Vec::new()));
        let result = resolve(action, &quiet()).await;
        assert_eq!(result.ok(), Some(None));
    }
}
