//! Async action descriptors and payload shape classification.
//!
//! An [`AsyncAction`] declares asynchronous work as data: a lifecycle
//! identifier triple plus a payload describing the work. Payloads form a
//! closed union of shapes (an immediate value, a deferred computation, a
//! nested descriptor, or an ordered step sequence) with an extra `Produce`
//! case for lazily-built payloads.
//!
//! Classification is structural and total: [`Payload::evaluate`] invokes
//! producer functions until a concrete shape remains, and the resulting
//! [`EffectivePayload`] enumerates exactly the four shapes the resolution
//! engine dispatches on. Producers are never classified unevaluated.
//!
//! # Example
//!
//! ```
//! use async_actions_core::action::LifecycleTypes;
//! use async_actions_core::descriptor::{AsyncAction, Payload, PayloadShape};
//!
//! let action = AsyncAction::new(
//!     LifecycleTypes::new("LOAD_START", "LOAD_OK", "LOAD_FAIL"),
//!     Payload::Produce(Box::new(|| Payload::Value(42))),
//! );
//!
//! assert_eq!(action.payload.evaluate().shape(), PayloadShape::Immediate);
//! ```

use crate::action::LifecycleTypes;
use futures::future::BoxFuture;
use std::fmt;
use std::sync::Arc;

/// A deferred computation: the unit of real asynchronous work.
///
/// Settles with the operation's value or an opaque operation error.
pub type Deferred<V> = BoxFuture<'static, anyhow::Result<V>>;

/// A declarative description of asynchronous work.
///
/// Descriptors are ephemeral: built by a caller, consumed once by the
/// resolution engine, and discarded after their terminal lifecycle action is
/// emitted. A [`RetryHandle`] attached via [`AsyncAction::with_retry`] is the
/// only part that outlives resolution; it travels in start/failure action
/// metadata so consumers can re-submit the work.
pub struct AsyncAction<V> {
    /// The start/success/failure identifiers for this operation.
    pub types: LifecycleTypes,
    /// The work to perform.
    pub payload: Payload<V>,
    /// Handle for rebuilding this descriptor, recorded in lifecycle metadata.
    pub retry: Option<RetryHandle<V>>,
}

impl<V> AsyncAction<V> {
    /// Create a descriptor with no retry handle.
    #[must_use]
    pub const fn new(types: LifecycleTypes, payload: Payload<V>) -> Self {
        Self {
            types,
            payload,
            retry: None,
        }
    }

    /// Attach a retry handle, carried on the start and failure actions this
    /// descriptor produces.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryHandle<V>) -> Self {
        self.retry = Some(retry);
        self
    }
}

impl<V> fmt::Debug for AsyncAction<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncAction")
            .field("types", &self.types)
            .field("payload", &self.payload.shape_hint())
            .field("retry", &self.retry)
            .finish()
    }
}

/// The payload of an [`AsyncAction`], before producer evaluation.
pub enum Payload<V> {
    /// An immediate value: no asynchronous work, no lifecycle actions.
    Value(V),
    /// A producer invoked with no arguments to obtain the effective payload.
    Produce(Box<dyn FnOnce() -> Payload<V> + Send>),
    /// A deferred computation.
    Deferred(Deferred<V>),
    /// A nested async action, resolved recursively with its own lifecycle.
    Action(Box<AsyncAction<V>>),
    /// An ordered sequence of steps, folded left to right.
    Steps(Vec<Step<V>>),
}

impl<V> Payload<V> {
    /// Invoke producer functions until a concrete shape remains, then
    /// classify.
    ///
    /// This is the single evaluation point for lazily-built payloads;
    /// classification always happens on the produced shape, never on the
    /// producer itself.
    #[must_use]
    pub fn evaluate(self) -> EffectivePayload<V> {
        let mut payload = self;
        loop {
            payload = match payload {
                Self::Value(value) => return EffectivePayload::Immediate(value),
                Self::Produce(producer) => producer(),
                Self::Deferred(deferred) => return EffectivePayload::Deferred(deferred),
                Self::Action(action) => return EffectivePayload::Action(action),
                Self::Steps(steps) => return EffectivePayload::Steps(steps),
            };
        }
    }

    fn shape_hint(&self) -> &'static str {
        match self {
            Self::Value(_) => "Value",
            Self::Produce(_) => "Produce",
            Self::Deferred(_) => "Deferred",
            Self::Action(_) => "Action",
            Self::Steps(_) => "Steps",
        }
    }
}

/// A payload after producer evaluation: the four disjoint shapes the
/// resolution engine dispatches on.
pub enum EffectivePayload<V> {
    /// A plain value needing no asynchronous work.
    Immediate(V),
    /// A deferred computation to instrument with lifecycle actions.
    Deferred(Deferred<V>),
    /// A nested descriptor to resolve recursively.
    Action(Box<AsyncAction<V>>),
    /// An ordered step sequence to fold.
    Steps(Vec<Step<V>>),
}

impl<V> EffectivePayload<V> {
    /// The shape discriminant, for logging and tests.
    #[must_use]
    pub const fn shape(&self) -> PayloadShape {
        match self {
            Self::Immediate(_) => PayloadShape::Immediate,
            Self::Deferred(_) => PayloadShape::Deferred,
            Self::Action(_) => PayloadShape::Action,
            Self::Steps(_) => PayloadShape::Steps,
        }
    }
}

/// Discriminant of an evaluated payload shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadShape {
    /// Plain value.
    Immediate,
    /// Deferred computation.
    Deferred,
    /// Nested async action.
    Action,
    /// Ordered step sequence.
    Steps,
}

impl fmt::Display for PayloadShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Immediate => "immediate",
            Self::Deferred => "deferred",
            Self::Action => "action",
            Self::Steps => "steps",
        };
        f.write_str(name)
    }
}

/// One step of an ordered sequence.
///
/// Steps resolve strictly in order: a step never begins before the previous
/// step's value has settled.
pub enum Step<V> {
    /// A plain value, passed through as the next previous-result.
    Value(V),
    /// A function of the previous step's resolved value. The argument is
    /// `None` only when no earlier step produced a value (first position).
    Then(Box<dyn FnOnce(Option<V>) -> StepValue<V> + Send>),
    /// A deferred computation, awaited in place.
    Deferred(Deferred<V>),
    /// A nested async action, resolved in place with its own lifecycle.
    Action(AsyncAction<V>),
}

/// What a [`Step::Then`] function may produce.
pub enum StepValue<V> {
    /// A plain value.
    Value(V),
    /// A deferred computation, awaited before the next step.
    Deferred(Deferred<V>),
    /// A nested async action, resolved before the next step.
    Action(AsyncAction<V>),
}

/// A capability for rebuilding the async action that produced a lifecycle
/// sequence.
///
/// Descriptors own one-shot futures and producers, so the original cannot be
/// replayed verbatim; a retry handle is a factory that rebuilds an equivalent
/// descriptor. This layer records handles in start/failure metadata and never
/// invokes them.
pub struct RetryHandle<V>(Arc<dyn Fn() -> AsyncAction<V> + Send + Sync>);

impl<V> RetryHandle<V> {
    /// Wrap a rebuild function.
    pub fn new(rebuild: impl Fn() -> AsyncAction<V> + Send + Sync + 'static) -> Self {
        Self(Arc::new(rebuild))
    }

    /// Rebuild the descriptor for re-submission.
    #[must_use]
    pub fn rebuild(&self) -> AsyncAction<V> {
        (self.0)()
    }
}

impl<V> Clone for RetryHandle<V> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<V> fmt::Debug for RetryHandle<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RetryHandle(..)")
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::action::LifecycleTypes;

    fn triple() -> LifecycleTypes {
        LifecycleTypes::new("S", "OK", "NO")
    }

    #[test]
    fn test_evaluate_passes_concrete_shapes_through() {
        assert_eq!(
            Payload::Value(1).evaluate().shape(),
            PayloadShape::Immediate
        );
        assert_eq!(
            Payload::<u32>::Steps(vec![]).evaluate().shape(),
            PayloadShape::Steps
        );
    }

    #[test]
    fn test_evaluate_unwraps_chained_producers() {
        let payload: Payload<u32> =
            Payload::Produce(Box::new(|| Payload::Produce(Box::new(|| Payload::Value(9)))));
        match payload.evaluate() {
            EffectivePayload::Immediate(value) => assert_eq!(value, 9),
            other => panic!("expected immediate, got {}", other.shape()),
        }
    }

    #[test]
    fn test_retry_handle_rebuilds() {
        let handle = RetryHandle::new(|| AsyncAction::new(triple(), Payload::Value(3)));
        let rebuilt = handle.rebuild();
        assert_eq!(rebuilt.types, triple());
        assert_eq!(rebuilt.payload.evaluate().shape(), PayloadShape::Immediate);
    }

    #[test]
    fn test_debug_hides_payload_internals() {
        let action = AsyncAction::new(triple(), Payload::Value(1))
            .with_retry(RetryHandle::new(|| AsyncAction::new(triple(), Payload::Value(1))));
        let printed = format!("{action:?}");
        assert!(printed.contains("Value"));
        assert!(printed.contains("RetryHandle(..)"));
    }
}
