//! The dispatch capability contract.
//!
//! The surrounding pipeline provides a synchronous dispatch entry point;
//! this layer only ever calls it to emit lifecycle actions. The capability
//! is assumed reentrant-safe by the pipeline: between a start action and
//! its terminal action, arbitrary other actions may flow through it.

use crate::action::Action;

/// The pipeline's synchronous dispatch entry point.
///
/// Implementations hand the action to the rest of the pipeline (reducers,
/// listeners). An `Err` return means a downstream handler failed while
/// processing the action; the resolution engine tags such failures as
/// pipeline faults rather than operation failures.
pub trait Dispatcher<V>: Send + Sync {
    /// Dispatch one action into the pipeline.
    ///
    /// # Errors
    ///
    /// Returns any error raised by downstream handlers of the action.
    fn dispatch(&self, action: Action<V>) -> anyhow::Result<()>;
}

impl<V, F> Dispatcher<V> for F
where
    F: Fn(Action<V>) -> anyhow::Result<()> + Send + Sync,
{
    fn dispatch(&self, action: Action<V>) -> anyhow::Result<()> {
        self(action)
    }
}
