//! # Async Actions Testing
//!
//! Test dispatchers for asserting on emitted lifecycle actions.
//!
//! [`RecordingDispatcher`] captures every dispatched action in order and can
//! inject dispatch failures for selected action types, which is how tests
//! exercise the pipeline-fault provenance path.
//!
//! # Example
//!
//! ```
//! use async_actions_testing::RecordingDispatcher;
//! use async_actions_core::{Action, Dispatcher};
//!
//! let dispatcher = RecordingDispatcher::<u32>::new();
//! dispatcher.dispatch(Action::plain("PING")).ok();
//! assert_eq!(dispatcher.action_types(), vec!["PING".to_string()]);
//! ```

use anyhow::anyhow;
use async_actions_core::{Action, ActionType, Dispatcher};
use std::collections::HashSet;
use std::sync::Mutex;

/// A dispatcher that records every action it receives, in dispatch order.
///
/// Optionally fails dispatch for a configured set of action types, returning
/// an error *after* recording the attempt, so tests can observe both the
/// attempted emission and the resulting pipeline fault.
pub struct RecordingDispatcher<V> {
    recorded: Mutex<Vec<Action<V>>>,
    fail_on: Mutex<HashSet<ActionType>>,
}

impl<V> RecordingDispatcher<V> {
    /// Create an empty recorder that accepts every action.
    #[must_use]
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
            fail_on: Mutex::new(HashSet::new()),
        }
    }

    /// Make dispatch fail for the given action type.
    pub fn fail_on(&self, action_type: impl Into<ActionType>) {
        if let Ok(mut fail_on) = self.fail_on.lock() {
            fail_on.insert(action_type.into());
        }
    }

    /// Number of actions dispatched so far.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshot(Vec::len)
    }

    /// Whether nothing has been dispatched yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The recorded action type identifiers, in dispatch order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn action_types(&self) -> Vec<String> {
        self.snapshot(|recorded| {
            recorded
                .iter()
                .map(|action| action.action_type.to_string())
                .collect()
        })
    }

    /// Run `f` over the recorded actions.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    pub fn snapshot<T>(&self, f: impl FnOnce(&Vec<Action<V>>) -> T) -> T {
        #[allow(clippy::expect_used)]
        let recorded = self.recorded.lock().expect("recorder lock poisoned");
        f(&recorded)
    }
}

impl<V: Clone> RecordingDispatcher<V> {
    /// A copy of every recorded action, in dispatch order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn recorded(&self) -> Vec<Action<V>> {
        self.snapshot(Clone::clone)
    }
}

impl<V> Default for RecordingDispatcher<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Send> Dispatcher<V> for RecordingDispatcher<V> {
    fn dispatch(&self, action: Action<V>) -> anyhow::Result<()> {
        let action_type = action.action_type.clone();
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(action);
        }
        let injected = self
            .fail_on
            .lock()
            .map(|fail_on| fail_on.contains(&action_type))
            .unwrap_or(false);
        if injected {
            return Err(anyhow!("injected dispatch failure for {action_type}"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let dispatcher = RecordingDispatcher::<u32>::new();
        dispatcher.dispatch(Action::plain("A")).ok();
        dispatcher.dispatch(Action::with_payload("B", 1)).ok();
        assert_eq!(
            dispatcher.action_types(),
            vec!["A".to_string(), "B".to_string()]
        );
    }

    #[test]
    fn test_injected_failure_still_records() {
        let dispatcher = RecordingDispatcher::<u32>::new();
        dispatcher.fail_on("BAD");
        assert!(dispatcher.dispatch(Action::plain("BAD")).is_err());
        assert!(dispatcher.dispatch(Action::plain("GOOD")).is_ok());
        assert_eq!(dispatcher.len(), 2);
    }
}
