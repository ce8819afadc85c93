//! Dispatched action types and the lifecycle wire contract.
//!
//! Every action that leaves this layer has the same shape: a type identifier,
//! an optional payload, an error flag, and a metadata block. The three
//! lifecycle actions emitted per resolved async operation are built through
//! the constructors on [`Action`], which enforce the field contract:
//!
//! - `error` is `true` only on failure actions.
//! - `meta.async_start` is `true` only on start actions.
//! - `meta.resolves` carries the originating start identifier on terminal
//!   actions, so consumers can correlate start/terminal pairs by identifier
//!   alone.
//! - `meta.retry_action` is present only on start and failure actions.
//!
//! # Example
//!
//! ```
//! use async_actions_core::action::{Action, LifecycleTypes};
//!
//! let types = LifecycleTypes::new("FETCH_START", "FETCH_OK", "FETCH_FAIL");
//! let start = Action::<u32>::started(&types, None);
//!
//! assert_eq!(start.action_type.as_str(), "FETCH_START");
//! assert!(start.meta.async_start);
//! assert!(!start.error);
//! ```

use crate::descriptor::RetryHandle;
use crate::error::OperationError;
use std::borrow::Cow;
use std::fmt;

/// A stable identifier for an action type.
///
/// Identifiers are cheap to clone and compare; static string literals are
/// stored without allocation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionType(Cow<'static, str>);

impl ActionType {
    /// Create an action type from a static or owned string.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    /// The identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for ActionType {
    fn from(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }
}

impl From<String> for ActionType {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

/// The ordered start/success/failure identifier triple of an async action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleTypes {
    /// Dispatched before the asynchronous work begins.
    pub start: ActionType,
    /// Dispatched when the work settles successfully.
    pub success: ActionType,
    /// Dispatched when the work settles with an error.
    pub failure: ActionType,
}

impl LifecycleTypes {
    /// Build a triple from the three identifiers, in start/success/failure
    /// order.
    pub fn new(
        start: impl Into<ActionType>,
        success: impl Into<ActionType>,
        failure: impl Into<ActionType>,
    ) -> Self {
        Self {
            start: start.into(),
            success: success.into(),
            failure: failure.into(),
        }
    }
}

/// Payload of a dispatched action.
///
/// Start actions carry no payload; success actions carry the resolved value
/// (or nothing, when the resolution produced no value); failure actions carry
/// the operation error.
#[derive(Debug, Clone)]
pub enum ActionPayload<V> {
    /// No payload (start actions, and success actions for empty resolutions).
    None,
    /// The resolved value of a successful operation.
    Value(V),
    /// The error of a failed operation.
    Error(OperationError),
}

impl<V> ActionPayload<V> {
    /// The resolved value, if this payload carries one.
    pub const fn value(&self) -> Option<&V> {
        match self {
            Self::Value(value) => Some(value),
            Self::None | Self::Error(_) => None,
        }
    }

    /// The operation error, if this payload carries one.
    pub const fn error(&self) -> Option<&OperationError> {
        match self {
            Self::Error(error) => Some(error),
            Self::None | Self::Value(_) => None,
        }
    }
}

/// Metadata block attached to every dispatched action.
#[derive(Debug, Clone)]
pub struct Meta<V> {
    /// `true` only on the start action of an async operation.
    pub async_start: bool,
    /// On terminal actions, the start identifier they resolve.
    pub resolves: Option<ActionType>,
    /// On start and failure actions, a handle for re-submitting the original
    /// async action. Recorded for consumers (retry UIs, logs); never invoked
    /// by this layer.
    pub retry_action: Option<RetryHandle<V>>,
}

impl<V> Meta<V> {
    /// Empty metadata, used for plain (non-lifecycle) actions.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            async_start: false,
            resolves: None,
            retry_action: None,
        }
    }
}

impl<V> Default for Meta<V> {
    fn default() -> Self {
        Self::none()
    }
}

/// An action flowing out of this layer into the dispatch capability.
///
/// Immutable once dispatched.
#[derive(Debug, Clone)]
pub struct Action<V> {
    /// The action type identifier.
    pub action_type: ActionType,
    /// Resolved value or error, absent on start actions.
    pub payload: ActionPayload<V>,
    /// `true` only on failure actions.
    pub error: bool,
    /// Lifecycle metadata.
    pub meta: Meta<V>,
}

impl<V> Action<V> {
    /// A plain action with no payload and empty metadata.
    pub fn plain(action_type: impl Into<ActionType>) -> Self {
        Self {
            action_type: action_type.into(),
            payload: ActionPayload::None,
            error: false,
            meta: Meta::none(),
        }
    }

    /// A plain action carrying a value payload.
    pub fn with_payload(action_type: impl Into<ActionType>, value: V) -> Self {
        Self {
            action_type: action_type.into(),
            payload: ActionPayload::Value(value),
            error: false,
            meta: Meta::none(),
        }
    }

    /// The start action of a lifecycle triple.
    #[must_use]
    pub fn started(types: &LifecycleTypes, retry_action: Option<RetryHandle<V>>) -> Self {
        Self {
            action_type: types.start.clone(),
            payload: ActionPayload::None,
            error: false,
            meta: Meta {
                async_start: true,
                resolves: None,
                retry_action,
            },
        }
    }

    /// The success action of a lifecycle triple.
    ///
    /// `value` is `None` when the resolution produced no value (an empty
    /// step sequence); the action is still dispatched, with an empty payload.
    #[must_use]
    pub fn succeeded(types: &LifecycleTypes, value: Option<V>) -> Self {
        Self {
            action_type: types.success.clone(),
            payload: value.map_or(ActionPayload::None, ActionPayload::Value),
            error: false,
            meta: Meta {
                async_start: false,
                resolves: Some(types.start.clone()),
                retry_action: None,
            },
        }
    }

    /// The failure action of a lifecycle triple.
    #[must_use]
    pub fn failed(
        types: &LifecycleTypes,
        error: OperationError,
        retry_action: Option<RetryHandle<V>>,
    ) -> Self {
        Self {
            action_type: types.failure.clone(),
            payload: ActionPayload::Error(error),
            error: true,
            meta: Meta {
                async_start: false,
                resolves: Some(types.start.clone()),
                retry_action,
            },
        }
    }

    /// Whether this is the start action of an async operation.
    #[must_use]
    pub const fn is_start(&self) -> bool {
        self.meta.async_start
    }

    /// Whether this is a terminal (success or failure) lifecycle action.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.meta.resolves.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    fn triple() -> LifecycleTypes {
        LifecycleTypes::new("T_START", "T_OK", "T_FAIL")
    }

    #[test]
    fn test_started_shape() {
        let action = Action::<u32>::started(&triple(), None);
        assert_eq!(action.action_type, ActionType::from("T_START"));
        assert!(action.is_start());
        assert!(!action.is_terminal());
        assert!(!action.error);
        assert!(action.payload.value().is_none());
    }

    #[test]
    fn test_succeeded_resolves_start() {
        let action = Action::succeeded(&triple(), Some(7));
        assert_eq!(action.action_type.as_str(), "T_OK");
        assert_eq!(action.meta.resolves, Some(ActionType::from("T_START")));
        assert_eq!(action.payload.value(), Some(&7));
        assert!(action.is_terminal());
        assert!(!action.error);
    }

    #[test]
    fn test_succeeded_empty_payload() {
        let action = Action::<u32>::succeeded(&triple(), None);
        assert!(action.payload.value().is_none());
        assert!(action.is_terminal());
    }

    #[test]
    fn test_failed_shape() {
        let error = OperationError::from(anyhow!("boom"));
        let action = Action::<u32>::failed(&triple(), error, None);
        assert_eq!(action.action_type.as_str(), "T_FAIL");
        assert!(action.error);
        assert_eq!(action.meta.resolves, Some(ActionType::from("T_START")));
        assert_eq!(
            action.payload.error().map(ToString::to_string),
            Some("boom".to_string())
        );
    }

    #[test]
    fn test_action_type_display() {
        assert_eq!(ActionType::from("X").to_string(), "X");
        assert_eq!(ActionType::from(String::from("Y")).as_str(), "Y");
    }
}
