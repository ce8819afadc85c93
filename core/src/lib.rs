//! # Async Actions Core
//!
//! Core types for the async-actions dispatch instrumentation layer.
//!
//! An async action is a message that *describes* asynchronous work instead of
//! performing it: a lifecycle identifier triple (`start`, `success`,
//! `failure`) plus a payload that is an immediate value, a deferred
//! computation, a nested async action, or an ordered sequence of steps. The
//! runtime crate expands one descriptor into dispatched lifecycle actions
//! while reducing its payload to a single eventual value.
//!
//! ## Core concepts
//!
//! - [`Action`]: the dispatched message shape (type, payload, error flag,
//!   metadata)
//! - [`AsyncAction`]: a descriptor of asynchronous work, consumed once
//! - [`Payload`] / [`EffectivePayload`]: the closed union of payload shapes
//! - [`Dispatcher`]: the pipeline's synchronous dispatch capability
//! - [`ResolveError`]: chain rejections tagged with provenance (operation
//!   failure vs. dispatch fault)
//!
//! ## Example
//!
//! ```
//! use async_actions_core::{AsyncAction, LifecycleTypes, Payload};
//! use futures::FutureExt;
//!
//! let fetch = AsyncAction::new(
//!     LifecycleTypes::new("FETCH_START", "FETCH_OK", "FETCH_FAIL"),
//!     Payload::Deferred(async { Ok(42_u32) }.boxed()),
//! );
//! assert_eq!(fetch.types.start.as_str(), "FETCH_START");
//! ```

/// Dispatched action shapes and the lifecycle wire contract.
pub mod action;

/// Async action descriptors, payload shapes, and retry handles.
pub mod descriptor;

/// The dispatch capability trait.
pub mod dispatch;

/// Error taxonomy with dispatch provenance.
pub mod error;

pub use action::{Action, ActionPayload, ActionType, LifecycleTypes, Meta};
pub use descriptor::{
    AsyncAction, Deferred, EffectivePayload, Payload, PayloadShape, RetryHandle, Step, StepValue,
};
pub use dispatch::Dispatcher;
pub use error::{DispatchError, OperationError, ResolveError};
