//! # Async Actions Runtime
//!
//! Resolution engine and lifecycle emission for async actions.
//!
//! This crate turns a declarative
//! [`AsyncAction`](async_actions_core::AsyncAction) into dispatched lifecycle
//! actions while reducing its payload (an immediate value, a deferred
//! computation, a nested async action, or an ordered step sequence) to a
//! single eventual value.
//!
//! ## Core components
//!
//! - [`resolve`]: the recursive resolution engine
//! - [`instrument`]: lifecycle emission around one deferred operation
//! - [`AsyncActionMiddleware`]: the pipeline entry point, with the
//!   fire-and-forget boundary guard [`settle`]
//!
//! ## Example
//!
//! ```
//! use async_actions_core::{Action, AsyncAction, Dispatcher, LifecycleTypes, Payload};
//! use async_actions_runtime::{AsyncActionMiddleware, PipelineAction};
//! use futures::FutureExt;
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let dispatcher: Arc<dyn Dispatcher<u32>> =
//!     Arc::new(|action: Action<u32>| -> anyhow::Result<()> {
//!         println!("dispatched {}", action.action_type);
//!         Ok(())
//!     });
//! let middleware = AsyncActionMiddleware::new(Arc::clone(&dispatcher));
//!
//! let fetch = AsyncAction::new(
//!     LifecycleTypes::new("FETCH_START", "FETCH_OK", "FETCH_FAIL"),
//!     Payload::Deferred(async { Ok(42) }.boxed()),
//! );
//!
//! if let Some(handle) = middleware.handle(PipelineAction::Async(fetch), |_| {}) {
//!     handle.await.ok();
//! }
//! # }
//! ```

/// Lifecycle emission around one deferred operation.
pub mod emit;

/// The pipeline entry point and boundary guard.
pub mod middleware;

/// The recursive resolution engine.
pub mod resolve;

pub use emit::instrument;
pub use middleware::{AsyncActionMiddleware, PipelineAction, settle};
pub use resolve::{ActionChain, resolve};
