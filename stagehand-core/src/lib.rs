//! # stagehand-core
//!
//! Core traits and types for the Stagehand session dispatch engine.
//!
//! This crate has minimal dependencies and is meant to be imported by code
//! that implements sessions, handlers or middleware without needing the
//! engine itself (`stagehand-std`).
//!
//! # Dispatch Model
//!
//! A long-lived [`Session`] receives three kinds of triggers, each looked up in
//! its own registry ([`Category`]):
//!
//! - **Entry**: the first (or resumed) visit, keyed by the session's current action.
//! - **Event**: user-originated named actions with a payload.
//! - **Message**: process-originated signals, routed on [`Value::dispatch_key`].
//!
//! For every trigger the engine runs a chain of [`Step`]s, stopping as soon as
//! the session turns terminal, then calls the registered [`Handler`] and
//! normalizes its [`Reply`] for the running [`Phase`].
//!
//! # Error Types
//!
//! - [`DispatchError`] - configuration errors and wrapped application failures
//! - [`BoxError`] - the error currency of handlers and middleware

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod context;
mod error;
mod handler;
mod reply;
mod session;
mod step;
mod trigger;
mod value;

// Re-exports
pub use context::{DispatchContext, Scope};
pub use error::{BoxError, DispatchError};
pub use handler::{DynHandler, Handler, SharedHandler, same_handler, shared};
pub use reply::{IntoReply, Options, Reply};
pub use session::Session;
pub use step::{DynStep, Step};
pub use trigger::{Category, Name, Phase, Trigger};
pub use value::{Map, Value};
