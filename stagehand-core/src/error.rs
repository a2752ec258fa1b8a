//! Error types for Stagehand.
//!
//! Configuration mistakes (a missing action, an unregistered name, a
//! duplicate registration, a message with no routable key) are reported as
//! [`DispatchError`] variants whose messages spell out the registration that
//! would fix them. Anything raised by application code travels through
//! untouched inside [`DispatchError::Failed`].

use crate::trigger::Category;
use std::sync::Arc;
use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while setting up or dispatching to a controller.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// An entry dispatch found no current action on the session.
    #[error(
        "controller `{controller}` received an entry dispatch, but the session has no current action\n\n\
         set the action on the session before the first entry dispatch and register it with:\n\n    \
         Controller::builder(\"{controller}\").entry(\"<action>\", handler)"
    )]
    MissingAction {
        /// The controller that was dispatched to.
        controller: Arc<str>,
    },

    /// No handler is registered for the resolved name in its category.
    #[error(
        "controller `{controller}` has no {category} handler named `{name}`\n\n\
         register one before dispatching:\n\n    \
         Controller::builder(\"{controller}\").{method}(\"{name}\", handler)",
        method = .category.builder_method()
    )]
    UnknownHandler {
        /// The controller that was dispatched to.
        controller: Arc<str>,
        /// The registry that was searched.
        category: Category,
        /// The name as received.
        name: String,
    },

    /// Two different handlers were registered under the same name.
    #[error(
        "controller `{controller}` already has a different {category} handler named `{name}`\n\n\
         each {category} name maps to exactly one handler; remove one of the\n    \
         .{method}(\"{name}\", ..)\n\
         registrations or give it another name",
        method = .category.builder_method()
    )]
    DuplicateHandler {
        /// The controller being built.
        controller: Arc<str>,
        /// The registry the name collided in.
        category: Category,
        /// The colliding name.
        name: String,
    },

    /// A message payload has no derivable dispatch key.
    #[error(
        "controller `{controller}` cannot route message {payload}\n\n\
         a message must be an atom or a tuple whose first element is an atom,\n\
         and that atom must be registered with:\n\n    \
         Controller::builder(\"{controller}\").message(\"<name>\", handler)"
    )]
    UnroutableMessage {
        /// The controller that was dispatched to.
        controller: Arc<str>,
        /// Debug rendering of the rejected payload.
        payload: String,
    },

    /// Middleware, a seed hook, an invoker or a handler failed.
    #[error(transparent)]
    Failed(#[from] BoxError),
}

impl DispatchError {
    /// Returns `true` for the configuration errors that a registration would fix.
    pub fn is_configuration(&self) -> bool {
        !matches!(self, DispatchError::Failed(_))
    }

    /// Recover the application error carried by [`DispatchError::Failed`].
    pub fn into_failure(self) -> Option<BoxError> {
        match self {
            DispatchError::Failed(err) => Some(err),
            _ => None,
        }
    }
}
