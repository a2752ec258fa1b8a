//! # stagehand - Middleware-Driven Session Dispatch
//!
//! `stagehand` routes three kinds of triggers against a long-lived session:
//! entry (first visit and later parameter updates), named events and process
//! messages. Each trigger runs an ordered chain of middleware that stops as
//! soon as the session turns terminal, then the registered handler, whose
//! reply is normalized for the running phase.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use stagehand::prelude::*;
//!
//! let controller = Controller::builder("Blog.PostLive")
//!     .middleware(
//!         Middleware::new("require_user", |socket: Socket| async move {
//!             match socket.get("user") {
//!                 Some(_) => Ok::<_, BoxError>(socket),
//!                 None => Ok(socket.redirect("/login")),
//!             }
//!         })
//!         .except(Category::Entry, ["index"]),
//!     )
//!     .entry("show", |socket: Socket, params: Value| async move {
//!         Ok::<_, BoxError>(socket.assign("id", params.get("id").cloned()))
//!     })
//!     .event("delete", |socket: Socket, _payload: Value| async move {
//!         Ok::<_, BoxError>(socket.redirect("/posts"))
//!     })
//!     .build()?;
//!
//! let reply = controller
//!     .entry(Socket::for_action("show").assign("user", "ada"), params, None)
//!     .await?;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use stagehand_core::{
    // Errors
    BoxError,
    // Dispatch context
    DispatchContext,
    DispatchError,
    // Handler
    DynHandler,
    // Middleware step
    DynStep,
    Handler,
    // Reply
    IntoReply,
    Map,
    // Triggers
    Category,
    Name,
    Options,
    Phase,
    Reply,
    Scope,
    // Session
    Session,
    SharedHandler,
    Step,
    Trigger,
    // Data
    Value,
    same_handler,
    shared,
};

// Engine
pub use stagehand_std::{
    Call, Chain, Controller, ControllerBuilder, DynInvoke, DynSeed, HandlerRegistry, Invoke,
    Middleware, MiddlewareTable, Render, Seed, Socket, chain, default_invoke, view_name,
};

/// Standard middleware steps.
pub mod steps {
    pub use stagehand_std::steps::LogStep;
}

/// Testing utilities.
pub mod testing {
    pub use stagehand_std::testing::{CountingHandler, HaltingStep, Journal, RecordingStep};
}

/// Prelude module - common imports for Stagehand.
///
/// # Usage
///
/// ```rust,ignore
/// use stagehand::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        // Errors
        BoxError,
        // Triggers
        Category,
        // Engine
        Controller,
        DispatchContext,
        DispatchError,
        // Core traits
        Handler,
        Middleware,
        Reply,
        Session,
        Socket,
        Step,
        Value,
    };
}
