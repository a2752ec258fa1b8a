//! # Middleware Steps
//!
//! A step is one link of a middleware chain: it takes the current session and
//! returns the next one. A step requests a short-circuit by returning a
//! terminal session; the chain runner checks for that before every step.
//!
//! Steps see the dispatch through a [`Scope`]. To read live values (params,
//! payload, the current session) pair it with the session via
//! [`Scope::with`].

use crate::{context::Scope, error::BoxError, session::Session};
use std::{future::Future, pin::Pin};

/// A single middleware step.
///
/// # Static vs Dynamic Dispatch
///
/// This trait uses native `async fn` for static dispatch. Chains store steps
/// behind [`DynStep`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a middleware `Step` for sessions of type `{S}`",
    label = "missing `Step<{S}>` implementation",
    note = "Steps must implement `run`, returning the next session."
)]
pub trait Step<S: Session>: Send + Sync + 'static {
    /// Run the step against the current session.
    fn run(&self, session: S, scope: &Scope<'_>)
    -> impl Future<Output = Result<S, BoxError>> + Send;
}

/// Dynamic object-safe version of [`Step`].
pub trait DynStep<S: Session>: Send + Sync + 'static {
    /// Run the step (dynamic dispatch version).
    fn run_dyn<'a>(
        &'a self,
        session: S,
        scope: &'a Scope<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<S, BoxError>> + Send + 'a>>;
}

// Blanket implementation: any Step is a DynStep.
impl<S: Session, T: Step<S>> DynStep<S> for T {
    fn run_dyn<'a>(
        &'a self,
        session: S,
        scope: &'a Scope<'a>,
    ) -> Pin<Box<dyn Future<Output = Result<S, BoxError>> + Send + 'a>> {
        Box::pin(self.run(session, scope))
    }
}
