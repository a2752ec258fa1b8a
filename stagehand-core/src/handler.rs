//! # Handlers
//!
//! A handler is the terminal point of a dispatch: it receives the session as
//! left by the middleware chain together with the trigger's input, and returns
//! the next session (or a [`Reply`]).
//!
//! # Usage Patterns
//!
//! 1. **Direct closure**: `|session, params| async move { Ok::<_, BoxError>(session) }`
//! 2. **Struct implementation**: `impl Handler<MySession> for MyHandler`
//!
//! Registries store handlers as [`SharedHandler`]s; two registrations are the
//! same handler exactly when they share an allocation.

use crate::{
    error::BoxError,
    reply::{IntoReply, Reply},
    session::Session,
    value::Value,
};
use std::{future::Future, pin::Pin, sync::Arc};

/// A handler for one `(category, name)`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Handler` for sessions of type `{S}`",
    label = "missing `Handler<{S}>` implementation",
    note = "Handlers are async functions of `(session, input)` returning `Result<session or Reply, error>`."
)]
pub trait Handler<S: Session>: Send + Sync + 'static {
    /// Run the handler.
    fn call(&self, session: S, input: Value)
    -> impl Future<Output = Result<Reply<S>, BoxError>> + Send;
}

impl<F, S, Fut, Out, E> Handler<S> for F
where
    S: Session,
    F: Fn(S, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Out, E>> + Send,
    Out: IntoReply<S>,
    E: Into<BoxError>,
{
    async fn call(&self, session: S, input: Value) -> Result<Reply<S>, BoxError> {
        (self)(session, input)
            .await
            .map(IntoReply::into_reply)
            .map_err(Into::into)
    }
}

/// Dynamic object-safe version of [`Handler`].
pub trait DynHandler<S: Session>: Send + Sync + 'static {
    /// Run the handler (dynamic dispatch version).
    fn call_dyn<'a>(
        &'a self,
        session: S,
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Reply<S>, BoxError>> + Send + 'a>>;
}

impl<S: Session, T: Handler<S>> DynHandler<S> for T {
    fn call_dyn<'a>(
        &'a self,
        session: S,
        input: Value,
    ) -> Pin<Box<dyn Future<Output = Result<Reply<S>, BoxError>> + Send + 'a>> {
        Box::pin(self.call(session, input))
    }
}

/// A type-erased, shareable handler as stored by registries.
pub type SharedHandler<S> = Arc<dyn DynHandler<S>>;

/// Erase `handler` into a [`SharedHandler`].
///
/// Keep the returned `Arc` to register the same handler more than once.
pub fn shared<S: Session, H: Handler<S>>(handler: H) -> SharedHandler<S> {
    Arc::new(handler)
}

/// Whether two shared handlers are the same allocation.
pub fn same_handler<S: Session>(a: &SharedHandler<S>, b: &SharedHandler<S>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}
