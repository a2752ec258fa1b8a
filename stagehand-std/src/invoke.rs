//! Handler invocation and its per-category overrides.
//!
//! By default the engine calls the resolved handler with the session and the
//! trigger input. An [`Invoke`] override registered for a category receives
//! the whole [`Call`] instead; it may rewrite the arguments, post-process the
//! reply, or skip the handler entirely. Calling [`Call::proceed`] runs the
//! default behaviour.

use futures::future::BoxFuture;
use stagehand_core::{BoxError, Category, Name, Reply, Session, SharedHandler, Value};
use std::future::Future;

/// A pending handler invocation.
pub struct Call<S: Session> {
    category: Category,
    name: Name,
    handler: SharedHandler<S>,
    session: S,
    input: Value,
}

impl<S: Session> Call<S> {
    pub(crate) fn new(
        category: Category,
        name: Name,
        handler: SharedHandler<S>,
        session: S,
        input: Value,
    ) -> Self {
        Self {
            category,
            name,
            handler,
            session,
            input,
        }
    }

    /// The registry the handler was resolved from.
    pub fn category(&self) -> Category {
        self.category
    }

    /// The canonical handler name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The session the handler will receive.
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Mutable access to the session before proceeding.
    pub fn session_mut(&mut self) -> &mut S {
        &mut self.session
    }

    /// The input the handler will receive.
    pub fn input(&self) -> &Value {
        &self.input
    }

    /// Replace the session passed to the handler.
    pub fn with_session(mut self, session: S) -> Self {
        self.session = session;
        self
    }

    /// Replace the input passed to the handler.
    pub fn with_input(mut self, input: Value) -> Self {
        self.input = input;
        self
    }

    /// Take the session and input without calling the handler.
    pub fn into_parts(self) -> (S, Value) {
        (self.session, self.input)
    }

    /// Run the registered handler with the current arguments.
    pub async fn proceed(self) -> Result<Reply<S>, BoxError> {
        self.handler.call_dyn(self.session, self.input).await
    }
}

/// The default invocation: call the registered handler.
pub async fn default_invoke<S: Session>(call: Call<S>) -> Result<Reply<S>, BoxError> {
    call.proceed().await
}

/// A handler-invocation override.
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not an `Invoke` override for sessions of type `{S}`",
    label = "missing `Invoke<{S}>` implementation",
    note = "Overrides take a `Call<{S}>` and return `Result<Reply<{S}>, BoxError>`."
)]
pub trait Invoke<S: Session>: Send + Sync + 'static {
    /// Perform the invocation.
    fn invoke(&self, call: Call<S>) -> impl Future<Output = Result<Reply<S>, BoxError>> + Send;
}

impl<S, F, Fut> Invoke<S> for F
where
    S: Session,
    F: Fn(Call<S>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Reply<S>, BoxError>> + Send,
{
    fn invoke(&self, call: Call<S>) -> impl Future<Output = Result<Reply<S>, BoxError>> + Send {
        (self)(call)
    }
}

/// Dynamic object-safe version of [`Invoke`].
pub trait DynInvoke<S: Session>: Send + Sync + 'static {
    /// Perform the invocation (dynamic dispatch version).
    fn invoke_dyn(&self, call: Call<S>) -> BoxFuture<'_, Result<Reply<S>, BoxError>>;
}

impl<S: Session, T: Invoke<S>> DynInvoke<S> for T {
    fn invoke_dyn(&self, call: Call<S>) -> BoxFuture<'_, Result<Reply<S>, BoxError>> {
        Box::pin(self.invoke(call))
    }
}
