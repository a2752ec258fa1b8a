//! Session-seed hook, run once per entry before the entry chain.

use futures::future::BoxFuture;
use stagehand_core::{BoxError, Session, Value};
use std::future::Future;

/// Enriches a session from external seed data during entry.
///
/// If the returned session is terminal, the entry chain and handler are
/// skipped.
pub trait Seed<S: Session>: Send + Sync + 'static {
    /// Apply the seed data.
    fn apply(&self, session: S, data: Value) -> impl Future<Output = Result<S, BoxError>> + Send;
}

impl<S, F, Fut, E> Seed<S> for F
where
    S: Session,
    F: Fn(S, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send,
    E: Into<BoxError>,
{
    async fn apply(&self, session: S, data: Value) -> Result<S, BoxError> {
        (self)(session, data).await.map_err(Into::into)
    }
}

/// Dynamic object-safe version of [`Seed`].
pub trait DynSeed<S: Session>: Send + Sync + 'static {
    /// Apply the seed data (dynamic dispatch version).
    fn apply_dyn(&self, session: S, data: Value) -> BoxFuture<'_, Result<S, BoxError>>;
}

impl<S: Session, T: Seed<S>> DynSeed<S> for T {
    fn apply_dyn(&self, session: S, data: Value) -> BoxFuture<'_, Result<S, BoxError>> {
        Box::pin(self.apply(session, data))
    }
}
