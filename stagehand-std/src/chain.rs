//! Middleware chains and the short-circuit runner.
//!
//! A [`Chain`] is the ordered subsequence of a controller's middleware that
//! applies to one `(category, name)`. Running it threads the session through
//! each step and stops at the first terminal session.
//!
//! For ad hoc composition inside a handler body, the [`chain!`](crate::chain!)
//! macro applies the same short-circuit rule to plain async closures.

use crate::middleware::Middleware;
use stagehand_core::{BoxError, Scope, Session};
use std::sync::Arc;

/// An executable middleware chain.
pub struct Chain<S: Session> {
    steps: Arc<[Arc<Middleware<S>>]>,
}

impl<S: Session> Chain<S> {
    /// A chain with no steps.
    pub fn empty() -> Self {
        Self {
            steps: Arc::from(Vec::new()),
        }
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the chain has no steps.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step labels in execution order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.steps.iter().map(|m| m.label())
    }

    /// Run the chain.
    ///
    /// Before each step the session is checked: once it is terminal, the
    /// remaining steps are skipped and the session is returned as-is. A step
    /// whose guard rejects the live context is skipped. Errors propagate
    /// unchanged.
    pub async fn run(&self, mut session: S, scope: &Scope<'_>) -> Result<S, BoxError> {
        for middleware in self.steps.iter() {
            if session.is_terminal() {
                #[cfg(feature = "tracing")]
                tracing::debug!(step = middleware.label(), "session terminal, chain halted");
                return Ok(session);
            }

            if !middleware.admits(&scope.with(&session)) {
                #[cfg(feature = "tracing")]
                tracing::trace!(step = middleware.label(), "guard rejected, step skipped");
                continue;
            }

            #[cfg(feature = "tracing")]
            tracing::trace!(step = middleware.label(), "running step");

            session = middleware.step().run_dyn(session, scope).await?;
        }
        Ok(session)
    }
}

impl<S: Session> Clone for Chain<S> {
    fn clone(&self) -> Self {
        Self {
            steps: Arc::clone(&self.steps),
        }
    }
}

impl<S: Session> Default for Chain<S> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<S: Session> FromIterator<Arc<Middleware<S>>> for Chain<S> {
    fn from_iter<I: IntoIterator<Item = Arc<Middleware<S>>>>(iter: I) -> Self {
        Self {
            steps: iter.into_iter().collect(),
        }
    }
}

impl<S: Session> std::fmt::Debug for Chain<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.labels()).finish()
    }
}

/// Thread a session through async steps, stopping once it turns terminal.
///
/// Each step is a callable taking the session and returning a future of
/// `Result<session, E>` where `E: Into<BoxError>`. The macro evaluates to a
/// future of `Result<session, BoxError>`.
///
/// # Example
///
/// ```rust,ignore
/// let socket = chain!(socket, load_user, require_admin, |s: Socket| async move {
///     Ok::<_, BoxError>(s.assign("ready", true))
/// })
/// .await?;
/// ```
#[macro_export]
macro_rules! chain {
    ($session:expr $(, $step:expr)* $(,)?) => {
        async move {
            #[allow(unused_mut)]
            let mut session = $session;
            $(
                if !$crate::stagehand_core::Session::is_terminal(&session) {
                    session = ($step)(session)
                        .await
                        .map_err(::core::convert::Into::<$crate::stagehand_core::BoxError>::into)?;
                }
            )*
            ::core::result::Result::<_, $crate::stagehand_core::BoxError>::Ok(session)
        }
    };
}
