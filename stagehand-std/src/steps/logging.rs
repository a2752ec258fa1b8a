//! Logging step for dispatch observation.

use stagehand_core::{BoxError, Scope, Session, Step};

/// A step that logs the trigger it runs for and passes the session through.
///
/// Logs at `info` when the `tracing` feature is enabled; otherwise it does
/// nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogStep;

impl<S: Session> Step<S> for LogStep {
    async fn run(&self, session: S, scope: &Scope<'_>) -> Result<S, BoxError> {
        #[cfg(feature = "tracing")]
        {
            let trigger = scope.trigger();
            tracing::info!(
                phase = %scope.phase(),
                category = %trigger.category,
                name = trigger.name,
                input = %scope.input(),
                mounted = session.is_mounted(),
                "processing trigger"
            );
        }
        #[cfg(not(feature = "tracing"))]
        {
            let _ = scope;
        }
        Ok(session)
    }
}
