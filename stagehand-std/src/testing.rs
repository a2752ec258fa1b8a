//! Testing utilities for Stagehand.
//!
//! These make it easy to assert which steps and handlers ran, and in what
//! order.
//!
//! # Features
//!
//! - [`Journal`]: a shared, ordered log of labels
//! - [`RecordingStep`]: a step that writes its label to a journal
//! - [`HaltingStep`]: a step that redirects a [`Socket`] and stops the chain
//! - [`CountingHandler`]: a handler that counts calls and keeps their inputs

use crate::socket::Socket;
use stagehand_core::{BoxError, Handler, Reply, Scope, Session, Step, Value};
use std::{
    borrow::Cow,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicUsize, Ordering},
    },
};

// ============================================================================
// Journal
// ============================================================================

/// An ordered, cloneable record of what ran.
///
/// # Example
///
/// ```rust,ignore
/// let journal = Journal::new();
/// let controller = Controller::builder("PageLive")
///     .middleware(Middleware::from_step("a", RecordingStep::new("a", &journal)))
///     .entry("index", handler)
///     .build()?;
///
/// controller.entry(Socket::for_action("index"), Value::Nil, None).await?;
/// assert_eq!(journal.entries(), ["a"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    /// Create an empty journal.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.lock().push(entry.into());
    }

    /// A snapshot of the entries, oldest first.
    pub fn entries(&self) -> Vec<String> {
        self.lock().clone()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop all entries.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// ============================================================================
// Recording Step
// ============================================================================

/// A step that records its label and passes the session through.
pub struct RecordingStep {
    label: Cow<'static, str>,
    journal: Journal,
}

impl RecordingStep {
    /// Record `label` into `journal` every time the step runs.
    pub fn new(label: impl Into<Cow<'static, str>>, journal: &Journal) -> Self {
        Self {
            label: label.into(),
            journal: journal.clone(),
        }
    }
}

impl<S: Session> Step<S> for RecordingStep {
    async fn run(&self, session: S, _scope: &Scope<'_>) -> Result<S, BoxError> {
        self.journal.record(self.label.as_ref());
        Ok(session)
    }
}

// ============================================================================
// Halting Step
// ============================================================================

/// A step that redirects the socket, making it terminal.
///
/// Records `halt:<target>` into its journal.
pub struct HaltingStep {
    to: String,
    journal: Journal,
}

impl HaltingStep {
    /// Redirect to `to` when run.
    pub fn new(to: impl Into<String>, journal: &Journal) -> Self {
        Self {
            to: to.into(),
            journal: journal.clone(),
        }
    }
}

impl Step<Socket> for HaltingStep {
    async fn run(&self, session: Socket, _scope: &Scope<'_>) -> Result<Socket, BoxError> {
        self.journal.record(format!("halt:{}", self.to));
        Ok(session.redirect(self.to.clone()))
    }
}

// ============================================================================
// Counting Handler
// ============================================================================

/// A handler that counts invocations and keeps the inputs it saw.
///
/// The session is returned unchanged.
///
/// # Example
///
/// ```rust,ignore
/// let counter = CountingHandler::new();
/// let controller = Controller::builder("PageLive")
///     .event("save", counter.clone())
///     .build()?;
///
/// controller.event(socket, "save", Value::Nil).await?;
/// assert_eq!(counter.count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
    inputs: Arc<Mutex<Vec<Value>>>,
}

impl CountingHandler {
    /// Create a new counting handler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of calls so far.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }

    /// Inputs received, oldest first.
    pub fn inputs(&self) -> Vec<Value> {
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Reset the counter and forget inputs.
    pub fn reset(&self) {
        self.count.store(0, Ordering::SeqCst);
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl<S: Session> Handler<S> for CountingHandler {
    async fn call(&self, session: S, input: Value) -> Result<Reply<S>, BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        self.inputs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(input);
        Ok(Reply::Continue(session))
    }
}
