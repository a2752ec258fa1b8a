//! The session contract.

/// A long-lived, stateful session that triggers are dispatched against.
///
/// The engine treats the session as opaque and only touches the fields
/// exposed here. It never clears terminal state: once [`is_terminal`]
/// returns `true`, no further middleware or handler runs in the same
/// dispatch.
///
/// [`is_terminal`]: Session::is_terminal
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `Session`",
    label = "missing `Session` implementation",
    note = "Sessions must expose their current action plus mounted and terminal state."
)]
pub trait Session: Send + Sync + 'static {
    /// The entry action that mounted this session.
    fn current_action(&self) -> Option<&str>;

    /// Whether the entry phase has completed.
    fn is_mounted(&self) -> bool;

    /// Record that the entry phase has completed. Called at most once.
    fn mark_mounted(&mut self);

    /// Whether a terminal transition (e.g. a redirect) has been requested.
    fn is_terminal(&self) -> bool;
}
