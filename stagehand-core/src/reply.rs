//! Handler results and their per-phase normalization.

use crate::{session::Session, trigger::Phase, value::Map, value::Value};

/// Phase-specific options carried by [`Reply::ContinueWith`].
pub type Options = Map;

/// The result of a dispatch.
///
/// Handlers may return a bare session, which becomes [`Reply::Continue`], or
/// any variant directly. The engine then [normalizes] it for the running
/// phase.
///
/// [normalizes]: Reply::normalize
#[derive(Debug, Clone, PartialEq)]
pub enum Reply<S> {
    /// Carry on with the updated session.
    Continue(S),
    /// Carry on, with options for the entry phase.
    ContinueWith(S, Options),
    /// The entry phase ended in a terminal transition.
    Redirect(S),
    /// A value for the originator alongside the session. Never rewritten.
    Respond(S, Value),
}

impl<S> Reply<S> {
    /// Borrow the session.
    pub fn session(&self) -> &S {
        match self {
            Reply::Continue(s) | Reply::ContinueWith(s, _) | Reply::Redirect(s) | Reply::Respond(s, _) => s,
        }
    }

    /// Take the session, dropping any options or response.
    pub fn into_session(self) -> S {
        match self {
            Reply::Continue(s) | Reply::ContinueWith(s, _) | Reply::Redirect(s) | Reply::Respond(s, _) => s,
        }
    }

    /// Returns `true` for [`Reply::Redirect`].
    pub fn is_redirect(&self) -> bool {
        matches!(self, Reply::Redirect(_))
    }
}

impl<S: Session> Reply<S> {
    /// Shape `self` into what `phase` returns.
    ///
    /// Entry turns a terminal [`Continue`](Reply::Continue) into
    /// [`Redirect`](Reply::Redirect). Every other phase only ever continues,
    /// so options and redirects collapse into `Continue` (the terminal flag
    /// stays on the session). `Respond` is passed through untouched.
    pub fn normalize(self, phase: Phase) -> Self {
        match (phase, self) {
            (Phase::Entry, Reply::Continue(s)) if s.is_terminal() => Reply::Redirect(s),
            (Phase::Entry, reply) => reply,
            (_, Reply::ContinueWith(s, _) | Reply::Redirect(s)) => Reply::Continue(s),
            (_, reply) => reply,
        }
    }

    /// The result of a dispatch that stopped before reaching its handler.
    pub fn halted(phase: Phase, session: S) -> Self {
        match phase {
            Phase::Entry => Reply::Redirect(session),
            Phase::Resume | Phase::Event | Phase::Message => Reply::Continue(session),
        }
    }
}

/// Conversion of handler output into a [`Reply`].
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be turned into a `Reply<{S}>`",
    label = "handlers must return the session or a `Reply`",
    note = "Return the session itself, or wrap it in a `Reply` variant."
)]
pub trait IntoReply<S> {
    /// Convert the output.
    fn into_reply(self) -> Reply<S>;
}

impl<S: Session> IntoReply<S> for S {
    fn into_reply(self) -> Reply<S> {
        Reply::Continue(self)
    }
}

impl<S: Session> IntoReply<S> for Reply<S> {
    fn into_reply(self) -> Reply<S> {
        self
    }
}
