//! # Dispatch Context
//!
//! Every dispatch builds a [`Scope`]: the phase, the resolved [`Trigger`] and
//! the trigger's input. Pairing a scope with the *current* session yields the
//! [`DispatchContext`] that middleware guards and argument builders read.
//!
//! The context is rebuilt before every step, so `session()` always reflects
//! the effects of the steps that already ran.

use crate::{
    session::Session,
    trigger::{Category, Phase, Trigger},
    value::Value,
};

/// The session-independent part of a dispatch.
#[derive(Debug, Clone, Copy)]
pub struct Scope<'a> {
    phase: Phase,
    trigger: Trigger<'a>,
    input: &'a Value,
}

impl<'a> Scope<'a> {
    /// Create a scope for `trigger` in `phase`, carrying `input`.
    pub fn new(phase: Phase, trigger: Trigger<'a>, input: &'a Value) -> Self {
        debug_assert_eq!(phase.category(), trigger.category);
        Self {
            phase,
            trigger,
            input,
        }
    }

    /// The running phase.
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// The resolved trigger.
    pub fn trigger(&self) -> Trigger<'a> {
        self.trigger
    }

    /// The raw trigger input (params or payload).
    pub fn input(&self) -> &'a Value {
        self.input
    }

    /// Pair this scope with the current session.
    pub fn with<'s, S: Session>(&'s self, session: &'s S) -> DispatchContext<'s, S> {
        DispatchContext {
            scope: self,
            session,
        }
    }
}

/// The live view of a dispatch, as seen by guards and argument builders.
///
/// Exactly one of [`action`], [`event`] and [`message`] is set.
///
/// [`action`]: DispatchContext::action
/// [`event`]: DispatchContext::event
/// [`message`]: DispatchContext::message
pub struct DispatchContext<'a, S> {
    scope: &'a Scope<'a>,
    session: &'a S,
}

impl<'a, S: Session> DispatchContext<'a, S> {
    /// The entry action name, for entry and resume dispatches.
    pub fn action(&self) -> Option<&'a str> {
        self.scope.trigger.as_action()
    }

    /// The event name, for event dispatches.
    pub fn event(&self) -> Option<&'a str> {
        self.scope.trigger.as_event()
    }

    /// The message dispatch key, for message dispatches.
    pub fn message(&self) -> Option<&'a str> {
        self.scope.trigger.as_message()
    }

    /// Entry params or event payload.
    pub fn params(&self) -> Option<&'a Value> {
        (self.scope.trigger.category != Category::Message).then_some(self.scope.input)
    }

    /// The full message payload, for message dispatches.
    pub fn payload(&self) -> Option<&'a Value> {
        (self.scope.trigger.category == Category::Message).then_some(self.scope.input)
    }

    /// The session as left by the previous step.
    pub fn session(&self) -> &'a S {
        self.session
    }

    /// The running phase.
    pub fn phase(&self) -> Phase {
        self.scope.phase
    }

    /// The resolved trigger.
    pub fn trigger(&self) -> Trigger<'a> {
        self.scope.trigger
    }
}

impl<S> Clone for DispatchContext<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for DispatchContext<'_, S> {}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    impl Session for Bare {
        fn current_action(&self) -> Option<&str> {
            None
        }
        fn is_mounted(&self) -> bool {
            false
        }
        fn mark_mounted(&mut self) {}
        fn is_terminal(&self) -> bool {
            false
        }
    }

    #[test]
    fn message_context_exposes_payload_only() {
        let payload = Value::atom("refresh");
        let scope = Scope::new(Phase::Message, Trigger::message("refresh"), &payload);
        let ctx = scope.with(&Bare);

        assert_eq!(ctx.message(), Some("refresh"));
        assert_eq!(ctx.action(), None);
        assert_eq!(ctx.event(), None);
        assert_eq!(ctx.params(), None);
        assert_eq!(ctx.payload(), Some(&payload));
    }

    #[test]
    fn entry_context_exposes_params() {
        let params = Value::map([("id", Value::Int(1))]);
        let scope = Scope::new(Phase::Resume, Trigger::action("show"), &params);
        let ctx = scope.with(&Bare);

        assert_eq!(ctx.action(), Some("show"));
        assert_eq!(ctx.phase(), Phase::Resume);
        assert_eq!(ctx.params().and_then(|p| p.get("id")), Some(&Value::Int(1)));
        assert_eq!(ctx.payload(), None);
    }
}
