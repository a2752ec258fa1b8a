//! The stock [`Session`] implementation.

use stagehand_core::{Map, Name, Session, Value};

/// A session with a key/value store of assigns.
///
/// A socket becomes terminal once a redirect target is set, and stays that
/// way: there is no API to clear it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Socket {
    action: Option<Name>,
    assigns: Map,
    mounted: bool,
    redirect: Option<String>,
}

impl Socket {
    /// A fresh, unmounted socket with no action.
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh socket that will enter through `action`.
    pub fn for_action(action: impl Into<Name>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    /// Set `key` to `value`, returning the updated socket.
    pub fn assign(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.put(key, value);
        self
    }

    /// Set `key` to `value` in place.
    pub fn put(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.assigns.insert(key.into(), value.into());
    }

    /// Read an assign.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.assigns.get(key)
    }

    /// All assigns.
    pub fn assigns(&self) -> &Map {
        &self.assigns
    }

    /// Request a terminal transition to `to`.
    ///
    /// The first redirect wins; later calls leave the target unchanged.
    pub fn redirect(mut self, to: impl Into<String>) -> Self {
        if self.redirect.is_none() {
            self.redirect = Some(to.into());
        }
        self
    }

    /// The redirect target, if the socket is terminal.
    pub fn redirected_to(&self) -> Option<&str> {
        self.redirect.as_deref()
    }
}

impl Session for Socket {
    fn current_action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    fn is_mounted(&self) -> bool {
        self.mounted
    }

    fn mark_mounted(&mut self) {
        self.mounted = true;
    }

    fn is_terminal(&self) -> bool {
        self.redirect.is_some()
    }
}
