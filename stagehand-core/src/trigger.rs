//! Trigger vocabulary: handler categories, dispatch phases and the
//! `(category, name)` pair that selects a handler and its chain.

use std::fmt;
use std::sync::Arc;

/// A registered handler or trigger name.
///
/// Names are reference counted so the canonical copy held by the registry can
/// be handed to chains and invokers without reallocating.
pub type Name = Arc<str>;

/// The registry a handler lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Initial or resumed entry, keyed by the session's current action.
    Entry,
    /// User-originated named actions.
    Event,
    /// Process-originated signals.
    Message,
}

impl Category {
    /// All categories, in registry order.
    pub const ALL: [Category; 3] = [Category::Entry, Category::Event, Category::Message];

    /// Stable index used by per-category tables.
    pub const fn index(self) -> usize {
        match self {
            Category::Entry => 0,
            Category::Event => 1,
            Category::Message => 2,
        }
    }

    /// Lowercase label used in logs and error messages.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Entry => "entry",
            Category::Event => "event",
            Category::Message => "message",
        }
    }

    /// The `ControllerBuilder` method that registers handlers of this category.
    pub const fn builder_method(self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dispatch operation currently running.
///
/// `Entry` and `Resume` both dispatch into the [`Category::Entry`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// First entry into the session.
    Entry,
    /// Parameter update on an already mounted session.
    Resume,
    /// A named event.
    Event,
    /// A process message.
    Message,
}

impl Phase {
    /// The registry this phase dispatches into.
    pub const fn category(self) -> Category {
        match self {
            Phase::Entry | Phase::Resume => Category::Entry,
            Phase::Event => Category::Event,
            Phase::Message => Category::Message,
        }
    }

    /// Lowercase label used in logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Phase::Entry => "entry",
            Phase::Resume => "resume",
            Phase::Event => "event",
            Phase::Message => "message",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A `(category, name)` pair.
///
/// This is everything a middleware scope may look at: it is known before any
/// dispatch happens, so chains can be composed from it ahead of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Trigger<'a> {
    /// Which registry the name belongs to.
    pub category: Category,
    /// The canonical handler name.
    pub name: &'a str,
}

impl<'a> Trigger<'a> {
    /// Create a trigger.
    pub const fn new(category: Category, name: &'a str) -> Self {
        Self { category, name }
    }

    /// An entry trigger for `action`.
    pub const fn action(name: &'a str) -> Self {
        Self::new(Category::Entry, name)
    }

    /// An event trigger.
    pub const fn event(name: &'a str) -> Self {
        Self::new(Category::Event, name)
    }

    /// A message trigger.
    pub const fn message(name: &'a str) -> Self {
        Self::new(Category::Message, name)
    }

    /// The entry action name, if this is an entry trigger.
    pub fn as_action(&self) -> Option<&'a str> {
        (self.category == Category::Entry).then_some(self.name)
    }

    /// The event name, if this is an event trigger.
    pub fn as_event(&self) -> Option<&'a str> {
        (self.category == Category::Event).then_some(self.name)
    }

    /// The message key, if this is a message trigger.
    pub fn as_message(&self) -> Option<&'a str> {
        (self.category == Category::Message).then_some(self.name)
    }
}

impl fmt::Display for Trigger<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} `{}`", self.category, self.name)
    }
}
