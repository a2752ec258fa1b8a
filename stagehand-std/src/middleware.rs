//! Middleware declarations and the per-controller declaration table.
//!
//! A [`Middleware`] pairs a step with two optional predicates:
//!
//! - a **scope** over the [`Trigger`] alone, used to decide which chains the
//!   step belongs to when the controller is built;
//! - a **guard** over the live [`DispatchContext`], checked right before the
//!   step runs.
//!
//! Declarations keep their declaration order; it is the execution order.

use crate::chain::Chain;
use stagehand_core::{
    BoxError, Category, DispatchContext, DynStep, Name, Scope, Session, Step, Trigger,
};
use std::{borrow::Cow, future::Future, sync::Arc};

type ScopeFn = Arc<dyn Fn(&Trigger<'_>) -> bool + Send + Sync>;
type GuardFn<S> = Arc<dyn for<'a> Fn(&DispatchContext<'a, S>) -> bool + Send + Sync>;

/// A middleware declaration.
///
/// # Example
///
/// ```rust,ignore
/// let load_user = Middleware::new("load_user", |socket: Socket| async move {
///     Ok::<_, BoxError>(socket.assign("user", "ada"))
/// })
/// .only(Category::Entry, ["index", "show"])
/// .when(|ctx| !ctx.session().is_mounted());
/// ```
pub struct Middleware<S: Session> {
    label: Cow<'static, str>,
    step: Box<dyn DynStep<S>>,
    scope: Option<ScopeFn>,
    guard: Option<GuardFn<S>>,
}

impl<S: Session> Middleware<S> {
    /// A step that receives the session alone.
    pub fn new<F, Fut, E>(label: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(S) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, E>> + Send,
        E: Into<BoxError>,
    {
        Self::from_step(label, SessionStep { f })
    }

    /// A step whose arguments are built from the live dispatch context.
    ///
    /// `args` runs immediately before `f`, against the session left by the
    /// previous step.
    pub fn with_args<B, A, F, Fut, E>(label: impl Into<Cow<'static, str>>, args: B, f: F) -> Self
    where
        B: for<'a> Fn(&DispatchContext<'a, S>) -> A + Send + Sync + 'static,
        A: Send,
        F: Fn(S, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, E>> + Send,
        E: Into<BoxError>,
    {
        Self::from_step(label, ArgsStep { args, f })
    }

    /// A step that receives the session plus a fixed trailing argument.
    pub fn with_extra<T, F, Fut, E>(label: impl Into<Cow<'static, str>>, extra: T, f: F) -> Self
    where
        T: Clone + Send + Sync + 'static,
        F: Fn(S, T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<S, E>> + Send,
        E: Into<BoxError>,
    {
        Self::from_step(label, ExtraStep { extra, f })
    }

    /// Any [`Step`] implementation.
    pub fn from_step<T: Step<S>>(label: impl Into<Cow<'static, str>>, step: T) -> Self {
        Self {
            label: label.into(),
            step: Box::new(step),
            scope: None,
            guard: None,
        }
    }

    /// Restrict the step to triggers accepted by `scope`.
    ///
    /// Scopes only see `(category, name)` and are evaluated when chains are
    /// built. Repeated calls are combined with AND.
    pub fn scope<F>(mut self, scope: F) -> Self
    where
        F: Fn(&Trigger<'_>) -> bool + Send + Sync + 'static,
    {
        let combined: ScopeFn = match self.scope.take() {
            Some(prev) => Arc::new(move |t: &Trigger<'_>| prev(t) && scope(t)),
            None => Arc::new(scope),
        };
        self.scope = Some(combined);
        self
    }

    /// Restrict the step to `category`.
    pub fn on(self, category: Category) -> Self {
        self.scope(move |t| t.category == category)
    }

    /// Restrict the step to the listed names in `category`.
    pub fn only<I, N>(self, category: Category, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        let names: Vec<Name> = names.into_iter().map(Into::into).collect();
        self.scope(move |t| t.category == category && names.iter().any(|n| &**n == t.name))
    }

    /// Exclude the listed names in `category`; other triggers are unaffected.
    pub fn except<I, N>(self, category: Category, names: I) -> Self
    where
        I: IntoIterator<Item = N>,
        N: Into<Name>,
    {
        let names: Vec<Name> = names.into_iter().map(Into::into).collect();
        self.scope(move |t| t.category != category || !names.iter().any(|n| &**n == t.name))
    }

    /// Run the step only while `guard` holds for the live context.
    ///
    /// Repeated calls are combined with AND.
    pub fn when<F>(mut self, guard: F) -> Self
    where
        F: for<'a> Fn(&DispatchContext<'a, S>) -> bool + Send + Sync + 'static,
    {
        let combined: GuardFn<S> = match self.guard.take() {
            Some(prev) => Arc::new(move |ctx: &DispatchContext<'_, S>| prev(ctx) && guard(ctx)),
            None => Arc::new(guard),
        };
        self.guard = Some(combined);
        self
    }

    /// The label used in logs and chain introspection.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Whether the step belongs to `trigger`'s chain.
    pub fn applies_to(&self, trigger: &Trigger<'_>) -> bool {
        self.scope.as_ref().is_none_or(|scope| scope(trigger))
    }

    /// Whether the step should run against the live context.
    pub fn admits(&self, ctx: &DispatchContext<'_, S>) -> bool {
        self.guard.as_ref().is_none_or(|guard| guard(ctx))
    }

    pub(crate) fn step(&self) -> &dyn DynStep<S> {
        &*self.step
    }
}

impl<S: Session> std::fmt::Debug for Middleware<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Middleware")
            .field("label", &self.label)
            .field("scoped", &self.scope.is_some())
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

struct SessionStep<F> {
    f: F,
}

impl<S, F, Fut, E> Step<S> for SessionStep<F>
where
    S: Session,
    F: Fn(S) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send,
    E: Into<BoxError>,
{
    async fn run(&self, session: S, _scope: &Scope<'_>) -> Result<S, BoxError> {
        (self.f)(session).await.map_err(Into::into)
    }
}

struct ArgsStep<B, F> {
    args: B,
    f: F,
}

impl<S, B, A, F, Fut, E> Step<S> for ArgsStep<B, F>
where
    S: Session,
    B: for<'a> Fn(&DispatchContext<'a, S>) -> A + Send + Sync + 'static,
    A: Send,
    F: Fn(S, A) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send,
    E: Into<BoxError>,
{
    async fn run(&self, session: S, scope: &Scope<'_>) -> Result<S, BoxError> {
        let args = (self.args)(&scope.with(&session));
        (self.f)(session, args).await.map_err(Into::into)
    }
}

struct ExtraStep<T, F> {
    extra: T,
    f: F,
}

impl<S, T, F, Fut, E> Step<S> for ExtraStep<T, F>
where
    S: Session,
    T: Clone + Send + Sync + 'static,
    F: Fn(S, T) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<S, E>> + Send,
    E: Into<BoxError>,
{
    async fn run(&self, session: S, _scope: &Scope<'_>) -> Result<S, BoxError> {
        (self.f)(session, self.extra.clone()).await.map_err(Into::into)
    }
}

/// The ordered table of middleware declarations for one controller.
pub struct MiddlewareTable<S: Session> {
    entries: Vec<Arc<Middleware<S>>>,
}

impl<S: Session> MiddlewareTable<S> {
    /// Create an empty table.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append a declaration.
    pub fn declare(&mut self, middleware: Middleware<S>) {
        self.entries.push(Arc::new(middleware));
    }

    /// Compose the chain for `trigger`: every declaration whose scope accepts
    /// it, in declaration order.
    pub fn chain_for(&self, trigger: Trigger<'_>) -> Chain<S> {
        self.entries
            .iter()
            .filter(|m| m.applies_to(&trigger))
            .cloned()
            .collect()
    }

    /// Iterate declarations in order.
    pub fn iter(&self) -> impl Iterator<Item = &Middleware<S>> {
        self.entries.iter().map(|m| &**m)
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Session> Default for MiddlewareTable<S> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::Socket;

    fn noop(label: &'static str) -> Middleware<Socket> {
        Middleware::new(label, |socket: Socket| async move { Ok::<_, BoxError>(socket) })
    }

    #[test]
    fn unscoped_middleware_applies_everywhere() {
        let m = noop("audit");
        assert!(m.applies_to(&Trigger::action("index")));
        assert!(m.applies_to(&Trigger::event("save")));
        assert!(m.applies_to(&Trigger::message("tick")));
    }

    #[test]
    fn only_restricts_to_names_in_category() {
        let m = noop("load").only(Category::Entry, ["index", "show"]);
        assert!(m.applies_to(&Trigger::action("show")));
        assert!(!m.applies_to(&Trigger::action("edit")));
        assert!(!m.applies_to(&Trigger::event("show")));
    }

    #[test]
    fn except_leaves_other_categories_alone() {
        let m = noop("auth").except(Category::Event, ["ping"]);
        assert!(!m.applies_to(&Trigger::event("ping")));
        assert!(m.applies_to(&Trigger::event("save")));
        assert!(m.applies_to(&Trigger::message("ping")));
    }

    #[test]
    fn scopes_combine_with_and() {
        let m = noop("narrow")
            .on(Category::Event)
            .scope(|t| t.name.starts_with("admin_"));
        assert!(m.applies_to(&Trigger::event("admin_delete")));
        assert!(!m.applies_to(&Trigger::event("delete")));
        assert!(!m.applies_to(&Trigger::action("admin_index")));
    }

    #[test]
    fn chain_composition_keeps_declaration_order() {
        let mut table = MiddlewareTable::new();
        table.declare(noop("first"));
        table.declare(noop("entry_only").on(Category::Entry));
        table.declare(noop("last"));

        let chain = table.chain_for(Trigger::event("save"));
        assert_eq!(chain.labels().collect::<Vec<_>>(), ["first", "last"]);

        let chain = table.chain_for(Trigger::action("index"));
        assert_eq!(chain.labels().collect::<Vec<_>>(), ["first", "entry_only", "last"]);
    }
}
