//! # Dispatch Engine
//!
//! A [`Controller`] owns one handler registry, one middleware table, an
//! optional seed hook and optional per-category invocation overrides. All of
//! it is fixed by [`ControllerBuilder::build`]; afterwards the controller is
//! read-only and can be shared across sessions.
//!
//! Every dispatch walks the same states:
//!
//! ```text
//! Validating -> Chaining -> Handling -> Normalizing
//!                   \-> Halted ------------^
//! ```
//!
//! Validation failures are configuration errors and are returned before any
//! middleware runs. A terminal session during chaining skips the handler.

use crate::{
    chain::Chain,
    invoke::{Call, DynInvoke, Invoke, default_invoke},
    middleware::{Middleware, MiddlewareTable},
    registry::HandlerRegistry,
    render::{Render, view_name},
    seed::{DynSeed, Seed},
};
use stagehand_core::{
    BoxError, Category, DispatchError, Handler, Name, Phase, Reply, Scope, Session, SharedHandler, Trigger,
    Value, shared,
};
use std::collections::HashMap;
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::Instrument;

/// A built, immutable dispatch engine for one controller.
pub struct Controller<S: Session> {
    name: Name,
    view: String,
    handlers: HandlerRegistry<S>,
    middleware: MiddlewareTable<S>,
    chains: [HashMap<Name, Chain<S>>; 3],
    seed: Option<Box<dyn DynSeed<S>>>,
    invokers: [Option<Box<dyn DynInvoke<S>>>; 3],
}

impl<S: Session> Controller<S> {
    /// Start building a controller called `name`.
    pub fn builder(name: impl Into<Name>) -> ControllerBuilder<S> {
        ControllerBuilder::new(name)
    }

    /// The controller's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The view identifier passed to renderers.
    pub fn view_name(&self) -> &str {
        &self.view
    }

    /// The handler registry.
    pub fn handlers(&self) -> &HandlerRegistry<S> {
        &self.handlers
    }

    /// The middleware declarations, in order.
    pub fn middleware(&self) -> &MiddlewareTable<S> {
        &self.middleware
    }

    /// The chain that runs before the `category` handler called `name`.
    pub fn chain(&self, category: Category, name: &str) -> Chain<S> {
        match self.chains[category.index()].get(name) {
            Some(chain) => chain.clone(),
            None => self.middleware.chain_for(Trigger::new(category, name)),
        }
    }

    /// First entry into a session.
    ///
    /// Resolves the session's current action, applies the seed hook (if any)
    /// to `seed`, then runs the action's chain and handler with `params`.
    /// The session is not marked mounted here; the first [`resume`] does that.
    ///
    /// [`resume`]: Controller::resume
    pub async fn entry(
        &self,
        session: S,
        params: Value,
        seed: Option<Value>,
    ) -> Result<Reply<S>, DispatchError> {
        let (name, handler) = self.resolve_action(&session)?;

        let session = match &self.seed {
            Some(hook) => hook.apply_dyn(session, seed.unwrap_or_default()).await?,
            None => session,
        };
        if session.is_terminal() {
            #[cfg(feature = "tracing")]
            tracing::debug!(controller = %self.name, action = %name, "seed hook halted entry");
            return Ok(Reply::halted(Phase::Entry, session));
        }

        self.dispatch(Phase::Entry, name, handler, session, params)
            .await
    }

    /// A parameter update on an entered session.
    ///
    /// The first call after [`entry`] only marks the session mounted and
    /// returns it unchanged. Later calls rerun the current action's chain and
    /// handler with the new `params`.
    ///
    /// [`entry`]: Controller::entry
    pub async fn resume(&self, mut session: S, params: Value) -> Result<Reply<S>, DispatchError> {
        if !session.is_mounted() {
            session.mark_mounted();
            #[cfg(feature = "tracing")]
            tracing::trace!(controller = %self.name, "session mounted");
            return Ok(Reply::Continue(session));
        }

        let (name, handler) = self.resolve_action(&session)?;
        self.dispatch(Phase::Resume, name, handler, session, params)
            .await
    }

    /// A named event with its payload.
    ///
    /// `name` is only compared against registered event names; unknown text
    /// is reported and dropped, never retained.
    pub async fn event(
        &self,
        session: S,
        name: &str,
        payload: Value,
    ) -> Result<Reply<S>, DispatchError> {
        let Some((name, handler)) = self.handlers.resolve(Category::Event, name) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(controller = %self.name, event = name, "unknown event");
            return Err(self.handlers.unknown(Category::Event, name));
        };
        let (name, handler) = (name.clone(), handler.clone());

        self.dispatch(Phase::Event, name, handler, session, payload)
            .await
    }

    /// A process message.
    ///
    /// Routed on [`Value::dispatch_key`]; the handler receives the full
    /// payload, not just the key.
    pub async fn message(&self, session: S, payload: Value) -> Result<Reply<S>, DispatchError> {
        let Some(key) = payload.dispatch_key() else {
            #[cfg(feature = "tracing")]
            tracing::warn!(controller = %self.name, %payload, "unroutable message");
            return Err(DispatchError::UnroutableMessage {
                controller: self.name.clone(),
                payload: payload.to_string(),
            });
        };
        let Some((name, handler)) = self.handlers.resolve(Category::Message, key) else {
            #[cfg(feature = "tracing")]
            tracing::warn!(controller = %self.name, message = key, "unknown message");
            return Err(self.handlers.unknown(Category::Message, key));
        };
        let (name, handler) = (name.clone(), handler.clone());

        self.dispatch(Phase::Message, name, handler, session, payload)
            .await
    }

    /// Render the session's current action through `renderer`.
    pub fn render<R: Render<S>>(&self, renderer: &R, session: &S) -> Result<R::Output, DispatchError> {
        let action = session
            .current_action()
            .ok_or_else(|| self.missing_action())?;
        Ok(renderer.render(&self.view, action, session)?)
    }

    fn resolve_action(&self, session: &S) -> Result<(Name, SharedHandler<S>), DispatchError> {
        let action = session
            .current_action()
            .ok_or_else(|| self.missing_action())?;
        match self.handlers.resolve(Category::Entry, action) {
            Some((name, handler)) => Ok((name.clone(), handler.clone())),
            None => {
                #[cfg(feature = "tracing")]
                tracing::warn!(controller = %self.name, action, "unknown action");
                Err(self.handlers.unknown(Category::Entry, action))
            }
        }
    }

    fn missing_action(&self) -> DispatchError {
        DispatchError::MissingAction {
            controller: self.name.clone(),
        }
    }

    async fn dispatch(
        &self,
        phase: Phase,
        name: Name,
        handler: SharedHandler<S>,
        session: S,
        input: Value,
    ) -> Result<Reply<S>, DispatchError> {
        #[cfg(feature = "tracing")]
        let span = tracing::debug_span!(
            "dispatch",
            controller = %self.name,
            phase = %phase,
            name = %name,
        );

        let run = self.run_phase(phase, name, handler, session, input);

        #[cfg(feature = "tracing")]
        let run = run.instrument(span);

        run.await.map_err(DispatchError::Failed)
    }

    async fn run_phase(
        &self,
        phase: Phase,
        name: Name,
        handler: SharedHandler<S>,
        session: S,
        input: Value,
    ) -> Result<Reply<S>, BoxError> {
        let category = phase.category();
        let chain = self.chain(category, &name);

        let session = {
            let scope = Scope::new(phase, Trigger::new(category, &name), &input);
            chain.run(session, &scope).await?
        };
        if session.is_terminal() {
            #[cfg(feature = "tracing")]
            tracing::debug!("session terminal after chain, handler skipped");
            return Ok(Reply::halted(phase, session));
        }

        let call = Call::new(category, name, handler, session, input);
        let reply = match &self.invokers[category.index()] {
            Some(invoker) => invoker.invoke_dyn(call).await?,
            None => default_invoke(call).await?,
        };
        Ok(reply.normalize(phase))
    }
}

/// Builder for a [`Controller`].
///
/// Registration errors are held until [`build`](ControllerBuilder::build) so
/// that declarations can be chained.
pub struct ControllerBuilder<S: Session> {
    name: Name,
    view: Option<String>,
    handlers: HandlerRegistry<S>,
    middleware: MiddlewareTable<S>,
    seed: Option<Box<dyn DynSeed<S>>>,
    invokers: [Option<Box<dyn DynInvoke<S>>>; 3],
    error: Option<DispatchError>,
}

impl<S: Session> ControllerBuilder<S> {
    /// Create a builder for a controller called `name`.
    pub fn new(name: impl Into<Name>) -> Self {
        let name = name.into();
        Self {
            handlers: HandlerRegistry::new(name.clone()),
            name,
            view: None,
            middleware: MiddlewareTable::new(),
            seed: None,
            invokers: [None, None, None],
            error: None,
        }
    }

    /// Register an entry handler for `action`.
    pub fn entry<H: Handler<S>>(self, action: impl Into<Name>, handler: H) -> Self {
        self.register(Category::Entry, action, shared(handler))
    }

    /// Register an event handler.
    pub fn event<H: Handler<S>>(self, name: impl Into<Name>, handler: H) -> Self {
        self.register(Category::Event, name, shared(handler))
    }

    /// Register a message handler for the dispatch key `name`.
    pub fn message<H: Handler<S>>(self, name: impl Into<Name>, handler: H) -> Self {
        self.register(Category::Message, name, shared(handler))
    }

    /// Register an already shared handler.
    ///
    /// Registering the same `Arc` twice under one name is ignored.
    pub fn register(
        mut self,
        category: Category,
        name: impl Into<Name>,
        handler: SharedHandler<S>,
    ) -> Self {
        if let Err(err) = self.handlers.register(category, name, handler) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Append a middleware declaration.
    pub fn middleware(mut self, middleware: Middleware<S>) -> Self {
        self.middleware.declare(middleware);
        self
    }

    /// Set the session-seed hook applied during entry.
    pub fn seed<H: Seed<S>>(mut self, hook: H) -> Self {
        self.seed = Some(Box::new(hook));
        self
    }

    /// Override handler invocation for `category`.
    pub fn around<I: Invoke<S>>(mut self, category: Category, invoker: I) -> Self {
        self.invokers[category.index()] = Some(Box::new(invoker));
        self
    }

    /// Override the view identifier derived from the controller name.
    pub fn view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }

    /// Freeze the controller, composing every registered name's chain.
    pub fn build(self) -> Result<Controller<S>, DispatchError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut chains: [HashMap<Name, Chain<S>>; 3] = Default::default();
        for category in Category::ALL {
            for name in self.handlers.names(category) {
                let chain = self.middleware.chain_for(Trigger::new(category, name));
                chains[category.index()].insert(Arc::clone(name), chain);
            }
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            controller = %self.name,
            entries = self.handlers.len(Category::Entry),
            events = self.handlers.len(Category::Event),
            messages = self.handlers.len(Category::Message),
            middleware = self.middleware.len(),
            "controller built"
        );

        Ok(Controller {
            view: self.view.unwrap_or_else(|| view_name(&self.name)),
            name: self.name,
            handlers: self.handlers,
            middleware: self.middleware,
            chains,
            seed: self.seed,
            invokers: self.invokers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socket::Socket;
    use crate::testing::CountingHandler;

    fn noop(label: &'static str) -> Middleware<Socket> {
        Middleware::new(label, |socket: Socket| async move { Ok::<_, BoxError>(socket) })
    }

    #[test]
    fn view_name_defaults_from_controller_name() {
        let controller = Controller::<Socket>::builder("Shop.CartLive").build().unwrap();
        assert_eq!(controller.view_name(), "Shop.CartView");

        let controller = Controller::<Socket>::builder("Shop.CartLive")
            .view("Shop.Checkout")
            .build()
            .unwrap();
        assert_eq!(controller.view_name(), "Shop.Checkout");
    }

    #[test]
    fn first_registration_error_is_reported_by_build() {
        let err = Controller::<Socket>::builder("PageLive")
            .event("save", CountingHandler::new())
            .event("save", CountingHandler::new())
            .message("tick", CountingHandler::new())
            .message("tick", CountingHandler::new())
            .build()
            .err()
            .unwrap();

        assert!(matches!(
            err,
            DispatchError::DuplicateHandler { category: Category::Event, ref name, .. } if name == "save"
        ));
    }

    #[test]
    fn same_shared_handler_may_be_registered_twice() {
        let handler = shared::<Socket, _>(CountingHandler::new());
        let controller = Controller::builder("PageLive")
            .register(Category::Event, "save", handler.clone())
            .register(Category::Event, "save", handler)
            .build()
            .unwrap();
        assert_eq!(controller.handlers().len(Category::Event), 1);
    }

    #[test]
    fn chains_are_composed_per_registered_name() {
        let controller = Controller::builder("PageLive")
            .middleware(noop("all"))
            .middleware(noop("show_only").only(Category::Entry, ["show"]))
            .middleware(noop("events").on(Category::Event))
            .entry("index", CountingHandler::new())
            .entry("show", CountingHandler::new())
            .event("save", CountingHandler::new())
            .build()
            .unwrap();

        let labels = |c: Category, n: &str| {
            controller
                .chain(c, n)
                .labels()
                .map(str::to_owned)
                .collect::<Vec<_>>()
        };
        assert_eq!(labels(Category::Entry, "index"), ["all"]);
        assert_eq!(labels(Category::Entry, "show"), ["all", "show_only"]);
        assert_eq!(labels(Category::Event, "save"), ["all", "events"]);
        assert_eq!(labels(Category::Message, "tick"), ["all"]);
    }
}
