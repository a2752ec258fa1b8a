//! Handler registry.
//!
//! One map per [`Category`], keyed by canonical [`Name`]. Lookups take a
//! borrowed `&str`, so names that were never registered are never copied
//! into the registry.

use stagehand_core::{Category, DispatchError, Name, Session, SharedHandler, same_handler};
use std::collections::HashMap;

/// Per-controller mapping from `(category, name)` to a handler.
pub struct HandlerRegistry<S: Session> {
    controller: Name,
    tables: [HashMap<Name, SharedHandler<S>>; 3],
}

impl<S: Session> HandlerRegistry<S> {
    /// Create an empty registry owned by `controller`.
    pub fn new(controller: impl Into<Name>) -> Self {
        Self {
            controller: controller.into(),
            tables: Default::default(),
        }
    }

    /// The owning controller's name.
    pub fn controller(&self) -> &Name {
        &self.controller
    }

    /// Bind `name` to `handler` in `category`.
    ///
    /// Binding the same shared handler again is a no-op; binding a different
    /// one fails with [`DispatchError::DuplicateHandler`].
    pub fn register(
        &mut self,
        category: Category,
        name: impl Into<Name>,
        handler: SharedHandler<S>,
    ) -> Result<(), DispatchError> {
        let name = name.into();
        let table = &mut self.tables[category.index()];

        if let Some(existing) = table.get(&name) {
            if same_handler(existing, &handler) {
                return Ok(());
            }
            return Err(DispatchError::DuplicateHandler {
                controller: self.controller.clone(),
                category,
                name: name.to_string(),
            });
        }

        table.insert(name, handler);
        Ok(())
    }

    /// Find the canonical name and handler for `name` in `category`.
    pub fn resolve(&self, category: Category, name: &str) -> Option<(&Name, &SharedHandler<S>)> {
        self.tables[category.index()].get_key_value(name)
    }

    /// Find the handler for `name` in `category`.
    pub fn lookup(&self, category: Category, name: &str) -> Result<&SharedHandler<S>, DispatchError> {
        self.resolve(category, name)
            .map(|(_, handler)| handler)
            .ok_or_else(|| self.unknown(category, name))
    }

    /// Whether `name` is registered in `category`.
    pub fn contains(&self, category: Category, name: &str) -> bool {
        self.tables[category.index()].contains_key(name)
    }

    /// Registered names in `category`, in no particular order.
    pub fn names(&self, category: Category) -> impl Iterator<Item = &Name> + '_ {
        self.tables[category.index()].keys()
    }

    /// Number of handlers in `category`.
    pub fn len(&self, category: Category) -> usize {
        self.tables[category.index()].len()
    }

    /// Whether no handler is registered at all.
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(HashMap::is_empty)
    }

    pub(crate) fn unknown(&self, category: Category, name: &str) -> DispatchError {
        DispatchError::UnknownHandler {
            controller: self.controller.clone(),
            category,
            name: name.to_owned(),
        }
    }
}
