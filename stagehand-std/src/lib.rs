//! # stagehand-std
//!
//! The dispatch engine for Stagehand sessions.
//!
//! This crate provides:
//! - **Controllers**: [`Controller`] and its [`ControllerBuilder`]
//! - **Registries**: [`HandlerRegistry`], one table per category
//! - **Middleware**: [`Middleware`] declarations, [`MiddlewareTable`] and the
//!   short-circuiting [`Chain`] runner, plus the [`chain!`] macro
//! - **Hooks**: the session [`Seed`] hook and per-category [`Invoke`] overrides
//! - **Rendering**: the [`Render`] collaborator contract and [`view_name`]
//! - **Stock pieces**: the [`Socket`] session and the [`LogStep`](steps::LogStep)
//! - **Testing**: journals, recording steps and counting handlers

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use stagehand_core;

// Modules
pub mod chain;
pub mod controller;
pub mod invoke;
pub mod middleware;
pub mod registry;
pub mod render;
pub mod seed;
pub mod socket;
pub mod steps;
pub mod testing;

pub use chain::Chain;
pub use controller::{Controller, ControllerBuilder};
pub use invoke::{Call, DynInvoke, Invoke, default_invoke};
pub use middleware::{Middleware, MiddlewareTable};
pub use registry::HandlerRegistry;
pub use render::{Render, view_name};
pub use seed::{DynSeed, Seed};
pub use socket::Socket;
