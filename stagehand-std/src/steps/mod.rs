//! Stock middleware steps.

mod logging;

pub use logging::LogStep;
