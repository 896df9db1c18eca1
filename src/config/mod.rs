//! Policy configuration for the payroll run engine.
//!
//! This module provides the [`EnginePolicy`] type and the [`PolicyLoader`]
//! for reading it from YAML files.

mod loader;
mod types;

pub use loader::PolicyLoader;
pub use types::EnginePolicy;
