//! Exclusion-curve computations for macroscopic dark matter.
//!
//! The workspace crates are re-exported here so front-ends (CLI, notebooks via
//! bindings, tests) depend on a single library.

pub mod run;

pub use macro_config as config;
pub use macro_core as core;
pub use macro_density as density;
pub use macro_export as export;
pub use macro_integrator as integrator;
pub use macro_orbits as orbits;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
