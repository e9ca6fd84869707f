//! Maneuver planning and time-warp engine for a patched-conic flight simulator.
//!
//! The engine talks to its host through three traits (`Ephemeris`, `ManeuverActuator`,
//! `WarpActuator`). `sim` provides an in-memory host so front-ends and tests can run without one.

pub mod scenario;
pub mod session;
pub mod sim;

pub use karto_config as config;
pub use karto_core as common;
pub use karto_export as export;
pub use karto_maneuver as maneuver;
pub use karto_orbits as orbits;
pub use karto_warp as warp;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
