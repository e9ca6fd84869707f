//! Orbit snapshots, the host ephemeris contract, and node/UT geometry.

pub mod ephemeris;
pub mod geometry;
pub mod kepler;
pub mod orbit;

pub use ephemeris::Ephemeris;
pub use geometry::{ascending_node_true_anomaly, descending_node_true_anomaly, ut_for_true_anomaly};
pub use orbit::{Body, Orbit, OrbitalElements, PatchTransition, Patches};

use karto_core::ids::VesselId;
use thiserror::Error;

/// Failures raised while turning orbit geometry into UT targets.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrbitError {
    #[error("orbits are around different bodies ({0} and {1})")]
    IncompatibleFrames(String, String),
    #[error("orbit around {body} does not repeat")]
    NonPeriodicOrbit { body: String },
    #[error("vessel '{0}' has no orbit")]
    NoOrbit(VesselId),
    #[error("orbit never reaches radius {0:.1} m")]
    NoSuchRadius(f64),
}
