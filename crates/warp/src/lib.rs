//! Warp-to-instant requests, the per-tick overshoot watchdog, and UT targets for orbit events.

pub mod controller;
pub mod editor;
pub mod events;

pub use controller::{
    DEFAULT_OVERSHOOT_MARGIN_S, WarpActuator, WarpController, WarpTarget, WatchdogOutcome,
};
pub use editor::{QUICK_TARGET_S, TargetEditor};
pub use events::{
    OrbitEvent, PATCH_END_LEAD_S, SOI_LEAD_S, SoiTransition, available_events, resolve_event_ut,
    soi_transitions,
};

use karto_maneuver::ManeuverError;
use karto_orbits::OrbitError;
use thiserror::Error;

/// Failures while picking or engaging a warp target.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WarpError {
    #[error(transparent)]
    Orbit(#[from] OrbitError),
    #[error(transparent)]
    Maneuver(#[from] ManeuverError),
    #[error("{kind} is not available: {reason}")]
    EventUnavailable { kind: OrbitEvent, reason: String },
    #[error("no target vessel selected")]
    NoTarget,
}
