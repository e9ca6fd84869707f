//! Read-only physics oracle supplied by the host.

use karto_core::ids::VesselId;

use crate::orbit::Orbit;

/// Host ephemeris. All queries are read-only and always available while a scene is loaded.
pub trait Ephemeris {
    /// Current simulation time (s).
    fn current_ut(&self) -> f64;

    /// Snapshot of the first patch of `vessel`'s trajectory.
    fn orbit_of(&self, vessel: &VesselId) -> Option<Orbit>;

    /// True anomaly (rad) of `orbit` at `ut`.
    fn true_anomaly_at_ut(&self, orbit: &Orbit, ut: f64) -> f64;

    /// The host's own UT for `true_anomaly`. Hosts may answer with a pass in the past; use
    /// [`crate::ut_for_true_anomaly`] for a forward-wrapped result.
    fn ut_for_true_anomaly(&self, orbit: &Orbit, true_anomaly: f64, after_ut: f64) -> f64;

    /// Landed vessels have no meaningful patch transitions.
    fn is_landed(&self, _vessel: &VesselId) -> bool {
        false
    }
}
