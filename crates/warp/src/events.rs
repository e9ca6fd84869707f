//! Orbit events a warp can target, resolved into absolute UT.

use std::f64::consts::{PI, TAU};
use std::fmt;

use karto_core::ids::VesselId;
use karto_orbits::{
    Ephemeris, Orbit, OrbitError, PatchTransition, ascending_node_true_anomaly,
    descending_node_true_anomaly, ut_for_true_anomaly,
};

use crate::WarpError;

/// Default stop ahead of a sphere-of-influence change (s).
pub const SOI_LEAD_S: f64 = 10.0;
/// Default stop ahead of the end of the current patch (s).
pub const PATCH_END_LEAD_S: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrbitEvent {
    Apoapsis,
    Periapsis,
    AtmosphereEntry,
    AtmosphereExit,
    /// The n-th upcoming sphere-of-influence change, counted from zero.
    SoiTransition(usize),
    /// End of the current patch, whatever follows it.
    PatchEnd,
    AscendingNode,
    DescendingNode,
}

impl fmt::Display for OrbitEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Apoapsis => f.write_str("apoapsis"),
            Self::Periapsis => f.write_str("periapsis"),
            Self::AtmosphereEntry => f.write_str("atmosphere entry"),
            Self::AtmosphereExit => f.write_str("atmosphere exit"),
            Self::SoiTransition(n) => write!(f, "SOI transition {}", n + 1),
            Self::PatchEnd => f.write_str("patch end"),
            Self::AscendingNode => f.write_str("ascending node"),
            Self::DescendingNode => f.write_str("descending node"),
        }
    }
}

/// One upcoming sphere-of-influence change.
#[derive(Debug, Clone, PartialEq)]
pub struct SoiTransition {
    /// Body whose sphere the trajectory enters.
    pub next_body: String,
    pub ut: f64,
}

/// Walk the patch chain and list every transition into a following active patch.
pub fn soi_transitions(orbit: &Orbit, landed: bool) -> Vec<SoiTransition> {
    if landed {
        return Vec::new();
    }
    orbit
        .patches()
        .take_while(|patch| patch.end_transition != PatchTransition::Final && patch.active)
        .filter_map(|patch| {
            let next = patch.next_patch.as_deref().filter(|next| next.active)?;
            Some(SoiTransition {
                next_body: next.body.name.clone(),
                ut: patch.end_ut,
            })
        })
        .collect()
}

/// UT of `event` on `vessel`'s current orbit, strictly after the current clock where the event
/// can recur. `lead_s` is subtracted from patch-transition events only.
pub fn resolve_event_ut<H>(
    host: &H,
    vessel: &VesselId,
    target: Option<&VesselId>,
    event: OrbitEvent,
    lead_s: f64,
) -> Result<f64, WarpError>
where
    H: Ephemeris + ?Sized,
{
    let orbit = host
        .orbit_of(vessel)
        .ok_or_else(|| OrbitError::NoOrbit(vessel.clone()))?;
    let now = host.current_ut();
    let unavailable = |reason: &str| WarpError::EventUnavailable {
        kind: event,
        reason: reason.to_owned(),
    };

    match event {
        OrbitEvent::Apoapsis => {
            if !orbit.is_elliptical() {
                return Err(unavailable("orbit has no apoapsis"));
            }
            Ok(next_pass(host, &orbit, PI, now)?)
        }
        OrbitEvent::Periapsis => match next_pass(host, &orbit, 0.0, now) {
            Ok(ut) => Ok(ut),
            Err(OrbitError::NonPeriodicOrbit { .. }) => Err(unavailable("periapsis already passed")),
            Err(err) => Err(err.into()),
        },
        OrbitEvent::AtmosphereEntry | OrbitEvent::AtmosphereExit => {
            let depth = orbit.body.atmosphere_depth_m;
            let dips_in = orbit.body.has_atmosphere()
                && orbit.periapsis_altitude() < depth
                && orbit.apoapsis_altitude().is_none_or(|ap| ap > depth);
            if !dips_in {
                return Err(unavailable("orbit does not cross the atmosphere boundary"));
            }
            let radius = orbit.body.radius_m + depth;
            let exit = orbit
                .true_anomaly_at_radius(radius)
                .ok_or(OrbitError::NoSuchRadius(radius))?;
            let anomaly = if event == OrbitEvent::AtmosphereExit {
                exit
            } else {
                TAU - exit
            };
            Ok(next_pass(host, &orbit, anomaly, now)?)
        }
        OrbitEvent::SoiTransition(n) => soi_transitions(&orbit, host.is_landed(vessel))
            .get(n)
            .map(|transition| transition.ut - lead_s)
            .ok_or_else(|| unavailable("no SOI changes")),
        OrbitEvent::PatchEnd => {
            if orbit.end_transition == PatchTransition::Final || host.is_landed(vessel) {
                return Err(unavailable("current patch does not end"));
            }
            Ok(orbit.end_ut - lead_s)
        }
        OrbitEvent::AscendingNode | OrbitEvent::DescendingNode => {
            let target = target.ok_or(WarpError::NoTarget)?;
            let target_orbit = host
                .orbit_of(target)
                .ok_or_else(|| OrbitError::NoOrbit(target.clone()))?;
            let anomaly = if event == OrbitEvent::AscendingNode {
                ascending_node_true_anomaly(&orbit, &target_orbit)?
            } else {
                descending_node_true_anomaly(&orbit, &target_orbit)?
            };
            Ok(next_pass(host, &orbit, anomaly, now)?)
        }
    }
}

/// Events `resolve_event_ut` would currently accept for `vessel`.
pub fn available_events<H>(host: &H, vessel: &VesselId, target: Option<&VesselId>) -> Vec<OrbitEvent>
where
    H: Ephemeris + ?Sized,
{
    let transitions = host
        .orbit_of(vessel)
        .map_or(0, |orbit| soi_transitions(&orbit, host.is_landed(vessel)).len());
    [
        OrbitEvent::Apoapsis,
        OrbitEvent::Periapsis,
        OrbitEvent::AtmosphereEntry,
        OrbitEvent::AtmosphereExit,
        OrbitEvent::PatchEnd,
        OrbitEvent::AscendingNode,
        OrbitEvent::DescendingNode,
    ]
    .into_iter()
    .chain((0..transitions).map(OrbitEvent::SoiTransition))
    .filter(|&event| resolve_event_ut(host, vessel, target, event, 0.0).is_ok())
    .collect()
}

/// First pass through `true_anomaly` strictly after `now`. A pass landing exactly on the clock is
/// pushed to the next revolution.
fn next_pass<H>(host: &H, orbit: &Orbit, true_anomaly: f64, now: f64) -> Result<f64, OrbitError>
where
    H: Ephemeris + ?Sized,
{
    let ut = ut_for_true_anomaly(host, orbit, true_anomaly, now)?;
    if ut > now {
        return Ok(ut);
    }
    let period = orbit.period();
    if period > 0.0 {
        Ok(ut + period)
    } else {
        Err(OrbitError::NonPeriodicOrbit {
            body: orbit.body.name.clone(),
        })
    }
}
