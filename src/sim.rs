//! In-memory reference host: analytic two-body orbits, a live maneuver list per vessel, and a
//! time-warp model with a switchable overshoot fault.
//!
//! The host never propagates burns into new orbits; it only answers the three host contracts so
//! the planner and warp controller can be driven end to end.

use std::collections::BTreeMap;

use karto_core::ids::VesselId;
use karto_maneuver::{Burn, BurnVector, ManeuverActuator, ManeuverError, ManeuverNode, NodeHandle};
use karto_orbits::{Ephemeris, Orbit, kepler};
use karto_warp::WarpActuator;
use tracing::debug;

/// Warp multipliers by rate index; index 0 is real time.
pub const RATE_LADDER: [f64; 8] = [1.0, 5.0, 10.0, 50.0, 100.0, 1_000.0, 10_000.0, 100_000.0];

#[derive(Debug, Clone, PartialEq)]
pub struct SimVessel {
    pub name: String,
    pub orbit: Orbit,
    pub landed: bool,
    /// Vessel currently targeted from this one.
    pub target: Option<VesselId>,
    nodes: Vec<(NodeHandle, Burn)>,
}

impl SimVessel {
    pub fn new(name: impl Into<String>, orbit: Orbit) -> Self {
        Self {
            name: name.into(),
            orbit,
            landed: false,
            target: None,
            nodes: Vec::new(),
        }
    }

    /// Patch the trajectory is on at `ut`.
    fn patch_at(&self, ut: f64) -> &Orbit {
        self.orbit
            .patches()
            .find(|patch| ut < patch.end_ut)
            .or_else(|| self.orbit.patches().last())
            .unwrap_or(&self.orbit)
    }
}

/// One `set_rate` call as the host saw it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateRequest {
    pub index: usize,
    pub instant: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SimHost {
    ut: f64,
    vessels: BTreeMap<VesselId, SimVessel>,
    next_handle: u64,
    rate_index: usize,
    warp_target: Option<f64>,
    /// When set, the host's own warp fails to drop out at its target.
    stall_warp: bool,
    /// Remaining `add_node` calls to accept before refusing; `None` accepts all.
    accept_nodes: Option<usize>,
    /// Ignore `remove_node` calls while reporting success.
    sticky_nodes: bool,
    rate_requests: Vec<RateRequest>,
}

impl SimHost {
    pub fn new(ut: f64) -> Self {
        Self {
            ut,
            ..Self::default()
        }
    }

    pub fn insert_vessel(&mut self, id: VesselId, vessel: SimVessel) {
        self.vessels.insert(id, vessel);
    }

    pub fn vessel(&self, id: &VesselId) -> Option<&SimVessel> {
        self.vessels.get(id)
    }

    pub fn vessel_mut(&mut self, id: &VesselId) -> Option<&mut SimVessel> {
        self.vessels.get_mut(id)
    }

    pub fn vessel_ids(&self) -> impl Iterator<Item = &VesselId> {
        self.vessels.keys()
    }

    pub fn target_of(&self, id: &VesselId) -> Option<&VesselId> {
        self.vessels.get(id)?.target.as_ref()
    }

    pub fn set_ut(&mut self, ut: f64) {
        self.ut = ut;
    }

    pub fn set_stall_warp(&mut self, stall: bool) {
        self.stall_warp = stall;
    }

    /// Accept only `count` more nodes, then refuse.
    pub fn refuse_nodes_after(&mut self, count: usize) {
        self.accept_nodes = Some(count);
    }

    pub fn set_sticky_nodes(&mut self, sticky: bool) {
        self.sticky_nodes = sticky;
    }

    pub fn rate_requests(&self) -> &[RateRequest] {
        &self.rate_requests
    }

    pub fn warp_multiplier(&self) -> f64 {
        RATE_LADDER[self.rate_index]
    }

    /// Advance the clock by one physics step of `dt` real seconds at the current rate.
    ///
    /// A healthy warp stops exactly at its target; a stalled one keeps its rate.
    pub fn tick(&mut self, dt: f64) -> f64 {
        self.ut += dt * self.warp_multiplier();
        if let Some(target) = self.warp_target {
            if self.ut >= target && !self.stall_warp {
                debug!(ut = self.ut, target, "sim warp reached target");
                self.ut = target;
                self.rate_index = 0;
                self.warp_target = None;
            }
        }
        self.ut
    }

    fn owner_of(&mut self, handle: NodeHandle) -> Result<&mut SimVessel, ManeuverError> {
        self.vessels
            .values_mut()
            .find(|vessel| vessel.nodes.iter().any(|(h, _)| *h == handle))
            .ok_or_else(|| ManeuverError::HostRejected(format!("unknown node {handle}")))
    }
}

impl Ephemeris for SimHost {
    fn current_ut(&self) -> f64 {
        self.ut
    }

    fn orbit_of(&self, vessel: &VesselId) -> Option<Orbit> {
        self.vessels.get(vessel).map(|v| v.orbit.clone())
    }

    fn true_anomaly_at_ut(&self, orbit: &Orbit, ut: f64) -> f64 {
        kepler::true_anomaly_at_ut(orbit, ut)
    }

    fn ut_for_true_anomaly(&self, orbit: &Orbit, true_anomaly: f64, after_ut: f64) -> f64 {
        kepler::ut_at_true_anomaly(orbit, true_anomaly, after_ut)
    }

    fn is_landed(&self, vessel: &VesselId) -> bool {
        self.vessels.get(vessel).is_some_and(|v| v.landed)
    }
}

impl ManeuverActuator for SimHost {
    fn list_nodes(&self, vessel: &VesselId) -> Vec<ManeuverNode> {
        let Some(v) = self.vessels.get(vessel) else {
            return Vec::new();
        };
        let mut nodes: Vec<ManeuverNode> = v
            .nodes
            .iter()
            .map(|(handle, burn)| {
                let patch = v.patch_at(burn.ut);
                ManeuverNode {
                    handle: *handle,
                    burn: *burn,
                    patch_body: patch.body.name.clone(),
                    patch_period_s: patch.period(),
                }
            })
            .collect();
        nodes.sort_by(|a, b| a.burn.ut.total_cmp(&b.burn.ut));
        nodes
    }

    fn add_node(&mut self, vessel: &VesselId, ut: f64) -> Result<NodeHandle, ManeuverError> {
        if let Some(remaining) = self.accept_nodes.as_mut() {
            if *remaining == 0 {
                return Err(ManeuverError::HostRejected("node limit reached".into()));
            }
            *remaining -= 1;
        }
        let v = self
            .vessels
            .get_mut(vessel)
            .ok_or_else(|| ManeuverError::HostRejected(format!("unknown vessel '{vessel}'")))?;
        self.next_handle += 1;
        let handle = NodeHandle(self.next_handle);
        v.nodes.push((handle, BurnVector::default().at(ut)));
        Ok(handle)
    }

    fn set_node(&mut self, handle: NodeHandle, burn: Burn) -> Result<(), ManeuverError> {
        let vessel = self.owner_of(handle)?;
        if let Some(entry) = vessel.nodes.iter_mut().find(|(h, _)| *h == handle) {
            entry.1 = burn;
        }
        Ok(())
    }

    fn remove_node(&mut self, handle: NodeHandle) -> Result<(), ManeuverError> {
        let sticky = self.sticky_nodes;
        let vessel = self.owner_of(handle)?;
        if !sticky {
            vessel.nodes.retain(|(h, _)| *h != handle);
        }
        Ok(())
    }
}

impl WarpActuator for SimHost {
    fn set_rate(&mut self, index: usize, instant: bool) {
        self.rate_requests.push(RateRequest { index, instant });
        self.rate_index = index.min(RATE_LADDER.len() - 1);
        if self.rate_index == 0 {
            self.warp_target = None;
        }
    }

    fn warp_to_instant(&mut self, ut: f64) {
        if ut <= self.ut {
            return;
        }
        // Pick the fastest rate that does not cross the target within one second of real time.
        let gap = ut - self.ut;
        self.rate_index = RATE_LADDER
            .iter()
            .rposition(|&rate| rate <= gap)
            .unwrap_or(0);
        self.warp_target = Some(ut);
    }

    fn current_rate_index(&self) -> usize {
        self.rate_index
    }
}
