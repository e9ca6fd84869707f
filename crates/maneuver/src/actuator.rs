//! Write side of the host contract: the live maneuver node list.

use std::fmt;

use karto_core::ids::VesselId;

use crate::{Burn, ManeuverError};

/// Opaque host handle of a live maneuver node. Handles are only meaningful while the node is
/// present in the host's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeHandle(pub u64);

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Read-only view of one live node as listed by the host.
#[derive(Debug, Clone, PartialEq)]
pub struct ManeuverNode {
    pub handle: NodeHandle,
    pub burn: Burn,
    /// Reference body of the patch the node sits on.
    pub patch_body: String,
    /// Period of that patch (s); zero or negative when it does not repeat.
    pub patch_period_s: f64,
}

impl ManeuverNode {
    /// Seconds until the node; negative once it is in the past.
    pub fn time_to(&self, now: f64) -> f64 {
        self.burn.ut - now
    }

    /// Whether moving the node back by `seconds` keeps it in the future. Advisory only.
    pub fn can_shift_back(&self, seconds: f64, now: f64) -> bool {
        self.time_to(now) > seconds
    }
}

/// Host maneuver list. Mutations may be refused, e.g. while the tracking facilities are not
/// upgraded; refusals surface as [`ManeuverError::HostRejected`].
pub trait ManeuverActuator {
    /// Live nodes of `vessel` in the host's order (ascending UT for patched-conic hosts).
    fn list_nodes(&self, vessel: &VesselId) -> Vec<ManeuverNode>;

    fn add_node(&mut self, vessel: &VesselId, ut: f64) -> Result<NodeHandle, ManeuverError>;

    fn set_node(&mut self, handle: NodeHandle, burn: Burn) -> Result<(), ManeuverError>;

    fn remove_node(&mut self, handle: NodeHandle) -> Result<(), ManeuverError>;
}

/// Remove every live node of `vessel`, always taking the first one so index shifts cannot skip
/// entries. Fails if the host stops shrinking the list.
pub fn remove_all_nodes<A>(host: &mut A, vessel: &VesselId) -> Result<usize, ManeuverError>
where
    A: ManeuverActuator + ?Sized,
{
    let mut removed = 0;
    loop {
        let nodes = host.list_nodes(vessel);
        let Some(first) = nodes.first() else {
            return Ok(removed);
        };
        host.remove_node(first.handle)?;
        if host.list_nodes(vessel).len() >= nodes.len() {
            return Err(ManeuverError::HostRejected(format!(
                "node {} was not removed",
                first.handle
            )));
        }
        removed += 1;
    }
}
