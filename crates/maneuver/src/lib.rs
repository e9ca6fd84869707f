//! Delta-v burns, stored maneuver chains, and the planner that edits the host's live node list.

pub mod actuator;
pub mod burn;
pub mod chain;
pub mod planner;

pub use actuator::{ManeuverActuator, ManeuverNode, NodeHandle, remove_all_nodes};
pub use burn::{Axis, Burn, BurnRecord, BurnVector, Sign};
pub use chain::{ManeuverChain, RestoreError, StoredManeuvers};
pub use planner::{Increment, ManeuverLead, ManeuverPlanner, PlanState};

use karto_orbits::OrbitError;
use thiserror::Error;

/// Failures while editing or replaying maneuver nodes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManeuverError {
    #[error("host rejected the change: {0}")]
    HostRejected(String),
    #[error("maneuver node {0} is no longer in the host list")]
    StaleReference(NodeHandle),
    #[error("no maneuver nodes are planned")]
    NoPlan,
    #[error("no stored maneuver at index {0}")]
    NoSuchChain(usize),
    #[error("warp shortcuts only apply to the first maneuver (current is #{})", .0 + 1)]
    NotEarliestNode(usize),
    #[error("lead of {lead_s:.0} s does not fit in the {remaining_s:.0} s before the node")]
    LeadTooLong { lead_s: f64, remaining_s: f64 },
    #[error(transparent)]
    Orbit(#[from] OrbitError),
}
