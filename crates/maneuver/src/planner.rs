//! Interactive editing of the host's live maneuver list.
//!
//! The planner never owns a node. It remembers which node is "current" as a handle plus the
//! index it was last seen at, and validates both against the host list on every access: the list
//! can change between ticks (vessel switch, nodes removed by other code, re-sorting after a time
//! shift). A stale reference is recovered by falling back to the first node.

use karto_core::constants::{SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
use karto_core::ids::VesselId;
use karto_core::{Direction, Granularity, StepMagnitude, TimeStepper};
use karto_orbits::{Ephemeris, OrbitError};
use tracing::debug;

use crate::{
    Axis, Burn, ManeuverActuator, ManeuverChain, ManeuverError, ManeuverNode, NodeHandle,
    RestoreError, Sign, remove_all_nodes,
};

/// Delta-v step ladder for axis nudges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Increment {
    Hundredth,
    Tenth,
    #[default]
    One,
    Ten,
    Hundred,
    Thousand,
}

impl Increment {
    pub const ALL: [Increment; 6] = [
        Increment::Hundredth,
        Increment::Tenth,
        Increment::One,
        Increment::Ten,
        Increment::Hundred,
        Increment::Thousand,
    ];

    pub fn meters_per_second(self) -> f64 {
        match self {
            Self::Hundredth => 0.01,
            Self::Tenth => 0.1,
            Self::One => 1.0,
            Self::Ten => 10.0,
            Self::Hundred => 100.0,
            Self::Thousand => 1000.0,
        }
    }

    /// Ladder rung at `index`, clamped to the largest step.
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index.min(Self::ALL.len() - 1)]
    }
}

/// How far ahead of a maneuver a warp shortcut stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManeuverLead {
    OneMinute,
    TenMinutes,
    OneHour,
    OneDay,
}

impl ManeuverLead {
    pub fn seconds(self) -> f64 {
        match self {
            Self::OneMinute => SECONDS_PER_MINUTE,
            Self::TenMinutes => 10.0 * SECONDS_PER_MINUTE,
            Self::OneHour => SECONDS_PER_HOUR,
            Self::OneDay => SECONDS_PER_DAY,
        }
    }

    /// Warp target `self` before `node`, if the node is far enough away.
    pub fn target_before(self, node: &ManeuverNode, now: f64) -> Result<f64, ManeuverError> {
        let remaining_s = node.time_to(now);
        if remaining_s <= self.seconds() {
            return Err(ManeuverError::LeadTooLong {
                lead_s: self.seconds(),
                remaining_s,
            });
        }
        Ok(node.burn.ut - self.seconds())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanState {
    NoPlan,
    HasPlan { index: usize, count: usize },
}

#[derive(Debug, Clone, Default)]
pub struct ManeuverPlanner {
    vessel: Option<VesselId>,
    current: Option<NodeHandle>,
    index: usize,
    increment: Increment,
    stepper: TimeStepper,
}

impl ManeuverPlanner {
    pub fn new(increment: Increment, tier: Granularity) -> Self {
        Self {
            increment,
            stepper: TimeStepper::new(tier),
            ..Self::default()
        }
    }

    pub fn increment(&self) -> Increment {
        self.increment
    }

    pub fn set_increment(&mut self, increment: Increment) {
        self.increment = increment;
    }

    pub fn stepper(&self) -> &TimeStepper {
        &self.stepper
    }

    pub fn stepper_mut(&mut self) -> &mut TimeStepper {
        &mut self.stepper
    }

    /// Forget the tracked node; the next access starts again from the first node.
    pub fn reset(&mut self) {
        self.vessel = None;
        self.current = None;
        self.index = 0;
    }

    /// Re-validate against the host list and report the plan state.
    pub fn sync<A>(&mut self, host: &A, vessel: &VesselId) -> PlanState
    where
        A: ManeuverActuator + ?Sized,
    {
        let nodes = host.list_nodes(vessel);
        match self.resolve(&nodes, vessel) {
            Some(index) => PlanState::HasPlan {
                index,
                count: nodes.len(),
            },
            None => PlanState::NoPlan,
        }
    }

    /// The node under edit.
    pub fn current_node<A>(&mut self, host: &A, vessel: &VesselId) -> Result<ManeuverNode, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let mut nodes = host.list_nodes(vessel);
        let index = self.resolve(&nodes, vessel).ok_or(ManeuverError::NoPlan)?;
        Ok(nodes.swap_remove(index))
    }

    /// Create a node `after_seconds` from now and make it current. `allowed` is the host's
    /// facility gate for maneuver editing.
    pub fn add_node<H>(
        &mut self,
        host: &mut H,
        vessel: &VesselId,
        after_seconds: f64,
        allowed: bool,
    ) -> Result<NodeHandle, ManeuverError>
    where
        H: ManeuverActuator + Ephemeris + ?Sized,
    {
        if !allowed {
            return Err(ManeuverError::HostRejected(
                "maneuver editing facility unavailable".into(),
            ));
        }
        let ut = host.current_ut() + after_seconds;
        let handle = host.add_node(vessel, ut)?;
        self.vessel = Some(vessel.clone());
        self.current = Some(handle);
        self.index = host
            .list_nodes(vessel)
            .iter()
            .position(|node| node.handle == handle)
            .unwrap_or(0);
        Ok(handle)
    }

    pub fn delete_current<A>(&mut self, host: &mut A, vessel: &VesselId) -> Result<PlanState, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let node = self.current_node(host, vessel)?;
        host.remove_node(node.handle)?;
        self.current = None;
        Ok(self.sync(host, vessel))
    }

    /// Remove every live node. Returns how many were removed.
    pub fn delete_all<A>(&mut self, host: &mut A, vessel: &VesselId) -> Result<usize, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let removed = remove_all_nodes(host, vessel)?;
        self.current = None;
        self.index = 0;
        Ok(removed)
    }

    /// Advance to the next node, wrapping to the first.
    pub fn next<A>(&mut self, host: &A, vessel: &VesselId) -> Result<PlanState, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        self.cycle(host, vessel, |index, count| (index + 1) % count)
    }

    /// Step back to the previous node, wrapping to the last.
    pub fn prev<A>(&mut self, host: &A, vessel: &VesselId) -> Result<PlanState, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        self.cycle(host, vessel, |index, count| (index + count - 1) % count)
    }

    /// Nudge one axis of the current burn by one increment and re-commit it at the same UT.
    pub fn adjust_axis<A>(
        &mut self,
        host: &mut A,
        vessel: &VesselId,
        axis: Axis,
        sign: Sign,
    ) -> Result<Burn, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let step = sign.signum() * self.increment.meters_per_second();
        self.edit(host, vessel, |burn| burn.delta_v.add(axis, step))
    }

    pub fn zero_axis<A>(&mut self, host: &mut A, vessel: &VesselId, axis: Axis) -> Result<Burn, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        self.edit(host, vessel, |burn| burn.delta_v.zero(axis))
    }

    /// Move the current node by `delta_seconds`. Moving it into the past is not prevented.
    pub fn shift_time<A>(&mut self, host: &mut A, vessel: &VesselId, delta_seconds: f64) -> Result<Burn, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        self.edit(host, vessel, |burn| burn.ut += delta_seconds)
    }

    /// Move the current node by whole periods of the patch it sits on.
    pub fn shift_by_orbits<A>(&mut self, host: &mut A, vessel: &VesselId, count: i32) -> Result<Burn, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let node = self.current_node(host, vessel)?;
        if node.patch_period_s <= 0.0 {
            return Err(OrbitError::NonPeriodicOrbit {
                body: node.patch_body,
            }
            .into());
        }
        let burn = Burn::new(node.burn.delta_v, node.burn.ut + f64::from(count) * node.patch_period_s);
        host.set_node(node.handle, burn)?;
        Ok(burn)
    }

    /// Re-time the current node to `seconds` from now.
    pub fn retime_from_now<H>(&mut self, host: &mut H, vessel: &VesselId, seconds: f64) -> Result<Burn, ManeuverError>
    where
        H: ManeuverActuator + Ephemeris + ?Sized,
    {
        let ut = host.current_ut() + seconds;
        self.edit(host, vessel, |burn| burn.ut = ut)
    }

    /// Move the current node by one step of the planner's current time tier.
    pub fn step_time<A>(
        &mut self,
        host: &mut A,
        vessel: &VesselId,
        direction: Direction,
        magnitude: StepMagnitude,
    ) -> Result<Burn, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
    {
        let stepper = self.stepper;
        self.edit(host, vessel, |burn| burn.ut = stepper.step(burn.ut, direction, magnitude))
    }

    /// Warp target ahead of the current node. Only offered on the earliest node.
    pub fn early_warp_target<H>(&mut self, host: &H, vessel: &VesselId, lead: ManeuverLead) -> Result<f64, ManeuverError>
    where
        H: ManeuverActuator + Ephemeris + ?Sized,
    {
        let node = self.current_node(host, vessel)?;
        if self.index != 0 {
            return Err(ManeuverError::NotEarliestNode(self.index));
        }
        lead.target_before(&node, host.current_ut())
    }

    /// Capture the live plan.
    pub fn snapshot<A>(&self, host: &A, vessel: &VesselId) -> Option<ManeuverChain>
    where
        A: ManeuverActuator + ?Sized,
    {
        ManeuverChain::snapshot(host.list_nodes(vessel).into_iter().map(|node| node.burn))
    }

    /// Replace the live plan with `chain`; the tracked node is reset either way.
    pub fn restore<A>(&mut self, host: &mut A, vessel: &VesselId, chain: &ManeuverChain) -> Result<usize, RestoreError>
    where
        A: ManeuverActuator + ?Sized,
    {
        self.current = None;
        self.index = 0;
        chain.restore(host, vessel)
    }

    fn cycle<A, F>(&mut self, host: &A, vessel: &VesselId, step: F) -> Result<PlanState, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
        F: FnOnce(usize, usize) -> usize,
    {
        let nodes = host.list_nodes(vessel);
        let index = self.resolve(&nodes, vessel).ok_or(ManeuverError::NoPlan)?;
        let count = nodes.len();
        self.index = step(index, count);
        self.current = Some(nodes[self.index].handle);
        Ok(PlanState::HasPlan {
            index: self.index,
            count,
        })
    }

    fn edit<A, F>(&mut self, host: &mut A, vessel: &VesselId, change: F) -> Result<Burn, ManeuverError>
    where
        A: ManeuverActuator + ?Sized,
        F: FnOnce(&mut Burn),
    {
        let node = self.current_node(host, vessel)?;
        let mut burn = node.burn;
        change(&mut burn);
        host.set_node(node.handle, burn)?;
        Ok(burn)
    }

    /// Index of the current node in `nodes`, re-acquiring the first node when the reference has
    /// gone stale. `None` when there is no plan.
    fn resolve(&mut self, nodes: &[ManeuverNode], vessel: &VesselId) -> Option<usize> {
        let Some(first) = nodes.first() else {
            self.current = None;
            self.index = 0;
            return None;
        };
        match self.locate(nodes, vessel) {
            Ok(index) => self.index = index,
            Err(reason) => {
                if self.current.is_some() {
                    debug!(%vessel, "{reason}; tracking the first node");
                } else {
                    debug!(%vessel, "no node selected; tracking the first node");
                }
                self.vessel = Some(vessel.clone());
                self.current = Some(first.handle);
                self.index = 0;
            }
        }
        Some(self.index)
    }

    fn locate(&self, nodes: &[ManeuverNode], vessel: &VesselId) -> Result<usize, ManeuverError> {
        let handle = self.current.ok_or(ManeuverError::NoPlan)?;
        if self.vessel.as_ref() != Some(vessel) {
            return Err(ManeuverError::StaleReference(handle));
        }
        if nodes.get(self.index).is_some_and(|node| node.handle == handle) {
            return Ok(self.index);
        }
        nodes
            .iter()
            .position(|node| node.handle == handle)
            .ok_or(ManeuverError::StaleReference(handle))
    }
}
