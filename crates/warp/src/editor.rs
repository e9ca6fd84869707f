//! Draft target for a standalone warp-to-instant panel.

use karto_core::constants::SECONDS_PER_MINUTE;
use karto_core::ids::VesselId;
use karto_core::{Direction, Granularity, StepMagnitude, TimeStepper};
use karto_maneuver::{ManeuverActuator, ManeuverError, ManeuverLead};
use karto_orbits::Ephemeris;

use crate::{OrbitEvent, WarpActuator, WarpController, WarpError, WarpTarget, resolve_event_ut};

/// Quick target a fixed span from now.
pub const QUICK_TARGET_S: f64 = 10.0 * SECONDS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TargetEditor {
    ut: f64,
    stepper: TimeStepper,
}

impl TargetEditor {
    pub fn new(now: f64, tier: Granularity) -> Self {
        Self {
            ut: now,
            stepper: TimeStepper::new(tier),
        }
    }

    pub fn ut(&self) -> f64 {
        self.ut
    }

    pub fn stepper_mut(&mut self) -> &mut TimeStepper {
        &mut self.stepper
    }

    /// Keep the draft from falling behind the clock.
    pub fn refresh(&mut self, now: f64) -> f64 {
        self.ut = self.ut.max(now);
        self.ut
    }

    pub fn step(&mut self, direction: Direction, magnitude: StepMagnitude) -> f64 {
        self.ut = self.stepper.step(self.ut, direction, magnitude);
        self.ut
    }

    pub fn set_from_now(&mut self, now: f64, seconds: f64) -> f64 {
        self.ut = now + seconds;
        self.ut
    }

    /// Move the draft by whole orbits. Ignored when the orbit does not repeat.
    pub fn shift_by_orbits(&mut self, period: f64, count: i32) -> Option<f64> {
        if period <= 0.0 {
            return None;
        }
        self.ut += f64::from(count) * period;
        Some(self.ut)
    }

    /// Stop `lead` ahead of the vessel's earliest maneuver node.
    pub fn lead_maneuver<H>(&mut self, host: &H, vessel: &VesselId, lead: ManeuverLead) -> Result<f64, WarpError>
    where
        H: ManeuverActuator + Ephemeris + ?Sized,
    {
        let nodes = host.list_nodes(vessel);
        let first = nodes.first().ok_or(ManeuverError::NoPlan)?;
        self.ut = lead.target_before(first, host.current_ut())?;
        Ok(self.ut)
    }

    pub fn set_event<H>(
        &mut self,
        host: &H,
        vessel: &VesselId,
        target: Option<&VesselId>,
        event: OrbitEvent,
        lead_s: f64,
    ) -> Result<f64, WarpError>
    where
        H: Ephemeris + ?Sized,
    {
        self.ut = resolve_event_ut(host, vessel, target, event, lead_s)?;
        Ok(self.ut)
    }

    /// Hand the draft to `controller`, clamped to the current clock.
    pub fn engage<H>(&mut self, controller: &mut WarpController, host: &mut H) -> WarpTarget
    where
        H: WarpActuator + Ephemeris + ?Sized,
    {
        let ut = self.refresh(host.current_ut());
        controller.request_warp_to(host, ut)
    }
}
