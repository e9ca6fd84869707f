//! Flight-scene composition root.
//!
//! One `FlightSession` lives for one flight scene. It owns the planner, the warp controller, the
//! standalone warp target editor and the stored plan library, and routes host calls between them.

use karto_config::Settings;
use karto_core::Granularity;
use karto_core::ids::VesselId;
use karto_maneuver::{
    Increment, ManeuverActuator, ManeuverError, ManeuverLead, ManeuverPlanner, NodeHandle,
    RestoreError, StoredManeuvers,
};
use karto_orbits::Ephemeris;
use karto_warp::{
    OrbitEvent, TargetEditor, WarpActuator, WarpController, WarpError, WarpTarget, WatchdogOutcome,
};
use thiserror::Error;
use tracing::info;

/// Everything a flight scene host has to provide.
pub trait FlightHost: Ephemeris + ManeuverActuator + WarpActuator {}

impl<T: Ephemeris + ManeuverActuator + WarpActuator + ?Sized> FlightHost for T {}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no vessel is under control")]
    NoActiveVessel,
    #[error("maneuver editing failed: {0}")]
    Maneuver(#[from] ManeuverError),
    #[error("maneuver restore failed: {0}")]
    Restore(#[from] RestoreError),
    #[error("warp request failed: {0}")]
    Warp(#[from] WarpError),
}

#[derive(Debug, Clone)]
pub struct FlightSession {
    settings: Settings,
    vessel: Option<VesselId>,
    maneuvers_allowed: bool,
    planner: ManeuverPlanner,
    warp: WarpController,
    editor: TargetEditor,
    stored: StoredManeuvers,
}

impl FlightSession {
    pub fn new(settings: Settings) -> Self {
        let planner = ManeuverPlanner::new(
            Increment::from_index(settings.planner.default_increment_index),
            Granularity::from_index(settings.planner.granularity_index),
        );
        let warp = WarpController::new(settings.warp.overshoot_margin_s);
        let editor = TargetEditor::new(0.0, Granularity::from_index(settings.planner.granularity_index));
        Self {
            settings,
            vessel: None,
            maneuvers_allowed: false,
            planner,
            warp,
            editor,
            stored: StoredManeuvers::default(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Take control of `vessel`. `maneuvers_allowed` is the host's facility gate for node editing.
    pub fn on_scene_enter(&mut self, vessel: VesselId, now: f64, maneuvers_allowed: bool) {
        info!(%vessel, now, "flight scene entered");
        self.vessel = Some(vessel);
        self.maneuvers_allowed = maneuvers_allowed;
        self.planner.reset();
        self.editor.refresh(now);
    }

    /// Leave the scene. The watchdog is disarmed; stored plans survive.
    pub fn on_scene_exit(&mut self) {
        if let Some(vessel) = self.vessel.take() {
            info!(%vessel, "flight scene left");
        }
        self.warp.cancel();
        self.planner.reset();
    }

    pub fn on_physics_tick<H: FlightHost + ?Sized>(&mut self, host: &mut H) -> WatchdogOutcome {
        self.warp.on_physics_tick(host)
    }

    pub fn vessel(&self) -> Result<&VesselId, SessionError> {
        self.vessel.as_ref().ok_or(SessionError::NoActiveVessel)
    }

    pub fn planner(&self) -> &ManeuverPlanner {
        &self.planner
    }

    pub fn planner_mut(&mut self) -> &mut ManeuverPlanner {
        &mut self.planner
    }

    pub fn warp(&self) -> &WarpController {
        &self.warp
    }

    pub fn editor_mut(&mut self) -> &mut TargetEditor {
        &mut self.editor
    }

    pub fn stored(&self) -> &StoredManeuvers {
        &self.stored
    }

    pub fn stored_mut(&mut self) -> &mut StoredManeuvers {
        &mut self.stored
    }

    /// New node at the configured lead from now.
    pub fn add_node<H: FlightHost + ?Sized>(&mut self, host: &mut H) -> Result<NodeHandle, SessionError> {
        let vessel = self.vessel.clone().ok_or(SessionError::NoActiveVessel)?;
        let lead = self.settings.planner.new_node_lead_s;
        Ok(self.planner.add_node(host, &vessel, lead, self.maneuvers_allowed)?)
    }

    /// Capture the live plan into the library. Returns its index.
    pub fn store_plan<H: FlightHost + ?Sized>(&mut self, host: &H) -> Result<usize, SessionError> {
        let vessel = self.vessel()?;
        let chain = self.planner.snapshot(host, vessel).ok_or(ManeuverError::NoPlan)?;
        info!(%vessel, burns = chain.len(), "maneuver plan stored");
        Ok(self.stored.store(chain))
    }

    pub fn restore_plan<H: FlightHost + ?Sized>(&mut self, host: &mut H, index: usize) -> Result<usize, SessionError> {
        let vessel = self.vessel.clone().ok_or(SessionError::NoActiveVessel)?;
        let chain = self
            .stored
            .get(index)
            .cloned()
            .ok_or(ManeuverError::NoSuchChain(index))?;
        Ok(self.planner.restore(host, &vessel, &chain)?)
    }

    /// Warp to `lead` ahead of the first maneuver node.
    pub fn warp_to_first_maneuver<H: FlightHost + ?Sized>(
        &mut self,
        host: &mut H,
        lead: ManeuverLead,
    ) -> Result<WarpTarget, SessionError> {
        let vessel = self.vessel.clone().ok_or(SessionError::NoActiveVessel)?;
        let ut = self.planner.early_warp_target(host, &vessel, lead)?;
        Ok(self.warp.request_warp_to(host, ut))
    }

    pub fn warp_to_event<H: FlightHost + ?Sized>(
        &mut self,
        host: &mut H,
        event: OrbitEvent,
        target: Option<&VesselId>,
    ) -> Result<WarpTarget, SessionError> {
        let vessel = self.vessel.clone().ok_or(SessionError::NoActiveVessel)?;
        let lead_s = match event {
            OrbitEvent::PatchEnd => self.settings.warp.transition_lead_s,
            _ => self.settings.warp.soi_lead_s,
        };
        Ok(self
            .warp
            .request_warp_to_orbit_event(host, &vessel, target, event, lead_s)?)
    }

    pub fn warp_by<H: FlightHost + ?Sized>(&mut self, host: &mut H, seconds: f64) -> WarpTarget {
        self.warp.request_warp_by(host, seconds)
    }

    /// Engage the standalone editor's draft target.
    pub fn engage_editor<H: FlightHost + ?Sized>(&mut self, host: &mut H) -> WarpTarget {
        self.editor.engage(&mut self.warp, host)
    }
}
