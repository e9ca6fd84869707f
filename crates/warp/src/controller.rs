//! Warp requests and the overshoot watchdog.
//!
//! The host's warp-to-instant routine is known to occasionally run past its target at high rates.
//! After a request the controller stays armed and is polled once per physics tick; if the clock
//! passes the target by more than the margin while acceleration is still engaged it forces the
//! rate back to 1x. A rate the user already dropped to 1x simply disarms it.

use karto_core::ids::VesselId;
use karto_orbits::Ephemeris;
use tracing::{debug, info, warn};

use crate::{OrbitEvent, WarpError, resolve_event_ut};

/// Seconds past the target before the watchdog intervenes.
pub const DEFAULT_OVERSHOOT_MARGIN_S: f64 = 1.0;

/// Write side of the host's time acceleration.
pub trait WarpActuator {
    /// Select rate `index` (0 = 1x). `instant` skips the host's rate ramp.
    fn set_rate(&mut self, index: usize, instant: bool);

    /// Start the host's own warp towards `ut`.
    fn warp_to_instant(&mut self, ut: f64);

    fn current_rate_index(&self) -> usize;
}

/// The instant the watchdog guards.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WarpTarget {
    pub ut: f64,
    pub pending: bool,
}

/// What one watchdog tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchdogOutcome {
    /// Nothing armed.
    Idle,
    /// Armed, target not yet overshot.
    Waiting,
    /// Target overshot under acceleration; the rate was forced to 1x.
    Forced,
    /// Rate already at 1x; disarmed without touching it.
    Released,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarpController {
    target: WarpTarget,
    margin_s: f64,
}

impl Default for WarpController {
    fn default() -> Self {
        Self::new(DEFAULT_OVERSHOOT_MARGIN_S)
    }
}

impl WarpController {
    pub fn new(margin_s: f64) -> Self {
        Self {
            target: WarpTarget::default(),
            margin_s,
        }
    }

    pub fn margin_s(&self) -> f64 {
        self.margin_s
    }

    pub fn is_armed(&self) -> bool {
        self.target.pending
    }

    /// Guarded target UT, if armed.
    pub fn target(&self) -> Option<f64> {
        self.target.pending.then_some(self.target.ut)
    }

    /// Cancel any running warp, start a new one to `ut` and arm the watchdog. A previous request
    /// is replaced.
    pub fn request_warp_to<H>(&mut self, host: &mut H, ut: f64) -> WarpTarget
    where
        H: WarpActuator + ?Sized,
    {
        host.set_rate(0, true);
        host.warp_to_instant(ut);
        self.target = WarpTarget { ut, pending: true };
        info!(target_ut = ut, "warp requested");
        self.target
    }

    /// Warp `seconds` past the current clock.
    pub fn request_warp_by<H>(&mut self, host: &mut H, seconds: f64) -> WarpTarget
    where
        H: WarpActuator + Ephemeris + ?Sized,
    {
        let ut = host.current_ut() + seconds;
        self.request_warp_to(host, ut)
    }

    /// Resolve `event` on `vessel`'s orbit and warp to it.
    pub fn request_warp_to_orbit_event<H>(
        &mut self,
        host: &mut H,
        vessel: &VesselId,
        target: Option<&VesselId>,
        event: OrbitEvent,
        lead_s: f64,
    ) -> Result<WarpTarget, WarpError>
    where
        H: WarpActuator + Ephemeris + ?Sized,
    {
        let ut = resolve_event_ut(host, vessel, target, event, lead_s)?;
        debug!(%vessel, %event, ut, "resolved orbit event");
        Ok(self.request_warp_to(host, ut))
    }

    /// Disarm without touching the host's rate. Returns the target that was guarded.
    pub fn cancel(&mut self) -> Option<f64> {
        let previous = self.target();
        self.target = WarpTarget::default();
        previous
    }

    /// Run once per physics tick.
    pub fn on_physics_tick<H>(&mut self, host: &mut H) -> WatchdogOutcome
    where
        H: WarpActuator + Ephemeris + ?Sized,
    {
        if !self.target.pending {
            return WatchdogOutcome::Idle;
        }
        let now = host.current_ut();
        let rate = host.current_rate_index();

        if now > self.target.ut + self.margin_s && rate > 0 {
            warn!(now, target_ut = self.target.ut, rate, "warp overshot target, forcing 1x");
            host.set_rate(0, true);
            self.target = WarpTarget::default();
            return WatchdogOutcome::Forced;
        }
        if rate == 0 {
            debug!(now, target_ut = self.target.ut, "warp stopped, watchdog released");
            self.target = WarpTarget::default();
            return WatchdogOutcome::Released;
        }
        WatchdogOutcome::Waiting
    }
}
