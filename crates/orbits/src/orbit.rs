//! Read-only orbit snapshots handed over by the host.

use std::f64::consts::TAU;

/// Celestial body an orbit is referenced to. Bodies are identified by name.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    pub name: String,
    /// Gravitational parameter (m³/s²).
    pub mu_m3_s2: f64,
    /// Equatorial radius (m).
    pub radius_m: f64,
    /// Height of the atmosphere above the surface (m); zero for airless bodies.
    pub atmosphere_depth_m: f64,
}

impl Body {
    pub fn has_atmosphere(&self) -> bool {
        self.atmosphere_depth_m > 0.0
    }
}

/// How a patch ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchTransition {
    /// Terminal patch; nothing follows.
    Final,
    /// Enters the sphere of influence of a child body.
    Encounter,
    /// Leaves the sphere of influence of the reference body.
    Escape,
    /// Ends at a planned maneuver.
    Maneuver,
    Impact,
}

/// Classical elements of one conic, angles in degrees as the host reports them.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OrbitalElements {
    pub inclination_deg: f64,
    pub lan_deg: f64,
    pub argument_of_periapsis_deg: f64,
    pub eccentricity: f64,
    /// Semi-major axis (m); negative for hyperbolic orbits.
    pub semi_major_axis_m: f64,
    pub mean_anomaly_at_epoch_rad: f64,
    pub epoch_ut: f64,
}

/// One patch of a patched-conic trajectory. `next_patch` owns the remainder of the chain, so the
/// chain is finite and acyclic by construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Orbit {
    pub body: Body,
    pub elements: OrbitalElements,
    /// UT at which this patch ends; infinite for a terminal elliptical patch.
    pub end_ut: f64,
    pub end_transition: PatchTransition,
    /// Whether the host's solver currently considers this patch live.
    pub active: bool,
    pub next_patch: Option<Box<Orbit>>,
}

impl Orbit {
    /// Terminal, active patch around `body`.
    pub fn new(body: Body, elements: OrbitalElements) -> Self {
        Self {
            body,
            elements,
            end_ut: f64::INFINITY,
            end_transition: PatchTransition::Final,
            active: true,
            next_patch: None,
        }
    }

    /// Terminate this patch at `end_ut` and continue with `next`.
    pub fn with_next_patch(mut self, end_ut: f64, transition: PatchTransition, next: Orbit) -> Self {
        self.end_ut = end_ut;
        self.end_transition = transition;
        self.next_patch = Some(Box::new(next));
        self
    }

    /// Both orbits share a reference body and therefore a frame.
    pub fn shares_frame_with(&self, other: &Orbit) -> bool {
        self.body.name == other.body.name
    }

    pub fn is_terminal(&self) -> bool {
        self.end_transition == PatchTransition::Final || self.next_patch.is_none()
    }

    pub fn is_elliptical(&self) -> bool {
        self.elements.eccentricity < 1.0 && self.elements.semi_major_axis_m > 0.0
    }

    /// Mean motion (rad/s).
    pub fn mean_motion(&self) -> f64 {
        (self.body.mu_m3_s2 / self.elements.semi_major_axis_m.abs().powi(3)).sqrt()
    }

    /// Orbital period (s); zero for orbits that never repeat.
    pub fn period(&self) -> f64 {
        if self.is_elliptical() {
            TAU / self.mean_motion()
        } else {
            0.0
        }
    }

    /// Semi-latus rectum (m).
    pub fn semi_latus_rectum(&self) -> f64 {
        let e = self.elements.eccentricity;
        self.elements.semi_major_axis_m * (1.0 - e * e)
    }

    pub fn periapsis_radius(&self) -> f64 {
        self.elements.semi_major_axis_m * (1.0 - self.elements.eccentricity)
    }

    /// Apoapsis radius; `None` when the orbit is unbounded.
    pub fn apoapsis_radius(&self) -> Option<f64> {
        self.is_elliptical()
            .then(|| self.elements.semi_major_axis_m * (1.0 + self.elements.eccentricity))
    }

    pub fn periapsis_altitude(&self) -> f64 {
        self.periapsis_radius() - self.body.radius_m
    }

    pub fn apoapsis_altitude(&self) -> Option<f64> {
        self.apoapsis_radius().map(|r| r - self.body.radius_m)
    }

    /// Outbound true anomaly in `[0, π]` at which the orbit crosses radius `r`.
    pub fn true_anomaly_at_radius(&self, r: f64) -> Option<f64> {
        let e = self.elements.eccentricity;
        if e <= f64::EPSILON || r <= 0.0 {
            return None;
        }
        let cos_nu = (self.semi_latus_rectum() / r - 1.0) / e;
        (-1.0..=1.0).contains(&cos_nu).then(|| cos_nu.acos())
    }

    /// Walk this patch and every patch after it.
    pub fn patches(&self) -> Patches<'_> {
        Patches { next: Some(self) }
    }
}

/// Iterator over a patch chain.
#[derive(Debug, Clone)]
pub struct Patches<'a> {
    next: Option<&'a Orbit>,
}

impl<'a> Iterator for Patches<'a> {
    type Item = &'a Orbit;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_patch.as_deref();
        Some(current)
    }
}
