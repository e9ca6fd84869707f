use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use karto_core::ids::VesselId;
use karto_maneuver::{BurnVector, ManeuverActuator, ManeuverError};
use karto_orbits::{Body, Orbit, OrbitalElements, PatchTransition};
use serde::Deserialize;
use thiserror::Error;

use crate::sim::{SimHost, SimVessel};

/// A complete reference-host setup: clock, bodies and vessels.
#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub start_ut: f64,
    pub bodies: Vec<BodyConfig>,
    pub vessels: Vec<VesselConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BodyConfig {
    pub name: String,
    pub mu_m3_s2: f64,
    pub radius_m: f64,
    #[serde(default)]
    pub atmosphere_depth_m: f64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VesselConfig {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub orbit: OrbitConfig,
    #[serde(default)]
    pub landed: bool,
    #[serde(default)]
    pub target: Option<String>,
    #[serde(default)]
    pub nodes: Vec<NodeConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OrbitConfig {
    pub body: String,
    #[serde(default)]
    pub inclination_deg: f64,
    #[serde(default)]
    pub lan_deg: f64,
    #[serde(default)]
    pub argument_of_periapsis_deg: f64,
    #[serde(default)]
    pub eccentricity: f64,
    pub semi_major_axis_m: f64,
    #[serde(default)]
    pub mean_anomaly_at_epoch_rad: f64,
    #[serde(default)]
    pub epoch_ut: f64,
    #[serde(default)]
    pub patch_end: Option<PatchEndConfig>,
}

/// Where a patch ends and what comes after it.
#[derive(Debug, Deserialize, Clone)]
pub struct PatchEndConfig {
    pub ut: f64,
    pub transition: TransitionConfig,
    #[serde(default = "default_active")]
    pub next_active: bool,
    pub next: Box<OrbitConfig>,
}

#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransitionConfig {
    Encounter,
    Escape,
    Maneuver,
    Impact,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NodeConfig {
    pub ut: f64,
    #[serde(default)]
    pub radial: f64,
    #[serde(default)]
    pub normal: f64,
    #[serde(default)]
    pub prograde: f64,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("failed to read YAML: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("unknown body '{0}'")]
    UnknownBody(String),
    #[error("vessel '{vessel}' targets unknown vessel '{target}'")]
    UnknownTarget { vessel: String, target: String },
    #[error("failed to place scenario node: {0}")]
    Node(#[from] ManeuverError),
}

pub fn load_scenario_config<P: AsRef<Path>>(path: P) -> Result<ScenarioConfig, ScenarioError> {
    let reader = File::open(path)?;
    Ok(serde_yaml::from_reader(reader)?)
}

/// Load a scenario file straight into a reference host.
pub fn load_scenario<P: AsRef<Path>>(path: P) -> Result<SimHost, ScenarioError> {
    load_scenario_config(path)?.try_into()
}

impl From<TransitionConfig> for PatchTransition {
    fn from(value: TransitionConfig) -> Self {
        match value {
            TransitionConfig::Encounter => PatchTransition::Encounter,
            TransitionConfig::Escape => PatchTransition::Escape,
            TransitionConfig::Maneuver => PatchTransition::Maneuver,
            TransitionConfig::Impact => PatchTransition::Impact,
        }
    }
}

impl From<&BodyConfig> for Body {
    fn from(value: &BodyConfig) -> Self {
        Body {
            name: value.name.clone(),
            mu_m3_s2: value.mu_m3_s2,
            radius_m: value.radius_m,
            atmosphere_depth_m: value.atmosphere_depth_m,
        }
    }
}

impl OrbitConfig {
    fn build(&self, bodies: &HashMap<String, Body>) -> Result<Orbit, ScenarioError> {
        let body = bodies
            .get(&self.body)
            .cloned()
            .ok_or_else(|| ScenarioError::UnknownBody(self.body.clone()))?;
        let orbit = Orbit::new(
            body,
            OrbitalElements {
                inclination_deg: self.inclination_deg,
                lan_deg: self.lan_deg,
                argument_of_periapsis_deg: self.argument_of_periapsis_deg,
                eccentricity: self.eccentricity,
                semi_major_axis_m: self.semi_major_axis_m,
                mean_anomaly_at_epoch_rad: self.mean_anomaly_at_epoch_rad,
                epoch_ut: self.epoch_ut,
            },
        );
        let Some(end) = &self.patch_end else {
            return Ok(orbit);
        };
        let mut next = end.next.build(bodies)?;
        next.active = end.next_active;
        Ok(orbit.with_next_patch(end.ut, end.transition.into(), next))
    }
}

impl TryFrom<ScenarioConfig> for SimHost {
    type Error = ScenarioError;

    fn try_from(value: ScenarioConfig) -> Result<Self, Self::Error> {
        let bodies: HashMap<String, Body> = value
            .bodies
            .iter()
            .map(|body| (body.name.clone(), Body::from(body)))
            .collect();
        let ids: Vec<&str> = value.vessels.iter().map(|v| v.id.as_str()).collect();

        let mut host = SimHost::new(value.start_ut);
        for cfg in &value.vessels {
            let mut vessel = SimVessel::new(
                cfg.name.clone().unwrap_or_else(|| cfg.id.clone()),
                cfg.orbit.build(&bodies)?,
            );
            vessel.landed = cfg.landed;
            if let Some(target) = &cfg.target {
                if !ids.contains(&target.as_str()) {
                    return Err(ScenarioError::UnknownTarget {
                        vessel: cfg.id.clone(),
                        target: target.clone(),
                    });
                }
                vessel.target = Some(VesselId::new(target.clone()));
            }
            let id = VesselId::new(cfg.id.clone());
            host.insert_vessel(id.clone(), vessel);
            for node in &cfg.nodes {
                let handle = host.add_node(&id, node.ut)?;
                let burn = BurnVector::new(node.radial, node.normal, node.prograde).at(node.ut);
                host.set_node(handle, burn)?;
            }
        }
        Ok(host)
    }
}
