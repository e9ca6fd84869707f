use std::fs;
use std::path::PathBuf;

use kartographer::common::ids::VesselId;
use kartographer::maneuver::{BurnVector, ManeuverActuator};
use kartographer::orbits::{Ephemeris, PatchTransition};
use kartographer::scenario::{ScenarioError, load_scenario, load_scenario_config};
use tempfile::tempdir;

fn bundled() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data/scenarios/kerbin.yaml")
}

#[test]
fn bundled_scenario_loads_into_a_host() {
    let host = load_scenario(bundled()).expect("bundled scenario");
    let ids: Vec<&str> = host.vessel_ids().map(VesselId::as_str).collect();
    assert_eq!(ids, ["kerbal-x", "munar", "skimmer", "station"]);
    assert_eq!(host.current_ut(), 0.0);

    let kerbal_x = VesselId::new("kerbal-x");
    assert_eq!(host.target_of(&kerbal_x), Some(&VesselId::new("station")));
    assert_eq!(host.vessel(&kerbal_x).unwrap().name, "Kerbal X");

    let nodes = host.list_nodes(&kerbal_x);
    assert_eq!(nodes.len(), 2);
    assert_eq!(nodes[0].burn, BurnVector::new(0.0, 0.0, 100.0).at(1_200.0));
    assert_eq!(nodes[1].burn, BurnVector::new(-5.0, 20.0, 0.0).at(5_000.0));
    assert!(nodes.iter().all(|node| node.patch_body == "Kerbin"));
}

#[test]
fn patch_chain_is_built_from_nested_orbits() {
    let host = load_scenario(bundled()).unwrap();
    let orbit = host.orbit_of(&VesselId::new("munar")).unwrap();
    assert_eq!(orbit.end_ut, 20_000.0);
    assert_eq!(orbit.end_transition, PatchTransition::Encounter);

    let bodies: Vec<&str> = orbit.patches().map(|patch| patch.body.name.as_str()).collect();
    assert_eq!(bodies, ["Kerbin", "Mun"]);
    let flyby = orbit.next_patch.as_deref().unwrap();
    assert!(flyby.active);
    assert!(flyby.is_terminal());
    assert_eq!(flyby.period(), 0.0);
}

#[test]
fn scenario_config_keeps_optional_fields_optional() {
    let config = load_scenario_config(bundled()).unwrap();
    let station = config.vessels.iter().find(|v| v.id == "station").unwrap();
    assert!(station.nodes.is_empty());
    assert!(station.target.is_none());
    assert!(!station.landed);
    assert_eq!(config.bodies[1].atmosphere_depth_m, 0.0);
}

#[test]
fn unknown_body_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(
        &path,
        "bodies: []\nvessels:\n  - id: lost\n    orbit: { body: Eve, semi_major_axis_m: 800000.0 }\n",
    )
    .unwrap();
    match load_scenario(&path) {
        Err(ScenarioError::UnknownBody(name)) => assert_eq!(name, "Eve"),
        other => panic!("expected unknown body, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn unknown_target_is_reported() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(
        &path,
        "bodies:\n  - { name: Kerbin, mu_m3_s2: 3.5316e12, radius_m: 600000.0 }\n\
         vessels:\n  - id: chaser\n    target: ghost\n    orbit: { body: Kerbin, semi_major_axis_m: 700000.0 }\n",
    )
    .unwrap();
    assert!(matches!(
        load_scenario(&path),
        Err(ScenarioError::UnknownTarget { ref vessel, ref target }) if vessel == "chaser" && target == "ghost"
    ));
}

#[test]
fn missing_scenario_is_an_io_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        load_scenario(dir.path().join("nope.yaml")),
        Err(ScenarioError::Io(_))
    ));
}
