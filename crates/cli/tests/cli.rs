use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::tempdir;

fn scenario() -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../../data/scenarios/kerbin.yaml")
        .display()
        .to_string()
}

fn bin(name: &str) -> Command {
    let mut cmd = Command::cargo_bin(name).expect("binary built");
    cmd.env_remove("RUST_LOG").args(["--scenario", &scenario()]);
    cmd
}

#[test]
fn nodes_lists_the_scenario_plan() {
    bin("nodes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Vessel: kerbal-x"))
        .stdout(predicate::str::contains("Total dv: 120.62 m/s"));
}

#[test]
fn nodes_adds_and_nudges() {
    bin("nodes")
        .args(["--vessel", "station", "--add", "1", "--increment", "3", "--nudge", "prograde+"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Editing node 1 of 1"))
        .stdout(predicate::str::contains("Total dv: 10.00 m/s"));
}

#[test]
fn nodes_without_a_plan() {
    bin("nodes")
        .args(["--vessel", "station"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No maneuver nodes."));
}

#[test]
fn locked_facility_refuses_nodes() {
    bin("nodes")
        .args(["--vessel", "station", "--add", "1", "--locked"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("host rejected"));
}

#[test]
fn unknown_vessel_fails() {
    bin("nodes")
        .args(["--vessel", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn warp_stops_on_target() {
    bin("warp")
        .args(["--vessel", "station", "--to", "1000"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Target: 1 y,1 d,16 m,40.00 s"))
        .stdout(predicate::str::contains("Stopped: 1 y,1 d,16 m,40.00 s"))
        .stdout(predicate::str::contains("Forced stops: 0"));
}

#[test]
fn stalled_warp_is_forced_down() {
    bin("warp")
        .args(["--vessel", "station", "--to", "1000", "--stall"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Overshoot: 20.00 s"))
        .stdout(predicate::str::contains("Forced stops: 1"));
}

#[test]
fn warp_lists_events_for_a_targeted_vessel() {
    bin("warp")
        .arg("--list-events")
        .assert()
        .success()
        .stdout("apoapsis\nperiapsis\nascending node\ndescending node\n");
}

#[test]
fn warp_ahead_of_first_maneuver() {
    bin("warp")
        .args(["--maneuver", "1m"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Stopped: 1 y,1 d,19 m,0.00 s"));

    bin("warp")
        .args(["--maneuver", "1d"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not fit"));
}

#[test]
fn node_events_need_a_target() {
    bin("warp")
        .args(["--vessel", "station", "--event", "an"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no target vessel selected"));
}

#[test]
fn chains_store_then_restore_on_another_vessel() {
    let dir = tempdir().unwrap();
    let library = dir.path().join("library.json");
    let library = library.to_str().unwrap();

    bin("chains")
        .args(["--store", "--output", library])
        .assert()
        .success()
        .stderr(predicate::str::contains("Stored live plan as chain 0."));

    bin("chains")
        .args(["--vessel", "station", "--input", library, "--restore", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "chain 0: 2 burn(s), 120.62 m/s, first burn in 20 m,0.00 s",
        ))
        .stdout(predicate::str::contains("Vessel: station"))
        .stdout(predicate::str::contains("Total dv: 120.62 m/s"));
}

#[test]
fn chains_export_csv_to_stdout() {
    bin("chains")
        .args(["--store", "--format", "csv", "--output", "-"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "chain,burn,radial_m_s,normal_m_s,prograde_m_s,ut,magnitude_m_s\n0,0,0.0,0.0,100.0,1200.0,100.0\n",
        ));
}
