mod common;

use common::{assert_close, host_with, lko, mun_flyby};
use kartographer::common::ids::VesselId;
use kartographer::common::{Direction, Granularity, StepMagnitude};
use kartographer::maneuver::{
    Axis, BurnVector, Increment, ManeuverActuator, ManeuverError, ManeuverLead, ManeuverPlanner,
    PlanState, Sign,
};
use kartographer::orbits::OrbitError;
use kartographer::sim::SimHost;

fn setup() -> (SimHost, VesselId, ManeuverPlanner) {
    let host = host_with(0.0, &[("kerbal-x", lko()), ("station", lko())]);
    let planner = ManeuverPlanner::new(Increment::default(), Granularity::default());
    (host, VesselId::new("kerbal-x"), planner)
}

#[test]
fn closed_facility_refuses_new_nodes() {
    let (mut host, vessel, mut planner) = setup();
    let err = planner.add_node(&mut host, &vessel, 600.0, false).unwrap_err();
    assert!(matches!(err, ManeuverError::HostRejected(_)));
    assert!(host.list_nodes(&vessel).is_empty());
    assert_eq!(planner.sync(&host, &vessel), PlanState::NoPlan);
}

#[test]
fn new_node_becomes_current() {
    let (mut host, vessel, mut planner) = setup();
    host.set_ut(100.0);
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();
    assert_eq!(planner.sync(&host, &vessel), PlanState::HasPlan { index: 0, count: 1 });
    let node = planner.current_node(&host, &vessel).unwrap();
    assert_eq!(node.burn.ut, 700.0);
    assert_eq!(node.burn.delta_v, BurnVector::default());
    assert_eq!(node.patch_body, "Kerbin");
}

#[test]
fn next_and_prev_wrap_around() {
    let (mut host, vessel, mut planner) = setup();
    for lead in [600.0, 1_200.0, 1_800.0] {
        planner.add_node(&mut host, &vessel, lead, true).unwrap();
    }
    assert_eq!(planner.sync(&host, &vessel), PlanState::HasPlan { index: 2, count: 3 });
    assert_eq!(planner.next(&host, &vessel), Ok(PlanState::HasPlan { index: 0, count: 3 }));
    assert_eq!(planner.prev(&host, &vessel), Ok(PlanState::HasPlan { index: 2, count: 3 }));
    assert_eq!(planner.prev(&host, &vessel), Ok(PlanState::HasPlan { index: 1, count: 3 }));
    assert_eq!(planner.current_node(&host, &vessel).unwrap().burn.ut, 1_200.0);
}

#[test]
fn vanished_node_falls_back_to_first() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();
    let last = planner.add_node(&mut host, &vessel, 1_200.0, true).unwrap();
    host.remove_node(last).unwrap();

    assert_eq!(planner.sync(&host, &vessel), PlanState::HasPlan { index: 0, count: 1 });
    assert_eq!(planner.current_node(&host, &vessel).unwrap().burn.ut, 600.0);
}

#[test]
fn vessel_switch_restarts_at_first_node() {
    let (mut host, vessel, mut planner) = setup();
    let station = VesselId::new("station");
    host.add_node(&station, 300.0).unwrap();
    host.add_node(&station, 900.0).unwrap();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();
    planner.add_node(&mut host, &vessel, 1_200.0, true).unwrap();

    assert_eq!(planner.sync(&host, &station), PlanState::HasPlan { index: 0, count: 2 });
    assert_eq!(planner.current_node(&host, &station).unwrap().burn.ut, 300.0);
}

#[test]
fn index_follows_a_node_that_was_reordered() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 700.0, true).unwrap();
    planner.add_node(&mut host, &vessel, 1_300.0, true).unwrap();
    planner.shift_time(&mut host, &vessel, -1_000.0).unwrap();

    assert_eq!(planner.sync(&host, &vessel), PlanState::HasPlan { index: 0, count: 2 });
    assert_eq!(planner.current_node(&host, &vessel).unwrap().burn.ut, 300.0);
}

#[test]
fn axis_nudges_use_the_selected_increment() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();

    planner.adjust_axis(&mut host, &vessel, Axis::Prograde, Sign::Plus).unwrap();
    planner.adjust_axis(&mut host, &vessel, Axis::Prograde, Sign::Plus).unwrap();
    let burn = planner.adjust_axis(&mut host, &vessel, Axis::Normal, Sign::Minus).unwrap();
    assert_eq!(burn.delta_v, BurnVector::new(0.0, -1.0, 2.0));
    assert_eq!(burn.ut, 600.0);

    planner.set_increment(Increment::Hundred);
    let burn = planner.adjust_axis(&mut host, &vessel, Axis::Prograde, Sign::Minus).unwrap();
    assert_eq!(burn.delta_v.prograde, -98.0);

    let burn = planner.zero_axis(&mut host, &vessel, Axis::Prograde).unwrap();
    assert_eq!(burn.delta_v, BurnVector::new(0.0, -1.0, 0.0));
    assert_eq!(host.list_nodes(&vessel)[0].burn, burn);
}

#[test]
fn increment_ladder_clamps() {
    assert_eq!(Increment::default().meters_per_second(), 1.0);
    assert_eq!(Increment::from_index(0).meters_per_second(), 0.01);
    assert_eq!(Increment::from_index(99), Increment::Thousand);
}

#[test]
fn orbit_shifts_use_the_patch_period() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();
    let period = lko().period();

    let burn = planner.shift_by_orbits(&mut host, &vessel, 10).unwrap();
    assert_close(burn.ut, 600.0 + 10.0 * period, 1e-9);
    let burn = planner.shift_by_orbits(&mut host, &vessel, -1).unwrap();
    assert_close(burn.ut, 600.0 + 9.0 * period, 1e-9);

    let node = planner.current_node(&host, &vessel).unwrap();
    assert!(node.can_shift_back(period, 0.0));
    assert!(!node.can_shift_back(10.0 * period, 0.0));
}

#[test]
fn orbit_shift_on_escape_patch_fails() {
    let mut host = host_with(0.0, &[("probe", mun_flyby(0.0))]);
    let vessel = VesselId::new("probe");
    let mut planner = ManeuverPlanner::default();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();

    let err = planner.shift_by_orbits(&mut host, &vessel, 1).unwrap_err();
    assert_eq!(
        err,
        ManeuverError::Orbit(OrbitError::NonPeriodicOrbit { body: "Mun".into() })
    );
    assert_eq!(host.list_nodes(&vessel)[0].burn.ut, 600.0);
}

#[test]
fn time_edits() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();

    let burn = planner
        .step_time(&mut host, &vessel, Direction::Forward, StepMagnitude::Large)
        .unwrap();
    assert_eq!(burn.ut, 4_200.0);

    host.set_ut(1_000.0);
    let burn = planner.retime_from_now(&mut host, &vessel, 600.0).unwrap();
    assert_eq!(burn.ut, 1_600.0);

    planner.stepper_mut().finer();
    let burn = planner
        .step_time(&mut host, &vessel, Direction::Backward, StepMagnitude::Largest)
        .unwrap();
    assert_eq!(burn.ut, 1_590.0);
}

#[test]
fn early_warp_only_from_first_node_with_room_for_the_lead() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();
    planner.add_node(&mut host, &vessel, 7_200.0, true).unwrap();

    assert_eq!(
        planner.early_warp_target(&host, &vessel, ManeuverLead::OneMinute),
        Err(ManeuverError::NotEarliestNode(1))
    );

    planner.next(&host, &vessel).unwrap();
    assert_eq!(planner.early_warp_target(&host, &vessel, ManeuverLead::OneMinute), Ok(540.0));
    assert_eq!(
        planner.early_warp_target(&host, &vessel, ManeuverLead::TenMinutes),
        Err(ManeuverError::LeadTooLong {
            lead_s: 600.0,
            remaining_s: 600.0
        })
    );
}

#[test]
fn deletes() {
    let (mut host, vessel, mut planner) = setup();
    for lead in [600.0, 1_200.0, 1_800.0] {
        planner.add_node(&mut host, &vessel, lead, true).unwrap();
    }
    assert_eq!(
        planner.delete_current(&mut host, &vessel),
        Ok(PlanState::HasPlan { index: 0, count: 2 })
    );
    assert_eq!(planner.delete_all(&mut host, &vessel), Ok(2));
    assert_eq!(planner.sync(&host, &vessel), PlanState::NoPlan);
    assert_eq!(planner.next(&host, &vessel), Err(ManeuverError::NoPlan));
}

#[test]
fn deleting_the_last_node_falls_back_to_the_first() {
    let (mut host, vessel, mut planner) = setup();
    for lead in [600.0, 1_200.0, 1_800.0] {
        planner.add_node(&mut host, &vessel, lead, true).unwrap();
    }
    assert_eq!(planner.current_node(&host, &vessel).unwrap().burn.ut, 1_800.0);
    planner.delete_current(&mut host, &vessel).unwrap();
    assert_eq!(planner.current_node(&host, &vessel).unwrap().burn.ut, 600.0);
}

#[test]
fn delete_all_stops_when_host_ignores_removals() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();
    host.set_sticky_nodes(true);
    let err = planner.delete_all(&mut host, &vessel).unwrap_err();
    assert!(matches!(err, ManeuverError::HostRejected(_)));
}

#[test]
fn snapshot_and_restore_round_trip_through_the_host() {
    let (mut host, vessel, mut planner) = setup();
    planner.add_node(&mut host, &vessel, 600.0, true).unwrap();
    planner.adjust_axis(&mut host, &vessel, Axis::Prograde, Sign::Plus).unwrap();
    planner.add_node(&mut host, &vessel, 900.0, true).unwrap();

    let chain = planner.snapshot(&host, &vessel).unwrap();
    assert_eq!(chain.len(), 2);
    planner.delete_all(&mut host, &vessel).unwrap();
    assert!(planner.snapshot(&host, &vessel).is_none());

    assert_eq!(planner.restore(&mut host, &vessel, &chain), Ok(2));
    assert_eq!(planner.sync(&host, &vessel), PlanState::HasPlan { index: 0, count: 2 });
    assert_eq!(host.list_nodes(&vessel)[0].burn.delta_v.prograde, 1.0);
}
