mod common;

use common::{host_with, lko, munar_transfer};
use kartographer::common::ids::VesselId;
use kartographer::config::Settings;
use kartographer::maneuver::{Axis, ManeuverActuator, ManeuverError, ManeuverLead, PlanState, Sign};
use kartographer::orbits::Ephemeris;
use kartographer::session::{FlightSession, SessionError};
use kartographer::sim::SimHost;
use kartographer::warp::{OrbitEvent, WarpError, WatchdogOutcome};

fn entered(host: &SimHost, vessel: &str, allowed: bool) -> FlightSession {
    let mut session = FlightSession::new(Settings::default());
    session.on_scene_enter(VesselId::new(vessel), host.current_ut(), allowed);
    session
}

#[test]
fn nothing_works_outside_a_scene() {
    let mut host = host_with(0.0, &[("ship", lko())]);
    let mut session = FlightSession::new(Settings::default());
    assert!(matches!(session.vessel(), Err(SessionError::NoActiveVessel)));
    assert!(matches!(session.add_node(&mut host), Err(SessionError::NoActiveVessel)));
    assert!(matches!(session.store_plan(&host), Err(SessionError::NoActiveVessel)));
}

#[test]
fn new_nodes_use_the_configured_lead_and_gate() {
    let mut host = host_with(250.0, &[("ship", lko())]);
    let ship = VesselId::new("ship");

    let mut locked = entered(&host, "ship", false);
    assert!(matches!(
        locked.add_node(&mut host),
        Err(SessionError::Maneuver(ManeuverError::HostRejected(_)))
    ));

    let mut session = entered(&host, "ship", true);
    session.add_node(&mut host).unwrap();
    assert_eq!(host.list_nodes(&ship)[0].burn.ut, 850.0);
    assert_eq!(
        session.planner_mut().sync(&host, &ship),
        PlanState::HasPlan { index: 0, count: 1 }
    );
}

#[test]
fn stored_plans_outlive_the_scene() {
    let mut host = host_with(0.0, &[("ship", lko())]);
    let ship = VesselId::new("ship");
    let mut session = entered(&host, "ship", true);

    assert!(matches!(
        session.store_plan(&host),
        Err(SessionError::Maneuver(ManeuverError::NoPlan))
    ));

    session.add_node(&mut host).unwrap();
    session
        .planner_mut()
        .adjust_axis(&mut host, &ship, Axis::Prograde, Sign::Plus)
        .unwrap();
    assert_eq!(session.store_plan(&host).unwrap(), 0);

    session.on_scene_exit();
    session.planner_mut().delete_all(&mut host, &ship).unwrap();
    session.on_scene_enter(ship.clone(), host.current_ut(), true);

    assert_eq!(session.stored().len(), 1);
    assert_eq!(session.restore_plan(&mut host, 0).unwrap(), 1);
    assert_eq!(host.list_nodes(&ship)[0].burn.delta_v.prograde, 1.0);

    assert!(matches!(
        session.restore_plan(&mut host, 3),
        Err(SessionError::Maneuver(ManeuverError::NoSuchChain(3)))
    ));
}

#[test]
fn warp_to_first_maneuver_runs_to_completion() {
    let mut host = host_with(0.0, &[("ship", lko())]);
    let mut session = entered(&host, "ship", true);
    session.add_node(&mut host).unwrap();

    let target = session
        .warp_to_first_maneuver(&mut host, ManeuverLead::OneMinute)
        .unwrap();
    assert_eq!(target.ut, 540.0);

    let mut outcomes = Vec::new();
    while session.warp().is_armed() {
        host.tick(0.02);
        outcomes.push(session.on_physics_tick(&mut host));
    }
    assert_eq!(outcomes.last(), Some(&WatchdogOutcome::Released));
    assert_eq!(host.current_ut(), 540.0);
}

#[test]
fn warp_to_event_picks_the_lead_for_the_event() {
    let mut host = host_with(0.0, &[("munar", munar_transfer(20_000.0))]);
    let mut session = entered(&host, "munar", true);

    let soi = session
        .warp_to_event(&mut host, OrbitEvent::SoiTransition(0), None)
        .unwrap();
    assert_eq!(soi.ut, 19_990.0);
    let end = session.warp_to_event(&mut host, OrbitEvent::PatchEnd, None).unwrap();
    assert_eq!(end.ut, 19_940.0);
    assert_eq!(session.warp().target(), Some(19_940.0));

    assert!(matches!(
        session.warp_to_event(&mut host, OrbitEvent::AscendingNode, None),
        Err(SessionError::Warp(WarpError::NoTarget))
    ));
}

#[test]
fn leaving_the_scene_disarms_the_watchdog() {
    let mut host = host_with(0.0, &[("ship", lko())]);
    let mut session = entered(&host, "ship", true);
    session.warp_by(&mut host, 5_000.0);
    assert!(session.warp().is_armed());

    session.on_scene_exit();
    assert!(!session.warp().is_armed());
    assert_eq!(session.on_physics_tick(&mut host), WatchdogOutcome::Idle);
}

#[test]
fn editor_draft_engages_through_the_session() {
    let mut host = host_with(100.0, &[("ship", lko())]);
    let mut session = entered(&host, "ship", true);
    session.editor_mut().set_from_now(100.0, 900.0);
    let target = session.engage_editor(&mut host);
    assert_eq!(target.ut, 1_000.0);
    assert_eq!(session.warp().target(), Some(1_000.0));
}
