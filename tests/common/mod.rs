#![allow(dead_code)]

use std::f64::consts::{PI, TAU};

use kartographer::common::ids::VesselId;
use kartographer::orbits::{Body, Orbit, OrbitalElements, PatchTransition};
use kartographer::sim::{SimHost, SimVessel};

pub fn kerbin() -> Body {
    Body {
        name: "Kerbin".into(),
        mu_m3_s2: 3.5316e12,
        radius_m: 600_000.0,
        atmosphere_depth_m: 70_000.0,
    }
}

pub fn mun() -> Body {
    Body {
        name: "Mun".into(),
        mu_m3_s2: 6.513_839_8e10,
        radius_m: 200_000.0,
        atmosphere_depth_m: 0.0,
    }
}

pub fn circular(body: Body, radius_m: f64, inclination_deg: f64, lan_deg: f64) -> Orbit {
    Orbit::new(
        body,
        OrbitalElements {
            inclination_deg,
            lan_deg,
            semi_major_axis_m: radius_m,
            ..OrbitalElements::default()
        },
    )
}

/// 100 km circular Kerbin orbit.
pub fn lko() -> Orbit {
    circular(kerbin(), 700_000.0, 0.0, 0.0)
}

/// 40 km x 400 km Kerbin orbit that dips into the atmosphere.
pub fn skimmer() -> Orbit {
    Orbit::new(
        kerbin(),
        OrbitalElements {
            eccentricity: 360_000.0 / 1_640_000.0,
            semi_major_axis_m: 820_000.0,
            mean_anomaly_at_epoch_rad: 1.0,
            ..OrbitalElements::default()
        },
    )
}

/// Hyperbolic flyby of the Mun, periapsis at 240 km radius.
pub fn mun_flyby(epoch_ut: f64) -> Orbit {
    Orbit::new(
        mun(),
        OrbitalElements {
            eccentricity: 1.6,
            semi_major_axis_m: -400_000.0,
            mean_anomaly_at_epoch_rad: -3.0,
            epoch_ut,
            ..OrbitalElements::default()
        },
    )
}

/// Kerbin transfer orbit ending in a Mun encounter at `encounter_ut`.
pub fn munar_transfer(encounter_ut: f64) -> Orbit {
    let transfer = Orbit::new(
        kerbin(),
        OrbitalElements {
            eccentricity: 0.889_763_779_5,
            semi_major_axis_m: 6_350_000.0,
            mean_anomaly_at_epoch_rad: 0.2,
            ..OrbitalElements::default()
        },
    );
    transfer.with_next_patch(encounter_ut, PatchTransition::Encounter, mun_flyby(encounter_ut))
}

pub fn host_with(ut: f64, vessels: &[(&str, Orbit)]) -> SimHost {
    let mut host = SimHost::new(ut);
    for (id, orbit) in vessels {
        host.insert_vessel(VesselId::new(*id), SimVessel::new(*id, orbit.clone()));
    }
    host
}

/// Smallest absolute difference between two angles (rad).
pub fn angle_diff(a: f64, b: f64) -> f64 {
    ((a - b + PI).rem_euclid(TAU) - PI).abs()
}

pub fn assert_close(actual: f64, expected: f64, tol: f64) {
    assert!(
        (actual - expected).abs() <= tol,
        "expected {expected} +/- {tol}, got {actual}"
    );
}
