//! Analytic two-body anomalies for elliptical and hyperbolic patches.
//!
//! Used by the reference host to answer [`crate::Ephemeris`] queries; real hosts bring their own
//! patched-conic solver.

use std::f64::consts::PI;

use karto_core::units::normalize_angle;

use crate::Orbit;

const MAX_ITERATIONS: usize = 50;
const TOLERANCE: f64 = 1e-12;

/// Mean anomaly (rad) at `ut`, unwrapped.
pub fn mean_anomaly_at_ut(orbit: &Orbit, ut: f64) -> f64 {
    orbit.elements.mean_anomaly_at_epoch_rad + orbit.mean_motion() * (ut - orbit.elements.epoch_ut)
}

/// Solve Kepler's equation for the eccentric (or hyperbolic) anomaly.
pub fn eccentric_anomaly_from_mean(eccentricity: f64, mean_anomaly: f64) -> f64 {
    let e = eccentricity;
    if e < 1.0 {
        let m = normalize_angle(mean_anomaly);
        let mut ea = if e < 0.8 { m } else { PI };
        for _ in 0..MAX_ITERATIONS {
            let delta = (ea - e * ea.sin() - m) / (1.0 - e * ea.cos());
            ea -= delta;
            if delta.abs() < TOLERANCE {
                break;
            }
        }
        ea
    } else {
        let m = mean_anomaly;
        let mut ha = (2.0 * m.abs() / e + 1.8).ln() * m.signum();
        for _ in 0..MAX_ITERATIONS {
            let delta = (e * ha.sinh() - ha - m) / (e * ha.cosh() - 1.0);
            ha -= delta;
            if delta.abs() < TOLERANCE {
                break;
            }
        }
        ha
    }
}

pub fn true_anomaly_from_eccentric(eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    let e = eccentricity;
    if e < 1.0 {
        2.0 * ((1.0 + e).sqrt() * (eccentric_anomaly / 2.0).sin())
            .atan2((1.0 - e).sqrt() * (eccentric_anomaly / 2.0).cos())
    } else {
        2.0 * (((e + 1.0) / (e - 1.0)).sqrt() * (eccentric_anomaly / 2.0).tanh()).atan()
    }
}

pub fn eccentric_anomaly_from_true(eccentricity: f64, true_anomaly: f64) -> f64 {
    let e = eccentricity;
    if e < 1.0 {
        2.0 * ((1.0 - e).sqrt() * (true_anomaly / 2.0).sin())
            .atan2((1.0 + e).sqrt() * (true_anomaly / 2.0).cos())
    } else {
        2.0 * (((e - 1.0) / (e + 1.0)).sqrt() * (true_anomaly / 2.0).tan()).atanh()
    }
}

pub fn mean_anomaly_from_eccentric(eccentricity: f64, eccentric_anomaly: f64) -> f64 {
    let e = eccentricity;
    if e < 1.0 {
        eccentric_anomaly - e * eccentric_anomaly.sin()
    } else {
        e * eccentric_anomaly.sinh() - eccentric_anomaly
    }
}

/// True anomaly (rad, `[0, 2π)`) of `orbit` at `ut`.
pub fn true_anomaly_at_ut(orbit: &Orbit, ut: f64) -> f64 {
    let e = orbit.elements.eccentricity;
    let ea = eccentric_anomaly_from_mean(e, mean_anomaly_at_ut(orbit, ut));
    normalize_angle(true_anomaly_from_eccentric(e, ea))
}

/// UT of `true_anomaly` within the revolution that contains `after_ut`.
///
/// For elliptical orbits the answer lies in `[t_p, t_p + period)` where `t_p` is the last
/// periapsis passage at or before `after_ut`, so it can be earlier than `after_ut`. Hyperbolic
/// orbits pass each anomaly once and the unique pass time is returned.
pub fn ut_at_true_anomaly(orbit: &Orbit, true_anomaly: f64, after_ut: f64) -> f64 {
    let e = orbit.elements.eccentricity;
    let n = orbit.mean_motion();
    if orbit.is_elliptical() {
        let target_mean =
            normalize_angle(mean_anomaly_from_eccentric(e, eccentric_anomaly_from_true(e, true_anomaly)));
        let since_periapsis = normalize_angle(mean_anomaly_at_ut(orbit, after_ut)) / n;
        after_ut - since_periapsis + target_mean / n
    } else {
        // Signed anomaly in (-π, π] so the pass before periapsis maps to negative mean anomaly.
        let signed = normalize_angle(true_anomaly + PI) - PI;
        let target_mean = mean_anomaly_from_eccentric(e, eccentric_anomaly_from_true(e, signed));
        orbit.elements.epoch_ut + (target_mean - orbit.elements.mean_anomaly_at_epoch_rad) / n
    }
}
