//! Node crossings between co-focal orbits and forward-wrapped UT conversion.

use std::f64::consts::PI;

use karto_core::units::{deg_to_rad, normalize_angle, rad_to_deg};
use karto_core::vector::{self, Vector3};
use tracing::debug;

use crate::{Ephemeris, Orbit, OrbitError};

/// Plane normal built from inclination and LAN by spherical projection.
fn plane_normal(orbit: &Orbit) -> Vector3 {
    vector::from_spherical(
        deg_to_rad(orbit.elements.inclination_deg),
        deg_to_rad(orbit.elements.lan_deg),
    )
}

/// True anomaly (rad, `[0, 2π)`) on `orbit` of its ascending node relative to `target`'s plane.
///
/// The line of nodes is the cross product of the two plane normals; its longitude is converted
/// into a true anomaly relative to `orbit`'s longitude of periapsis, with a quadrant offset picked
/// by the sign of the cross product's x-component. Coplanar orbits (zero dihedral angle) are
/// flipped by π.
pub fn ascending_node_true_anomaly(orbit: &Orbit, target: &Orbit) -> Result<f64, OrbitError> {
    if !orbit.shares_frame_with(target) {
        return Err(OrbitError::IncompatibleFrames(
            orbit.body.name.clone(),
            target.body.name.clone(),
        ));
    }

    let a = plane_normal(orbit);
    let b = plane_normal(target);
    let line_of_nodes = vector::cross(&a, &b);

    let longitude = normalize_angle(line_of_nodes[1].atan2(line_of_nodes[0]));
    let dihedral_deg = rad_to_deg(vector::dot(&a, &b).clamp(-1.0, 1.0).acos());

    let quadrant = if line_of_nodes[0] < 0.0 { PI / 2.0 } else { 3.0 * PI / 2.0 };
    let longitude_of_periapsis =
        deg_to_rad(orbit.elements.argument_of_periapsis_deg + orbit.elements.lan_deg);
    let node_raw = longitude - longitude_of_periapsis + quadrant;

    let ascending = if dihedral_deg > 0.0 { node_raw } else { node_raw + PI };
    debug!(
        dihedral_deg,
        longitude,
        ascending,
        "resolved ascending node against {}",
        target.body.name
    );
    Ok(normalize_angle(ascending))
}

/// Descending node: the ascending node plus π.
pub fn descending_node_true_anomaly(orbit: &Orbit, target: &Orbit) -> Result<f64, OrbitError> {
    ascending_node_true_anomaly(orbit, target).map(|an| normalize_angle(an + PI))
}

/// UT of the first pass through `true_anomaly` at or after `after_ut`.
///
/// Starts from the host's conversion and adds whole periods until the result is not early.
/// Orbits without a positive period get a single attempt and fail with
/// [`OrbitError::NonPeriodicOrbit`] when the pass already happened or the anomaly is unreachable.
pub fn ut_for_true_anomaly<E>(
    ephemeris: &E,
    orbit: &Orbit,
    true_anomaly: f64,
    after_ut: f64,
) -> Result<f64, OrbitError>
where
    E: Ephemeris + ?Sized,
{
    let mut ut = ephemeris.ut_for_true_anomaly(orbit, true_anomaly, after_ut);
    if !ut.is_finite() {
        // Hyperbolic anomalies past the asymptote are never reached.
        debug!(true_anomaly, "no finite pass through this anomaly");
        return Err(OrbitError::NonPeriodicOrbit {
            body: orbit.body.name.clone(),
        });
    }
    let period = orbit.period();

    if period > 0.0 {
        if ut < after_ut {
            let revolutions = ((after_ut - ut) / period).ceil();
            ut += revolutions * period;
            // Rounding in the division can leave us a hair short.
            while ut < after_ut {
                ut += period;
            }
        }
        return Ok(ut);
    }

    if ut < after_ut {
        ut += period;
    }
    if ut < after_ut {
        debug!(ut, after_ut, "pass on non-repeating orbit already happened");
        return Err(OrbitError::NonPeriodicOrbit {
            body: orbit.body.name.clone(),
        });
    }
    Ok(ut)
}
